use thiserror::Error;

/// Main error type for the VoltDB CLI
#[derive(Debug, Error)]
pub enum VoltError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Runner(#[from] RunnerError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Command registration and lookup errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Command '{0}' is already registered")]
    DuplicateCommand(String),

    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("Invalid command name: '{0}'")]
    InvalidCommandName(String),
}

/// Errors raised while running a resolved command
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("Cannot run '{command}': {reason}")]
    PrerequisiteNotMet { command: String, reason: String },

    #[error("Failed to launch '{command}': {source}")]
    Delegation {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification used for run-state reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    DuplicateCommand,
    UnknownCommand,
    InvalidCommandName,
    PrerequisiteNotMet,
    Delegation,
    Configuration,
    Internal,
}

impl VoltError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            VoltError::Registry(RegistryError::DuplicateCommand(_)) => ErrorKind::DuplicateCommand,
            VoltError::Registry(RegistryError::UnknownCommand(_)) => ErrorKind::UnknownCommand,
            VoltError::Registry(RegistryError::InvalidCommandName(_)) => ErrorKind::InvalidCommandName,
            VoltError::Runner(RunnerError::PrerequisiteNotMet { .. }) => ErrorKind::PrerequisiteNotMet,
            VoltError::Runner(RunnerError::Delegation { .. }) => ErrorKind::Delegation,
            VoltError::Configuration(_) => ErrorKind::Configuration,
            VoltError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for CLI operations
pub type VoltResult<T> = Result<T, VoltError>;
