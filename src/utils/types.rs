use std::path::PathBuf;

/// Parsed options handed to a command handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgSet {
    pub host: Option<String>,
    pub dir: Option<PathBuf>,           // voltdbroot parent directory
    pub config: Option<PathBuf>,        // deployment file
    pub schema: Option<PathBuf>,
    pub classes: Option<PathBuf>,
    pub live: bool,
    pub background: bool,
    pub instance: Option<String>,       // named daemon instance
    pub safemode: bool,
    pub force: bool,
    pub extra: Vec<String>,             // passed to the server untouched
}

impl ArgSet {
    /// Create an empty argument set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = Some(host.to_string());
        self
    }

    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    pub fn with_live(mut self) -> Self {
        self.live = true;
        self
    }

    pub fn with_background(mut self) -> Self {
        self.background = true;
        self
    }

    pub fn with_instance(mut self, instance: &str) -> Self {
        self.instance = Some(instance.to_string());
        self
    }

    pub fn with_safemode(mut self) -> Self {
        self.safemode = true;
        self
    }
}

/// Outcome of a command invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure(i32),
}

impl ExitStatus {
    /// Process exit code for this status
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitStatus::Success)
    }
}

impl From<i32> for ExitStatus {
    fn from(code: i32) -> Self {
        if code == 0 {
            ExitStatus::Success
        } else {
            ExitStatus::Failure(code)
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        // Killed by a signal: no code, report a generic failure
        status.code().map(ExitStatus::from).unwrap_or(ExitStatus::Failure(1))
    }
}
