use async_trait::async_trait;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use crate::engine::ExecutionContext;
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::{RegistryError, VoltResult},
};

static COMMAND_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z][a-z0-9-]*$").expect("command name pattern compiles"));

/// Prerequisites and supported modes declared by a server command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    pub needs_catalog: bool,
    pub supports_live: bool,
    pub default_host: bool,
    pub safemode_available: bool,
    pub supports_daemon: bool,
    pub supports_multiple_daemons: bool,
    pub check_environment_config: bool,
}

/// Immutable metadata describing a registered command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    hidden: bool,
    requirements: CapabilitySet,
    action: String,
}

impl CommandDescriptor {
    /// Create a visible command with no requirements
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            hidden: false,
            requirements: CapabilitySet::default(),
            action: name.to_string(),
        }
    }

    /// Hide the command from listings; it stays invocable by exact name
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_requirements(mut self, requirements: CapabilitySet) -> Self {
        self.requirements = requirements;
        self
    }

    /// Server action launched when the command delegates
    pub fn with_action(mut self, action: &str) -> Self {
        self.action = action.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn requirements(&self) -> &CapabilitySet {
        &self.requirements
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

/// Entry point of a command
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command. Handlers either return directly or finish with
    /// `ctx.delegate()` to continue into the shared server startup path.
    async fn execute(&self, ctx: &mut ExecutionContext<'_>, args: &ArgSet) -> VoltResult<ExitStatus>;
}

struct RegisteredCommand {
    descriptor: CommandDescriptor,
    handler: Box<dyn CommandHandler>,
}

/// Registry of every command known to the CLI
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in commands
    pub fn with_builtin_commands() -> VoltResult<Self> {
        let mut registry = Self::new();
        crate::commands::register_builtin_commands(&mut registry)?;
        Ok(registry)
    }

    /// Register a command under its descriptor's name
    pub fn register(&mut self, descriptor: CommandDescriptor, handler: Box<dyn CommandHandler>) -> VoltResult<()> {
        if !COMMAND_NAME.is_match(descriptor.name()) {
            return Err(RegistryError::InvalidCommandName(descriptor.name().to_string()).into());
        }

        if self.commands.contains_key(descriptor.name()) {
            return Err(RegistryError::DuplicateCommand(descriptor.name().to_string()).into());
        }

        tracing::debug!(command = descriptor.name(), hidden = descriptor.is_hidden(), "registered command");
        self.commands.insert(
            descriptor.name().to_string(),
            RegisteredCommand { descriptor, handler },
        );
        Ok(())
    }

    /// Get a command's descriptor by name
    pub fn lookup(&self, name: &str) -> VoltResult<&CommandDescriptor> {
        self.resolve(name).map(|(descriptor, _)| descriptor)
    }

    /// Get a command's descriptor and handler by name
    pub fn resolve(&self, name: &str) -> VoltResult<(&CommandDescriptor, &dyn CommandHandler)> {
        self.commands
            .get(name)
            .map(|c| (&c.descriptor, c.handler.as_ref()))
            .ok_or_else(|| RegistryError::UnknownCommand(name.to_string()).into())
    }

    /// Descriptors sorted by name, hidden ones only on request
    pub fn list(&self, include_hidden: bool) -> Vec<&CommandDescriptor> {
        let mut descriptors: Vec<&CommandDescriptor> = self.commands
            .values()
            .map(|c| &c.descriptor)
            .filter(|d| include_hidden || !d.is_hidden())
            .collect();
        descriptors.sort_by(|a, b| a.name().cmp(b.name()));
        descriptors
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
