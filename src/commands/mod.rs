// Command declarations and built-in commands
pub mod command_trait;
pub mod init_command;
pub mod start_command;
pub mod rejoin_command;

pub use command_trait::*;
pub use init_command::*;
pub use start_command::*;
pub use rejoin_command::*;

use crate::utils::error::VoltResult;

/// Register every built-in command
pub fn register_builtin_commands(registry: &mut CommandRegistry) -> VoltResult<()> {
    registry.register(InitCommand::descriptor(), Box::new(InitCommand))?;
    registry.register(StartCommand::descriptor(), Box::new(StartCommand))?;
    registry.register(RejoinCommand::descriptor(), Box::new(RejoinCommand))?;
    Ok(())
}
