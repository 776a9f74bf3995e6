use async_trait::async_trait;
use crate::commands::{CapabilitySet, CommandDescriptor, CommandHandler};
use crate::engine::ExecutionContext;
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::VoltResult,
};

/// `start`: start a node of an initialized database
pub struct StartCommand;

impl StartCommand {
    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("start", "Starts a database, then joins or rejoins a cluster as needed.")
            .with_action("probe")
            .with_requirements(CapabilitySet {
                needs_catalog: false,
                supports_live: false,
                default_host: true,
                safemode_available: true,
                supports_daemon: true,
                supports_multiple_daemons: true,
                check_environment_config: true,
            })
    }
}

#[async_trait]
impl CommandHandler for StartCommand {
    async fn execute(&self, ctx: &mut ExecutionContext<'_>, _args: &ArgSet) -> VoltResult<ExitStatus> {
        ctx.delegate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_descriptor() {
        let descriptor = StartCommand::descriptor();

        assert_eq!(descriptor.name(), "start");
        assert_eq!(descriptor.action(), "probe");
        assert!(!descriptor.is_hidden());

        let requirements = descriptor.requirements();
        assert!(requirements.default_host);
        assert!(requirements.safemode_available);
        assert!(requirements.supports_daemon);
        assert!(!requirements.supports_live);
    }
}
