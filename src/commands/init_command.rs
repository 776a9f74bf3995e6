use async_trait::async_trait;
use crate::commands::{CapabilitySet, CommandDescriptor, CommandHandler};
use crate::engine::ExecutionContext;
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::VoltResult,
};

/// `init`: prepare a database root directory
pub struct InitCommand;

impl InitCommand {
    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("init", "Initializes a new, empty database root directory.")
            .with_action("initialize")
            .with_requirements(CapabilitySet {
                check_environment_config: true,
                ..CapabilitySet::default()
            })
    }
}

#[async_trait]
impl CommandHandler for InitCommand {
    async fn execute(&self, ctx: &mut ExecutionContext<'_>, _args: &ArgSet) -> VoltResult<ExitStatus> {
        ctx.delegate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_descriptor() {
        let descriptor = InitCommand::descriptor();

        assert_eq!(descriptor.name(), "init");
        assert_eq!(descriptor.action(), "initialize");
        assert!(!descriptor.is_hidden());
        assert!(!descriptor.requirements().supports_daemon);
        assert!(!descriptor.requirements().default_host);
        assert!(descriptor.requirements().check_environment_config);
    }
}
