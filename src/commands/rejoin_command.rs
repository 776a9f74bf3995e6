use async_trait::async_trait;
use crate::commands::{CapabilitySet, CommandDescriptor, CommandHandler};
use crate::engine::ExecutionContext;
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::VoltResult,
};

pub const REJOIN_DESCRIPTION: &str =
    "WARNING: The rejoin is deprecated. Please use INIT and START. Rejoin the current node to a VoltDB cluster.";

pub const REJOIN_WARNING: &str =
    "voltdb rejoin is no longer supported, please use 'init' to initialize and 'start' to start the database.";

/// Deprecated `rejoin`: still launches the server after warning
pub struct RejoinCommand;

impl RejoinCommand {
    pub fn descriptor() -> CommandDescriptor {
        CommandDescriptor::new("rejoin", REJOIN_DESCRIPTION)
            .hidden()
            .with_requirements(CapabilitySet {
                needs_catalog: false,
                supports_live: true,
                default_host: false,
                safemode_available: false,
                supports_daemon: true,
                supports_multiple_daemons: true,
                check_environment_config: true,
            })
    }
}

#[async_trait]
impl CommandHandler for RejoinCommand {
    async fn execute(&self, ctx: &mut ExecutionContext<'_>, _args: &ArgSet) -> VoltResult<ExitStatus> {
        ctx.warn(REJOIN_WARNING);
        ctx.delegate().await
    }
}
