use std::io::Write;
use tracing::debug;
use crate::cli::OutputFormatter;
use crate::commands::CommandRegistry;
use crate::engine::{Delegate, Environment, ExecutionContext};
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::{ErrorKind, VoltResult},
};

/// Stages a single command invocation passes through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Resolving,
    Validating,
    Executing,
    Delegating,
    Completed,
    Failed(ErrorKind),
}

/// Resolves commands by name and runs their handlers
pub struct CommandRunner {
    registry: CommandRegistry,
    environment: Environment,
    delegate: Box<dyn Delegate>,
    output: Box<dyn Write + Send>,
    last_transitions: Vec<RunState>,
}

impl CommandRunner {
    /// Create a runner writing user-facing messages to stderr
    pub fn new(registry: CommandRegistry, environment: Environment, delegate: Box<dyn Delegate>) -> Self {
        Self {
            registry,
            environment,
            delegate,
            output: Box::new(std::io::stderr()),
            last_transitions: Vec::new(),
        }
    }

    /// Redirect warnings and delegation output
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self
    }

    /// Write an informational line to the runner's output
    pub fn info(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", OutputFormatter::format_info(message)) {
            tracing::warn!(error = %e, "cannot write info: {}", message);
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// States visited by the most recent `run`
    pub fn last_transitions(&self) -> &[RunState] {
        &self.last_transitions
    }

    /// Run the command registered under `name`
    pub async fn run(&mut self, name: &str, args: ArgSet) -> VoltResult<ExitStatus> {
        let mut transitions = Vec::new();
        let result = self.run_stages(name, args, &mut transitions).await;

        let terminal = match &result {
            Ok(_) => RunState::Completed,
            Err(e) => RunState::Failed(e.kind()),
        };
        debug!(command = name, state = ?terminal, "run finished");
        transitions.push(terminal);
        self.last_transitions = transitions;

        result
    }

    async fn run_stages(&mut self, name: &str, args: ArgSet, transitions: &mut Vec<RunState>) -> VoltResult<ExitStatus> {
        enter(transitions, name, RunState::Resolving);
        let (descriptor, handler) = self.registry.resolve(name)?;

        enter(transitions, name, RunState::Validating);
        self.environment.check_prerequisites(descriptor, &args)?;
        let args = self.environment.apply_defaults(descriptor, args);

        enter(transitions, name, RunState::Executing);
        let mut ctx = ExecutionContext::new(
            descriptor,
            &args,
            &self.environment,
            self.delegate.as_ref(),
            self.output.as_mut(),
        );
        let result = handler.execute(&mut ctx, &args).await;

        if ctx.has_delegated() {
            enter(transitions, name, RunState::Delegating);
        }
        debug!(command = name, warnings = ctx.warning_count(), "handler returned");
        drop(ctx);

        self.output.flush().ok();
        result
    }
}

fn enter(transitions: &mut Vec<RunState>, command: &str, state: RunState) {
    debug!(command, state = ?state, "run state");
    transitions.push(state);
}
