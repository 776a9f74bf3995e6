use std::io::Write;
use crate::cli::OutputFormatter;
use crate::commands::CommandDescriptor;
use crate::engine::{Delegate, Environment, Invocation};
use crate::utils::{
    types::{ArgSet, ExitStatus},
    error::VoltResult,
};

/// Per-invocation handle given to a command handler.
///
/// Lives for exactly one `CommandRunner::run` call and exposes only the
/// operations a handler may perform: emitting warnings and delegating to the
/// shared server startup path.
pub struct ExecutionContext<'a> {
    descriptor: &'a CommandDescriptor,
    args: &'a ArgSet,
    environment: &'a Environment,
    delegate: &'a dyn Delegate,
    output: &'a mut (dyn Write + Send),
    warnings: usize,
    delegated: bool,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        descriptor: &'a CommandDescriptor,
        args: &'a ArgSet,
        environment: &'a Environment,
        delegate: &'a dyn Delegate,
        output: &'a mut (dyn Write + Send),
    ) -> Self {
        Self {
            descriptor,
            args,
            environment,
            delegate,
            output,
            warnings: 0,
            delegated: false,
        }
    }

    /// Write a warning for the user; execution continues
    pub fn warn(&mut self, message: &str) {
        if let Err(e) = writeln!(self.output, "{}", OutputFormatter::format_warning(message)) {
            tracing::warn!(command = self.descriptor.name(), error = %e, "cannot write warning: {}", message);
        }
        self.warnings += 1;
    }

    /// Hand off to the shared startup path and return its status
    pub async fn delegate(&mut self) -> VoltResult<ExitStatus> {
        self.delegated = true;
        let invocation = Invocation {
            descriptor: self.descriptor,
            args: self.args,
            environment: self.environment,
        };
        self.delegate.go(invocation, &mut *self.output).await
    }

    pub fn descriptor(&self) -> &CommandDescriptor {
        self.descriptor
    }

    pub fn args(&self) -> &ArgSet {
        self.args
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn has_delegated(&self) -> bool {
        self.delegated
    }
}
