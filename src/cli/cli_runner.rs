use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use crate::cli::{CliArgs, Commands, OutputFormatter};
use crate::commands::CommandRegistry;
use crate::engine::{CommandRunner, Environment, ServerDelegate};
use crate::utils::{
    config::CliConfig,
    types::{ArgSet, ExitStatus},
    error::VoltResult,
};

/// Main CLI runner that handles command execution
pub struct CliRunner {
    runner: CommandRunner,
    verbose: bool,
}

impl CliRunner {
    /// Create a CLI runner with the built-in commands registered
    pub fn new(config: CliConfig, verbose: bool) -> VoltResult<Self> {
        let registry = CommandRegistry::with_builtin_commands()?;
        let environment = Environment::detect(&config);
        if !environment.config_problems.is_empty() {
            tracing::debug!(problems = ?environment.config_problems, "environment check reported problems");
        }

        let delegate = ServerDelegate::new(config);

        Ok(Self {
            runner: CommandRunner::new(registry, environment, Box::new(delegate)),
            verbose,
        })
    }

    /// Redirect warnings, info lines and delegation output
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.runner = self.runner.with_output(output);
        self
    }

    /// List registered commands
    pub fn list_commands(&self, include_hidden: bool) -> String {
        OutputFormatter::format_command_list(&self.runner.registry().list(include_hidden))
    }

    /// Run a registered command by name
    pub async fn execute(&mut self, name: &str, args: ArgSet) -> VoltResult<ExitStatus> {
        if self.verbose {
            if let Ok(descriptor) = self.runner.registry().lookup(name) {
                let message = format!("Running '{}' (server action '{}')", name, descriptor.action());
                self.runner.info(&message);
            }
        }

        let status = self.runner.run(name, args).await?;

        if self.verbose {
            self.runner.info(&format!("'{}' finished with exit code {}", name, status.code()));
        }
        Ok(status)
    }
}

/// Install the log subscriber; `RUST_LOG` wins over the configured level
pub fn init_logging(config: &CliConfig, verbose: bool) {
    let fallback = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(fallback));

    // A subscriber may already be installed when embedded in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match CliConfig::load(args.cli_config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    };
    config.dry_run |= args.dry_run;
    init_logging(&config, args.verbose);

    let mut runner = match CliRunner::new(config, args.verbose) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    };

    if let Commands::List { all } = &args.command {
        println!("{}", runner.list_commands(*all));
        return Ok(());
    }

    let Some((name, command_args)) = args.command.into_invocation() else {
        return Ok(());
    };

    match runner.execute(&name, command_args).await {
        Ok(ExitStatus::Success) => Ok(()),
        Ok(status) => std::process::exit(status.code()),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    }
}
