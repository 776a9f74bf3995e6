use async_trait::async_trait;
use std::fmt;
use std::io::Write;
use std::process::Stdio;
use crate::commands::CommandDescriptor;
use crate::engine::Environment;
use crate::utils::{
    config::CliConfig,
    types::{ArgSet, ExitStatus},
    error::{RunnerError, VoltError, VoltResult},
};

/// Main class of the database server
pub const SERVER_MAIN_CLASS: &str = "org.voltdb.VoltDB";

/// Everything the delegation path needs to know about one invocation
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub descriptor: &'a CommandDescriptor,
    pub args: &'a ArgSet,
    pub environment: &'a Environment,
}

/// Shared continuation behind `ExecutionContext::delegate`
#[async_trait]
pub trait Delegate: Send + Sync {
    async fn go(&self, invocation: Invocation<'_>, output: &mut (dyn Write + Send)) -> VoltResult<ExitStatus>;
}

/// A fully resolved server command line
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchPlan {
    pub program: String,
    pub args: Vec<String>,
    pub background: bool,
}

impl LaunchPlan {
    /// Build the server command line for an invocation
    pub fn build(config: &CliConfig, invocation: &Invocation<'_>) -> Self {
        let args = invocation.args;
        let environment = invocation.environment;
        let mut argv: Vec<String> = environment.java_opts.clone();

        if let Some(heap) = environment.heap_max_mb {
            argv.push(format!("-Xmx{}m", heap));
        }
        argv.push("-classpath".to_string());
        argv.push(config.classpath_string());
        argv.push(SERVER_MAIN_CLASS.to_string());
        argv.push(invocation.descriptor.action().to_string());

        let mut pair = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                argv.push(key.to_string());
                argv.push(value);
            }
        };
        pair("host", args.host.clone());
        pair("voltdbroot", args.dir.as_ref().map(|p| p.display().to_string()));
        pair("deployment", args.config.as_ref().map(|p| p.display().to_string()));
        pair("schema", args.schema.as_ref().map(|p| p.display().to_string()));
        pair("classes", args.classes.as_ref().map(|p| p.display().to_string()));
        if invocation.descriptor.requirements().needs_catalog {
            pair("catalog", environment.catalog.as_ref().map(|p| p.display().to_string()));
        }

        for (enabled, flag) in [(args.live, "live"), (args.safemode, "safemode"), (args.force, "force")] {
            if enabled {
                argv.push(flag.to_string());
            }
        }
        argv.extend(args.extra.iter().cloned());

        Self {
            program: config.java.clone(),
            args: argv,
            background: args.background,
        }
    }
}

impl fmt::Display for LaunchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        arg.to_string()
    }
}

/// Delegation path that launches the database server.
///
/// Foreground launches wait for the server and return its exit code. Background
/// launches put the server in its own process group (unix) with stdio detached,
/// report the instance name and pid, and return at once. Pid files and
/// per-instance bookkeeping are left to the server.
pub struct ServerDelegate {
    config: CliConfig,
}

impl ServerDelegate {
    pub fn new(config: CliConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CliConfig {
        &self.config
    }
}

#[async_trait]
impl Delegate for ServerDelegate {
    async fn go(&self, invocation: Invocation<'_>, output: &mut (dyn Write + Send)) -> VoltResult<ExitStatus> {
        let plan = LaunchPlan::build(&self.config, &invocation);
        let command = invocation.descriptor.name().to_string();

        if self.config.dry_run {
            writeln!(output, "Would run: {}", plan)
                .map_err(|e| VoltError::Internal(format!("Cannot write output: {}", e)))?;
            return Ok(ExitStatus::Success);
        }

        tracing::info!(command = %command, "launching: {}", plan);
        let mut process = tokio::process::Command::new(&plan.program);
        process.args(&plan.args);

        if plan.background {
            process
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            #[cfg(unix)]
            process.process_group(0);

            let child = process
                .spawn()
                .map_err(|source| RunnerError::Delegation { command: command.clone(), source })?;
            let instance = invocation.args.instance.as_deref().unwrap_or("default");
            let pid = child.id().map(|id| id.to_string()).unwrap_or_else(|| "unknown".to_string());
            tracing::info!(command = %command, instance, pid = %pid, "server started in the background");

            if let Err(e) = writeln!(
                output,
                "Started '{}' instance '{}' in the background (pid {})",
                command, instance, pid
            ) {
                tracing::warn!(command = %command, error = %e, "cannot report background instance");
            }
            return Ok(ExitStatus::Success);
        }

        let status = process
            .status()
            .await
            .map_err(|source| RunnerError::Delegation { command, source })?;
        Ok(ExitStatus::from(status))
    }
}
