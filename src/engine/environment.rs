use std::path::PathBuf;
use crate::commands::CommandDescriptor;
use crate::utils::{
    config::CliConfig,
    types::ArgSet,
    error::{RunnerError, VoltResult},
};

pub const HEAPMAX_ENV_VAR: &str = "VOLTDB_HEAPMAX";
pub const OPTS_ENV_VAR: &str = "VOLTDB_OPTS";

/// Capabilities of the host the CLI is running on
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub catalog: Option<PathBuf>,
    pub daemon_capable: bool,
    pub default_host: String,
    pub heap_max_mb: Option<u32>,
    pub java_opts: Vec<String>,
    pub config_problems: Vec<String>,
}

impl Environment {
    /// Inspect the process environment
    pub fn detect(config: &CliConfig) -> Self {
        Self::from_lookup(config, |key| std::env::var(key).ok())
    }

    /// Build an environment snapshot, reading variables through `lookup`
    pub fn from_lookup<F>(config: &CliConfig, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config_problems = Vec::new();

        if config.java.trim().is_empty() {
            config_problems.push("no java executable is configured".to_string());
        }

        if config.heap_max_mb == Some(0) {
            config_problems.push("heap_max_mb must be greater than zero".to_string());
        }

        let heap_max_mb = match lookup(HEAPMAX_ENV_VAR) {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(mb) if mb > 0 => Some(mb),
                _ => {
                    config_problems.push(format!(
                        "{} must be a positive number of megabytes, got '{}'",
                        HEAPMAX_ENV_VAR, raw
                    ));
                    None
                }
            },
            None => config.heap_max_mb.filter(|mb| *mb > 0),
        };

        let mut java_opts = config.java_opts.clone();
        if let Some(opts) = lookup(OPTS_ENV_VAR) {
            java_opts.extend(opts.split_whitespace().map(str::to_string));
        }

        let catalog = config.catalog.clone().filter(|path| path.is_file());

        Self {
            catalog,
            daemon_capable: cfg!(unix),
            default_host: config.default_host.clone(),
            heap_max_mb,
            java_opts,
            config_problems,
        }
    }

    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// Check a command's declared requirements against this environment and
    /// the modes requested in `args`
    pub fn check_prerequisites(&self, descriptor: &CommandDescriptor, args: &ArgSet) -> VoltResult<()> {
        let requirements = descriptor.requirements();
        let unmet = |reason: String| -> VoltResult<()> {
            Err(RunnerError::PrerequisiteNotMet {
                command: descriptor.name().to_string(),
                reason,
            }
            .into())
        };

        if requirements.needs_catalog && !self.has_catalog() {
            return unmet("a compiled catalog is required but none was found".to_string());
        }

        if args.live && !requirements.supports_live {
            return unmet("live mode is not supported".to_string());
        }

        if args.safemode && !requirements.safemode_available {
            return unmet("safe mode is not available".to_string());
        }

        if args.background {
            if !requirements.supports_daemon {
                return unmet("running in the background is not supported".to_string());
            }
            if !self.daemon_capable {
                return unmet("this host cannot run background daemons".to_string());
            }
        }

        if args.instance.is_some() && !requirements.supports_multiple_daemons {
            return unmet("named daemon instances are not supported".to_string());
        }

        if requirements.check_environment_config && !self.config_problems.is_empty() {
            return unmet(format!("environment check failed: {}", self.config_problems.join("; ")));
        }

        Ok(())
    }

    /// Fill in values a command expects to be defaulted
    pub fn apply_defaults(&self, descriptor: &CommandDescriptor, mut args: ArgSet) -> ArgSet {
        if descriptor.requirements().default_host && args.host.is_none() {
            args.host = Some(self.default_host.clone());
        }
        args
    }
}
