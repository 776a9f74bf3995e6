use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::utils::error::{VoltError, VoltResult};

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "voltdb-cli.json";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "VOLTDB_CLI_CONFIG";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CliConfig {
    pub java: String,
    pub java_opts: Vec<String>,
    pub classpath: Vec<String>,
    pub heap_max_mb: Option<u32>,
    pub default_host: String,
    pub catalog: Option<PathBuf>,
    pub log_level: String,
    pub dry_run: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            java_opts: vec!["-server".to_string()],
            classpath: vec!["voltdb/*".to_string(), "lib/*".to_string()],
            heap_max_mb: None,
            default_host: "localhost".to_string(),
            catalog: None,
            log_level: "warn".to_string(),
            dry_run: false,
        }
    }
}

impl CliConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> VoltResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VoltError::Configuration(format!("Cannot read '{}': {}", path.display(), e))
        })?;

        Self::from_json(&contents).map_err(|e| match e {
            VoltError::Configuration(msg) => {
                VoltError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse config from a JSON document
    pub fn from_json(json: &str) -> VoltResult<Self> {
        serde_json::from_str(json).map_err(|e| VoltError::Configuration(e.to_string()))
    }

    /// Locate and load the configuration.
    ///
    /// An explicit path wins, then `VOLTDB_CLI_CONFIG`, then `voltdb-cli.json`
    /// in the working directory. Missing implicit files fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> VoltResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Self::from_file(Path::new(&path));
            }
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(local);
        }

        Ok(Self::default())
    }

    /// Full classpath string as passed to the JVM
    pub fn classpath_string(&self) -> String {
        let separator = if cfg!(windows) { ";" } else { ":" };
        self.classpath.join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_config_default() {
        let config = CliConfig::default();

        assert_eq!(config.java, "java");
        assert_eq!(config.default_host, "localhost");
        assert!(config.heap_max_mb.is_none());
        assert!(config.catalog.is_none());
        assert!(!config.dry_run);
    }

    #[test]
    fn test_cli_config_partial_json_uses_defaults() {
        let config = CliConfig::from_json(r#"{ "heap_max_mb": 2048, "default_host": "db1" }"#).unwrap();

        assert_eq!(config.heap_max_mb, Some(2048));
        assert_eq!(config.default_host, "db1");
        assert_eq!(config.java, "java");
        assert_eq!(config.classpath, CliConfig::default().classpath);
    }

    #[test]
    fn test_cli_config_invalid_json() {
        let result = CliConfig::from_json("{ not json");

        match result {
            Err(VoltError::Configuration(_)) => {}
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_cli_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "java": "/opt/jdk/bin/java", "dry_run": true }}"#).unwrap();

        let config = CliConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.java, "/opt/jdk/bin/java");
        assert!(config.dry_run);
    }

    #[test]
    fn test_cli_config_missing_explicit_file() {
        let result = CliConfig::from_file(Path::new("/nonexistent/voltdb-cli.json"));

        match result {
            Err(VoltError::Configuration(msg)) => assert!(msg.contains("Cannot read")),
            other => panic!("Expected Configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_classpath_string() {
        let config = CliConfig {
            classpath: vec!["a.jar".to_string(), "b.jar".to_string()],
            ..CliConfig::default()
        };

        let joined = config.classpath_string();
        assert!(joined == "a.jar:b.jar" || joined == "a.jar;b.jar");
    }
}
