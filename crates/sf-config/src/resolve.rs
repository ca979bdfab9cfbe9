//! Config resolution: CLI flag → environment → XDG config dir → defaults.

use crate::etl::EtlConfig;
use crate::validate::{validate, ValidationError};
use crate::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Candidate config file locations, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigPaths {
    /// Path passed on the command line; must exist when set.
    pub cli: Option<PathBuf>,
    /// Path from `SPARKIFY_ETL_CONFIG`; must exist when set.
    pub env: Option<PathBuf>,
    /// Per-user config file; skipped when absent.
    pub xdg: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover candidate paths from the process environment.
    pub fn discover(cli: Option<&Path>) -> Self {
        Self {
            cli: cli.map(Path::to_path_buf),
            env: std::env::var_os(CONFIG_ENV_VAR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            xdg: dirs::config_dir().map(|d| d.join("sparkify-etl").join(CONFIG_FILE_NAME)),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Cli(p) => write!(f, "cli:{}", p.display()),
            ConfigSource::Env(p) => write!(f, "env:{}", p.display()),
            ConfigSource::Xdg(p) => write!(f, "xdg:{}", p.display()),
            ConfigSource::Defaults => write!(f, "defaults"),
        }
    }
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: EtlConfig,
    pub source: ConfigSource,
}

/// Resolve, parse and validate the configuration.
pub fn resolve_config(paths: &ConfigPaths) -> Result<ResolvedConfig, ConfigError> {
    let (config, source) = if let Some(path) = &paths.cli {
        (load_file(path)?, ConfigSource::Cli(path.clone()))
    } else if let Some(path) = &paths.env {
        (load_file(path)?, ConfigSource::Env(path.clone()))
    } else if let Some(path) = paths.xdg.as_ref().filter(|p| p.is_file()) {
        (load_file(path)?, ConfigSource::Xdg(path.clone()))
    } else {
        (EtlConfig::default(), ConfigSource::Defaults)
    };

    validate(&config).map_err(ConfigError::Invalid)?;
    Ok(ResolvedConfig { config, source })
}

/// Load and parse a single config file without validating it.
pub fn load_file(path: &Path) -> Result<EtlConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    EtlConfig::from_toml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_no_paths_yields_defaults() {
        let resolved = resolve_config(&ConfigPaths::default()).unwrap();
        assert_eq!(resolved.source, ConfigSource::Defaults);
        assert_eq!(resolved.config, EtlConfig::default());
    }

    #[test]
    fn test_missing_xdg_file_is_skipped() {
        let dir = tempdir().unwrap();
        let paths = ConfigPaths {
            xdg: Some(dir.path().join("etl.toml")),
            ..Default::default()
        };
        assert_eq!(resolve_config(&paths).unwrap().source, ConfigSource::Defaults);
    }

    #[test]
    fn test_cli_wins_over_env() {
        let dir = tempdir().unwrap();
        let cli = dir.path().join("cli.toml");
        let env = dir.path().join("env.toml");
        fs::write(&cli, "[output]\nroot = \"from-cli\"\n").unwrap();
        fs::write(&env, "[output]\nroot = \"from-env\"\n").unwrap();

        let paths = ConfigPaths {
            cli: Some(cli.clone()),
            env: Some(env),
            xdg: None,
        };
        let resolved = resolve_config(&paths).unwrap();
        assert_eq!(resolved.source, ConfigSource::Cli(cli));
        assert_eq!(resolved.config.output.root, PathBuf::from("from-cli"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempdir().unwrap();
        let paths = ConfigPaths {
            env: Some(dir.path().join("nope.toml")),
            ..Default::default()
        };
        assert!(matches!(
            resolve_config(&paths),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[pipeline]\nactivity_page = \"\"\n").unwrap();
        let paths = ConfigPaths {
            cli: Some(path),
            ..Default::default()
        };
        let err = resolve_config(&paths).unwrap_err();
        assert!(err.to_string().contains("pipeline.activity_page"));
    }
}
