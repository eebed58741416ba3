//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use seawatch_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Picked up from the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "seawatch.toml";

/// Load layered configuration with CLI overrides applied last
pub fn load_config(path: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    match path {
        Some(path) => {
            config = config
                .load_from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.is_file() {
                config = config
                    .load_from_file(default_path)
                    .context("Failed to load seawatch.toml")?;
            }
        }
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    config.validate().context("Invalid configuration")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use seawatch_core::config::ConfigSource;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api_url = \"http://file-host/api\"\npoll_interval_secs = 30").unwrap();

        let config = load_config(
            Some(file.path()),
            CliConfigOverrides { poll_interval_secs: Some(3), ..Default::default() },
        )
        .unwrap();

        assert_eq!(config.poll_interval_secs.value, 3);
        assert_eq!(config.poll_interval_secs.source, ConfigSource::Cli);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = load_config(Some(Path::new("/nonexistent/seawatch.toml")), Default::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_api_url_fails_validation() {
        let result = load_config(
            None,
            CliConfigOverrides { api_url: Some(" / ".to_string()), ..Default::default() },
        );
        assert!(result.is_err());
    }
}
