//! `catalog config`: inspect the effective configuration.

use serde_json::Value;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

pub fn execute(
    cmd: ConfigCommands,
    global: &GlobalArgs,
    config: &AppConfig,
    output: &OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = config_value(config, &key)?;
            if output.is_json() {
                output.json(&value)?;
            } else {
                output.emit(&display_value(&value))?;
            }
        }

        ConfigCommands::List => {
            if output.is_json() {
                output.json(config)?;
            } else {
                let serialised =
                    toml::to_string_pretty(config).map_err(|e| CliError::ConfigError {
                        message: format!("Failed to serialise config: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                output.header("Current Configuration:")?;
                output.emit(serialised.trim_end())?;
            }
        }

        ConfigCommands::Path => {
            output.emit(&AppConfig::active_path(global).display().to_string())?;
        }
    }

    Ok(())
}

/// Look up a dotted key such as `api.base_url`.
fn config_value(config: &AppConfig, key: &str) -> CliResult<Value> {
    let root = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise config: {e}"),
        source: Some(Box::new(e)),
    })?;

    key.split('.')
        .try_fold(&root, |node, part| node.get(part))
        .cloned()
        .ok_or_else(|| CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        })
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        let value = config_value(&cfg, "api.base_url").unwrap();
        assert_eq!(display_value(&value), "http://localhost:8080/api/v1");
    }

    #[test]
    fn get_whole_section() {
        let cfg = AppConfig::default();
        let value = config_value(&cfg, "search").unwrap();
        assert_eq!(value["debounce_ms"], 300);
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            config_value(&cfg, "api.nope"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn get_no_color_default() {
        let cfg = AppConfig::default();
        let value = config_value(&cfg, "output.no_color").unwrap();
        assert_eq!(display_value(&value), "false");
    }

    #[test]
    fn unset_log_file_is_unknown() {
        let cfg = AppConfig::default();
        assert!(config_value(&cfg, "logging.file").is_err());
    }
}
