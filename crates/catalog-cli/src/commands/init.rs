//! `catalog init`: write a configuration file holding the defaults.

use tracing::info;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(args: InitArgs, output: &OutputManager) -> CliResult<()> {
    let path = args.path.unwrap_or_else(AppConfig::config_path);

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    let toml = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }
    std::fs::write(&path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))?;

    info!(path = %path.display(), "Config written");
    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}
