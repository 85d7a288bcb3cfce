//! Command handlers, one module per subcommand.
//!
//! Handlers translate arguments into core calls and display results. No
//! validation rules or error classification live here.

use std::io::Read;
use std::path::Path;

use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use catalog_adapters::HttpProductGateway;
use catalog_core::application::ProductService;
use catalog_core::domain::record_recommendations;

use crate::{
    cli::ProductInput,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod completions;
pub mod config;
pub mod create;
pub mod delete;
pub mod get;
pub mod init;
pub mod list;
pub mod search;
pub mod update;
pub mod validate;

/// Build the product service over the REST gateway. Cancelling `cancel`
/// abandons every request the service has in flight.
pub fn connect(config: &AppConfig, cancel: CancellationToken) -> CliResult<ProductService> {
    let gateway = HttpProductGateway::new(config.gateway_config())?.with_cancellation(cancel);
    debug!(base_url = %gateway.base_url(), "Gateway ready");
    Ok(ProductService::new(Box::new(gateway)))
}

/// Assemble a product record from `base`, then the input file, then flags.
///
/// Values are copied as given; validation happens in the core.
pub fn product_record(input: &ProductInput, base: Option<Value>) -> CliResult<Value> {
    let mut record = match base {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };

    if let Some(path) = &input.file {
        match read_record_file(path)? {
            Value::Object(fields) => record.extend(fields),
            other => {
                return Err(CliError::InvalidInput {
                    message: format!(
                        "{} must contain a JSON object, found {}",
                        path.display(),
                        json_kind(&other)
                    ),
                    source: None,
                });
            }
        }
    }

    if let Some(name) = &input.name {
        record.insert("name".into(), Value::from(name.as_str()));
    }
    if let Some(price) = input.price {
        record.insert("price".into(), Value::from(price));
    }
    if let Some(quantity) = input.quantity {
        record.insert("quantity".into(), Value::from(quantity));
    }
    if let Some(description) = &input.description {
        record.insert("description".into(), Value::from(description.as_str()));
    }

    Ok(Value::Object(record))
}

fn read_record_file(path: &Path) -> CliResult<Value> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .with_cli_context(|| "Failed to read product from stdin")?;
        text
    } else {
        std::fs::read_to_string(path)
            .with_cli_context(|| format!("Failed to read '{}'", path.display()))?
    };

    serde_json::from_str(&text).map_err(|e| CliError::InvalidInput {
        message: format!("{} is not valid JSON: {e}", path.display()),
        source: Some(Box::new(e)),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Show the stocking advice for `record` as warnings. Advice never blocks.
pub fn advise(record: &Value, output: &OutputManager) -> CliResult<()> {
    for advice in record_recommendations(record) {
        output.warning(advice)?;
    }
    Ok(())
}
