//! Implementation of the `catalog validate` command.
//!
//! Runs the same checks `create` and `update` apply, without contacting
//! the backend.

use serde_json::Value;
use tracing::{debug, instrument};

use catalog_core::application::ApplicationError;
use catalog_core::domain::{ValidationResult, product_schema, validate_product};

use crate::{
    cli::ValidateArgs,
    commands::{advise, product_record},
    error::CliResult,
    output::OutputManager,
};

#[instrument(skip_all, fields(field = ?args.field))]
pub fn execute(args: ValidateArgs, output: &OutputManager) -> CliResult<()> {
    let record = product_record(&args.input, None)?;

    if let Some(field) = &args.field {
        let value = record.get(field.as_str()).cloned().unwrap_or(Value::Null);
        return match product_schema().validate_field(field, &value) {
            ValidationResult::Valid(coerced) => {
                debug!(%field, "Field is valid");
                if output.is_json() {
                    output.json(&coerced)
                } else {
                    output.success(&format!("{field} is valid"))?;
                    Ok(())
                }
            }
            ValidationResult::Invalid(issues) => {
                Err(ApplicationError::InvalidProduct { issues }.into())
            }
        };
    }

    match validate_product(&record) {
        ValidationResult::Valid(draft) => {
            debug!("Product is valid");
            advise(&record, output)?;
            if output.is_json() {
                output.json(&draft)
            } else {
                output.success("Product is valid")?;
                Ok(())
            }
        }
        ValidationResult::Invalid(issues) => Err(ApplicationError::InvalidProduct { issues }.into()),
    }
}
