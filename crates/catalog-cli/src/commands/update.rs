//! Implementation of the `catalog update` command.
//!
//! The stored product is loaded first and the given fields are laid over
//! it, so the submitted record is always complete.

use tracing::{debug, instrument};

use catalog_core::application::ProductService;

use crate::{
    cli::{ProductInput, UpdateArgs},
    commands::{advise, product_record},
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(id = %args.id))]
pub async fn execute(
    args: UpdateArgs,
    service: &ProductService,
    output: &OutputManager,
) -> CliResult<()> {
    if is_empty(&args.input) {
        return Err(CliError::InvalidInput {
            message: "nothing to update; pass at least one field or --file".into(),
            source: None,
        });
    }

    let current = output
        .with_spinner("Loading product...", service.get(&args.id))
        .await?;
    debug!(name = %current.name, "Current product loaded");

    let record = product_record(&args.input, Some(current.to_draft().to_record()))?;
    advise(&record, output)?;

    let product = output
        .with_spinner("Saving product...", service.update(&args.id, &record))
        .await?;

    output.success(&format!("Product \"{}\" updated successfully!", product.name))?;
    output.product(&product)
}

fn is_empty(input: &ProductInput) -> bool {
    input.name.is_none()
        && input.price.is_none()
        && input.quantity.is_none()
        && input.description.is_none()
        && input.file.is_none()
}
