//! Implementation of the `catalog create` command.

use tracing::instrument;

use catalog_core::application::ProductService;

use crate::{
    cli::CreateArgs,
    commands::{advise, product_record},
    error::CliResult,
    output::OutputManager,
};

/// Validate the assembled record locally, then submit it. Nothing is sent
/// when validation fails.
#[instrument(skip_all)]
pub async fn execute(
    args: CreateArgs,
    service: &ProductService,
    output: &OutputManager,
) -> CliResult<()> {
    let record = product_record(&args.input, None)?;
    advise(&record, output)?;

    let product = output
        .with_spinner("Creating product...", service.create(&record))
        .await?;

    output.success(&format!("Product \"{}\" created successfully!", product.name))?;
    output.product(&product)
}
