//! Implementation of the `catalog get` command.

use tracing::instrument;

use catalog_core::application::ProductService;

use crate::{cli::GetArgs, error::CliResult, output::OutputManager};

#[instrument(skip_all, fields(id = %args.id))]
pub async fn execute(
    args: GetArgs,
    service: &ProductService,
    output: &OutputManager,
) -> CliResult<()> {
    let product = output
        .with_spinner("Loading product...", service.get(&args.id))
        .await?;
    output.product(&product)
}
