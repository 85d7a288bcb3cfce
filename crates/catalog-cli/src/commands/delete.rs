//! Implementation of the `catalog delete` command.

use tracing::{debug, info, instrument};

use catalog_core::application::ProductService;
use catalog_core::domain::Product;

use crate::{
    cli::DeleteArgs,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(id = %args.id))]
pub async fn execute(
    args: DeleteArgs,
    service: &ProductService,
    output: &OutputManager,
) -> CliResult<()> {
    if !args.yes {
        let product = output
            .with_spinner("Loading product...", service.get(&args.id))
            .await?;
        if !confirm(&product)? {
            debug!("Deletion declined");
            output.info("Nothing deleted")?;
            return Ok(());
        }
    }

    output
        .with_spinner("Deleting product...", service.delete(&args.id))
        .await?;
    info!("Product deleted");

    output.success(&format!("Product {} deleted", args.id))?;
    Ok(())
}

#[cfg(feature = "interactive")]
fn confirm(product: &Product) -> CliResult<bool> {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Are you sure you want to delete the product \"{}\"?",
            product.name
        ))
        .default(false)
        .interact()
        .map_err(|e| CliError::IoError {
            message: "Failed to read confirmation".into(),
            source: std::io::Error::other(e),
        })
}

#[cfg(not(feature = "interactive"))]
fn confirm(_product: &Product) -> CliResult<bool> {
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_adapters::MemoryGateway;
    use catalog_core::application::HttpFailure;
    use catalog_core::domain::ProductId;

    use crate::config::AppConfig;

    fn run(gateway: &MemoryGateway, args: DeleteArgs) -> CliResult<()> {
        let service = ProductService::new(Box::new(gateway.clone()));
        let output = OutputManager::new(&Default::default(), &AppConfig::default());
        tokio_test::block_on(execute(args, &service, &output))
    }

    #[test]
    fn yes_skips_the_prompt() {
        let gateway = MemoryGateway::with_products([Product {
            public_id: None,
            name: "Desk lamp".into(),
            price: 19.99,
            quantity: 4,
            description: None,
        }]);
        let id = gateway.products()[0].public_id.unwrap();

        run(&gateway, DeleteArgs { id, yes: true }).unwrap();
        assert!(gateway.products().is_empty());
        assert_eq!(gateway.calls(), 1);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let gateway = MemoryGateway::new();
        let err = run(
            &gateway,
            DeleteArgs {
                id: ProductId::random(),
                yes: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn unknown_id_fails_before_prompting() {
        let gateway = MemoryGateway::new();
        let err = run(
            &gateway,
            DeleteArgs {
                id: ProductId::random(),
                yes: false,
            },
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn network_failure_maps_to_network_exit() {
        let gateway = MemoryGateway::new();
        gateway.fail_next(HttpFailure::transport("connection refused"));
        let err = run(
            &gateway,
            DeleteArgs {
                id: ProductId::random(),
                yes: true,
            },
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 6);
    }
}
