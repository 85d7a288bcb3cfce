//! Product Service - main application orchestrator.
//!
//! Every use case follows the same path:
//! 1. Validate input locally (record schema or query bounds)
//! 2. Call the gateway
//! 3. Normalize a failed exchange into a `NormalizedError`
//!
//! Invalid input never reaches the gateway.

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError, GatewayError,
        normalizer::normalize,
        ports::ProductGateway,
    },
    domain::{Page, Product, ProductDraft, ProductId, ProductQuery, validate_product},
    error::{CatalogError, CatalogResult},
};

/// Product use cases over a [`ProductGateway`].
pub struct ProductService {
    gateway: Box<dyn ProductGateway>,
}

impl ProductService {
    /// Create a new product service with the given gateway.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use catalog_core::application::{ProductService, ports::*};
    ///
    /// let service = ProductService::new(
    ///     gateway, // impl ProductGateway
    /// );
    /// ```
    pub fn new(gateway: Box<dyn ProductGateway>) -> Self {
        Self { gateway }
    }

    /// Load one page of products.
    #[instrument(skip_all, fields(page = query.page, size = query.size))]
    pub async fn list(&self, query: &ProductQuery) -> CatalogResult<Page<Product>> {
        query.validate()?;
        let page = self.gateway.list(query).await.map_err(remote)?;
        debug!(
            returned = page.content.len(),
            total = page.total_elements,
            "Page loaded"
        );
        Ok(page)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn get(&self, id: &ProductId) -> CatalogResult<Product> {
        self.gateway.get(id).await.map_err(remote)
    }

    /// Validate a product record and create it.
    #[instrument(skip_all)]
    pub async fn create(&self, record: &Value) -> CatalogResult<Product> {
        let draft = Self::checked(record)?;
        let product = self.gateway.create(&draft).await.map_err(remote)?;
        info!(name = %product.name, "Product created");
        Ok(product)
    }

    /// Validate a product record and replace the stored product with it.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update(&self, id: &ProductId, record: &Value) -> CatalogResult<Product> {
        let draft = Self::checked(record)?;
        let product = self.gateway.update(id, &draft).await.map_err(remote)?;
        info!(name = %product.name, "Product updated");
        Ok(product)
    }

    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete(&self, id: &ProductId) -> CatalogResult<()> {
        self.gateway.delete(id).await.map_err(remote)?;
        info!("Product deleted");
        Ok(())
    }

    fn checked(record: &Value) -> CatalogResult<ProductDraft> {
        validate_product(record).into_result().map_err(|issues| {
            debug!(issues = issues.len(), "Submission blocked by local validation");
            ApplicationError::InvalidProduct { issues }.into()
        })
    }
}

fn remote(err: GatewayError) -> CatalogError {
    match err {
        GatewayError::Failed(failure) => ApplicationError::Remote(normalize(&failure)).into(),
        GatewayError::Cancelled => ApplicationError::Cancelled.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{ErrorType, HttpFailure, ports::MockProductGateway};
    use crate::domain::{DomainError, IssueCode};
    use serde_json::json;
    use tokio_test::block_on;

    fn stored(draft: &ProductDraft) -> Product {
        Product {
            public_id: Some(ProductId::random()),
            name: draft.name.clone(),
            price: draft.price,
            quantity: draft.quantity,
            description: draft.description.clone(),
        }
    }

    #[test]
    fn create_sends_trimmed_draft() {
        let mut gateway = MockProductGateway::new();
        gateway
            .expect_create()
            .withf(|draft| draft.name == "Desk lamp" && draft.quantity == 5)
            .times(1)
            .returning(|draft| Ok(stored(draft)));

        let service = ProductService::new(Box::new(gateway));
        let product = block_on(service.create(&json!({
            "name": "  Desk lamp ",
            "price": 19.99,
            "quantity": 5
        })))
        .unwrap();

        assert_eq!(product.name, "Desk lamp");
    }

    #[test]
    fn invalid_product_never_reaches_gateway() {
        let mut gateway = MockProductGateway::new();
        gateway.expect_create().never();

        let service = ProductService::new(Box::new(gateway));
        let err = block_on(service.create(&json!({
            "name": "Pen",
            "price": 1.5,
            "quantity": 500
        })))
        .unwrap_err();

        let CatalogError::Application(ApplicationError::InvalidProduct { issues }) = &err else {
            panic!("expected InvalidProduct, got {err:?}");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, IssueCode::Custom);
        assert_eq!(issues[0].path, "quantity");
    }

    #[test]
    fn gateway_failure_is_normalized() {
        let mut gateway = MockProductGateway::new();
        gateway.expect_get().returning(|_| {
            Err(HttpFailure::response(
                404,
                Some(json!({
                    "type": "https://api.example.com/problems/product-not-found",
                    "title": "Product Not Found",
                    "status": 404,
                    "detail": "No product with that id"
                })),
                "Not Found",
            )
            .into())
        });

        let service = ProductService::new(Box::new(gateway));
        let err = block_on(service.get(&ProductId::random())).unwrap_err();

        let CatalogError::Application(ApplicationError::Remote(normalized)) = &err else {
            panic!("expected Remote, got {err:?}");
        };
        assert_eq!(normalized.error_type, ErrorType::NotFound);
        assert_eq!(normalized.message, "No product with that id");
    }

    #[test]
    fn cancellation_is_not_normalized() {
        let mut gateway = MockProductGateway::new();
        gateway
            .expect_delete()
            .returning(|_| Err(GatewayError::Cancelled));

        let service = ProductService::new(Box::new(gateway));
        let err = block_on(service.delete(&ProductId::random())).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn invalid_query_is_rejected_locally() {
        let mut gateway = MockProductGateway::new();
        gateway.expect_list().never();

        let service = ProductService::new(Box::new(gateway));
        let err = block_on(service.list(&ProductQuery::new().with_size(500))).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Domain(DomainError::InvalidQuery { field: "size", .. })
        ));
    }

    #[test]
    fn update_passes_id_through() {
        let id = ProductId::random();
        let mut gateway = MockProductGateway::new();
        gateway
            .expect_update()
            .withf(move |target, _| *target == id)
            .returning(|_, draft| Ok(stored(draft)));

        let service = ProductService::new(Box::new(gateway));
        let product = block_on(service.update(&id, &json!({
            "name": "Lamp",
            "price": 20,
            "quantity": 1,
            "description": "Brass"
        })))
        .unwrap();
        assert_eq!(product.description.as_deref(), Some("Brass"));
    }
}
