//! In-memory product gateway for testing and offline use.
//!
//! Behaves like the REST backend: filters, sorts and paginates listings,
//! rejects duplicate names, and answers unknown ids with the same
//! problem-detail documents the server sends.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::{Value, json};

use catalog_core::application::ports::{GatewayError, GatewayResult, HttpFailure, ProductGateway};
use catalog_core::domain::{
    Page, Product, ProductDraft, ProductId, ProductQuery, SortDirection, SortOrder,
};

const PROBLEM_BASE: &str = "https://api.productmanagement.com.br";

/// In-memory gateway. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemoryGateway {
    inner: Arc<RwLock<MemoryGatewayInner>>,
}

#[derive(Debug, Default)]
struct MemoryGatewayInner {
    products: Vec<Product>,
    /// Failures returned, in order, by the next calls.
    scripted: VecDeque<GatewayError>,
    calls: usize,
}

impl MemoryGateway {
    /// Create a new empty gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a gateway holding `products`. Products without an id get one.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let products = products
            .into_iter()
            .map(|mut p| {
                p.public_id.get_or_insert_with(ProductId::random);
                p
            })
            .collect();
        Self {
            inner: Arc::new(RwLock::new(MemoryGatewayInner {
                products,
                ..MemoryGatewayInner::default()
            })),
        }
    }

    /// Make the next call fail with `error` (testing helper).
    pub fn fail_next(&self, error: impl Into<GatewayError>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.scripted.push_back(error.into());
        }
    }

    /// Snapshot of stored products, in insertion order.
    pub fn products(&self) -> Vec<Product> {
        self.inner
            .read()
            .map(|inner| inner.products.clone())
            .unwrap_or_default()
    }

    /// Number of calls received, including failed ones.
    pub fn calls(&self) -> usize {
        self.inner.read().map(|inner| inner.calls).unwrap_or_default()
    }

    fn with_store<T>(
        &self,
        op: impl FnOnce(&mut Vec<Product>) -> GatewayResult<T>,
    ) -> GatewayResult<T> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| HttpFailure::transport("in-memory product store is poisoned"))?;
        inner.calls += 1;
        if let Some(error) = inner.scripted.pop_front() {
            return Err(error);
        }
        op(&mut inner.products)
    }
}

#[async_trait]
impl ProductGateway for MemoryGateway {
    async fn list(&self, query: &ProductQuery) -> GatewayResult<Page<Product>> {
        self.with_store(|products| {
            let mut matching: Vec<Product> = products
                .iter()
                .filter(|p| matches_query(p, query))
                .cloned()
                .collect();
            matching.sort_by(|a, b| compare(a, b, &query.sort));
            Ok(paginate(matching, query.page, query.size))
        })
    }

    async fn get(&self, id: &ProductId) -> GatewayResult<Product> {
        self.with_store(|products| {
            products
                .iter()
                .find(|p| p.public_id.as_ref() == Some(id))
                .cloned()
                .ok_or_else(|| not_found(id))
        })
    }

    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        self.with_store(|products| {
            if products.iter().any(|p| same_name(&p.name, &draft.name)) {
                return Err(already_exists(&draft.name));
            }
            let product = stored(ProductId::random(), draft);
            products.push(product.clone());
            Ok(product)
        })
    }

    async fn update(&self, id: &ProductId, draft: &ProductDraft) -> GatewayResult<Product> {
        self.with_store(|products| {
            let taken = products
                .iter()
                .any(|p| p.public_id.as_ref() != Some(id) && same_name(&p.name, &draft.name));
            let slot = products
                .iter_mut()
                .find(|p| p.public_id.as_ref() == Some(id))
                .ok_or_else(|| not_found(id))?;
            if taken {
                return Err(already_exists(&draft.name));
            }
            *slot = stored(*id, draft);
            Ok(slot.clone())
        })
    }

    async fn delete(&self, id: &ProductId) -> GatewayResult<()> {
        self.with_store(|products| {
            let index = products
                .iter()
                .position(|p| p.public_id.as_ref() == Some(id))
                .ok_or_else(|| not_found(id))?;
            products.remove(index);
            Ok(())
        })
    }
}

fn stored(id: ProductId, draft: &ProductDraft) -> Product {
    Product {
        public_id: Some(id),
        name: draft.name.clone(),
        price: draft.price,
        quantity: draft.quantity,
        description: draft.description.clone(),
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn matches_query(product: &Product, query: &ProductQuery) -> bool {
    let name_ok = query.name_filter().is_none_or(|needle| {
        product
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    });
    let price_ok = query.min_price.is_none_or(|min| product.price >= min)
        && query.max_price.is_none_or(|max| product.price <= max);
    let quantity_ok = query.min_quantity.is_none_or(|min| product.quantity >= min)
        && query.max_quantity.is_none_or(|max| product.quantity <= max);
    let stock_ok = query.include_out_of_stock || product.quantity > 0;

    name_ok && price_ok && quantity_ok && stock_ok
}

fn compare(a: &Product, b: &Product, sort: &[SortOrder]) -> Ordering {
    sort.iter()
        .map(|order| {
            let ordering = match order.property() {
                "name" => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                "price" => a.price.total_cmp(&b.price),
                "quantity" => a.quantity.cmp(&b.quantity),
                "description" => a.description.cmp(&b.description),
                // Ids are random, so `id` keeps insertion order.
                _ => Ordering::Equal,
            };
            match order.direction() {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

fn paginate(items: Vec<Product>, page: u32, size: u32) -> Page<Product> {
    let size = size.max(1);
    let total_elements = items.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size)) as u32;
    let content = items
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();

    Page {
        content,
        total_elements,
        total_pages,
        size,
        number: page,
    }
}

fn problem(status: u16, key: &str, title: &str, detail: String, extra: (&str, Value)) -> GatewayError {
    let mut body = json!({
        "type": format!("{PROBLEM_BASE}/{key}"),
        "title": title,
        "status": status,
        "detail": detail,
    });
    body[extra.0] = extra.1;
    HttpFailure::response(status, Some(body), title).into()
}

fn not_found(id: &ProductId) -> GatewayError {
    problem(
        404,
        "product-not-found",
        "Product Not Found",
        format!("Product with id {id} was not found"),
        ("productId", json!(id.to_string())),
    )
}

fn already_exists(name: &str) -> GatewayError {
    problem(
        409,
        "product-already-exists",
        "Product Already Exists",
        format!("A product named '{name}' already exists"),
        ("productName", json!(name)),
    )
}
