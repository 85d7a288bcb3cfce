//! Listing query: pagination, sorting and filters.

use crate::domain::error::DomainError;
use crate::domain::rules::{PRICE_MAX, PRICE_MIN, QUANTITY_MAX};
use crate::domain::value_objects::SortOrder;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const NAME_FILTER_MAX_LEN: usize = 50;

/// Parameters for `GET /products`.
///
/// Built with the `with_*` methods and checked with [`ProductQuery::validate`]
/// before it leaves the process.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    /// Zero-based page index.
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
    pub name: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_quantity: Option<u32>,
    pub max_quantity: Option<u32>,
    pub include_out_of_stock: bool,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: vec![SortOrder::default()],
            name: None,
            min_price: None,
            max_price: None,
            min_quantity: None,
            max_quantity: None,
            include_out_of_stock: true,
        }
    }
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Replace the sort keys. An empty list keeps the default `id,asc`.
    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = if sort.is_empty() {
            vec![SortOrder::default()]
        } else {
            sort
        };
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn with_quantity_range(mut self, min: Option<u32>, max: Option<u32>) -> Self {
        self.min_quantity = min;
        self.max_quantity = max;
        self
    }

    pub fn with_include_out_of_stock(mut self, include: bool) -> Self {
        self.include_out_of_stock = include;
        self
    }

    /// The name filter after trimming, `None` when blank.
    pub fn name_filter(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Same query, other page. Used for next/previous navigation.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.size) {
            return Err(DomainError::InvalidQuery {
                field: "size",
                reason: format!("page size must be between 1 and {MAX_PAGE_SIZE}"),
            });
        }

        if let Some(name) = self.name_filter() {
            if name.chars().count() > NAME_FILTER_MAX_LEN {
                return Err(DomainError::InvalidQuery {
                    field: "name",
                    reason: format!("must be at most {NAME_FILTER_MAX_LEN} characters"),
                });
            }
        }

        for (field, price) in [("minPrice", self.min_price), ("maxPrice", self.max_price)] {
            if let Some(price) = price {
                if !(PRICE_MIN..=PRICE_MAX).contains(&price) {
                    return Err(DomainError::InvalidQuery {
                        field,
                        reason: format!("must be between {PRICE_MIN} and {PRICE_MAX}"),
                    });
                }
            }
        }

        for (field, quantity) in [
            ("minQuantity", self.min_quantity),
            ("maxQuantity", self.max_quantity),
        ] {
            if let Some(quantity) = quantity {
                if f64::from(quantity) > QUANTITY_MAX {
                    return Err(DomainError::InvalidQuery {
                        field,
                        reason: format!("must be between 0 and {QUANTITY_MAX}"),
                    });
                }
            }
        }

        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::InvalidRange {
                    field: "price",
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }

        if let (Some(min), Some(max)) = (self.min_quantity, self.max_quantity) {
            if min > max {
                return Err(DomainError::InvalidRange {
                    field: "quantity",
                    min: min.to_string(),
                    max: max.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Query-string pairs in a stable order. Each sort key becomes its own
    /// `sort` pair.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("size", self.size.to_string())];
        params.extend(self.sort.iter().map(|order| ("sort", order.to_string())));

        if let Some(name) = self.name_filter() {
            params.push(("name", name.to_string()));
        }
        if let Some(min) = self.min_price {
            params.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            params.push(("maxPrice", max.to_string()));
        }
        if let Some(min) = self.min_quantity {
            params.push(("minQuantity", min.to_string()));
        }
        if let Some(max) = self.max_quantity {
            params.push(("maxQuantity", max.to_string()));
        }
        if !self.include_out_of_stock {
            params.push(("includeOutOfStock", "false".into()));
        }

        params
    }
}
