//! One page of a server-side paginated listing.

use serde::{Deserialize, Serialize};

/// A page of results. `number` is zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub size: u32,
    pub number: u32,
}

impl<T> Page<T> {
    /// The page shown when a listing fails to load.
    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            size: 0,
            number: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        self.total_pages == 0 || self.number + 1 >= self.total_pages
    }

    /// Zero-based index of the next page, if any.
    pub fn next_number(&self) -> Option<u32> {
        (!self.is_last()).then_some(self.number + 1)
    }
}
