//! Domain value objects: ProductId, SortDirection, SortOrder.
//!
//! Pure value types with string forms and `FromStr` parsers. Parsing
//! failures are [`DomainError`]s so the CLI can offer suggestions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

// ── ProductId ────────────────────────────────────────────────────────────────

/// The backend's public identifier for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// A fresh random id, used by the in-memory gateway.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ProductId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidProductId(s.to_string()))
    }
}

// ── SortDirection ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn reversed(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SortOrder ────────────────────────────────────────────────────────────────

/// One `property,direction` sort key, as the backend's `sort` parameter
/// expects it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortOrder {
    property: String,
    direction: SortDirection,
}

impl SortOrder {
    pub fn new(property: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            property: property.into(),
            direction,
        }
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Asc)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(property, SortDirection::Desc)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }
}

impl Default for SortOrder {
    fn default() -> Self {
        Self::asc("id")
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.property, self.direction)
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    /// Accepts `property` or `property,asc|desc`; direction is
    /// case-insensitive and defaults to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidSort(s.to_string());

        let (property, direction) = match s.split_once(',') {
            Some((property, direction)) => (property.trim(), Some(direction.trim())),
            None => (s.trim(), None),
        };

        let valid_property = !property.is_empty()
            && property
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid_property {
            return Err(invalid());
        }

        let direction = match direction.map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => SortDirection::Asc,
            Some("desc") => SortDirection::Desc,
            Some(_) => return Err(invalid()),
        };

        Ok(Self::new(property, direction))
    }
}

impl Serialize for SortOrder {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SortOrder {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_id_parses_uuid() {
        let id: ProductId = "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f".parse().unwrap();
        assert_eq!(id.to_string(), "3f2c8a1e-5b7d-4c1a-9e0f-2a6b8c4d1e3f");
        assert!(matches!(
            "42".parse::<ProductId>(),
            Err(DomainError::InvalidProductId(raw)) if raw == "42"
        ));
    }

    #[test]
    fn sort_order_parses_with_and_without_direction() {
        assert_eq!("price,DESC".parse::<SortOrder>().unwrap(), SortOrder::desc("price"));
        assert_eq!("name".parse::<SortOrder>().unwrap(), SortOrder::asc("name"));
        assert_eq!(SortOrder::default().to_string(), "id,asc");
    }

    #[test]
    fn sort_order_rejects_garbage() {
        assert!("".parse::<SortOrder>().is_err());
        assert!("price,up".parse::<SortOrder>().is_err());
        assert!("price;drop".parse::<SortOrder>().is_err());
    }
}
