//! Strongly-typed identifiers used across the workspace.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DataAccessError;

/// Identifier of a store (`dim_store.store_id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(i64);

/// Identifier of a product (`dim_product.product_id`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(i64);

macro_rules! impl_int_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = DataAccessError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DataAccessError::decode(format!("{}: {}", $name, e)))?;
                Ok(Self(raw))
            }
        }
    };
}

impl_int_newtype!(StoreId, "StoreId");
impl_int_newtype!(ProductId, "ProductId");

/// Join key for every per-pair computation: one store carrying one product.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    pub store_id: StoreId,
    pub product_id: ProductId,
}

impl PairKey {
    pub const fn new(store_id: StoreId, product_id: ProductId) -> Self {
        Self {
            store_id,
            product_id,
        }
    }
}

impl core::fmt::Display for PairKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "store={}/product={}", self.store_id, self.product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_integers() {
        let id: StoreId = " 42 ".parse().unwrap();
        assert_eq!(id, StoreId::new(42));
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<ProductId>().unwrap_err();
        match err {
            DataAccessError::Decode(msg) if msg.starts_with("ProductId") => {}
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn pair_keys_order_by_store_then_product() {
        let a = PairKey::new(StoreId::new(1), ProductId::new(9));
        let b = PairKey::new(StoreId::new(2), ProductId::new(1));
        assert!(a < b);
        assert_eq!(a.to_string(), "store=1/product=9");
    }
}
