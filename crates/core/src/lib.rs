//! `retailpulse-core` — shared building blocks.
//!
//! Identifiers and error types used by the metrics engine and the
//! data-access collaborators around it (no IO here).

pub mod error;
pub mod id;

pub use error::{AnalyticsError, DataAccessError, DataAccessResult};
pub use id::{PairKey, ProductId, StoreId};
