//! Planogram check: does a category's assortment fit its shelf fixture?
//!
//! Product widths are not part of the product dimension and must be supplied
//! by the caller.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use retailpulse_core::{AnalyticsError, ProductId};

use crate::record::Product;

pub const DEFAULT_FACINGS: u32 = 2;

/// Fixture length in inches, by category keyword.
pub fn shelf_limit_inches(category: &str) -> f64 {
    let category = category.to_lowercase();
    if category.contains("grocer") {
        192.0
    } else if category.contains("apparel") || category.contains("cloth") {
        144.0
    } else if category.contains("home") {
        96.0
    } else {
        48.0
    }
}

/// Shelf width of one product, as supplied by merchandising.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfWidth {
    pub product_id: ProductId,
    pub width_inches: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanogramFit {
    pub category: String,
    pub products: usize,
    pub fixture_inches: f64,
    pub required_inches: f64,
    /// Negative when the assortment overflows the fixture.
    pub spare_inches: f64,
    pub fits: bool,
}

pub fn widths_by_product(widths: &[ShelfWidth]) -> HashMap<ProductId, f64> {
    widths.iter().map(|w| (w.product_id, w.width_inches)).collect()
}

/// Space needed for `facings` of every product in `category` against the
/// category's fixture.
///
/// Every product in the category needs a positive, finite width.
pub fn validate_planogram(
    catalog: &[Product],
    category: &str,
    widths: &HashMap<ProductId, f64>,
    facings: u32,
) -> Result<PlanogramFit, AnalyticsError> {
    let members: Vec<&Product> = catalog.iter().filter(|p| p.category == category).collect();
    if members.is_empty() {
        return Err(AnalyticsError::invalid_input(format!(
            "no products in category {category:?}"
        )));
    }

    let mut missing = Vec::new();
    let mut total_width = 0.0;
    for product in &members {
        match widths.get(&product.product_id) {
            Some(&w) if w.is_finite() && w > 0.0 => total_width += w,
            Some(&w) => {
                return Err(AnalyticsError::invalid_input(format!(
                    "width for product {} must be positive, got {w}",
                    product.product_id
                )));
            }
            None => missing.push(product.product_id.to_string()),
        }
    }
    if !missing.is_empty() {
        return Err(AnalyticsError::invalid_input(format!(
            "no shelf width for product(s) {}",
            missing.join(", ")
        )));
    }

    let fixture_inches = shelf_limit_inches(category);
    let required_inches = total_width * f64::from(facings);
    Ok(PlanogramFit {
        category: category.to_string(),
        products: members.len(),
        fixture_inches,
        required_inches,
        spare_inches: fixture_inches - required_inches,
        fits: required_inches <= fixture_inches,
    })
}
