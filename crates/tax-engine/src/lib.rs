//! GST Price Calculator
//!
//! Re-prices a new vehicle from the old flat 28% GST to the revised
//! displacement-based slabs and reports the difference.

mod currency;
mod quote;
mod slab;

pub use currency::{format_rupees, RUPEE};
pub use quote::{compute, PriceComparison, PriceDirection, TaxQuote};
pub use slab::{slab_for, TaxSlab, OLD_FLAT_RATE_PERCENT};

use data_validator::{FuelType, ValidationError, VehicleCategory};
use thiserror::Error;

/// Errors while pricing a new vehicle
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaxError {
    #[error("No GST rule for {category} with fuel '{fuel}'")]
    UndefinedRule {
        category: VehicleCategory,
        fuel: FuelType,
    },
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),
}
