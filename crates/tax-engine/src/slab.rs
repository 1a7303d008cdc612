//! GST Slab Decision Table

use crate::TaxError;
use data_validator::{FuelType, VehicleCategory};
use serde::{Deserialize, Serialize};

/// Flat rate of the previous regime, included in every base price (%)
pub const OLD_FLAT_RATE_PERCENT: u32 = 28;

/// Tax bracket under the new regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxSlab {
    /// Electric vehicles, any engine
    Electric,
    /// Below the displacement threshold
    Reduced,
    /// At or above the displacement threshold
    Luxury,
}

impl TaxSlab {
    /// Rate in percent
    pub fn rate_percent(&self) -> u32 {
        match self {
            TaxSlab::Electric => 5,
            TaxSlab::Reduced => 18,
            TaxSlab::Luxury => 40,
        }
    }

    /// Rate as a fraction
    pub fn rate(&self) -> f64 {
        f64::from(self.rate_percent()) / 100.0
    }
}

/// Displacement threshold (cc) for a combination the table covers
fn threshold_cc(category: VehicleCategory, fuel: &FuelType) -> Option<f64> {
    match (category, fuel) {
        (VehicleCategory::Bike, FuelType::Petrol | FuelType::PetrolCng) => Some(350.0),
        (VehicleCategory::Car, FuelType::Petrol | FuelType::PetrolCng) => Some(1200.0),
        (VehicleCategory::Car, FuelType::Diesel) => Some(1500.0),
        _ => None,
    }
}

/// Select the slab for a vehicle.
///
/// The comparison is strict: a displacement exactly at the threshold falls
/// in the luxury slab. Combinations the table does not list are an error.
pub fn slab_for(
    category: VehicleCategory,
    fuel: &FuelType,
    engine_cc: f64,
) -> Result<TaxSlab, TaxError> {
    if *fuel == FuelType::Electric {
        return Ok(TaxSlab::Electric);
    }
    let threshold = threshold_cc(category, fuel).ok_or_else(|| TaxError::UndefinedRule {
        category,
        fuel: fuel.clone(),
    })?;
    Ok(if engine_cc < threshold {
        TaxSlab::Reduced
    } else {
        TaxSlab::Luxury
    })
}
