//! New-Vehicle Price Under the Revised GST

use crate::slab::{slab_for, TaxSlab, OLD_FLAT_RATE_PERCENT};
use crate::TaxError;
use data_validator::{FuelType, Validator, VehicleCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which way the price moved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceDirection {
    /// New price is computed at the reduced slab
    Saved,
    /// New price is computed at the luxury slab
    Extra,
    /// Price carried over unchanged (electric)
    Flat,
}

impl PriceDirection {
    /// Message shown alongside the quote
    pub fn message(&self) -> &'static str {
        match self {
            PriceDirection::Saved => "Hurray! GST reduced! You saved on your new price.",
            PriceDirection::Extra => "Oops! Higher GST applied! Need to stretch your budget.",
            PriceDirection::Flat => "Electric vehicle GST is standard 5%.",
        }
    }
}

/// The two bars of an old-vs-new price chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceComparison {
    pub old_price: f64,
    pub new_price: f64,
    /// New price is strictly lower
    pub cheaper: bool,
}

/// Result of a new-vehicle price calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxQuote {
    pub category: VehicleCategory,
    pub fuel_type: FuelType,
    pub engine_cc: f64,
    /// Price including the old 28% rate
    pub base_price: f64,
    /// Base with the old rate backed out (None for electric)
    pub pre_tax_price: Option<f64>,
    pub new_price: f64,
    pub slab: TaxSlab,
    pub rate_percent: u32,
    pub rate: f64,
    /// `base - new` when saved, `new - base` when extra, 0 when flat
    pub delta: f64,
    pub direction: PriceDirection,
    pub message: String,
    pub comparison: PriceComparison,
}

/// Compute the new-regime price for a vehicle whose `base_price` includes
/// the old flat rate.
///
/// Electric vehicles keep `base_price` unchanged while reporting the 5%
/// rate. This mirrors the established pricing behavior even though no 5%
/// re-pricing is applied.
pub fn compute(
    category: VehicleCategory,
    fuel: &FuelType,
    engine_cc: f64,
    base_price: f64,
) -> Result<TaxQuote, TaxError> {
    Validator::new().validate_new_vehicle(engine_cc, base_price)?;
    let slab = slab_for(category, fuel, engine_cc)?;

    let (pre_tax_price, new_price, direction, delta) = match slab {
        TaxSlab::Electric => (None, base_price, PriceDirection::Flat, 0.0),
        TaxSlab::Reduced | TaxSlab::Luxury => {
            let pre_tax = base_price * 100.0 / f64::from(100 + OLD_FLAT_RATE_PERCENT);
            let new_price = pre_tax * f64::from(100 + slab.rate_percent()) / 100.0;
            if slab == TaxSlab::Reduced {
                (Some(pre_tax), new_price, PriceDirection::Saved, base_price - new_price)
            } else {
                (Some(pre_tax), new_price, PriceDirection::Extra, new_price - base_price)
            }
        }
    };

    debug!(
        "{} {} {}cc: base {:.2} -> {:.2} at {}%",
        category,
        fuel,
        engine_cc,
        base_price,
        new_price,
        slab.rate_percent()
    );

    Ok(TaxQuote {
        category,
        fuel_type: fuel.clone(),
        engine_cc,
        base_price,
        pre_tax_price,
        new_price,
        slab,
        rate_percent: slab.rate_percent(),
        rate: slab.rate(),
        delta,
        direction,
        message: direction.message().to_string(),
        comparison: PriceComparison {
            old_price: base_price,
            new_price,
            cheaper: new_price < base_price,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_validator::ValidationError;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_car_petrol_small_engine_saves() {
        let quote = compute(VehicleCategory::Car, &FuelType::Petrol, 1000.0, 280_000.0).unwrap();
        assert!(close(quote.pre_tax_price.unwrap(), 218_750.0));
        assert_eq!(quote.rate_percent, 18);
        assert!(close(quote.new_price, 258_125.0));
        assert_eq!(quote.direction, PriceDirection::Saved);
        assert!(close(quote.delta, 21_875.0));
        assert!(quote.comparison.cheaper);
    }

    #[test]
    fn test_car_petrol_large_engine_costs_extra() {
        let quote = compute(VehicleCategory::Car, &FuelType::Petrol, 2000.0, 280_000.0).unwrap();
        assert!(close(quote.pre_tax_price.unwrap(), 218_750.0));
        assert_eq!(quote.rate_percent, 40);
        assert!(close(quote.new_price, 306_250.0));
        assert_eq!(quote.direction, PriceDirection::Extra);
        assert!(close(quote.delta, 26_250.0));
        assert!(!quote.comparison.cheaper);
    }

    #[test]
    fn test_bike_petrol() {
        let small = compute(VehicleCategory::Bike, &FuelType::Petrol, 150.0, 140_000.0).unwrap();
        assert!(close(small.pre_tax_price.unwrap(), 109_375.0));
        assert_eq!(small.rate_percent, 18);
        assert!(close(small.new_price, 129_062.5));
        assert_eq!(small.direction, PriceDirection::Saved);

        let large = compute(VehicleCategory::Bike, &FuelType::Petrol, 400.0, 140_000.0).unwrap();
        assert_eq!(large.rate_percent, 40);
        assert!(close(large.new_price, 153_125.0));
        assert_eq!(large.direction, PriceDirection::Extra);
    }

    #[test]
    fn test_electric_price_unchanged() {
        let quote = compute(VehicleCategory::Car, &FuelType::Electric, 0.0, 1_500_000.0).unwrap();
        assert_eq!(quote.new_price, 1_500_000.0);
        assert_eq!(quote.pre_tax_price, None);
        assert_eq!(quote.rate_percent, 5);
        assert_eq!(quote.direction, PriceDirection::Flat);
        assert_eq!(quote.delta, 0.0);
        assert_eq!(quote.message, "Electric vehicle GST is standard 5%.");
    }

    #[test]
    fn test_cng_at_car_threshold() {
        let quote = compute(VehicleCategory::Car, &FuelType::PetrolCng, 1500.0, 300_000.0).unwrap();
        assert_eq!(quote.rate_percent, 40);
        let expected = 300_000.0 / 1.28 * 1.40;
        assert!((quote.new_price - expected).abs() < 1e-6);
        assert!(close(quote.delta, expected - 300_000.0));
    }

    #[test]
    fn test_boundaries_use_high_slab() {
        let bike = compute(VehicleCategory::Bike, &FuelType::Petrol, 350.0, 100_000.0).unwrap();
        let car = compute(VehicleCategory::Car, &FuelType::Petrol, 1200.0, 100_000.0).unwrap();
        let diesel = compute(VehicleCategory::Car, &FuelType::Diesel, 1500.0, 100_000.0).unwrap();
        for quote in [bike, car, diesel] {
            assert_eq!(quote.direction, PriceDirection::Extra);
        }
    }

    #[test]
    fn test_invalid_inputs_rejected_before_rules() {
        assert!(matches!(
            compute(VehicleCategory::Bike, &FuelType::Diesel, 150.0, 0.0),
            Err(TaxError::Validation(ValidationError::NotPositive { .. }))
        ));
        assert!(matches!(
            compute(VehicleCategory::Car, &FuelType::Petrol, -1.0, 100_000.0),
            Err(TaxError::Validation(ValidationError::Negative { .. }))
        ));
    }

    #[test]
    fn test_undefined_rule() {
        assert!(matches!(
            compute(VehicleCategory::Bike, &FuelType::Diesel, 150.0, 100_000.0),
            Err(TaxError::UndefinedRule { .. })
        ));
    }
}
