//! Per-Category Field Selection

use data_validator::columns::{AGE, ENGINE_CC, FUEL_TYPE, KM_DRIVEN, RESALE_PRICE, TRANSMISSION};
use data_validator::VehicleCategory;

/// Which dataset columns feed a category's model.
///
/// Cars and bikes differ only in this configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Pass-through numeric fields, in column order
    pub numeric: &'static [&'static str],
    /// One-hot encoded fields, in column order
    pub categorical: &'static [&'static str],
    /// Regression target
    pub target: &'static str,
}

const BIKE_FIELDS: FieldSpec = FieldSpec {
    numeric: &[KM_DRIVEN, AGE, ENGINE_CC],
    categorical: &[FUEL_TYPE],
    target: RESALE_PRICE,
};

const CAR_FIELDS: FieldSpec = FieldSpec {
    numeric: &[KM_DRIVEN, AGE, ENGINE_CC],
    categorical: &[FUEL_TYPE, TRANSMISSION],
    target: RESALE_PRICE,
};

impl FieldSpec {
    /// Field selection for a vehicle category
    pub fn for_category(category: VehicleCategory) -> Self {
        match category {
            VehicleCategory::Car => CAR_FIELDS,
            VehicleCategory::Bike => BIKE_FIELDS,
        }
    }

    /// Every column a training dataset must provide
    pub fn required_columns(&self) -> Vec<&'static str> {
        self.numeric
            .iter()
            .chain(self.categorical)
            .chain(std::iter::once(&self.target))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_car_adds_transmission() {
        let bike = FieldSpec::for_category(VehicleCategory::Bike);
        let car = FieldSpec::for_category(VehicleCategory::Car);
        assert_eq!(bike.numeric, car.numeric);
        assert_eq!(bike.categorical, &["fuel_type"]);
        assert_eq!(car.categorical, &["fuel_type", "transmission"]);
    }

    #[test]
    fn test_required_columns() {
        let bike = FieldSpec::for_category(VehicleCategory::Bike);
        assert_eq!(
            bike.required_columns(),
            vec!["km_driven", "age", "engine_cc", "fuel_type", "resale_price"]
        );
    }
}
