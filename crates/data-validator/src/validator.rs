//! Input Range Checking

use crate::error::ValidationError;
use crate::record::{VehicleCategory, VehicleQuery};

/// Validator for user-entered vehicle attributes.
///
/// All checks run before any computation so that a bad request never
/// reaches the models.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Value must be finite and >= 0
    pub fn validate_non_negative(
        &self,
        field: &'static str,
        value: f64,
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            Err(ValidationError::NotFinite { field })
        } else if value < 0.0 {
            Err(ValidationError::Negative { field, value })
        } else {
            Ok(())
        }
    }

    /// Value must be finite and > 0
    pub fn validate_positive(&self, field: &'static str, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            Err(ValidationError::NotFinite { field })
        } else if value <= 0.0 {
            Err(ValidationError::NotPositive { field, value })
        } else {
            Ok(())
        }
    }

    /// Validate a used-vehicle query
    pub fn validate_query(&self, query: &VehicleQuery) -> Result<(), ValidationError> {
        self.validate_non_negative("km_driven", query.km_driven)?;
        self.validate_non_negative("age", query.age)?;
        self.validate_non_negative("engine_cc", query.engine_cc)?;
        if query.category == VehicleCategory::Car && query.transmission.is_none() {
            return Err(ValidationError::MissingField("transmission"));
        }
        Ok(())
    }

    /// Validate new-vehicle pricing inputs
    pub fn validate_new_vehicle(
        &self,
        engine_cc: f64,
        base_price: f64,
    ) -> Result<(), ValidationError> {
        self.validate_non_negative("engine_cc", engine_cc)?;
        self.validate_positive("base_price", base_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{FuelType, Transmission};

    fn car_query() -> VehicleQuery {
        VehicleQuery {
            category: VehicleCategory::Car,
            km_driven: 42_000.0,
            age: 4.0,
            engine_cc: 1197.0,
            fuel_type: FuelType::Petrol,
            transmission: Some(Transmission::Manual),
        }
    }

    #[test]
    fn test_valid_query() {
        assert!(Validator::new().validate_query(&car_query()).is_ok());
    }

    #[test]
    fn test_zero_values_allowed() {
        let query = VehicleQuery {
            km_driven: 0.0,
            age: 0.0,
            ..car_query()
        };
        assert!(Validator::new().validate_query(&query).is_ok());
    }

    #[test]
    fn test_negative_rejected() {
        let query = VehicleQuery {
            km_driven: -1.0,
            ..car_query()
        };
        assert_eq!(
            Validator::new().validate_query(&query),
            Err(ValidationError::Negative {
                field: "km_driven",
                value: -1.0
            })
        );
    }

    #[test]
    fn test_nan_rejected() {
        let query = VehicleQuery {
            age: f64::NAN,
            ..car_query()
        };
        assert_eq!(
            Validator::new().validate_query(&query),
            Err(ValidationError::NotFinite { field: "age" })
        );
    }

    #[test]
    fn test_car_requires_transmission() {
        let query = VehicleQuery {
            transmission: None,
            ..car_query()
        };
        assert_eq!(
            Validator::new().validate_query(&query),
            Err(ValidationError::MissingField("transmission"))
        );

        let bike = VehicleQuery {
            category: VehicleCategory::Bike,
            transmission: None,
            ..car_query()
        };
        assert!(Validator::new().validate_query(&bike).is_ok());
    }

    #[test]
    fn test_base_price_must_be_positive() {
        let validator = Validator::new();
        assert!(validator.validate_new_vehicle(1200.0, 1.0).is_ok());
        assert!(matches!(
            validator.validate_new_vehicle(1200.0, 0.0),
            Err(ValidationError::NotPositive { field: "base_price", .. })
        ));
        assert!(matches!(
            validator.validate_new_vehicle(-5.0, 100_000.0),
            Err(ValidationError::Negative { field: "engine_cc", .. })
        ));
    }
}
