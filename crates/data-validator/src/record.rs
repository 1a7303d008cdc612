//! Vehicle Domain Types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle category. Each category gets its own independently trained model.
///
/// Serializes lower-case; deserializes through [`FromStr`], so any case is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    Car,
    Bike,
}

impl VehicleCategory {
    /// All categories in a stable order
    pub const ALL: [VehicleCategory; 2] = [VehicleCategory::Car, VehicleCategory::Bike];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleCategory::Car => "car",
            VehicleCategory::Bike => "bike",
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "car" => Ok(VehicleCategory::Car),
            "bike" => Ok(VehicleCategory::Bike),
            other => Err(format!("unknown vehicle category '{other}'")),
        }
    }
}

impl<'de> Deserialize<'de> for VehicleCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Fuel type.
///
/// Datasets may contain labels beyond the four the tax table knows about;
/// those are kept verbatim in [`FuelType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    /// `Petrol+CNG`
    PetrolCng,
    Other(String),
}

impl FuelType {
    /// Label as it appears in the datasets
    pub fn label(&self) -> &str {
        match self {
            FuelType::Petrol => "Petrol",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::PetrolCng => "Petrol+CNG",
            FuelType::Other(label) => label,
        }
    }

    /// Parse a label. Never fails: unknown labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Petrol" => FuelType::Petrol,
            "Diesel" => FuelType::Diesel,
            "Electric" => FuelType::Electric,
            "Petrol+CNG" => FuelType::PetrolCng,
            other => FuelType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for FuelType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for FuelType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(FuelType::from_label(&label))
    }
}

/// Gearbox type (cars only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    Automatic,
}

impl Transmission {
    /// Label as it appears in the datasets
    pub fn label(&self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automatic",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single used-vehicle query entered by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleQuery {
    pub category: VehicleCategory,
    /// Odometer reading (km)
    pub km_driven: f64,
    /// Age in years
    pub age: f64,
    /// Engine displacement (cc)
    pub engine_cc: f64,
    pub fuel_type: FuelType,
    /// Required for cars, ignored for bikes
    #[serde(default)]
    pub transmission: Option<Transmission>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuel_labels() {
        assert_eq!(FuelType::from_label("Petrol+CNG"), FuelType::PetrolCng);
        assert_eq!(FuelType::from_label(" Diesel "), FuelType::Diesel);
        assert_eq!(FuelType::from_label("LPG"), FuelType::Other("LPG".into()));
        assert_eq!(FuelType::PetrolCng.label(), "Petrol+CNG");
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Car".parse::<VehicleCategory>(), Ok(VehicleCategory::Car));
        assert_eq!("BIKE".parse::<VehicleCategory>(), Ok(VehicleCategory::Bike));
        assert!("truck".parse::<VehicleCategory>().is_err());
    }

    #[test]
    fn test_category_deserializes_any_case() {
        let parsed: Vec<VehicleCategory> =
            serde_json::from_str(r#"["Car", "bike", "BIKE"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![VehicleCategory::Car, VehicleCategory::Bike, VehicleCategory::Bike]
        );
        assert!(serde_json::from_str::<VehicleCategory>(r#""truck""#).is_err());
        assert_eq!(serde_json::to_string(&VehicleCategory::Car).unwrap(), r#""car""#);
    }

    #[test]
    fn test_display_matches_dataset_labels() {
        assert_eq!(FuelType::PetrolCng.to_string(), "Petrol+CNG");
        assert_eq!(Transmission::Automatic.to_string(), "Automatic");
        assert_eq!(VehicleCategory::Bike.to_string(), "bike");
    }
}
