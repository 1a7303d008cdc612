//! Data Validation and Normalization
//!
//! Vehicle domain types, dataset loading, schema normalization, and range
//! checking for user input.

mod dataset;
mod error;
mod normalizer;
mod record;
mod validator;

pub use dataset::{load_csv, read_csv, Table};
pub use error::{CsvError, DatasetError, SchemaError, ValidationError};
pub use normalizer::{canonical_header, columns, normalize, normalize_now, ColumnAliases};
pub use record::{FuelType, Transmission, VehicleCategory, VehicleQuery};
pub use validator::Validator;
