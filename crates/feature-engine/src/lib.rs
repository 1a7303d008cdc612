//! Feature Engineering Engine
//!
//! Turns normalized vehicle records into numeric feature vectors against a
//! column layout frozen at training time.

mod features;
mod fields;

pub use features::{Column, ColumnLayout, FeatureEncoder, FeatureVector, Record};
pub use fields::FieldSpec;

use thiserror::Error;

/// Errors during feature encoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("Feature columns do not match the trained layout: expected [{expected}], got [{actual}]")]
    Mismatch { expected: String, actual: String },
    #[error("Record has no value for field '{0}'")]
    MissingField(String),
    #[error("Row {row}: '{value}' is not a number in column '{column}'")]
    MalformedValue {
        row: usize,
        column: String,
        value: String,
    },
}
