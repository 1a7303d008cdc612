//! Feature Vector Assembly
//!
//! Categorical fields are one-hot encoded with the first (reference) level
//! dropped: a record whose value is the reference category, or a category the
//! training data never contained, has every indicator of that field at zero.

use crate::fields::FieldSpec;
use crate::EncodingError;
use data_validator::{Table, VehicleQuery};
use ndarray::{Array1, Array2};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

/// One column of the model input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Numeric field copied through unchanged
    Numeric { field: String },
    /// 1 when `field == category`, else 0
    Indicator { field: String, category: String },
}

impl Column {
    /// Column name (`<field>` or `<field>_<category>`)
    pub fn name(&self) -> String {
        match self {
            Column::Numeric { field } => field.clone(),
            Column::Indicator { field, category } => format!("{field}_{category}"),
        }
    }
}

/// Ordered column list frozen at training time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    columns: Vec<Column>,
    names: Vec<String>,
    categorical_fields: Vec<String>,
    /// Dropped level per categorical field (absent if the field had no values)
    reference_categories: BTreeMap<String, String>,
}

impl ColumnLayout {
    fn new(
        columns: Vec<Column>,
        categorical_fields: Vec<String>,
        reference_categories: BTreeMap<String, String>,
    ) -> Self {
        let names = columns.iter().map(Column::name).collect();
        Self {
            columns,
            names,
            categorical_fields,
            reference_categories,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in model order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Reference (dropped) category for a field
    pub fn reference_category(&self, field: &str) -> Option<&str> {
        self.reference_categories.get(field).map(String::as_str)
    }

    /// Verify a vector was built against this layout
    pub fn check(&self, vector: &FeatureVector) -> Result<(), EncodingError> {
        if vector.columns() == self.names.as_slice() {
            Ok(())
        } else {
            Err(EncodingError::Mismatch {
                expected: self.names.join(","),
                actual: vector.columns().join(","),
            })
        }
    }
}

/// Feature vector for ML inference: named columns plus values
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Assemble a vector from parts. Lengths must agree.
    pub fn from_parts(columns: Vec<String>, values: Vec<f64>) -> Result<Self, EncodingError> {
        if columns.len() != values.len() {
            return Err(EncodingError::Mismatch {
                expected: format!("{} values", columns.len()),
                actual: format!("{} values", values.len()),
            });
        }
        Ok(Self { columns, values })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of a named column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| self.values[idx])
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A single record ready for encoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    numeric: BTreeMap<String, f64>,
    categorical: BTreeMap<String, String>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_numeric(mut self, field: &str, value: f64) -> Self {
        self.numeric.insert(field.to_string(), value);
        self
    }

    pub fn with_category(mut self, field: &str, value: &str) -> Self {
        self.categorical.insert(field.to_string(), value.to_string());
        self
    }

    /// Build a record from a used-vehicle query
    pub fn from_query(query: &VehicleQuery) -> Self {
        use data_validator::columns::*;
        let mut record = Self::new()
            .with_numeric(KM_DRIVEN, query.km_driven)
            .with_numeric(AGE, query.age)
            .with_numeric(ENGINE_CC, query.engine_cc)
            .with_category(FUEL_TYPE, query.fuel_type.label());
        if let Some(transmission) = query.transmission {
            record = record.with_category(TRANSMISSION, transmission.label());
        }
        record
    }

    /// Build a record from a normalized table row
    pub fn from_row(table: &Table, row: usize, spec: &FieldSpec) -> Result<Self, EncodingError> {
        let mut record = Self::new();
        for field in spec.numeric {
            let value = parse_numeric(table, row, field)?;
            record.numeric.insert(field.to_string(), value);
        }
        for field in spec.categorical {
            let value = table
                .cell(row, field)
                .ok_or_else(|| EncodingError::MissingField(field.to_string()))?;
            record.categorical.insert(field.to_string(), value.to_string());
        }
        Ok(record)
    }
}

fn parse_numeric(table: &Table, row: usize, field: &str) -> Result<f64, EncodingError> {
    let cell = table
        .cell(row, field)
        .ok_or_else(|| EncodingError::MissingField(field.to_string()))?;
    cell.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EncodingError::MalformedValue {
            row,
            column: field.to_string(),
            value: cell.to_string(),
        })
}

/// Stateless encoder; all state lives in the [`ColumnLayout`] passed in
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Decide the column layout from a normalized training table.
    ///
    /// Numeric fields come first in spec order. Each categorical field then
    /// contributes one indicator per distinct observed value in sorted order,
    /// minus the first. Empty cells are not a category.
    pub fn fit_columns(&self, table: &Table, spec: &FieldSpec) -> Result<ColumnLayout, EncodingError> {
        let mut columns: Vec<Column> = spec
            .numeric
            .iter()
            .map(|field| Column::Numeric {
                field: field.to_string(),
            })
            .collect();
        let mut reference_categories = BTreeMap::new();

        for field in spec.categorical {
            let values = table
                .column(field)
                .ok_or_else(|| EncodingError::MissingField(field.to_string()))?;
            let levels: BTreeSet<&str> = values.filter(|v| !v.is_empty()).collect();
            let mut levels = levels.into_iter();

            if let Some(reference) = levels.next() {
                debug!("Reference category for {}: {}", field, reference);
                reference_categories.insert(field.to_string(), reference.to_string());
            }
            columns.extend(levels.map(|category| Column::Indicator {
                field: field.to_string(),
                category: category.to_string(),
            }));
        }

        let layout = ColumnLayout::new(
            columns,
            spec.categorical.iter().map(|f| f.to_string()).collect(),
            reference_categories,
        );
        info!("Fitted column layout: {:?}", layout.names());
        Ok(layout)
    }

    /// Encode one record against a frozen layout
    pub fn encode(&self, record: &Record, layout: &ColumnLayout) -> Result<FeatureVector, EncodingError> {
        for field in &layout.categorical_fields {
            if !record.categorical.contains_key(field) {
                return Err(EncodingError::MissingField(field.clone()));
            }
        }

        let mut values = Vec::with_capacity(layout.len());
        for column in &layout.columns {
            let value = match column {
                Column::Numeric { field } => *record
                    .numeric
                    .get(field)
                    .ok_or_else(|| EncodingError::MissingField(field.clone()))?,
                Column::Indicator { field, category } => {
                    if record.categorical.get(field) == Some(category) {
                        1.0
                    } else {
                        0.0
                    }
                }
            };
            values.push(value);
        }

        Ok(FeatureVector {
            columns: layout.names.clone(),
            values,
        })
    }

    /// Encode every row of a normalized table into a training matrix and
    /// target vector.
    pub fn training_matrix(
        &self,
        table: &Table,
        spec: &FieldSpec,
        layout: &ColumnLayout,
    ) -> Result<(Array2<f64>, Array1<f64>), EncodingError> {
        let n_rows = table.len();
        let mut x = Array2::<f64>::zeros((n_rows, layout.len()));
        let mut y = Array1::<f64>::zeros(n_rows);

        for row in 0..n_rows {
            let record = Record::from_row(table, row, spec)?;
            let vector = self.encode(&record, layout)?;
            for (col, value) in vector.values.into_iter().enumerate() {
                x[[row, col]] = value;
            }
            y[row] = parse_numeric(table, row, spec.target)?;
        }

        debug!("Built training matrix {}x{}", n_rows, layout.len());
        Ok((x, y))
    }
}
