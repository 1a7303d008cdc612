//! Schema Normalization
//!
//! Maps the heterogeneous headers found in used-vehicle datasets onto the
//! canonical schema and derives vehicle age from model year.

use crate::dataset::Table;
use chrono::Datelike;
use tracing::{debug, warn};

/// Canonical column names
pub mod columns {
    pub const KM_DRIVEN: &str = "km_driven";
    pub const AGE: &str = "age";
    pub const YEAR: &str = "year";
    pub const FUEL_TYPE: &str = "fuel_type";
    pub const ENGINE_CC: &str = "engine_cc";
    pub const TRANSMISSION: &str = "transmission";
    pub const RESALE_PRICE: &str = "resale_price";
}

/// Header alias table (source header → canonical name).
///
/// Matching is case-sensitive on the exact source header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliases {
    aliases: Vec<(String, String)>,
}

impl Default for ColumnAliases {
    fn default() -> Self {
        use columns::*;
        let pairs = [
            ("Year", YEAR),
            ("Age", AGE),
            ("Kms_Driven", KM_DRIVEN),
            ("Kms", KM_DRIVEN),
            ("Kilometers_Driven", KM_DRIVEN),
            ("Fuel", FUEL_TYPE),
            ("Fuel_Type", FUEL_TYPE),
            ("Engine", ENGINE_CC),
            ("Engine_CC", ENGINE_CC),
            ("Selling_Price", RESALE_PRICE),
            ("Price", RESALE_PRICE),
            ("Resale_Price", RESALE_PRICE),
        ];
        Self {
            aliases: pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }
}

impl ColumnAliases {
    /// Empty alias table
    pub fn empty() -> Self {
        Self { aliases: Vec::new() }
    }

    /// Canonical name for a source header, if aliased
    pub fn resolve(&self, header: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(from, _)| from == header)
            .map(|(_, to)| to.as_str())
    }

    /// All source spellings that map to `canonical`
    pub fn spellings_of<'a>(&'a self, canonical: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.aliases
            .iter()
            .filter(move |(_, to)| to == canonical)
            .map(|(from, _)| from.as_str())
    }
}

/// Normalize a dataset against the calendar year of the local clock.
///
/// The result depends on the day it runs; models built from it are a
/// snapshot of that year.
pub fn normalize_now(table: Table, aliases: &ColumnAliases) -> Table {
    let current_year = chrono::Local::now().year();
    normalize(table, aliases, current_year)
}

/// Normalize a dataset.
///
/// 1. Rename aliased headers.
/// 2. If a `year` column exists, set `age = current_year - year`, replacing
///    any existing `age` column.
/// 3. Trim, lower-case and underscore every header.
///
/// Cell contents are not validated. A `year` that is not an integer leaves
/// an empty `age` cell behind.
pub fn normalize(mut table: Table, aliases: &ColumnAliases, current_year: i32) -> Table {
    for header in table.headers_mut().iter_mut() {
        if let Some(canonical) = aliases.resolve(header) {
            debug!("Renaming column '{}' -> '{}'", header, canonical);
            *header = canonical.to_string();
        }
    }

    let ages: Option<Vec<String>> = table.column(columns::YEAR).map(|years| {
        years
            .map(|cell| match parse_year(cell) {
                Some(year) => (i64::from(current_year) - year).to_string(),
                None => String::new(),
            })
            .collect()
    });
    if let Some(ages) = ages {
        let unparsable = ages.iter().filter(|age| age.is_empty()).count();
        if unparsable > 0 {
            warn!("{} rows have a non-numeric year; age left empty", unparsable);
        }
        table.set_column(columns::AGE, ages);
    }

    for header in table.headers_mut().iter_mut() {
        *header = canonical_header(header);
    }

    table
}

/// Trim, lower-case, and replace spaces with underscores
pub fn canonical_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

fn parse_year(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    if let Ok(year) = cell.parse::<i64>() {
        return Some(year);
    }
    // Spreadsheets often export integral columns as "2017.0"
    let value = cell.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn single_column(header: &str) -> Table {
        Table::from_rows(&[header], &[&["1"]]).unwrap()
    }

    #[test]
    fn test_aliases_map_to_canonical() {
        let aliases = ColumnAliases::default();
        for canonical in [
            columns::YEAR,
            columns::AGE,
            columns::KM_DRIVEN,
            columns::FUEL_TYPE,
            columns::ENGINE_CC,
            columns::RESALE_PRICE,
        ] {
            assert!(aliases.spellings_of(canonical).next().is_some(), "{canonical}");
            for spelling in aliases.spellings_of(canonical) {
                let table = normalize(single_column(spelling), &aliases, 2025);
                // A year column also gains a derived age
                assert_eq!(table.headers()[0], canonical, "spelling {spelling}");
            }
        }
    }

    #[test]
    fn test_alias_is_case_sensitive() {
        let table = normalize(single_column("KMS_DRIVEN"), &ColumnAliases::default(), 2025);
        // Not aliased, but still lower-cased by the final pass
        assert_eq!(table.headers(), &["kms_driven"]);
    }

    #[test]
    fn test_unmatched_columns_pass_through() {
        let table = normalize(single_column("Owner Type "), &ColumnAliases::default(), 2025);
        assert_eq!(table.headers(), &["owner_type"]);
    }

    #[test]
    fn test_age_derived_from_year_overwrites_age() {
        let table = Table::from_rows(
            &["Year", "Age", "Price"],
            &[&["2018", "99", "350000"], &["2021", "99", "500000"]],
        )
        .unwrap();
        let table = normalize(table, &ColumnAliases::default(), 2025);
        assert_eq!(table.headers(), &["year", "age", "resale_price"]);
        assert_eq!(table.cell(0, "age"), Some("7"));
        assert_eq!(table.cell(1, "age"), Some("4"));
    }

    #[test]
    fn test_age_appended_when_absent() {
        let table = Table::from_rows(&["Year"], &[&["2017.0"]]).unwrap();
        let table = normalize(table, &ColumnAliases::default(), 2025);
        assert_eq!(table.headers(), &["year", "age"]);
        assert_eq!(table.cell(0, "age"), Some("8"));
    }

    #[test]
    fn test_bad_year_leaves_empty_age() {
        let table = Table::from_rows(&["Year"], &[&["unknown"]]).unwrap();
        let table = normalize(table, &ColumnAliases::default(), 2025);
        assert_eq!(table.cell(0, "age"), Some(""));
    }

    #[test]
    fn test_age_kept_without_year() {
        let table = Table::from_rows(&["Age"], &[&["3"]]).unwrap();
        let table = normalize(table, &ColumnAliases::default(), 2025);
        assert_eq!(table.cell(0, "age"), Some("3"));
    }

    proptest! {
        #[test]
        fn prop_age_is_current_year_minus_year(year in 1950i32..2030, current in 2000i32..2100) {
            let cell = year.to_string();
            let table = Table::from_rows(&["Year"], &[&[cell.as_str()]]).unwrap();
            let table = normalize(table, &ColumnAliases::default(), current);
            let expected = (current - year).to_string();
            prop_assert_eq!(table.cell(0, "age"), Some(expected.as_str()));
        }

        #[test]
        fn prop_headers_are_canonical(header in "[ A-Za-z_]{1,12}") {
            let table = normalize(single_column(&header), &ColumnAliases::empty(), 2025);
            let out = &table.headers()[0];
            prop_assert!(!out.contains(' '));
            prop_assert_eq!(out.clone(), out.to_lowercase());
        }
    }
}
