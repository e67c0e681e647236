use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::SchemeRecord;

/// Errors that can occur while loading the scheme catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog source not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Catalog load task failed: {0}")]
    Task(String),
}

/// Immutable snapshot of the scheme catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    source: String,
    schemes: Vec<SchemeRecord>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    pub fn new(source: impl Into<String>, schemes: Vec<SchemeRecord>) -> Self {
        Self {
            source: source.into(),
            schemes,
            loaded_at: Utc::now(),
        }
    }

    /// Schemes in source order
    pub fn schemes(&self) -> &[SchemeRecord] {
        &self.schemes
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.schemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemes.is_empty()
    }
}

/// Anything that can produce a catalog from a source identifier
pub trait CatalogSource: Send + Sync {
    fn load(&self, source: &str) -> Result<Catalog, CatalogError>;
}

/// One CSV row before numeric and flag columns are interpreted
#[derive(Debug, Deserialize)]
struct CsvSchemeRow {
    #[serde(default)]
    scheme_id: String,
    scheme_name: String,
    #[serde(default = "default_level")]
    level: String,
    #[serde(default = "default_state")]
    state: String,
    category: String,
    #[serde(default)]
    min_age: String,
    #[serde(default)]
    max_age: String,
    #[serde(default)]
    min_income: String,
    #[serde(default)]
    max_income: String,
    #[serde(default)]
    target_group: String,
    #[serde(default)]
    benefits: String,
    #[serde(default)]
    is_active: String,
    #[serde(default)]
    last_updated: String,
}

fn default_level() -> String { "Central".to_string() }
fn default_state() -> String { "All".to_string() }

impl CsvSchemeRow {
    fn into_record(self) -> SchemeRecord {
        let name = self.scheme_name;

        SchemeRecord {
            min_income: parse_bound(&self.min_income, 0, &name, "min_income"),
            max_income: parse_bound(&self.max_income, u64::MAX, &name, "max_income"),
            min_age: parse_bound(&self.min_age, 0, &name, "min_age"),
            max_age: parse_bound(&self.max_age, 100, &name, "max_age"),
            is_active: self.is_active.trim().eq_ignore_ascii_case("yes"),
            id: self.scheme_id,
            level: self.level,
            state: self.state,
            category: self.category,
            target_group: self.target_group,
            benefits: self.benefits,
            last_updated: self.last_updated,
            name,
        }
    }
}

/// Parse a numeric cell; empty cells take the column default
///
/// Returns `None` for malformed values so predicates can fail closed.
fn parse_bound<T: FromStr>(raw: &str, default: T, scheme: &str, column: &str) -> Option<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(default);
    }

    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(
                "Malformed {} '{}' for scheme '{}', scheme will not match",
                column,
                raw,
                scheme
            );
            None
        }
    }
}

/// Loads schemes from a CSV file with a header row
///
/// Required columns are `scheme_name` and `category`; every other column
/// falls back to a default when absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvCatalogLoader;

impl CsvCatalogLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse a catalog from any reader
    pub fn from_reader<R: Read>(&self, source: &str, reader: R) -> Result<Catalog, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let schemes = csv_reader
            .deserialize::<CsvSchemeRow>()
            .map(|row| row.map(CsvSchemeRow::into_record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!("Loaded {} schemes from {}", schemes.len(), source);

        Ok(Catalog::new(source, schemes))
    }
}

impl CatalogSource for CsvCatalogLoader {
    fn load(&self, source: &str) -> Result<Catalog, CatalogError> {
        let path = Path::new(source);
        if !path.exists() {
            return Err(CatalogError::NotFound(source.to_string()));
        }

        let file = std::fs::File::open(path)?;
        self.from_reader(source, file)
    }
}
