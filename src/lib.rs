//! Scheme Match - eligibility matching for government welfare schemes
//!
//! This library matches a citizen profile against a catalog of welfare
//! schemes. It implements a filter, score and rank pipeline, plus
//! comparison, search, statistics and alert views over the same catalog.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{AlertGenerator, Matcher, calculate_eligibility_score, classify_target_group};
pub use error::SchemeError;
pub use models::{CasteCategory, MatchResult, SchemeRecord, ScoringWeights, UserProfile};
pub use services::{Catalog, CatalogCache, CsvCatalogLoader};
