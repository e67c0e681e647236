use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::SchemeError;
use crate::models::domain::{CasteCategory, SearchFilters, UserProfile};

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Citizen profile as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileRequest {
    #[validate(custom(function = "validate_not_blank", message = "State cannot be empty"))]
    pub state: String,
    #[validate(range(min = 0, message = "Income must be a positive number"))]
    pub income: i64,
    #[serde(default)]
    #[validate(range(max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<u32>,
    #[validate(custom(function = "validate_not_blank", message = "Category cannot be empty"))]
    pub category: String,
    #[serde(default)]
    pub caste_category: Option<String>,
}

impl ProfileRequest {
    /// Validate and normalize into a domain profile
    pub fn into_profile(self) -> Result<UserProfile, SchemeError> {
        self.validate()?;

        let caste_category = match self.caste_category.as_deref().map(str::trim) {
            None | Some("") => CasteCategory::default(),
            Some(raw) => raw.parse().map_err(SchemeError::Input)?,
        };

        let income = u64::try_from(self.income)
            .map_err(|_| SchemeError::Input("Income must be a positive number".to_string()))?;

        Ok(UserProfile {
            state: self.state.trim().to_string(),
            income,
            age: self.age,
            category: self.category.trim().to_string(),
            caste_category,
        })
    }
}

/// Request for ranked recommendations
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub profile: ProfileRequest,
    #[serde(default)]
    #[validate(range(max = 100, message = "min_score must be between 0 and 100"))]
    pub min_score: Option<u32>,
    #[serde(default)]
    pub limit: Option<usize>,
    /// Keep age-ineligible schemes and flag them instead of dropping them
    #[serde(default)]
    pub annotate: bool,
}

/// Request to compare schemes side by side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub scheme_names: Vec<String>,
    #[serde(default)]
    pub user_profile: Option<ProfileRequest>,
}

/// Keyword search with optional filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub filters: Option<SearchFilters>,
}

/// Request to simulate an income change
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EligibilityChangeRequest {
    #[validate(nested)]
    pub profile: ProfileRequest,
    #[serde(default)]
    pub income_change: i64,
}
