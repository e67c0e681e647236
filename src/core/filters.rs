use crate::models::{SchemeRecord, UserProfile};

/// State scope check: nationwide schemes match every state
#[inline]
pub fn matches_state(scheme: &SchemeRecord, state: &str) -> bool {
    scheme.is_nationwide() || scheme.state == state
}

/// Income bracket check; malformed bounds fail closed
#[inline]
pub fn matches_income(scheme: &SchemeRecord, income: u64) -> bool {
    match scheme.income_bounds() {
        Some((min, max)) => min <= income && income <= max,
        None => false,
    }
}

/// Age bracket check; malformed bounds fail closed
#[inline]
pub fn matches_age(scheme: &SchemeRecord, age: u32) -> bool {
    match scheme.age_bounds() {
        Some((min, max)) => min <= age && age <= max,
        None => false,
    }
}

/// Active, in scope for the state, and in the income bracket
///
/// This is the eligibility notion used when simulating income changes.
#[inline]
pub fn matches_state_and_income(scheme: &SchemeRecord, state: &str, income: u64) -> bool {
    scheme.is_active && matches_state(scheme, state) && matches_income(scheme, income)
}

/// Hard eligibility filter used for recommendation listings
///
/// Checks, in order: active flag, state, income bracket, and the age
/// bracket when the profile declares an age.
#[inline]
pub fn is_eligible(scheme: &SchemeRecord, profile: &UserProfile) -> bool {
    if !matches_state_and_income(scheme, &profile.state, profile.income) {
        return false;
    }

    match profile.age {
        Some(age) => matches_age(scheme, age),
        None => true,
    }
}

/// Soft eligibility check used for alerts
///
/// Same as [`is_eligible`] except that age never excludes a scheme.
#[inline]
pub fn matches_profile_soft(scheme: &SchemeRecord, profile: &UserProfile) -> bool {
    matches_state_and_income(scheme, &profile.state, profile.income)
}
