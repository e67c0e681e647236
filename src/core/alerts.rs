use chrono::NaiveDate;

use crate::core::{
    filters::{matches_profile_soft, matches_state_and_income},
    scoring::calculate_eligibility_score,
};
use crate::models::{
    Alert, AlertBundle, AlertPriority, AlertType, EligibilityChange, SchemeChange,
    SchemeRecord, ScoringWeights, UserProfile,
};

/// Name fragments that mark an education scheme as deadline-driven
pub const DEADLINE_KEYWORDS: &[&str] = &["scholarship", "fellowship", "inspire", "kvpy", "ntse", "merit"];

/// Categories considered essential, with the reason shown to the user
pub const PRIORITY_CATEGORIES: &[(&str, &str)] = &[
    ("Health", "Healthcare coverage is essential for financial security"),
    ("Insurance", "Insurance provides crucial protection against uncertainties"),
    ("Housing", "Housing schemes can significantly reduce living costs"),
    ("Education", "Education schemes can transform career opportunities"),
];

/// Windows and caps for each alert class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertSettings {
    pub recent_days: i64,
    pub recent_limit: Option<usize>,
    pub new_scheme_days: i64,
    pub new_scheme_limit: usize,
    pub deadline_limit: usize,
    pub priority_limit: usize,
    pub category_limit: usize,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            recent_days: 30,
            recent_limit: None,
            new_scheme_days: 60,
            new_scheme_limit: 10,
            deadline_limit: 5,
            priority_limit: 10,
            category_limit: 15,
        }
    }
}

/// Days from the scheme's last update to `today`
///
/// `None` when the date does not parse, so callers can treat the scheme as
/// not recently updated.
pub fn days_since_update(scheme: &SchemeRecord, today: NaiveDate) -> Option<i64> {
    scheme
        .last_updated_date()
        .map(|updated| (today - updated).num_days())
}

/// Derives alerts for a profile from the catalog
///
/// Every alert class starts from active schemes passing the soft profile
/// check, so a declared age never hides an alert.
#[derive(Debug, Clone)]
pub struct AlertGenerator {
    weights: ScoringWeights,
    settings: AlertSettings,
}

impl AlertGenerator {
    pub fn new(weights: ScoringWeights, settings: AlertSettings) -> Self {
        Self { weights, settings }
    }

    pub fn settings(&self) -> &AlertSettings {
        &self.settings
    }

    /// All alert classes for a profile, with a total count
    pub fn generate_alerts(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        today: NaiveDate,
    ) -> AlertBundle {
        let recent_updates = self.recent_updates(catalog, profile, today, self.settings.recent_days);
        let high_priority = self.high_priority(catalog, profile);
        let category_alerts = self.category_alerts(catalog, profile);
        let deadlines = self.deadlines(catalog, profile);
        let new_schemes = self.new_schemes(catalog, profile, today);

        let count = recent_updates.len()
            + high_priority.len()
            + category_alerts.len()
            + deadlines.len()
            + new_schemes.len();

        for alert in high_priority.iter().chain(&deadlines) {
            tracing::debug!("{}", alert);
        }

        AlertBundle {
            recent_updates,
            high_priority,
            category_alerts,
            deadlines,
            new_schemes,
            count,
        }
    }

    /// Schemes updated within `days_threshold` days, most recent first
    pub fn recent_updates(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        today: NaiveDate,
        days_threshold: i64,
    ) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .candidates(catalog, profile)
            .filter_map(|scheme| {
                let days = days_since_update(scheme, today)?;
                if !(0..=days_threshold).contains(&days) {
                    return None;
                }

                let mut alert = self.build_alert(
                    scheme,
                    profile,
                    AlertType::Update,
                    AlertPriority::Medium,
                    format!("Updated {} days ago", days),
                );
                alert.last_updated = Some(scheme.last_updated.clone());
                alert.days_ago = Some(days);
                Some(alert)
            })
            .collect();

        alerts.sort_by_key(|alert| alert.days_ago);
        if let Some(limit) = self.settings.recent_limit {
            alerts.truncate(limit);
        }
        alerts
    }

    /// Schemes updated within the new-scheme window, in catalog order
    pub fn new_schemes(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        today: NaiveDate,
    ) -> Vec<Alert> {
        self.candidates(catalog, profile)
            .filter(|scheme| {
                days_since_update(scheme, today)
                    .is_some_and(|days| (0..=self.settings.new_scheme_days).contains(&days))
            })
            .map(|scheme| {
                let priority = if scheme.category == profile.category {
                    AlertPriority::High
                } else {
                    AlertPriority::Medium
                };
                self.build_alert(
                    scheme,
                    profile,
                    AlertType::New,
                    priority,
                    "New scheme matching your profile".to_string(),
                )
            })
            .take(self.settings.new_scheme_limit)
            .collect()
    }

    /// Scholarship-style education schemes
    ///
    /// Deadline text is advisory only; the catalog carries no application
    /// dates to track.
    pub fn deadlines(&self, catalog: &[SchemeRecord], profile: &UserProfile) -> Vec<Alert> {
        self.candidates(catalog, profile)
            .filter(|scheme| scheme.category == "Education" && is_deadline_driven(&scheme.name))
            .map(|scheme| {
                let mut alert = self.build_alert(
                    scheme,
                    profile,
                    AlertType::Deadline,
                    AlertPriority::High,
                    "Scholarship - Check application deadline".to_string(),
                );
                alert.deadline_info = Some("Application window may be open".to_string());
                alert.action_required = Some("Check official website for exact dates".to_string());
                alert
            })
            .take(self.settings.deadline_limit)
            .collect()
    }

    /// Schemes in essential categories, critical ones first
    pub fn high_priority(&self, catalog: &[SchemeRecord], profile: &UserProfile) -> Vec<Alert> {
        let mut alerts: Vec<Alert> = self
            .candidates(catalog, profile)
            .filter_map(|scheme| {
                let (_, reason) = PRIORITY_CATEGORIES
                    .iter()
                    .find(|(category, _)| *category == scheme.category)?;

                let priority = match scheme.category.as_str() {
                    "Health" | "Insurance" => AlertPriority::Critical,
                    _ => AlertPriority::High,
                };
                let mut alert = self.build_alert(
                    scheme,
                    profile,
                    AlertType::Priority,
                    priority,
                    format!("Essential {} scheme for you", scheme.category.to_lowercase()),
                );
                alert.reason = Some(reason.to_string());
                Some(alert)
            })
            .collect();

        alerts.sort_by_key(|alert| alert.priority);
        alerts.truncate(self.settings.priority_limit);
        alerts
    }

    /// Schemes in the profile's own interest category
    pub fn category_alerts(&self, catalog: &[SchemeRecord], profile: &UserProfile) -> Vec<Alert> {
        self.candidates(catalog, profile)
            .filter(|scheme| scheme.category == profile.category)
            .map(|scheme| {
                self.build_alert(
                    scheme,
                    profile,
                    AlertType::CategoryMatch,
                    AlertPriority::Medium,
                    format!("Matches your interest in {}", profile.category),
                )
            })
            .take(self.settings.category_limit)
            .collect()
    }

    /// Simulate an income change against the state-matching eligible set
    ///
    /// Age and caste are ignored here; only state, income and the active
    /// flag decide membership. The new income saturates at zero.
    pub fn check_eligibility_change(
        &self,
        catalog: &[SchemeRecord],
        profile: &UserProfile,
        income_change: i64,
    ) -> EligibilityChange {
        let current_income = profile.income;
        let new_income = current_income.saturating_add_signed(income_change);

        let mut gained = Vec::new();
        let mut lost = Vec::new();
        let mut total_current = 0;
        let mut total_new = 0;

        for scheme in catalog {
            let before = matches_state_and_income(scheme, &profile.state, current_income);
            let after = matches_state_and_income(scheme, &profile.state, new_income);

            total_current += usize::from(before);
            total_new += usize::from(after);

            match (before, after) {
                (false, true) => gained.push(scheme_change(scheme)),
                (true, false) => lost.push(scheme_change(scheme)),
                _ => {}
            }
        }

        let impact_summary = impact_summary(gained.len(), lost.len(), income_change);

        EligibilityChange {
            gained,
            lost,
            current_income,
            new_income,
            total_current,
            total_new,
            income_change,
            impact_summary,
        }
    }

    fn candidates<'a>(
        &'a self,
        catalog: &'a [SchemeRecord],
        profile: &'a UserProfile,
    ) -> impl Iterator<Item = &'a SchemeRecord> + 'a {
        catalog
            .iter()
            .filter(move |scheme| matches_profile_soft(scheme, profile))
    }

    fn build_alert(
        &self,
        scheme: &SchemeRecord,
        profile: &UserProfile,
        alert_type: AlertType,
        priority: AlertPriority,
        message: String,
    ) -> Alert {
        Alert {
            scheme_id: scheme.id.clone(),
            scheme_name: scheme.name.clone(),
            category: scheme.category.clone(),
            alert_type,
            priority,
            message,
            benefits: scheme.benefits.clone(),
            target_group: scheme.target_group.clone(),
            score: calculate_eligibility_score(scheme, profile, &self.weights).0,
            last_updated: None,
            days_ago: None,
            reason: None,
            deadline_info: None,
            action_required: None,
        }
    }
}

impl Default for AlertGenerator {
    fn default() -> Self {
        Self::new(ScoringWeights::default(), AlertSettings::default())
    }
}

fn is_deadline_driven(name: &str) -> bool {
    let name = name.to_lowercase();
    DEADLINE_KEYWORDS.iter().any(|keyword| name.contains(keyword))
}

fn scheme_change(scheme: &SchemeRecord) -> SchemeChange {
    SchemeChange {
        scheme_id: scheme.id.clone(),
        scheme_name: scheme.name.clone(),
        category: scheme.category.clone(),
        benefits: scheme.benefits.clone(),
        income_range: scheme.income_range_label(),
    }
}

fn impact_summary(gained: usize, lost: usize, income_change: i64) -> String {
    let direction = match income_change {
        c if c > 0 => "increase",
        c if c < 0 => "decrease",
        _ => "change",
    };

    if gained > lost {
        format!("Income {} will give you access to {} more schemes", direction, gained)
    } else if lost > gained {
        format!("Income {} may cause you to lose eligibility for {} schemes", direction, lost)
    } else if gained == 0 {
        format!("Income {} will not significantly affect your eligibility", direction)
    } else {
        format!("Income {} will change eligibility for some schemes", direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CasteCategory;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    fn create_scheme(name: &str, category: &str, last_updated: &str) -> SchemeRecord {
        SchemeRecord {
            id: name.to_lowercase(),
            name: name.to_string(),
            level: "Central".to_string(),
            state: "All".to_string(),
            category: category.to_string(),
            min_income: Some(0),
            max_income: Some(300_000),
            min_age: Some(18),
            max_age: Some(40),
            target_group: "All citizens".to_string(),
            benefits: "Support".to_string(),
            is_active: true,
            last_updated: last_updated.to_string(),
        }
    }

    fn create_profile() -> UserProfile {
        UserProfile {
            state: "Kerala".to_string(),
            income: 150_000,
            age: Some(30),
            category: "Education".to_string(),
            caste_category: CasteCategory::General,
        }
    }

    #[test]
    fn test_days_since_update() {
        let scheme = create_scheme("A", "Health", "2024-06-20");
        assert_eq!(days_since_update(&scheme, today()), Some(10));

        let scheme = create_scheme("A", "Health", "");
        assert_eq!(days_since_update(&scheme, today()), None);

        let scheme = create_scheme("A", "Health", "20/06/2024");
        assert_eq!(days_since_update(&scheme, today()), None);
    }

    #[test]
    fn test_recent_updates_sorted_and_bounded() {
        let generator = AlertGenerator::default();
        let catalog = vec![
            create_scheme("Old", "Health", "2024-01-01"),
            create_scheme("Ten", "Health", "2024-06-20"),
            create_scheme("Blank", "Health", ""),
            create_scheme("Two", "Health", "2024-06-28"),
            create_scheme("Future", "Health", "2024-07-15"),
        ];

        let alerts = generator.recent_updates(&catalog, &create_profile(), today(), 30);
        let names: Vec<&str> = alerts.iter().map(|a| a.scheme_name.as_str()).collect();

        assert_eq!(names, vec!["Two", "Ten"]);
        assert_eq!(alerts[0].days_ago, Some(2));
        assert_eq!(alerts[0].message, "Updated 2 days ago");
        assert_eq!(alerts[0].alert_type, AlertType::Update);
    }

    #[test]
    fn test_soft_filter_ignores_age() {
        let generator = AlertGenerator::default();
        let catalog = vec![create_scheme("Ten", "Education", "2024-06-20")];
        let mut profile = create_profile();
        profile.age = Some(70);

        assert_eq!(generator.recent_updates(&catalog, &profile, today(), 30).len(), 1);
        assert_eq!(generator.category_alerts(&catalog, &profile).len(), 1);
    }

    #[test]
    fn test_new_schemes_priority_and_cap() {
        let generator = AlertGenerator::default();
        let mut catalog: Vec<SchemeRecord> = (0..12)
            .map(|i| create_scheme(&format!("Health {}", i), "Health", "2024-05-15"))
            .collect();
        catalog.insert(0, create_scheme("Edu", "Education", "2024-05-15"));

        let alerts = generator.new_schemes(&catalog, &create_profile(), today());

        assert_eq!(alerts.len(), 10);
        assert_eq!(alerts[0].priority, AlertPriority::High);
        assert_eq!(alerts[1].priority, AlertPriority::Medium);
    }

    #[test]
    fn test_deadlines() {
        let generator = AlertGenerator::default();
        let catalog = vec![
            create_scheme("Post Matric Scholarship", "Education", ""),
            create_scheme("INSPIRE Fellowship", "Education", ""),
            create_scheme("Mid Day Meal", "Education", ""),
            create_scheme("Merit Loan", "Finance", ""),
        ];

        let alerts = generator.deadlines(&catalog, &create_profile());
        let names: Vec<&str> = alerts.iter().map(|a| a.scheme_name.as_str()).collect();

        assert_eq!(names, vec!["Post Matric Scholarship", "INSPIRE Fellowship"]);
        assert_eq!(
            alerts[0].deadline_info.as_deref(),
            Some("Application window may be open")
        );
    }

    #[test]
    fn test_high_priority_ordering() {
        let generator = AlertGenerator::default();
        let catalog = vec![
            create_scheme("House", "Housing", ""),
            create_scheme("School", "Education", ""),
            create_scheme("Clinic", "Health", ""),
            create_scheme("Farm", "Agriculture", ""),
            create_scheme("Cover", "Insurance", ""),
        ];

        let alerts = generator.high_priority(&catalog, &create_profile());
        let names: Vec<&str> = alerts.iter().map(|a| a.scheme_name.as_str()).collect();

        assert_eq!(names, vec!["Clinic", "Cover", "House", "School"]);
        assert_eq!(alerts[0].priority, AlertPriority::Critical);
        assert_eq!(alerts[2].priority, AlertPriority::High);
        assert_eq!(alerts[2].message, "Essential housing scheme for you");
    }

    #[test]
    fn test_alert_summary_lines() {
        let generator = AlertGenerator::default();
        let catalog = vec![
            create_scheme("Merit Scholarship", "Education", "2024-06-25"),
            create_scheme("Clinic", "Health", "2024-06-20"),
        ];
        let bundle = generator.generate_alerts(&catalog, &create_profile(), today());

        assert_eq!(
            bundle.recent_updates[0].to_string(),
            "Merit Scholarship was updated 5 days ago"
        );
        assert_eq!(
            bundle.deadlines[0].to_string(),
            "Deadline Alert: Merit Scholarship - Application window may be open"
        );
        let clinic = bundle
            .high_priority
            .iter()
            .find(|a| a.scheme_name == "Clinic")
            .unwrap();
        assert!(clinic.to_string().starts_with("High Priority: Clinic - "));
        assert_eq!(
            bundle.category_alerts[0].to_string(),
            "Merit Scholarship - Matches your interest in Education"
        );
        assert_eq!(
            bundle.new_schemes[0].to_string(),
            "New Scheme: Merit Scholarship - New scheme matching your profile"
        );
    }

    #[test]
    fn test_generate_alerts_count() {
        let generator = AlertGenerator::default();
        let catalog = vec![
            create_scheme("Merit Scholarship", "Education", "2024-06-25"),
            create_scheme("Clinic", "Health", "2023-01-01"),
        ];

        let bundle = generator.generate_alerts(&catalog, &create_profile(), today());

        assert_eq!(bundle.recent_updates.len(), 1);
        assert_eq!(bundle.high_priority.len(), 2);
        assert_eq!(bundle.category_alerts.len(), 1);
        assert_eq!(bundle.deadlines.len(), 1);
        assert_eq!(bundle.new_schemes.len(), 1);
        assert_eq!(bundle.count, 6);
    }

    #[test]
    fn test_eligibility_change_gain_and_loss() {
        let generator = AlertGenerator::default();
        let mut low = create_scheme("Low", "Health", "");
        low.max_income = Some(160_000);
        let mut high = create_scheme("High", "Health", "");
        high.min_income = Some(180_000);
        high.max_income = Some(400_000);
        let both = create_scheme("Both", "Health", "");

        let catalog = vec![low, high, both];
        let change = generator.check_eligibility_change(&catalog, &create_profile(), 50_000);

        assert_eq!(change.new_income, 200_000);
        assert_eq!(change.gained.len(), 1);
        assert_eq!(change.gained[0].scheme_name, "High");
        assert_eq!(change.lost.len(), 1);
        assert_eq!(change.lost[0].scheme_name, "Low");
        assert_eq!(change.total_current, 2);
        assert_eq!(change.total_new, 2);
        assert_eq!(change.impact_summary, "Income increase will change eligibility for some schemes");
    }

    #[test]
    fn test_eligibility_change_saturates() {
        let generator = AlertGenerator::default();
        let catalog = vec![create_scheme("Any", "Health", "")];

        let change = generator.check_eligibility_change(&catalog, &create_profile(), -500_000);

        assert_eq!(change.new_income, 0);
        assert_eq!(
            change.impact_summary,
            "Income decrease will not significantly affect your eligibility"
        );
    }

    #[test]
    fn test_impact_summary() {
        assert_eq!(
            impact_summary(3, 1, 10_000),
            "Income increase will give you access to 3 more schemes"
        );
        assert_eq!(
            impact_summary(0, 2, -10_000),
            "Income decrease may cause you to lose eligibility for 2 schemes"
        );
        assert_eq!(
            impact_summary(0, 0, 0),
            "Income change will not significantly affect your eligibility"
        );
    }
}
