use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Slot names accepted by the prompt templates, in form order.
pub const PROFILE_FIELDS: [&str; 6] = [
    "name",
    "role",
    "department",
    "start_date",
    "previous_experience",
    "goals",
];

/// A new hire as submitted through the onboarding form.
///
/// Built once per submission and consumed by the prompt builder and the record store.
/// `start_date` is always an ISO `YYYY-MM-DD` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub name: String,
    pub role: String,
    pub department: String,
    pub start_date: String,
    pub previous_experience: String,
    pub goals: String,
}

impl EmployeeProfile {
    /// Looks up a field by its template slot name.
    pub fn field(&self, slot: &str) -> Option<&str> {
        let value = match slot {
            "name" => &self.name,
            "role" => &self.role,
            "department" => &self.department,
            "start_date" => &self.start_date,
            "previous_experience" => &self.previous_experience,
            "goals" => &self.goals,
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Raw body of the plan form. Every field may be left out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub previous_experience: String,
    #[serde(default)]
    pub goals: String,
}

impl PlanForm {
    /// True when at least one field carries something other than whitespace.
    pub fn has_any_input(&self) -> bool {
        self.start_date.is_some()
            || [
                &self.name,
                &self.role,
                &self.department,
                &self.previous_experience,
                &self.goals,
            ]
            .iter()
            .any(|v| !v.trim().is_empty())
    }

    /// Builds the profile, defaulting a missing start date to `today`.
    /// Field text is kept exactly as typed.
    pub fn into_profile(self, today: NaiveDate) -> EmployeeProfile {
        EmployeeProfile {
            name: self.name,
            role: self.role,
            department: self.department,
            start_date: self
                .start_date
                .unwrap_or(today)
                .format("%Y-%m-%d")
                .to_string(),
            previous_experience: self.previous_experience,
            goals: self.goals,
        }
    }
}
