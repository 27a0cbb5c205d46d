use serde::{Deserialize, Serialize};

use crate::models::profile::EmployeeProfile;

/// Column order of the tabular store. The header row must match this exactly.
pub const RECORD_COLUMNS: [&str; 6] = [
    "name",
    "role",
    "department",
    "start_date",
    "previous_experience",
    "goals",
];

/// One flattened employee profile row. No key; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    pub name: String,
    pub role: String,
    pub department: String,
    pub start_date: String,
    pub previous_experience: String,
    pub goals: String,
}

impl From<&EmployeeProfile> for PersistedRecord {
    fn from(profile: &EmployeeProfile) -> Self {
        Self {
            name: profile.name.clone(),
            role: profile.role.clone(),
            department: profile.department.clone(),
            start_date: profile.start_date.clone(),
            previous_experience: profile.previous_experience.clone(),
            goals: profile.goals.clone(),
        }
    }
}
