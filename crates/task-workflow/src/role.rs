//! User roles that act on annotation tasks

use crate::error::{Result, WorkflowError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/// Actor category, ordinally indexed as the user type is stored on accounts
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    Annotator = 0,
    Auditor = 1,
    Admin = 2,
    TeamAdmin = 3,
    Qa = 4,
}

impl Role {
    pub fn from_ordinal(ordinal: i64) -> Result<Self> {
        Self::iter()
            .find(|role| role.ordinal() == ordinal)
            .ok_or(WorkflowError::InvalidRole { ordinal })
    }

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    /// snake_case key used in policy files
    pub fn key(self) -> &'static str {
        self.into()
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Annotator => "Annotator",
            Self::Auditor => "Auditor",
            Self::Admin => "Admin",
            Self::TeamAdmin => "Team-Admin",
            Self::Qa => "QA",
        }
    }
}

/// Accepts the key (`team_admin`, `team-admin`) or the ordinal (`3`)
impl FromStr for Role {
    type Err = WorkflowError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(ordinal) = s.parse::<i64>() {
            return Self::from_ordinal(ordinal);
        }
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        Self::iter()
            .find(|role| role.key() == normalized)
            .ok_or_else(|| WorkflowError::UnknownRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_follow_user_types() {
        let ordinals: Vec<i64> = Role::iter().map(Role::ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3, 4]);
        assert_eq!(Role::from_ordinal(3), Ok(Role::TeamAdmin));
    }

    #[test]
    fn test_invalid_ordinal() {
        assert_eq!(
            Role::from_ordinal(5),
            Err(WorkflowError::InvalidRole { ordinal: 5 })
        );
        assert_eq!(
            Role::from_ordinal(-1),
            Err(WorkflowError::InvalidRole { ordinal: -1 })
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("team-admin".parse::<Role>(), Ok(Role::TeamAdmin));
        assert_eq!("TEAM_ADMIN".parse::<Role>(), Ok(Role::TeamAdmin));
        assert_eq!("qa".parse::<Role>(), Ok(Role::Qa));
        assert_eq!("0".parse::<Role>(), Ok(Role::Annotator));
        assert!(matches!(
            "reviewer".parse::<Role>(),
            Err(WorkflowError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_labels() {
        assert_eq!(Role::TeamAdmin.label(), "Team-Admin");
        assert_eq!(Role::Qa.to_string(), "qa");
    }
}
