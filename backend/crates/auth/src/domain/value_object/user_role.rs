use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AuthError;

/// Closed set of roles. Storage and tokens carry the lowercase code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Manager,
    Analyst,
    #[default]
    Viewer,
}

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::Admin,
        UserRole::Manager,
        UserRole::Analyst,
        UserRole::Viewer,
    ];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            Admin => "admin",
            Manager => "manager",
            Analyst => "analyst",
            Viewer => "viewer",
        }
    }

    /// Resolve a role supplied at sign-up: absent or blank means viewer.
    pub fn resolve(code: Option<&str>) -> Result<Self, AuthError> {
        match code.map(str::trim) {
            None | Some("") => Ok(UserRole::default()),
            Some(code) => code.parse(),
        }
    }
}

impl FromStr for UserRole {
    type Err = AuthError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        UserRole::ALL
            .into_iter()
            .find(|role| role.code() == code)
            .ok_or_else(|| AuthError::InvalidRole(code.to_string()))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
