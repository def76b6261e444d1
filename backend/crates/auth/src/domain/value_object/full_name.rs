//! Full Name Value Object
//!
//! Display name given at sign-up. Free text: any script, inner spaces allowed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AuthError, AuthResult};

/// Maximum full name length (in characters)
pub const FULL_NAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Trim and validate: non-empty, at most [`FULL_NAME_MAX_LENGTH`] characters,
    /// no control characters.
    pub fn new(input: impl AsRef<str>) -> AuthResult<Self> {
        let name = input.as_ref().trim();

        if name.is_empty() {
            return Err(AuthError::Validation("Full name cannot be empty".into()));
        }

        let length = name.chars().count();
        if length > FULL_NAME_MAX_LENGTH {
            return Err(AuthError::Validation(format!(
                "Full name is too long ({length} chars, maximum {FULL_NAME_MAX_LENGTH})"
            )));
        }

        if name.chars().any(char::is_control) {
            return Err(AuthError::Validation(
                "Full name cannot contain control characters".into(),
            ));
        }

        Ok(Self(name.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
