//! User Entity
//!
//! A registered account. Holds the password hash, so it never leaves the
//! application layer; [`UserProfile`] is the outward projection.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;
use serde::Serialize;

use crate::domain::value_object::{
    email::Email, full_name::FullName, user_id::UserId, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Opaque identifier, fixed at creation
    pub id: UserId,
    pub full_name: FullName,
    /// Unique across the store
    pub email: Email,
    /// Argon2id PHC string
    pub password_hash: HashedPassword,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, stamped with the current time
    pub fn new(
        id: UserId,
        full_name: FullName,
        email: Email,
        password_hash: HashedPassword,
        role: UserRole,
    ) -> Self {
        Self {
            id,
            full_name,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    /// Update user role
    pub fn set_role(&mut self, role: UserRole) {
        self.role = role;
    }
}

/// The only user shape handed to callers outside the application layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: FullName,
    pub email: Email,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}
