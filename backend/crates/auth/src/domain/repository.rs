//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

/// Credential store
///
/// Email uniqueness is enforced here, atomically: two concurrent `create`
/// calls with the same email must not both succeed.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user. `AuthError::EmailExists` if the email is taken.
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by email (exact match)
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// All users, newest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    /// Change a user's role. `AuthError::UserNotFound` if no such user.
    async fn update_role(&self, user_id: &UserId, role: UserRole) -> AuthResult<()>;
}
