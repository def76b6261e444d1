//! Update Role Use Case

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

pub struct UpdateRoleUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> UpdateRoleUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Parse the role code and apply it. Tokens already issued keep the
    /// old role until they expire.
    pub async fn execute(&self, user_id: &UserId, role: &str) -> AuthResult<UserRole> {
        let role: UserRole = role.trim().parse()?;
        self.repo.update_role(user_id, role).await?;

        tracing::info!(user_id = %user_id, role = %role, "User role updated");

        Ok(role)
    }
}
