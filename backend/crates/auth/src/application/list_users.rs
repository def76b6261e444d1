//! List Users Use Case

use std::sync::Arc;

use crate::domain::entity::user::UserProfile;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct ListUsersUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All users, newest first
    pub async fn execute(&self) -> AuthResult<Vec<UserProfile>> {
        let users = self.repo.list().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }
}
