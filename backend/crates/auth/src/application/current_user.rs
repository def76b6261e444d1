//! Current User Use Case
//!
//! Resolves the authenticated caller to their stored profile.

use std::sync::Arc;

use crate::application::token::AuthContext;
use crate::domain::entity::user::UserProfile;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
}

impl<R> CurrentUserUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, ctx: &AuthContext) -> AuthResult<UserProfile> {
        self.repo
            .find_by_id(&ctx.user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }
}
