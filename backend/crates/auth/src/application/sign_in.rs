//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a token.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHashing};

use crate::application::hashing::{DecoyHash, verify_password};
use crate::application::sign_up::AuthOutput;
use crate::application::token::TokenService;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHashing>,
    tokens: Arc<TokenService>,
    decoy: Arc<DecoyHash>,
}

impl<R> SignInUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, hasher: Arc<dyn PasswordHashing>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            decoy: Arc::new(DecoyHash::new()),
        }
    }

    /// Share a decoy hash across use case instances so it is built once
    pub fn with_decoy(mut self, decoy: Arc<DecoyHash>) -> Self {
        self.decoy = decoy;
        self
    }

    /// Every failure to authenticate is reported as `InvalidCredentials`,
    /// so the caller cannot tell which step failed. A missing account still
    /// runs one password verification, against the decoy hash.
    pub async fn execute(&self, input: SignInInput) -> AuthResult<AuthOutput> {
        let user = self.find_user(&input.email).await;

        let hashed = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.decoy.get(&self.hasher).await?,
        };
        let password = ClearTextPassword::for_verification(input.password);
        let valid = verify_password(self.hasher.clone(), password, hashed).await?;

        let user = match user {
            Some(user) if valid => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        let issued = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(AuthOutput {
            user: user.into(),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    async fn find_user(&self, raw_email: &str) -> Option<User> {
        let email = Email::new(raw_email).ok()?;
        match self.repo.find_by_email(&email).await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed during sign-in");
                None
            }
        }
    }
}
