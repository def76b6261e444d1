//! Sign Up Use Case
//!
//! Creates a new user account and signs it in.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::password::{ClearTextPassword, PasswordHashing};

use crate::application::hashing::hash_password;
use crate::application::token::TokenService;
use crate::domain::entity::user::{User, UserProfile};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, full_name::FullName, user_id::generate_user_id, user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    /// Role code; absent or empty means viewer
    pub role: Option<String>,
}

/// Result of a successful sign-up or sign-in
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub user: UserProfile,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Sign up use case
pub struct SignUpUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    hasher: Arc<dyn PasswordHashing>,
    tokens: Arc<TokenService>,
}

impl<R> SignUpUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, hasher: Arc<dyn PasswordHashing>, tokens: Arc<TokenService>) -> Self {
        Self {
            repo,
            hasher,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<AuthOutput> {
        let user = self.register(input).await?;
        let issued = self.tokens.issue(&user)?;

        Ok(AuthOutput {
            user: user.into(),
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    /// Validate, hash and persist a new user without issuing a token.
    pub async fn register(&self, input: SignUpInput) -> AuthResult<User> {
        // Role first: an unknown role must not touch the store
        let role = UserRole::resolve(input.role.as_deref())?;

        let full_name = FullName::new(&input.full_name)?;
        let email = Email::new(&input.email)?;
        let password = ClearTextPassword::new(input.password)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailExists);
        }

        let password_hash = hash_password(self.hasher.clone(), password).await?;
        let user = User::new(generate_user_id(), full_name, email, password_hash, role);

        // The pre-check can race; the store's constraint is authoritative
        self.repo.create(&user).await?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            "User signed up"
        );

        Ok(user)
    }
}
