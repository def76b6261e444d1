//! Argon2 is deliberately slow; keep it off the async workers.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashing};
use tokio::sync::OnceCell;

use crate::error::{AuthError, AuthResult};

pub(crate) async fn hash_password(
    hasher: Arc<dyn PasswordHashing>,
    password: ClearTextPassword,
) -> AuthResult<HashedPassword> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Hashing task failed: {e}")))?
        .map_err(AuthError::from)
}

pub(crate) async fn verify_password(
    hasher: Arc<dyn PasswordHashing>,
    password: ClearTextPassword,
    hashed: HashedPassword,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &hashed))
        .await
        .map_err(|e| AuthError::Internal(format!("Verification task failed: {e}")))
}

const DECOY_PASSWORD: &str = "no account has this password";

/// Stand-in hash verified against when sign-in finds no account, so an
/// unknown email costs the same Argon2 work as a wrong password.
///
/// Hashed with the configured hasher on first use, then reused.
#[derive(Default)]
pub struct DecoyHash(OnceCell<HashedPassword>);

impl DecoyHash {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn get(
        &self,
        hasher: &Arc<dyn PasswordHashing>,
    ) -> AuthResult<HashedPassword> {
        let hashed = self
            .0
            .get_or_try_init(|| {
                let password = ClearTextPassword::for_verification(DECOY_PASSWORD.to_string());
                hash_password(hasher.clone(), password)
            })
            .await?;
        Ok(hashed.clone())
    }
}
