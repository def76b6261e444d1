//! Bearer Tokens
//!
//! Stateless HS256 tokens carrying the user id, role and email. Validation
//! never consults the store, so a role change takes effect for a user only
//! once their current token expires.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::{AuthConfig, MAX_TOKEN_TTL};
use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Token claims, identical for issue and validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    pub role: UserRole,
    pub email: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    pub fn user_id(&self) -> UserId {
        UserId::from_string(self.sub.clone())
    }

    /// Zero leeway: a token is dead from its `exp` second onward
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub role: UserRole,
    pub email: String,
}

impl From<TokenClaims> for AuthContext {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: UserId::from_string(claims.sub),
            role: claims.role,
            email: claims.email,
        }
    }
}

/// Issues and validates bearer tokens with the secret from [`AuthConfig`]
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenService {
    /// Fails when the configured lifetime is zero or above [`MAX_TOKEN_TTL`],
    /// so a bad TTL stops startup instead of every `issue`.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        if config.token_ttl.is_zero() || config.token_ttl > MAX_TOKEN_TTL {
            return Err(AuthError::Internal(format!(
                "Token TTL must be between 1s and {}s, got {}s",
                MAX_TOKEN_TTL.as_secs(),
                config.token_ttl.as_secs()
            )));
        }
        let ttl = TimeDelta::from_std(config.token_ttl)
            .map_err(|e| AuthError::Internal(format!("Token TTL out of range: {e}")))?;

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        self.issue_at(user, Utc::now())
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> AuthResult<IssuedToken> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| AuthError::Internal("Token expiry out of range".to_string()))?;

        let claims = TokenClaims {
            sub: user.id.as_str().to_string(),
            role: user.role,
            email: user.email.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        Ok(IssuedToken { token, expires_at })
    }

    pub fn validate(&self, token: &str) -> AuthResult<TokenClaims> {
        self.validate_at(token, Utc::now())
    }

    /// Verify signature, algorithm and shape, then expiry relative to `now`.
    /// Every failure is reported as [`AuthError::InvalidToken`].
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<TokenClaims> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                AuthError::InvalidToken
            })?
            .claims;

        if claims.is_expired_at(now) {
            tracing::debug!(sub = %claims.sub, exp = claims.exp, "Token expired");
            return Err(AuthError::InvalidToken);
        }

        Ok(claims)
    }
}
