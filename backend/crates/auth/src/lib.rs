//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token service
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign-up and login with email + password
//! - Stateless HS256 bearer tokens (24h by default)
//! - Role-based access (Admin, Manager, Analyst, Viewer)
//! - Admin user management (list, create, change role)
//!
//! ## Security Model
//! - Passwords hashed with Argon2id on the blocking pool
//! - Login failures are indistinguishable to the caller
//! - Password hashes never leave the application layer

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, MAX_TOKEN_TTL};
pub use application::token::{AuthContext, TokenService};
pub use domain::value_object::user_role::UserRole;
pub use error::{AuthError, AuthResult};
pub use infra::{memory::InMemoryUserRepository, postgres::PgUserRepository};
pub use presentation::handlers::AuthAppState;
pub use presentation::router::api_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[cfg(test)]
mod tests;
