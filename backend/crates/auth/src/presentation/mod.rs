//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{RoleGate, extract_bearer_token, require_auth, require_role};
pub use router::{admin_router, api_router, auth_router};
