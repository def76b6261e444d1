//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
mod hashing;
pub mod list_users;
pub mod sign_in;
pub mod sign_up;
pub mod token;
pub mod update_role;

// Re-exports
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use hashing::DecoyHash;
pub use list_users::ListUsersUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{AuthOutput, SignUpInput, SignUpUseCase};
pub use token::{AuthContext, IssuedToken, TokenClaims, TokenService};
pub use update_role::UpdateRoleUseCase;
