//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations with no domain knowledge:
//! - Entropy helpers over the OS RNG
//! - Password hashing (Argon2id) and password policy

pub mod crypto;
pub mod password;
