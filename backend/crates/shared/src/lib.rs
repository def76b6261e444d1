//! Shared Kernel
//!
//! The smallest vocabulary every backend crate agrees on:
//! - the error taxonomy (`ErrorKind`) and the unified `AppError`
//! - typed string identifiers
//!
//! Anything domain specific lives in the owning crate, not here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
