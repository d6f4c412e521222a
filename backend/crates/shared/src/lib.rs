//! Shared Kernel - Domain-crossing minimal core
//!
//! Holds the error vocabulary every identity crate agrees on:
//! - [`error::kind::ErrorKind`] classifies a failure and maps it to a status code
//! - [`error::app_error::AppError`] is the outward-facing error value
//!
//! Domain crates keep their own `thiserror` enums and convert into
//! [`AppError`](error::app_error::AppError) at the transport boundary.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
