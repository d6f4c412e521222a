//! Platform Crate - Technical Infrastructure
//!
//! Cryptographic building blocks for the identity core:
//! - Password hashing (Argon2id with a tunable work factor)
//! - Signed, time-bounded access tokens (HS256 JWT)
//! - Small crypto helpers (OS randomness, base64)

pub mod crypto;
pub mod password;
pub mod token;
