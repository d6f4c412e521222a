//! Credential Entity
//!
//! The durable `(username, password hash)` pair. Created once at
//! registration and only ever read afterwards.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::user_name::UserName;

/// Credential record
///
/// `Debug` output shows the username but never the hash.
#[derive(Debug, Clone)]
pub struct Credential {
    /// Unique key
    pub username: UserName,
    /// Argon2id PHC string
    pub password_hash: HashedPassword,
    /// Registration time
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Create a new credential record
    pub fn new(username: UserName, password_hash: HashedPassword) -> Self {
        Self {
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Rebuild a record loaded from storage
    pub fn restore(
        username: UserName,
        password_hash: HashedPassword,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username,
            password_hash,
            created_at,
        }
    }
}
