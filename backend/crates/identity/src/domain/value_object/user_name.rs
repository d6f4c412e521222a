//! User Name Value Object
//!
//! The username is the unique key of a credential record and the `sub` claim
//! of every token issued for it.
//!
//! ## Invariants
//! - Non-empty
//! - Stored and compared exactly as given (no trimming, no case folding), so
//!   the subject of an issued token always equals the registered name

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when user name validation fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserNameError {
    #[error("Username cannot be empty")]
    Empty,
}

/// Validated user name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: impl Into<String>) -> Result<Self, UserNameError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(UserNameError::Empty);
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert_eq!(UserName::new(""), Err(UserNameError::Empty));
    }

    #[test]
    fn test_kept_verbatim() {
        assert_eq!(UserName::new("Alice").unwrap().as_str(), "Alice");
        assert_eq!(UserName::new(" bob ").unwrap().as_str(), " bob ");
        assert_eq!(UserName::new("ユーザー").unwrap().to_string(), "ユーザー");
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(UserName::new("alice").unwrap(), UserName::new("ALICE").unwrap());
    }

    #[test]
    fn test_serde_validates() {
        let name: UserName = serde_json::from_str("\"carol\"").unwrap();
        assert_eq!(name.as_str(), "carol");
        assert!(serde_json::from_str::<UserName>("\"\"").is_err());
    }
}
