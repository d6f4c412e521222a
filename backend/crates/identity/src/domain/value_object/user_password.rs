//! User Password Value Object
//!
//! Domain wrapper around `platform::password::ClearTextPassword`.
//! The plaintext is zeroized on drop and never appears in `Debug` output.

use platform::password::{ClearTextPassword, PasswordPolicyError};
use std::fmt;

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Validate a password offered at registration
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// Accept any input for verification, including empty strings.
    ///
    /// Rejecting early here would make an empty password measurably faster
    /// than a wrong one.
    pub fn for_verification(raw: String) -> Self {
        Self(ClearTextPassword::new_unchecked(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected_for_registration() {
        assert!(RawPassword::new(String::new()).is_err());
        assert!(RawPassword::new("s3cret!".to_string()).is_ok());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::for_verification("s3cret!".to_string());
        let debug_output = format!("{:?}", raw);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("s3cret"));
    }
}
