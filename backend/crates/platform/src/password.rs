//! Password Hashing and Verification
//!
//! One-way credential hashing with:
//! - Argon2id (memory-hard) with a tunable work factor
//! - Random 128-bit salt per hash, drawn from the OS RNG
//! - Constant-time verification using the parameters embedded in the hash
//! - Zeroization of clear text and peppered buffers
//! - Optional application-wide pepper
//!
//! ## Failure model
//! - Hashing returns [`PasswordHashError`] when Argon2 or the RNG fails. It
//!   never produces an empty or predictable hash.
//! - Verification never fails: a malformed or foreign hash is a mismatch.

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::{RngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::random_bytes;

/// Salt length in bytes (128 bits)
const SALT_LEN: usize = 16;

/// Length of the random secret behind the placeholder hash
const PLACEHOLDER_SECRET_LEN: usize = 32;

// ============================================================================
// Error Types
// ============================================================================

/// Password input rejected before hashing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Work factor outside what Argon2 accepts
    #[error("Invalid hashing parameters: {0}")]
    InvalidCost(String),

    /// Entropy source unavailable
    #[error("Salt generation failed: {0}")]
    SaltUnavailable(String),

    /// Hashing operation failed
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Work factor
// ============================================================================

/// Argon2id work factor
///
/// The default is the OWASP baseline for Argon2id:
/// m=19456 KiB (19 MiB), t=2, p=1. Raising any field raises the CPU and
/// memory cost of every hash and every verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism (lanes)
    pub parallelism: u32,
}

impl Default for HashingCost {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingCost {
    /// Cheapest parameters Argon2 accepts. Only for tests.
    pub const fn for_tests() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: Params::MIN_T_COST,
            parallelism: Params::MIN_P_COST,
        }
    }

    fn params(&self) -> Result<Params, PasswordHashError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| PasswordHashError::InvalidCost(e.to_string()))
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// The only policy enforced here is non-emptiness. Bytes are hashed exactly
/// as given, so two different inputs never collapse to the same credential.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        if raw.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }
        Ok(Self(raw))
    }

    /// Wrap without the emptiness check.
    ///
    /// Used on the authentication path, where an empty password must still
    /// go through a full verification instead of failing fast.
    pub fn new_unchecked(raw: String) -> Self {
        Self(raw)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Hashed password in PHC string format
///
/// `$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`
///
/// The value is opaque: a string loaded from storage is accepted as-is and
/// only parsed during verification, where a malformed value is a mismatch.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Wrap a stored PHC string
    pub fn from_phc_string(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    /// Get the PHC string for storage
    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Whether the stored value is a complete Argon2id PHC string
    pub fn is_well_formed(&self) -> bool {
        self.argon2id().is_some()
    }

    fn argon2id(&self) -> Option<PasswordHash<'_>> {
        PasswordHash::new(&self.hash)
            .ok()
            .filter(|parsed| parsed.algorithm == Algorithm::Argon2id.ident())
            .filter(|parsed| parsed.hash.is_some())
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Argon2id hasher bound to one work factor and an optional pepper
///
/// Construction also derives a placeholder hash of random bytes with the same
/// cost. Verifying against it takes as long as verifying a real credential,
/// which lets callers give "unknown user" and "wrong password" the same
/// execution profile.
pub struct CredentialHasher {
    argon2: Argon2<'static>,
    cost: HashingCost,
    pepper: Option<Zeroizing<Vec<u8>>>,
    placeholder: HashedPassword,
}

impl CredentialHasher {
    pub fn new(cost: HashingCost) -> Result<Self, PasswordHashError> {
        Self::with_pepper(cost, None)
    }

    /// ## Arguments
    /// * `pepper` - Application-wide secret appended to every password.
    ///   It must stay the same for the lifetime of the stored hashes.
    pub fn with_pepper(
        cost: HashingCost,
        pepper: Option<Vec<u8>>,
    ) -> Result<Self, PasswordHashError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, cost.params()?);

        let mut hasher = Self {
            argon2,
            cost,
            pepper: pepper.map(Zeroizing::new),
            placeholder: HashedPassword::from_phc_string(String::new()),
        };

        let secret = Zeroizing::new(random_bytes(PLACEHOLDER_SECRET_LEN));
        hasher.placeholder = hasher.hash_bytes(&secret)?;

        Ok(hasher)
    }

    pub fn cost(&self) -> HashingCost {
        self.cost
    }

    /// Hash the password for storage
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        self.hash_bytes(password.as_bytes())
    }

    /// Verify a password against a stored hash
    ///
    /// Algorithm, version and cost are read from the hash itself, so hashes
    /// produced under an older work factor keep verifying. The final digest
    /// comparison is constant-time.
    ///
    /// A stored value that is not a complete Argon2id hash (corrupt, or a
    /// legacy format such as bcrypt) is a mismatch, but still costs a full
    /// verification against the placeholder.
    pub fn verify(&self, hash: &HashedPassword, password: &ClearTextPassword) -> bool {
        let peppered = self.peppered(password.as_bytes());

        match hash.argon2id() {
            Some(parsed) => self.argon2.verify_password(&peppered, &parsed).is_ok(),
            None => {
                if let Some(placeholder) = self.placeholder.argon2id() {
                    let _ = self.argon2.verify_password(&peppered, &placeholder);
                }
                false
            }
        }
    }

    /// Hash to verify against when no stored credential exists
    pub fn placeholder_hash(&self) -> &HashedPassword {
        &self.placeholder
    }

    fn hash_bytes(&self, bytes: &[u8]) -> Result<HashedPassword, PasswordHashError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| PasswordHashError::SaltUnavailable(e.to_string()))?;

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| PasswordHashError::SaltUnavailable(e.to_string()))?;

        let peppered = self.peppered(bytes);

        let hash = self
            .argon2
            .hash_password(&peppered, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        let hash = hash.to_string();
        if hash.is_empty() {
            return Err(PasswordHashError::HashingFailed(
                "empty hash output".to_string(),
            ));
        }

        Ok(HashedPassword { hash })
    }

    fn peppered(&self, bytes: &[u8]) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(bytes.to_vec());
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        combined
    }
}

impl fmt::Debug for CredentialHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialHasher")
            .field("cost", &self.cost)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
