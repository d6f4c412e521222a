//! Application Configuration
//!
//! Configuration for the identity application layer. The signing key is not
//! part of it: it is injected into `platform::token::TokenIssuer` at startup
//! and rotated there.

use std::fmt;
use std::time::Duration;

use platform::password::{CredentialHasher, HashingCost, PasswordHashError};
use platform::token::{DEFAULT_TOKEN_TTL, SigningKey, TokenIssuer};

/// Identity configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Access token lifetime (1 hour)
    pub token_ttl: Duration,
    /// Argon2id work factor
    pub hashing_cost: HashingCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl: DEFAULT_TOKEN_TTL,
            hashing_cost: HashingCost::default(),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Minimal hashing cost, for tests only
    pub fn for_tests() -> Self {
        Self {
            hashing_cost: HashingCost::for_tests(),
            ..Default::default()
        }
    }

    /// Lighter hashing for local runs (4 MiB, one pass)
    pub fn development() -> Self {
        Self {
            hashing_cost: HashingCost {
                memory_kib: 4096,
                iterations: 1,
                parallelism: 1,
            },
            ..Default::default()
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_hashing_cost(mut self, cost: HashingCost) -> Self {
        self.hashing_cost = cost;
        self
    }

    pub fn with_pepper(mut self, pepper: Option<Vec<u8>>) -> Self {
        self.password_pepper = pepper.filter(|p| !p.is_empty());
        self
    }

    /// Get token TTL in seconds
    pub fn token_ttl_secs(&self) -> u64 {
        self.token_ttl.as_secs()
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Build the hasher for this work factor and pepper
    pub fn build_hasher(&self) -> Result<CredentialHasher, PasswordHashError> {
        CredentialHasher::with_pepper(self.hashing_cost, self.password_pepper.clone())
    }

    /// Build an issuer; without a key it refuses to sign
    pub fn build_issuer(&self, key: Option<SigningKey>) -> TokenIssuer {
        match key {
            Some(key) => TokenIssuer::new(key, self.token_ttl),
            None => TokenIssuer::without_key(self.token_ttl),
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_ttl", &self.token_ttl)
            .field("hashing_cost", &self.hashing_cost)
            .field("password_pepper", &self.pepper().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_secs(), 3600);
        assert_eq!(config.hashing_cost, HashingCost::default());
        assert!(config.pepper().is_none());
    }

    #[test]
    fn test_issuer_without_key_cannot_sign() {
        let issuer = AuthConfig::for_tests().build_issuer(None);
        assert!(!issuer.has_key());
        assert!(issuer.issue("alice").is_err());
    }

    #[test]
    fn test_builders() {
        let config = AuthConfig::development()
            .with_token_ttl(Duration::from_secs(60))
            .with_pepper(Some(Vec::new()));
        assert_eq!(config.token_ttl_secs(), 60);
        assert_eq!(config.hashing_cost.memory_kib, 4096);
        assert!(config.pepper().is_none());
        assert!(config.build_hasher().is_ok());
    }

    #[test]
    fn test_pepper_redacted() {
        let config = AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::for_tests()
        };
        let debug_output = format!("{:?}", config);
        assert!(debug_output.contains("REDACTED"));
        assert!(config.build_hasher().is_ok());
    }
}
