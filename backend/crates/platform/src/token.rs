//! Access Token Issuance and Verification
//!
//! Stateless, time-bounded identity tokens: HS256-signed JWTs carrying
//! `{sub, iat, exp}`. Nothing is stored server-side; a token expires purely by
//! elapsed time.
//!
//! The symmetric key is injected configuration. It is never compiled in and
//! can be replaced at runtime with [`TokenIssuer::rotate`]. The key it
//! replaces is kept for verification only, so tokens issued just before a
//! rotation stay valid until they expire.
//!
//! ## Failure model
//! - Issuance without a key, with a lifetime past [`MAX_TOKEN_TTL`], or any
//!   encoder failure is an error. An empty string is never handed out.
//! - Every verification failure (bad signature, wrong algorithm, malformed,
//!   expired) is the same [`TokenError::InvalidToken`].

use std::fmt;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{from_base64, random_bytes};

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Longest accepted token lifetime (10 years)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

/// Scheme for the `Authorization` header
pub const TOKEN_TYPE: &str = "Bearer";

/// Minimum HS256 key length in bytes
pub const MIN_KEY_LEN: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum TokenError {
    /// No signing key has been configured
    #[error("No token signing key configured")]
    MissingKey,

    /// Key material rejected at load time
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// Lifetime too long to express as an expiry timestamp
    #[error("Token lifetime of {0:?} is out of range")]
    InvalidTtl(Duration),

    /// Encoder failed to sign the claims
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// Token rejected
    #[error("Invalid or expired token")]
    InvalidToken,
}

// ============================================================================
// Claims
// ============================================================================

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration time (Unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        from_unix(self.iat)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        from_unix(self.exp)
    }

    /// Valid strictly before `exp`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.exp
    }
}

fn from_unix(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A freshly signed token and the claims inside it
#[derive(Clone)]
pub struct IssuedToken {
    token: String,
    claims: Claims,
}

impl IssuedToken {
    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    pub fn subject(&self) -> &str {
        &self.claims.sub
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"[REDACTED]")
            .field("claims", &self.claims)
            .finish()
    }
}

// ============================================================================
// Signing key
// ============================================================================

/// Symmetric signing secret, zeroized on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(bytes: Vec<u8>) -> Result<Self, TokenError> {
        if bytes.len() < MIN_KEY_LEN {
            return Err(TokenError::InvalidKey(format!(
                "key must be at least {} bytes (got {})",
                MIN_KEY_LEN,
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Load from a base64 string (environment / secret store)
    pub fn from_base64(encoded: &str) -> Result<Self, TokenError> {
        let bytes = from_base64(encoded).map_err(|e| TokenError::InvalidKey(e.to_string()))?;
        Self::new(bytes)
    }

    /// Random key (development only; tokens die with the process)
    pub fn generate() -> Self {
        Self(random_bytes(MIN_KEY_LEN))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

/// Encoder/decoder pair derived from one secret
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn new(key: &SigningKey) -> Self {
        Self {
            encoding: EncodingKey::from_secret(&key.0),
            decoding: DecodingKey::from_secret(&key.0),
        }
    }
}

#[derive(Default)]
struct KeyRing {
    current: Option<Keys>,
    previous: Option<Keys>,
}

// ============================================================================
// Token issuer
// ============================================================================

/// Issues and verifies access tokens
pub struct TokenIssuer {
    keys: RwLock<KeyRing>,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(key: SigningKey, ttl: Duration) -> Self {
        Self {
            keys: RwLock::new(KeyRing {
                current: Some(Keys::new(&key)),
                previous: None,
            }),
            ttl,
        }
    }

    /// Issuer that refuses to sign until a key is rotated in
    pub fn without_key(ttl: Duration) -> Self {
        Self {
            keys: RwLock::new(KeyRing::default()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn has_key(&self) -> bool {
        self.keys
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .is_some()
    }

    /// Install a new signing key; the old one stays valid for verification
    pub fn rotate(&self, key: SigningKey) {
        let mut ring = self.keys.write().unwrap_or_else(PoisonError::into_inner);
        ring.previous = ring.current.replace(Keys::new(&key));
        tracing::info!("Token signing key rotated");
    }

    pub fn issue(&self, subject: &str) -> Result<IssuedToken, TokenError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue with an explicit clock reading
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let iat = now.timestamp();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .filter(|_| self.ttl <= MAX_TOKEN_TTL)
            .and_then(|ttl| iat.checked_add(ttl))
            .ok_or(TokenError::InvalidTtl(self.ttl))?;
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };

        let ring = self.keys.read().unwrap_or_else(PoisonError::into_inner);
        let keys = ring.current.as_ref().ok_or(TokenError::MissingKey)?;

        let token =
            encode(&Header::new(ALGORITHM), &claims, &keys.encoding).map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, claims })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and algorithm, then require `now < exp`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let ring = self.keys.read().unwrap_or_else(PoisonError::into_inner);

        let claims = [ring.current.as_ref(), ring.previous.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|keys| decode::<Claims>(token, &keys.decoding, &validation()).ok())
            .map(|data| data.claims)
            .ok_or(TokenError::InvalidToken)?;

        if !claims.is_live_at(now) {
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("has_key", &self.has_key())
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Expiry is checked against the caller's clock, not the library's.
fn validation() -> Validation {
    let mut validation = Validation::new(ALGORITHM);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}

// ============================================================================
// Tests
// ============================================================================
