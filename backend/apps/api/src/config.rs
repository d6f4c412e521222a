//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use identity::AuthConfig;
use platform::password::HashingCost;
use platform::token::{MAX_TOKEN_TTL, SigningKey};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub signing_key: Option<SigningKey>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let defaults = HashingCost::default();
        let hashing_cost = HashingCost {
            memory_kib: parse_var("AUTH_HASH_MEMORY_KIB")?.unwrap_or(defaults.memory_kib),
            iterations: parse_var("AUTH_HASH_ITERATIONS")?.unwrap_or(defaults.iterations),
            ..defaults
        };

        let mut auth = AuthConfig::default()
            .with_hashing_cost(hashing_cost)
            .with_pepper(env::var("AUTH_PASSWORD_PEPPER").ok().map(String::into_bytes));

        if let Some(secs) = parse_var::<u64>("AUTH_TOKEN_TTL_SECS")? {
            auth = auth.with_token_ttl(token_ttl(secs)?);
        }

        Ok(Self {
            bind_addr,
            database_url,
            frontend_origins,
            auth,
            signing_key: load_signing_key(),
        })
    }
}

/// Signing key from `AUTH_TOKEN_SECRET`.
///
/// Debug builds fall back to a random key. Release builds without a valid key
/// start anyway but refuse to issue tokens.
fn load_signing_key() -> Option<SigningKey> {
    match env::var("AUTH_TOKEN_SECRET") {
        Ok(encoded) => match SigningKey::from_base64(&encoded) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::error!(error = %e, "AUTH_TOKEN_SECRET rejected; token issuance disabled");
                None
            }
        },
        Err(_) if cfg!(debug_assertions) => {
            tracing::warn!("AUTH_TOKEN_SECRET not set; using a random development key");
            Some(SigningKey::generate())
        }
        Err(_) => {
            tracing::error!("AUTH_TOKEN_SECRET not set; token issuance disabled");
            None
        }
    }
}

fn token_ttl(secs: u64) -> anyhow::Result<Duration> {
    let ttl = Duration::from_secs(secs);
    anyhow::ensure!(secs > 0, "AUTH_TOKEN_TTL_SECS must be positive");
    anyhow::ensure!(
        ttl <= MAX_TOKEN_TTL,
        "AUTH_TOKEN_TTL_SECS must be at most {}",
        MAX_TOKEN_TTL.as_secs()
    );
    Ok(ttl)
}

fn parse_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} is not a valid number")),
        Err(_) => Ok(None),
    }
}
