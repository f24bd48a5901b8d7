//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MENTECARE_*` environment variables, and
//! configuration files. Secrets are validated against the build mode: debug
//! builds tolerate missing values with a warning, release builds refuse to
//! start.

use std::net::{AddrParseError, SocketAddr};

use chrono::TimeDelta;
use mockable::Env;
use ortho_config::OrthoConfig;
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DATABASE_URL_FALLBACK_ENV: &str = "DATABASE_URL";
/// Shortest signing secret accepted in release builds.
pub const JWT_SECRET_MIN_LEN: usize = 32;
const EPHEMERAL_SECRET_LEN: usize = 64;

/// Build mode used when validating secrets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds fall back to ephemeral values and warn.
    Debug,
    /// Release builds require explicit, strong values.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mentecare::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Neither `MENTECARE_DATABASE_URL` nor `DATABASE_URL` is set.
    #[error("database url is not configured; set MENTECARE_DATABASE_URL or DATABASE_URL")]
    MissingDatabaseUrl,
    /// The bind address does not parse.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: AddrParseError,
    },
    /// Release builds need a signing secret.
    #[error("MENTECARE_JWT_SECRET must be set in release builds")]
    MissingJwtSecret,
    /// The signing secret is too short for release builds.
    #[error("MENTECARE_JWT_SECRET too short: need >= {min_len} bytes, got {length}")]
    WeakJwtSecret { length: usize, min_len: usize },
}

/// Server and seeding configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MENTECARE")]
pub struct AppSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: Option<String>,
    /// Token lifetime in seconds; unset or zero issues non-expiring tokens.
    pub token_ttl_secs: Option<u64>,
    /// Maximum number of pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Insert the demo dataset on startup.
    #[ortho_config(default = false)]
    pub seed_demo_data: bool,
}

impl AppSettings {
    /// Configured database URL, falling back to `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when neither is set.
    pub fn database_url<E: Env>(&self, env: &E) -> Result<String, SettingsError> {
        self.database_url
            .clone()
            .or_else(|| env.string(DATABASE_URL_FALLBACK_ENV))
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// Socket address to bind, defaulting to `0.0.0.0:5000`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value does not
    /// parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Token lifetime, or `None` for tokens that never expire.
    #[must_use]
    pub fn token_ttl(&self) -> Option<TimeDelta> {
        self.token_ttl_secs
            .filter(|secs| *secs > 0)
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(TimeDelta::try_seconds)
    }

    /// Pool size, defaulting to ten connections.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Resolve the token signing secret for `mode`.
    ///
    /// # Errors
    ///
    /// In release builds returns [`SettingsError::MissingJwtSecret`] or
    /// [`SettingsError::WeakJwtSecret`]. Debug builds never fail.
    pub fn signing_secret(&self, mode: BuildMode) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref() {
            Some(secret) if secret.len() >= JWT_SECRET_MIN_LEN => {
                Ok(Zeroizing::new(secret.as_bytes().to_vec()))
            }
            Some(secret) if mode.is_debug() => {
                warn!(
                    length = secret.len(),
                    min_len = JWT_SECRET_MIN_LEN,
                    "MENTECARE_JWT_SECRET is short; accepted in debug builds only"
                );
                Ok(Zeroizing::new(secret.as_bytes().to_vec()))
            }
            Some(secret) => Err(SettingsError::WeakJwtSecret {
                length: secret.len(),
                min_len: JWT_SECRET_MIN_LEN,
            }),
            None if mode.is_debug() => {
                warn!("MENTECARE_JWT_SECRET not set; using an ephemeral secret (dev only)");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
                OsRng.fill_bytes(secret.as_mut_slice());
                Ok(secret)
            }
            None => Err(SettingsError::MissingJwtSecret),
        }
    }
}
