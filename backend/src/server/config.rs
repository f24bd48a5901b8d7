//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use chrono::TimeDelta;
use mentecare::outbound::persistence::DbPool;
use zeroize::Zeroizing;

/// Resolved dependencies and settings for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) signing_secret: Zeroizing<Vec<u8>>,
    pub(crate) token_ttl: Option<TimeDelta>,
}

impl ServerConfig {
    /// Construct a server configuration around a connected pool.
    #[must_use]
    pub fn new(
        bind_addr: SocketAddr,
        db_pool: DbPool,
        signing_secret: Zeroizing<Vec<u8>>,
    ) -> Self {
        Self {
            bind_addr,
            db_pool,
            signing_secret,
            token_ttl: None,
        }
    }

    /// Issue tokens that expire after `ttl`; `None` keeps them valid forever.
    #[must_use]
    pub fn with_token_ttl(mut self, ttl: Option<TimeDelta>) -> Self {
        self.token_ttl = ttl;
        self
    }
}
