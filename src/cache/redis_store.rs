//! Redis Backend Module
//!
//! Shared cache backend for multi-instance deployments. Redis drops keys
//! strictly at TTL expiry, so every write also stores a shadow copy under
//! [`STALE_PREFIX`] that lives for the extra retention window. Fresh reads hit
//! the primary key, stale reads hit the shadow.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::debug;

use crate::cache::CacheBackend;
use crate::error::CacheError;

/// Namespace for retained copies of expiring entries.
pub const STALE_PREFIX: &str = "stale:";

/// Keys fetched per SCAN round trip.
const SCAN_BATCH: usize = 200;

// == Redis Backend ==
#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
    stale_retention: u64,
}

impl RedisBackend {
    /// Opens a managed connection, giving up after `connect_timeout`.
    ///
    /// Every later command, including reconnects, is bounded by
    /// `response_timeout` so a stalled server surfaces as an error.
    pub async fn connect(
        url: &str,
        stale_retention: u64,
        connect_timeout: Duration,
        response_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let config = ConnectionManagerConfig::new()
            .set_connection_timeout(connect_timeout)
            .set_response_timeout(response_timeout);
        let conn = tokio::time::timeout(
            connect_timeout,
            client.get_connection_manager_with_config(config),
        )
        .await
            .map_err(|_| {
                CacheError::Unavailable(format!(
                    "no connection after {}s",
                    connect_timeout.as_secs()
                ))
            })??;

        Ok(Self {
            conn,
            stale_retention,
        })
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn scan_delete(&self, pattern: &str) -> Result<usize, CacheError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                let count: usize = redis::cmd("DEL").arg(&keys).query_async(&mut conn).await?;
                removed += count;
            }

            if next == 0 {
                return Ok(removed);
            }
            cursor = next;
        }
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.read(key).await
    }

    async fn get_ignoring_expiry(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.read(&shadow_key(key)).await
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl_secs: u64,
    ) -> Result<(), CacheError> {
        // Redis rejects EX 0
        let ttl = ttl_secs.max(1);
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("SET")
            .arg(key)
            .arg(&value)
            .arg("EX")
            .arg(ttl)
            .ignore()
            .cmd("SET")
            .arg(shadow_key(key))
            .arg(&value)
            .arg("EX")
            .arg(ttl.saturating_add(self.stale_retention))
            .ignore();

        let _: () = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let escaped = escape_glob(prefix);
        let primary = self.scan_delete(&format!("{escaped}*")).await?;
        let shadow = self
            .scan_delete(&format!("{}{escaped}*", escape_glob(STALE_PREFIX)))
            .await?;
        Ok(primary + shadow)
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn close(&self) {
        debug!("Releasing Redis connection manager");
    }
}

/// Key holding the retained copy of `key`.
pub fn shadow_key(key: &str) -> String {
    format!("{STALE_PREFIX}{key}")
}

/// Escapes Redis glob metacharacters so a prefix matches literally.
pub fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
