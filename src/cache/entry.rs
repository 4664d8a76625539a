//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and a stale
//! retention window.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// An entry goes through two phases: fresh until `expires_at`, then stale
/// until `retain_until`. Stale entries are invisible to normal reads but can
/// still serve as a fallback.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// End of the stale retention window (Unix milliseconds)
    pub retain_until: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Freshness window in seconds
    /// * `retention_seconds` - How long the entry survives after expiring
    pub fn new(value: String, ttl_seconds: u64, retention_seconds: u64) -> Self {
        let now = current_timestamp_ms();
        let expires_at = now.saturating_add(ttl_seconds.saturating_mul(1000));
        let retain_until = expires_at.saturating_add(retention_seconds.saturating_mul(1000));

        Self {
            value,
            expires_at,
            retain_until,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired when the current time is greater
    /// than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Is Purgeable ==
    /// Checks if the stale retention window has also lapsed.
    pub fn is_purgeable(&self) -> bool {
        current_timestamp_ms() >= self.retain_until
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let before = current_timestamp_ms();
        let entry = CacheEntry::new("189.3".to_string(), 60, 300);

        assert_eq!(entry.value, "189.3");
        assert!(entry.expires_at >= before + 60_000);
        assert!(entry.expires_at <= current_timestamp_ms() + 60_000);
        assert_eq!(entry.retain_until - entry.expires_at, 300_000);
        assert!(!entry.is_expired());
        assert!(!entry.is_purgeable());
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), 1, 60);

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
        assert!(!entry.is_purgeable(), "Retention window should outlive TTL");
    }

    #[test]
    fn test_zero_ttl_is_immediately_stale() {
        let entry = CacheEntry::new("v".to_string(), 0, 60);
        assert!(entry.is_expired());
        assert!(!entry.is_purgeable());
    }

    #[test]
    fn test_zero_retention_purges_at_expiry() {
        let entry = CacheEntry::new("v".to_string(), 0, 0);
        assert!(entry.is_expired());
        assert!(entry.is_purgeable());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: "test".to_string(),
            expires_at: now,
            retain_until: now + 60_000,
        };

        assert!(entry.is_expired(), "Entry should be expired at boundary");
        assert!(!entry.is_purgeable());
    }
}
