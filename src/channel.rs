//! Persistence channel
//!
//! The client-visible channel a basket is persisted through. In production
//! this is a cookie jar; any key-value channel with expiring values will do.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors raised by a persistence channel.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel could not be read from or written to.
    #[error("persistence channel unavailable: {0}")]
    Unavailable(String),
}

/// A persisted basket value, shaped like a cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBasket {
    /// Key the value is stored under.
    pub key: String,

    /// Serialized basket contents.
    pub value: String,

    /// Path the value is visible on.
    pub path: String,

    /// Instant after which the value must be ignored.
    pub expires_at: Timestamp,
}

impl StoredBasket {
    /// Whether the value has expired at the given instant.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

#[automock]
#[async_trait]
/// Reads and writes persisted basket values.
pub trait PersistenceChannel: Send + Sync {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] if the channel cannot be read.
    async fn read(&self, key: &str) -> Result<Option<StoredBasket>, ChannelError>;

    /// Writes a value, replacing anything stored under the same key.
    ///
    /// A value whose expiry is already in the past clears the key.
    ///
    /// # Errors
    ///
    /// Returns a [`ChannelError`] if the channel cannot be written.
    async fn write(&self, value: StoredBasket) -> Result<(), ChannelError>;
}

/// In-process channel, for tests and single-node deployments.
///
/// Expired values are never returned or counted, and are purged on every read
/// and write.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    values: RwLock<FxHashMap<String, StoredBasket>>,
}

impl MemoryChannel {
    /// Creates an empty channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an unexpired value is held under `key`.
    pub fn contains(&self, key: &str) -> bool {
        let now = Timestamp::now();

        self.values
            .read()
            .get(key)
            .is_some_and(|value| !value.is_expired_at(now))
    }

    /// Number of unexpired values held.
    pub fn len(&self) -> usize {
        let now = Timestamp::now();

        self.values
            .read()
            .values()
            .filter(|value| !value.is_expired_at(now))
            .count()
    }

    /// Whether the channel holds no unexpired values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn purge_expired(values: &mut FxHashMap<String, StoredBasket>, now: Timestamp) {
    values.retain(|_, value| !value.is_expired_at(now));
}

#[async_trait]
impl PersistenceChannel for MemoryChannel {
    async fn read(&self, key: &str) -> Result<Option<StoredBasket>, ChannelError> {
        let mut values = self.values.write();

        purge_expired(&mut values, Timestamp::now());

        Ok(values.get(key).cloned())
    }

    async fn write(&self, value: StoredBasket) -> Result<(), ChannelError> {
        let now = Timestamp::now();
        let mut values = self.values.write();

        purge_expired(&mut values, now);

        if value.is_expired_at(now) {
            values.remove(&value.key);
        } else {
            values.insert(value.key.clone(), value);
        }

        Ok(())
    }
}
