//! Basket store
//!
//! Loads and persists baskets through a [`PersistenceChannel`], keyed by the
//! owner token and independent of any authenticated session.
//!
//! Each request reconstructs its basket from the channel and writes it back
//! after mutating it. Two concurrent requests from the same client can
//! therefore lose an update; the last save wins.

use std::collections::BTreeMap;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    basket::{Basket, OwnerToken},
    channel::{ChannelError, PersistenceChannel, StoredBasket},
    config::BasketConfig,
    items::{ItemId, Quantity},
};

/// Errors raised while persisting a basket.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The persistence channel failed.
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// The basket could not be serialized.
    #[error("failed to encode basket")]
    Encode(#[from] serde_json::Error),

    /// The expiry instant could not be represented.
    #[error("invalid basket expiry")]
    Expiry(#[from] jiff::Error),
}

/// Loads and saves baskets.
#[derive(Debug)]
pub struct BasketStore<P> {
    channel: P,
    config: BasketConfig,
}

impl<P: PersistenceChannel> BasketStore<P> {
    /// Creates a store persisting through the given channel.
    pub fn new(channel: P, config: BasketConfig) -> Self {
        Self { channel, config }
    }

    /// The underlying persistence channel.
    pub fn channel(&self) -> &P {
        &self.channel
    }

    /// The store configuration.
    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    /// The channel key a basket for `owner` is persisted under.
    pub fn key(&self, owner: &OwnerToken) -> String {
        format!("{}.{owner}", self.config.cookie_name)
    }

    /// Load the basket for `owner`.
    ///
    /// Missing, expired, undecodable or unreadable values all yield an empty basket.
    pub async fn load(&self, owner: OwnerToken) -> Basket {
        let key = self.key(&owner);

        let stored = match self.channel.read(&key).await {
            Ok(Some(stored)) => stored,
            Ok(None) => return Basket::new(owner),
            Err(error) => {
                warn!(%key, %error, "failed to read basket, starting empty");

                return Basket::new(owner);
            }
        };

        if stored.is_expired_at(Timestamp::now()) {
            debug!(%key, "persisted basket expired");

            return Basket::new(owner);
        }

        match decode_items(&stored.value) {
            Ok(items) => Basket::with_items(owner, items),
            Err(error) => {
                warn!(%key, %error, "discarding undecodable basket");

                Basket::new(owner)
            }
        }
    }

    /// Save a basket, replacing any previously persisted value for its owner.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the basket could not be encoded or written.
    pub async fn save(&self, basket: &Basket) -> Result<(), StoreError> {
        let value = encode_items(basket)?;
        let expires_at = Timestamp::now().checked_add(self.config.ttl())?;

        self.write(basket.owner(), value, expires_at).await?;

        debug!(owner = %basket.owner(), items = basket.len(), "saved basket");

        Ok(())
    }

    /// Empty a basket and clear its persisted value.
    ///
    /// The in-memory basket is emptied even if clearing the channel fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the persisted value could not be cleared.
    pub async fn delete(&self, basket: &mut Basket) -> Result<(), StoreError> {
        basket.clear();

        let expires_at = Timestamp::now().checked_sub(self.config.ttl())?;

        self.write(basket.owner(), String::new(), expires_at).await?;

        debug!(owner = %basket.owner(), "deleted basket");

        Ok(())
    }

    async fn write(
        &self,
        owner: &OwnerToken,
        value: String,
        expires_at: Timestamp,
    ) -> Result<(), StoreError> {
        self.channel
            .write(StoredBasket {
                key: self.key(owner),
                value,
                path: self.config.cookie_path.clone(),
                expires_at,
            })
            .await
            .map_err(Into::into)
    }
}

/// Serialize basket items as a compact `{"item": quantity}` object.
///
/// Keys are written in order so the same basket always encodes identically.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialization fails.
pub fn encode_items(basket: &Basket) -> Result<String, serde_json::Error> {
    let ordered: BTreeMap<&ItemId, Quantity> = basket.iter().collect();

    serde_json::to_string(&ordered)
}

/// Parse a persisted `{"item": quantity}` object.
///
/// An empty value (a cleared cookie) and the legacy empty list `[]` both
/// decode to no items.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the value is not a valid item mapping.
pub fn decode_items(value: &str) -> Result<FxHashMap<ItemId, Quantity>, serde_json::Error> {
    let value = value.trim();

    if value.is_empty() || value == "[]" {
        return Ok(FxHashMap::default());
    }

    serde_json::from_str(value)
}
