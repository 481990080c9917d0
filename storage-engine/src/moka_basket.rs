use async_trait::async_trait;
use commerce::basket::{BasketRepository, ShoppingCart};
use moka::future::Cache;
use shared::Result;
use std::fmt::Debug;
use std::time::Duration;

/// Moka-backed basket store. Baskets are ephemeral: they are dropped on
/// restart and, when a TTL is configured, expire after it.
pub struct MokaBasketRepository {
    baskets: Cache<String, ShoppingCart>,
}

impl MokaBasketRepository {
    /// Create a basket store with optional capacity and time-to-live
    pub fn new(max_entries: Option<u64>, default_ttl: Option<Duration>) -> Self {
        let mut builder = Cache::builder().name("baskets");

        if let Some(capacity) = max_entries {
            builder = builder.max_capacity(capacity);
        }

        if let Some(ttl) = default_ttl {
            builder = builder.time_to_live(ttl);
        }

        Self {
            baskets: builder.build(),
        }
    }

    /// Unbounded, no expiry
    pub fn with_defaults() -> Self {
        Self::new(None, None)
    }
}

#[async_trait]
impl BasketRepository for MokaBasketRepository {
    async fn get_basket(&self, user_name: &str) -> Result<Option<ShoppingCart>> {
        Ok(self.baskets.get(user_name).await)
    }

    async fn update_basket(&self, basket: ShoppingCart) -> Result<ShoppingCart> {
        self.baskets
            .insert(basket.user_name.clone(), basket.clone())
            .await;
        Ok(basket)
    }

    async fn delete_basket(&self, user_name: &str) -> Result<()> {
        self.baskets.invalidate(user_name).await;
        Ok(())
    }
}

impl Debug for MokaBasketRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaBasketRepository")
            .field("entry_count", &self.baskets.entry_count())
            .finish()
    }
}
