use super::models::ShoppingCart;
use async_trait::async_trait;
use shared::Result;

/// Port for basket storage, keyed by user name.
#[async_trait]
pub trait BasketRepository: Send + Sync {
    /// Find the stored basket for a user. `None` when nothing is stored.
    async fn get_basket(&self, user_name: &str) -> Result<Option<ShoppingCart>>;

    /// Replace the stored basket wholesale and return what was stored
    async fn update_basket(&self, basket: ShoppingCart) -> Result<ShoppingCart>;

    /// Remove a user's basket. Removing a missing basket is not an error.
    async fn delete_basket(&self, user_name: &str) -> Result<()>;
}
