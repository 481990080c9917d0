use super::models::Product;
use super::product_id::ProductId;
use async_trait::async_trait;
use shared::Result;

/// Port for catalog storage, keyed by product id with a category lookup.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List every product, ordered by id
    async fn get_products(&self) -> Result<Vec<Product>>;

    /// Find a product by id
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Find all products in a category, ordered by id. Empty when none match.
    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>>;

    /// Insert a product. The store assigns an id when the product has none.
    /// Fails with `AlreadyExists` if the id is taken.
    async fn create_product(&self, product: Product) -> Result<Product>;

    /// Replace a product wholesale. Returns whether a stored product was replaced.
    async fn update_product(&self, product: Product) -> Result<bool>;

    /// Delete a product. Returns whether anything was removed.
    async fn delete_product(&self, id: &ProductId) -> Result<bool>;
}
