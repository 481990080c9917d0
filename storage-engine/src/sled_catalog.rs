use async_trait::async_trait;
use commerce::catalog::{Product, ProductId, ProductRepository};
use shared::{Error, Result};
use sled::transaction::{
    ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
    TransactionalTree,
};
use sled::{Db, IVec, Transactional, Tree};
use std::path::Path;
use tracing::{debug, info, warn};

const PRODUCTS_TREE: &str = "products";
const PRODUCTS_BY_CATEGORY_TREE: &str = "products_by_category";

fn storage_error(action: &str, e: impl std::fmt::Display) -> Error {
    Error::store_failure(format!("Failed to {}: {}", action, e))
}

/// Sled-backed product catalog.
///
/// Documents are stored as JSON under their id in the `products` tree. The
/// `products_by_category` tree maps `len(category) ++ category ++ id` to the
/// id, so a prefix scan yields every product in a category in id order. The
/// length prefix keeps one category from being a prefix of another.
///
/// Every write touches both trees in a single transaction.
#[derive(Clone)]
pub struct SledProductRepository {
    db: Db,
}

impl SledProductRepository {
    /// Open (or create) the catalog database at `path`.
    /// Creates the parent directory if it doesn't exist
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| storage_error("create directory", e))?;
        }

        let db = sled::open(path).map_err(|e| storage_error("open catalog database", e))?;

        Ok(Self { db })
    }

    /// Insert `products` if the catalog holds nothing yet. Returns how many were inserted.
    pub async fn seed_if_empty(&self, products: Vec<Product>) -> Result<usize> {
        if !self.products_tree()?.is_empty() {
            debug!("Catalog already populated, skipping seed");
            return Ok(0);
        }

        let mut inserted = 0;
        for product in products {
            self.create_product(product).await?;
            inserted += 1;
        }

        info!("Seeded catalog with {} products", inserted);
        Ok(inserted)
    }

    fn products_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(PRODUCTS_TREE)
            .map_err(|e| storage_error("open products tree", e))
    }

    fn category_tree(&self) -> Result<Tree> {
        self.db
            .open_tree(PRODUCTS_BY_CATEGORY_TREE)
            .map_err(|e| storage_error("open category index", e))
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| storage_error("flush database", e))?;
        Ok(())
    }

    /// Run `f` atomically over the products tree and the category index.
    /// Sled may call `f` more than once on conflict.
    fn transact<T>(
        &self,
        action: &str,
        f: impl Fn(&TransactionalTree, &TransactionalTree) -> ConflictableTransactionResult<T, Error>,
    ) -> Result<T> {
        let products_tree = self.products_tree()?;
        let category_tree = self.category_tree()?;

        (&products_tree, &category_tree)
            .transaction(|(products, index)| f(products, index))
            .map_err(|e| match e {
                TransactionError::Abort(error) => error,
                TransactionError::Storage(e) => storage_error(action, e),
            })
    }

    fn encode(product: &Product) -> Result<Vec<u8>> {
        serde_json::to_vec(product).map_err(|e| storage_error("serialize product", e))
    }

    fn decode(bytes: &IVec) -> Result<Product> {
        serde_json::from_slice(bytes).map_err(|e| storage_error("deserialize product", e))
    }

    fn category_prefix(category: &str) -> Vec<u8> {
        let bytes = category.as_bytes();
        let mut key = Vec::with_capacity(bytes.len() + 4);
        key.extend_from_slice(&(bytes.len() as u32).to_be_bytes());
        key.extend_from_slice(bytes);
        key
    }

    fn category_key(category: &str, id: &ProductId) -> Vec<u8> {
        let mut key = Self::category_prefix(category);
        key.extend_from_slice(id.as_str().as_bytes());
        key
    }
}

#[async_trait]
impl ProductRepository for SledProductRepository {
    async fn get_products(&self) -> Result<Vec<Product>> {
        let products_tree = self.products_tree()?;
        let mut products = Vec::new();

        for item in products_tree.iter() {
            let (_, data) = item.map_err(|e| storage_error("iterate products", e))?;
            products.push(Self::decode(&data)?);
        }

        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let products_tree = self.products_tree()?;

        match products_tree
            .get(id.as_str().as_bytes())
            .map_err(|e| storage_error("get product", e))?
        {
            Some(data) => Ok(Some(Self::decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn get_products_by_category(&self, category: &str) -> Result<Vec<Product>> {
        let category_tree = self.category_tree()?;
        let products_tree = self.products_tree()?;
        let mut products = Vec::new();

        for item in category_tree.scan_prefix(Self::category_prefix(category)) {
            let (_, product_id) = item.map_err(|e| storage_error("scan category index", e))?;

            let Some(data) = products_tree
                .get(&product_id)
                .map_err(|e| storage_error("get product", e))?
            else {
                continue;
            };

            let product = Self::decode(&data)?;
            if product.category != category {
                warn!(
                    "Index entry for product {:?} in category '{}' is stale",
                    String::from_utf8_lossy(&product_id),
                    category
                );
                continue;
            }
            products.push(product);
        }

        Ok(products)
    }

    async fn create_product(&self, mut product: Product) -> Result<Product> {
        let id = product.id.get_or_insert_with(ProductId::generate).clone();
        let data = Self::encode(&product)?;
        let index_key = Self::category_key(&product.category, &id);

        self.transact("insert product", |products, index| {
            let key = id.as_str().as_bytes();

            // Insert only if the id is free
            if products.get(key)?.is_some() {
                return Err(ConflictableTransactionError::Abort(Error::AlreadyExists(
                    format!("product {}", id),
                )));
            }

            products.insert(key, data.as_slice())?;
            index.insert(index_key.as_slice(), key)?;
            Ok(())
        })?;

        self.flush()?;

        debug!("Created product {} in category '{}'", id, product.category);
        Ok(product)
    }

    async fn update_product(&self, product: Product) -> Result<bool> {
        let id = product
            .id
            .clone()
            .ok_or_else(|| Error::invalid_argument("product id is required for update"))?;
        let data = Self::encode(&product)?;
        let new_key = Self::category_key(&product.category, &id);

        let updated = self.transact("replace product", |products, index| {
            let key = id.as_str().as_bytes();

            let existing = match products.get(key)? {
                Some(old) => Self::decode(&old).map_err(ConflictableTransactionError::Abort)?,
                None => return Ok(false),
            };

            products.insert(key, data.as_slice())?;

            if existing.category != product.category {
                index.remove(Self::category_key(&existing.category, &id))?;
                index.insert(new_key.as_slice(), key)?;
            }

            Ok(true)
        })?;

        if updated {
            self.flush()?;
        }

        Ok(updated)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<bool> {
        let deleted = self.transact("delete product", |products, index| {
            let Some(old) = products.remove(id.as_str().as_bytes())? else {
                return Ok(false);
            };

            let product = Self::decode(&old).map_err(ConflictableTransactionError::Abort)?;
            index.remove(Self::category_key(&product.category, id))?;
            Ok(true)
        })?;

        if deleted {
            self.flush()?;
        }

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commerce::catalog::seed::default_products;
    use tempfile::TempDir;

    fn open_repo(temp_dir: &TempDir) -> SledProductRepository {
        SledProductRepository::new(temp_dir.path().join("catalog.sled")).unwrap()
    }

    fn shirt(name: &str) -> Product {
        Product::new(name, "shirts", 10.0)
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        let created = repo.create_product(shirt("T")).await.unwrap();
        let id = created.id.clone().expect("id assigned on create");

        let found = repo.get_product(&id).await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_create_keeps_supplied_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let id = ProductId::parse("602d2149e773f2a3990b47f5").unwrap();

        let created = repo
            .create_product(shirt("T").with_id(id.clone()))
            .await
            .unwrap();

        assert_eq!(created.id, Some(id));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_id() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let id = ProductId::parse("602d2149e773f2a3990b47f5").unwrap();

        repo.create_product(shirt("first").with_id(id.clone()))
            .await
            .unwrap();
        let result = repo.create_product(shirt("second").with_id(id.clone())).await;

        assert!(matches!(result, Err(Error::AlreadyExists(_))));
        let stored = repo.get_product(&id).await.unwrap().unwrap();
        assert_eq!(stored.name, "first");
    }

    #[tokio::test]
    async fn test_unknown_id_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        let found = repo.get_product(&ProductId::generate()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_products_lists_everything() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        assert!(repo.get_products().await.unwrap().is_empty());

        repo.create_product(shirt("a")).await.unwrap();
        repo.create_product(shirt("b")).await.unwrap();

        assert_eq!(repo.get_products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_category_lookup_returns_all_matches() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        repo.create_product(shirt("a")).await.unwrap();
        repo.create_product(shirt("b")).await.unwrap();
        repo.create_product(Product::new("mug", "kitchen", 4.0))
            .await
            .unwrap();

        let shirts = repo.get_products_by_category("shirts").await.unwrap();
        assert_eq!(shirts.len(), 2);
        assert!(shirts.iter().all(|p| p.category == "shirts"));

        assert!(repo
            .get_products_by_category("nonexistent-category")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_category_lookup_does_not_match_prefixes() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        repo.create_product(Product::new("polo", "shirts-long", 12.0))
            .await
            .unwrap();

        assert!(repo.get_products_by_category("shirts").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_and_moves_category() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let created = repo.create_product(shirt("T")).await.unwrap();

        let mut changed = created.clone();
        changed.category = "tops".to_string();
        changed.price = 12.5;

        assert!(repo.update_product(changed.clone()).await.unwrap());

        let id = created.id.unwrap();
        assert_eq!(repo.get_product(&id).await.unwrap(), Some(changed));
        assert!(repo.get_products_by_category("shirts").await.unwrap().is_empty());
        assert_eq!(repo.get_products_by_category("tops").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_product_is_false() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        let updated = repo
            .update_product(shirt("T").with_id(ProductId::generate()))
            .await
            .unwrap();

        assert!(!updated);
        assert!(repo.get_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_without_id_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        let result = repo.update_product(shirt("T")).await;
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_removed() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let created = repo.create_product(shirt("T")).await.unwrap();
        let id = created.id.unwrap();

        assert!(repo.delete_product(&id).await.unwrap());
        assert!(repo.get_product(&id).await.unwrap().is_none());
        assert!(repo.get_products_by_category("shirts").await.unwrap().is_empty());

        assert!(!repo.delete_product(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_seed_only_runs_on_empty_catalog() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let expected = default_products().len();

        assert_eq!(repo.seed_if_empty(default_products()).await.unwrap(), expected);
        assert_eq!(repo.seed_if_empty(default_products()).await.unwrap(), 0);
        assert_eq!(repo.get_products().await.unwrap().len(), expected);
    }

    #[tokio::test]
    async fn test_category_with_nul_does_not_match_shorter_category() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        repo.create_product(Product::new("odd", "a\0b", 1.0))
            .await
            .unwrap();

        assert!(repo.get_products_by_category("a").await.unwrap().is_empty());
        let found = repo.get_products_by_category("a\0b").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].category, "a\0b");
    }

    #[tokio::test]
    async fn test_stale_index_entry_is_not_returned() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let created = repo.create_product(shirt("T")).await.unwrap();
        let id = created.id.unwrap();

        repo.category_tree()
            .unwrap()
            .insert(
                SledProductRepository::category_key("hats", &id),
                id.as_str().as_bytes(),
            )
            .unwrap();

        assert!(repo.get_products_by_category("hats").await.unwrap().is_empty());
        assert_eq!(repo.get_products_by_category("shirts").await.unwrap().len(), 1);
    }

    /// Every document has exactly one index entry, under its own category.
    async fn assert_index_matches_documents(repo: &SledProductRepository) {
        let products = repo.get_products().await.unwrap();
        assert_eq!(repo.category_tree().unwrap().len(), products.len());

        for product in products {
            let id = product.id.clone().unwrap();
            let key = SledProductRepository::category_key(&product.category, &id);
            assert!(repo.category_tree().unwrap().contains_key(key).unwrap());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_category_moves_keep_index_consistent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);
        let categories = ["tops", "pants", "hats", "socks"];

        for _ in 0..50 {
            let created = repo.create_product(shirt("T")).await.unwrap();

            let mut tasks = Vec::new();
            for category in categories {
                let repo = repo.clone();
                let mut changed = created.clone();
                changed.category = category.to_string();
                tasks.push(tokio::spawn(
                    async move { repo.update_product(changed).await },
                ));
            }
            for task in tasks {
                assert!(task.await.unwrap().unwrap());
            }

            let id = created.id.unwrap();
            let stored = repo.get_product(&id).await.unwrap().unwrap();
            for category in categories {
                let found = repo.get_products_by_category(category).await.unwrap();
                assert!(found.iter().all(|p| p.category == category));
                let listed = found.iter().any(|p| p.id.as_ref() == Some(&id));
                assert_eq!(listed, stored.category == category);
            }

            assert!(repo.delete_product(&id).await.unwrap());
        }

        assert_index_matches_documents(&repo).await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_update_and_delete_keep_index_consistent() {
        let temp_dir = TempDir::new().unwrap();
        let repo = open_repo(&temp_dir);

        for round in 0..50 {
            let created = repo.create_product(shirt("T")).await.unwrap();
            let id = created.id.clone().unwrap();

            let mut updates = Vec::new();
            for category in ["tops", "pants"] {
                let repo = repo.clone();
                let mut changed = created.clone();
                changed.category = category.to_string();
                updates.push(tokio::spawn(
                    async move { repo.update_product(changed).await },
                ));
            }
            let deleter = {
                let repo = repo.clone();
                let id = id.clone();
                tokio::spawn(async move { repo.delete_product(&id).await })
            };

            for update in updates {
                update.await.unwrap().unwrap();
            }
            assert!(deleter.await.unwrap().unwrap(), "round {}", round);
            assert!(repo.get_product(&id).await.unwrap().is_none());

            assert_index_matches_documents(&repo).await;
        }
    }
}
