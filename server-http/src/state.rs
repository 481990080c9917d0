use commerce::basket::BasketRepository;
use commerce::catalog::seed::default_products;
use commerce::catalog::ProductRepository;
use shared::config::Config;
use std::sync::Arc;
use storage_engine::{MokaBasketRepository, SledProductRepository};
use tracing::info;

/// Server state shared across handlers. Handlers only see the repository ports.
#[derive(Clone)]
pub struct AppState {
    pub basket_repository: Arc<dyn BasketRepository>,
    pub product_repository: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(
        basket_repository: Arc<dyn BasketRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            basket_repository,
            product_repository,
        }
    }

    /// Open the configured stores: moka for baskets, sled for the catalog
    pub async fn from_config(config: &Config) -> shared::Result<Self> {
        let basket_repository = Arc::new(MokaBasketRepository::new(
            config.basket_max_entries,
            config.basket_ttl,
        ));
        info!(
            "Basket store ready (max_entries={:?}, ttl={:?})",
            config.basket_max_entries, config.basket_ttl
        );

        let catalog_path = config.catalog_path();
        let product_repository = Arc::new(SledProductRepository::new(&catalog_path)?);
        info!("Catalog store opened at {}", catalog_path.display());

        if config.seed_catalog {
            product_repository.seed_if_empty(default_products()).await?;
        }

        Ok(Self::new(basket_repository, product_repository))
    }
}
