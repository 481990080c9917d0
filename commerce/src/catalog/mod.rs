// Public API
pub mod models;
pub mod product_id;
pub mod repository;
pub mod seed;

// Re-export commonly used types
pub use models::Product;
pub use product_id::ProductId;
pub use repository::ProductRepository;
