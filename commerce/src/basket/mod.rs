// Public API
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use models::{ShoppingCart, ShoppingCartItem};
pub use repository::BasketRepository;
