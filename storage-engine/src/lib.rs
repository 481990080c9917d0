// Storage adapters, one per backing technology.
// Baskets live in an in-process moka cache; the catalog lives in sled.

pub mod moka_basket;
pub mod sled_catalog;

pub use moka_basket::MokaBasketRepository;
pub use sled_catalog::SledProductRepository;
