pub mod basket;
pub mod catalog;
pub mod health;

pub use basket::{delete_basket, get_basket, update_basket};
pub use catalog::{
    create_product, delete_product, get_product_by_category, get_product_by_id, get_products,
    update_product,
};
pub use health::health_check;
