use commerce::basket::{ShoppingCart, ShoppingCartItem};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Basket as returned to clients, with the derived total
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BasketResponse {
    pub user_name: String,
    pub items: Vec<ShoppingCartItem>,
    pub total_price: f64,
}

impl From<ShoppingCart> for BasketResponse {
    fn from(basket: ShoppingCart) -> Self {
        let total_price = basket.total_price();
        Self {
            user_name: basket.user_name,
            items: basket.items,
            total_price,
        }
    }
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
