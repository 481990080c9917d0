use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCartItem {
    pub quantity: u32,
    #[serde(default)]
    pub color: String,
    pub price: f64,
    pub product_id: String,
    #[serde(default)]
    pub product_name: String,
}

impl ShoppingCartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// A user's basket. `user_name` is the storage key; there is no other index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingCart {
    pub user_name: String,
    #[serde(default)]
    pub items: Vec<ShoppingCartItem>,
}

impl ShoppingCart {
    /// An empty basket for `user_name`. Not persisted until it is updated.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            items: Vec::new(),
        }
    }

    pub fn total_price(&self) -> f64 {
        self.items.iter().map(ShoppingCartItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
