use super::product_id::ProductId;
use serde::{Deserialize, Serialize};

/// A catalog entry. Only `id` and `category` mean anything to the service;
/// the descriptive fields are passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the store on create when absent
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_file: String,
    pub price: f64,
}

impl Product {
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            summary: String::new(),
            description: String::new(),
            image_file: String::new(),
            price,
        }
    }

    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_details(
        mut self,
        summary: impl Into<String>,
        description: impl Into<String>,
        image_file: impl Into<String>,
    ) -> Self {
        self.summary = summary.into();
        self.description = description.into();
        self.image_file = image_file.into();
        self
    }
}
