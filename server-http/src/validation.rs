use commerce::basket::ShoppingCart;
use commerce::catalog::{Product, ProductId};

#[derive(Debug)]
pub enum ValidationError {
    MissingRequiredField { field: &'static str },
    BlankField { field: &'static str },
    InvalidProductId(String),
    MalformedBody(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field } => {
                write!(f, "Missing required field '{}'", field)
            }
            ValidationError::BlankField { field } => {
                write!(f, "Field '{}' cannot be empty", field)
            }
            ValidationError::InvalidProductId(reason) => {
                write!(f, "Invalid product id: {}", reason)
            }
            ValidationError::MalformedBody(reason) => {
                write!(f, "Malformed request body: {}", reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A user name must have at least one non-whitespace character
pub fn validate_user_name(user_name: &str) -> Result<(), ValidationError> {
    if user_name.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "userName" });
    }
    Ok(())
}

pub fn validate_basket(basket: &ShoppingCart) -> Result<(), ValidationError> {
    validate_user_name(&basket.user_name)
}

pub fn parse_product_id(raw: &str) -> Result<ProductId, ValidationError> {
    ProductId::parse(raw).map_err(|e| match e {
        shared::Error::InvalidArgument(reason) => ValidationError::InvalidProductId(reason),
        other => ValidationError::InvalidProductId(other.to_string()),
    })
}

/// Shape checks shared by create and update. Ids are checked on decode;
/// descriptive fields are passed through as given.
pub fn validate_product(product: &Product) -> Result<(), ValidationError> {
    if product.category.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "category" });
    }
    Ok(())
}

/// An update must name the product it replaces
pub fn validate_product_update(product: &Product) -> Result<ProductId, ValidationError> {
    validate_product(product)?;
    product
        .id
        .clone()
        .ok_or(ValidationError::MissingRequiredField { field: "id" })
}
