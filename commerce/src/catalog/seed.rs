use super::models::Product;
use super::product_id::ProductId;

const SMART_PHONE: &str = "Smart Phone";
const WHITE_APPLIANCES: &str = "White Appliances";

/// Products loaded into an empty catalog on first start
pub fn default_products() -> Vec<Product> {
    vec![
        seed_product("602d2149e773f2a3990b47f5", "IPhone X", SMART_PHONE, 950.0, "product-1.png"),
        seed_product("602d2149e773f2a3990b47f6", "Samsung 10", SMART_PHONE, 840.0, "product-2.png"),
        seed_product("602d2149e773f2a3990b47f7", "Huawei Plus", WHITE_APPLIANCES, 650.0, "product-3.png"),
        seed_product("602d2149e773f2a3990b47f8", "Xiaomi Mi 9", WHITE_APPLIANCES, 470.0, "product-4.png"),
        seed_product("602d2149e773f2a3990b47f9", "HTC U11+ Plus", SMART_PHONE, 380.0, "product-5.png"),
        seed_product("602d2149e773f2a3990b47fa", "LG G7 ThinQ", "Home Kitchen", 240.0, "product-6.png"),
    ]
}

fn seed_product(id: &str, name: &str, category: &str, price: f64, image_file: &str) -> Product {
    let mut product = Product::new(name, category, price).with_details(
        format!("{} summary", name),
        format!("{} description", name),
        image_file,
    );
    // An unparsable literal leaves the id for the store to assign.
    product.id = ProductId::parse(id).ok();
    product
}
