use crate::error::ApiError;
use crate::routes::CATALOG_PATH;
use crate::state::AppState;
use crate::validation::{parse_product_id, validate_product, validate_product_update};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use commerce::catalog::Product;
use shared::Error;
use tracing::{error, info};

/// GET /catalog
pub async fn get_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state.product_repository.get_products().await?;
    info!("GET_PRODUCTS: count={}", products.len());
    Ok(Json(products))
}

/// GET /catalog/{id}
pub async fn get_product_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_product_id(&id)?;

    match state.product_repository.get_product(&id).await? {
        Some(product) => Ok(Json(product)),
        None => {
            error!("Product with id {} not found", id);
            Err(Error::not_found(format!("product {}", id)).into())
        }
    }
}

/// GET /catalog/getproductbycategory/{category}
///
/// Categories are not unique; this answers with the first product in id order.
pub async fn get_product_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let products = state
        .product_repository
        .get_products_by_category(&category)
        .await?;

    match products.into_iter().next() {
        Some(product) => Ok(Json(product)),
        None => {
            error!("Product with category {} not found", category);
            Err(Error::not_found(format!("category {}", category)).into())
        }
    }
}

/// POST /catalog
pub async fn create_product(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(product) = payload?;
    validate_product(&product)?;

    let created = state.product_repository.create_product(product).await?;

    let id = created
        .id
        .clone()
        .ok_or_else(|| Error::store_failure("store returned a product without an id"))?;

    info!("CREATE_PRODUCT: id={}, category={}", id, created.category);

    let location = format!("{}/{}", CATALOG_PATH, id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(created),
    ))
}

/// PUT /catalog
pub async fn update_product(
    State(state): State<AppState>,
    payload: Result<Json<Product>, JsonRejection>,
) -> Result<Json<bool>, ApiError> {
    let Json(product) = payload?;
    let id = validate_product_update(&product)?;

    let updated = state.product_repository.update_product(product).await?;
    info!("UPDATE_PRODUCT: id={}, updated={}", id, updated);

    Ok(Json(updated))
}

/// DELETE /catalog/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let id = parse_product_id(&id)?;

    let deleted = state.product_repository.delete_product(&id).await?;
    info!("DELETE_PRODUCT: id={}, deleted={}", id, deleted);

    Ok(Json(deleted))
}
