use crate::error::ApiError;
use crate::models::BasketResponse;
use crate::state::AppState;
use crate::validation::{validate_basket, validate_user_name};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use commerce::basket::ShoppingCart;
use tracing::info;

/// GET /basket/{user_name}
///
/// Always answers with a basket: an unknown user gets a fresh empty one,
/// which is not stored.
pub async fn get_basket(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<Json<BasketResponse>, ApiError> {
    validate_user_name(&user_name)?;
    info!("GET_BASKET: user={}", user_name);

    let basket = state
        .basket_repository
        .get_basket(&user_name)
        .await?
        .unwrap_or_else(|| ShoppingCart::new(user_name));

    Ok(Json(basket.into()))
}

/// POST /basket
pub async fn update_basket(
    State(state): State<AppState>,
    payload: Result<Json<ShoppingCart>, JsonRejection>,
) -> Result<Json<BasketResponse>, ApiError> {
    let Json(basket) = payload?;
    validate_basket(&basket)?;

    info!(
        "UPDATE_BASKET: user={}, items={}",
        basket.user_name,
        basket.items.len()
    );

    let stored = state.basket_repository.update_basket(basket).await?;
    Ok(Json(stored.into()))
}

/// DELETE /basket/{user_name}
pub async fn delete_basket(
    State(state): State<AppState>,
    Path(user_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    validate_user_name(&user_name)?;
    info!("DELETE_BASKET: user={}", user_name);

    state.basket_repository.delete_basket(&user_name).await?;
    Ok(StatusCode::OK)
}
