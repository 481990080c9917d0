use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use shared::config::Config;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;

pub const API_PREFIX: &str = "/api/v1";

/// Absolute path of the catalog collection, used to build `Location` headers
pub const CATALOG_PATH: &str = "/api/v1/catalog";

/// The served application: the router behind trailing-slash trimming.
/// Path normalization must run before routing, so it wraps the router
/// instead of being one of its layers.
pub type App = NormalizePath<Router>;

pub fn build_app(state: AppState, config: &Config) -> App {
    NormalizePath::trim_trailing_slash(build_router(state, config))
}

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    let api = Router::new()
        // Basket routes
        .route("/basket", post(handlers::update_basket))
        .route(
            "/basket/{user_name}",
            get(handlers::get_basket).delete(handlers::delete_basket),
        )
        // Catalog routes
        .route(
            "/catalog",
            get(handlers::get_products)
                .post(handlers::create_product)
                .put(handlers::update_product),
        )
        .route(
            "/catalog/{id}",
            get(handlers::get_product_by_id).delete(handlers::delete_product),
        )
        .route(
            "/catalog/getproductbycategory/{category}",
            get(handlers::get_product_by_category),
        );

    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .nest(API_PREFIX, api)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins = if config.allows_any_origin() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
