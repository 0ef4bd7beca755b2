mod handlers;

pub use handlers::{ErrorResponse, HealthResponse, OptionsResponse, SearchResponse};

use axum::{http::HeaderValue, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::catalog::Catalog;

/// Router with permissive CORS.
pub fn create_router(catalog: Catalog) -> Router {
    create_router_with_origins(catalog, None)
}

/// Router restricted to `origins` when given; any origin otherwise.
pub fn create_router_with_origins(catalog: Catalog, origins: Option<&[String]>) -> Router {
    let exoplanets = Router::new()
        .route("/options", get(handlers::options))
        .route("/search", get(handlers::search));

    let api = Router::new()
        .nest("/exoplanets", exoplanets)
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(origins)),
        )
        .with_state(catalog)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    match origins {
        Some(origins) => {
            let allowed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect();
            CorsLayer::new().allow_origin(AllowOrigin::list(allowed))
        }
        None => CorsLayer::permissive(),
    }
}
