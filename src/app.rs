use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{self, tenant, user};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let security = &state.config.security;

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(tenant_routes())
        .merge(user_routes())
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));

    if security.enable_cors {
        router = router.layer(cors_layer(&security.cors_origins));
    }
    if api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/tenants", post(tenant::tenant_create))
        .route(
            "/tenants/:id",
            get(tenant::tenant_get)
                .put(tenant::tenant_update)
                .delete(tenant::tenant_delete),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(user::user_create))
        .route(
            "/users/:id",
            get(user::user_get).put(user::user_update).delete(user::user_delete),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(origins)
}
