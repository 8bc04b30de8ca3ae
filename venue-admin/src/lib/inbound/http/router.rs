use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use http::HeaderValue;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::get_profile::get_profile;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use super::middleware::require_roles;
use super::middleware::ADMIN_ONLY;
use crate::domain::account::ports::AccountDirectoryPort;

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn AccountDirectoryPort>,
    pub authenticator: Arc<Authenticator>,
}

/// Build the `/api/v1` router.
///
/// # Arguments
/// * `directory` - Account directory implementation
/// * `authenticator` - Token verifier shared with the directory
/// * `allowed_origins` - CORS origins; empty allows any origin
pub fn create_router(
    directory: Arc<dyn AccountDirectoryPort>,
    authenticator: Arc<Authenticator>,
    allowed_origins: &[String],
) -> Router {
    let state = AppState {
        directory,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let authenticated_routes = Router::new()
        .route("/auth/profile", get(get_profile))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            auth_middleware,
        ));

    // Layers run bottom-up: authentication first, then the role gate
    let admin_routes = Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route_layer(middleware::from_fn_with_state(ADMIN_ONLY, require_roles))
        .route_layer(middleware::from_fn_with_state(
            state.authenticator.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    let api = Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes);

    Router::new()
        .nest("/api/v1", api)
        .layer(trace_layer)
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
