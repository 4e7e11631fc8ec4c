//! Route table and HTTP layers

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{warn, Level};

use crate::handlers::{auth, business, health, users};
use crate::middleware::{authenticate, rate_limit, require_admin, require_manager};
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/login", post(auth::login))
        .route("/business/create", post(auth::create_business))
        .route("/signup/invitation", post(auth::signup_with_invitation))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let protected_routes = Router::new()
        .route("/api/business", get(business::get_business))
        .route(
            "/api/business",
            put(business::update_business).route_layer(middleware::from_fn(require_admin)),
        )
        .route("/api/users", get(users::list_users))
        .route(
            "/api/users/invitations",
            get(users::list_invitations).route_layer(middleware::from_fn(require_manager)),
        )
        .route(
            "/api/users/invite",
            post(users::invite_user).route_layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/users/{user_id}/role",
            put(users::update_role).route_layer(middleware::from_fn(require_admin)),
        )
        .route(
            "/api/users/{user_id}",
            delete(users::remove_user).route_layer(middleware::from_fn(require_admin)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::readiness_check))
        .nest("/api/auth", auth_routes)
        .merge(protected_routes)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(&state.config.cors.allowed_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
