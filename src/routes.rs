// src/routes.rs

use axum::{
    Router,
    http::{Method, StatusCode},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    handlers::{forum, post, service, thread, user},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Nests every resource router under `/api`.
/// * Applies global middleware (Trace, Timeout, CORS).
/// * Injects global state (Database Pool, Config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let user_routes = Router::new()
        .route("/{nickname}/create", post(user::create_user))
        .route(
            "/{nickname}/profile",
            get(user::get_user).post(user::update_user),
        );

    let forum_routes = Router::new()
        .route("/create", post(forum::create_forum))
        .route("/{slug}/details", get(forum::get_forum))
        .route("/{slug}/create", post(forum::create_thread))
        .route("/{slug}/users", get(forum::list_users))
        .route("/{slug}/threads", get(forum::list_threads));

    let thread_routes = Router::new()
        .route("/{slug_or_id}/create", post(thread::create_posts))
        .route(
            "/{slug_or_id}/details",
            get(thread::get_thread).post(thread::update_thread),
        )
        .route("/{slug_or_id}/posts", get(thread::list_posts))
        .route("/{slug_or_id}/vote", post(thread::vote));

    let post_routes = Router::new().route(
        "/{id}/details",
        get(post::get_post).post(post::update_post),
    );

    let service_routes = Router::new()
        .route("/status", get(service::status))
        .route("/clear", post(service::clear));

    // Outermost first: requests are traced, then bounded in time.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout,
        ))
        .layer(cors);

    Router::new()
        .nest("/api/user", user_routes)
        .nest("/api/forum", forum_routes)
        .nest("/api/thread", thread_routes)
        .nest("/api/post", post_routes)
        .nest("/api/service", service_routes)
        .fallback(not_found)
        .layer(middleware)
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
