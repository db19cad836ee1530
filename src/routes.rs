/// Route definitions
use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // User endpoints
        .route("/users/register", post(handlers::users::register))
        .route("/users/login", post(handlers::users::login))
        .route("/users/me", get(handlers::users::me))
        // Event endpoints
        .route(
            "/events",
            post(handlers::events::create).get(handlers::events::list),
        )
        .route(
            "/events/:id",
            get(handlers::events::get)
                .put(handlers::events::update)
                .delete(handlers::events::remove),
        )
        .route("/events/:id/register", post(handlers::events::register))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Virtual Event Management API" }))
}

async fn health_check() -> &'static str {
    "OK"
}
