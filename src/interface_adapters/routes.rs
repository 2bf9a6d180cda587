use crate::interface_adapters::handlers::{
    add_points, add_points_from_link, admin_update, health, ranking, register, registrations,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

pub fn app(state: AppState) -> Router {
    // Wire the HTTP routes to their handlers.
    Router::new()
        .route("/health", get(health))
        .route("/api/ranking", get(ranking))
        .route("/api/admin", put(admin_update))
        .route("/api/registration", get(registrations).post(register))
        // Path the existing public form posts to.
        .route("/api/registro", get(registrations).post(register))
        .route("/api/update", get(add_points_from_link).post(add_points))
        .with_state(state)
}
