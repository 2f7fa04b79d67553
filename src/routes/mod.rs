use axum::Router;

use crate::state::SharedState;

pub mod config;
pub mod docs;
pub mod extract;
pub mod health;
pub mod jellyfin;
pub mod rooms;
pub mod web;
pub mod winner;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(config::router())
        .merge(rooms::router())
        .merge(winner::router())
        .merge(jellyfin::router())
        .merge(web::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
