use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod service;
mod validate;

pub use dto::TicketPayload;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::collection_routes())
        .merge(handlers::item_routes())
}
