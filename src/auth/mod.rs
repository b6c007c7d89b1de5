use axum::Router;

use crate::state::AppState;

mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use dto::{LoginRequest, LoginResponse, Profile};
pub use extractors::Actor;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::login_routes())
        .merge(handlers::me_routes())
}
