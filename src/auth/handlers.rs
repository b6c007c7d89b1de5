use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{LoginRequest, LoginResponse, Profile};
use crate::auth::extractors::Actor;
use crate::auth::service;
use crate::error::ApiError;
use crate::state::AppState;

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

// `payload` is skipped so the password never reaches the logs.
#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    service::login(&state, payload).await.map(Json)
}

#[instrument(skip_all)]
async fn me(Actor(user): Actor) -> Json<Profile> {
    Json(user.into())
}
