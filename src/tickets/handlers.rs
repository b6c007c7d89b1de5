use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::auth::Actor;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Ticket;
use crate::tickets::dto::TicketPayload;
use crate::tickets::service;

pub fn collection_routes() -> Router<AppState> {
    Router::new().route("/tickets", get(list_tickets).post(create_ticket))
}

pub fn item_routes() -> Router<AppState> {
    Router::new().route(
        "/tickets/:id",
        get(get_ticket).put(update_ticket).delete(delete_ticket),
    )
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn list_tickets(
    State(state): State<AppState>,
    Actor(user): Actor,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    service::list(&state, &user).await.map(Json)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn create_ticket(
    State(state): State<AppState>,
    Actor(user): Actor,
    Json(payload): Json<TicketPayload>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let ticket = service::create(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn get_ticket(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Ticket>, ApiError> {
    service::get(&state, &user, id).await.map(Json)
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
async fn update_ticket(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<TicketPayload>,
) -> Result<Json<Ticket>, ApiError> {
    service::update(&state, &user, id, payload).await.map(Json)
}

#[instrument(skip(state, user), fields(user_id = %user.id))]
async fn delete_ticket(
    State(state): State<AppState>,
    Actor(user): Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
