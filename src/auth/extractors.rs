use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::UserRecord;

/// The authenticated caller, resolved from the bearer token on every request.
/// Tokens are opaque; validity means the credential store knows them.
#[derive(Debug, Clone)]
pub struct Actor(pub UserRecord);

#[async_trait]
impl FromRequestParts<AppState> for Actor {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        let user = state.credentials.find_by_token(token).await?;
        match user {
            Some(user) => Ok(Actor(user)),
            None => {
                warn!("request with unknown bearer token");
                Err(ApiError::Unauthenticated)
            }
        }
    }
}
