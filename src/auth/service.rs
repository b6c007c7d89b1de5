use tracing::{info, warn};

use crate::auth::dto::{LoginRequest, LoginResponse};
use crate::auth::{password, token};
use crate::error::ApiError;
use crate::state::AppState;

/// Validates credentials and returns the user's bearer token plus profile.
///
/// The same `InvalidCredentials` comes back for an unknown username and a
/// wrong password, so the endpoint cannot be used to enumerate users. Token
/// issuance is idempotent: the store keeps whichever token a user was given
/// first until it is revoked out-of-band.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<LoginResponse, ApiError> {
    let Some(user) = state.credentials.find_by_username(&req.username).await? else {
        warn!("login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login rejected");
        return Err(ApiError::InvalidCredentials);
    }

    let token = state
        .credentials
        .get_or_create_token(user.id, &token::generate())
        .await?;

    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse {
        token,
        profile: user.into(),
    })
}
