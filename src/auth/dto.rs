use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::UserRecord;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Denormalized profile fields returned to the client.
#[derive(Debug, Serialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub groups: Vec<String>,
}

impl From<UserRecord> for Profile {
    fn from(u: UserRecord) -> Self {
        Self {
            user_id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            groups: u.groups,
        }
    }
}

/// Response returned after login: the bearer token plus the profile,
/// flattened into one object.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(flatten)]
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_is_flat() {
        let response = LoginResponse {
            token: "abc".into(),
            profile: Profile {
                user_id: Uuid::new_v4(),
                username: "alice".into(),
                first_name: "Alice".into(),
                last_name: "Ant".into(),
                email: "alice@example.com".into(),
                groups: vec!["staff".into()],
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"], "abc");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["groups"][0], "staff");
        assert!(json.get("profile").is_none());
    }
}
