use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

pub mod memory;
pub mod postgres;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// A ticket as persisted. `id` and `created_at` are store-assigned;
/// `created_by` and `created_by_username` are fixed at creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "iso_date")]
    pub due_date: Date,
    pub priority: Option<String>,
    pub column_id: i32,
    pub created_by: Uuid,
    pub created_by_username: String,
    pub assigned_to: Option<String>,
}

/// The mutable field set, produced by validation. Used verbatim for both
/// insert and full-replacement update.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketFields {
    pub title: String,
    pub description: String,
    pub due_date: Date,
    pub priority: Option<String>,
    pub column_id: i32,
    pub assigned_to: Option<String>,
}

/// Persistence seam for tickets. Every accessor except `insert` and
/// `list_by_owner` takes the owner id and matches on it, so a ticket
/// belonging to someone else is indistinguishable from a missing one.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert(
        &self,
        owner: Uuid,
        owner_username: &str,
        fields: TicketFields,
    ) -> anyhow::Result<Ticket>;

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Ticket>>;

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Ticket>>;

    /// Full replacement of the mutable fields. Returns `None` when no owned
    /// ticket with that id exists.
    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: TicketFields,
    ) -> anyhow::Result<Option<Ticket>>;

    /// Returns whether a row was deleted.
    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool>;
}

/// User record in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub groups: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub groups: Vec<String>,
}

/// Identity and token persistence. Token issuance goes through
/// `get_or_create_token` so concurrent first logins cannot mint two tokens;
/// the implementation must make the get-or-create atomic.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>>;

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<UserRecord>>;

    /// Returns the user's existing token, or stores `candidate` as their
    /// token and returns it. A user has at most one token.
    async fn get_or_create_token(&self, user_id: Uuid, candidate: &str) -> anyhow::Result<String>;

    async fn create_user(&self, new: NewUser) -> anyhow::Result<UserRecord>;
}
