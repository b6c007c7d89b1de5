use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CredentialStore, NewUser, Ticket, TicketFields, TicketStore, UserRecord};

const TICKET_COLUMNS: &str = "id, title, description, created_at, due_date, priority, \
                              column_id, created_by, created_by_username, assigned_to";

pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert(
        &self,
        owner: Uuid,
        owner_username: &str,
        fields: TicketFields,
    ) -> anyhow::Result<Ticket> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            INSERT INTO tickets
                (title, description, due_date, priority, column_id, assigned_to,
                 created_by, created_by_username)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TICKET_COLUMNS}
            "#,
        ))
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.due_date)
        .bind(&fields.priority)
        .bind(fields.column_id)
        .bind(&fields.assigned_to)
        .bind(owner)
        .bind(owner_username)
        .fetch_one(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Ticket>> {
        let tickets = sqlx::query_as::<_, Ticket>(&format!(
            r#"SELECT {TICKET_COLUMNS} FROM tickets WHERE created_by = $1"#,
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;
        Ok(tickets)
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"SELECT {TICKET_COLUMNS} FROM tickets WHERE id = $1 AND created_by = $2"#,
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: TicketFields,
    ) -> anyhow::Result<Option<Ticket>> {
        let ticket = sqlx::query_as::<_, Ticket>(&format!(
            r#"
            UPDATE tickets
            SET title = $3, description = $4, due_date = $5, priority = $6,
                column_id = $7, assigned_to = $8
            WHERE id = $1 AND created_by = $2
            RETURNING {TICKET_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.due_date)
        .bind(&fields.priority)
        .bind(fields.column_id)
        .bind(&fields.assigned_to)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(r#"DELETE FROM tickets WHERE id = $1 AND created_by = $2"#)
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

const USER_COLUMNS: &str = "id, username, password_hash, first_name, last_name, email, groups";

pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users WHERE username = $1"#,
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT u.id, u.username, u.password_hash, u.first_name, u.last_name,
                   u.email, u.groups
            FROM users u
            JOIN auth_tokens t ON t.user_id = u.id
            WHERE t.token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn get_or_create_token(&self, user_id: Uuid, candidate: &str) -> anyhow::Result<String> {
        // The no-op upsert makes the insert return the existing row's token
        // when the user already has one, atomically.
        let token = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO auth_tokens (token, user_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET user_id = excluded.user_id
            RETURNING token
            "#,
        )
        .bind(candidate)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(token)
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<UserRecord> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email, groups)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.groups)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
