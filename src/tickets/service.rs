use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Ticket, UserRecord};
use crate::tickets::dto::TicketPayload;
use crate::tickets::validate::validate;

/// All tickets owned by the actor, in store-native order.
pub async fn list(state: &AppState, actor: &UserRecord) -> Result<Vec<Ticket>, ApiError> {
    Ok(state.tickets.list_by_owner(actor.id).await?)
}

/// Validates and persists a new ticket. Ownership comes from the
/// authenticated actor, never from the payload.
pub async fn create(
    state: &AppState,
    actor: &UserRecord,
    payload: TicketPayload,
) -> Result<Ticket, ApiError> {
    let fields = validate(&payload).map_err(ApiError::Validation)?;
    let ticket = state
        .tickets
        .insert(actor.id, &actor.username, fields)
        .await?;
    info!(ticket_id = %ticket.id, user_id = %actor.id, "ticket created");
    Ok(ticket)
}

pub async fn get(state: &AppState, actor: &UserRecord, id: Uuid) -> Result<Ticket, ApiError> {
    state
        .tickets
        .get(actor.id, id)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Full replacement of the mutable fields. Existence is checked before the
/// payload so a bad body for a missing ticket still reads as `NotFound`.
pub async fn update(
    state: &AppState,
    actor: &UserRecord,
    id: Uuid,
    payload: TicketPayload,
) -> Result<Ticket, ApiError> {
    if state.tickets.get(actor.id, id).await?.is_none() {
        return Err(ApiError::NotFound);
    }
    let fields = validate(&payload).map_err(ApiError::Validation)?;
    state
        .tickets
        .update(actor.id, id, fields)
        .await?
        .ok_or(ApiError::NotFound)
}

/// Permanent deletion; there is no soft-delete.
pub async fn delete(state: &AppState, actor: &UserRecord, id: Uuid) -> Result<(), ApiError> {
    if !state.tickets.delete(actor.id, id).await? {
        return Err(ApiError::NotFound);
    }
    info!(ticket_id = %id, user_id = %actor.id, "ticket deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::store::NewUser;

    use super::*;

    async fn seed_user(state: &AppState, username: &str) -> UserRecord {
        state
            .credentials
            .create_user(NewUser {
                username: username.to_string(),
                password_hash: "irrelevant".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                email: format!("{username}@example.com"),
                groups: vec![],
            })
            .await
            .unwrap()
    }

    fn payload(title: &str) -> TicketPayload {
        TicketPayload {
            title: Some(title.to_string()),
            description: Some("desc".into()),
            due_date: Some("2025-01-01".into()),
            priority: Some("high".into()),
            column_id: Some(json!(1)),
            assigned_to: None,
        }
    }

    #[tokio::test]
    async fn created_ticket_carries_the_actor_as_owner() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;

        let ticket = create(&state, &alice, payload("Fix bug")).await.unwrap();
        assert_eq!(ticket.created_by, alice.id);
        assert_eq!(ticket.created_by_username, "alice");
        assert_eq!(ticket.due_date.to_string(), "2025-01-01");
    }

    #[tokio::test]
    async fn list_never_crosses_owners() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;

        create(&state, &alice, payload("a1")).await.unwrap();
        create(&state, &alice, payload("a2")).await.unwrap();
        create(&state, &bob, payload("b1")).await.unwrap();

        let for_bob = list(&state, &bob).await.unwrap();
        assert_eq!(for_bob.len(), 1);
        assert!(for_bob.iter().all(|t| t.created_by == bob.id));
    }

    #[tokio::test]
    async fn other_owners_tickets_read_as_not_found() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;
        let bob = seed_user(&state, "bob").await;
        let ticket = create(&state, &alice, payload("mine")).await.unwrap();

        assert!(matches!(
            get(&state, &bob, ticket.id).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            update(&state, &bob, ticket.id, payload("stolen")).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            delete(&state, &bob, ticket.id).await,
            Err(ApiError::NotFound)
        ));

        // Still alice's, untouched.
        let still = get(&state, &alice, ticket.id).await.unwrap();
        assert_eq!(still.title, "mine");
    }

    #[tokio::test]
    async fn update_replaces_mutable_fields_only() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;
        let ticket = create(&state, &alice, payload("before")).await.unwrap();

        let mut changed = payload("after");
        changed.due_date = Some("2025-06-30".into());
        changed.assigned_to = Some("bob".into());
        let updated = update(&state, &alice, ticket.id, changed).await.unwrap();

        assert_eq!(updated.title, "after");
        assert_eq!(updated.due_date.to_string(), "2025-06-30");
        assert_eq!(updated.assigned_to.as_deref(), Some("bob"));
        assert_eq!(updated.id, ticket.id);
        assert_eq!(updated.created_at, ticket.created_at);
        assert_eq!(updated.created_by, ticket.created_by);
        assert_eq!(updated.created_by_username, ticket.created_by_username);
    }

    #[tokio::test]
    async fn invalid_update_rejected_with_field_errors() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;
        let ticket = create(&state, &alice, payload("keep")).await.unwrap();

        let mut bad = payload("keep");
        bad.description = Some("x".repeat(31));
        let err = update(&state, &alice, ticket.id, bad).await.unwrap_err();
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert!(fields.contains_key("description"));

        // Ticket unchanged.
        let after = get(&state, &alice, ticket.id).await.unwrap();
        assert_eq!(after.description, "desc");
    }

    #[tokio::test]
    async fn missing_ticket_wins_over_bad_payload_on_update() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;

        let err = update(&state, &alice, Uuid::new_v4(), TicketPayload::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let state = AppState::in_memory();
        let alice = seed_user(&state, "alice").await;
        let ticket = create(&state, &alice, payload("gone soon")).await.unwrap();

        delete(&state, &alice, ticket.id).await.unwrap();
        assert!(matches!(
            get(&state, &alice, ticket.id).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            delete(&state, &alice, ticket.id).await,
            Err(ApiError::NotFound)
        ));
    }
}
