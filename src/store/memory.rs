use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{CredentialStore, NewUser, Ticket, TicketFields, TicketStore, UserRecord};

/// In-memory ticket store, used by the test suite and for running the server
/// without a database. Insertion order is the store-native list order.
#[derive(Default)]
pub struct MemoryTicketStore {
    tickets: Mutex<Vec<Ticket>>,
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn insert(
        &self,
        owner: Uuid,
        owner_username: &str,
        fields: TicketFields,
    ) -> anyhow::Result<Ticket> {
        let ticket = Ticket {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            created_at: OffsetDateTime::now_utc(),
            due_date: fields.due_date,
            priority: fields.priority,
            column_id: fields.column_id,
            created_by: owner,
            created_by_username: owner_username.to_string(),
            assigned_to: fields.assigned_to,
        };
        let mut tickets = self.tickets.lock().expect("ticket store poisoned");
        tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn list_by_owner(&self, owner: Uuid) -> anyhow::Result<Vec<Ticket>> {
        let tickets = self.tickets.lock().expect("ticket store poisoned");
        Ok(tickets
            .iter()
            .filter(|t| t.created_by == owner)
            .cloned()
            .collect())
    }

    async fn get(&self, owner: Uuid, id: Uuid) -> anyhow::Result<Option<Ticket>> {
        let tickets = self.tickets.lock().expect("ticket store poisoned");
        Ok(tickets
            .iter()
            .find(|t| t.id == id && t.created_by == owner)
            .cloned())
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        fields: TicketFields,
    ) -> anyhow::Result<Option<Ticket>> {
        let mut tickets = self.tickets.lock().expect("ticket store poisoned");
        let Some(ticket) = tickets
            .iter_mut()
            .find(|t| t.id == id && t.created_by == owner)
        else {
            return Ok(None);
        };
        ticket.title = fields.title;
        ticket.description = fields.description;
        ticket.due_date = fields.due_date;
        ticket.priority = fields.priority;
        ticket.column_id = fields.column_id;
        ticket.assigned_to = fields.assigned_to;
        Ok(Some(ticket.clone()))
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut tickets = self.tickets.lock().expect("ticket store poisoned");
        let before = tickets.len();
        tickets.retain(|t| !(t.id == id && t.created_by == owner));
        Ok(tickets.len() < before)
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    users: Mutex<Vec<UserRecord>>,
    tokens: Mutex<HashMap<Uuid, String>>,
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<UserRecord>> {
        let users = self.users.lock().expect("credential store poisoned");
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_token(&self, token: &str) -> anyhow::Result<Option<UserRecord>> {
        let tokens = self.tokens.lock().expect("credential store poisoned");
        let Some(user_id) = tokens
            .iter()
            .find_map(|(user_id, t)| (t == token).then_some(*user_id))
        else {
            return Ok(None);
        };
        drop(tokens);
        let users = self.users.lock().expect("credential store poisoned");
        Ok(users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn get_or_create_token(&self, user_id: Uuid, candidate: &str) -> anyhow::Result<String> {
        let mut tokens = self.tokens.lock().expect("credential store poisoned");
        Ok(tokens
            .entry(user_id)
            .or_insert_with(|| candidate.to_string())
            .clone())
    }

    async fn create_user(&self, new: NewUser) -> anyhow::Result<UserRecord> {
        let mut users = self.users.lock().expect("credential store poisoned");
        if users.iter().any(|u| u.username == new.username) {
            anyhow::bail!("username {} already taken", new.username);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: new.username,
            password_hash: new.password_hash,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            groups: new.groups,
        };
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn fields(title: &str) -> TicketFields {
        TicketFields {
            title: title.to_string(),
            description: "desc".to_string(),
            due_date: date!(2025 - 01 - 01),
            priority: Some("high".to_string()),
            column_id: 1,
            assigned_to: None,
        }
    }

    fn user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            password_hash: "x".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{name}@example.com"),
            groups: vec![],
        }
    }

    #[tokio::test]
    async fn list_preserves_insertion_order_and_owner_scope() {
        let store = MemoryTicketStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        store.insert(alice, "alice", fields("first")).await.unwrap();
        store.insert(bob, "bob", fields("theirs")).await.unwrap();
        store.insert(alice, "alice", fields("second")).await.unwrap();

        let listed = store.list_by_owner(alice).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[tokio::test]
    async fn get_update_delete_require_matching_owner() {
        let store = MemoryTicketStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let ticket = store.insert(alice, "alice", fields("mine")).await.unwrap();

        assert!(store.get(bob, ticket.id).await.unwrap().is_none());
        assert!(store
            .update(bob, ticket.id, fields("stolen"))
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(bob, ticket.id).await.unwrap());

        assert!(store.delete(alice, ticket.id).await.unwrap());
        assert!(store.get(alice, ticket.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn token_issuance_is_idempotent() {
        let store = MemoryCredentialStore::default();
        let u = store.create_user(user("alice")).await.unwrap();

        let first = store.get_or_create_token(u.id, "token-one").await.unwrap();
        let second = store.get_or_create_token(u.id, "token-two").await.unwrap();
        assert_eq!(first, "token-one");
        assert_eq!(first, second);

        let found = store.find_by_token("token-one").await.unwrap().unwrap();
        assert_eq!(found.id, u.id);
    }

    #[tokio::test]
    async fn duplicate_usernames_rejected() {
        let store = MemoryCredentialStore::default();
        store.create_user(user("alice")).await.unwrap();
        assert!(store.create_user(user("alice")).await.is_err());
    }
}
