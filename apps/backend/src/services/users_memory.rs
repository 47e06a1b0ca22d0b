//! Process-local user store.
//!
//! Used when no database is configured and throughout the HTTP tests.
//! Everything is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::errors::domain::DomainError;
use crate::services::users::{
    add_to_list, login_rejected, registered_message, user_name_taken, user_not_found,
    validate_registration, LoginUser, RegisterUser, UserIdentity, UserList, UserService,
};

struct StoredUser {
    identity: UserIdentity,
    password_hash: String,
    favourites: Vec<String>,
    history: Vec<String>,
}

impl StoredUser {
    fn list_mut(&mut self, list: UserList) -> &mut Vec<String> {
        match list {
            UserList::Favourites => &mut self.favourites,
            UserList::History => &mut self.history,
        }
    }

    fn list(&self, list: UserList) -> &[String] {
        match list {
            UserList::Favourites => &self.favourites,
            UserList::History => &self.history,
        }
    }
}

#[derive(Default)]
struct Store {
    users: HashMap<String, StoredUser>,
    ids_by_name: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryUserService {
    store: RwLock<Store>,
    hasher: PasswordHasher,
}

impl InMemoryUserService {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            hasher,
        }
    }

    pub fn user_count(&self) -> usize {
        self.store.read().users.len()
    }
}

#[async_trait]
impl UserService for InMemoryUserService {
    async fn register_user(&self, payload: RegisterUser) -> Result<String, DomainError> {
        validate_registration(&payload)?;

        // Cheap early exit before paying for a hash
        if self.store.read().ids_by_name.contains_key(&payload.user_name) {
            return Err(user_name_taken());
        }

        let password_hash = self.hasher.hash_blocking(payload.password).await?;

        let mut store = self.store.write();
        if store.ids_by_name.contains_key(&payload.user_name) {
            return Err(user_name_taken());
        }

        let identity = UserIdentity {
            id: Uuid::new_v4().to_string(),
            user_name: payload.user_name.clone(),
            email: payload.email.filter(|e| !e.trim().is_empty()),
        };
        store
            .ids_by_name
            .insert(identity.user_name.clone(), identity.id.clone());
        store.users.insert(
            identity.id.clone(),
            StoredUser {
                identity,
                password_hash,
                favourites: Vec::new(),
                history: Vec::new(),
            },
        );

        debug!(user_count = store.users.len(), "user registered in memory store");
        Ok(registered_message(&payload.user_name))
    }

    async fn check_user(&self, payload: LoginUser) -> Result<UserIdentity, DomainError> {
        let found = {
            let store = self.store.read();
            store
                .ids_by_name
                .get(&payload.user_name)
                .and_then(|id| store.users.get(id))
                .map(|user| (user.identity.clone(), user.password_hash.clone()))
        };

        let Some((identity, password_hash)) = found else {
            self.hasher
                .verify_missing_user_blocking(payload.password)
                .await;
            return Err(login_rejected());
        };

        if self
            .hasher
            .verify_blocking(payload.password, password_hash)
            .await
        {
            Ok(identity)
        } else {
            Err(login_rejected())
        }
    }

    async fn list_items(&self, user_id: &str, list: UserList) -> Result<Vec<String>, DomainError> {
        let store = self.store.read();
        let user = store
            .users
            .get(user_id)
            .ok_or_else(|| user_not_found(user_id))?;
        Ok(user.list(list).to_vec())
    }

    async fn add_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        let mut store = self.store.write();
        let user = store
            .users
            .get_mut(user_id)
            .ok_or_else(|| user_not_found(user_id))?;
        let items = user.list_mut(list);
        add_to_list(items, list, user_id, item_id)?;
        Ok(items.clone())
    }

    async fn remove_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        let mut store = self.store.write();
        let user = store
            .users
            .get_mut(user_id)
            .ok_or_else(|| user_not_found(user_id))?;
        let items = user.list_mut(list);
        items.retain(|i| i != item_id);
        Ok(items.clone())
    }
}
