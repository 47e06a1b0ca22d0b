//! Database-backed user store over SeaORM (Postgres in production, SQLite in
//! tests).

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::debug;
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::{is_duplicate_list_item, map_db_err};
use crate::repos::{user_lists, users};
use crate::services::users::{
    list_full, login_rejected, registered_message, user_name_taken, user_not_found,
    validate_registration, LoginUser, RegisterUser, UserIdentity, UserList, UserService,
    MAX_LIST_LEN,
};

pub struct SeaUserService {
    db: DatabaseConnection,
    hasher: PasswordHasher,
}

impl SeaUserService {
    pub fn new(db: DatabaseConnection, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn require_user(&self, user_id: &str) -> Result<(), DomainError> {
        if users::user_exists(&self.db, user_id).await? {
            Ok(())
        } else {
            Err(user_not_found(user_id))
        }
    }
}

#[async_trait]
impl UserService for SeaUserService {
    async fn register_user(&self, payload: RegisterUser) -> Result<String, DomainError> {
        validate_registration(&payload)?;

        if users::find_by_user_name(&self.db, &payload.user_name)
            .await?
            .is_some()
        {
            return Err(user_name_taken());
        }

        let password_hash = self.hasher.hash_blocking(payload.password).await?;

        // A concurrent registration that slipped past the lookup above is
        // caught by the unique index and mapped to the same conflict.
        let created = users::create_user(
            &self.db,
            users::NewUser {
                id: Uuid::new_v4().to_string(),
                user_name: payload.user_name.clone(),
                email: payload.email.filter(|e| !e.trim().is_empty()),
                password_hash,
            },
        )
        .await?;

        debug!(user_id = %created.id, "user registered");
        Ok(registered_message(&created.user_name))
    }

    async fn check_user(&self, payload: LoginUser) -> Result<UserIdentity, DomainError> {
        let Some(user) = users::find_by_user_name(&self.db, &payload.user_name).await? else {
            self.hasher
                .verify_missing_user_blocking(payload.password)
                .await;
            return Err(login_rejected());
        };

        if !self
            .hasher
            .verify_blocking(payload.password, user.password_hash)
            .await
        {
            return Err(login_rejected());
        }

        Ok(UserIdentity {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
        })
    }

    async fn list_items(&self, user_id: &str, list: UserList) -> Result<Vec<String>, DomainError> {
        self.require_user(user_id).await?;
        user_lists::list_item_ids(&self.db, user_id, list).await
    }

    async fn add_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        // Concurrent adds for one user queue on the user row, so the count
        // below cannot go stale before the insert commits.
        if !users::lock_user(&txn, user_id).await? {
            return Err(user_not_found(user_id));
        }

        if !user_lists::contains_item(&txn, user_id, list, item_id).await? {
            if user_lists::count_items(&txn, user_id, list).await? >= MAX_LIST_LEN as u64 {
                return Err(list_full(list, user_id));
            }
            match user_lists::insert_item(&txn, user_id, list, item_id).await {
                Ok(()) => {}
                // Lost a race with an identical add. Postgres has aborted the
                // transaction, so roll back and read the list afresh.
                Err(e) if is_duplicate_list_item(&e) => {
                    txn.rollback().await.map_err(map_db_err)?;
                    return user_lists::list_item_ids(&self.db, user_id, list).await;
                }
                Err(e) => return Err(e),
            }
        }

        let items = user_lists::list_item_ids(&txn, user_id, list).await?;
        txn.commit().await.map_err(map_db_err)?;
        Ok(items)
    }

    async fn remove_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.require_user(user_id).await?;
        let removed = user_lists::delete_item(&self.db, user_id, list, item_id).await?;
        debug!(user_id, list = list.as_str(), removed, "list item removed");
        user_lists::list_item_ids(&self.db, user_id, list).await
    }
}
