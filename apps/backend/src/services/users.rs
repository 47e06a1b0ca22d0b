//! The user service consumed by the HTTP layer.
//!
//! Handlers only ever talk to `dyn UserService`: registration, credential
//! checks, and the per-user favourites/history lists. Two stores implement
//! it, [`InMemoryUserService`](super::users_memory::InMemoryUserService) and
//! [`SeaUserService`](super::users_sea::SeaUserService); the rules both must
//! follow (validation, messages, list limits) live here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::auth::claims::IdentityClaims;
use crate::errors::domain::{ConflictKind, DomainError};

/// Maximum number of ids held in one favourites or history list.
pub const MAX_LIST_LEN: usize = 50;

pub const USER_NAME_TAKEN: &str = "User Name already taken";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match";
pub const CREDENTIALS_REQUIRED: &str = "User Name and password are required";
/// Same message for unknown user names and wrong passwords.
pub const LOGIN_REJECTED: &str = "Incorrect user name or password";

/// Registration payload.
///
/// Missing fields deserialize as empty and are rejected by validation, so a
/// half-filled form gets the service's message rather than a parse error.
#[derive(Clone, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password2: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for RegisterUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUser")
            .field("user_name", &self.user_name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Login payload.
#[derive(Clone, Default, Deserialize)]
pub struct LoginUser {
    #[serde(default, rename = "userName")]
    pub user_name: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginUser")
            .field("user_name", &self.user_name)
            .finish_non_exhaustive()
    }
}

/// A user whose credentials checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    pub id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub email: Option<String>,
}

impl From<UserIdentity> for IdentityClaims {
    fn from(user: UserIdentity) -> Self {
        IdentityClaims {
            sub: user.id,
            user_name: user.user_name,
            email: user.email,
        }
    }
}

/// Per-user resource lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserList {
    Favourites,
    History,
}

impl UserList {
    /// Stored discriminator and the name used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserList::Favourites => "favourites",
            UserList::History => "history",
        }
    }
}

/// Check a registration payload before anything is hashed or stored.
pub fn validate_registration(payload: &RegisterUser) -> Result<(), DomainError> {
    if payload.user_name.trim().is_empty() || payload.password.is_empty() {
        return Err(DomainError::validation(CREDENTIALS_REQUIRED));
    }
    if payload.password != payload.password2 {
        return Err(DomainError::validation(PASSWORDS_DO_NOT_MATCH));
    }
    Ok(())
}

pub fn registered_message(user_name: &str) -> String {
    format!("User {user_name} successfully registered")
}

pub fn user_name_taken() -> DomainError {
    DomainError::conflict(ConflictKind::UniqueUserName, USER_NAME_TAKEN)
}

pub fn login_rejected() -> DomainError {
    DomainError::validation(LOGIN_REJECTED)
}

pub fn user_not_found(user_id: &str) -> DomainError {
    DomainError::not_found(format!("Unable to find user with id: {user_id}"))
}

pub fn list_full(list: UserList, user_id: &str) -> DomainError {
    DomainError::validation(format!(
        "Unable to update {} for user with id: {user_id}",
        list.as_str()
    ))
}

/// Set-like add with the length cap. Returns whether `items` changed.
pub fn add_to_list(
    items: &mut Vec<String>,
    list: UserList,
    user_id: &str,
    item_id: &str,
) -> Result<bool, DomainError> {
    if items.iter().any(|i| i == item_id) {
        return Ok(false);
    }
    if items.len() >= MAX_LIST_LEN {
        return Err(list_full(list, user_id));
    }
    items.push(item_id.to_string());
    Ok(true)
}

#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a user. Returns the confirmation message; issues no token.
    async fn register_user(&self, payload: RegisterUser) -> Result<String, DomainError>;

    /// Check credentials and return the matching identity.
    async fn check_user(&self, payload: LoginUser) -> Result<UserIdentity, DomainError>;

    /// Ids in `list`, oldest first.
    async fn list_items(&self, user_id: &str, list: UserList) -> Result<Vec<String>, DomainError>;

    /// Add `item_id` to `list` (no-op if present) and return the updated list.
    async fn add_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError>;

    /// Remove `item_id` from `list` (no-op if absent) and return the updated list.
    async fn remove_item(
        &self,
        user_id: &str,
        list: UserList,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError>;

    async fn get_favourites(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        self.list_items(user_id, UserList::Favourites).await
    }

    async fn add_favourite(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.add_item(user_id, UserList::Favourites, item_id).await
    }

    async fn remove_favourite(
        &self,
        user_id: &str,
        item_id: &str,
    ) -> Result<Vec<String>, DomainError> {
        self.remove_item(user_id, UserList::Favourites, item_id).await
    }

    async fn get_history(&self, user_id: &str) -> Result<Vec<String>, DomainError> {
        self.list_items(user_id, UserList::History).await
    }

    async fn add_history(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.add_item(user_id, UserList::History, item_id).await
    }

    async fn remove_history(&self, user_id: &str, item_id: &str) -> Result<Vec<String>, DomainError> {
        self.remove_item(user_id, UserList::History, item_id).await
    }
}
