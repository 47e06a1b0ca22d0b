use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::password::PasswordHasher;
use crate::error::AppError;
use crate::infra::db::connect_and_migrate;
use crate::services::users::UserService;
use crate::services::users_memory::InMemoryUserService;
use crate::services::users_sea::SeaUserService;
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;

/// Builder for creating AppState instances (used in both tests and main)
pub struct StateBuilder {
    security_config: SecurityConfig,
    database_url: Option<String>,
    user_service: Option<Arc<dyn UserService>>,
    hasher: PasswordHasher,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            security_config: SecurityConfig::default(),
            database_url: None,
            user_service: None,
            hasher: PasswordHasher::default(),
        }
    }

    pub fn with_security(mut self, security_config: SecurityConfig) -> Self {
        self.security_config = security_config;
        self
    }

    /// Back the user service with this database; ignored when a service is
    /// injected with [`with_user_service`](Self::with_user_service).
    pub fn with_database_url(mut self, database_url: Option<String>) -> Self {
        self.database_url = database_url;
        self
    }

    pub fn with_user_service(mut self, user_service: Arc<dyn UserService>) -> Self {
        self.user_service = Some(user_service);
        self
    }

    pub fn with_password_hasher(mut self, hasher: PasswordHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let users: Arc<dyn UserService> = match (self.user_service, self.database_url) {
            (Some(service), _) => service,
            (None, Some(url)) => {
                let conn = connect_and_migrate(&url).await?;
                info!("using database-backed user store");
                Arc::new(SeaUserService::new(conn, self.hasher))
            }
            (None, None) => {
                warn!("DATABASE_URL is not set; users are kept in memory and lost on restart");
                Arc::new(InMemoryUserService::new(self.hasher))
            }
        };

        Ok(AppState::new(users, self.security_config))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::users::RegisterUser;

    #[tokio::test]
    async fn build_without_database_uses_memory_store() {
        let state = build_state()
            .with_password_hasher(PasswordHasher::with_params(1024, 1, 1).unwrap())
            .build()
            .await
            .unwrap();

        let msg = state
            .users
            .register_user(RegisterUser {
                user_name: "dora".into(),
                password: "pw".into(),
                password2: "pw".into(),
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(msg, "User dora successfully registered");
    }

    #[tokio::test]
    async fn build_with_sqlite_memory_runs_migrations() {
        let state = build_state()
            .with_database_url(Some("sqlite::memory:".to_string()))
            .with_password_hasher(PasswordHasher::with_params(1024, 1, 1).unwrap())
            .build()
            .await
            .unwrap();

        assert!(state.users.get_favourites("nobody").await.is_err());
    }

    #[tokio::test]
    async fn injected_service_wins_over_database_url() {
        let injected = Arc::new(InMemoryUserService::new(
            PasswordHasher::with_params(1024, 1, 1).unwrap(),
        ));
        let state = build_state()
            .with_user_service(injected.clone())
            .with_database_url(Some("postgres://nobody@127.0.0.1:1/none".to_string()))
            .build()
            .await
            .unwrap();

        state
            .users
            .register_user(RegisterUser {
                user_name: "eve".into(),
                password: "pw".into(),
                password2: "pw".into(),
                email: None,
            })
            .await
            .unwrap();
        assert_eq!(injected.user_count(), 1);
    }

    #[tokio::test]
    async fn unreachable_database_fails_the_build() {
        let result = build_state()
            .with_database_url(Some("postgres://nobody@127.0.0.1:1/none".to_string()))
            .build()
            .await;
        assert!(result.is_err());
    }
}
