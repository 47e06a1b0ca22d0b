use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, EntityTrait, QueryFilter,
    QuerySelect, Select, Set,
};

use crate::entities::users;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;

/// Row data for a new user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub user_name: String,
    pub email: Option<String>,
    pub password_hash: String,
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
) -> Result<users::Model, DomainError> {
    let active = users::ActiveModel {
        id: Set(new_user.id),
        user_name: Set(new_user.user_name),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await.map_err(map_db_err)
}

pub async fn find_by_user_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_name: &str,
) -> Result<Option<users::Model>, DomainError> {
    users::Entity::find()
        .filter(users::Column::UserName.eq(user_name))
        .one(conn)
        .await
        .map_err(map_db_err)
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<Option<users::Model>, DomainError> {
    users::Entity::find_by_id(user_id.to_string())
        .one(conn)
        .await
        .map_err(map_db_err)
}

pub async fn user_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<bool, DomainError> {
    Ok(find_by_id(conn, user_id).await?.is_some())
}

/// Select for one user row, `FOR UPDATE` where the backend supports row locks.
///
/// SQLite has no row locks; its writers are already serialized per database.
pub fn user_row_for_update(backend: DbBackend, user_id: &str) -> Select<users::Entity> {
    let query = users::Entity::find_by_id(user_id.to_string());
    match backend {
        DbBackend::Postgres | DbBackend::MySql => query.lock_exclusive(),
        _ => query,
    }
}

/// Lock the user's row for the rest of the transaction. False when the user
/// does not exist.
pub async fn lock_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
) -> Result<bool, DomainError> {
    let found = user_row_for_update(conn.get_database_backend(), user_id)
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use sea_orm::QueryTrait;

    use super::*;

    #[test]
    fn postgres_user_lock_selects_for_update() {
        let sql = user_row_for_update(DbBackend::Postgres, "u-1")
            .build(DbBackend::Postgres)
            .to_string();
        assert!(sql.ends_with("FOR UPDATE"), "{sql}");
        assert!(sql.contains("'u-1'"), "{sql}");
    }

    #[test]
    fn sqlite_user_lock_is_a_plain_select() {
        let sql = user_row_for_update(DbBackend::Sqlite, "u-1")
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(!sql.contains("FOR UPDATE"), "{sql}");
    }
}
