use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::entities::user_list_items;
use crate::errors::domain::DomainError;
use crate::infra::db_errors::map_db_err;
use crate::services::users::UserList;

fn scoped(user_id: &str, list: UserList) -> sea_orm::Select<user_list_items::Entity> {
    user_list_items::Entity::find()
        .filter(user_list_items::Column::UserId.eq(user_id))
        .filter(user_list_items::Column::List.eq(list.as_str()))
}

/// Item ids in insertion order.
pub async fn list_item_ids<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    list: UserList,
) -> Result<Vec<String>, DomainError> {
    scoped(user_id, list)
        .select_only()
        .column(user_list_items::Column::ItemId)
        .order_by_asc(user_list_items::Column::Id)
        .into_tuple::<String>()
        .all(conn)
        .await
        .map_err(map_db_err)
}

pub async fn count_items<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    list: UserList,
) -> Result<u64, DomainError> {
    scoped(user_id, list).count(conn).await.map_err(map_db_err)
}

pub async fn contains_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    list: UserList,
    item_id: &str,
) -> Result<bool, DomainError> {
    let found = scoped(user_id, list)
        .filter(user_list_items::Column::ItemId.eq(item_id))
        .one(conn)
        .await
        .map_err(map_db_err)?;
    Ok(found.is_some())
}

pub async fn insert_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    list: UserList,
    item_id: &str,
) -> Result<(), DomainError> {
    let active = user_list_items::ActiveModel {
        id: NotSet,
        user_id: Set(user_id.to_string()),
        list: Set(list.as_str().to_string()),
        item_id: Set(item_id.to_string()),
        created_at: Set(time::OffsetDateTime::now_utc()),
    };
    active.insert(conn).await.map_err(map_db_err)?;
    Ok(())
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_item<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: &str,
    list: UserList,
    item_id: &str,
) -> Result<u64, DomainError> {
    let result = user_list_items::Entity::delete_many()
        .filter(user_list_items::Column::UserId.eq(user_id))
        .filter(user_list_items::Column::List.eq(list.as_str()))
        .filter(user_list_items::Column::ItemId.eq(item_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected)
}
