//! SeaORM -> DomainError translation.
//!
//! Repos call [`map_db_err`] on every `DbErr`; the raw driver message is only
//! ever logged (redacted), never handed to a client.

use sea_orm::{DbErr, SqlErr};
use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind};
use crate::logging::pii::Redacted;
use crate::services::users::user_name_taken;
use crate::trace_ctx;

/// Conflict kind for a duplicate (user, list, item) row.
pub const UNIQUE_LIST_ITEM: &str = "UniqueListItem";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Classify a unique violation by constraint name (Postgres) or by the
/// `table.column` list SQLite puts in its message.
fn unique_conflict(msg: &str) -> DomainError {
    if msg.contains("idx_users_user_name_unique") || msg.contains("users.user_name") {
        return user_name_taken();
    }
    if msg.contains("idx_user_list_items_unique") || msg.contains("user_list_items.item_id") {
        return DomainError::conflict(
            ConflictKind::Other(UNIQUE_LIST_ITEM.into()),
            "Item already in list",
        );
    }
    DomainError::conflict(
        ConflictKind::Other("Unique".into()),
        "Unique constraint violation",
    )
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&msg), "Unique constraint violation");
        return unique_conflict(&msg);
    }

    match &e {
        DbErr::RecordNotFound(msg) => {
            return DomainError::not_found(format!("Record not found: {msg}"));
        }
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    // Drivers don't always surface a structured SqlErr
    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");
        return unique_conflict(&error_msg);
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::not_found("Referenced user does not exist");
    }

    if error_msg.contains("timeout") || error_msg.contains("pool timed out") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

/// Whether `err` is the duplicate-list-item conflict from [`map_db_err`].
pub fn is_duplicate_list_item(err: &DomainError) -> bool {
    matches!(err, DomainError::Conflict(ConflictKind::Other(kind), _) if kind == UNIQUE_LIST_ITEM)
}
