use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKey, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    UserName,
    Email,
    PasswordHash,
    CreatedAt,
}

#[derive(Iden)]
enum UserListItems {
    Table,
    Id,
    UserId,
    List,
    ItemId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::UserName).string().not_null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // user names are the login identifier
        manager
            .create_index(
                Index::create()
                    .name("idx_users_user_name_unique")
                    .table(Users::Table)
                    .col(Users::UserName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // user_list_items (favourites + history, discriminated by `list`)
        manager
            .create_table(
                Table::create()
                    .table(UserListItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserListItems::Id)
                            .integer()
                            .not_null()
                            .primary_key()
                            .auto_increment(),
                    )
                    .col(
                        ColumnDef::new(UserListItems::UserId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserListItems::List).string_len(16).not_null())
                    .col(ColumnDef::new(UserListItems::ItemId).string().not_null())
                    .col(
                        ColumnDef::new(UserListItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_list_items_user_id")
                            .from(UserListItems::Table, UserListItems::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // An id appears at most once per user list
        manager
            .create_index(
                Index::create()
                    .name("idx_user_list_items_unique")
                    .table(UserListItems::Table)
                    .col(UserListItems::UserId)
                    .col(UserListItems::List)
                    .col(UserListItems::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(UserListItems::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
