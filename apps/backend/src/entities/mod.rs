pub mod user_list_items;
pub mod users;

pub use user_list_items::Entity as UserListItems;
pub use user_list_items::Model as UserListItem;
pub use users::Entity as Users;
pub use users::Model as User;
