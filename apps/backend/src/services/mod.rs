pub mod users;
pub mod users_memory;
pub mod users_sea;

pub use users::{LoginUser, RegisterUser, UserIdentity, UserList, UserService};
pub use users_memory::InMemoryUserService;
pub use users_sea::SeaUserService;
