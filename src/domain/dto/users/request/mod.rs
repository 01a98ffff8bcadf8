pub mod create_user;
pub mod login;

pub use create_user::{CreateUserRequest, RegisterRequest, UpdateUserRequest, UserListQuery};
pub use login::LoginRequest;
