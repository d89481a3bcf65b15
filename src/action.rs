//! Action types: the public entry points for running operations through a binding.

mod create_user;

pub use create_user::CreateUser;
