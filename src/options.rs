//! Contains all of the types needed to specify options to user administration operations.
//!
//! The options structs in this module use the
//! [`typed-builder`](https://crates.io/crates/typed-builder) crate to derive a type-safe builder
//! API on them. For example, to create an instance of
//! [`CreateUserOptions`](struct.CreateUserOptions.html) requesting majority acknowledgment, the
//! builder API can be used as follows:
//!
//! ```rust
//! use mongodb_user_admin::options::{CreateUserOptions, WriteConcern};
//!
//! let options = CreateUserOptions::builder()
//!                   .write_concern(WriteConcern::majority())
//!                   .build();
//! ```

pub use crate::{
    address::ServerAddress,
    auth::Credential,
    concern::*,
    operation::create_user::options::CreateUserOptions,
};
