//! This crate creates MongoDB database users, from blocking or asynchronous code, over
//! connections it borrows from a caller-supplied binding. It uses the [`bson`] crate for BSON
//! support.
//!
//! The crate does not establish or pool connections. A caller implements
//! [`WriteBinding`](cmap::WriteBinding) or [`AsyncWriteBinding`](cmap::AsyncWriteBinding) for
//! its pool, and [`Connection`](cmap::Connection) or [`AsyncConnection`](cmap::AsyncConnection)
//! for the connections it hands out.
//!
//! # Choosing how to create the user
//!
//! Every execution of [`CreateUser`] looks at the wire version of the connection it was given:
//! - servers speaking wire version 2 (MongoDB 2.6) or newer receive a `createUser` command
//! - older servers get a document inserted into `<source>.system.users`, acknowledged through
//!   `getLastError` with `w: 1`
//!
//! The connection is always handed back to the binding. A connection abandoned while a reply was
//! outstanding is handed back as [`CheckInState::Abandoned`](cmap::CheckInState::Abandoned).
//!
//! # Example
//!
//! ```rust
//! use mongodb_user_admin::{
//!     error::Result,
//!     options::{CreateUserOptions, Credential, WriteConcern},
//!     CreateUser,
//! };
//!
//! fn reporting_user() -> Result<CreateUser> {
//!     let credential = Credential::builder()
//!         .username("reporting".to_string())
//!         .source("sales".to_string())
//!         .password("hunter2".to_string())
//!         .build();
//!
//!     CreateUser::new(credential, true)?.with_options(
//!         CreateUserOptions::builder()
//!             .write_concern(WriteConcern::majority())
//!             .build(),
//!     )
//! }
//! # reporting_user().unwrap();
//! ```
//!
//! # Logging
//!
//! Events are emitted with [`tracing`](https://docs.rs/tracing) under the
//! `mongodb_user_admin::command` and `mongodb_user_admin::connection` targets. Bodies of commands
//! that carry credentials are redacted, and inserted user documents are never logged.

#![warn(missing_docs, rustdoc::missing_crate_level_docs)]
#![allow(
    clippy::unreadable_literal,
    clippy::match_like_matches_macro,
    clippy::derive_partial_eq_without_eq
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod options;

pub use ::bson;

pub mod action;
mod address;
mod auth;
mod bson_util;
pub mod cmap;
mod concern;
pub mod error;
mod executor;
mod namespace;
mod operation;
mod trace;

pub use crate::{action::CreateUser, namespace::Namespace};
