use serde::Serialize;
use serde_with::skip_serializing_none;
use typed_builder::TypedBuilder;

use crate::options::WriteConcern;

/// Specifies the options to a [`CreateUser`](crate::action::CreateUser) operation.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder, Serialize)]
#[builder(field_defaults(default, setter(into)))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct CreateUserOptions {
    /// The write concern sent with the `createUser` command.
    ///
    /// Servers that predate the command interface are always asked to acknowledge the write
    /// with `w: 1`, whatever this is set to.
    pub write_concern: Option<WriteConcern>,
}
