//! Contains the types for write concerns.


use std::time::Duration;

use serde::{Serialize, Serializer};
use serde_with::skip_serializing_none;
use typed_builder::TypedBuilder;

use crate::{
    bson_util,
    error::{ErrorKind, Result},
};

/// Specifies the level of acknowledgement requested from the server for the `createUser`
/// command.
///
/// See the documentation [here](https://www.mongodb.com/docs/manual/reference/write-concern/) for more
/// information about write concerns.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, TypedBuilder, Serialize)]
#[builder(field_defaults(default, setter(into)))]
#[non_exhaustive]
pub struct WriteConcern {
    /// Requests acknowledgement that the user has propagated to a specific number or variety of
    /// servers.
    pub w: Option<Acknowledgment>,

    /// How long the server waits for the requested acknowledgement before reporting a write
    /// concern error. The user is not removed when the wait times out.
    #[serde(rename = "wtimeout")]
    #[serde(serialize_with = "bson_util::serialize_duration_option_as_int_millis")]
    pub w_timeout: Option<Duration>,

    /// Requests acknowledgement that the user has been written to the on-disk journal.
    #[serde(rename = "j")]
    pub journal: Option<bool>,
}

/// The type of the `w` field in a [`WriteConcern`](struct.WriteConcern.html).
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Acknowledgment {
    /// Requires acknowledgement from the given number of nodes. `Nodes(0)` is unacknowledged
    /// and is rejected by [`CreateUser::with_options`](crate::action::CreateUser::with_options).
    Nodes(u32),

    /// Requires acknowledgement from a majority of the voting nodes.
    Majority,

    /// Requires acknowledgement according to a custom write concern defined with replica set
    /// tags.
    Custom(String),
}

impl Serialize for Acknowledgment {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Acknowledgment::Majority => serializer.serialize_str("majority"),
            Acknowledgment::Nodes(n) => match i32::try_from(*n) {
                Ok(n) => serializer.serialize_i32(n),
                Err(_) => serializer.serialize_i64(i64::from(*n)),
            },
            Acknowledgment::Custom(name) => serializer.serialize_str(name),
        }
    }
}

impl From<&str> for Acknowledgment {
    fn from(s: &str) -> Self {
        match s {
            "majority" => Acknowledgment::Majority,
            name => Acknowledgment::Custom(name.to_string()),
        }
    }
}

impl From<Acknowledgment> for WriteConcern {
    fn from(w: Acknowledgment) -> Self {
        WriteConcern {
            w: Some(w),
            ..Default::default()
        }
    }
}

impl WriteConcern {
    /// `w: <v>`.
    pub fn nodes(v: u32) -> Self {
        Acknowledgment::Nodes(v).into()
    }

    /// `w: 1`, acknowledgement from the primary alone. This is what servers that predate the
    /// user management commands are always asked for.
    pub fn acknowledged() -> Self {
        Self::nodes(1)
    }

    /// `w: "majority"`.
    pub fn majority() -> Self {
        Acknowledgment::Majority.into()
    }

    /// `w: <name>` for a custom write concern. `"majority"` maps to
    /// [`Acknowledgment::Majority`].
    pub fn custom(name: impl AsRef<str>) -> Self {
        Acknowledgment::from(name.as_ref()).into()
    }

    pub(crate) fn is_acknowledged(&self) -> bool {
        self.w != Some(Acknowledgment::Nodes(0)) || self.journal == Some(true)
    }

    /// Whether nothing was specified, leaving the choice to the server.
    pub(crate) fn is_empty(&self) -> bool {
        self.w.is_none() && self.w_timeout.is_none() && self.journal.is_none()
    }

    /// Rejects `w: 0` combined with `j: true`.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.w == Some(Acknowledgment::Nodes(0)) && self.journal == Some(true) {
            return Err(ErrorKind::InvalidArgument {
                message: "write concern cannot have w=0 and j=true".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
