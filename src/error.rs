//! Contains the `Error` and `Result` types that `mongodb_user_admin` uses.

use std::{collections::HashSet, fmt, sync::Arc};

use serde::Deserialize;
use thiserror::Error;

use crate::bson::Document;

/// The code reported for failures whose reply carries no code (`UnknownError`).
pub(crate) const UNKNOWN_ERROR_CODE: i32 = 8;
const DUPLICATE_KEY_CODE: i32 = 11000;
const USER_ALREADY_EXISTS_CODE: i32 = 51003;

/// The result type for all methods that can return an error in the `mongodb_user_admin` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `mongodb_user_admin` crate. The inner
/// [`ErrorKind`](enum.ErrorKind.html) is boxed so that `Result`s stay small, and any source that
/// does not implement `Clone` is wrapped in an `Arc` so that errors can be cloned.
#[derive(Clone, Debug, Error)]
#[error("Kind: {kind}, labels: {labels:?}")]
#[non_exhaustive]
pub struct Error {
    /// The type of error that occurred.
    pub kind: Box<ErrorKind>,

    labels: HashSet<String>,

    /// A secondary error that happened while this one was being handled, such as a failure to
    /// check a connection back in after the operation itself failed.
    #[source]
    pub(crate) source: Option<Box<Error>>,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, labels: Option<impl IntoIterator<Item = String>>) -> Self {
        Self {
            kind: Box::new(kind),
            labels: labels
                .map(|labels| labels.into_iter().collect())
                .unwrap_or_default(),
            source: None,
        }
    }

    /// Creates an `InvalidArgument` error with the given message.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        ErrorKind::InvalidArgument {
            message: message.into(),
        }
        .into()
    }

    /// Creates a `ConnectionUnavailable` error with the given message. Bindings can use this when
    /// they cannot supply a connection.
    pub fn connection_unavailable(message: impl Into<String>) -> Self {
        ErrorKind::ConnectionUnavailable {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn cancelled() -> Self {
        ErrorKind::Cancelled.into()
    }

    /// Creates an `InvalidResponse` error with the given message. Connections can use this when
    /// the server reply could not be read.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        ErrorKind::InvalidResponse {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal {
            message: message.into(),
        }
        .into()
    }

    /// Returns a copy of this error with the given error attached as its source. A source that
    /// is already present is kept and the new one is attached at the end of the chain.
    pub(crate) fn with_source(mut self, source: impl Into<Option<Error>>) -> Self {
        let Some(source) = source.into() else {
            return self;
        };
        self.source = Some(Box::new(match self.source.take() {
            Some(existing) => existing.with_source(source),
            None => source,
        }));
        self
    }

    /// The secondary error attached to this one, if any.
    pub fn secondary(&self) -> Option<&Error> {
        self.source.as_deref()
    }

    /// Returns the labels for this error.
    pub fn labels(&self) -> &HashSet<String> {
        &self.labels
    }

    /// Whether this error contains the specified label.
    pub fn contains_label<T: AsRef<str>>(&self, label: T) -> bool {
        self.labels.contains(label.as_ref())
    }

    /// The server-reported error code, if this error came from the server.
    pub fn code(&self) -> Option<i32> {
        match self.kind.as_ref() {
            ErrorKind::Command(err) => Some(err.code),
            ErrorKind::Write(WriteFailure::WriteError(err)) => Some(err.code),
            ErrorKind::Write(WriteFailure::WriteConcernError(err)) => Some(err.code),
            _ => None,
        }
    }

    /// Whether the invocation that produced this error was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Cancelled)
    }

    /// Whether this error is a duplicate key / duplicate user error.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self.code(),
            Some(DUPLICATE_KEY_CODE) | Some(USER_ALREADY_EXISTS_CODE)
        )
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        Self {
            kind: Box::new(err.into()),
            labels: HashSet::new(),
            source: None,
        }
    }
}

impl From<std::io::Error> for ErrorKind {
    fn from(err: std::io::Error) -> Self {
        Self::Io(Arc::new(err))
    }
}

impl From<crate::bson::raw::Error> for ErrorKind {
    fn from(err: crate::bson::raw::Error) -> Self {
        Self::InvalidResponse {
            message: err.to_string(),
        }
    }
}

impl std::ops::Deref for Error {
    type Target = ErrorKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

/// The types of errors that can occur.
#[allow(missing_docs)]
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An invalid argument was provided. Always detected before any I/O happens.
    #[error("An invalid argument was provided: {message}")]
    #[non_exhaustive]
    InvalidArgument { message: String },

    /// The binding could not supply a connection for the operation.
    #[error("No connection was available for the operation: {message}")]
    #[non_exhaustive]
    ConnectionUnavailable { message: String },

    /// The server returned an error to an attempted command.
    #[error("Command failed: {0}")]
    Command(CommandError),

    /// An error occurred when trying to execute a write operation.
    #[error("An error occurred when trying to execute a write operation: {0:?}")]
    Write(WriteFailure),

    /// The invocation was cancelled before it completed.
    #[error("The operation was cancelled before it completed")]
    Cancelled,

    /// The server returned an invalid reply to a database operation.
    #[error("The server returned an invalid reply to a database operation: {message}")]
    #[non_exhaustive]
    InvalidResponse { message: String },

    /// Wrapper around `bson::de::Error`.
    #[error("{0}")]
    BsonDeserialization(crate::bson::de::Error),

    /// Wrapper around `bson::ser::Error`.
    #[error("{0}")]
    BsonSerialization(crate::bson::ser::Error),

    /// Wrapper around [`std::io::Error`].
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),

    /// An internal error occurred. This indicates a bug in this crate.
    #[error("Internal error: {message}")]
    #[non_exhaustive]
    Internal { message: String },
}

impl From<crate::bson::de::Error> for ErrorKind {
    fn from(err: crate::bson::de::Error) -> Self {
        Self::BsonDeserialization(err)
    }
}

impl From<crate::bson::ser::Error> for ErrorKind {
    fn from(err: crate::bson::ser::Error) -> Self {
        Self::BsonSerialization(err)
    }
}

/// An error that occurred due to a database command failing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct CommandError {
    /// Identifies the type of error.
    pub code: i32,

    /// The name associated with the error code.
    #[serde(rename = "codeName", default)]
    pub code_name: String,

    /// A description of the error that occurred.
    #[serde(rename = "errmsg", default)]
    pub message: String,
}

impl fmt::Display for CommandError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "Error code {} ({}): {}", self.code, self.code_name, self.message)
    }
}

/// An error that occurred due to not being able to satisfy a write concern.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[non_exhaustive]
pub struct WriteConcernError {
    /// Identifies the type of write concern error.
    pub code: i32,

    /// The name associated with the error code.
    #[serde(rename = "codeName", default)]
    pub code_name: String,

    /// A description of the error that occurred.
    #[serde(alias = "errmsg", default)]
    pub message: String,

    /// A document identifying the write concern setting related to the error.
    #[serde(rename = "errInfo")]
    pub details: Option<Document>,
}

/// An error that occurred during a write operation that wasn't due to being unable to satisfy a
/// write concern.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct WriteError {
    /// Identifies the type of write error.
    pub code: i32,

    /// The name associated with the error code.
    ///
    /// Note that the server will not return this in some cases, hence `code_name` being an
    /// `Option`.
    pub code_name: Option<String>,

    /// A description of the error that occurred.
    pub message: String,
}

/// An error that occurred when trying to execute a write operation.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum WriteFailure {
    /// An error that occurred due to not being able to satisfy a write concern.
    WriteConcernError(WriteConcernError),

    /// An error that occurred during a write operation that wasn't due to being unable to satisfy a
    /// write concern.
    WriteError(WriteError),
}
