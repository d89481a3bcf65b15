use std::ops::{Deref, DerefMut};

use futures_util::future::BoxFuture;

use crate::{
    error::Result,
    trace::{TracingRepresentation, CONNECTION_TRACING_EVENT_TARGET},
};

/// A source of connections that an operation borrows for the duration of one invocation.
///
/// A connection obtained from a binding is handed back through [`Binding::check_in`] exactly once,
/// whether the invocation succeeded, failed, or was cancelled.
pub trait Binding: Send + Sync {
    /// The connection type handed out by this binding.
    type Connection: Send;

    /// Returns a connection to the binding. `state` tells whether the connection can be reused.
    fn check_in(&self, connection: Self::Connection, state: CheckInState) -> Result<()>;
}

/// The condition a connection is handed back to its binding in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum CheckInState {
    /// No round trip is outstanding on the connection.
    Clean,

    /// The invocation was abandoned after its request was sent and before the reply was read.
    /// The reply may still arrive on the connection, so it should be closed rather than reused.
    Abandoned,
}

/// A binding that supplies connections to blocking code.
pub trait WriteBinding: Binding {
    /// Obtains a connection to a writable server, blocking the calling thread until one is
    /// available. Failures should be reported as
    /// [`ErrorKind::ConnectionUnavailable`](crate::error::ErrorKind::ConnectionUnavailable).
    fn check_out(&self) -> Result<Self::Connection>;
}

/// A binding that supplies connections to asynchronous code.
pub trait AsyncWriteBinding: Binding {
    /// Obtains a connection to a writable server. Failures should be reported as
    /// [`ErrorKind::ConnectionUnavailable`](crate::error::ErrorKind::ConnectionUnavailable).
    fn check_out(&self) -> BoxFuture<'_, Result<Self::Connection>>;
}

/// A connection checked out from a binding. The connection is checked back in when the guard is
/// released or, failing that, dropped.
pub(crate) struct CheckedOutConnection<'b, B: Binding> {
    binding: &'b B,
    connection: Option<B::Connection>,
    round_trip_in_flight: bool,
}

impl<'b, B: Binding> CheckedOutConnection<'b, B> {
    pub(crate) fn new(binding: &'b B, connection: B::Connection) -> Self {
        tracing::debug!(target: CONNECTION_TRACING_EVENT_TARGET, "Connection checked out");
        Self {
            binding,
            connection: Some(connection),
            round_trip_in_flight: false,
        }
    }

    /// Marks the start of a round trip. Until [`CheckedOutConnection::round_trip_finished`] is
    /// called, the connection is checked in as [`CheckInState::Abandoned`].
    pub(crate) fn round_trip_started(&mut self) {
        self.round_trip_in_flight = true;
    }

    pub(crate) fn round_trip_finished(&mut self) {
        self.round_trip_in_flight = false;
    }

    /// Checks the connection back in.
    pub(crate) fn release(mut self) -> Result<()> {
        self.check_in()
    }

    /// Checks the connection back in and combines the outcome of doing so with the outcome of the
    /// work done on the connection. A failure to check in after the work failed is attached to
    /// that failure; after the work succeeded it is only logged.
    pub(crate) fn finish<T>(self, result: Result<T>) -> Result<T> {
        match (result, self.release()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(value), Err(error)) => {
                tracing::warn!(
                    target: CONNECTION_TRACING_EVENT_TARGET,
                    error = error.tracing_representation(),
                    "Connection check-in failed after the operation succeeded"
                );
                Ok(value)
            }
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(release_error)) => Err(error.with_source(release_error)),
        }
    }

    fn check_in(&mut self) -> Result<()> {
        let Some(connection) = self.connection.take() else {
            return Ok(());
        };
        let state = if self.round_trip_in_flight {
            CheckInState::Abandoned
        } else {
            CheckInState::Clean
        };
        let result = self.binding.check_in(connection, state);
        tracing::debug!(
            target: CONNECTION_TRACING_EVENT_TARGET,
            succeeded = result.is_ok(),
            abandoned = state == CheckInState::Abandoned,
            "Connection checked in"
        );
        result
    }

    fn connection(&self) -> &B::Connection {
        match self.connection.as_ref() {
            Some(connection) => connection,
            None => unreachable!("connection is only taken when the guard is consumed"),
        }
    }
}

impl<B: Binding> Deref for CheckedOutConnection<'_, B> {
    type Target = B::Connection;

    fn deref(&self) -> &Self::Target {
        self.connection()
    }
}

impl<B: Binding> DerefMut for CheckedOutConnection<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self.connection.as_mut() {
            Some(connection) => connection,
            None => unreachable!("connection is only taken when the guard is consumed"),
        }
    }
}

impl<B: Binding> Drop for CheckedOutConnection<'_, B> {
    fn drop(&mut self) {
        if self.connection.is_none() {
            return;
        }
        if let Err(error) = self.check_in() {
            tracing::warn!(
                target: CONNECTION_TRACING_EVENT_TARGET,
                error = error.tracing_representation(),
                "Connection check-in failed while abandoning an operation"
            );
        }
    }
}
