//! Runs operations against connections borrowed from a binding.
//!
//! Both calling conventions go through the same steps: check out, build the request from the
//! connection's description, one round trip, interpret the reply, check in. Only the check-out and
//! the round trip differ between them.

use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::{
    cmap::{
        AsyncConnection,
        AsyncWriteBinding,
        Binding,
        CheckedOutConnection,
        Connection,
        RawCommandResponse,
        Request,
        StreamDescription,
        WriteBinding,
    },
    error::{Error, ErrorKind, Result},
    operation::Operation,
    options::ServerAddress,
    trace::{TracingRepresentation, COMMAND_TRACING_EVENT_TARGET, CONNECTION_TRACING_EVENT_TARGET},
};

/// Executes the operation on the calling thread, blocking for the check-out and the round trip.
pub(crate) fn execute_operation<B, T>(binding: &B, mut op: T) -> Result<T::O>
where
    B: WriteBinding,
    B::Connection: Connection,
    T: Operation,
{
    let connection = binding.check_out().map_err(check_out_error)?;
    let mut connection = CheckedOutConnection::new(binding, connection);
    let result = execute_operation_on_connection(&mut op, &mut connection);
    connection.finish(result)
}

/// Executes the operation, suspending for the check-out and the round trip.
///
/// Cancelling `cancellation` before the reply arrives resolves to
/// [`ErrorKind::Cancelled`]. A cancellation observed after the reply arrived is ignored.
pub(crate) async fn execute_operation_async<B, T>(
    binding: &B,
    mut op: T,
    cancellation: CancellationToken,
) -> Result<T::O>
where
    B: AsyncWriteBinding,
    B::Connection: AsyncConnection,
    T: Operation,
{
    let connection = tokio::select! {
        biased;
        _ = cancellation.cancelled() => return Err(cancelled(op.name(), "connection check-out")),
        result = binding.check_out() => result.map_err(check_out_error)?,
    };
    let mut connection = CheckedOutConnection::new(binding, connection);
    let result =
        execute_operation_on_connection_async(&mut op, &mut connection, &cancellation).await;
    connection.finish(result)
}

fn execute_operation_on_connection<B, T>(
    op: &mut T,
    connection: &mut CheckedOutConnection<'_, B>,
) -> Result<T::O>
where
    B: Binding,
    B::Connection: Connection,
    T: Operation,
{
    let description = connection.stream_description()?.clone();
    let request = op.build(&description)?;
    let round_trip = RoundTrip::start(op, &request, &description);
    connection.round_trip_started();
    let response = connection.send_request(request);
    connection.round_trip_finished();
    interpret_response(op, response, &description, round_trip)
}

async fn execute_operation_on_connection_async<B, T>(
    op: &mut T,
    connection: &mut CheckedOutConnection<'_, B>,
    cancellation: &CancellationToken,
) -> Result<T::O>
where
    B: Binding,
    B::Connection: AsyncConnection,
    T: Operation,
{
    let description = connection.stream_description()?.clone();
    let request = op.build(&description)?;
    if cancellation.is_cancelled() {
        return Err(cancelled(op.name(), "sending the request"));
    }

    let round_trip = RoundTrip::start(op, &request, &description);
    connection.round_trip_started();
    // The reply is polled first so that one which has already arrived is never discarded.
    let response = tokio::select! {
        biased;
        response = connection.send_request(request) => Some(response),
        _ = cancellation.cancelled() => None,
    };
    let response = match response {
        Some(response) => {
            connection.round_trip_finished();
            response
        }
        None => Err(cancelled(op.name(), "awaiting the reply")),
    };
    interpret_response(op, response, &description, round_trip)
}

fn interpret_response<T: Operation>(
    op: &T,
    response: Result<RawCommandResponse>,
    description: &StreamDescription,
    round_trip: RoundTrip,
) -> Result<T::O> {
    let result = match response {
        Ok(response) => op.handle_response(response, description),
        Err(error) => op.handle_error(error),
    };
    round_trip.finish(&result);
    result
}

fn check_out_error(error: Error) -> Error {
    tracing::debug!(
        target: CONNECTION_TRACING_EVENT_TARGET,
        error = error.tracing_representation(),
        "Connection checkout failed"
    );
    if matches!(
        *error.kind,
        ErrorKind::ConnectionUnavailable { .. } | ErrorKind::Cancelled
    ) {
        return error;
    }
    Error::connection_unavailable(format!("the binding failed to supply a connection: {error}"))
        .with_source(error)
}

fn cancelled(operation: &str, stage: &str) -> Error {
    tracing::debug!(
        target: COMMAND_TRACING_EVENT_TARGET,
        operation,
        stage,
        "Operation cancelled"
    );
    Error::cancelled()
}

/// The log context of a single request/reply exchange.
struct RoundTrip {
    command_name: String,
    server_address: ServerAddress,
    start_time: Instant,
}

impl RoundTrip {
    fn start<T: Operation>(op: &T, request: &Request, description: &StreamDescription) -> Self {
        let server_address = description.server_address.clone();
        tracing::debug!(
            target: COMMAND_TRACING_EVENT_TARGET,
            operation = op.name(),
            command = request.tracing_representation(),
            databaseName = request.target_db(),
            commandName = request.name(),
            serverHost = server_address.host.as_str(),
            serverPort = server_address.port_tracing_representation(),
            "Command started"
        );
        Self {
            command_name: request.name().to_string(),
            server_address,
            start_time: Instant::now(),
        }
    }

    fn finish<O>(self, result: &Result<O>) {
        let duration = self.start_time.elapsed();
        match result {
            Ok(_) => tracing::debug!(
                target: COMMAND_TRACING_EVENT_TARGET,
                commandName = self.command_name.as_str(),
                serverHost = self.server_address.host.as_str(),
                serverPort = self.server_address.port_tracing_representation(),
                durationMS = duration.as_millis(),
                "Command succeeded"
            ),
            Err(error) => tracing::debug!(
                target: COMMAND_TRACING_EVENT_TARGET,
                failure = error.tracing_representation(),
                commandName = self.command_name.as_str(),
                serverHost = self.server_address.host.as_str(),
                serverPort = self.server_address.port_tracing_representation(),
                durationMS = duration.as_millis(),
                "Command failed"
            ),
        }
    }
}
