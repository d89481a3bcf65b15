mod command;
mod stream_description;
mod wire;

use futures_util::future::BoxFuture;

use crate::error::Result;

pub use self::{
    command::{Command, RawCommandResponse},
    stream_description::StreamDescription,
    wire::{LegacyInsert, Request},
};

/// A handshaked connection to a server that can be used from blocking code.
///
/// `send_request` performs exactly one round trip. For a [`Request::Insert`], the round trip is
/// the insert message followed by the command returned from [`LegacyInsert::get_last_error`], and
/// the response is the reply to that command.
pub trait Connection: Send {
    /// The description of the server this connection was handshaked with.
    fn stream_description(&self) -> Result<&StreamDescription>;

    /// Sends the request to the server and waits for its reply.
    fn send_request(&mut self, request: Request) -> Result<RawCommandResponse>;
}

/// A handshaked connection to a server that can be used from asynchronous code.
///
/// This has the same contract as [`Connection`], except that the round trip happens in the
/// returned future. Dropping that future before it completes abandons the round trip.
pub trait AsyncConnection: Send {
    /// The description of the server this connection was handshaked with.
    fn stream_description(&self) -> Result<&StreamDescription>;

    /// Sends the request to the server, resolving to its reply.
    fn send_request(&mut self, request: Request) -> BoxFuture<'_, Result<RawCommandResponse>>;
}
