//! Contains the traits through which operations borrow connections and talk to a server.
//!
//! This crate does not pool, establish, or authenticate connections. A caller plugs its own pool
//! in by implementing [`WriteBinding`] and/or [`AsyncWriteBinding`] for it, and [`Connection`]
//! and/or [`AsyncConnection`] for the connections it hands out.

mod binding;
mod conn;

pub(crate) use self::binding::CheckedOutConnection;
pub use self::{
    binding::{AsyncWriteBinding, Binding, CheckInState, WriteBinding},
    conn::{
        AsyncConnection,
        Command,
        Connection,
        LegacyInsert,
        RawCommandResponse,
        Request,
        StreamDescription,
    },
};
