use serde::Deserialize;

use crate::{bson::RawDocument, error::Result, options::ServerAddress};

const DEFAULT_MAX_BSON_OBJECT_SIZE: i64 = 16 * 1024 * 1024;

/// Contains information about a given server in a format digestible by a connection.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct StreamDescription {
    /// The address of the server.
    pub server_address: ServerAddress,

    /// The highest wire version that the server understands. Servers older than 2.6 do not
    /// report one.
    pub max_wire_version: Option<i32>,

    /// The maximum permitted size of a BSON object in bytes. Legacy user documents are checked
    /// against it before they are sent.
    pub max_bson_object_size: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HelloFields {
    max_wire_version: Option<i32>,
    max_bson_object_size: Option<i64>,
}

impl StreamDescription {
    /// Constructs a description of a server at `server_address` reporting the given maximum wire
    /// version, with the default BSON object size limit.
    pub fn new(server_address: ServerAddress, max_wire_version: Option<i32>) -> Self {
        Self {
            server_address,
            max_wire_version,
            max_bson_object_size: DEFAULT_MAX_BSON_OBJECT_SIZE,
        }
    }

    /// Constructs a description from the reply to the handshake (`hello` or legacy `ismaster`)
    /// sent on a connection to the server at `server_address`.
    pub fn from_hello_reply(server_address: ServerAddress, reply: &RawDocument) -> Result<Self> {
        let fields: HelloFields = crate::bson::from_slice(reply.as_bytes())?;
        Ok(Self {
            server_address,
            max_wire_version: fields.max_wire_version,
            max_bson_object_size: fields
                .max_bson_object_size
                .unwrap_or(DEFAULT_MAX_BSON_OBJECT_SIZE),
        })
    }

    /// Gets a description of a stream for a 4.2 connection.
    #[cfg(test)]
    pub(crate) fn new_testing() -> Self {
        Self::with_wire_version(Some(8))
    }

    /// Gets a description of a stream for a connection to a server with the provided
    /// maxWireVersion.
    #[cfg(test)]
    pub(crate) fn with_wire_version(max_wire_version: Option<i32>) -> Self {
        Self::new(ServerAddress::default(), max_wire_version)
    }
}
