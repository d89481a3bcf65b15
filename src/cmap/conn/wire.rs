use crate::{
    bson::{rawdoc, Document, RawDocumentBuf},
    bson_util,
    error::Result,
    options::WriteConcern,
    trace::TracingRepresentation,
    Namespace,
};

use super::Command;

/// What a connection is asked to put on the wire for a single round trip.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Request {
    /// A command, sent as a single command message.
    Command(Command),

    /// A legacy insert message followed by the acknowledgment command it requests.
    Insert(LegacyInsert),
}

impl Request {
    /// The name to report for this request in logs.
    pub fn name(&self) -> &str {
        match self {
            Self::Command(command) => &command.name,
            Self::Insert(_) => "insert",
        }
    }

    /// The database this request writes to or runs against.
    pub fn target_db(&self) -> &str {
        match self {
            Self::Command(command) => &command.target_db,
            Self::Insert(insert) => &insert.ns.db,
        }
    }
}

impl TracingRepresentation for Request {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        match self {
            Self::Command(command) => command.tracing_representation(),
            // Inserted documents are never logged.
            Self::Insert(_) => Document::new().tracing_representation(),
        }
    }
}

/// An insert sent with the legacy insert opcode, for servers that predate write commands.
///
/// The insert message itself has no reply. Its outcome is read from the reply to the command
/// returned by [`LegacyInsert::get_last_error`], which the connection must send on the same
/// socket right after the insert.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct LegacyInsert {
    /// The collection the documents are inserted into.
    pub ns: Namespace,

    /// The documents to insert.
    pub documents: Vec<RawDocumentBuf>,

    /// The acknowledgment requested through `getLastError`.
    pub write_concern: WriteConcern,
}

impl LegacyInsert {
    pub(crate) fn new(
        ns: Namespace,
        documents: Vec<RawDocumentBuf>,
        write_concern: WriteConcern,
    ) -> Self {
        Self {
            ns,
            documents,
            write_concern,
        }
    }

    /// The `getLastError` command that acknowledges this insert, e.g.
    /// `{ getLastError: 1, w: 1 }` against the database of the target namespace.
    pub fn get_last_error(&self) -> Result<Command> {
        let mut body = rawdoc! { "getLastError": 1 };
        let write_concern = crate::bson::to_raw_document_buf(&self.write_concern)?;
        bson_util::extend_raw_document_buf(&mut body, write_concern)?;
        Ok(Command::new("getLastError", self.ns.db.clone(), body))
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::{
        bson::rawdoc,
        options::{Acknowledgment, WriteConcern},
        Namespace,
    };

    use super::LegacyInsert;

    #[test]
    fn get_last_error_carries_write_concern() {
        let insert = LegacyInsert::new(
            Namespace::system_users("shop"),
            vec![rawdoc! { "user": "alice" }],
            WriteConcern::acknowledged(),
        );
        let command = insert.get_last_error().unwrap();
        assert_eq!(command.name, "getLastError");
        assert_eq!(command.target_db, "shop");
        assert_eq!(command.body, rawdoc! { "getLastError": 1, "w": 1 });

        let insert = LegacyInsert::new(
            Namespace::system_users("admin"),
            Vec::new(),
            WriteConcern::builder()
                .w(Acknowledgment::Majority)
                .journal(true)
                .build(),
        );
        let command = insert.get_last_error().unwrap();
        assert_eq!(
            command.body,
            rawdoc! { "getLastError": 1, "w": "majority", "j": true }
        );
    }
}
