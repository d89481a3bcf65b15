use std::{collections::HashSet, sync::LazyLock};

use serde::de::DeserializeOwned;

use crate::{
    bson::{Document, RawDocument, RawDocumentBuf},
    error::{Error, ErrorKind, Result},
    options::ServerAddress,
    trace::TracingRepresentation,
};

/// Commands whose bodies carry credentials and must never be logged.
pub(crate) static REDACTED_COMMANDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut hash_set = HashSet::new();
    hash_set.insert("authenticate");
    hash_set.insert("saslstart");
    hash_set.insert("saslcontinue");
    hash_set.insert("getnonce");
    hash_set.insert("createuser");
    hash_set.insert("updateuser");
    hash_set
});

/// A server command containing all the information necessary to serialize it to a wire message.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Command {
    /// The name of the command, which is also the first key of `body`.
    pub name: String,

    /// The database the command runs against.
    pub target_db: String,

    /// The full command document.
    pub body: RawDocumentBuf,
}

impl Command {
    /// Constructs a new command.
    pub fn new(name: impl Into<String>, target_db: impl Into<String>, body: RawDocumentBuf) -> Self {
        Self {
            name: name.into(),
            target_db: target_db.into(),
            body,
        }
    }

    /// Whether the body of this command must be kept out of logs and monitoring output.
    pub fn should_redact(&self) -> bool {
        let name = self.name.to_lowercase();
        REDACTED_COMMANDS.contains(name.as_str())
    }
}

impl TracingRepresentation for Command {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        if self.should_redact() {
            return Document::new().tracing_representation();
        }
        match self.body.to_document() {
            Ok(document) => document.tracing_representation(),
            Err(_) => Document::new().tracing_representation(),
        }
    }
}

/// The reply a server sent to a single request.
#[derive(Debug, Clone)]
pub struct RawCommandResponse {
    source: ServerAddress,
    raw: RawDocumentBuf,
}

impl RawCommandResponse {
    /// Wraps the raw reply document received from the server at `source`.
    pub fn new(source: ServerAddress, raw: RawDocumentBuf) -> Self {
        Self { source, raw }
    }

    /// Serializes `document` and wraps it as the reply received from the server at `source`.
    pub fn with_document(source: ServerAddress, document: &Document) -> Result<Self> {
        let mut raw = Vec::new();
        document.to_writer(&mut raw)?;
        Ok(Self {
            source,
            raw: RawDocumentBuf::from_bytes(raw)?,
        })
    }

    pub(crate) fn body<T: DeserializeOwned>(&self) -> Result<T> {
        crate::bson::from_slice(self.raw.as_bytes()).map_err(|e| {
            Error::from(ErrorKind::InvalidResponse {
                message: format!("{e}"),
            })
        })
    }

    /// The raw reply document.
    pub fn raw_body(&self) -> &RawDocument {
        &self.raw
    }

    /// The address of the server that sent this response.
    pub fn source_address(&self) -> &ServerAddress {
        &self.source
    }

    /// Consumes the response, returning the raw reply document.
    pub fn into_raw_document_buf(self) -> RawDocumentBuf {
        self.raw
    }
}
