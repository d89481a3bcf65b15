use serde::Deserialize;

use crate::{
    auth::Credential,
    bson::{oid::ObjectId, rawdoc, Bson},
    bson_util,
    cmap::{LegacyInsert, RawCommandResponse, StreamDescription},
    error::{
        Error,
        ErrorKind,
        Result,
        WriteConcernError,
        WriteError,
        WriteFailure,
        UNKNOWN_ERROR_CODE,
    },
    operation::CommandResponse,
    options::WriteConcern,
    Namespace,
};

const WRITE_CONCERN_FAILED_CODE: i32 = 64;

/// Creates the user by inserting its document into `<source>.system.users`, for servers that
/// predate the user management commands.
#[derive(Debug)]
pub(super) struct LegacyUserInsert<'a> {
    credential: &'a Credential,
    read_only: bool,
}

/// What the server acknowledged through `getLastError`.
#[derive(Debug)]
pub(crate) struct WriteAck {
    pub(super) n: i64,
}

/// The reply to `getLastError`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetLastErrorBody {
    n: Option<Bson>,

    err: Option<String>,

    code: Option<i32>,

    code_name: Option<String>,

    errmsg: Option<String>,

    wtimeout: Option<bool>,

    wnote: Option<String>,

    jnote: Option<String>,
}

impl GetLastErrorBody {
    fn validate(&self) -> Result<()> {
        if self.wtimeout == Some(true) || self.wnote.is_some() || self.jnote.is_some() {
            let message = self
                .err
                .clone()
                .or_else(|| self.wnote.clone())
                .or_else(|| self.jnote.clone())
                .unwrap_or_default();
            return Err(ErrorKind::Write(WriteFailure::WriteConcernError(WriteConcernError {
                code: self.code.unwrap_or(WRITE_CONCERN_FAILED_CODE),
                code_name: self.code_name.clone().unwrap_or_default(),
                message,
                details: None,
            }))
            .into());
        }

        if self.err.is_some() || self.code.is_some() {
            return Err(self.write_error());
        }

        Ok(())
    }

    fn write_error(&self) -> Error {
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: self.code.unwrap_or(UNKNOWN_ERROR_CODE),
            code_name: self.code_name.clone(),
            message: self
                .err
                .clone()
                .or_else(|| self.errmsg.clone())
                .unwrap_or_default(),
        }))
        .into()
    }
}

impl<'a> LegacyUserInsert<'a> {
    pub(super) fn new(credential: &'a Credential, read_only: bool) -> Self {
        Self {
            credential,
            read_only,
        }
    }

    pub(super) fn build(&self, description: &StreamDescription) -> Result<LegacyInsert> {
        let mut document = rawdoc! {
            "_id": ObjectId::new(),
            "user": self.credential.username_str(),
        };
        if let Some(digest) = self.credential.password_digest() {
            document.append("pwd", digest);
        }
        document.append("readOnly", self.read_only);

        let ns = Namespace::system_users(self.credential.source_str());
        let size = i64::try_from(document.as_bytes().len()).unwrap_or(i64::MAX);
        if size > description.max_bson_object_size {
            return Err(ErrorKind::InvalidArgument {
                message: format!(
                    "user document for {ns} is {size} bytes, which exceeds the server's limit of \
                     {} bytes",
                    description.max_bson_object_size
                ),
            }
            .into());
        }

        Ok(LegacyInsert::new(
            ns,
            vec![document],
            WriteConcern::acknowledged(),
        ))
    }

    pub(super) fn handle_response(&self, response: RawCommandResponse) -> Result<WriteAck> {
        let reply: CommandResponse<GetLastErrorBody> = response.body()?;
        if !reply.is_success() {
            return Err(reply.body.write_error());
        }
        reply.body.validate()?;

        let n = reply
            .body
            .n
            .as_ref()
            .and_then(bson_util::get_int)
            .unwrap_or(0);
        Ok(WriteAck { n })
    }
}
