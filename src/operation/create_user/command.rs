use serde::Deserialize;

use crate::{
    auth::Credential,
    bson::{rawbson, rawdoc, Bson, Document},
    bson_util,
    cmap::{Command, RawCommandResponse},
    error::{CommandError, Error, ErrorKind, Result, UNKNOWN_ERROR_CODE},
    operation::{
        append_options_to_raw_document,
        CommandErrorBody,
        CommandResponse,
        WriteConcernOnlyBody,
    },
};

use super::options::CreateUserOptions;

/// Creates the user with the `createUser` command.
#[derive(Debug)]
pub(super) struct CreateUserCommand<'a> {
    credential: &'a Credential,
    read_only: bool,
    options: Option<&'a CreateUserOptions>,
}

/// The error fields of a failed reply, read without requiring any of them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialCommandError {
    code: Option<Bson>,

    code_name: Option<String>,

    errmsg: Option<String>,

    error_labels: Option<Vec<String>>,
}

impl From<PartialCommandError> for Error {
    fn from(body: PartialCommandError) -> Self {
        let code = body
            .code
            .as_ref()
            .and_then(bson_util::get_int)
            .and_then(|code| i32::try_from(code).ok())
            .unwrap_or(UNKNOWN_ERROR_CODE);
        Error::new(
            ErrorKind::Command(CommandError {
                code,
                code_name: body.code_name.unwrap_or_default(),
                message: body.errmsg.unwrap_or_default(),
            }),
            body.error_labels,
        )
    }
}

/// The server's reply to `createUser`, without its `ok` field.
#[derive(Debug)]
pub(crate) struct CommandAck {
    pub(super) reply: Document,
}

impl<'a> CreateUserCommand<'a> {
    const NAME: &'static str = "createUser";

    pub(super) fn new(
        credential: &'a Credential,
        read_only: bool,
        options: Option<&'a CreateUserOptions>,
    ) -> Self {
        Self {
            credential,
            read_only,
            options,
        }
    }

    pub(super) fn build(&self) -> Result<Command> {
        let mut body = rawdoc! {
            Self::NAME: self.credential.username_str(),
        };
        if let Some(digest) = self.credential.password_digest() {
            body.append("pwd", digest);
            body.append("digestPassword", false);
        }
        body.append(
            "roles",
            rawbson!([self.credential.role_name(self.read_only)]),
        );
        append_options_to_raw_document(&mut body, self.options)?;

        Ok(Command::new(
            Self::NAME,
            self.credential.source_str(),
            body,
        ))
    }

    pub(super) fn handle_response(&self, response: RawCommandResponse) -> Result<CommandAck> {
        let reply: CommandResponse<Document> = response.body()?;
        if !reply.is_success() {
            return Err(match response.body::<CommandErrorBody>() {
                Ok(command_error) => command_error.into(),
                Err(_) => response.body::<PartialCommandError>()?.into(),
            });
        }

        let write_concern: WriteConcernOnlyBody = response.body()?;
        write_concern.validate()?;

        Ok(CommandAck { reply: reply.body })
    }
}
