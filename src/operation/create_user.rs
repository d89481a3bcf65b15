mod command;
mod legacy;
pub(crate) mod options;


use crate::{
    auth::Credential,
    cmap::{RawCommandResponse, Request, StreamDescription},
    error::{Error, Result},
    operation::{supports_command_interface, OperationWithDefaults},
    trace::{TracingRepresentation, COMMAND_TRACING_EVENT_TARGET},
};

use self::{
    command::{CommandAck, CreateUserCommand},
    legacy::{LegacyUserInsert, WriteAck},
    options::CreateUserOptions,
};

/// A single invocation of user creation. The strategy is chosen when the request is built, from
/// the description of the connection it will be sent on.
#[derive(Debug)]
pub(crate) struct CreateUser<'a> {
    credential: &'a Credential,
    read_only: bool,
    options: Option<&'a CreateUserOptions>,
    strategy: Option<Strategy<'a>>,
}

#[derive(Debug)]
enum Strategy<'a> {
    Command(CreateUserCommand<'a>),
    Legacy(LegacyUserInsert<'a>),
}

impl Strategy<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::Command(_) => "createUser command",
            Self::Legacy(_) => "system.users insert",
        }
    }
}

/// The acknowledgment produced by whichever strategy ran.
#[derive(Debug)]
pub(crate) enum UserWriteAck {
    Command(CommandAck),
    Legacy(WriteAck),
}

impl<'a> CreateUser<'a> {
    pub(crate) fn new(
        credential: &'a Credential,
        read_only: bool,
        options: Option<&'a CreateUserOptions>,
    ) -> Self {
        Self {
            credential,
            read_only,
            options,
            strategy: None,
        }
    }
}

impl OperationWithDefaults for CreateUser<'_> {
    type O = ();

    const NAME: &'static str = "createUser";

    fn build(&mut self, description: &StreamDescription) -> Result<Request> {
        let strategy = if supports_command_interface(description) {
            Strategy::Command(CreateUserCommand::new(
                self.credential,
                self.read_only,
                self.options,
            ))
        } else {
            Strategy::Legacy(LegacyUserInsert::new(self.credential, self.read_only))
        };

        tracing::debug!(
            target: COMMAND_TRACING_EVENT_TARGET,
            strategy = strategy.name(),
            maxWireVersion = description.max_wire_version,
            databaseName = self.credential.source_str(),
            serverHost = description.server_address.host.as_str(),
            serverPort = description.server_address.port_tracing_representation(),
            "Selected user creation strategy"
        );

        let request = match strategy {
            Strategy::Command(ref command) => Request::Command(command.build()?),
            Strategy::Legacy(ref legacy) => Request::Insert(legacy.build(description)?),
        };
        self.strategy = Some(strategy);
        Ok(request)
    }

    fn handle_response(
        &self,
        response: RawCommandResponse,
        _description: &StreamDescription,
    ) -> Result<Self::O> {
        let ack = match self.strategy {
            Some(Strategy::Command(ref command)) => {
                UserWriteAck::Command(command.handle_response(response)?)
            }
            Some(Strategy::Legacy(ref legacy)) => {
                UserWriteAck::Legacy(legacy.handle_response(response)?)
            }
            None => {
                return Err(Error::internal(
                    "createUser response handled before a request was built",
                ))
            }
        };
        normalize(ack);
        Ok(())
    }
}

/// Reduces either strategy's acknowledgment to the operation's result. The acknowledgment
/// carries nothing the caller needs once the write has been accepted.
pub(crate) fn normalize(ack: UserWriteAck) {
    match ack {
        UserWriteAck::Command(CommandAck { reply }) => tracing::trace!(
            target: COMMAND_TRACING_EVENT_TARGET,
            reply = reply.tracing_representation(),
            "User created"
        ),
        UserWriteAck::Legacy(WriteAck { n }) => tracing::trace!(
            target: COMMAND_TRACING_EVENT_TARGET,
            n,
            "User document inserted"
        ),
    }
}
