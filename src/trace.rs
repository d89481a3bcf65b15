use crate::bson::{Bson, Document};

pub(crate) const COMMAND_TRACING_EVENT_TARGET: &str = "mongodb_user_admin::command";
pub(crate) const CONNECTION_TRACING_EVENT_TARGET: &str = "mongodb_user_admin::connection";

pub(crate) trait TracingRepresentation {
    type Representation;

    fn tracing_representation(&self) -> Self::Representation;
}

impl TracingRepresentation for Document {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        Bson::Document(self.clone())
            .into_relaxed_extjson()
            .to_string()
    }
}

impl TracingRepresentation for crate::error::Error {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        self.to_string()
    }
}
