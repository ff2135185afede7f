use async_trait::async_trait;
use serde_json::Value;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
        message: String,
    },
    // request failed boundary validation, one message per offending field
    InvalidInput {
        errors: Vec<String>,
    },
    InvalidArgument {
        message: String,
    },
    NotFound {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    Serialization {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

impl CommandError {
    pub fn invalid_input(errors: Vec<String>) -> CommandError {
        CommandError::InvalidInput { errors }
    }

    pub fn not_found(message: &str) -> CommandError {
        CommandError::NotFound { message: message.to_string() }
    }

    // user-facing messages carried by the error
    pub fn messages(&self) -> Vec<String> {
        match self {
            CommandError::InvalidInput { errors } => errors.clone(),
            CommandError::Database { message, .. } => vec![message.to_string()],
            CommandError::DuplicateKey { message } => vec![message.to_string()],
            CommandError::InvalidArgument { message } => vec![message.to_string()],
            CommandError::NotFound { message } => vec![message.to_string()],
            CommandError::Runtime { message, .. } => vec![message.to_string()],
            CommandError::Serialization { message } => vec![message.to_string()],
            CommandError::Validation { message, .. } => vec![message.to_string()],
        }
    }
}

// reads optional string fields of a JSON object body, one message per field of the wrong type
pub(crate) fn string_fields<const N: usize>(json: &Value, names: [&str; N]) -> Result<[Option<String>; N], CommandError> {
    let object = json.as_object()
        .ok_or_else(|| CommandError::invalid_input(vec!["request body must be a JSON object".to_string()]))?;
    let mut errors = vec![];
    let values = names.map(|name| match object.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.to_string()),
        Some(_) => {
            errors.push(format!("{} must be a string", name));
            None
        }
    });
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(CommandError::invalid_input(errors))
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            LibraryError::InvalidArgument { message } => {
                CommandError::InvalidArgument { message }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: false }
            }
        }
    }
}
