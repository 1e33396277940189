use async_trait::async_trait;
use crate::core::sharing::SharingError;

#[derive(Debug, PartialEq)]
pub enum CommandError {
    Access {
        message: String,
        reason_code: Option<String>,
    },
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    DuplicateKey {
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
    State {
        message: String,
    },
}

impl CommandError {
    pub fn message(&self) -> &str {
        match self {
            CommandError::Access { message, .. } => message,
            CommandError::Database { message, .. } => message,
            CommandError::DuplicateKey { message } => message,
            CommandError::NotFound { message } => message,
            CommandError::Runtime { message, .. } => message,
            CommandError::Serialization { message } => message,
            CommandError::Validation { message, .. } => message,
            CommandError::State { message } => message,
        }
    }
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<SharingError> for CommandError {
    fn from(other: SharingError) -> Self {
        match other {
            SharingError::Database { message, reason_code, retryable } => {
                CommandError::Database { message, reason_code, retryable }
            }
            SharingError::AccessDenied { message, reason_code } => {
                CommandError::Access { message, reason_code }
            }
            SharingError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            SharingError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            SharingError::CurrentlyUnavailable { message, reason_code, retryable } => {
                CommandError::Runtime { message, reason_code, retryable }
            }
            SharingError::InvalidArgument { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            SharingError::IllegalState { message } => {
                CommandError::State { message }
            }
            SharingError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            SharingError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code, retryable: true }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::CommandError;
    use crate::core::sharing::SharingError;

    #[tokio::test]
    async fn test_should_map_sharing_errors() {
        assert!(matches!(CommandError::from(SharingError::not_found("booking")), CommandError::NotFound { .. }));
        assert!(matches!(CommandError::from(SharingError::invalid_argument("unknown state")), CommandError::Validation { .. }));
        assert!(matches!(CommandError::from(SharingError::illegal_state("approved")), CommandError::State { .. }));
        assert!(matches!(CommandError::from(SharingError::duplicate_key("email")), CommandError::DuplicateKey { .. }));
        assert!(matches!(CommandError::from(SharingError::unavailable("ddb", None, true)), CommandError::Runtime { retryable: true, .. }));
    }

    #[tokio::test]
    async fn test_should_keep_message() {
        let err = CommandError::from(SharingError::invalid_argument("item not available"));
        assert_eq!("item not available", err.message());
    }
}
