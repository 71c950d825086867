use shared::domain::Operation;
use thiserror::Error;

/// Terminal failure of a single trigger invocation.
///
/// The `Display` text is what the dashboard shows next to the control that
/// triggered the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Transport(String),
    #[error("{detail}")]
    Server { status: u16, detail: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Server,
}

impl OperationError {
    pub fn missing_url(operation: Operation) -> Self {
        let message = match operation {
            Operation::Analysis => "Please enter a Shopify store URL",
            Operation::Competitors => "Please enter a URL first",
        };
        Self::Validation(message.to_string())
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Server { .. } => ErrorKind::Server,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}
