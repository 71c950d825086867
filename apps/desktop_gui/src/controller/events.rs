//! UI/backend events and error modeling for the dashboard window.

use client_core::{ErrorKind, OperationError};
use shared::protocol::BrandSummary;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    BrandsLoaded(Vec<BrandSummary>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Server,
    Startup,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Brands,
    CommandQueue,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn startup(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Startup,
            context: UiErrorContext::BackendStartup,
            message: message.into(),
        }
    }

    pub fn from_operation(context: UiErrorContext, err: &OperationError) -> Self {
        let category = match err.kind() {
            ErrorKind::Validation => UiErrorCategory::Validation,
            ErrorKind::Transport => UiErrorCategory::Transport,
            ErrorKind::Server => UiErrorCategory::Server,
        };
        let message = match err.status() {
            Some(status) => format!("{err} (HTTP {status})"),
            None => err.to_string(),
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();
        let category = if lower.contains("startup failure") {
            UiErrorCategory::Startup
        } else if lower.contains("disconnected")
            || lower.contains("queue is full")
            || lower.contains("timed out")
            || lower.contains("connection")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category == UiErrorCategory::Startup
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
#[path = "../tests/events_tests.rs"]
mod tests;
