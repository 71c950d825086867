//! Bridge between the egui thread and the backend worker that owns the tokio runtime.

pub mod commands;
pub mod runtime;
