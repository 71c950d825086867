//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::domain::Operation;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext};

pub fn command_name(cmd: &BackendCommand) -> &'static str {
    match cmd {
        BackendCommand::Trigger {
            operation: Operation::Analysis,
            ..
        } => "analyze_store",
        BackendCommand::Trigger {
            operation: Operation::Competitors,
            ..
        } => "find_competitors",
        BackendCommand::ListBrands => "list_brands",
    }
}

/// Queues `cmd` without blocking the UI thread. Returns the error to surface
/// when the queue is full or the worker is gone.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), UiError> {
    let cmd_name = command_name(&cmd);
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => Err(UiError::from_message(
            UiErrorContext::CommandQueue,
            "UI command queue is full; please retry",
        )),
        Err(TrySendError::Disconnected(_)) => Err(UiError::from_message(
            UiErrorContext::CommandQueue,
            "Backend command processor disconnected (possible startup/runtime failure); restart the app",
        )),
    }
}

#[cfg(test)]
#[path = "../tests/orchestration_tests.rs"]
mod tests;
