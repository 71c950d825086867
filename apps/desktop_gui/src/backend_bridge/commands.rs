//! Backend commands queued from UI to backend worker.

use shared::domain::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Starts `operation` for the store at `url`. An empty url is still sent so
    /// the rejection lands in dashboard state next to its control.
    Trigger { operation: Operation, url: String },
    ListBrands,
}
