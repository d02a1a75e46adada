use std::fmt;

/// Run-level failures. Anything that goes wrong for a single maFile is a
/// [`crate::model::FailureReason`] in the report instead.
#[derive(Debug)]
pub enum ReconError {
    /// No login:password entry could be parsed under any candidate encoding.
    RosterEmpty,
    /// Output directory could not be created.
    OutputDir { path: String, message: String },
    /// The worker thread panicked before producing a report.
    WorkerPanicked,
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosterEmpty => write!(f, "no valid login:password entries found in roster"),
            Self::OutputDir { path, message } => {
                write!(f, "cannot create output directory '{path}': {message}")
            }
            Self::WorkerPanicked => write!(f, "reconciliation worker panicked"),
        }
    }
}

impl std::error::Error for ReconError {}
