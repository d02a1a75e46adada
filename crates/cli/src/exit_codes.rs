//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Scripts driving `mafm` rely on them.
//!
//! | Code | Meaning                                                  |
//! |------|----------------------------------------------------------|
//! | 0    | Success, every input processed                           |
//! | 1    | General error (unspecified)                              |
//! | 2    | Usage error (bad arguments, missing input folder)        |
//! | 3    | Roster has no usable login:password line                 |
//! | 4    | Run completed but some maFiles were skipped or failed    |
//! | 5    | I/O error (roster unreadable, output folder not creatable) |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required inputs.
pub const EXIT_USAGE: u8 = 2;

/// The roster decoded under no candidate encoding to a non-empty entry list.
pub const EXIT_ROSTER_EMPTY: u8 = 3;

/// The run finished but the report lists per-file failures or skips.
pub const EXIT_PARTIAL: u8 = 4;

/// Filesystem error outside a single maFile.
pub const EXIT_IO: u8 = 5;

use mafile_recon::ReconError;

/// Map a run-level engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::RosterEmpty => EXIT_ROSTER_EMPTY,
        ReconError::OutputDir { .. } => EXIT_IO,
        ReconError::WorkerPanicked => EXIT_ERROR,
    }
}
