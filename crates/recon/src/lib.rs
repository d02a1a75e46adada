//! `mafile-recon`: maFile to login:password reconciliation engine.
//!
//! Receives maFile inputs and raw roster bytes, pairs them up and writes the
//! ASF credential bundles. No CLI dependencies.

pub mod artifacts;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod model;
pub mod record;
pub mod roster;
pub mod variants;
pub mod worker;

pub use artifacts::AsfTemplate;
pub use engine::{run, CancelToken, ReconOptions, DEFAULT_OUTPUT_DIR};
pub use error::ReconError;
pub use model::{
    Assignment, FailureReason, MaFileInput, MatchResult, ReconReport, ReconRequest, RecordFailure,
    RunEvent,
};
pub use roster::{parse_roster, ParsedRoster, Roster};
pub use variants::{is_mafile_name, strip_mafile_extension, variants};
pub use worker::{spawn, RunHandle};
