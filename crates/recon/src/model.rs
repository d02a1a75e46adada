use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One login:password line of the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialEntry {
    pub login: String,
    pub password: String,
}

/// Where a maFile's JSON text comes from.
#[derive(Debug, Clone)]
pub enum MaFileSource {
    Path(PathBuf),
    Content(String),
}

/// A maFile handed to the engine, before it is parsed.
#[derive(Debug, Clone)]
pub struct MaFileInput {
    pub filename: String,
    pub source: MaFileSource,
}

impl MaFileInput {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            filename,
            source: MaFileSource::Path(path),
        }
    }

    pub fn from_content(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: MaFileSource::Content(content.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            MaFileSource::Path(p) => Some(p),
            MaFileSource::Content(_) => None,
        }
    }

    /// Read the JSON text. Paths are read as UTF-8.
    pub fn read_text(&self) -> std::io::Result<Cow<'_, str>> {
        match &self.source {
            MaFileSource::Path(p) => std::fs::read_to_string(p).map(Cow::Owned),
            MaFileSource::Content(c) => Ok(Cow::Borrowed(c)),
        }
    }
}

/// Everything one reconciliation run needs.
#[derive(Debug, Clone, Default)]
pub struct ReconRequest {
    pub mafiles: Vec<MaFileInput>,
    /// Raw roster bytes; the encoding is detected by the parser.
    pub roster: Vec<u8>,
    /// Overrides [`crate::ReconOptions::output_dir`] when set.
    pub output_dir: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// A filename/identifier variant equals the login.
    Exact,
    /// Login and identifier (or filename) contain one another, ignoring case.
    Substring,
    /// Handed the next leftover login after matching gave up.
    AutoAssigned,
}

impl Assignment {
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::AutoAssigned)
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "matched (exact)"),
            Self::Substring => write!(f, "matched (substring)"),
            Self::AutoAssigned => write!(f, "auto-assigned"),
        }
    }
}

/// A maFile paired with a roster login, with both artifacts written.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub filename: String,
    pub identifier: String,
    pub login: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub assignment: Assignment,
    pub mafile_path: PathBuf,
    pub config_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    /// File unreadable or not a JSON object.
    Read(String),
    /// One of the two artifacts could not be written.
    Write(String),
    /// Fallback pass ran out of leftover logins.
    InsufficientLogins,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "read error: {msg}"),
            Self::Write(msg) => write!(f, "write error: {msg}"),
            Self::InsufficientLogins => write!(f, "insufficient logins"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub filename: String,
    pub reason: FailureReason,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub roster_entries: usize,
    pub roster_encoding: &'static str,
}

/// Final tally of a run.
#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub success_count: usize,
    /// Number of maFile inputs, including unreadable ones.
    pub total: usize,
    pub failures: Vec<RecordFailure>,
    pub matches: Vec<MatchResult>,
    pub output_dir: PathBuf,
    pub cancelled: bool,
}

impl ReconReport {
    pub fn auto_assigned(&self) -> usize {
        self.matches.iter().filter(|m| m.assignment.is_auto()).count()
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Ordered notifications emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    RosterLoaded { entries: usize, encoding: &'static str },
    ReadFailed { filename: String, message: String },
    Matched { filename: String, login: String, assignment: Assignment },
    WriteFailed { filename: String, message: String },
    FallbackStarted { remaining: usize, leftover: usize },
    InsufficientLogins { filename: String },
    /// `percent` is always within 0..=100.
    Progress { percent: u8, label: String },
    Cancelled { completed: usize },
    Finished { success: usize, total: usize },
}
