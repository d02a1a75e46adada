use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::artifacts::{write_artifacts, AsfTemplate};
use crate::error::ReconError;
use crate::matcher::find_best_match;
use crate::model::{
    Assignment, FailureReason, MatchResult, ReconMeta, ReconReport, ReconRequest, RecordFailure,
    RunEvent,
};
use crate::record::MaFileRecord;
use crate::roster::{parse_roster, LoginPool};

/// Output directory used when neither the request nor the options name one.
pub const DEFAULT_OUTPUT_DIR: &str = "ASFmaFiles";

/// Share of the progress bar covered by the primary match pass.
const PRIMARY_SHARE: usize = 60;
const FALLBACK_SHARE: usize = 40;

#[derive(Debug, Clone)]
pub struct ReconOptions {
    pub template: AsfTemplate,
    pub output_dir: PathBuf,
}

impl Default for ReconOptions {
    fn default() -> Self {
        Self {
            template: AsfTemplate::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Cooperative cancellation flag, checked between records.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// `floor(done * share / max(1, total))`, offset by `base`.
pub fn progress(base: usize, share: usize, done: usize, total: usize) -> u8 {
    let pct = base + done * share / total.max(1);
    pct.min(100) as u8
}

/// Run one reconciliation.
///
/// The roster is parsed before anything touches the filesystem: an empty
/// roster fails the whole run. Every other problem is recorded per maFile in
/// the returned report.
pub fn run<F>(
    options: &ReconOptions,
    request: &ReconRequest,
    cancel: &CancelToken,
    mut emit: F,
) -> Result<ReconReport, ReconError>
where
    F: FnMut(RunEvent),
{
    let parsed = parse_roster(&request.roster)?;
    log::info!(
        "loaded {} roster entries ({})",
        parsed.roster.len(),
        parsed.encoding
    );
    emit(RunEvent::RosterLoaded {
        entries: parsed.roster.len(),
        encoding: parsed.encoding,
    });

    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| options.output_dir.clone());
    fs::create_dir_all(&output_dir).map_err(|e| ReconError::OutputDir {
        path: output_dir.display().to_string(),
        message: e.to_string(),
    })?;

    let mut state = RunState {
        output_dir: &output_dir,
        template: &options.template,
        pool: LoginPool::new(&parsed.roster),
        matches: Vec::new(),
        failures: Vec::new(),
        emit: &mut emit,
    };

    let total = request.mafiles.len();
    let records = state.load(request);
    let finished = state
        .primary_pass(records, total, cancel)
        .and_then(|deferred| state.fallback_pass(deferred, cancel));

    let RunState {
        matches, failures, ..
    } = state;

    let cancelled = finished.is_none();
    if cancelled {
        let completed = matches.len() + failures.len();
        log::warn!("run cancelled after {completed} record(s)");
        emit(RunEvent::Cancelled { completed });
    } else {
        emit(RunEvent::Progress {
            percent: 100,
            label: "done".into(),
        });
        log::info!("reconciliation finished: {}/{} succeeded", matches.len(), total);
        emit(RunEvent::Finished {
            success: matches.len(),
            total,
        });
    }

    Ok(ReconReport {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            roster_entries: parsed.roster.len(),
            roster_encoding: parsed.encoding,
        },
        success_count: matches.len(),
        total,
        failures,
        matches,
        output_dir,
        cancelled,
    })
}

struct RunState<'a, F: FnMut(RunEvent)> {
    output_dir: &'a Path,
    template: &'a AsfTemplate,
    pool: LoginPool<'a>,
    matches: Vec<MatchResult>,
    failures: Vec<RecordFailure>,
    emit: &'a mut F,
}

impl<'a, F: FnMut(RunEvent)> RunState<'a, F> {
    fn load(&mut self, request: &ReconRequest) -> Vec<MaFileRecord> {
        let mut records = Vec::with_capacity(request.mafiles.len());
        for input in &request.mafiles {
            match MaFileRecord::load(input) {
                Ok(record) => records.push(record),
                Err(message) => {
                    log::warn!("cannot read {}: {message}", input.filename);
                    (self.emit)(RunEvent::ReadFailed {
                        filename: input.filename.clone(),
                        message: message.clone(),
                    });
                    self.failures.push(RecordFailure {
                        filename: input.filename.clone(),
                        reason: FailureReason::Read(message),
                    });
                }
            }
        }
        records
    }

    /// Returns the records nothing matched, or `None` when cancelled.
    fn primary_pass(
        &mut self,
        records: Vec<MaFileRecord>,
        total: usize,
        cancel: &CancelToken,
    ) -> Option<Vec<MaFileRecord>> {
        let mut deferred = Vec::new();
        for (i, record) in records.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return None;
            }
            match find_best_match(&record.identifier, &record.filename, &self.pool) {
                Some(hit) => {
                    self.commit(&record, hit.index, hit.kind.into());
                }
                None => {
                    log::debug!("no match for {} ({})", record.filename, record.identifier);
                    deferred.push(record);
                }
            }
            let done = i + 1;
            (self.emit)(RunEvent::Progress {
                percent: progress(0, PRIMARY_SHARE, done, total),
                label: format!("matching {done}/{total}"),
            });
        }
        Some(deferred)
    }

    /// Hand leftover logins to deferred records in order. `None` when cancelled.
    fn fallback_pass(&mut self, deferred: Vec<MaFileRecord>, cancel: &CancelToken) -> Option<()> {
        if deferred.is_empty() {
            return Some(());
        }

        let leftover: Vec<usize> = self.pool.available().map(|(i, _)| i).collect();
        if !leftover.is_empty() {
            log::info!(
                "{} unmatched file(s), {} leftover login(s); assigning in order",
                deferred.len(),
                leftover.len()
            );
            (self.emit)(RunEvent::FallbackStarted {
                remaining: deferred.len(),
                leftover: leftover.len(),
            });
        }

        let remaining = deferred.len();
        for (j, record) in deferred.into_iter().enumerate() {
            if cancel.is_cancelled() {
                return None;
            }
            match leftover.get(j) {
                Some(&index) => {
                    self.commit(&record, index, Assignment::AutoAssigned);
                }
                None => {
                    log::warn!("insufficient logins for {}", record.filename);
                    (self.emit)(RunEvent::InsufficientLogins {
                        filename: record.filename.clone(),
                    });
                    self.failures.push(RecordFailure {
                        filename: record.filename,
                        reason: FailureReason::InsufficientLogins,
                    });
                }
            }
            let done = j + 1;
            (self.emit)(RunEvent::Progress {
                percent: progress(PRIMARY_SHARE, FALLBACK_SHARE, done, remaining),
                label: format!("assigning {done}/{remaining}"),
            });
        }
        Some(())
    }

    /// Write both artifacts and consume the login. A write failure leaves the
    /// login in the pool.
    fn commit(&mut self, record: &MaFileRecord, index: usize, assignment: Assignment) {
        let entry = self.pool.entry(index);
        match write_artifacts(
            self.output_dir,
            &record.identifier,
            &record.document,
            &entry.login,
            &entry.password,
            self.template,
        ) {
            Ok(paths) => {
                self.pool.take(index);
                log::debug!("{} -> {} ({assignment})", record.filename, entry.login);
                (self.emit)(RunEvent::Matched {
                    filename: record.filename.clone(),
                    login: entry.login.clone(),
                    assignment,
                });
                self.matches.push(MatchResult {
                    filename: record.filename.clone(),
                    identifier: record.identifier.clone(),
                    login: entry.login.clone(),
                    password: entry.password.clone(),
                    assignment,
                    mafile_path: paths.mafile,
                    config_path: paths.config,
                });
            }
            Err(e) => {
                let message = e.to_string();
                log::warn!("cannot write artifacts for {}: {message}", record.filename);
                (self.emit)(RunEvent::WriteFailed {
                    filename: record.filename.clone(),
                    message: message.clone(),
                });
                self.failures.push(RecordFailure {
                    filename: record.filename.clone(),
                    reason: FailureReason::Write(message),
                });
            }
        }
    }
}
