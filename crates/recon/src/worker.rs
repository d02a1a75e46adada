//! Run the engine off the caller's thread.
//!
//! Events arrive on a channel in emission order; the channel closes when the
//! run ends, after which [`RunHandle::join`] returns the report.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use crate::engine::{run, CancelToken, ReconOptions};
use crate::error::ReconError;
use crate::model::{ReconReport, ReconRequest, RunEvent};

pub struct RunHandle {
    events: Receiver<RunEvent>,
    cancel: CancelToken,
    handle: JoinHandle<Result<ReconReport, ReconError>>,
}

impl RunHandle {
    pub fn events(&self) -> &Receiver<RunEvent> {
        &self.events
    }

    /// Ask the worker to stop before the next record.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn join(self) -> Result<ReconReport, ReconError> {
        self.handle.join().map_err(|_| ReconError::WorkerPanicked)?
    }
}

/// Start a run on a dedicated thread. Each handle owns its own login pool, so
/// concurrent handles never share state.
pub fn spawn(options: ReconOptions, request: ReconRequest) -> RunHandle {
    let (tx, rx) = mpsc::channel();
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();

    let handle = thread::spawn(move || {
        run(&options, &request, &worker_cancel, |event| {
            // receiver gone means nobody is listening; keep going
            let _ = tx.send(event);
        })
    });

    RunHandle {
        events: rx,
        cancel,
        handle,
    }
}
