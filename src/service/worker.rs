//! Background upload threads (native only)
//!
//! Each submitted file gets its own named thread, so a slow request never
//! delays a newer one. Results come back over a channel and are picked up
//! without blocking by the owner thread.

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use web_time::Instant;

use super::SegmentationService;
use crate::model::{SegmentationResult, UploadFile};
use crate::state::RequestId;

/// A settled upload request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub request: RequestId,
    /// Parsed result, or the error's display text
    pub result: Result<SegmentationResult, String>,
}

/// Runs uploads on background threads and collects their outcomes.
///
/// Requests cannot be cancelled. Dropping the worker detaches any threads
/// still in flight; their results are discarded.
pub struct UploadWorker {
    service: Arc<dyn SegmentationService>,
    result_tx: Sender<UploadOutcome>,
    result_rx: Receiver<UploadOutcome>,
    /// Requests sent but not yet collected
    pending: HashSet<RequestId>,
}

impl UploadWorker {
    pub fn new(service: Arc<dyn SegmentationService>) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        Self {
            service,
            result_tx,
            result_rx,
            pending: HashSet::new(),
        }
    }

    /// Service used by upload threads.
    pub fn service(&self) -> &Arc<dyn SegmentationService> {
        &self.service
    }

    /// Start uploading `file` for `request` on a new thread.
    ///
    /// Every request settles exactly once: a service panic or a thread that
    /// cannot be spawned is reported as a failed outcome.
    pub fn request_upload(&mut self, request: RequestId, file: UploadFile) {
        self.pending.insert(request);

        let service = Arc::clone(&self.service);
        let result_tx = self.result_tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("upload-{}", request.0))
            .spawn(move || {
                let started = Instant::now();
                let result = match panic::catch_unwind(AssertUnwindSafe(|| service.upload(&file))) {
                    Ok(result) => result.map_err(|e| e.to_string()),
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        log::error!("Upload thread for {} panicked: {}", request, message);
                        Err(format!("Upload crashed: {message}"))
                    }
                };
                log::debug!(
                    "Request {} settled in {:.0?} ({})",
                    request,
                    started.elapsed(),
                    if result.is_ok() { "ok" } else { "error" }
                );
                if result_tx.send(UploadOutcome { request, result }).is_err() {
                    log::debug!("Result channel closed, dropping outcome of {}", request);
                }
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn upload thread: {}", e);
            let _ = self.result_tx.send(UploadOutcome {
                request,
                result: Err(format!("Failed to start upload: {e}")),
            });
        } else {
            log::debug!("Sent upload request {}", request);
        }
    }

    /// Take one settled outcome, oldest first. Non-blocking.
    pub fn take_one_result(&mut self) -> Option<UploadOutcome> {
        match self.result_rx.try_recv() {
            Ok(outcome) => {
                self.pending.remove(&outcome.request);
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            // Unreachable while we hold a sender
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Number of requests that have not been collected yet.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, request: RequestId) -> bool {
        self.pending.contains(&request)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl std::fmt::Debug for UploadWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadWorker")
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
