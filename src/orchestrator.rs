//! Upload orchestration: owns the upload state and the network calls.

use std::sync::Arc;

use crate::model::{UploadFile, has_accepted_extension};
use crate::service::{SegmentationService, UploadOutcome, UploadWorker};
use crate::state::{RequestId, SettlePolicy, SubscriptionId, UploadEvent, UploadState, UploadStore};

/// Drives the `Idle -> Loading -> Success | Failure` lifecycle.
///
/// `submit` never blocks: the request runs on a background thread and its
/// outcome is applied by a later `poll`. Overlapping submissions are allowed;
/// the store's [`SettlePolicy`] decides which response wins.
pub struct Orchestrator {
    store: UploadStore,
    worker: UploadWorker,
    next_request: u64,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn SegmentationService>, policy: SettlePolicy) -> Self {
        Self {
            store: UploadStore::new(policy),
            worker: UploadWorker::new(service),
            next_request: 1,
        }
    }

    pub fn state(&self) -> &UploadState {
        self.store.state()
    }

    pub fn is_loading(&self) -> bool {
        self.store.state().is_loading()
    }

    /// Register a view callback on the underlying store.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&UploadState) + 'static) -> SubscriptionId {
        self.store.subscribe(subscriber)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn service(&self) -> &Arc<dyn SegmentationService> {
        self.worker.service()
    }

    /// Requests still in flight.
    pub fn pending_count(&self) -> usize {
        self.worker.pending_count()
    }

    /// Enter Loading and start uploading `file`.
    ///
    /// The file is not validated. An unexpected extension is only logged.
    pub fn submit(&mut self, file: UploadFile) -> RequestId {
        let request = RequestId(self.next_request);
        self.next_request += 1;

        if !has_accepted_extension(&file.name) {
            log::warn!(
                "'{}' does not look like a DICOM/NIfTI file, uploading anyway",
                file.name
            );
        }
        log::info!("Submitting '{}' as request {}", file.name, request);

        self.store.dispatch(UploadEvent::Submitted { request });
        self.worker.request_upload(request, file);
        request
    }

    /// Apply one settled outcome. Returns true if the store accepted it.
    pub fn settle(&mut self, outcome: UploadOutcome) -> bool {
        let UploadOutcome { request, result } = outcome;
        let event = match result {
            Ok(result) => UploadEvent::Succeeded { request, result },
            Err(message) => {
                log::warn!("Request {} failed: {}", request, message);
                UploadEvent::Failed { request, message }
            }
        };
        self.store.dispatch(event)
    }

    /// Drain every settled outcome without blocking.
    /// Returns how many were accepted by the store.
    pub fn poll(&mut self) -> usize {
        let mut accepted = 0;
        while let Some(outcome) = self.worker.take_one_result() {
            if self.settle(outcome) {
                accepted += 1;
            }
        }
        accepted
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("store", &self.store)
            .field("worker", &self.worker)
            .field("next_request", &self.next_request)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UploadError;
    use crate::model::{HealthStatus, Metrics, SegmentationResult};
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Mutex;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration;
    use web_time::Instant;

    /// Holds each upload until the test releases it.
    struct GatedService {
        gates: Mutex<Vec<(String, Receiver<()>)>>,
    }

    impl GatedService {
        fn new() -> Self {
            Self {
                gates: Mutex::new(Vec::new()),
            }
        }

        fn gate(&self, name: &str) -> mpsc::Sender<()> {
            let (tx, rx) = mpsc::channel();
            self.gates.lock().unwrap().push((name.to_string(), rx));
            tx
        }
    }

    impl SegmentationService for GatedService {
        fn upload(&self, file: &UploadFile) -> Result<SegmentationResult, UploadError> {
            let gate = {
                let mut gates = self.gates.lock().unwrap();
                let index = gates.iter().position(|(name, _)| *name == file.name);
                index.map(|i| gates.remove(i).1)
            };
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            if file.name.starts_with("bad") {
                return Err(UploadError::Rejected { status: 500 });
            }
            Ok(SegmentationResult {
                original_path: format!("/files/{}-o.png", file.name),
                mask_path: format!("/files/{}-m.png", file.name),
                metrics: Metrics {
                    area_pixels: 1.0,
                    volume_mm3: 2.0,
                    volume_ml: 0.002,
                },
                result_id: Some(file.name.clone()),
                status: None,
                timestamp: None,
            })
        }

        fn health(&self) -> Result<HealthStatus, UploadError> {
            unimplemented!()
        }

        fn fetch_asset(&self, _path: &str) -> Result<Vec<u8>, UploadError> {
            unimplemented!()
        }

        fn asset_url(&self, path: &str) -> String {
            path.to_string()
        }
    }

    fn file(name: &str) -> UploadFile {
        UploadFile::new(name, b"DICM".to_vec())
    }

    /// Poll until every request has been collected.
    fn settle_all(orchestrator: &mut Orchestrator) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while orchestrator.pending_count() > 0 {
            orchestrator.poll();
            assert!(Instant::now() < deadline, "uploads did not settle");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn shown_result(orchestrator: &Orchestrator) -> Option<String> {
        orchestrator.state().result().and_then(|r| r.result_id.clone())
    }

    #[test]
    fn test_submit_enters_loading_then_success() {
        let service = Arc::new(GatedService::new());
        let release = service.gate("scan.dcm");
        let mut orchestrator = Orchestrator::new(service, SettlePolicy::LastSettled);

        let request = orchestrator.submit(file("scan.dcm"));
        assert_eq!(request, RequestId(1));
        assert!(orchestrator.is_loading());

        release.send(()).unwrap();
        settle_all(&mut orchestrator);
        assert!(!orchestrator.is_loading());
        assert_eq!(shown_result(&orchestrator).as_deref(), Some("scan.dcm"));
    }

    #[test]
    fn test_rejected_upload_sets_failure() {
        let service = Arc::new(GatedService::new());
        let mut orchestrator = Orchestrator::new(service, SettlePolicy::LastSettled);

        orchestrator.submit(file("bad.dcm"));
        settle_all(&mut orchestrator);
        assert_eq!(orchestrator.state().error(), Some("Upload failed"));
        assert!(orchestrator.state().result().is_none());
    }

    #[test]
    fn test_resubmit_clears_previous_failure() {
        let service = Arc::new(GatedService::new());
        let mut orchestrator = Orchestrator::new(service.clone(), SettlePolicy::LastSettled);

        orchestrator.submit(file("bad.dcm"));
        settle_all(&mut orchestrator);
        assert!(orchestrator.state().error().is_some());

        let release = service.gate("scan.dcm");
        orchestrator.submit(file("scan.dcm"));
        assert!(orchestrator.is_loading());
        assert!(orchestrator.state().error().is_none());
        release.send(()).unwrap();
        settle_all(&mut orchestrator);
    }

    #[test]
    fn test_last_settled_race_shows_older_response() {
        let service = Arc::new(GatedService::new());
        let first = service.gate("first.dcm");
        let second = service.gate("second.dcm");
        let mut orchestrator = Orchestrator::new(service.clone(), SettlePolicy::LastSettled);

        orchestrator.submit(file("first.dcm"));
        orchestrator.submit(file("second.dcm"));

        // Newer request settles first and clears Loading.
        second.send(()).unwrap();
        while orchestrator.pending_count() == 2 {
            orchestrator.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(shown_result(&orchestrator).as_deref(), Some("second.dcm"));

        // The older one settles last and wins.
        first.send(()).unwrap();
        settle_all(&mut orchestrator);
        assert_eq!(shown_result(&orchestrator).as_deref(), Some("first.dcm"));
    }

    #[test]
    fn test_latest_issued_discards_stale_response() {
        let service = Arc::new(GatedService::new());
        let first = service.gate("first.dcm");
        let second = service.gate("second.dcm");
        let mut orchestrator = Orchestrator::new(service.clone(), SettlePolicy::LatestIssued);

        orchestrator.submit(file("first.dcm"));
        orchestrator.submit(file("second.dcm"));

        first.send(()).unwrap();
        while orchestrator.pending_count() == 2 {
            orchestrator.poll();
            std::thread::sleep(Duration::from_millis(5));
        }
        // Stale response dropped, still waiting for the latest request.
        assert!(orchestrator.is_loading());

        second.send(()).unwrap();
        settle_all(&mut orchestrator);
        assert_eq!(shown_result(&orchestrator).as_deref(), Some("second.dcm"));
    }

    #[test]
    fn test_subscribers_notified_per_transition() {
        let service = Arc::new(GatedService::new());
        let mut orchestrator = Orchestrator::new(service, SettlePolicy::LastSettled);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        orchestrator.subscribe(move |state| sink.borrow_mut().push(state.name()));

        orchestrator.submit(file("scan.dcm"));
        settle_all(&mut orchestrator);
        assert_eq!(*seen.borrow(), vec!["loading", "success"]);
    }
}
