//! Upload lifecycle state machine.
//!
//! `transition` is a pure function: given the current state and an event it
//! either returns the next state or rejects the event. The store owns the
//! only mutable copy of the state.

use serde::{Deserialize, Serialize};

use crate::model::SegmentationResult;

/// Monotonic sequence number assigned to each submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of the most recent upload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    /// Nothing submitted yet
    #[default]
    Idle,
    /// A request is in flight
    Loading,
    /// The last accepted response was a segmentation result
    Success(SegmentationResult),
    /// The last accepted response was an error, with its message
    Failure(String),
}

impl UploadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UploadState::Loading)
    }

    pub fn result(&self) -> Option<&SegmentationResult> {
        match self {
            UploadState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UploadState::Failure(message) => Some(message),
            _ => None,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Loading => "loading",
            UploadState::Success(_) => "success",
            UploadState::Failure(_) => "failure",
        }
    }
}

/// Events accepted by the upload state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadEvent {
    /// A file was handed to the orchestrator and a request issued
    Submitted { request: RequestId },
    /// The request settled with a parsed result
    Succeeded {
        request: RequestId,
        result: SegmentationResult,
    },
    /// The request settled with an error message
    Failed { request: RequestId, message: String },
}

impl UploadEvent {
    pub fn request(&self) -> RequestId {
        match self {
            UploadEvent::Submitted { request }
            | UploadEvent::Succeeded { request, .. }
            | UploadEvent::Failed { request, .. } => *request,
        }
    }
}

/// How responses of overlapping submissions are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlePolicy {
    /// Whichever response settles last wins, even if it belongs to an older
    /// request. The first settle clears Loading.
    #[default]
    LastSettled,
    /// Responses for requests older than the latest submission are discarded.
    LatestIssued,
}

impl SettlePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SettlePolicy::LastSettled => "last_settled",
            SettlePolicy::LatestIssued => "latest_issued",
        }
    }

    pub fn all() -> &'static [SettlePolicy] {
        &[SettlePolicy::LastSettled, SettlePolicy::LatestIssued]
    }
}

/// Compute the next state for `event`, or `None` if the event is rejected.
///
/// `latest` is the most recent submitted request before this event.
pub fn transition(
    state: &UploadState,
    event: UploadEvent,
    latest: Option<RequestId>,
    policy: SettlePolicy,
) -> Option<UploadState> {
    match event {
        UploadEvent::Submitted { request } => {
            // Sequence numbers only move forward.
            if latest.is_some_and(|latest| request <= latest) {
                return None;
            }
            Some(UploadState::Loading)
        }
        UploadEvent::Succeeded { request, result } => {
            accepts_settle(state, request, latest, policy).then(|| UploadState::Success(result))
        }
        UploadEvent::Failed { request, message } => {
            accepts_settle(state, request, latest, policy).then(|| UploadState::Failure(message))
        }
    }
}

fn accepts_settle(
    state: &UploadState,
    request: RequestId,
    latest: Option<RequestId>,
    policy: SettlePolicy,
) -> bool {
    let Some(latest) = latest else {
        // Nothing was ever submitted.
        return false;
    };
    if request > latest || matches!(state, UploadState::Idle) {
        return false;
    }
    match policy {
        SettlePolicy::LastSettled => true,
        SettlePolicy::LatestIssued => request == latest && state.is_loading(),
    }
}
