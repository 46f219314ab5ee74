//! Single-writer holder for the upload state.
//!
//! Views never mutate the state directly. They subscribe and are called back
//! synchronously, in subscription order, every time `dispatch` accepts an
//! event.

use super::upload_state::{RequestId, SettlePolicy, UploadEvent, UploadState, transition};

/// Handle returned by [`UploadStore::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&UploadState)>;

/// Owns the current [`UploadState`] and broadcasts every accepted transition.
pub struct UploadStore {
    state: UploadState,
    policy: SettlePolicy,
    /// Most recent submitted request
    latest: Option<RequestId>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl UploadStore {
    pub fn new(policy: SettlePolicy) -> Self {
        Self {
            state: UploadState::Idle,
            policy,
            latest: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    /// Most recent submitted request, if any.
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest
    }

    /// Register a callback invoked after every accepted transition.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&UploadState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Apply an event. Returns true if it was accepted.
    ///
    /// On acceptance the state is replaced wholesale and every subscriber is
    /// notified before this returns. Rejected events leave the state and
    /// subscribers untouched.
    pub fn dispatch(&mut self, event: UploadEvent) -> bool {
        let request = event.request();
        let is_submit = matches!(event, UploadEvent::Submitted { .. });

        let Some(next) = transition(&self.state, event, self.latest, self.policy) else {
            log::info!(
                "Discarded event for request {} in state '{}' ({})",
                request,
                self.state.name(),
                self.policy.name()
            );
            return false;
        };

        if is_submit {
            self.latest = Some(request);
        }
        log::debug!(
            "🔄 Upload state: {} -> {} (request {})",
            self.state.name(),
            next.name(),
            request
        );
        self.state = next;

        for (_, subscriber) in &mut self.subscribers {
            subscriber(&self.state);
        }
        true
    }
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new(SettlePolicy::default())
    }
}

impl std::fmt::Debug for UploadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadStore")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("latest", &self.latest)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
