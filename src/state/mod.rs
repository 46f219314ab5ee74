//! Application state management modules.

mod overlay;
mod store;
mod upload_state;

pub use overlay::OverlayState;
pub use store::{SubscriptionId, UploadStore};
pub use upload_state::{RequestId, SettlePolicy, UploadEvent, UploadState, transition};
