//! Terminal views.
//!
//! Each view is a pure function from state to text lines; nothing here
//! mutates application state.

mod home;
mod metrics;
mod uploader;
mod viewer;

pub use home::{ERROR_PREFIX, LOADING_TEXT, render_home};
pub use metrics::{MetricsText, format_metrics, render_metrics};
pub use uploader::render_uploader;
pub use viewer::render_viewer;
