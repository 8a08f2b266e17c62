use crate::frame::capturer::Resolution;

mod controller;
mod processor;

pub use controller::Controller;
pub use processor::{Processor, State, Tick};

/// Requests from the window to the capture thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Open,
    Close,
    Shutdown,
}

/// Notifications from the capture thread to the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Opened(Resolution),
    OpenFailed(String),
    Closed,
    Stalled,
    Resumed,
}
