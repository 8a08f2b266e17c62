use crate::frame::Frame;
use crate::ErrorBox;

#[cfg(test)]
use mockall::automock;

pub mod webcam;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// A camera that produces frames between `open` and `release`.
#[cfg_attr(test, automock)]
pub trait Capturer {
    fn open(&mut self, video: usize) -> Result<Resolution, ErrorBox>;

    fn read(&mut self) -> Result<Frame, ErrorBox>;

    /// Safe to call when nothing is open.
    fn release(&mut self);
}
