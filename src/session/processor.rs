use crate::brightness::{adjust_brightness, Offset};
use crate::frame::capturer::{Capturer, Resolution};
use crate::frame::sink::Sink;
use crate::ErrorBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Open(Resolution),
}

/// Outcome of a single capture-process-render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Idle,
    Rendered,
    Skipped,
    /// Reported once, when failed reads in a row reach the stall threshold.
    Stalled,
    /// First frame rendered after a stall.
    Resumed,
}

pub struct Processor {
    capturer: Box<dyn Capturer>,
    sink: Box<dyn Sink>,
    state: State,
    offset: Offset,
    stall_ticks: u32,
    misses: u32,
}

impl Processor {
    pub fn new(
        capturer: Box<dyn Capturer>,
        sink: Box<dyn Sink>,
        offset: Offset,
        stall_ticks: u32,
    ) -> Self {
        Self {
            capturer,
            sink,
            state: State::Closed,
            offset,
            stall_ticks,
            misses: 0,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, State::Open(_))
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    /// On failure the processor stays closed.
    pub fn open(&mut self, video: usize) -> Result<Resolution, ErrorBox> {
        if let State::Open(resolution) = self.state {
            log::debug!("Camera is already open, ignoring open request");
            return Ok(resolution);
        }

        let resolution = self.capturer.open(video)?;
        self.state = State::Open(resolution);
        self.misses = 0;
        Ok(resolution)
    }

    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }

        self.capturer.release();
        self.sink.clear();
        self.state = State::Closed;
    }

    pub fn tick(&mut self) -> Tick {
        if self.state == State::Closed {
            return Tick::Idle;
        }

        match self.capturer.read() {
            Ok(frame) => {
                let frame = adjust_brightness(frame, self.offset).into_rgb();
                self.sink.present(frame);

                let stalled = self.misses >= self.stall_ticks;
                self.misses = 0;
                if stalled {
                    Tick::Resumed
                } else {
                    Tick::Rendered
                }
            }
            Err(err) => {
                log::debug!("Skipping frame: {err}");
                self.misses = self.misses.saturating_add(1);
                if self.misses == self.stall_ticks {
                    Tick::Stalled
                } else {
                    Tick::Skipped
                }
            }
        }
    }
}

impl Drop for Processor {
    fn drop(&mut self) {
        self.close();
    }
}
