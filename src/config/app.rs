use crate::brightness::Offset;
use crate::frame::ChannelOrder;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Capture {
    pub video: usize,
    pub width: u32,
    pub height: u32,
    pub order: ChannelOrder,
    pub buffers: u32,
    pub read_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Display {
    pub tick: Duration,
    pub brightness: Offset,
    pub stall_ticks: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub capture: Capture,
    pub display: Display,
}
