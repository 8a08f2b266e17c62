use serde::Deserialize;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Rgb,
    Bgr,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Capture {
    pub video: usize,
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub buffers: u32,
    pub read_timeout_ms: u64,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Display {
    pub tick_ms: u64,
    pub brightness: i32,
    pub stall_ticks: u32,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub capture: Capture,
    pub display: Display,
}
