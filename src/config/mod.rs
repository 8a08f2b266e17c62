use crate::brightness::Offset;
use crate::frame::ChannelOrder;
use anyhow::{bail, Context};
use std::fs;
use std::time::Duration;

pub mod app;
pub mod file;

const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

pub fn load() -> anyhow::Result<app::Config> {
    let path = xdg::BaseDirectories::with_prefix("lumacam")?.find_config_file("config.toml");

    match path {
        Some(path) => {
            log::debug!("Reading config from '{}'", path.display());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Unable to read '{}'", path.display()))?;
            parse(&content).with_context(|| format!("Invalid config '{}'", path.display()))
        }
        None => parse(DEFAULT_CONFIG).context("Invalid built-in config"),
    }
}

pub fn parse(content: &str) -> anyhow::Result<app::Config> {
    let cfg: file::Config = toml::from_str(content)?;

    if cfg.capture.width == 0 || cfg.capture.height == 0 {
        bail!(
            "capture resolution must be positive, got {}x{}",
            cfg.capture.width,
            cfg.capture.height
        );
    }
    if cfg.capture.buffers == 0 {
        bail!("capture.buffers must be at least 1");
    }
    if cfg.capture.read_timeout_ms == 0 {
        bail!("capture.read_timeout_ms must be positive");
    }
    if cfg.display.tick_ms == 0 {
        bail!("display.tick_ms must be positive");
    }
    if cfg.display.stall_ticks == 0 {
        bail!("display.stall_ticks must be at least 1");
    }

    let brightness = Offset::new(cfg.display.brightness).with_context(|| {
        format!(
            "display.brightness must be within [{}, {}], got {}",
            Offset::MIN,
            Offset::MAX,
            cfg.display.brightness
        )
    })?;

    Ok(app::Config {
        capture: app::Capture {
            video: cfg.capture.video,
            width: cfg.capture.width,
            height: cfg.capture.height,
            order: match cfg.capture.format {
                file::Format::Rgb => ChannelOrder::Rgb,
                file::Format::Bgr => ChannelOrder::Bgr,
            },
            buffers: cfg.capture.buffers,
            read_timeout: Duration::from_millis(cfg.capture.read_timeout_ms),
        },
        display: app::Display {
            tick: Duration::from_millis(cfg.display.tick_ms),
            brightness,
            stall_ticks: cfg.display.stall_ticks,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(capture: &str, display: &str) -> String {
        format!("[capture]\n{capture}\n\n[display]\n{display}\n")
    }

    const CAPTURE: &str = r#"
video = 2
width = 320
height = 240
format = "rgb"
buffers = 2
read_timeout_ms = 500
"#;

    const DISPLAY: &str = r#"
tick_ms = 40
brightness = -20
stall_ticks = 10
"#;

    #[test]
    fn test_builtin_config_is_valid() -> anyhow::Result<()> {
        let cfg = parse(DEFAULT_CONFIG)?;

        assert_eq!(0, cfg.capture.video);
        assert_eq!((640, 480), (cfg.capture.width, cfg.capture.height));
        assert_eq!(ChannelOrder::Bgr, cfg.capture.order);
        assert_eq!(Duration::from_millis(30), cfg.display.tick);
        assert_eq!(Offset::default(), cfg.display.brightness);
        Ok(())
    }

    #[test]
    fn test_parse_custom_values() -> anyhow::Result<()> {
        let cfg = parse(&config_with(CAPTURE, DISPLAY))?;

        assert_eq!(2, cfg.capture.video);
        assert_eq!((320, 240), (cfg.capture.width, cfg.capture.height));
        assert_eq!(ChannelOrder::Rgb, cfg.capture.order);
        assert_eq!(2, cfg.capture.buffers);
        assert_eq!(Duration::from_millis(500), cfg.capture.read_timeout);
        assert_eq!(Duration::from_millis(40), cfg.display.tick);
        assert_eq!(-20, cfg.display.brightness.get());
        assert_eq!(10, cfg.display.stall_ticks);
        Ok(())
    }

    #[test]
    fn test_brightness_out_of_range_is_rejected() {
        let display = DISPLAY.replace("brightness = -20", "brightness = 101");
        let err = parse(&config_with(CAPTURE, &display)).unwrap_err();

        assert!(err.to_string().contains("display.brightness"));
    }

    #[test]
    fn test_zero_values_are_rejected() {
        let cases = [
            (CAPTURE.replace("width = 320", "width = 0"), DISPLAY.to_string()),
            (CAPTURE.replace("buffers = 2", "buffers = 0"), DISPLAY.to_string()),
            (
                CAPTURE.replace("read_timeout_ms = 500", "read_timeout_ms = 0"),
                DISPLAY.to_string(),
            ),
            (CAPTURE.to_string(), DISPLAY.replace("tick_ms = 40", "tick_ms = 0")),
            (
                CAPTURE.to_string(),
                DISPLAY.replace("stall_ticks = 10", "stall_ticks = 0"),
            ),
        ];

        for (capture, display) in cases {
            assert!(parse(&config_with(&capture, &display)).is_err());
        }
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let capture = CAPTURE.replace(r#"format = "rgb""#, r#"format = "yuyv""#);

        assert!(parse(&config_with(&capture, DISPLAY)).is_err());
    }
}
