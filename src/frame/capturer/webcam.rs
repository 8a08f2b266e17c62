use super::Resolution;
use crate::config::app::Capture;
use crate::frame::{ChannelOrder, Frame};
use crate::ErrorBox;
use itertools::Itertools;
use v4l::buffer::Type;
use v4l::io::mmap::Stream;
use v4l::io::traits::CaptureStream;
use v4l::video::Capture as _;
use v4l::{Device, FourCC};

struct Session {
    // must be dropped before the device, None after a failed read
    stream: Option<Stream<'static>>,
    device: Device,
    width: u32,
    height: u32,
    stride: usize,
    order: ChannelOrder,
}

/// Video4Linux camera, see `config.toml` for the knobs.
pub struct Webcam {
    config: Capture,
    session: Option<Session>,
}

impl Webcam {
    pub fn new(config: Capture) -> Self {
        Self {
            config,
            session: None,
        }
    }

    fn setup(&self, video: usize) -> Result<Session, ErrorBox> {
        let device = Device::new(video)?;

        let mut format = device.format()?;
        format.fourcc = fourcc(self.config.order);

        let requested = (self.config.width, self.config.height);
        let sizes = match device.enum_framesizes(format.fourcc) {
            Ok(sizes) => sizes
                .into_iter()
                .flat_map(|f| {
                    f.size
                        .to_discrete()
                        .into_iter()
                        .map(|d| (d.width, d.height))
                        .collect_vec()
                })
                .collect_vec(),
            Err(err) => {
                log::debug!("Unable to enumerate frame sizes of video{video}: {err}");
                Vec::new()
            }
        };
        (format.width, format.height) = closest_size(&sizes, requested).unwrap_or(requested);

        let format = device.set_format(&format)?;
        let order = match &format.fourcc.repr {
            b"RGB3" => ChannelOrder::Rgb,
            b"BGR3" => ChannelOrder::Bgr,
            _ => Err(format!(
                "Camera does not support RGB output, negotiated {}",
                format.fourcc
            ))?,
        };
        let stride = match format.stride as usize {
            0 => format.width as usize * 3,
            stride => stride,
        };

        let stream = start_stream(&device, &self.config)?;

        Ok(Session {
            stream: Some(stream),
            device,
            width: format.width,
            height: format.height,
            stride,
            order,
        })
    }
}

impl super::Capturer for Webcam {
    fn open(&mut self, video: usize) -> Result<Resolution, ErrorBox> {
        self.release();

        let session = self.setup(video)?;
        let resolution = Resolution {
            width: session.width,
            height: session.height,
        };
        log::debug!(
            "video{video}: {}x{}, stride {}, {:?}",
            session.width,
            session.height,
            session.stride,
            session.order
        );

        self.session = Some(session);
        Ok(resolution)
    }

    fn read(&mut self) -> Result<Frame, ErrorBox> {
        let config = &self.config;
        let Session {
            stream,
            device,
            width,
            height,
            stride,
            order,
        } = self.session.as_mut().ok_or("Camera is not open")?;

        read_restarting(
            stream,
            || start_stream(device, config),
            |stream| {
                let (buf, meta) = stream.next()?;
                let used = match meta.bytesused as usize {
                    0 => buf.len(),
                    n => n.min(buf.len()),
                };
                Frame::new(*width, *height, *stride, *order, buf[..used].to_vec())
            },
        )
    }

    fn release(&mut self) {
        self.session = None;
    }
}

fn start_stream(device: &Device, config: &Capture) -> Result<Stream<'static>, ErrorBox> {
    let mut stream = Stream::with_buffers(device, Type::VideoCapture, config.buffers)?;
    stream.set_timeout(config.read_timeout);
    Ok(stream)
}

/// Reads from the stream in `slot`, starting a new one first if the slot is empty.
///
/// A stream that failed a read is dropped: a timed out mmap stream keeps its current buffer
/// queued and every following read would be rejected by the driver.
fn read_restarting<S, T>(
    slot: &mut Option<S>,
    start: impl FnOnce() -> Result<S, ErrorBox>,
    read: impl FnOnce(&mut S) -> Result<T, ErrorBox>,
) -> Result<T, ErrorBox> {
    let stream = match slot {
        Some(stream) => stream,
        None => {
            log::debug!("Restarting capture stream");
            slot.insert(start()?)
        }
    };

    let result = read(stream);
    if result.is_err() {
        *slot = None;
    }
    result
}

fn fourcc(order: ChannelOrder) -> FourCC {
    match order {
        ChannelOrder::Rgb => FourCC::new(b"RGB3"),
        ChannelOrder::Bgr => FourCC::new(b"BGR3"),
    }
}

fn closest_size(sizes: &[(u32, u32)], (width, height): (u32, u32)) -> Option<(u32, u32)> {
    sizes
        .iter()
        .copied()
        .min_by_key(|&(w, h)| (w.abs_diff(width) as u64 + h.abs_diff(height) as u64, w, h))
}
