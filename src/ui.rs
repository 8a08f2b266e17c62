use crate::brightness::Offset;
use crate::frame::capturer::Resolution;
use crate::frame::sink::Picture;
use crate::frame::{ChannelOrder, Frame};
use crate::session::{Control, Event};
use eframe::egui;
use smol::channel::{Receiver, Sender};
use std::fmt;
use std::time::Duration;

pub const TITLE: &str = "Webcam Feed with Brightness Control";
pub const WINDOW_SIZE: [f32; 2] = [800.0, 600.0];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Status {
    Closed,
    Opening,
    Open(Resolution),
    Stalled(Resolution),
    Failed(String),
}

impl Status {
    fn apply(self, event: Event) -> Self {
        match (self, event) {
            (_, Event::Opened(resolution)) => Status::Open(resolution),
            (_, Event::OpenFailed(reason)) => Status::Failed(reason),
            (_, Event::Closed) => Status::Closed,
            (Status::Open(resolution), Event::Stalled) => Status::Stalled(resolution),
            (Status::Stalled(resolution), Event::Resumed) => Status::Open(resolution),
            (status, event) => {
                log::debug!("Ignoring {event:?} while {status:?}");
                status
            }
        }
    }

    /// The capture thread is expected to send more pictures or events.
    fn is_busy(&self) -> bool {
        matches!(
            self,
            Status::Opening | Status::Open(_) | Status::Stalled(_)
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Closed => write!(f, "Camera closed"),
            Status::Opening => write!(f, "Opening camera…"),
            Status::Open(r) => write!(f, "Camera open ({}x{})", r.width, r.height),
            Status::Stalled(_) => write!(f, "No frames from camera"),
            Status::Failed(reason) => write!(f, "Cannot open camera: {reason}"),
        }
    }
}

pub struct App {
    control_tx: Sender<Control>,
    brightness_tx: Sender<Offset>,
    picture_rx: Receiver<Picture>,
    event_rx: Receiver<Event>,
    brightness: i32,
    status: Status,
    texture: Option<egui::TextureHandle>,
    tick: Duration,
}

impl App {
    pub fn new(
        control_tx: Sender<Control>,
        brightness_tx: Sender<Offset>,
        picture_rx: Receiver<Picture>,
        event_rx: Receiver<Event>,
        brightness: Offset,
        tick: Duration,
    ) -> Self {
        Self {
            control_tx,
            brightness_tx,
            picture_rx,
            event_rx,
            brightness: brightness.get(),
            status: Status::Closed,
            texture: None,
            tick,
        }
    }

    fn send(&self, control: Control) {
        if self.control_tx.try_send(control).is_err() {
            log::error!("Unable to send {control:?}, capture thread is gone");
        }
    }

    fn send_brightness(&self) {
        // the slider keeps the value in range
        if let Some(offset) = Offset::new(self.brightness) {
            if self.brightness_tx.try_send(offset).is_err() {
                log::debug!("Unable to send brightness, capture thread is gone");
            }
        }
    }

    fn poll_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.status = std::mem::replace(&mut self.status, Status::Closed).apply(event);
        }
    }

    fn poll_pictures(&mut self, ctx: &egui::Context) {
        match self.picture_rx.try_recv() {
            Ok(Picture::Frame(frame)) => self.show(ctx, &frame),
            Ok(Picture::Blank) => self.texture = None,
            Err(_) => {}
        }
    }

    fn show(&mut self, ctx: &egui::Context, frame: &Frame) {
        debug_assert_eq!(ChannelOrder::Rgb, frame.order());

        let size = [frame.width() as usize, frame.height() as usize];
        let image = egui::ColorImage::from_rgb(size, &frame.packed_pixels());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("camera", image, egui::TextureOptions::LINEAR))
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);

        let slider =
            egui::Slider::new(&mut self.brightness, Offset::MIN..=Offset::MAX).text("Brightness");
        if ui.add(slider).on_hover_text("Adjust Brightness").changed() {
            self.send_brightness();
        }

        ui.horizontal(|ui| {
            if ui.button("Open Webcam").clicked() {
                if !self.status.is_busy() {
                    self.status = Status::Opening;
                }
                self.send(Control::Open);
            }
            if ui.button("Close Webcam").clicked() {
                self.send(Control::Close);
            }
        });

        ui.label(self.status.to_string());
        ui.add_space(4.0);
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events();
        self.poll_pictures(ctx);

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| self.controls(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                if let Some(texture) = &self.texture {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                }
            });
        });

        if self.status.is_busy() {
            ctx.request_repaint_after(self.tick);
        }
    }
}
