use super::{Control, Event, Processor, Tick};
use crate::brightness::Offset;
use crate::channel_ext::ReceiverExt;
use smol::channel::{Receiver, Sender, TryRecvError};
use smol::Timer;
use std::time::Duration;

/// Drives the processor: one tick per period while the camera is open, idle otherwise.
pub struct Controller {
    processor: Processor,
    video: usize,
    tick: Duration,
    control_rx: Receiver<Control>,
    brightness_rx: Receiver<Offset>,
    event_tx: Sender<Event>,
}

impl Controller {
    pub fn new(
        processor: Processor,
        video: usize,
        tick: Duration,
        control_rx: Receiver<Control>,
        brightness_rx: Receiver<Offset>,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            processor,
            video,
            tick,
            control_rx,
            brightness_rx,
            event_tx,
        }
    }

    /// Returns after a shutdown request, or once every control sender is gone.
    pub async fn run(&mut self) {
        while self.step().await {}

        self.processor.close();
        log::debug!("Capture session finished");
    }

    async fn step(&mut self) -> bool {
        if !self.processor.is_open() {
            return match self.control_rx.recv().await {
                Ok(control) => self.handle(control),
                Err(_) => false,
            };
        }

        loop {
            match self.control_rx.try_recv() {
                Ok(control) => {
                    if !self.handle(control) {
                        return false;
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => return false,
            }
        }

        if let Some(offset) = self.brightness_rx.try_recv_last() {
            log::trace!("Brightness offset: {}", offset.get());
            self.processor.set_offset(offset);
        }

        match self.processor.tick() {
            Tick::Stalled => {
                log::warn!("No frames from video{}, still waiting", self.video);
                self.emit(Event::Stalled);
            }
            Tick::Resumed => {
                log::info!("Frames from video{} resumed", self.video);
                self.emit(Event::Resumed);
            }
            Tick::Idle | Tick::Rendered | Tick::Skipped => {}
        }

        Timer::after(self.tick).await;
        true
    }

    fn handle(&mut self, control: Control) -> bool {
        match control {
            Control::Open => match self.processor.open(self.video) {
                Ok(resolution) => {
                    log::info!(
                        "Opened video{} at {}x{}",
                        self.video,
                        resolution.width,
                        resolution.height
                    );
                    self.emit(Event::Opened(resolution));
                }
                Err(err) => {
                    log::error!("Cannot open camera video{}: {}", self.video, err);
                    self.emit(Event::OpenFailed(err.to_string()));
                }
            },
            Control::Close => {
                if self.processor.is_open() {
                    self.processor.close();
                    log::info!("Closed video{}", self.video);
                    self.emit(Event::Closed);
                }
            }
            Control::Shutdown => return false,
        }
        true
    }

    fn emit(&self, event: Event) {
        if self.event_tx.try_send(event).is_err() {
            log::debug!("Unable to send session event, window is closed");
        }
    }
}
