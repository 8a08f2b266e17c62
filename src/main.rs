use eframe::egui;
use frame::capturer::webcam::Webcam;
use smol::channel;
use std::thread::JoinHandle;

mod brightness;
mod channel_ext;
mod config;
mod frame;
mod session;
mod ui;

pub type ErrorBox = Box<dyn std::error::Error + Send + Sync>;

fn main() {
    let panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_hook(panic_info);
        std::process::exit(1);
    }));

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("lumacam {}", env!("LUMACAM_VERSION"));

    let config = match config::load() {
        Ok(config) => config,
        Err(err) => panic!("Unable to load config: {:#}", err),
    };

    log::debug!("Using {:#?}", config);

    let (control_tx, control_rx) = channel::unbounded();
    let (brightness_tx, brightness_rx) = channel::unbounded();
    let (event_tx, event_rx) = channel::unbounded();
    let (picture_tx, picture_rx) = channel::bounded(1);

    let capture = {
        let capture = config.capture.clone();
        let display = config.display.clone();
        spawn("capture".to_string(), move || {
            let processor = session::Processor::new(
                Box::new(Webcam::new(capture.clone())),
                Box::new(frame::sink::Channel::new(picture_tx)),
                display.brightness,
                display.stall_ticks,
            );
            let mut controller = session::Controller::new(
                processor,
                capture.video,
                display.tick,
                control_rx,
                brightness_rx,
                event_tx,
            );
            smol::block_on(controller.run());
        })
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(ui::TITLE)
            .with_inner_size(ui::WINDOW_SIZE),
        ..Default::default()
    };

    let app = ui::App::new(
        control_tx.clone(),
        brightness_tx,
        picture_rx,
        event_rx,
        config.display.brightness,
        config.display.tick,
    );
    let result = eframe::run_native(ui::TITLE, options, Box::new(|_cc| Ok(Box::new(app))));

    // The window is gone, release the camera before exiting.
    if control_tx.send_blocking(session::Control::Shutdown).is_err() {
        log::debug!("Capture thread already finished");
    }
    drop(control_tx);
    if capture.join().is_err() {
        log::error!("Capture thread panicked");
    }

    if let Err(err) = result {
        log::error!("Unable to run the window: {}", err);
        std::process::exit(1);
    }
}

fn spawn<F, T>(thread_name: String, handler: F) -> JoinHandle<T>
where
    F: FnOnce() -> T,
    F: Send + 'static,
    T: Send + 'static,
{
    std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(handler)
        .unwrap_or_else(|_| panic!("Unable to start thread: {}", thread_name))
}
