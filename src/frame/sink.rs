use crate::frame::Frame;
use smol::channel::Sender;

#[cfg(test)]
use mockall::automock;

/// Surface that shows processed frames.
#[cfg_attr(test, automock)]
pub trait Sink {
    fn present(&self, frame: Frame);

    fn clear(&self);
}

#[derive(Debug, PartialEq, Eq)]
pub enum Picture {
    Frame(Frame),
    Blank,
}

/// Hands pictures over to the GUI thread.
///
/// The channel is expected to hold a single picture: an unread one is replaced by the newer.
pub struct Channel {
    picture_tx: Sender<Picture>,
}

impl Channel {
    pub fn new(picture_tx: Sender<Picture>) -> Self {
        Self { picture_tx }
    }

    fn post(&self, picture: Picture) {
        match self.picture_tx.force_send(picture) {
            Ok(Some(_)) => log::trace!("Dropped a picture that was never shown"),
            Ok(None) => {}
            // window is gone, shutdown follows
            Err(_) => log::debug!("Unable to post picture, display is closed"),
        }
    }
}

impl Sink for Channel {
    fn present(&self, frame: Frame) {
        self.post(Picture::Frame(frame));
    }

    fn clear(&self) {
        self.post(Picture::Blank);
    }
}
