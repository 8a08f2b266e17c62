use smol::channel::Receiver;

/// An extension trait that adds functionality to smol channel receivers.
pub trait ReceiverExt<T> {
    /// Get the newest element in the channel, discarding all previous messages. Returns None
    /// without waiting if the channel is empty or closed.
    fn try_recv_last(&self) -> Option<T>;
}

impl<T> ReceiverExt<T> for Receiver<T> {
    fn try_recv_last(&self) -> Option<T> {
        let mut last = None;
        while let Ok(value) = self.try_recv() {
            last = Some(value);
        }
        last
    }
}
