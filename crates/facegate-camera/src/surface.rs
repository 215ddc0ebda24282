use facegate_base::Tensor;
use tokio::sync::watch;

/// Write side of a [`FrameSurface`], held by the capture loop.
#[derive(Debug)]
pub struct FramePublisher {
    sender: watch::Sender<Option<Tensor<u8>>>,
}

/// Latest decoded frame of a running stream.
///
/// Holds nothing until the stream delivers its first frame. Readers always
/// see the most recent frame; older frames are overwritten, never queued.
#[derive(Debug, Clone)]
pub struct FrameSurface {
    receiver: watch::Receiver<Option<Tensor<u8>>>,
}

/// Create a connected publisher/surface pair with no frame yet.
pub fn frame_surface() -> (FramePublisher, FrameSurface) {
    let (sender, receiver) = watch::channel(None);
    (FramePublisher { sender }, FrameSurface { receiver })
}

impl FramePublisher {
    /// Replace the current frame. Returns `false` once every surface is gone,
    /// which tells the capture loop to stop.
    pub fn publish(&self, frame: Tensor<u8>) -> bool {
        self.sender.send(Some(frame)).is_ok()
    }
}

impl FrameSurface {
    /// Copy of the current frame, if one has arrived.
    pub fn snapshot(&self) -> Option<Tensor<u8>> {
        self.receiver.borrow().clone()
    }

    /// `(width, height)` of the current frame, `(0, 0)` before the first one.
    pub fn dimensions(&self) -> (usize, usize) {
        match self.receiver.borrow().as_ref().map(|f| f.image_dims()) {
            Some(Ok((width, height, _))) => (width, height),
            _ => (0, 0),
        }
    }

    /// Wait until a frame newer than the last one seen is available.
    ///
    /// Returns `false` if the publisher went away.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }
}
