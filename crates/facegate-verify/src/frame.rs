use std::fmt;

/// An encoded still image ready for upload.
#[derive(Clone, PartialEq)]
pub struct CapturedFrame {
    pub jpeg: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl CapturedFrame {
    pub fn new(jpeg: Vec<u8>, width: usize, height: usize) -> Self {
        Self {
            jpeg,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }
}

impl fmt::Debug for CapturedFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedFrame")
            .field("bytes", &self.jpeg.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
