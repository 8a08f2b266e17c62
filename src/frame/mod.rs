use crate::ErrorBox;
use std::borrow::Cow;

pub mod capturer;
pub mod sink;

const CHANNELS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

/// A single captured picture, 8 bits per channel, 3 channels per pixel.
///
/// Rows start every `stride` bytes, bytes after `width * 3` in a row are padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    stride: usize,
    order: ChannelOrder,
    data: Vec<u8>,
}

impl Frame {
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        order: ChannelOrder,
        data: Vec<u8>,
    ) -> Result<Self, ErrorBox> {
        if width == 0 || height == 0 {
            Err(format!("Empty {width}x{height} frame"))?;
        }

        let row_len = width as usize * CHANNELS;
        if stride < row_len {
            Err(format!("Stride {stride} is too small for {width} pixels"))?;
        }

        let required = stride * (height as usize - 1) + row_len;
        if data.len() < required {
            Err(format!(
                "Incomplete {width}x{height} frame: got {} bytes, expected {required}",
                data.len()
            ))?;
        }

        Ok(Self {
            width,
            height,
            stride,
            order,
            data,
        })
    }

    #[cfg(test)]
    pub fn packed(width: u32, height: u32, order: ChannelOrder, data: Vec<u8>) -> Self {
        Self::new(width, height, width as usize * CHANNELS, order, data)
            .expect("Invalid packed frame")
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn row_len(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Pixel bytes of every row, without padding.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let row_len = self.row_len();
        self.data
            .chunks(self.stride)
            .take(self.height as usize)
            .map(move |row| &row[..row_len])
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> {
        let row_len = self.row_len();
        self.data
            .chunks_mut(self.stride)
            .take(self.height as usize)
            .map(move |row| &mut row[..row_len])
    }

    pub fn into_rgb(mut self) -> Self {
        if self.order == ChannelOrder::Bgr {
            self.rows_mut()
                .flat_map(|row| row.chunks_exact_mut(CHANNELS))
                .for_each(|pixel| pixel.swap(0, 2));
            self.order = ChannelOrder::Rgb;
        }
        self
    }

    /// Pixel bytes with rows laid out back to back, as expected by textures.
    pub fn packed_pixels(&self) -> Cow<'_, [u8]> {
        let row_len = self.row_len();
        let len = row_len * self.height as usize;
        if self.stride == row_len {
            Cow::Borrowed(&self.data[..len])
        } else {
            let mut pixels = Vec::with_capacity(len);
            self.rows().for_each(|row| pixels.extend_from_slice(row));
            Cow::Owned(pixels)
        }
    }
}
