use crate::errors::{EqualizeError, Result};

/// Channel counts accepted by the pipeline. Alpha is removed before
/// equalization, so only gray and RGB remain.
pub const SUPPORTED_CHANNELS: &[u8] = &[1, 3];

fn expected_len(width: u32, height: u32, channels: u8) -> Result<usize> {
    if !SUPPORTED_CHANNELS.contains(&channels) {
        return Err(EqualizeError::InvalidBuffer {
            message: format!("unsupported channel count {} (alpha must be removed first)", channels),
        });
    }

    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels as usize))
        .ok_or_else(|| EqualizeError::InvalidBuffer {
            message: format!("{}x{}x{} overflows the address space", width, height, channels),
        })
}

/// Borrowed view of row-major, channel-interleaved 8-bit samples.
#[derive(Debug, Clone, Copy)]
pub struct PixelBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    channels: u8,
}

impl<'a> PixelBuffer<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: u8) -> Result<Self> {
        let expected = expected_len(width, height, channels)?;
        if data.len() != expected {
            return Err(EqualizeError::InvalidBuffer {
                message: format!(
                    "{}x{}x{} needs {} samples, got {}",
                    width,
                    height,
                    channels,
                    expected,
                    data.len()
                ),
            });
        }

        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    pub fn samples(&self) -> &'a [u8] {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// width * height * channels
    pub fn sample_count(&self) -> usize {
        self.data.len()
    }
}

/// Owned image samples with the same shape rules as [`PixelBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedPixels {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl OwnedPixels {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self> {
        PixelBuffer::new(&data, width, height, channels)?;
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    pub fn as_buffer(&self) -> PixelBuffer<'_> {
        PixelBuffer {
            data: &self.data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }
}
