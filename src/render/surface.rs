use std::sync::Arc;

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{RetouchError, RetouchResult};
use crate::foundation::math::Fnv1a64;

/// The mutable pixel buffer operations read from and write to.
///
/// Pixels are **premultiplied** RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> RetouchResult<Self> {
        let len = byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    /// Allocate a surface filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> RetouchResult<Self> {
        let mut s = Self::new(width, height)?;
        s.fill(color);
        Ok(s)
    }

    /// Wrap an existing premultiplied RGBA8 buffer.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> RetouchResult<Self> {
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(RetouchError::validation(format!(
                "surface data length {} does not match {width}x{height}x4 = {expected}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Premultiply and wrap a straight-alpha RGBA8 buffer.
    pub fn from_rgba8_straight(width: u32, height: u32, mut data: Vec<u8>) -> RetouchResult<Self> {
        for px in data.chunks_exact_mut(4) {
            let c = Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]);
            px.copy_from_slice(&c.to_array());
        }
        Self::from_rgba8_premul(width, height, data)
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw premultiplied bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw premultiplied bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the surface and return its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read one pixel. Out-of-bounds reads are transparent.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        Rgba8Premul::from_array(self.px(x as i64, y as i64))
    }

    /// Write one pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba8Premul) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = self.index(x, y);
        self.data[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for c in self.data.chunks_exact_mut(4) {
            c.copy_from_slice(&px);
        }
    }

    /// Stable content hash (dimensions + bytes), handy for change detection.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new_default();
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_bytes(&self.data);
        h.finish()
    }

    pub(crate) fn same_size(&self, other: &Surface) -> bool {
        self.width == other.width && self.height == other.height
    }

    pub(crate) fn px(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = self.index(x as u32, y as u32);
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub(crate) fn px_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let idx = self.index(x, y);
        &mut self.data[idx..idx + 4]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }
}

fn byte_len(width: u32, height: u32) -> RetouchResult<usize> {
    if width == 0 || height == 0 {
        return Err(RetouchError::validation(format!(
            "surface dimensions must be non-zero, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| RetouchError::validation("surface byte size overflow"))
}

/// An immutable copy of a surface taken at a point in time.
///
/// Cloning a snapshot is cheap and never aliases the live surface it came from.
#[derive(Clone, Debug)]
pub struct Snapshot {
    pixels: Arc<Surface>,
}

impl Snapshot {
    pub(crate) fn capture(surface: &Surface) -> Self {
        Self {
            pixels: Arc::new(surface.clone()),
        }
    }

    /// Snapshot width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width
    }

    /// Snapshot height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height
    }

    /// Borrow the captured pixels.
    pub fn surface(&self) -> &Surface {
        &self.pixels
    }

    /// Copy the captured pixels into a new owned surface.
    pub fn to_surface(&self) -> Surface {
        Surface::clone(&self.pixels)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
