use super::constants::{NUM_TILES, TILE_SIZE, VRAM_SIZE};
use super::error::VideoError;

/// 64KB video memory bank holding raw 8bpp tile pixels.
///
/// VRAM is laid out as a single column of tiles `TILE_WIDTH` pixels wide, so
/// tile `n` occupies bytes `n * TILE_SIZE .. (n + 1) * TILE_SIZE`.
#[derive(Clone)]
pub struct VideoMemory {
    bytes: Box<[u8]>,
}

impl VideoMemory {
    pub const SIZE: usize = VRAM_SIZE;

    pub fn new() -> Self {
        Self {
            bytes: vec![0; Self::SIZE].into_boxed_slice(),
        }
    }

    fn span(offset: usize, len: usize) -> Result<std::ops::Range<usize>, VideoError> {
        offset
            .checked_add(len)
            .filter(|&end| end <= Self::SIZE)
            .map(|end| offset..end)
            .ok_or(VideoError::VramOutOfRange { offset, len })
    }

    /// Bulk copy `data` into VRAM starting at `offset`
    pub fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), VideoError> {
        let range = Self::span(offset, data.len())?;
        self.bytes[range].copy_from_slice(data);
        Ok(())
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], VideoError> {
        let range = Self::span(offset, len)?;
        Ok(&self.bytes[range])
    }

    /// Read a single byte, unmapped offsets read as 0xff
    pub fn read_u8(&self, offset: usize) -> u8 {
        self.bytes.get(offset).copied().unwrap_or(0xFF)
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), VideoError> {
        let cell = self
            .bytes
            .get_mut(offset)
            .ok_or(VideoError::VramOutOfRange { offset, len: 1 })?;
        *cell = value;
        Ok(())
    }

    /// Pixel data of tile `index`, or `None` when the tile would lie past the end of VRAM
    pub fn tile(&self, index: u16) -> Option<&[u8]> {
        let index = index as usize;
        if index >= NUM_TILES {
            return None;
        }
        let start = index * TILE_SIZE;
        Some(&self.bytes[start..start + TILE_SIZE])
    }

    /// Zero the whole bank in place
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for VideoMemory {
    fn default() -> Self {
        Self::new()
    }
}
