//! Sprite attribute table entries.

use crate::core::VideoError;
use crate::core::constants::{NUM_PALETTES, OPAQUE};

/// One sprite: a single VRAM tile drawn at a world-space location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    enabled: bool,
    x: u16,
    y: u16,
    alpha: u8,
    palette: u8,
    tile: u16,
}

impl Sprite {
    pub const fn new() -> Self {
        Self {
            enabled: false,
            x: 0,
            y: 0,
            alpha: OPAQUE,
            palette: 0,
            tile: 0,
        }
    }

    /// Set the location of the sprite in world space
    pub fn set_location(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    pub fn location(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_palette(&mut self, palette: usize) -> Result<(), VideoError> {
        if palette >= NUM_PALETTES {
            return Err(VideoError::InvalidPalette(palette));
        }
        self.palette = palette as u8;
        Ok(())
    }

    pub fn palette(&self) -> usize {
        self.palette as usize
    }

    /// Select the VRAM tile drawn for this sprite. Indices past the end of
    /// VRAM are accepted and render as tile 0.
    pub fn set_tile(&mut self, tile: u16) {
        self.tile = tile;
    }

    pub fn tile(&self) -> u16 {
        self.tile
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::new()
    }
}
