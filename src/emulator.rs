//! ChronoCube video chip integration
//!
//! This module provides the chip instance that owns the video state and the
//! compositor, decodes the host memory window and drives the frame loop.

use anyhow::Context;
use log::{debug, warn};

use crate::compositor::{Compositor, FrameStats};
use crate::core::VideoError;
use crate::core::constants::{NUM_PALETTES, NUM_TILE_LAYERS, PALETTE_SIZE, TILE_MAP_SIZE, VRAM_SIZE};
use crate::framebuffer::{Framebuffer, Presenter};
use crate::registers::{self, REGISTER_SPACE};
use crate::video_state::VideoState;

/// Bytes of host window per tile map
const TILE_MAP_BYTES: u32 = (TILE_MAP_SIZE * 2) as u32;

/// Main ChronoCube video chip state
pub struct ChronoCube {
    pub video: VideoState,
    compositor: Compositor,

    // Frame timing
    pub frame_count: u64,
}

impl ChronoCube {
    /// VRAM: 0x00000..0x0FFFF
    pub const VRAM_BASE: u32 = 0x00000;
    /// Palette RAM: 0x10000..0x10FFF
    pub const PALETTE_BASE: u32 = Self::VRAM_BASE + VRAM_SIZE as u32;
    /// Tile maps: 0x11000..0x12FFF
    pub const TILE_MAP_BASE: u32 = Self::PALETTE_BASE + (NUM_PALETTES * PALETTE_SIZE) as u32;
    /// Register file: 0x13000..0x13FFF
    pub const REGISTER_BASE: u32 = Self::TILE_MAP_BASE + NUM_TILE_LAYERS as u32 * TILE_MAP_BYTES;
    /// End of the decoded window
    pub const WINDOW_END: u32 = Self::REGISTER_BASE + REGISTER_SPACE;

    /// Create a new chip instance
    pub fn new() -> Self {
        Self {
            video: VideoState::new(),
            compositor: Compositor::new(),
            frame_count: 0,
        }
    }

    /// Reset the video state and frame counter
    pub fn reset(&mut self) {
        self.video.reset();
        self.frame_count = 0;
    }

    /// Read a byte from the host window
    pub fn read_memory(&self, addr: u32) -> u8 {
        match addr {
            a if a < Self::PALETTE_BASE => self.video.vram().read_u8((a - Self::VRAM_BASE) as usize),
            a if a < Self::TILE_MAP_BASE => {
                let offset = (a - Self::PALETTE_BASE) as usize;
                self.video
                    .palettes()
                    .get(offset / PALETTE_SIZE)
                    .map_or(0xFF, |palette| palette.read_u8(offset % PALETTE_SIZE))
            }
            a if a < Self::REGISTER_BASE => {
                let offset = a - Self::TILE_MAP_BASE;
                self.video
                    .tile_layer((offset / TILE_MAP_BYTES) as usize)
                    .map_or(0xFF, |layer| layer.read_u8((offset % TILE_MAP_BYTES) as usize))
            }
            a if a < Self::WINDOW_END => {
                // Registers are 16-bit, read as bytes
                let offset = a - Self::REGISTER_BASE;
                if offset & 1 == 0 {
                    (registers::read_register(&self.video, offset) & 0xFF) as u8
                } else {
                    (registers::read_register(&self.video, offset - 1) >> 8) as u8
                }
            }
            _ => 0xFF,
        }
    }

    /// Write a byte to the host window
    pub fn write_memory(&mut self, addr: u32, value: u8) {
        let result = match addr {
            a if a < Self::PALETTE_BASE => self.video.vram_mut().write_u8((a - Self::VRAM_BASE) as usize, value),
            a if a < Self::TILE_MAP_BASE => {
                let offset = (a - Self::PALETTE_BASE) as usize;
                self.video
                    .palettes_mut()
                    .get_mut(offset / PALETTE_SIZE)
                    .and_then(|palette| palette.write_u8(offset % PALETTE_SIZE, value))
            }
            a if a < Self::REGISTER_BASE => {
                let offset = a - Self::TILE_MAP_BASE;
                self.video
                    .tile_layer_mut((offset / TILE_MAP_BYTES) as usize)
                    .and_then(|layer| layer.write_u8((offset % TILE_MAP_BYTES) as usize, value))
            }
            a if a < Self::WINDOW_END => {
                // Registers are 16-bit, merge byte writes into the current value
                let offset = a - Self::REGISTER_BASE;
                if offset & 1 == 0 {
                    let current = registers::read_register(&self.video, offset);
                    let new_value = (current & 0xFF00) | (value as u16);
                    registers::write_register(&mut self.video, offset, new_value)
                } else {
                    let current = registers::read_register(&self.video, offset - 1);
                    let new_value = (current & 0x00FF) | ((value as u16) << 8);
                    registers::write_register(&mut self.video, offset - 1, new_value)
                }
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!("host write of {value:#04X} to {addr:#07X} dropped: {err}");
        }
    }

    /// Write a 16-bit register directly
    pub fn write_register(&mut self, offset: u32, value: u16) -> Result<(), VideoError> {
        registers::write_register(&mut self.video, offset, value)
    }

    pub fn read_register(&self, offset: u32) -> u16 {
        registers::read_register(&self.video, offset)
    }

    /// Composite the current state without presenting it
    pub fn render_frame(&mut self) -> &Framebuffer {
        self.compositor.render(&self.video)
    }

    /// Composite one frame and hand it to `presenter`
    pub fn step_frame(&mut self, presenter: &mut dyn Presenter) -> anyhow::Result<FrameStats> {
        let frame = self.compositor.render(&self.video);
        presenter
            .present(frame, self.video.palettes())
            .with_context(|| format!("presenting frame {}", self.frame_count))?;
        self.frame_count += 1;
        Ok(self.compositor.last_stats())
    }

    /// Run the chip for a specified number of frames
    pub fn run_frames(&mut self, num_frames: u64, presenter: &mut dyn Presenter) -> anyhow::Result<()> {
        for _ in 0..num_frames {
            self.step_frame(presenter)?;
        }
        debug!("ran {num_frames} frames, {} total", self.frame_count);
        Ok(())
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Get current execution statistics
    pub fn stats(&self) -> EmulatorStats {
        EmulatorStats {
            frame_count: self.frame_count,
            last_frame: self.compositor.last_stats(),
        }
    }
}

impl Default for ChronoCube {
    fn default() -> Self {
        Self::new()
    }
}

/// Chip execution statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmulatorStats {
    pub frame_count: u64,
    pub last_frame: FrameStats,
}
