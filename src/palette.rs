// Copyright (C) 2013 Simon Que
// Copyright (C) 2025 Dayton Fishell
// ChronoCube Video Emulator
// This file is part of ChronoCube.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version. See the LICENSE file in the project root for details.
// SPDX-License-Identifier: GPL-3.0-or-later

//! Palette RAM: four independently selectable 256-colour palettes.
//!
//! Each palette is stored exactly as the host uploads it, a packed buffer of
//! `r, g, b, pad` entries, so bulk loads are plain byte copies. The compositor
//! resolves colour indices through [`Palette::lookup_table`], which expands a
//! palette into `0x00RRGGBB` pixels once per layer per frame.

use crate::core::VideoError;
use crate::core::constants::{NUM_COLORS_PER_PALETTE, NUM_PALETTES, PALETTE_ENTRY_SIZE, PALETTE_SIZE};

/// 24-bit colour value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Pack into the framebuffer's `0x00RRGGBB` pixel format
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_u32(pixel: u32) -> Self {
        Self::new((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
    }
}

/// A single 256-entry palette.
#[derive(Clone)]
pub struct Palette {
    data: [u8; PALETTE_SIZE],
}

impl Palette {
    pub fn new() -> Self {
        Self {
            data: [0; PALETTE_SIZE],
        }
    }

    /// Overwrite the start of the palette with packed `r, g, b, pad` entries.
    pub fn load(&mut self, data: &[u8]) -> Result<(), VideoError> {
        if data.len() > PALETTE_SIZE {
            return Err(VideoError::PaletteDataTooLarge(data.len()));
        }
        self.data[..data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Overwrite one colour entry.
    pub fn set_entry(&mut self, entry: usize, color: Rgb) -> Result<(), VideoError> {
        let slot = self
            .data
            .chunks_exact_mut(PALETTE_ENTRY_SIZE)
            .nth(entry)
            .ok_or(VideoError::InvalidPaletteEntry(entry))?;
        slot[..3].copy_from_slice(&[color.r, color.g, color.b]);
        Ok(())
    }

    /// Colour stored at `index`. Every 8bpp pixel value names a valid entry.
    pub fn color(&self, index: u8) -> Rgb {
        let base = index as usize * PALETTE_ENTRY_SIZE;
        Rgb::new(self.data[base], self.data[base + 1], self.data[base + 2])
    }

    /// Expand the palette into framebuffer pixels indexed by colour index.
    pub fn lookup_table(&self) -> [u32; NUM_COLORS_PER_PALETTE] {
        let mut table = [0u32; NUM_COLORS_PER_PALETTE];
        for (slot, entry) in table.iter_mut().zip(self.data.chunks_exact(PALETTE_ENTRY_SIZE)) {
            *slot = Rgb::new(entry[0], entry[1], entry[2]).to_u32();
        }
        table
    }

    /// Raw packed palette bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn read_u8(&self, offset: usize) -> u8 {
        self.data.get(offset).copied().unwrap_or(0xFF)
    }

    /// Byte-granular write used by the host memory window.
    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), VideoError> {
        let cell = self
            .data
            .get_mut(offset)
            .ok_or(VideoError::InvalidPaletteEntry(offset / PALETTE_ENTRY_SIZE))?;
        *cell = value;
        Ok(())
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

/// All palettes of the chip, addressed by palette index.
#[derive(Clone, Default)]
pub struct PaletteTable {
    palettes: [Palette; NUM_PALETTES],
}

impl PaletteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Result<&Palette, VideoError> {
        self.palettes
            .get(index)
            .ok_or(VideoError::InvalidPalette(index))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut Palette, VideoError> {
        self.palettes
            .get_mut(index)
            .ok_or(VideoError::InvalidPalette(index))
    }

    /// Bulk load palette `index`
    pub fn set_data(&mut self, index: usize, data: &[u8]) -> Result<(), VideoError> {
        self.get_mut(index)?.load(data)
    }

    /// Set colour `entry` of palette `index`
    pub fn set_entry(&mut self, index: usize, entry: usize, color: Rgb) -> Result<(), VideoError> {
        self.get_mut(index)?.set_entry(entry, color)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Palette> {
        self.palettes.iter()
    }
}
