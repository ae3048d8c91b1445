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

//! Complete host-visible state of the video chip.
//!
//! [`VideoState`] owns VRAM, palette RAM, the tile layer array and the sprite
//! table. All arrays are allocated once in [`VideoState::new`] and never
//! reallocated. Layers and sprites are reached through checked index access
//! ([`VideoState::tile_layer_mut`], [`VideoState::sprite_mut`]) which fails
//! with a [`VideoError`] instead of handing out an out-of-range entry.
//!
//! The state is plain data and `Clone`; a host that mutates from another
//! thread than the one compositing can publish a cloned snapshot at a frame
//! boundary.

use bitflags::bitflags;

use crate::core::constants::{NUM_SPRITES, NUM_TILE_LAYERS};
use crate::core::{VideoError, VideoMemory};
use crate::palette::{PaletteTable, Rgb};
use crate::sprite::Sprite;
use crate::tile_layer::TileLayer;

bitflags! {
    /// Global output control bits (DISPCTL)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisplayFlags: u8 {
        const ENABLED = 0x01;
        const BLANKED = 0x02;
    }
}

#[derive(Clone)]
pub struct VideoState {
    vram: VideoMemory,
    palettes: PaletteTable,
    tile_layers: [TileLayer; NUM_TILE_LAYERS],
    sprites: [Sprite; NUM_SPRITES],
    display: DisplayFlags,
    scroll_x: u16,
    scroll_y: u16,
}

impl VideoState {
    pub fn new() -> Self {
        Self {
            vram: VideoMemory::new(),
            palettes: PaletteTable::new(),
            tile_layers: std::array::from_fn(|_| TileLayer::new()),
            sprites: [Sprite::new(); NUM_SPRITES],
            display: DisplayFlags::empty(),
            scroll_x: 0,
            scroll_y: 0,
        }
    }

    /// Return every register, map and memory to its power-on value
    pub fn reset(&mut self) {
        self.vram.clear();
        self.palettes = PaletteTable::new();
        self.tile_layers.iter_mut().for_each(TileLayer::reset);
        self.sprites.fill(Sprite::new());
        self.display = DisplayFlags::empty();
        self.scroll_x = 0;
        self.scroll_y = 0;
    }

    /// Bulk copy into VRAM
    pub fn set_vram_data(&mut self, offset: usize, data: &[u8]) -> Result<(), VideoError> {
        self.vram.write(offset, data)
    }

    pub fn vram(&self) -> &VideoMemory {
        &self.vram
    }

    pub(crate) fn vram_mut(&mut self) -> &mut VideoMemory {
        &mut self.vram
    }

    /// Bulk load a palette
    pub fn set_palette_data(&mut self, index: usize, data: &[u8]) -> Result<(), VideoError> {
        self.palettes.set_data(index, data)
    }

    /// Set colour `entry` of palette `index`
    pub fn set_palette_entry(
        &mut self,
        index: usize,
        entry: usize,
        color: Rgb,
    ) -> Result<(), VideoError> {
        self.palettes.set_entry(index, entry, color)
    }

    pub fn palettes(&self) -> &PaletteTable {
        &self.palettes
    }

    pub(crate) fn palettes_mut(&mut self) -> &mut PaletteTable {
        &mut self.palettes
    }

    pub fn set_output_enable(&mut self, enabled: bool) {
        self.display.set(DisplayFlags::ENABLED, enabled);
    }

    pub fn set_output_blank(&mut self, blanked: bool) {
        self.display.set(DisplayFlags::BLANKED, blanked);
    }

    pub fn display_flags(&self) -> DisplayFlags {
        self.display
    }

    pub fn set_display_flags(&mut self, flags: DisplayFlags) {
        self.display = flags;
    }

    /// Output is enabled and not blanked
    pub fn output_visible(&self) -> bool {
        self.display == DisplayFlags::ENABLED
    }

    /// Global scroll offset, subtracted from every layer and sprite position
    pub fn set_scroll_offset(&mut self, x: u16, y: u16) {
        self.scroll_x = x;
        self.scroll_y = y;
    }

    pub fn scroll_offset(&self) -> (u16, u16) {
        (self.scroll_x, self.scroll_y)
    }

    pub fn tile_layer(&self, index: usize) -> Result<&TileLayer, VideoError> {
        self.tile_layers
            .get(index)
            .ok_or(VideoError::InvalidTileLayer(index))
    }

    pub fn tile_layer_mut(&mut self, index: usize) -> Result<&mut TileLayer, VideoError> {
        self.tile_layers
            .get_mut(index)
            .ok_or(VideoError::InvalidTileLayer(index))
    }

    pub fn tile_layers(&self) -> &[TileLayer] {
        &self.tile_layers
    }

    pub fn sprite(&self, index: usize) -> Result<&Sprite, VideoError> {
        self.sprites
            .get(index)
            .ok_or(VideoError::InvalidSprite(index))
    }

    pub fn sprite_mut(&mut self, index: usize) -> Result<&mut Sprite, VideoError> {
        self.sprites
            .get_mut(index)
            .ok_or(VideoError::InvalidSprite(index))
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
}

impl Default for VideoState {
    fn default() -> Self {
        Self::new()
    }
}
