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

//! Scrollable tile layers.

use crate::core::VideoError;
use crate::core::constants::{NUM_PALETTES, OPAQUE, TILE_MAP_HEIGHT, TILE_MAP_SIZE, TILE_MAP_WIDTH};

/// A 32x32 grid of 16-bit tile indices plus its latched attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileLayer {
    tiles: Box<[u16]>,
    enabled: bool,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    alpha: u8,
    palette: u8,
}

impl TileLayer {
    pub fn new() -> Self {
        Self {
            tiles: vec![0; TILE_MAP_SIZE].into_boxed_slice(),
            enabled: false,
            x: 0,
            y: 0,
            width: TILE_MAP_WIDTH as u16,
            height: TILE_MAP_HEIGHT as u16,
            alpha: OPAQUE,
            palette: 0,
        }
    }

    /// Clear the map and restore power-on attributes without reallocating
    pub fn reset(&mut self) {
        self.tiles.fill(0);
        self.enabled = false;
        self.x = 0;
        self.y = 0;
        self.alpha = OPAQUE;
        self.palette = 0;
    }

    /// Bulk copy little-endian tile indices into the start of the tile map.
    ///
    /// `data` is the row-major, width-aligned layout produced by the map
    /// converter. Entries past the end of `data` keep their old value.
    pub fn set_data(&mut self, data: &[u8]) -> Result<(), VideoError> {
        if data.len() % 2 != 0 {
            return Err(VideoError::MisalignedTileData(data.len()));
        }
        if data.len() / 2 > self.tiles.len() {
            return Err(VideoError::TileDataTooLarge(data.len()));
        }
        for (tile, bytes) in self.tiles.iter_mut().zip(data.chunks_exact(2)) {
            *tile = u16::from_le_bytes([bytes[0], bytes[1]]);
        }
        Ok(())
    }

    /// Replace the whole map from rows `row_width` entries wide.
    ///
    /// Rows narrower than the map are placed at the left edge; every cell
    /// outside the source rectangle is reset to tile 0.
    pub fn load_rows(&mut self, data: &[u8], row_width: usize) -> Result<(), VideoError> {
        if data.len() % 2 != 0 {
            return Err(VideoError::MisalignedTileData(data.len()));
        }
        let entries = data.len() / 2;
        let rows = match row_width {
            0 if entries > 0 => return Err(VideoError::TileDataTooLarge(data.len())),
            0 => 0,
            width => entries.div_ceil(width),
        };
        if row_width > self.width as usize || rows > self.height as usize {
            return Err(VideoError::TileDataTooLarge(data.len()));
        }

        self.tiles.fill(0);
        for (i, bytes) in data.chunks_exact(2).enumerate() {
            let (x, y) = (i % row_width, i / row_width);
            self.tiles[x + self.width as usize * y] = u16::from_le_bytes([bytes[0], bytes[1]]);
        }
        Ok(())
    }

    fn cell_offset(&self, x: usize, y: usize) -> Result<usize, VideoError> {
        let (width, height) = (self.width as usize, self.height as usize);
        if x >= width || y >= height {
            return Err(VideoError::TileCellOutOfRange { x, y, width, height });
        }
        Ok(x + width * y)
    }

    /// Set the tile at cell (x, y)
    pub fn set_data_at(&mut self, value: u16, x: usize, y: usize) -> Result<(), VideoError> {
        let offset = self.cell_offset(x, y)?;
        self.tiles[offset] = value;
        Ok(())
    }

    pub fn tile_at(&self, x: usize, y: usize) -> Option<u16> {
        self.cell_offset(x, y).ok().map(|offset| self.tiles[offset])
    }

    /// Flat row-major tile map
    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    /// Set translation offset in world space
    pub fn set_offset(&mut self, x: u16, y: u16) {
        self.x = x;
        self.y = y;
    }

    pub fn offset(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_alpha(&mut self, alpha: u8) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Select the palette used to colour this layer
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

    /// Map size in tiles
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width as usize, self.height as usize)
    }

    /// Byte view of the map for the host memory window (little-endian entries)
    pub fn read_u8(&self, offset: usize) -> u8 {
        match self.tiles.get(offset / 2) {
            Some(tile) => tile.to_le_bytes()[offset % 2],
            None => 0xFF,
        }
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) -> Result<(), VideoError> {
        let tile = self
            .tiles
            .get_mut(offset / 2)
            .ok_or(VideoError::TileDataTooLarge(offset + 1))?;
        let mut bytes = tile.to_le_bytes();
        bytes[offset % 2] = value;
        *tile = u16::from_le_bytes(bytes);
        Ok(())
    }
}

impl Default for TileLayer {
    fn default() -> Self {
        Self::new()
    }
}
