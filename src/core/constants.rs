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

//! Fixed hardware geometry of the ChronoCube video chip.

/// Screen resolution
pub const SCREEN_WIDTH: usize = 320;
pub const SCREEN_HEIGHT: usize = 240;

/// VRAM size (64KB)
pub const VRAM_SIZE: usize = 64 * 1024;

pub const NUM_PALETTES: usize = 4;
pub const NUM_COLORS_PER_PALETTE: usize = 256;
/// Palette entries are packed as `r, g, b, pad`
pub const PALETTE_ENTRY_SIZE: usize = 4;
pub const PALETTE_SIZE: usize = NUM_COLORS_PER_PALETTE * PALETTE_ENTRY_SIZE;

/// Individual tile size, one byte per pixel
pub const TILE_WIDTH: usize = 16;
pub const TILE_HEIGHT: usize = 16;
pub const TILE_SIZE: usize = TILE_WIDTH * TILE_HEIGHT;

/// Number of whole tiles VRAM can hold
pub const NUM_TILES: usize = VRAM_SIZE / TILE_SIZE;

pub const NUM_TILE_LAYERS: usize = 4;
pub const TILE_MAP_WIDTH: usize = 32;
pub const TILE_MAP_HEIGHT: usize = 32;
pub const TILE_MAP_SIZE: usize = TILE_MAP_WIDTH * TILE_MAP_HEIGHT;

/// Pixel dimensions of a full tile layer
pub const TILE_LAYER_WIDTH: usize = TILE_WIDTH * TILE_MAP_WIDTH;
pub const TILE_LAYER_HEIGHT: usize = TILE_HEIGHT * TILE_MAP_HEIGHT;

pub const NUM_SPRITES: usize = 128;

/// Alpha latched into layers and sprites at init (fully opaque)
pub const OPAQUE: u8 = 0xFF;
