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

//! Memory-mapped 16-bit register file of the video chip.
//!
//! | Offset            | Register            |
//! |-------------------|---------------------|
//! | `0x000`           | DISPCTL             |
//! | `0x002`, `0x004`  | SCROLL_X, SCROLL_Y  |
//! | `0x100 + 0x10*n`  | layer `n` block     |
//! | `0x200 + 0x10*n`  | sprite `n` block    |
//!
//! Layer and sprite blocks start with a CTRL word (bit 0 enable, bits 8-9
//! palette) followed by X, Y and ALPHA; sprites add TILE.

use bitflags::bitflags;
use log::trace;

use crate::core::VideoError;
use crate::core::constants::{NUM_SPRITES, NUM_TILE_LAYERS};
use crate::video_state::{DisplayFlags, VideoState};

pub const DISPCTL: u32 = 0x000;
pub const SCROLL_X: u32 = 0x002;
pub const SCROLL_Y: u32 = 0x004;

pub const LAYER_BASE: u32 = 0x100;
pub const SPRITE_BASE: u32 = 0x200;
const BLOCK_STRIDE: u32 = 0x10;

/// Register offsets within a layer or sprite block
pub const CTRL: u32 = 0x0;
pub const POS_X: u32 = 0x2;
pub const POS_Y: u32 = 0x4;
pub const ALPHA: u32 = 0x6;
pub const TILE: u32 = 0x8;

/// Size of the register window in bytes
pub const REGISTER_SPACE: u32 = 0x1000;

const PALETTE_SHIFT: u16 = 8;
const PALETTE_MASK: u16 = 0x3;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ControlFlags: u16 {
        const ENABLE = 0x0001;
    }
}

fn control_word(enabled: bool, palette: usize) -> u16 {
    let mut word = ((palette as u16) & PALETTE_MASK) << PALETTE_SHIFT;
    if enabled {
        word |= ControlFlags::ENABLE.bits();
    }
    word
}

fn control_fields(word: u16) -> (bool, usize) {
    let enabled = ControlFlags::from_bits_truncate(word).contains(ControlFlags::ENABLE);
    (enabled, ((word >> PALETTE_SHIFT) & PALETTE_MASK) as usize)
}

/// Decoded register address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    DisplayControl,
    ScrollX,
    ScrollY,
    Layer { index: usize, field: u32 },
    Sprite { index: usize, field: u32 },
}

impl Register {
    /// Decode a byte offset; odd offsets and holes decode to `None`.
    pub fn decode(offset: u32) -> Option<Self> {
        if offset & 1 != 0 {
            return None;
        }
        match offset {
            DISPCTL => Some(Self::DisplayControl),
            SCROLL_X => Some(Self::ScrollX),
            SCROLL_Y => Some(Self::ScrollY),
            _ => {
                let block = |base: u32, count: usize, last_field: u32| {
                    let rel = offset.checked_sub(base)?;
                    let index = (rel / BLOCK_STRIDE) as usize;
                    let field = rel % BLOCK_STRIDE;
                    (index < count && field <= last_field).then_some((index, field))
                };
                if let Some((index, field)) = block(LAYER_BASE, NUM_TILE_LAYERS, ALPHA) {
                    Some(Self::Layer { index, field })
                } else {
                    block(SPRITE_BASE, NUM_SPRITES, TILE).map(|(index, field)| Self::Sprite { index, field })
                }
            }
        }
    }
}

/// Read a 16-bit register. Unmapped offsets read as 0xFFFF.
pub fn read_register(video: &VideoState, offset: u32) -> u16 {
    let Some(register) = Register::decode(offset) else {
        return 0xFFFF;
    };
    match register {
        Register::DisplayControl => video.display_flags().bits() as u16,
        Register::ScrollX => video.scroll_offset().0,
        Register::ScrollY => video.scroll_offset().1,
        Register::Layer { index, field } => match video.tile_layer(index) {
            Ok(layer) => match field {
                CTRL => control_word(layer.is_enabled(), layer.palette()),
                POS_X => layer.offset().0,
                POS_Y => layer.offset().1,
                ALPHA => layer.alpha() as u16,
                _ => 0xFFFF,
            },
            Err(_) => 0xFFFF,
        },
        Register::Sprite { index, field } => match video.sprite(index) {
            Ok(sprite) => match field {
                CTRL => control_word(sprite.is_enabled(), sprite.palette()),
                POS_X => sprite.location().0,
                POS_Y => sprite.location().1,
                ALPHA => sprite.alpha() as u16,
                TILE => sprite.tile(),
                _ => 0xFFFF,
            },
            Err(_) => 0xFFFF,
        },
    }
}

/// Write a 16-bit register. Writes to unmapped offsets are ignored.
pub fn write_register(video: &mut VideoState, offset: u32, value: u16) -> Result<(), VideoError> {
    let Some(register) = Register::decode(offset) else {
        trace!("ignoring write of {value:#06X} to unmapped register {offset:#05X}");
        return Ok(());
    };
    trace!("register {register:?} <- {value:#06X}");

    match register {
        Register::DisplayControl => {
            video.set_display_flags(DisplayFlags::from_bits_truncate(value as u8));
        }
        Register::ScrollX => {
            let (_, y) = video.scroll_offset();
            video.set_scroll_offset(value, y);
        }
        Register::ScrollY => {
            let (x, _) = video.scroll_offset();
            video.set_scroll_offset(x, value);
        }
        Register::Layer { index, field } => {
            let layer = video.tile_layer_mut(index)?;
            match field {
                CTRL => {
                    let (enabled, palette) = control_fields(value);
                    layer.set_palette(palette)?;
                    layer.set_enabled(enabled);
                }
                POS_X => layer.set_offset(value, layer.offset().1),
                POS_Y => layer.set_offset(layer.offset().0, value),
                ALPHA => layer.set_alpha(value as u8),
                _ => {}
            }
        }
        Register::Sprite { index, field } => {
            let sprite = video.sprite_mut(index)?;
            match field {
                CTRL => {
                    let (enabled, palette) = control_fields(value);
                    sprite.set_palette(palette)?;
                    sprite.set_enabled(enabled);
                }
                POS_X => sprite.set_location(value, sprite.location().1),
                POS_Y => sprite.set_location(sprite.location().0, value),
                ALPHA => sprite.set_alpha(value as u8),
                TILE => sprite.set_tile(value),
                _ => {}
            }
        }
    }
    Ok(())
}
