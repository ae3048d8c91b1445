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

//! ChronoCube video subsystem emulator
//!
//! This library provides the video chip of the ChronoCube console: VRAM,
//! palette RAM, tile layers, sprites, the register file and the compositor
//! that turns them into a 320x240 frame.

pub mod compositor;
pub mod core;
pub mod emulator;
pub mod framebuffer;
pub mod palette;
pub mod registers;
pub mod resource;
pub mod sprite;
pub mod tile_layer;
pub mod video_state;

// Re-export commonly used types
pub use compositor::{Compositor, FrameStats};
pub use core::{VideoError, VideoMemory};
pub use emulator::{ChronoCube, EmulatorStats};
pub use framebuffer::{Framebuffer, NullPresenter, PpmPresenter, Presenter};
pub use palette::{PaletteTable, Rgb};
pub use resource::ResourceManifest;
pub use sprite::Sprite;
pub use tile_layer::TileLayer;
pub use video_state::{DisplayFlags, VideoState};
