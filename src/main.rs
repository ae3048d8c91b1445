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

// Render one frame of a tile-map scene to a PPM image.
//
// Usage: chronocube [manifest.res] [output.ppm]
use std::path::PathBuf;

use anyhow::Context;
use chronocube_core::core::constants::{TILE_HEIGHT, TILE_MAP_HEIGHT, TILE_MAP_WIDTH, TILE_WIDTH};
use chronocube_core::resource::{self, ResourceManifest};
use chronocube_core::{ChronoCube, PpmPresenter, Rgb};

/// Checkerboard of two tiles with a border sprite, used when no manifest is given
fn load_demo_scene(chip: &mut ChronoCube) -> anyhow::Result<()> {
    let video = &mut chip.video;

    let mut tiles = vec![0u8; TILE_WIDTH * TILE_HEIGHT * 3];
    for (i, pixel) in tiles.iter_mut().enumerate() {
        let tile = i / (TILE_WIDTH * TILE_HEIGHT);
        let (x, y) = (i % TILE_WIDTH, (i / TILE_WIDTH) % TILE_HEIGHT);
        *pixel = match tile {
            0 => 1,
            1 => 2,
            _ if x == 0 || y == 0 || x == TILE_WIDTH - 1 || y == TILE_HEIGHT - 1 => 3,
            _ => 0,
        };
    }
    video.set_vram_data(0, &tiles)?;

    video.set_palette_entry(0, 1, Rgb::new(0x20, 0x20, 0x60))?;
    video.set_palette_entry(0, 2, Rgb::new(0x40, 0x40, 0xA0))?;
    video.set_palette_entry(0, 3, Rgb::new(0xFF, 0xFF, 0xFF))?;

    let layer = video.tile_layer_mut(0)?;
    for y in 0..TILE_MAP_HEIGHT {
        for x in 0..TILE_MAP_WIDTH {
            layer.set_data_at(((x + y) % 2) as u16, x, y)?;
        }
    }
    layer.set_enabled(true);

    let sprite = video.sprite_mut(0)?;
    sprite.set_tile(2);
    sprite.set_location(152, 112);
    sprite.set_enabled(true);

    video.set_output_enable(true);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("ChronoCube Video Emulator v0.1.0");
    println!("================================");
    println!();

    let mut args = std::env::args().skip(1);
    let manifest = args.next().map(PathBuf::from);
    let output = args.next().map_or_else(|| PathBuf::from("frame.ppm"), PathBuf::from);

    let mut chip = ChronoCube::new();
    match &manifest {
        Some(path) => {
            println!("Loading tile maps from {}...", path.display());
            let manifest = ResourceManifest::load(path)?;
            let count = resource::load_layers(&manifest, &mut chip.video)?;
            for index in 0..count {
                chip.video.tile_layer_mut(index)?.set_enabled(true);
            }
            chip.video.set_output_enable(true);
            println!("  Loaded {count} layer(s)");
        }
        None => {
            println!("No manifest given, using the built-in demo scene");
            load_demo_scene(&mut chip).context("building demo scene")?;
        }
    }
    println!();

    let mut presenter = PpmPresenter::new(output.clone());
    let frame = chip.step_frame(&mut presenter)?;

    println!("Frame written to {}", output.display());
    println!("  Layers drawn:   {}", frame.layers_drawn);
    println!("  Layer blits:    {}", frame.layer_blits);
    println!("  Sprites drawn:  {}", frame.sprites_drawn);
    println!("  Invalid tiles:  {}", frame.invalid_tiles);
    println!("  Frames:         {}", chip.stats().frame_count);
    Ok(())
}
