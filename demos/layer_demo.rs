//! Tile Layer Demo
//!
//! Demonstrates the tile layer pipeline:
//! - Palette and tile loading
//! - Layer offsets and wrap-around
//! - Layer alpha blending
//! - Sprites on top of the layers

use chronocube_core::core::constants::{SCREEN_HEIGHT, SCREEN_WIDTH, TILE_HEIGHT, TILE_SIZE, TILE_WIDTH};
use chronocube_core::{ChronoCube, NullPresenter, Rgb};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("ChronoCube Tile Layer Demo");
    println!("==========================\n");

    let mut chip = ChronoCube::new();
    let video = &mut chip.video;

    // Load a simple palette
    println!("Loading palette...");
    let colors = [
        Rgb::new(0x00, 0x00, 0x00), // 0: Black (transparent for sprites)
        Rgb::new(0xFF, 0x00, 0x00), // 1: Red
        Rgb::new(0x00, 0xFF, 0x00), // 2: Green
        Rgb::new(0x00, 0x00, 0xFF), // 3: Blue
        Rgb::new(0xFF, 0xFF, 0xFF), // 4: White
    ];
    for (entry, &color) in colors.iter().enumerate() {
        video.set_palette_entry(0, entry, color)?;
    }
    println!("  Loaded {} colors into palette 0", colors.len());

    // Tile 1 solid red, tile 2 green with a white border
    println!("\nLoading tile data...");
    let mut tiles = vec![0u8; TILE_SIZE * 3];
    tiles[TILE_SIZE..TILE_SIZE * 2].fill(1);
    for y in 0..TILE_HEIGHT {
        for x in 0..TILE_WIDTH {
            let border = x == 0 || y == 0 || x == TILE_WIDTH - 1 || y == TILE_HEIGHT - 1;
            tiles[TILE_SIZE * 2 + y * TILE_WIDTH + x] = if border { 4 } else { 2 };
        }
    }
    video.set_vram_data(0, &tiles)?;
    println!("  Loaded 3 tiles");

    // Layer 0: red everywhere, layer 1: a single bordered tile, half transparent
    println!("\nConfiguring layers...");
    let layer0 = video.tile_layer_mut(0)?;
    layer0.set_data(&vec![1u8, 0].repeat(1024))?;
    layer0.set_enabled(true);

    let layer1 = video.tile_layer_mut(1)?;
    layer1.set_data_at(2, 0, 0)?;
    layer1.set_offset(8, 8);
    layer1.set_alpha(0x80);
    layer1.set_enabled(true);
    println!("  Layer 0: solid red, opaque");
    println!("  Layer 1: tile 2 at (0, 0), offset (8, 8), alpha 0x80");

    // Sprite 0 at the bottom-right corner, partially off screen
    let sprite = video.sprite_mut(0)?;
    sprite.set_tile(2);
    sprite.set_location(SCREEN_WIDTH as u16 - 8, SCREEN_HEIGHT as u16 - 8);
    sprite.set_enabled(true);
    println!("  Sprite 0: tile 2 at ({}, {})", SCREEN_WIDTH - 8, SCREEN_HEIGHT - 8);

    video.set_output_enable(true);

    // Scroll for a few frames
    println!("\nScrolling...");
    for frame in 0..5u16 {
        chip.video.set_scroll_offset(frame * 100, frame * 60);
        let stats = chip.step_frame(&mut NullPresenter)?;
        println!(
            "  Frame {}: scroll=({}, {}), layer blits={}, sprites={}",
            frame,
            frame * 100,
            frame * 60,
            stats.layer_blits,
            stats.sprites_drawn
        );
    }

    let fb = chip.compositor().screen();
    println!("\nFramebuffer info:");
    println!("  Dimensions: {}x{}", fb.width(), fb.height());
    println!("  First pixel color: 0x{:06X}", fb.pixels()[0]);
    println!("  Frames: {}", chip.stats().frame_count);

    println!("\n✓ Layer demo completed successfully!");
    Ok(())
}
