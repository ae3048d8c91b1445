//! Register File Demo
//!
//! Drives the chip purely through the host memory window, the way a CPU
//! would: VRAM and palette pokes, tile map writes and 16-bit registers
//! written one byte at a time.

use chronocube_core::ChronoCube;
use chronocube_core::core::constants::TILE_SIZE;
use chronocube_core::registers::{ALPHA, CTRL, DISPCTL, LAYER_BASE, POS_X, SCROLL_X, SPRITE_BASE, TILE};

fn write_u16(chip: &mut ChronoCube, addr: u32, value: u16) {
    let [lo, hi] = value.to_le_bytes();
    chip.write_memory(addr, lo);
    chip.write_memory(addr + 1, hi);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("ChronoCube Register Demo");
    println!("========================\n");

    let mut chip = ChronoCube::new();
    let regs = ChronoCube::REGISTER_BASE;

    println!("Memory map:");
    println!("  VRAM:      0x{:05X}", ChronoCube::VRAM_BASE);
    println!("  Palettes:  0x{:05X}", ChronoCube::PALETTE_BASE);
    println!("  Tile maps: 0x{:05X}", ChronoCube::TILE_MAP_BASE);
    println!("  Registers: 0x{:05X}", regs);

    // Tile 1: index 1 everywhere, tile 2: index 2 everywhere
    println!("\nWriting VRAM...");
    for offset in 0..TILE_SIZE as u32 {
        chip.write_memory(ChronoCube::VRAM_BASE + TILE_SIZE as u32 + offset, 1);
        chip.write_memory(ChronoCube::VRAM_BASE + 2 * TILE_SIZE as u32 + offset, 2);
    }

    // Palette 0, entries 1 and 2 (r, g, b, pad)
    println!("Writing palette RAM...");
    for (i, byte) in [0x10, 0x80, 0x10, 0, 0xFF, 0xC0, 0x00, 0].into_iter().enumerate() {
        chip.write_memory(ChronoCube::PALETTE_BASE + 4 + i as u32, byte);
    }

    // Layer 0 map: every cell tile 1
    println!("Writing tile map 0...");
    for cell in 0..1024u32 {
        write_u16(&mut chip, ChronoCube::TILE_MAP_BASE + cell * 2, 1);
    }

    println!("Programming registers...");
    write_u16(&mut chip, regs + LAYER_BASE + CTRL, 0x0001);
    write_u16(&mut chip, regs + SPRITE_BASE + TILE, 2);
    write_u16(&mut chip, regs + SPRITE_BASE + POS_X, 100);
    write_u16(&mut chip, regs + SPRITE_BASE + ALPHA, 0x40);
    write_u16(&mut chip, regs + SPRITE_BASE + CTRL, 0x0001);
    write_u16(&mut chip, regs + SCROLL_X, 4);
    write_u16(&mut chip, regs + DISPCTL, 0x0001);

    println!("\nRegister readback:");
    println!("  DISPCTL:       0x{:04X}", chip.read_register(DISPCTL));
    println!("  SCROLL_X:      0x{:04X}", chip.read_register(SCROLL_X));
    println!("  LAYER0 CTRL:   0x{:04X}", chip.read_register(LAYER_BASE + CTRL));
    println!("  SPRITE0 TILE:  0x{:04X}", chip.read_register(SPRITE_BASE + TILE));

    let frame = chip.render_frame();
    println!("\nFrame:");
    println!("  Pixel (0, 0):  0x{:06X}", frame.pixels()[0]);
    println!("  Pixel (96, 0): 0x{:06X}", frame.pixel(96, 0).unwrap_or(0));
    println!("  Stats: {:?}", chip.compositor().last_stats());

    println!("\n✓ Register demo completed successfully!");
    Ok(())
}
