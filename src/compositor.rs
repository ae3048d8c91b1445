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

//! Per-frame compositing of tile layers and sprites.
//!
//! A frame is built in three passes over a read-only [`VideoState`]:
//!
//! 1. The screen is cleared to [`BACKGROUND`].
//! 2. Each enabled tile layer, in index order, is rendered into its own
//!    512x512 surface by copying one 16x16 VRAM tile per map cell through the
//!    layer's palette. The surface is then blitted onto the screen at the
//!    layer offset minus the global scroll. Placement wraps toroidally: the
//!    origin is reduced into `(-size, 0]` on each axis and extra copies are
//!    drawn one layer width to the right and/or one layer height down
//!    whenever the primary copy stops short of the screen edge, giving up to
//!    four blits per layer (see [`wrap_placements`]).
//! 3. Enabled sprites are drawn in ascending index order on top of all
//!    layers. Colour index 0 is transparent for sprites and sprites are
//!    clipped at the screen edges rather than wrapped.
//!
//! Layers are opaque apart from their alpha, so a later layer overwrites an
//! earlier one wherever they overlap. Alpha is an opacity factor: 255 copies,
//! 0 leaves the destination untouched, anything in between blends.
//!
//! Tile indices that address past the end of VRAM render as tile 0 and are
//! counted in [`FrameStats::invalid_tiles`].
//!
//! When output is disabled or blanked the frame is background only.

use log::{debug, warn};

use crate::core::VideoMemory;
use crate::core::constants::{
    NUM_COLORS_PER_PALETTE, NUM_TILE_LAYERS, OPAQUE, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_HEIGHT,
    TILE_LAYER_HEIGHT, TILE_LAYER_WIDTH, TILE_SIZE, TILE_WIDTH,
};
use crate::framebuffer::Framebuffer;
use crate::palette::Palette;
use crate::sprite::Sprite;
use crate::tile_layer::TileLayer;
use crate::video_state::VideoState;

/// Colour the screen is cleared to before each frame
pub const BACKGROUND: u32 = 0x00_0000;

/// Sprite pixels with this colour index are not drawn
pub const TRANSPARENT_INDEX: u8 = 0;

type ColorLut = [u32; NUM_COLORS_PER_PALETTE];

/// Which of the up to four copies of a layer a blit draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapCopy {
    Primary,
    Horizontal,
    Vertical,
    Diagonal,
}

/// Screen-space position of one layer copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub copy: WrapCopy,
    pub x: i32,
    pub y: i32,
}

/// Counters from the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub layers_drawn: usize,
    pub layer_blits: usize,
    pub sprites_drawn: usize,
    pub invalid_tiles: usize,
}

fn wrap_axis(position: u16, size: usize) -> i32 {
    let offset = (position as usize % size) as i32;
    if offset == 0 { 0 } else { offset - size as i32 }
}

/// Screen origin of a layer at world offset `layer` under global `scroll`,
/// reduced into `(-size, 0]` on each axis.
pub fn layer_origin(layer: (u16, u16), scroll: (u16, u16)) -> (i32, i32) {
    (
        wrap_axis(layer.0.wrapping_sub(scroll.0), TILE_LAYER_WIDTH),
        wrap_axis(layer.1.wrapping_sub(scroll.1), TILE_LAYER_HEIGHT),
    )
}

/// Copies needed to draw a layer whose primary copy sits at (x, y).
///
/// A horizontal copy is added when the right edge falls short of the screen's
/// right edge, a vertical copy likewise for the bottom edge, and a diagonal
/// copy when both apply.
pub fn wrap_placements(x: i32, y: i32) -> Vec<Placement> {
    let (width, height) = (TILE_LAYER_WIDTH as i32, TILE_LAYER_HEIGHT as i32);
    let wrap_x = x + width < SCREEN_WIDTH as i32;
    let wrap_y = y + height < SCREEN_HEIGHT as i32;

    let mut placements = vec![Placement {
        copy: WrapCopy::Primary,
        x,
        y,
    }];
    if wrap_x {
        placements.push(Placement {
            copy: WrapCopy::Horizontal,
            x: x + width,
            y,
        });
    }
    if wrap_y {
        placements.push(Placement {
            copy: WrapCopy::Vertical,
            x,
            y: y + height,
        });
        if wrap_x {
            placements.push(Placement {
                copy: WrapCopy::Diagonal,
                x: x + width,
                y: y + height,
            });
        }
    }
    placements
}

#[cfg(not(feature = "fast-blend"))]
fn mix(src: u32, dst: u32, alpha: u32) -> u32 {
    (src * alpha + dst * (255 - alpha) + 127) / 255
}

#[cfg(feature = "fast-blend")]
fn mix(src: u32, dst: u32, alpha: u32) -> u32 {
    (src * (alpha + 1) + dst * (255 - alpha)) >> 8
}

/// Blend `src` over `dst` with opacity `alpha`.
pub fn blend(src: u32, dst: u32, alpha: u8) -> u32 {
    match alpha {
        0 => dst,
        OPAQUE => src,
        _ => {
            let alpha = alpha as u32;
            [16u32, 8, 0].iter().fold(0, |pixel, &shift| {
                let channel = mix((src >> shift) & 0xFF, (dst >> shift) & 0xFF, alpha);
                pixel | (channel << shift)
            })
        }
    }
}

/// Tile pixels for `index`, falling back to tile 0 when it lies past VRAM.
fn sample_tile(vram: &VideoMemory, index: u16) -> (&[u8], bool) {
    match vram.tile(index) {
        Some(pixels) => (pixels, true),
        None => (&vram.as_bytes()[..TILE_SIZE], false),
    }
}

/// Render a whole tile map into `surface`, returning the number of
/// out-of-range tile indices sampled.
fn draw_layer_surface(
    surface: &mut Framebuffer,
    layer: &TileLayer,
    vram: &VideoMemory,
    lut: &ColorLut,
) -> usize {
    let (map_width, _) = layer.dimensions();
    let mut invalid = 0;

    for (cell, &tile) in layer.tiles().iter().enumerate() {
        let (cell_x, cell_y) = (cell % map_width, cell / map_width);
        let (pixels, valid) = sample_tile(vram, tile);
        if !valid {
            invalid += 1;
        }

        let left = cell_x * TILE_WIDTH;
        for (row, src) in pixels.chunks_exact(TILE_WIDTH).enumerate() {
            let dst = &mut surface.row_mut(cell_y * TILE_HEIGHT + row)[left..left + TILE_WIDTH];
            for (pixel, &index) in dst.iter_mut().zip(src) {
                *pixel = lut[index as usize];
            }
        }
    }
    invalid
}

/// Copy `src` onto `dst` with its top-left corner at (x, y), clipped to `dst`.
fn blit(dst: &mut Framebuffer, src: &Framebuffer, x: i32, y: i32, alpha: u8) {
    let x0 = x.max(0);
    let x1 = (x + src.width() as i32).min(dst.width() as i32);
    let y0 = y.max(0);
    let y1 = (y + src.height() as i32).min(dst.height() as i32);
    if x0 >= x1 || y0 >= y1 || alpha == 0 {
        return;
    }

    let (src_left, src_right) = ((x0 - x) as usize, (x1 - x) as usize);
    for dst_y in y0..y1 {
        let src_row = &src.row((dst_y - y) as usize)[src_left..src_right];
        let dst_row = &mut dst.row_mut(dst_y as usize)[x0 as usize..x1 as usize];
        if alpha == OPAQUE {
            dst_row.copy_from_slice(src_row);
        } else {
            for (d, &s) in dst_row.iter_mut().zip(src_row) {
                *d = blend(s, *d, alpha);
            }
        }
    }
}

/// Draw one sprite, returning false when its tile index was out of range.
fn draw_sprite(
    screen: &mut Framebuffer,
    sprite: &Sprite,
    vram: &VideoMemory,
    lut: &ColorLut,
    scroll: (u16, u16),
) -> bool {
    let (world_x, world_y) = sprite.location();
    let x = world_x.wrapping_sub(scroll.0) as i16 as i32;
    let y = world_y.wrapping_sub(scroll.1) as i16 as i32;
    let (pixels, valid) = sample_tile(vram, sprite.tile());

    for (row, src) in pixels.chunks_exact(TILE_WIDTH).enumerate() {
        let screen_y = y + row as i32;
        if screen_y < 0 || screen_y >= screen.height() as i32 {
            continue;
        }
        let line = screen.row_mut(screen_y as usize);
        for (col, &index) in src.iter().enumerate() {
            let screen_x = x + col as i32;
            if index == TRANSPARENT_INDEX || screen_x < 0 || screen_x >= line.len() as i32 {
                continue;
            }
            let pixel = &mut line[screen_x as usize];
            *pixel = blend(lut[index as usize], *pixel, sprite.alpha());
        }
    }
    valid
}

/// Frame compositor. Owns the screen canvas and one scratch surface per layer.
pub struct Compositor {
    screen: Framebuffer,
    layer_surfaces: Vec<Framebuffer>,
    stats: FrameStats,
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            screen: Framebuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            layer_surfaces: (0..NUM_TILE_LAYERS)
                .map(|_| Framebuffer::new(TILE_LAYER_WIDTH, TILE_LAYER_HEIGHT))
                .collect(),
            stats: FrameStats::default(),
        }
    }

    /// Composite one frame from `video` and return the finished screen.
    pub fn render(&mut self, video: &VideoState) -> &Framebuffer {
        let mut stats = FrameStats::default();
        self.screen.fill(BACKGROUND);

        if video.output_visible() {
            let scroll = video.scroll_offset();
            let luts: Vec<ColorLut> = video.palettes().iter().map(Palette::lookup_table).collect();

            for (layer, surface) in video.tile_layers().iter().zip(&mut self.layer_surfaces) {
                if !layer.is_enabled() {
                    continue;
                }
                let Some(lut) = luts.get(layer.palette()) else {
                    continue;
                };
                stats.invalid_tiles += draw_layer_surface(surface, layer, video.vram(), lut);

                let (x, y) = layer_origin(layer.offset(), scroll);
                for placement in wrap_placements(x, y) {
                    blit(&mut self.screen, surface, placement.x, placement.y, layer.alpha());
                    stats.layer_blits += 1;
                }
                stats.layers_drawn += 1;
            }

            for sprite in video.sprites().iter().filter(|sprite| sprite.is_enabled()) {
                let Some(lut) = luts.get(sprite.palette()) else {
                    continue;
                };
                if !draw_sprite(&mut self.screen, sprite, video.vram(), lut, scroll) {
                    stats.invalid_tiles += 1;
                }
                stats.sprites_drawn += 1;
            }
        }

        if stats.invalid_tiles > 0 {
            warn!(
                "frame sampled {} tile indices past the end of VRAM, drew tile 0 instead",
                stats.invalid_tiles
            );
        }
        debug!(
            "composited frame: {} layers, {} blits, {} sprites",
            stats.layers_drawn, stats.layer_blits, stats.sprites_drawn
        );

        self.stats = stats;
        &self.screen
    }

    /// Screen as of the last [`Compositor::render`]
    pub fn screen(&self) -> &Framebuffer {
        &self.screen
    }

    /// Scratch surface of layer `index` as of the last frame that drew it
    pub fn layer_surface(&self, index: usize) -> Option<&Framebuffer> {
        self.layer_surfaces.get(index)
    }

    pub fn last_stats(&self) -> FrameStats {
        self.stats
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::{NUM_TILES, TILE_MAP_HEIGHT, TILE_MAP_SIZE, TILE_MAP_WIDTH};
    use crate::palette::Rgb;
    use pretty_assertions::assert_eq;

    const RED: Rgb = Rgb::new(0xFF, 0, 0);
    const GREEN: Rgb = Rgb::new(0, 0xFF, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 0xFF);
    const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    fn solid_tile(video: &mut VideoState, tile: usize, color_index: u8) {
        video
            .set_vram_data(tile * TILE_SIZE, &[color_index; TILE_SIZE])
            .unwrap();
    }

    fn fill_layer(video: &mut VideoState, layer: usize, tile: u16) {
        let data: Vec<u8> = (0..TILE_MAP_SIZE).flat_map(|_| tile.to_le_bytes()).collect();
        video.tile_layer_mut(layer).unwrap().set_data(&data).unwrap();
    }

    /// Layer 0 filled with tile 0 (colour 1 = white) except a marker tile 1
    /// (colour 2 = red) at map cell (0, 0).
    fn marker_scene() -> VideoState {
        let mut video = VideoState::new();
        solid_tile(&mut video, 0, 1);
        solid_tile(&mut video, 1, 2);
        video.set_palette_entry(0, 1, WHITE).unwrap();
        video.set_palette_entry(0, 2, RED).unwrap();
        let layer = video.tile_layer_mut(0).unwrap();
        layer.set_data_at(1, 0, 0).unwrap();
        layer.set_enabled(true);
        video.set_output_enable(true);
        video
    }

    fn px(fb: &Framebuffer, x: usize, y: usize) -> u32 {
        fb.pixel(x, y).unwrap()
    }

    #[test]
    fn disabled_output_is_background_only() {
        let mut video = marker_scene();
        let mut compositor = Compositor::new();

        video.set_output_enable(false);
        assert!(compositor.render(&video).pixels().iter().all(|&p| p == BACKGROUND));

        video.set_output_enable(true);
        video.set_output_blank(true);
        assert!(compositor.render(&video).pixels().iter().all(|&p| p == BACKGROUND));
        assert_eq!(compositor.last_stats(), FrameStats::default());
    }

    #[test]
    fn solid_red_layer_fills_its_footprint() {
        let mut video = VideoState::new();
        solid_tile(&mut video, 0, 0);
        fill_layer(&mut video, 2, 0);
        video.set_palette_entry(1, 0, RED).unwrap();
        let layer = video.tile_layer_mut(2).unwrap();
        layer.set_palette(1).unwrap();
        layer.set_enabled(true);
        video.set_output_enable(true);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert!(screen.pixels().iter().all(|&p| p == RED.to_u32()));
    }

    #[test]
    fn disabled_layer_is_render_inert() {
        let mut reference = VideoState::new();
        reference.set_output_enable(true);
        let mut compositor = Compositor::new();
        let expected = compositor.render(&reference).clone();

        let mut video = marker_scene();
        video.set_palette_entry(0, 0, GREEN).unwrap();
        fill_layer(&mut video, 0, 1);
        video.tile_layer_mut(0).unwrap().set_enabled(false);

        assert_eq!(compositor.render(&video), &expected);
        assert_eq!(compositor.last_stats().layers_drawn, 0);
    }

    #[test]
    fn later_layers_overwrite_earlier_ones() {
        let mut video = VideoState::new();
        solid_tile(&mut video, 0, 5);
        video.set_palette_entry(0, 5, RED).unwrap();
        video.set_palette_entry(1, 5, GREEN).unwrap();
        for (index, palette) in [(0, 0), (1, 1)] {
            let layer = video.tile_layer_mut(index).unwrap();
            layer.set_palette(palette).unwrap();
            layer.set_enabled(true);
        }
        video.set_output_enable(true);

        let mut compositor = Compositor::new();
        assert!(compositor.render(&video).pixels().iter().all(|&p| p == GREEN.to_u32()));

        video.tile_layer_mut(1).unwrap().set_enabled(false);
        assert!(compositor.render(&video).pixels().iter().all(|&p| p == RED.to_u32()));
    }

    #[test]
    fn rendering_is_idempotent() {
        let mut video = marker_scene();
        video.tile_layer_mut(0).unwrap().set_offset(100, 37);
        video.set_scroll_offset(3, 9);
        video.sprite_mut(4).unwrap().set_enabled(true);

        let mut compositor = Compositor::new();
        let first = compositor.render(&video).clone();
        let second = compositor.render(&video).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn layer_origin_wraps_into_negative_range() {
        assert_eq!(layer_origin((0, 0), (0, 0)), (0, 0));
        assert_eq!(layer_origin((12, 0), (0, 0)), (12 - 512, 0));
        assert_eq!(layer_origin((0, 0), (16, 8)), (-16, -8));
        assert_eq!(layer_origin((512, 1024), (0, 0)), (0, 0));
        assert_eq!(layer_origin((0, 0), (1, 0)), (-1, 0));
    }

    #[test]
    fn wrap_copies_follow_edge_rule() {
        let copies = |x, y| -> Vec<WrapCopy> {
            wrap_placements(x, y).iter().map(|p| p.copy).collect()
        };
        // right edge exactly at the screen edge: no horizontal copy
        assert_eq!(copies(320 - 512, 0), vec![WrapCopy::Primary]);
        assert_eq!(
            copies(319 - 512, 0),
            vec![WrapCopy::Primary, WrapCopy::Horizontal]
        );
        assert_eq!(copies(0, 240 - 512), vec![WrapCopy::Primary]);
        assert_eq!(
            copies(0, 239 - 512),
            vec![WrapCopy::Primary, WrapCopy::Vertical]
        );
        assert_eq!(
            wrap_placements(-500, -490),
            vec![
                Placement { copy: WrapCopy::Primary, x: -500, y: -490 },
                Placement { copy: WrapCopy::Horizontal, x: 12, y: -490 },
                Placement { copy: WrapCopy::Vertical, x: -500, y: 22 },
                Placement { copy: WrapCopy::Diagonal, x: 12, y: 22 },
            ]
        );
    }

    #[test]
    fn unwrapped_layer_draws_marker_at_origin() {
        let video = marker_scene();
        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 0, 0), RED.to_u32());
        assert_eq!(px(screen, 15, 15), RED.to_u32());
        assert_eq!(px(screen, 16, 0), WHITE.to_u32());
        assert_eq!(compositor.last_stats().layer_blits, 1);
    }

    #[test]
    fn horizontal_wrap_draws_marker_at_wrapped_column() {
        let mut video = marker_scene();
        video.tile_layer_mut(0).unwrap().set_offset(12, 0);
        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);

        assert_eq!(px(screen, 11, 0), WHITE.to_u32());
        assert_eq!(px(screen, 12, 0), RED.to_u32());
        assert_eq!(px(screen, 27, 15), RED.to_u32());
        assert_eq!(px(screen, 28, 0), WHITE.to_u32());
        assert_eq!(compositor.last_stats().layer_blits, 2);
    }

    #[test]
    fn vertical_wrap_draws_marker_at_wrapped_row() {
        let mut video = marker_scene();
        video.tile_layer_mut(0).unwrap().set_offset(0, 30);
        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);

        assert_eq!(px(screen, 0, 29), WHITE.to_u32());
        assert_eq!(px(screen, 0, 30), RED.to_u32());
        assert_eq!(px(screen, 15, 45), RED.to_u32());
        assert_eq!(px(screen, 0, 46), WHITE.to_u32());
        assert_eq!(compositor.last_stats().layer_blits, 2);
    }

    #[test]
    fn diagonal_wrap_draws_all_four_copies() {
        let mut video = marker_scene();
        video.tile_layer_mut(0).unwrap().set_offset(12, 12);
        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);

        assert_eq!(px(screen, 12, 12), RED.to_u32());
        assert_eq!(px(screen, 27, 27), RED.to_u32());
        assert_eq!(px(screen, 11, 12), WHITE.to_u32());
        assert_eq!(px(screen, 28, 28), WHITE.to_u32());
        // every screen pixel is covered by some copy
        assert!(screen.pixels().iter().all(|&p| p != BACKGROUND));
        assert_eq!(compositor.last_stats().layer_blits, 4);
    }

    #[test]
    fn global_scroll_is_subtracted_from_layer_offset() {
        let mut video = marker_scene();
        // move the marker to map cell (1, 0), then scroll it to the screen origin
        let layer = video.tile_layer_mut(0).unwrap();
        layer.set_data_at(0, 0, 0).unwrap();
        layer.set_data_at(1, 1, 0).unwrap();
        layer.set_offset(100, 50);
        video.set_scroll_offset(116, 50);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 0, 0), RED.to_u32());
        assert_eq!(px(screen, 15, 15), RED.to_u32());
        assert_eq!(px(screen, 16, 0), WHITE.to_u32());
    }

    #[test]
    fn out_of_range_tiles_fall_back_to_tile_zero() {
        let mut video = marker_scene();
        let layer = video.tile_layer_mut(0).unwrap();
        layer.set_data_at(NUM_TILES as u16, 0, 0).unwrap();
        layer
            .set_data_at(u16::MAX, TILE_MAP_WIDTH - 1, TILE_MAP_HEIGHT - 1)
            .unwrap();

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 0, 0), WHITE.to_u32());
        assert_eq!(compositor.last_stats().invalid_tiles, 2);
    }

    #[test]
    fn layer_alpha_blends_over_lower_layers() {
        let mut video = VideoState::new();
        solid_tile(&mut video, 0, 1);
        video.set_palette_entry(0, 1, RED).unwrap();
        video.set_palette_entry(1, 1, BLUE).unwrap();
        video.tile_layer_mut(0).unwrap().set_enabled(true);
        let top = video.tile_layer_mut(1).unwrap();
        top.set_palette(1).unwrap();
        top.set_alpha(128);
        top.set_enabled(true);
        video.set_output_enable(true);

        let mut compositor = Compositor::new();
        let pixel = Rgb::from_u32(px(compositor.render(&video), 50, 50));
        assert!(pixel.r.abs_diff(127) <= 1, "red channel {}", pixel.r);
        assert_eq!(pixel.g, 0);
        assert!(pixel.b.abs_diff(128) <= 1, "blue channel {}", pixel.b);

        video.tile_layer_mut(1).unwrap().set_alpha(0);
        assert_eq!(px(compositor.render(&video), 50, 50), RED.to_u32());
    }

    #[test]
    fn blend_endpoints_are_exact() {
        assert_eq!(blend(0x00FF_0000, 0x0000_00FF, OPAQUE), 0x00FF_0000);
        assert_eq!(blend(0x00FF_0000, 0x0000_00FF, 0), 0x0000_00FF);
        assert_eq!(blend(0x0010_2030, 0x0010_2030, 77), 0x0010_2030);
    }

    #[test]
    fn sprites_draw_over_layers_with_transparency() {
        let mut video = marker_scene();
        // tile 2: left half colour 3 (green), right half transparent
        let mut tile = [0u8; TILE_SIZE];
        for row in tile.chunks_exact_mut(TILE_WIDTH) {
            row[..TILE_WIDTH / 2].fill(3);
        }
        video.set_vram_data(2 * TILE_SIZE, &tile).unwrap();
        video.set_palette_entry(0, 3, GREEN).unwrap();

        let sprite = video.sprite_mut(0).unwrap();
        sprite.set_tile(2);
        sprite.set_location(100, 100);
        sprite.set_enabled(true);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 100, 100), GREEN.to_u32());
        assert_eq!(px(screen, 107, 115), GREEN.to_u32());
        assert_eq!(px(screen, 108, 100), WHITE.to_u32());
        assert_eq!(px(screen, 100, 116), WHITE.to_u32());
        assert_eq!(compositor.last_stats().sprites_drawn, 1);
    }

    #[test]
    fn higher_sprite_index_is_drawn_on_top() {
        let mut video = marker_scene();
        solid_tile(&mut video, 2, 3);
        solid_tile(&mut video, 3, 4);
        video.set_palette_entry(0, 3, GREEN).unwrap();
        video.set_palette_entry(0, 4, BLUE).unwrap();
        for (index, tile) in [(10, 3), (11, 2)] {
            let sprite = video.sprite_mut(index).unwrap();
            sprite.set_tile(tile);
            sprite.set_location(50, 50);
            sprite.set_enabled(true);
        }

        let mut compositor = Compositor::new();
        assert_eq!(px(compositor.render(&video), 55, 55), GREEN.to_u32());
    }

    #[test]
    fn sprites_clip_at_screen_edges_and_follow_scroll() {
        let mut video = marker_scene();
        solid_tile(&mut video, 2, 3);
        video.set_palette_entry(0, 3, GREEN).unwrap();
        let sprite = video.sprite_mut(0).unwrap();
        sprite.set_tile(2);
        sprite.set_location(0, 0);
        sprite.set_enabled(true);
        // scrolling right by 8 pushes the sprite half off the left edge
        video.set_scroll_offset(8, 0);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 0, 0), GREEN.to_u32());
        assert_eq!(px(screen, 7, 15), GREEN.to_u32());
        assert_ne!(px(screen, 8, 0), GREEN.to_u32());

        // fully past the bottom-right corner: nothing drawn, nothing panics
        video.sprite_mut(0).unwrap().set_location(400, 300);
        let screen = compositor.render(&video);
        assert!(screen.pixels().iter().all(|&p| p != GREEN.to_u32()));
    }

    #[test]
    fn sprite_alpha_blends() {
        let mut video = marker_scene();
        solid_tile(&mut video, 2, 3);
        video.set_palette_entry(0, 3, Rgb::new(0, 0, 0xFF)).unwrap();
        let sprite = video.sprite_mut(0).unwrap();
        sprite.set_tile(2);
        sprite.set_location(200, 200);
        sprite.set_alpha(0);
        sprite.set_enabled(true);

        let mut compositor = Compositor::new();
        assert_eq!(px(compositor.render(&video), 200, 200), WHITE.to_u32());
    }

    /// Output enabled with no layers, so sprites land on the black background.
    fn sprite_only_scene() -> VideoState {
        let mut video = VideoState::new();
        solid_tile(&mut video, 2, 3);
        video.set_output_enable(true);
        video
    }

    #[test]
    fn sprite_uses_its_palette_and_blends_at_partial_alpha() {
        let mut video = sprite_only_scene();
        video.set_palette_entry(0, 3, RED).unwrap();
        video.set_palette_entry(2, 3, BLUE).unwrap();
        let sprite = video.sprite_mut(0).unwrap();
        sprite.set_tile(2);
        sprite.set_location(40, 30);
        sprite.set_palette(2).unwrap();
        sprite.set_enabled(true);

        let mut compositor = Compositor::new();
        assert_eq!(px(compositor.render(&video), 40, 30), BLUE.to_u32());

        video.sprite_mut(0).unwrap().set_alpha(128);
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 40, 30), 0x00_0080);
        assert_eq!(px(screen, 55, 45), 0x00_0080);
        assert_eq!(px(screen, 56, 30), BACKGROUND);
    }

    #[test]
    fn disabled_sprite_draws_nothing() {
        let mut video = sprite_only_scene();
        video.set_palette_entry(0, 3, GREEN).unwrap();
        let sprite = video.sprite_mut(7).unwrap();
        sprite.set_tile(2);
        sprite.set_location(10, 10);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert!(screen.pixels().iter().all(|&p| p == BACKGROUND));
        assert_eq!(compositor.last_stats().sprites_drawn, 0);

        video.sprite_mut(7).unwrap().set_enabled(true);
        assert_eq!(px(compositor.render(&video), 10, 10), GREEN.to_u32());
        video.sprite_mut(7).unwrap().set_enabled(false);
        assert!(compositor.render(&video).pixels().iter().all(|&p| p == BACKGROUND));
    }

    #[test]
    fn sprite_near_top_of_world_space_clips_at_left_edge() {
        let mut video = sprite_only_scene();
        video.set_palette_entry(0, 3, GREEN).unwrap();
        let sprite = video.sprite_mut(0).unwrap();
        sprite.set_tile(2);
        // 65530 reads as -6 on screen
        sprite.set_location(65530, 20);
        sprite.set_enabled(true);

        let mut compositor = Compositor::new();
        let screen = compositor.render(&video);
        assert_eq!(px(screen, 0, 20), GREEN.to_u32());
        assert_eq!(px(screen, 9, 35), GREEN.to_u32());
        assert_eq!(px(screen, 10, 20), BACKGROUND);
        assert_eq!(px(screen, SCREEN_WIDTH - 1, 20), BACKGROUND);
        assert_eq!(compositor.last_stats().sprites_drawn, 1);
    }
}
