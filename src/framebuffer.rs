//! Raster surfaces and the hand-off to the presentation layer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use image::codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding};
use image::{ImageBuffer, Rgb as ImageRgb, RgbImage};

use crate::palette::{PaletteTable, Rgb};

/// Row-major raster of `0x00RRGGBB` pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    #[cfg(test)]
    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn row(&self, y: usize) -> &[u32] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u32] {
        &mut self.pixels[y * self.width..(y + 1) * self.width]
    }

    pub fn fill(&mut self, pixel: u32) {
        self.pixels.fill(pixel);
    }

    /// Copy the raster into an 8-bit RGB image
    pub fn to_rgb_image(&self) -> RgbImage {
        ImageBuffer::from_fn(self.width as u32, self.height as u32, |x, y| {
            let Rgb { r, g, b } = Rgb::from_u32(self.pixels[y as usize * self.width + x as usize]);
            ImageRgb([r, g, b])
        })
    }
}

/// Consumer of finished frames (a window, an encoder, a test harness).
pub trait Presenter {
    fn present(&mut self, frame: &Framebuffer, palettes: &PaletteTable) -> anyhow::Result<()>;
}

/// Presenter that drops every frame.
#[derive(Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {
    fn present(&mut self, _frame: &Framebuffer, _palettes: &PaletteTable) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Presenter that writes every frame to the same PPM file.
#[derive(Debug)]
pub struct PpmPresenter {
    path: PathBuf,
    frames_written: u64,
}

impl PpmPresenter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

impl Presenter for PpmPresenter {
    fn present(&mut self, frame: &Framebuffer, _palettes: &PaletteTable) -> anyhow::Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        let mut out = BufWriter::new(file);
        let encoder = PnmEncoder::new(&mut out).with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary));
        frame
            .to_rgb_image()
            .write_with_encoder(encoder)
            .with_context(|| format!("encoding frame to {}", self.path.display()))?;
        out.flush()
            .with_context(|| format!("writing frame to {}", self.path.display()))?;
        self.frames_written += 1;
        Ok(())
    }
}
