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

//! Tile-map resources produced by the map converter.
//!
//! The converter writes one `<map>.layerN.dat` file per layer (row-major
//! little-endian `u16` entries, rows padded to a power-of-two width) and a
//! `<map>.res` manifest describing them:
//!
//! ```text
//! [level1.tmx.layer0.dat]
//! width=32
//! height=15
//! ```
//!
//! Sections are assigned to tile layers in the order they appear.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use log::info;
use thiserror::Error;

use crate::core::constants::{NUM_TILE_LAYERS, TILE_MAP_HEIGHT, TILE_MAP_WIDTH};
use crate::video_state::VideoState;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("line {line}: key outside of a [file] section")]
    KeyOutsideSection { line: usize },
    #[error("line {line}: expected `[file]` or `key=value`, found {text:?}")]
    Malformed { line: usize, text: String },
    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: String },
    #[error("line {line}: invalid value {value:?} for {key}")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
    #[error("line {line}: section [{file}] is missing {key}")]
    MissingKey {
        line: usize,
        file: String,
        key: &'static str,
    },
    #[error("line {line}: width {width} of [{file}] is not a power of two up to {max}")]
    BadWidth {
        line: usize,
        file: String,
        width: usize,
        max: usize,
    },
    #[error("line {line}: height {height} of [{file}] exceeds {max}")]
    BadHeight {
        line: usize,
        file: String,
        height: usize,
        max: usize,
    },
    #[error("line {line}: more than {max} layers")]
    TooManyLayers { line: usize, max: usize },
}

/// One layer file listed in a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerResource {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
}

impl LayerResource {
    /// Expected file size in bytes
    pub fn byte_len(&self) -> usize {
        self.width * self.height * 2
    }
}

/// Parsed `.res` manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceManifest {
    pub layers: Vec<LayerResource>,
}

struct Section {
    line: usize,
    file: String,
    width: Option<usize>,
    height: Option<usize>,
}

impl Section {
    fn finish(self, base_dir: &Path) -> Result<LayerResource, ManifestError> {
        let Section { line, file, width, height } = self;
        let width = width.ok_or_else(|| ManifestError::MissingKey {
            line,
            file: file.clone(),
            key: "width",
        })?;
        let height = height.ok_or_else(|| ManifestError::MissingKey {
            line,
            file: file.clone(),
            key: "height",
        })?;
        if !width.is_power_of_two() || width > TILE_MAP_WIDTH {
            return Err(ManifestError::BadWidth {
                line,
                file,
                width,
                max: TILE_MAP_WIDTH,
            });
        }
        if height > TILE_MAP_HEIGHT {
            return Err(ManifestError::BadHeight {
                line,
                file,
                height,
                max: TILE_MAP_HEIGHT,
            });
        }

        // The converter records paths as given on its command line; only the
        // file name is meaningful next to the manifest.
        let name = Path::new(&file).file_name().map_or_else(|| PathBuf::from(&file), PathBuf::from);
        Ok(LayerResource {
            path: base_dir.join(name),
            width,
            height,
        })
    }
}

impl ResourceManifest {
    /// Parse manifest text, resolving layer files relative to `base_dir`
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self, ManifestError> {
        let mut layers = Vec::new();
        let mut current: Option<Section> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = index + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with(';') || trimmed.starts_with('#') {
                continue;
            }

            if let Some(file) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                if let Some(section) = current.take() {
                    layers.push(section.finish(base_dir)?);
                }
                if layers.len() == NUM_TILE_LAYERS {
                    return Err(ManifestError::TooManyLayers {
                        line,
                        max: NUM_TILE_LAYERS,
                    });
                }
                current = Some(Section {
                    line,
                    file: file.trim().to_string(),
                    width: None,
                    height: None,
                });
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ManifestError::Malformed {
                    line,
                    text: trimmed.to_string(),
                });
            };
            let section = current
                .as_mut()
                .ok_or(ManifestError::KeyOutsideSection { line })?;
            let (key, value) = (key.trim(), value.trim());
            let parsed = value.parse::<usize>().map_err(|_| ManifestError::InvalidValue {
                line,
                key: key.to_string(),
                value: value.to_string(),
            });
            match key {
                "width" => section.width = Some(parsed?),
                "height" => section.height = Some(parsed?),
                _ => {
                    return Err(ManifestError::UnknownKey {
                        line,
                        key: key.to_string(),
                    });
                }
            }
        }

        if let Some(section) = current {
            layers.push(section.finish(base_dir)?);
        }
        Ok(Self { layers })
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let manifest = Self::parse(&text, base_dir)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        info!("manifest {} lists {} layer(s)", path.display(), manifest.layers.len());
        Ok(manifest)
    }
}

/// Read one layer file and check it matches its manifest entry
pub fn load_layer_data(resource: &LayerResource) -> anyhow::Result<Vec<u8>> {
    let data = fs::read(&resource.path)
        .with_context(|| format!("reading layer file {}", resource.path.display()))?;
    if data.len() != resource.byte_len() {
        bail!(
            "layer file {} is {} bytes, expected {} for {}x{} tiles",
            resource.path.display(),
            data.len(),
            resource.byte_len(),
            resource.width,
            resource.height
        );
    }
    Ok(data)
}

/// Load every layer in `manifest` into the matching tile layer, returning the count
pub fn load_layers(manifest: &ResourceManifest, video: &mut VideoState) -> anyhow::Result<usize> {
    for (index, resource) in manifest.layers.iter().enumerate() {
        let data = load_layer_data(resource)?;
        video
            .tile_layer_mut(index)?
            .load_rows(&data, resource.width)
            .with_context(|| format!("loading {} into layer {index}", resource.path.display()))?;
        info!(
            "layer {index}: {}x{} tiles from {}",
            resource.width,
            resource.height,
            resource.path.display()
        );
    }
    Ok(manifest.layers.len())
}
