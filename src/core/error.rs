//! Contract violations raised by the video state setters.

use thiserror::Error;

/// A host call that broke an access precondition. The call that returns one
/// of these has left all video state untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VideoError {
    #[error("VRAM access of {len} bytes at {offset:#06X} runs past the end of VRAM")]
    VramOutOfRange { offset: usize, len: usize },
    #[error("invalid palette {0}")]
    InvalidPalette(usize),
    #[error("palette data of {0} bytes does not fit in a palette")]
    PaletteDataTooLarge(usize),
    #[error("invalid palette entry {0}")]
    InvalidPaletteEntry(usize),
    #[error("invalid tile layer {0}")]
    InvalidTileLayer(usize),
    #[error("tile map data of {0} bytes does not fit in a tile map")]
    TileDataTooLarge(usize),
    #[error("tile map data of {0} bytes is not a whole number of 16-bit entries")]
    MisalignedTileData(usize),
    #[error("tile cell ({x}, {y}) is outside the {width}x{height} tile map")]
    TileCellOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("invalid sprite {0}")]
    InvalidSprite(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_access() {
        let err = VideoError::VramOutOfRange {
            offset: 0xFFF0,
            len: 32,
        };
        assert_eq!(
            err.to_string(),
            "VRAM access of 32 bytes at 0xFFF0 runs past the end of VRAM"
        );
        assert_eq!(VideoError::InvalidPalette(7).to_string(), "invalid palette 7");
    }
}
