//! Errors that can occur while loading fonts and drawing text.

use std::{io, path::PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Pseudo path reported for fonts decoded from bytes in memory.
pub(crate) const MEMORY_PATH: &str = "<memory>";

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong when building a font atlas or drawing text with it.
#[derive(Debug, Error, Diagnostic)]
#[non_exhaustive]
pub enum Error {
    /// The font sheet could not be read from disk.
    #[error("Error opening font sheet '{}'", path.display())]
    #[diagnostic(code(imgfont::file_open))]
    FileOpen {
        /// Path of the sheet that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The bytes of the font sheet are not a PNG image we can use.
    #[error("Could not decode file '{}' as PNG", path.display())]
    #[diagnostic(
        code(imgfont::decode),
        help("font sheets must be PNG images, any color type is converted to 8 bit RGBA")
    )]
    Decode {
        /// Path of the sheet, `<memory>` when decoded from bytes.
        path: PathBuf,
        /// Underlying PNG error.
        #[source]
        source: DecodeError,
    },
    /// The TOML metadata next to the font sheet is missing or malformed.
    #[error("Error reading font metadata '{}'", path.display())]
    #[diagnostic(code(imgfont::metadata))]
    Metadata {
        /// Path of the TOML file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: MetadataError,
    },
    /// The amount of glyphs in the sheet doesn't match the alphabet.
    #[error("{alphabet} glyphs wanted, but image contained {glyphs} glyphs")]
    #[diagnostic(
        code(imgfont::glyph_count_mismatch),
        help("every character of the alphabet needs exactly one run of non-separator pixels in the top row")
    )]
    GlyphCountMismatch {
        /// Amount of characters in the alphabet.
        alphabet: usize,
        /// Amount of glyph runs found in the top row of the sheet.
        glyphs: usize,
    },
    /// A character in the text has no glyph in the atlas.
    ///
    /// Only reported as a diagnostic when skipping missing glyphs, composing never fails because of it.
    #[error("Character {0:?} has no glyph in the font")]
    #[diagnostic(code(imgfont::unknown_glyph), severity(Warning))]
    UnknownGlyph(char),
    /// Tried drawing text before any text was composed.
    #[error("No text has been composed yet, call `set_text` before drawing")]
    #[diagnostic(code(imgfont::not_composed))]
    NotComposed,
    /// Writing an image as PNG failed.
    #[error("Error encoding image as PNG")]
    #[diagnostic(code(imgfont::encode))]
    Encode(#[from] png::EncodingError),
}

/// Reasons a PNG could not be turned into RGBA pixels.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The PNG decoder rejected the bytes.
    #[error(transparent)]
    Png(#[from] png::DecodingError),
    /// The decoder produced a pixel layout we can't convert to RGBA.
    #[error("unsupported PNG output color type {color_type:?} with bit depth {bits:?}")]
    UnsupportedColor {
        /// Color type after transformations.
        color_type: png::ColorType,
        /// Bit depth after transformations.
        bits: png::BitDepth,
    },
}

/// Reasons the font metadata file could not be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MetadataError {
    /// File could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// File is not valid TOML or doesn't match the expected fields.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
