//! Text layout configuration.

use std::path::Path;

use rgb::RGBA8;
use serde::Deserialize;

use crate::error::{Error, MetadataError, Result};

/// How text should be laid out with a font, passed to [`crate::TextLayout::with_config`].
///
/// There's two ways to initialize the config:
///
/// # Example
///
/// ```rust
/// # use imgfont::TextConfig;
/// TextConfig {
///   letter_spacing: 2,
///   ..Default::default()
/// };
/// ```
///
/// # Example
///
/// ```rust
/// # use imgfont::TextConfig;
/// TextConfig::default().with_letter_spacing(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::exhaustive_structs)]
pub struct TextConfig {
    /// Pixels between the glyphs on a single line.
    ///
    /// Can be negative to pack glyphs tighter.
    /// Composed images are never wider than [`crate::text::MAX_SIZE`], glyphs pushed beyond it are cut off.
    ///
    /// Defaults to `1`.
    pub letter_spacing: i32,
    /// Pixels added after every line, on top of the glyph height.
    ///
    /// Can be negative to make lines overlap.
    /// Composed images are never higher than [`crate::text::MAX_SIZE`], lines pushed beyond it are cut off.
    ///
    /// Defaults to `-2`.
    pub line_spacing: i32,
    /// What to do with characters that are not in the font.
    ///
    /// Defaults to [`MissingGlyph::Placeholder`].
    pub missing_glyph: MissingGlyph,
    /// Width in pixels of the placeholder drawn for missing characters.
    ///
    /// Defaults to `8`.
    pub placeholder_width: u32,
    /// Color of the placeholder drawn for missing characters.
    ///
    /// Defaults to `0xFFFFCC` opaque (pale yellow).
    pub placeholder_color: RGBA8,
}

impl TextConfig {
    /// Set the pixels between the glyphs on a single line.
    #[inline]
    #[must_use]
    pub const fn with_letter_spacing(mut self, letter_spacing: i32) -> Self {
        self.letter_spacing = letter_spacing;

        self
    }

    /// Set the pixels added after every line.
    #[inline]
    #[must_use]
    pub const fn with_line_spacing(mut self, line_spacing: i32) -> Self {
        self.line_spacing = line_spacing;

        self
    }

    /// Set what to do with characters that are not in the font.
    ///
    /// See [`MissingGlyph`] for more information.
    #[inline]
    #[must_use]
    pub const fn with_missing_glyph(mut self, missing_glyph: MissingGlyph) -> Self {
        self.missing_glyph = missing_glyph;

        self
    }

    /// Set the width in pixels of the placeholder for missing characters.
    #[inline]
    #[must_use]
    pub const fn with_placeholder_width(mut self, placeholder_width: u32) -> Self {
        self.placeholder_width = placeholder_width;

        self
    }

    /// Set the color of the placeholder for missing characters.
    #[inline]
    #[must_use]
    pub const fn with_placeholder_color(mut self, placeholder_color: RGBA8) -> Self {
        self.placeholder_color = placeholder_color;

        self
    }
}

impl Default for TextConfig {
    #[inline]
    fn default() -> Self {
        Self {
            letter_spacing: 1,
            line_spacing: -2,
            missing_glyph: MissingGlyph::Placeholder,
            placeholder_width: 8,
            placeholder_color: RGBA8::new(0xFF, 0xFF, 0xCC, 0xFF),
        }
    }
}

/// What to do when a character of the text is not in the font.
///
/// Both measuring and composing follow the same policy, so the composed image always fits.
///
/// Defaults to [`MissingGlyph::Placeholder`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum MissingGlyph {
    /// Draw a solid placeholder block so missing characters are easy to spot.
    #[default]
    Placeholder,
    /// Leave the character out.
    ///
    /// Composing logs a warning for every skipped character, measuring only logs it at `debug` level.
    Skip,
}

/// Font metadata to load from TOML.
///
/// Lives next to the font sheet with the same file stem, `font.png` is described by `font.toml`:
///
/// ```toml
/// alphabet = "abcdefghijklmnopqrstuvwxyz0123456789"
/// letter_spacing = 1
/// line_spacing = -2
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct FontMetadata {
    /// Characters in the sheet, in order from left to right.
    pub alphabet: String,
    /// Pixels between the glyphs, see [`TextConfig::letter_spacing`].
    #[serde(default = "FontMetadata::default_letter_spacing")]
    pub letter_spacing: i32,
    /// Pixels between the lines, see [`TextConfig::line_spacing`].
    #[serde(default = "FontMetadata::default_line_spacing")]
    pub line_spacing: i32,
    /// What to do with missing characters, see [`TextConfig::missing_glyph`].
    #[serde(default)]
    pub missing_glyph: MissingGlyph,
}

impl FontMetadata {
    /// Parse the metadata from a TOML string.
    ///
    /// # Errors
    ///
    /// - When the string is not valid TOML or the fields don't match.
    #[inline]
    pub fn from_toml(source: &str) -> Result<Self, MetadataError> {
        Ok(toml::from_str(source)?)
    }

    /// Load the metadata belonging to a font sheet.
    ///
    /// # Arguments
    ///
    /// * `sheet_path` - Path of the PNG, the extension will be replaced by `toml`.
    ///
    /// # Errors
    ///
    /// - When the TOML file can't be read or parsed.
    #[inline]
    pub fn load_for_sheet(sheet_path: impl AsRef<Path>) -> Result<Self> {
        let path = sheet_path.as_ref().with_extension("toml");

        let parse = || -> Result<Self, MetadataError> {
            let source = std::fs::read_to_string(&path)?;

            Self::from_toml(&source)
        };

        parse().map_err(|source| Error::Metadata { path, source })
    }

    /// Layout configuration described by this metadata.
    #[inline]
    #[must_use]
    pub fn text_config(&self) -> TextConfig {
        TextConfig::default()
            .with_letter_spacing(self.letter_spacing)
            .with_line_spacing(self.line_spacing)
            .with_missing_glyph(self.missing_glyph)
    }

    /// Default for the `letter_spacing` field.
    #[inline]
    const fn default_letter_spacing() -> i32 {
        1
    }

    /// Default for the `line_spacing` field.
    #[inline]
    const fn default_line_spacing() -> i32 {
        -2
    }
}
