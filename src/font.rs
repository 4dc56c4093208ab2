//! Split a horizontal sprite sheet of variable width glyphs into a font.
//!
//! The top row of the sheet marks where every glyph starts and ends.
//! The color of the top-left pixel is the separator color, every run of other colors in the top row is a single glyph:
//!
//! ```text
//! x = separator, . = glyph pixel
//!
//! x...x.....xx..x
//!  a    b      1
//! ```
//!
//! The columns of a run are a glyph spanning the full height of the sheet, runs are assigned to the characters of the alphabet from left to right.

use std::path::Path;

use hashbrown::HashMap;
use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::{
    config::FontMetadata,
    error::{Error, Result, MEMORY_PATH},
    image,
};

/// Single character image cut from the font sheet.
#[derive(Debug, Clone)]
pub struct Glyph {
    /// Pixels of the glyph, always as high as the font.
    image: ImgVec<RGBA8>,
}

impl Glyph {
    /// Wrap an image as a glyph.
    pub(crate) const fn new(image: ImgVec<RGBA8>) -> Self {
        Self { image }
    }

    /// Width of the glyph in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width() as u32
    }

    /// Height of the glyph in pixels, equal to the font height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height() as u32
    }

    /// Pixels of the glyph.
    #[inline]
    #[must_use]
    pub fn image(&self) -> ImgRef<'_, RGBA8> {
        self.image.as_ref()
    }
}

/// A font is just a collection of glyph images mapped by character.
///
/// Immutable after it's built, so a single atlas can be shared by many [`crate::TextLayout`]s.
#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    /// Height of every glyph, the height of the sheet.
    glyph_height: u32,
    /// Characters the sheet was built with, in order.
    alphabet: String,
    /// Glyph image for each character.
    glyphs: HashMap<char, Glyph>,
}

impl GlyphAtlas {
    /// Load a font sheet PNG from disk.
    ///
    /// # Arguments
    ///
    /// * `path` - Location of the PNG.
    /// * `alphabet` - Characters in the sheet from left to right, every character maps to a single glyph.
    ///
    /// # Errors
    ///
    /// - When the file can't be read.
    /// - When the file is not a PNG.
    /// - When the amount of glyphs in the sheet doesn't match the amount of characters in the alphabet.
    #[inline]
    pub fn build(path: impl AsRef<Path>, alphabet: &str) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading font sheet '{}'", path.display());

        let bytes = std::fs::read(path).map_err(|source| Error::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let sheet = image::decode_png(&bytes).map_err(|source| Error::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_image(sheet.as_ref(), alphabet)
    }

    /// Load a font sheet PNG from disk with the alphabet and layout taken from the TOML metadata next to it.
    ///
    /// See [`FontMetadata`] for the format.
    ///
    /// # Returns
    ///
    /// - The font and the metadata it was built with.
    ///
    /// # Errors
    ///
    /// - When the metadata can't be read.
    /// - For the same reasons as [`Self::build`].
    #[inline]
    pub fn load(path: impl AsRef<Path>) -> Result<(Self, FontMetadata)> {
        let path = path.as_ref();

        let metadata = FontMetadata::load_for_sheet(path)?;
        let atlas = Self::build(path, &metadata.alphabet)?;

        Ok((atlas, metadata))
    }

    /// Parse a font sheet from PNG bytes already in memory.
    ///
    /// # Errors
    ///
    /// - When the bytes are not a PNG.
    /// - When the amount of glyphs in the sheet doesn't match the amount of characters in the alphabet.
    #[inline]
    pub fn from_png_bytes(png_bytes: &[u8], alphabet: &str) -> Result<Self> {
        let sheet = image::decode_png(png_bytes).map_err(|source| Error::Decode {
            path: MEMORY_PATH.into(),
            source,
        })?;

        Self::from_image(sheet.as_ref(), alphabet)
    }

    /// Split an already decoded sheet into glyphs.
    ///
    /// # Errors
    ///
    /// - When the amount of glyphs in the sheet doesn't match the amount of characters in the alphabet.
    #[inline]
    pub fn from_image(sheet: ImgRef<'_, RGBA8>, alphabet: &str) -> Result<Self> {
        let glyph_images = split_glyphs(sheet);

        // Every character must have exactly one glyph
        let wanted = alphabet.chars().count();
        if wanted != glyph_images.len() {
            return Err(Error::GlyphCountMismatch {
                alphabet: wanted,
                glyphs: glyph_images.len(),
            });
        }

        // Later duplicates overwrite earlier characters
        let glyphs = alphabet
            .chars()
            .zip(glyph_images)
            .map(|(ch, image)| (ch, Glyph::new(image)))
            .collect::<HashMap<_, _>>();

        log::debug!(
            "Split {}x{} font sheet into {} glyphs",
            sheet.width(),
            sheet.height(),
            glyphs.len()
        );

        Ok(Self {
            glyph_height: sheet.height() as u32,
            alphabet: alphabet.to_owned(),
            glyphs,
        })
    }

    /// Get the glyph for a character.
    #[inline]
    #[must_use]
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Whether the font has a glyph for the character.
    #[inline]
    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Height of every glyph in pixels.
    #[inline]
    #[must_use]
    pub const fn glyph_height(&self) -> u32 {
        self.glyph_height
    }

    /// Characters the font was built with, in sheet order.
    ///
    /// Can contain duplicates, only the last one of those has a glyph.
    #[inline]
    #[must_use]
    pub fn alphabet(&self) -> &str {
        &self.alphabet
    }

    /// All characters with a glyph, in no particular order.
    #[inline]
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.glyphs.keys().copied()
    }

    /// Amount of characters with a glyph.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the font doesn't have any glyphs.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Cut every run of non-separator colors in the top row into a separate image.
///
/// A run that isn't closed by a separator at the right edge of the sheet is ignored.
fn split_glyphs(sheet: ImgRef<'_, RGBA8>) -> Vec<ImgVec<RGBA8>> {
    let mut images = Vec::new();

    let Some(top_row) = sheet.rows().next() else {
        return images;
    };
    let Some(&separator) = top_row.first() else {
        return images;
    };

    let mut glyph_width = 0;
    let mut last_separator = 0;
    for (x, pixel) in top_row.iter().enumerate() {
        if *pixel != separator {
            // Still inside a glyph
            glyph_width += 1;
            continue;
        }

        // Consecutive separators don't form a glyph
        if glyph_width > 0 {
            let glyph = sheet.sub_image(last_separator + 1, 0, glyph_width, sheet.height());
            images.push(ImgVec::new(
                glyph.pixels().collect(),
                glyph_width,
                sheet.height(),
            ));
        }

        last_separator = x;
        glyph_width = 0;
    }

    images
}

#[cfg(test)]
mod tests {
    use imgref::ImgVec;
    use rgb::RGBA8;

    use super::GlyphAtlas;
    use crate::error::Error;

    const SEP: RGBA8 = RGBA8::new(0, 0, 0, 255);
    const CLEAR: RGBA8 = RGBA8::new(0, 0, 0, 0);

    /// Build a sheet from a top row description, `|` is a separator and anything else is glyph.
    ///
    /// Every glyph column is filled with a color derived from its index so glyphs can be told apart.
    fn sheet(top_row: &str, height: usize) -> ImgVec<RGBA8> {
        let width = top_row.chars().count();
        let mut pixels = vec![CLEAR; width * height];
        for (x, ch) in top_row.chars().enumerate() {
            if ch == '|' {
                pixels[x] = SEP;
            } else {
                for y in 0..height {
                    pixels[x + y * width] = RGBA8::new(x as u8, y as u8, 0, 255);
                }
            }
        }

        ImgVec::new(pixels, width, height)
    }

    #[test]
    fn split_widths() {
        let atlas = GlyphAtlas::from_image(sheet("|aaaaa|bbbbbbb|111|", 10).as_ref(), "ab1").unwrap();

        assert_eq!(atlas.len(), 3);
        assert_eq!(atlas.glyph_height(), 10);
        assert_eq!(atlas.glyph('a').unwrap().width(), 5);
        assert_eq!(atlas.glyph('b').unwrap().width(), 7);
        assert_eq!(atlas.glyph('1').unwrap().width(), 3);
        assert_eq!(atlas.glyph('1').unwrap().height(), 10);
        assert!(atlas.glyph('c').is_none());
    }

    #[test]
    fn glyph_pixels_come_from_the_right_columns() {
        let atlas = GlyphAtlas::from_image(sheet("|aa|bbb|", 2).as_ref(), "ab").unwrap();

        let b = atlas.glyph('b').unwrap().image();
        // First 'b' column is x = 4 in the sheet
        assert_eq!(b[(0_usize, 0_usize)], RGBA8::new(4, 0, 0, 255));
        assert_eq!(b[(2_usize, 1_usize)], RGBA8::new(6, 1, 0, 255));
    }

    #[test]
    fn consecutive_separators_are_no_glyph() {
        let atlas = GlyphAtlas::from_image(sheet("|||a||||b|", 3).as_ref(), "ab").unwrap();

        assert_eq!(atlas.glyph('a').unwrap().width(), 1);
        assert_eq!(atlas.glyph('b').unwrap().width(), 1);
    }

    #[test]
    fn unterminated_last_run_is_ignored() {
        let result = GlyphAtlas::from_image(sheet("|aa|bb", 3).as_ref(), "ab");

        assert!(matches!(
            result,
            Err(Error::GlyphCountMismatch {
                alphabet: 2,
                glyphs: 1
            })
        ));
    }

    #[test]
    fn multibyte_characters() {
        let atlas = GlyphAtlas::from_image(sheet("|a|bb|ccc|", 4).as_ref(), "é€😀").unwrap();

        assert_eq!(atlas.glyph('é').unwrap().width(), 1);
        assert_eq!(atlas.glyph('€').unwrap().width(), 2);
        assert_eq!(atlas.glyph('😀').unwrap().width(), 3);
    }

    #[test]
    fn duplicate_characters_last_wins() {
        let atlas = GlyphAtlas::from_image(sheet("|a|bb|ccc|", 4).as_ref(), "xyx").unwrap();

        assert_eq!(atlas.len(), 2);
        assert_eq!(atlas.alphabet(), "xyx");
        assert_eq!(atlas.glyph('x').unwrap().width(), 3);
    }

    #[test]
    fn single_glyph() {
        // The top-left pixel is always the separator, so it can't be part of a glyph
        let atlas = GlyphAtlas::from_image(sheet("|a|", 1).as_ref(), "a").unwrap();

        assert!(atlas.contains('a'));
        assert!(!atlas.is_empty());
        assert_eq!(atlas.chars().collect::<Vec<_>>(), vec!['a']);
    }

    #[test]
    fn empty_alphabet_and_no_runs() {
        let atlas = GlyphAtlas::from_image(sheet("||||", 2).as_ref(), "").unwrap();

        assert!(atlas.is_empty());
    }
}
