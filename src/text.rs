//! Lay out strings with a font into a single image.

use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::{
    canvas::{Canvas, DrawOptions},
    config::{MissingGlyph, TextConfig},
    error::{Error, Result},
    font::{Glyph, GlyphAtlas},
    image,
};

/// Largest width or height in pixels of a composed image, glyphs beyond it are cut off.
pub const MAX_SIZE: u32 = 8192;

/// Text composed into a single image, ready to be drawn.
///
/// Created by [`TextLayout::compose`].
#[derive(Debug, Clone)]
pub struct ComposedText {
    /// Pixels of the composed text, sized to exactly fit all glyphs.
    image: ImgVec<RGBA8>,
    /// Text that was composed.
    text: String,
    /// Letter spacing used for composing.
    letter_spacing: i32,
    /// Line spacing used for composing.
    line_spacing: i32,
}

impl ComposedText {
    /// Pixels of the composed text.
    #[inline]
    #[must_use]
    pub fn image(&self) -> ImgRef<'_, RGBA8> {
        self.image.as_ref()
    }

    /// Width of the image in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width() as u32
    }

    /// Height of the image in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height() as u32
    }

    /// Text that was composed.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Letter spacing the text was composed with.
    #[inline]
    #[must_use]
    pub const fn letter_spacing(&self) -> i32 {
        self.letter_spacing
    }

    /// Line spacing the text was composed with.
    #[inline]
    #[must_use]
    pub const fn line_spacing(&self) -> i32 {
        self.line_spacing
    }

    /// Encode the composed text as a PNG.
    ///
    /// # Errors
    ///
    /// - When the text is empty, PNG doesn't allow images without pixels.
    #[inline]
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(image::encode_png(self.image())?)
    }
}

impl PartialEq for ComposedText {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.letter_spacing == other.letter_spacing
            && self.line_spacing == other.line_spacing
            && (self.width(), self.height()) == (other.width(), other.height())
            && self.image().pixels().eq(other.image().pixels())
    }
}

impl Eq for ComposedText {}

/// Where a single glyph ends up in the composed image.
struct Placement<'glyph> {
    /// Glyph to paint.
    glyph: &'glyph Glyph,
    /// Horizontal offset of the left edge.
    x: i64,
    /// Vertical offset of the top edge.
    y: i64,
}

/// Lays out text with a font, keeping the last composed result.
///
/// The font is borrowed, so many layouts can share a single [`GlyphAtlas`].
/// Composing replaces the previous result, a layout has a single writer and should be owned by whatever updates it.
///
/// # Example
///
/// ```no_run
/// # fn main() -> imgfont::Result<()> {
/// use imgfont::{Canvas, DrawOptions, GlyphAtlas, TextLayout};
///
/// let font = GlyphAtlas::build("assets/font.png", "abcdefghijklmnopqrstuvwxyz")?;
///
/// let mut text = TextLayout::new(&font);
/// text.set_text("hello\nworld");
///
/// let mut canvas = Canvas::new(320, 240);
/// text.draw(&mut canvas, &DrawOptions::default().translate((10.0, 10.0)))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TextLayout<'atlas> {
    /// Font the glyphs are taken from.
    atlas: &'atlas GlyphAtlas,
    /// Spacing and missing glyph behavior.
    config: TextConfig,
    /// Drawn in place of missing characters.
    placeholder: Glyph,
    /// Result of the last [`Self::compose`] call.
    composed: Option<ComposedText>,
}

impl<'atlas> TextLayout<'atlas> {
    /// Lay out text with the default configuration.
    #[inline]
    #[must_use]
    pub fn new(atlas: &'atlas GlyphAtlas) -> Self {
        Self::with_config(atlas, TextConfig::default())
    }

    /// Lay out text with a custom configuration.
    #[inline]
    #[must_use]
    pub fn with_config(atlas: &'atlas GlyphAtlas, config: TextConfig) -> Self {
        let placeholder = placeholder(atlas, &config);

        Self {
            atlas,
            config,
            placeholder,
            composed: None,
        }
    }

    /// Calculate the size of the image required to fit the text.
    ///
    /// Every line is as high as the font, `'\n'` starts a new line.
    /// The width is the width of the longest line, spacing is only added between glyphs and not after the last one.
    /// Both sides are limited to [`MAX_SIZE`].
    ///
    /// Skipped characters are only logged at `debug` level here, composing logs them as warnings.
    ///
    /// # Returns
    ///
    /// - Tuple of `(width, height)` in pixels.
    #[inline]
    #[must_use]
    pub fn measure(&self, text: &str) -> (u32, u32) {
        self.layout(text, log::Level::Debug).0
    }

    /// Compose the text into a new image, replacing the previous one.
    ///
    /// The image is exactly the size returned by [`Self::measure`].
    ///
    /// Characters not in the font are handled as configured with [`TextConfig::missing_glyph`].
    #[inline]
    pub fn compose(&mut self, text: &str) -> &ComposedText {
        let ((width, height), placements) = self.layout(text, log::Level::Warn);

        let mut image = image::blank(width as usize, height as usize);
        for Placement { glyph, x, y } in placements {
            image::blit(&mut image, glyph.image(), x, y);
        }

        log::debug!(
            "Composed text of {} characters into {width}x{height} image",
            text.chars().count()
        );

        self.composed.insert(ComposedText {
            image,
            text: text.to_owned(),
            letter_spacing: self.config.letter_spacing,
            line_spacing: self.config.line_spacing,
        })
    }

    /// Set the text to draw.
    ///
    /// See [`Self::compose`].
    #[inline]
    pub fn set_text(&mut self, text: &str) {
        self.compose(text);
    }

    /// Draw the composed text on a canvas.
    ///
    /// # Errors
    ///
    /// - When no text has been composed yet.
    #[inline]
    pub fn draw(&self, canvas: &mut Canvas, options: &DrawOptions) -> Result<()> {
        let composed = self.composed.as_ref().ok_or(Error::NotComposed)?;

        canvas.draw_image(composed.image(), options);

        Ok(())
    }

    /// Result of the last composition, `None` if nothing has been composed yet.
    #[inline]
    #[must_use]
    pub const fn composed(&self) -> Option<&ComposedText> {
        self.composed.as_ref()
    }

    /// Font the text is laid out with.
    #[inline]
    #[must_use]
    pub const fn atlas(&self) -> &'atlas GlyphAtlas {
        self.atlas
    }

    /// Current configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &TextConfig {
        &self.config
    }

    /// Change the configuration.
    ///
    /// The current composition is kept, the new configuration is used the next time text is composed.
    #[inline]
    pub fn set_config(&mut self, config: TextConfig) {
        self.placeholder = placeholder(self.atlas, &config);
        self.config = config;
    }

    /// Calculate where every glyph should be placed and the size of the image fitting all of them.
    ///
    /// This is used for both measuring and composing so they can never disagree.
    ///
    /// Skipped characters are logged with `skip_level`.
    fn layout(&self, text: &str, skip_level: log::Level) -> ((u32, u32), Vec<Placement<'_>>) {
        let glyph_height = i64::from(self.atlas.glyph_height());
        let letter_spacing = i64::from(self.config.letter_spacing);
        let line_spacing = i64::from(self.config.line_spacing);

        let mut placements = Vec::with_capacity(text.len());
        let mut x = 0;
        let mut y = 0;
        let mut width = 0;
        let mut height = glyph_height;

        for ch in text.chars() {
            if ch == '\n' {
                // Move the cursor to the start of the next line
                x = 0;
                y += glyph_height + line_spacing;
                height += glyph_height + line_spacing;
                continue;
            }

            let glyph = match (self.atlas.glyph(ch), self.config.missing_glyph) {
                (Some(glyph), _) => glyph,
                (None, MissingGlyph::Placeholder) => &self.placeholder,
                (None, MissingGlyph::Skip) => {
                    log::log!(skip_level, "{}, skipping it", Error::UnknownGlyph(ch));
                    continue;
                }
            };

            let glyph_width = i64::from(glyph.width());
            placements.push(Placement { glyph, x, y });

            // Spacing is only added when another glyph follows
            width = width.max(x + glyph_width);
            x += glyph_width + letter_spacing;
        }

        let size = (clamp_to_u32(width), clamp_to_u32(height));

        (size, placements)
    }
}

/// Solid block drawn for missing characters.
fn placeholder(atlas: &GlyphAtlas, config: &TextConfig) -> Glyph {
    Glyph::new(image::solid(
        config.placeholder_width.min(MAX_SIZE) as usize,
        atlas.glyph_height() as usize,
        config.placeholder_color,
    ))
}

/// Convert a pixel size that can become negative with negative spacing or huge with huge spacing.
fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.clamp(0, i64::from(MAX_SIZE))).unwrap_or(MAX_SIZE)
}
