#![forbid(unsafe_code)]

//! Opinionated bitmap fonts for 2D pixel-art games.
//!
//! # Features
//!
//! - Variable width glyphs cut from a single PNG sprite sheet, no fixed grid required.
//! - Full Unicode characters, multi-byte characters are a single glyph.
//! - Multi-line text composed into a single image sized to exactly fit it.
//! - Configurable letter and line spacing, both can be negative.
//! - Placeholder blocks or skipping for characters that are not in the font.
//! - Small software [`Canvas`] to draw the composed text with a transformation and tint.
//!
//! # Non-Goals
//!
//! - Kerning, ligatures, hinting or anything else a vector font renderer does.
//! - Smooth scaling, everything is nearest-neighbor because it's meant for pixel art.
//! - Support all possible file formats, only PNG sheets are read.
//!
//! # Font Sheets
//!
//! A font is a PNG where all glyphs are placed next to each other in a single horizontal strip.
//! The top-left pixel defines the separator color, in the top row every glyph must be surrounded by pixels of that color:
//!
//! ```text
//! |.....|.......|...|
//!   a       b     1
//! ```
//!
//! Every run of non-separator pixels in the top row becomes a glyph as high as the whole image.
//! The runs are assigned to the characters of an alphabet string from left to right.
//!
//! # Example
//!
//! ```no_run
//! use imgfont::{Canvas, DrawOptions, GlyphAtlas, TextConfig, TextLayout};
//!
//! # fn main() -> imgfont::Result<()> {
//! // Load the font once
//! let font = GlyphAtlas::build("assets/font.png", "abcdefghijklmnopqrstuvwxyz0123456789")?;
//!
//! // Every text that's drawn gets its own layout, they all share the font
//! let mut counter = TextLayout::with_config(&font, TextConfig::default().with_letter_spacing(2));
//! counter.set_text("counter\n42");
//!
//! // Draw it rotated around its top-left corner
//! let mut canvas = Canvas::new(320, 240);
//! counter.draw(&mut canvas, &DrawOptions::default().rotate(0.3).translate((40.0, 40.0)))?;
//! # Ok(())
//! # }
//! ```
//!
//! A font sheet can also describe itself with a TOML file next to it, see [`FontMetadata`] and [`GlyphAtlas::load`].

pub mod canvas;
pub mod config;
pub mod error;
pub mod font;
pub mod image;
pub mod text;

pub use canvas::{Canvas, DrawOptions};
pub use config::{FontMetadata, MissingGlyph, TextConfig};
pub use error::{Error, Result};
pub use font::{Glyph, GlyphAtlas};
pub use imgref::{ImgRef, ImgVec};
pub use rgb::RGBA8;
pub use text::{ComposedText, TextLayout, MAX_SIZE};
