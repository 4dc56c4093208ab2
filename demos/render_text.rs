//! Render text with a font sheet next to a spinning rectangle and triangle, and save the result as a PNG.
//!
//! ```sh
//! cargo run --example render_text -- font.png "abc123" "abc\n123" out.png
//! ```

use std::f32::consts::TAU;

use glam::{Affine2, Vec2};
use imgfont::{Canvas, DrawOptions, GlyphAtlas, TextLayout, RGBA8};
use miette::{IntoDiagnostic, Result, WrapErr};

/// Size of the canvas in pixels.
const SIZE: (u32, u32) = (320, 240);

/// Amount of fixed updates per second.
const UPDATES_PER_SECOND: f32 = 60.0;

/// Amount of updates to run before taking the snapshot.
const UPDATES: u32 = 45;

/// Shape rotating at a constant speed.
struct Spinner {
    /// Current rotation.
    radians: f32,
    /// Rotation added every second, negative spins counter-clockwise.
    speed: f32,
}

impl Spinner {
    /// Advance a single fixed timestep.
    fn update(&mut self, delta_time: f32) {
        self.radians = self.speed.mul_add(delta_time, self.radians) % TAU;
    }

    /// Rotate the corners of a shape around its center and move it to a position.
    fn transform(&self, corners: &[Vec2], center: Vec2, position: Vec2) -> Vec<Vec2> {
        let transform = Affine2::from_angle_translation(self.radians, position)
            * Affine2::from_translation(-center);

        corners
            .iter()
            .map(|corner| transform.transform_point2(*corner))
            .collect()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (Some(sheet), Some(alphabet), Some(text), Some(output)) =
        (args.next(), args.next(), args.next(), args.next())
    else {
        miette::bail!("usage: render_text <sheet.png> <alphabet> <text> <out.png>");
    };
    // Allow typing newlines on the command line
    let text = text.replace("\\n", "\n");

    let font = GlyphAtlas::build(&sheet, &alphabet)?;
    let mut label = TextLayout::new(&font);
    label.set_text(&text);

    let mut rectangle = Spinner {
        radians: 0.0,
        speed: 1.0,
    };
    let mut triangle = Spinner {
        radians: 0.0,
        speed: -0.5,
    };
    for _ in 0..UPDATES {
        rectangle.update(1.0 / UPDATES_PER_SECOND);
        triangle.update(1.0 / UPDATES_PER_SECOND);
    }

    let mut canvas = Canvas::new(SIZE.0, SIZE.1);
    canvas.fill(RGBA8::new(0x9B, 0xAD, 0xB7, 0xFF));

    // Pale translucent square rotating around its center
    let square = rectangle.transform(
        &[
            Vec2::ZERO,
            Vec2::new(80.0, 0.0),
            Vec2::new(80.0, 80.0),
            Vec2::new(0.0, 80.0),
        ],
        Vec2::splat(40.0),
        Vec2::splat(40.0),
    );
    canvas.fill_quad(
        [square[0], square[1], square[2], square[3]],
        RGBA8::new(0xFF, 0xFF, 0xCC, 0x22),
    );

    // Red triangle rotating the other way
    let corners = triangle.transform(
        &[Vec2::ZERO, Vec2::new(40.0, 0.0), Vec2::new(20.0, 60.0)],
        Vec2::new(20.0, 30.0),
        Vec2::splat(90.0),
    );
    canvas.fill_triangle(
        [corners[0], corners[1], corners[2]],
        RGBA8::new(0xFF, 0x00, 0x00, 0xFF),
    );

    // Text slightly rotated with the same spin as the square
    label.draw(
        &mut canvas,
        &DrawOptions::default()
            .scale((2.0, 2.0))
            .rotate(rectangle.radians * 0.1)
            .translate((140.0, 120.0)),
    )?;

    let png = canvas.to_png()?;
    std::fs::write(&output, png)
        .into_diagnostic()
        .wrap_err_with(|| format!("Error writing output image '{output}'"))?;

    log::info!("Wrote {}x{} image to '{output}'", SIZE.0, SIZE.1);

    Ok(())
}
