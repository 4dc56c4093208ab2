//! Software drawing surface the composed text is presented on.

use glam::{Affine2, Vec2};
use imgref::{ImgRef, ImgVec};
use rgb::RGBA8;

use crate::{error::Result, image};

/// How an image should be drawn on a [`Canvas`].
///
/// Transformations are applied in the order they are added, like a chain of matrix multiplications where the last one is on the left.
///
/// # Example
///
/// ```rust
/// # use imgfont::DrawOptions;
/// // Rotate a 80x80 image around its center
/// DrawOptions::default()
///     .translate((-40.0, -40.0))
///     .rotate(0.5)
///     .translate((40.0, 40.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct DrawOptions {
    /// Maps image pixel coordinates to canvas pixel coordinates.
    ///
    /// Defaults to identity, drawing the image in the top-left corner.
    pub transform: Affine2,
    /// Color every pixel is multiplied with.
    ///
    /// Defaults to opaque white, which doesn't change anything.
    pub tint: RGBA8,
}

impl DrawOptions {
    /// Move the image after the previous transformations.
    #[inline]
    #[must_use]
    pub fn translate(mut self, offset: impl Into<(f32, f32)>) -> Self {
        let (x, y) = offset.into();
        self.transform = Affine2::from_translation(Vec2::new(x, y)) * self.transform;

        self
    }

    /// Rotate the image around the origin after the previous transformations.
    ///
    /// # Arguments
    ///
    /// * `radians` - Clockwise rotation, since the Y axis points down.
    #[inline]
    #[must_use]
    pub fn rotate(mut self, radians: f32) -> Self {
        self.transform = Affine2::from_angle(radians) * self.transform;

        self
    }

    /// Scale the image from the origin after the previous transformations.
    #[inline]
    #[must_use]
    pub fn scale(mut self, scale: impl Into<(f32, f32)>) -> Self {
        let (x, y) = scale.into();
        self.transform = Affine2::from_scale(Vec2::new(x, y)) * self.transform;

        self
    }

    /// Set the color every pixel is multiplied with.
    #[inline]
    #[must_use]
    pub const fn with_tint(mut self, tint: RGBA8) -> Self {
        self.tint = tint;

        self
    }

    /// Replace the whole transformation.
    #[inline]
    #[must_use]
    pub const fn with_transform(mut self, transform: Affine2) -> Self {
        self.transform = transform;

        self
    }
}

impl Default for DrawOptions {
    #[inline]
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            tint: RGBA8::new(0xFF, 0xFF, 0xFF, 0xFF),
        }
    }
}

/// Pixel buffer that images and simple shapes can be drawn on.
///
/// Everything drawn is alpha blended on top of what's already there.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// Pixels of the canvas.
    image: ImgVec<RGBA8>,
}

impl Canvas {
    /// Create a fully transparent canvas.
    #[inline]
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let image = image::blank(width as usize, height as usize);

        Self { image }
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width() as u32
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height() as u32
    }

    /// Fill the canvas with a single color, replacing everything.
    #[inline]
    pub fn fill(&mut self, color: RGBA8) {
        self.image.buf_mut().fill(color);
    }

    /// Get a single pixel, `None` when out of bounds.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        (x < self.width() && y < self.height()).then(|| self.image[(x as usize, y as usize)])
    }

    /// Set a single pixel, replacing what was there.
    ///
    /// If the coordinate is out of bounds nothing will be done.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: RGBA8) {
        if x < self.width() && y < self.height() {
            self.image[(x as usize, y as usize)] = color;
        }
    }

    /// Fill an axis-aligned rectangle.
    ///
    /// # Arguments
    ///
    /// * `(x, y)` - Top-left corner, can be outside of the canvas.
    /// * `(width, height)` - Size of the rectangle.
    #[inline]
    pub fn fill_rect(
        &mut self,
        position: impl Into<(i32, i32)>,
        size: impl Into<(u32, u32)>,
        color: RGBA8,
    ) {
        let (x, y) = position.into();
        let (width, height) = size.into();

        let rect = image::solid(width as usize, height as usize, color);
        image::blit(&mut self.image, rect.as_ref(), i64::from(x), i64::from(y));
    }

    /// Fill a triangle.
    ///
    /// Every pixel with its center inside the triangle is filled, the winding order doesn't matter.
    #[inline]
    pub fn fill_triangle(&mut self, corners: [Vec2; 3], color: RGBA8) {
        for (x, y) in self.triangle_pixels(corners) {
            self.blend_pixel(x, y, color);
        }
    }

    /// Fill a convex polygon with 4 corners, in clockwise or counter-clockwise order.
    #[inline]
    pub fn fill_quad(&mut self, corners: [Vec2; 4], color: RGBA8) {
        let [a, b, c, d] = corners;

        // Pixels on the shared diagonal are covered by both triangles, only blend them once
        let mut mask = image::blank(self.image.width(), self.image.height());
        for position in self
            .triangle_pixels([a, b, c])
            .into_iter()
            .chain(self.triangle_pixels([a, c, d]))
        {
            mask[position] = color;
        }

        image::blit(&mut self.image, mask.as_ref(), 0, 0);
    }

    /// Draw an image with a transformation and tint.
    ///
    /// Every canvas pixel covered by the transformed image samples the nearest image pixel, no smoothing is applied.
    #[inline]
    pub fn draw_image(&mut self, source: ImgRef<'_, RGBA8>, options: &DrawOptions) {
        let (source_width, source_height) = (source.width() as f32, source.height() as f32);

        // A collapsed transformation doesn't cover any pixels
        if options.transform.matrix2.determinant().abs() < f32::EPSILON {
            return;
        }
        let inverse = options.transform.inverse();

        // Find the area on the canvas covered by the image
        let corners = [
            Vec2::ZERO,
            Vec2::new(source_width, 0.0),
            Vec2::new(0.0, source_height),
            Vec2::new(source_width, source_height),
        ]
        .map(|corner| options.transform.transform_point2(corner));
        let min = corners.iter().fold(Vec2::MAX, |min, corner| min.min(*corner));
        let max = corners.iter().fold(Vec2::MIN, |max, corner| max.max(*corner));
        let Some((start_x, end_x, start_y, end_y)) = self.clamp_bounds(min, max) else {
            return;
        };

        for y in start_y..end_y {
            for x in start_x..end_x {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let sample = inverse.transform_point2(center).floor();

                if sample.x < 0.0
                    || sample.y < 0.0
                    || sample.x >= source_width
                    || sample.y >= source_height
                {
                    continue;
                }

                let pixel = source[(sample.x as usize, sample.y as usize)];
                self.blend_pixel(x, y, image::tint(pixel, options.tint));
            }
        }
    }

    /// Pixels of the canvas.
    #[inline]
    #[must_use]
    pub fn image(&self) -> ImgRef<'_, RGBA8> {
        self.image.as_ref()
    }

    /// Take the pixels of the canvas.
    #[inline]
    #[must_use]
    pub fn into_image(self) -> ImgVec<RGBA8> {
        self.image
    }

    /// Encode the canvas as a PNG.
    ///
    /// # Errors
    ///
    /// - When the canvas is empty.
    #[inline]
    pub fn to_png(&self) -> Result<Vec<u8>> {
        Ok(image::encode_png(self.image())?)
    }

    /// All pixels on the canvas with their center inside a triangle.
    fn triangle_pixels(&self, corners: [Vec2; 3]) -> Vec<(usize, usize)> {
        /// Twice the signed area of the triangle, positive when clockwise.
        fn signed_area(a: Vec2, b: Vec2, c: Vec2) -> f32 {
            (b - a).perp_dot(c - a)
        }

        let [a, b, c] = corners;
        let area = signed_area(a, b, c);
        if area.abs() < f32::EPSILON {
            // Degenerate, nothing to fill
            return Vec::new();
        }

        let Some((start_x, end_x, start_y, end_y)) =
            self.clamp_bounds(a.min(b).min(c), a.max(b).max(c))
        else {
            return Vec::new();
        };

        let mut pixels = Vec::new();
        for y in start_y..end_y {
            for x in start_x..end_x {
                let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

                // Inside when all sub triangles have the same winding as the full one
                let inside = [
                    signed_area(a, b, center),
                    signed_area(b, c, center),
                    signed_area(c, a, center),
                ]
                .iter()
                .all(|sub_area| sub_area * area.signum() >= 0.0);

                if inside {
                    pixels.push((x, y));
                }
            }
        }

        pixels
    }

    /// Alpha blend a color on top of a pixel.
    fn blend_pixel(&mut self, x: usize, y: usize, color: RGBA8) {
        let pixel = &mut self.image[(x, y)];
        *pixel = image::blend(*pixel, color);
    }

    /// Convert a floating point area to the pixel ranges inside the canvas.
    ///
    /// Returns `None` when the area doesn't overlap the canvas.
    fn clamp_bounds(&self, min: Vec2, max: Vec2) -> Option<(usize, usize, usize, usize)> {
        let size = Vec2::new(self.width() as f32, self.height() as f32);
        let min = min.floor().clamp(Vec2::ZERO, size);
        let max = max.ceil().clamp(Vec2::ZERO, size);

        (min.x < max.x && min.y < max.y).then(|| {
            (
                min.x as usize,
                max.x as usize,
                min.y as usize,
                max.y as usize,
            )
        })
    }
}
