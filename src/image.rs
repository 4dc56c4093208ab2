//! Raw RGBA images, PNG decoding and encoding.

use std::io::Cursor;

use imgref::{ImgRef, ImgVec};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use rgb::RGBA8;

use crate::error::DecodeError;

/// Decode a PNG into 8 bit RGBA pixels.
///
/// Indexed, grayscale and 16 bit images are converted.
///
/// # Errors
///
/// - When the bytes are not a valid PNG.
#[inline]
pub fn decode_png(bytes: &[u8]) -> Result<ImgVec<RGBA8>, DecodeError> {
    // Decode the PNG
    let mut decoder = Decoder::new(Cursor::new(bytes));

    // Discard text chunks
    decoder.set_ignore_text_chunk(true);

    // Convert indexed and low bit depth images to 8 bit with an alpha channel
    decoder.set_transformations(Transformations::normalize_to_color8() | Transformations::ALPHA);

    // Start parsing the PNG
    let mut reader = decoder.read_info()?;

    // Ensure we can use the PNG colors
    let (color_type, bits) = reader.output_color_type();
    if bits != BitDepth::Eight {
        return Err(DecodeError::UnsupportedColor { color_type, bits });
    }

    // Read the first frame
    let mut buf = vec![0_u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];

    let pixels = match color_type {
        ColorType::Rgba => bytemuck::cast_slice::<u8, RGBA8>(bytes).to_vec(),
        // Grayscale images with the alpha transformation applied
        ColorType::GrayscaleAlpha => bytes
            .chunks_exact(2)
            .map(|gray_alpha| RGBA8::new(gray_alpha[0], gray_alpha[0], gray_alpha[0], gray_alpha[1]))
            .collect(),
        _ => return Err(DecodeError::UnsupportedColor { color_type, bits }),
    };

    Ok(ImgVec::new(pixels, info.width as usize, info.height as usize))
}

/// Encode an image as an 8 bit RGBA PNG.
///
/// # Errors
///
/// - When the image has no pixels, PNG doesn't allow empty images.
#[inline]
pub fn encode_png(image: ImgRef<'_, RGBA8>) -> Result<Vec<u8>, png::EncodingError> {
    let mut bytes = Vec::new();

    {
        let mut encoder = Encoder::new(&mut bytes, image.width() as u32, image.height() as u32);
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);

        let mut writer = encoder.write_header()?;

        // Rows might be strided so collect them first
        let pixels = image.pixels().collect::<Vec<_>>();
        writer.write_image_data(bytemuck::cast_slice(&pixels))?;
        writer.finish()?;
    }

    Ok(bytes)
}

/// Create a fully transparent image.
///
/// Zero sized images are allowed, they just don't contain any pixels.
pub(crate) fn blank(width: usize, height: usize) -> ImgVec<RGBA8> {
    // The stride can't be zero, even when the image is
    let stride = width.max(1);

    ImgVec::new_stride(
        vec![RGBA8::default(); stride * height.max(1)],
        width,
        height,
        stride,
    )
}

/// Create an image filled with a single color.
pub(crate) fn solid(width: usize, height: usize, color: RGBA8) -> ImgVec<RGBA8> {
    let mut image = blank(width, height);
    image.buf_mut().fill(color);

    image
}

/// Paint an image on top of another one with the top-left corner at the offset.
///
/// Pixels falling outside of the target are clipped.
pub(crate) fn blit(target: &mut ImgVec<RGBA8>, source: ImgRef<'_, RGBA8>, x: i64, y: i64) {
    let (target_width, target_height) = (target.width() as i64, target.height() as i64);

    for (source_y, row) in source.rows().enumerate() {
        let target_y = y + source_y as i64;
        if target_y < 0 || target_y >= target_height {
            continue;
        }

        for (source_x, pixel) in row.iter().enumerate() {
            let target_x = x + source_x as i64;
            if target_x < 0 || target_x >= target_width {
                continue;
            }

            let index = (target_x as usize, target_y as usize);
            target[index] = blend(target[index], *pixel);
        }
    }
}

/// Alpha-composite a pixel over another one, "source-over" with straight alpha.
#[must_use]
pub(crate) fn blend(dst: RGBA8, src: RGBA8) -> RGBA8 {
    match src.a {
        0 => dst,
        255 => src,
        _ => {
            let src_alpha = f32::from(src.a) / 255.0;
            let dst_alpha = f32::from(dst.a) / 255.0 * (1.0 - src_alpha);
            let out_alpha = src_alpha + dst_alpha;

            let channel = |src: u8, dst: u8| {
                f32::from(src).mul_add(src_alpha, f32::from(dst) * dst_alpha) / out_alpha
            };

            RGBA8::new(
                to_u8(channel(src.r, dst.r)),
                to_u8(channel(src.g, dst.g)),
                to_u8(channel(src.b, dst.b)),
                to_u8(out_alpha * 255.0),
            )
        }
    }
}

/// Multiply a pixel with a tint, white leaves the pixel untouched.
#[must_use]
pub(crate) const fn tint(pixel: RGBA8, tint: RGBA8) -> RGBA8 {
    /// Multiply two normalized bytes.
    const fn mul(a: u8, b: u8) -> u8 {
        ((a as u16 * b as u16 + 127) / 255) as u8
    }

    RGBA8::new(
        mul(pixel.r, tint.r),
        mul(pixel.g, tint.g),
        mul(pixel.b, tint.b),
        mul(pixel.a, tint.a),
    )
}

/// Round and clamp a float to a color channel.
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use imgref::ImgVec;
    use png::{BitDepth, ColorType, Encoder};
    use rgb::RGBA8;

    use crate::font::{Glyph, GlyphAtlas};

    const RED: RGBA8 = RGBA8::new(255, 0, 0, 255);
    const BLUE: RGBA8 = RGBA8::new(0, 0, 255, 255);

    #[test]
    fn png_roundtrip_keeps_pixels() {
        let image = ImgVec::new(vec![RED, BLUE, RGBA8::default(), RED], 2, 2);

        let bytes = super::encode_png(image.as_ref()).unwrap();
        let decoded = super::decode_png(&bytes).unwrap();

        assert_eq!((decoded.width(), decoded.height()), (2, 2));
        assert_eq!(decoded.buf(), image.buf());
    }

    /// Encode raw sample bytes of a 6x1 sheet with the top row `|gg|g|`.
    fn encode_sheet(
        color: ColorType,
        depth: BitDepth,
        data: &[u8],
        palette: Option<Vec<u8>>,
    ) -> Vec<u8> {
        let mut bytes = Vec::new();

        {
            let mut encoder = Encoder::new(&mut bytes, 6, 1);
            encoder.set_color(color);
            encoder.set_depth(depth);
            if let Some(palette) = palette {
                encoder.set_palette(palette);
            }

            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
            writer.finish().unwrap();
        }

        bytes
    }

    /// Decode the sheet and check both the pixels and the glyphs found in it.
    fn assert_sheet(png: &[u8], separator: RGBA8, glyph: RGBA8) {
        let decoded = super::decode_png(png).unwrap();
        assert_eq!(
            decoded.as_ref().pixels().collect::<Vec<_>>(),
            [separator, glyph, glyph, separator, glyph, separator]
        );

        let font = GlyphAtlas::from_png_bytes(png, "ab").unwrap();
        assert_eq!(font.len(), 2);
        assert_eq!(font.glyph('a').map(Glyph::width), Some(2));
        assert_eq!(font.glyph('b').map(Glyph::width), Some(1));
    }

    #[test]
    fn decode_grayscale() {
        let png = encode_sheet(
            ColorType::Grayscale,
            BitDepth::Eight,
            &[0, 200, 200, 0, 200, 0],
            None,
        );

        assert_sheet(&png, RGBA8::new(0, 0, 0, 255), RGBA8::new(200, 200, 200, 255));
    }

    #[test]
    fn decode_rgb() {
        let png = encode_sheet(
            ColorType::Rgb,
            BitDepth::Eight,
            &[0, 0, 0, 10, 20, 30, 10, 20, 30, 0, 0, 0, 10, 20, 30, 0, 0, 0],
            None,
        );

        assert_sheet(&png, RGBA8::new(0, 0, 0, 255), RGBA8::new(10, 20, 30, 255));
    }

    #[test]
    fn decode_rgba_16_bit() {
        let separator = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF];
        let glyph = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xFF, 0xFF];
        let data = [separator, glyph, glyph, separator, glyph, separator].concat();

        let png = encode_sheet(ColorType::Rgba, BitDepth::Sixteen, &data, None);

        // Only the most significant byte of every sample is kept
        assert_sheet(&png, RGBA8::new(0, 0, 0, 255), RGBA8::new(0x12, 0x56, 0x9A, 0xFF));
    }

    #[test]
    fn decode_indexed() {
        let png = encode_sheet(
            ColorType::Indexed,
            BitDepth::Eight,
            &[0, 1, 1, 0, 1, 0],
            Some(vec![0, 0, 0, 255, 0, 0]),
        );

        assert_sheet(&png, RGBA8::new(0, 0, 0, 255), RED);
    }

    #[test]
    fn decode_garbage() {
        assert!(super::decode_png(b"definitely not a png").is_err());
    }

    #[test]
    fn encode_empty_fails() {
        let image = super::blank(0, 4);

        assert!(super::encode_png(image.as_ref()).is_err());
    }

    #[test]
    fn blank_zero_sized() {
        let image = super::blank(0, 0);

        assert_eq!(image.width(), 0);
        assert_eq!(image.height(), 0);
        assert_eq!(image.as_ref().pixels().count(), 0);
    }

    #[test]
    fn blit_clips() {
        let mut target = super::blank(3, 3);
        let source = super::solid(2, 2, RED);

        super::blit(&mut target, source.as_ref(), -1, 2);

        // Only the top-right pixel of the source lands on the target
        assert_eq!(target[(0_usize, 2_usize)], RED);
        assert_eq!(target.as_ref().pixels().filter(|pixel| *pixel == RED).count(), 1);
    }

    #[test]
    fn blend_transparent_keeps_destination() {
        assert_eq!(super::blend(BLUE, RGBA8::default()), BLUE);
        assert_eq!(super::blend(BLUE, RED), RED);
        assert_eq!(super::blend(RGBA8::default(), RED), RED);
    }

    #[test]
    fn blend_half_alpha() {
        let half_red = RGBA8::new(255, 0, 0, 128);

        let mixed = super::blend(BLUE, half_red);
        assert_eq!(mixed.a, 255);
        assert!(mixed.r > 120 && mixed.r < 135);
        assert!(mixed.b > 120 && mixed.b < 135);

        // Over nothing the color itself is kept
        assert_eq!(super::blend(RGBA8::default(), half_red), half_red);
    }

    #[test]
    fn tint_white_is_identity() {
        let pixel = RGBA8::new(12, 34, 56, 78);

        assert_eq!(super::tint(pixel, RGBA8::new(255, 255, 255, 255)), pixel);
        assert_eq!(
            super::tint(pixel, RGBA8::new(255, 0, 0, 255)),
            RGBA8::new(12, 0, 0, 78)
        );
    }
}
