//! PNG decoding into RGBA bitmaps and encoding of previews.

use std::io::Cursor;

use palette_match::Bitmap;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("PNG decode error: {0}")]
    Decode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    Encode(#[from] png::EncodingError),

    #[error("Unsupported PNG layout: {0:?}")]
    Layout(png::ColorType),

    #[error("Image too large: {width}x{height}")]
    TooLarge { width: usize, height: usize },
}

/// Decode any 8/16-bit, paletted or grayscale PNG into RGBA8.
pub fn decode_png(bytes: &[u8]) -> Result<Bitmap, CodecError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];
    let (width, height) = (info.width as usize, info.height as usize);

    let pixels: Vec<[u8; 4]> = match info.color_type {
        png::ColorType::Rgba => data
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().map(|&v| [v, v, v, 255]).collect(),
        other => return Err(CodecError::Layout(other)),
    };

    Bitmap::new(width, height, pixels).ok_or(CodecError::Layout(info.color_type))
}

/// Encode an RGBA8 bitmap as PNG.
pub fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, CodecError> {
    let (width, height) = (bitmap.width(), bitmap.height());
    let too_large = || CodecError::TooLarge { width, height };
    let w = u32::try_from(width).map_err(|_| too_large())?;
    let h = u32::try_from(height).map_err(|_| too_large())?;

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, w, h);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&bitmap.to_rgba_bytes())?;
    }
    Ok(buf.into_inner())
}
