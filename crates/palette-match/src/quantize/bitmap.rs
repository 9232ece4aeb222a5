//! Owned RGBA8 bitmap.

/// One RGBA8 pixel.
pub type Rgba = [u8; 4];

/// A fully transparent pixel.
pub const CLEAR: Rgba = [0, 0, 0, 0];

/// Row-major RGBA8 image buffer.
///
/// ```
/// use palette_match::Bitmap;
///
/// let bitmap = Bitmap::filled(2, 1, [255, 0, 0, 255]);
/// assert_eq!(bitmap.pixel(1, 0), Some([255, 0, 0, 255]));
/// assert_eq!(bitmap.pixel(2, 0), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// Wrap row-major pixels. Returns `None` when `pixels.len()` does not
    /// equal `width * height`.
    pub fn new(width: usize, height: usize, pixels: Vec<Rgba>) -> Option<Self> {
        if width.checked_mul(height)? != pixels.len() {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from a packed RGBA byte buffer (4 bytes per pixel).
    pub fn from_rgba_bytes(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|c| [c[0], c[1], c[2], c[3]])
            .collect();
        Self::new(width, height, pixels)
    }

    /// A bitmap where every pixel is `color`.
    pub fn filled(width: usize, height: usize, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Pixel at `(x, y)`, or `None` outside the bitmap.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    /// Packed RGBA bytes, as expected by PNG encoders.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}
