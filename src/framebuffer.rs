/*!
framebuffer.rs - 256x240 grid of resolved RGB pixels.

The PPU writes one entry per emitted pixel; an external display
collaborator reads the buffer wholesale once per frame. Before the first
render every entry holds `ColorComponent::SENTINEL` (a solid blue).
*/

use crate::ppu::palette;

/// Screen width in pixels.
pub const NES_WIDTH: usize = 256;
/// Screen height in pixels.
pub const NES_HEIGHT: usize = 240;
/// RGB bytes per pixel in `to_rgb_bytes`.
pub const BYTES_PER_PIXEL: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorComponent {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorComponent {
    pub const SENTINEL: ColorComponent = ColorComponent { r: 0, g: 0, b: 192 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for ColorComponent {
    fn default() -> Self {
        Self::SENTINEL
    }
}

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pixels: Vec<ColorComponent>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            pixels: vec![ColorComponent::SENTINEL; NES_WIDTH * NES_HEIGHT],
        }
    }

    /// Store `color` at (`row`, `col`). Out-of-range coordinates are ignored.
    #[inline]
    pub fn draw(&mut self, row: usize, col: usize, color: ColorComponent) {
        if row < NES_HEIGHT && col < NES_WIDTH {
            self.pixels[row * NES_WIDTH + col] = color;
        }
    }

    /// Resolve a 6-bit master palette index and store it.
    #[inline]
    pub fn draw_palette_index(&mut self, row: usize, col: usize, index: u8) {
        self.draw(row, col, palette::lookup(index));
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ColorComponent> {
        if row < NES_HEIGHT && col < NES_WIDTH {
            Some(self.pixels[row * NES_WIDTH + col])
        } else {
            None
        }
    }

    /// Row-major view of all pixels.
    pub fn pixels(&self) -> &[ColorComponent] {
        &self.pixels
    }

    pub fn row(&self, row: usize) -> Option<&[ColorComponent]> {
        (row < NES_HEIGHT).then(|| &self.pixels[row * NES_WIDTH..(row + 1) * NES_WIDTH])
    }

    /// Reset every pixel to the sentinel color.
    pub fn clear(&mut self) {
        self.pixels.fill(ColorComponent::SENTINEL);
    }

    /// Packed RGB bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * BYTES_PER_PIXEL);
        for p in &self.pixels {
            out.extend_from_slice(&[p.r, p.g, p.b]);
        }
        out
    }

    /// Write the buffer as a PNG.
    #[cfg(feature = "screenshot")]
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> crate::error::CoreResult<()> {
        use crate::error::CoreError;

        let img = image::RgbImage::from_raw(
            NES_WIDTH as u32,
            NES_HEIGHT as u32,
            self.to_rgb_bytes(),
        )
        .ok_or_else(|| CoreError::Image("buffer size mismatch".to_string()))?;
        img.save(path).map_err(|e| CoreError::Image(e.to_string()))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
