//! Palette-indexed sprites
//!
//! A [`Sprite`] stores one [`ColorIndex`] per pixel and resolves colors through
//! a [`SharedPalette`]. Writes may land anywhere; after each write the grid is
//! padded with [`BLANK_INDEX`] so that every row has the same length.

use std::rc::Rc;

use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::color::Color;
use crate::palette::{ColorIndex, SharedPalette, BLANK_INDEX};
use crate::surface::Surface;

/// Error for queries that need at least one row of pixels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpriteError {
    #[error("sprite has no pixels")]
    EmptyGrid,
}

/// A rectangular grid of palette indices, addressed as `pixels[y][x]`.
#[derive(Debug, Clone)]
pub struct Sprite {
    pixels: Vec<Vec<ColorIndex>>,
    palette: SharedPalette,
}

impl Sprite {
    /// An empty sprite drawing with `palette`.
    pub fn new(palette: SharedPalette) -> Self {
        Self { pixels: Vec::new(), palette }
    }

    /// Quantize an image into palette indices, row by row.
    ///
    /// Colors missing from the palette are appended to it.
    pub fn from_image(image: &RgbaImage, palette: SharedPalette) -> Self {
        Self::from_rgba(image.width(), image.height(), image.as_raw(), palette)
    }

    /// Quantize the full contents of a drawing surface.
    pub fn from_surface<S: Surface>(surface: &S, palette: SharedPalette) -> Self {
        let (width, height) = (surface.width(), surface.height());
        let bytes = surface.read_pixels(0, 0, width, height);
        Self::from_rgba(width, height, &bytes, palette)
    }

    fn from_rgba(width: u32, height: u32, bytes: &[u8], palette: SharedPalette) -> Self {
        let pixels: Vec<Vec<ColorIndex>> = {
            let mut table = palette.borrow_mut();
            let mut chunks = bytes.chunks_exact(4);
            (0..height)
                .map(|_| {
                    (0..width)
                        .map(|_| match chunks.next() {
                            Some(px) => table.get_or_insert_color(Rgba([px[0], px[1], px[2], px[3]])),
                            None => BLANK_INDEX,
                        })
                        .collect::<Vec<_>>()
                })
                .collect()
        };
        Self { pixels, palette }
    }

    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    /// Whether both sprites draw with the same palette instance.
    pub fn shares_palette(&self, other: &Sprite) -> bool {
        Rc::ptr_eq(&self.palette, &other.palette)
    }

    pub fn pixels(&self) -> &[Vec<ColorIndex>] {
        &self.pixels
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Index at `(x, y)`; [`BLANK_INDEX`] if nothing was ever written there.
    pub fn get_pixel(&self, x: usize, y: usize) -> ColorIndex {
        self.pixels.get(y).and_then(|row| row.get(x)).copied().unwrap_or(BLANK_INDEX)
    }

    /// Color at `(x, y)` through the palette.
    pub fn get_pixel_color(&self, x: usize, y: usize) -> Color {
        self.palette.borrow().get_color(self.get_pixel(x, y))
    }

    /// Write an index at `(x, y)`, growing the grid as needed.
    pub fn set_pixel(&mut self, x: usize, y: usize, index: ColorIndex) -> ColorIndex {
        if self.pixels.len() <= y {
            self.pixels.resize_with(y + 1, Vec::new);
        }
        let row = &mut self.pixels[y];
        if row.len() <= x {
            row.resize(x + 1, BLANK_INDEX);
        }
        row[x] = index;

        self.normalize();
        index
    }

    /// `(width, height)` of the grid.
    pub fn dimensions(&self) -> Result<(usize, usize), SpriteError> {
        let first = self.pixels.first().ok_or(SpriteError::EmptyGrid)?;
        Ok((first.len(), self.pixels.len()))
    }

    /// Render to an image; blank cells are transparent.
    pub fn to_image(&self) -> Result<RgbaImage, SpriteError> {
        let (width, height) = self.dimensions()?;
        let palette = self.palette.borrow();
        Ok(RgbaImage::from_fn(width as u32, height as u32, |x, y| {
            palette.get_color(self.get_pixel(x as usize, y as usize))
        }))
    }

    /// Pad every row with blanks to the widest row.
    fn normalize(&mut self) {
        let width = self.pixels.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut self.pixels {
            row.resize(width, BLANK_INDEX);
        }
    }
}
