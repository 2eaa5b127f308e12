//! Drawing surfaces
//!
//! [`Surface`] is the raster collaborator the editor draws through. In the
//! browser it is backed by a 2D canvas; [`Canvas`] is the in-memory
//! implementation over an `image::RgbaImage`, used natively and by the WASM
//! shell (which copies its pixels into an `ImageData`).
//!
//! Painting replaces pixels rather than alpha-blending them, so a cell
//! painted with a palette color reads back as exactly that color.

use image::imageops::FilterType;
use image::RgbaImage;

use crate::color::{Color, BLANK_COLOR};
use crate::shapes::{rasterize_line, rasterize_stroke};

/// A 2D raster surface.
pub trait Surface {
    /// Create a transparent surface of the given size.
    fn new(width: u32, height: u32) -> Self
    where
        Self: Sized;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Fill the `w` x `h` area at `(x, y)` with `color`.
    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color);

    /// Draw a one pixel outline around the `w` x `h` area at `(x, y)`.
    fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color);

    /// Reset the area to fully transparent.
    fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32);

    /// Draw a one pixel line between two points, inclusive.
    fn draw_line(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Color);

    /// Read raw RGBA bytes, row-major. Areas outside the surface read as zero.
    fn read_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8>;

    /// Copy the `sw` x `sh` region at `(sx, sy)` of `src` into the `dw` x `dh`
    /// region at `(dx, dy)`, scaling with nearest-neighbour sampling.
    fn draw_region(
        &mut self,
        src: &Self,
        sx: u32,
        sy: u32,
        sw: u32,
        sh: u32,
        dx: u32,
        dy: u32,
        dw: u32,
        dh: u32,
    ) where
        Self: Sized;
}

/// In-memory RGBA surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Wrap a decoded image as a surface.
    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Build a surface from raw RGBA bytes. Returns `None` when the buffer
    /// length does not match `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(Self::from_image)
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Color at `(x, y)`, or transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x < self.image.width() && y < self.image.height() {
            *self.image.get_pixel(x, y)
        } else {
            BLANK_COLOR
        }
    }

    /// Scale by an integer factor with nearest-neighbour sampling.
    pub fn scaled(&self, factor: u32) -> Canvas {
        if factor <= 1 {
            return self.clone();
        }
        let (w, h) = self.image.dimensions();
        Canvas::from_image(image::imageops::resize(
            &self.image,
            w * factor,
            h * factor,
            FilterType::Nearest,
        ))
    }

    fn put(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && x < i64::from(self.image.width()) && y < i64::from(self.image.height())
        {
            self.image.put_pixel(x as u32, y as u32, color);
        }
    }

    fn fill_clipped(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let x_end = x.saturating_add(w).min(self.image.width());
        let y_end = y.saturating_add(h).min(self.image.height());
        for py in y..y_end {
            for px in x..x_end {
                self.image.put_pixel(px, py, color);
            }
        }
    }
}

impl Surface for Canvas {
    fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::from_pixel(width, height, BLANK_COLOR) }
    }

    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.fill_clipped(x, y, w, h, color);
    }

    fn stroke_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        let (w, h) = (w.min(i32::MAX as u32) as i32, h.min(i32::MAX as u32) as i32);
        for (px, py) in rasterize_stroke(0, 0, w, h) {
            self.put(i64::from(x) + i64::from(px), i64::from(y) + i64::from(py), color);
        }
    }

    fn clear_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        self.fill_clipped(x, y, w, h, BLANK_COLOR);
    }

    fn draw_line(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Color) {
        let clamp = |v: u32| v.min(i32::MAX as u32) as i32;
        for (px, py) in rasterize_line((clamp(x0), clamp(y0)), (clamp(x1), clamp(y1))) {
            self.put(i64::from(px), i64::from(py), color);
        }
    }

    fn read_pixels(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(w as usize * h as usize * 4);
        for py in 0..h {
            for px in 0..w {
                let color = match (x.checked_add(px), y.checked_add(py)) {
                    (Some(sx), Some(sy)) => self.pixel(sx, sy),
                    _ => BLANK_COLOR,
                };
                out.extend_from_slice(&color.0);
            }
        }
        out
    }

    fn draw_region(
        &mut self,
        src: &Self,
        sx: u32,
        sy: u32,
        sw: u32,
        sh: u32,
        dx: u32,
        dy: u32,
        dw: u32,
        dh: u32,
    ) {
        if sw == 0 || sh == 0 {
            return;
        }
        for j in 0..dh {
            for i in 0..dw {
                let src_x = u64::from(sx) + u64::from(i) * u64::from(sw) / u64::from(dw);
                let src_y = u64::from(sy) + u64::from(j) * u64::from(sh) / u64::from(dh);
                let color = match (u32::try_from(src_x), u32::try_from(src_y)) {
                    (Ok(cx), Ok(cy)) => src.pixel(cx, cy),
                    _ => BLANK_COLOR,
                };
                self.put(i64::from(dx) + i64::from(i), i64::from(dy) + i64::from(j), color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const RED: Color = Rgba([255, 0, 0, 255]);
    const BLUE: Color = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_new_is_transparent() {
        let canvas = Canvas::new(3, 2);
        assert_eq!(canvas.width(), 3);
        assert_eq!(canvas.height(), 2);
        assert!(canvas.read_pixels(0, 0, 3, 2).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_clips_to_bounds() {
        let mut canvas = Canvas::new(4, 4);
        canvas.fill_rect(2, 2, 10, 10, RED);
        assert_eq!(canvas.pixel(3, 3), RED);
        assert_eq!(canvas.pixel(1, 1), BLANK_COLOR);
        assert_eq!(canvas.pixel(4, 4), BLANK_COLOR);
    }

    #[test]
    fn test_clear_rect() {
        let mut canvas = Canvas::new(2, 2);
        canvas.fill_rect(0, 0, 2, 2, RED);
        canvas.clear_rect(1, 0, 1, 2);
        assert_eq!(canvas.pixel(0, 0), RED);
        assert_eq!(canvas.pixel(1, 1), BLANK_COLOR);
    }

    #[test]
    fn test_stroke_rect_leaves_interior() {
        let mut canvas = Canvas::new(5, 5);
        canvas.stroke_rect(0, 0, 5, 5, BLUE);
        assert_eq!(canvas.pixel(0, 0), BLUE);
        assert_eq!(canvas.pixel(4, 2), BLUE);
        assert_eq!(canvas.pixel(2, 2), BLANK_COLOR);
    }

    #[test]
    fn test_draw_line_diagonal() {
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_line(0, 0, 3, 3, RED);
        for i in 0..4 {
            assert_eq!(canvas.pixel(i, i), RED);
        }
        assert_eq!(canvas.pixel(1, 0), BLANK_COLOR);
    }

    #[test]
    fn test_read_pixels_out_of_bounds_is_zero() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill_rect(0, 0, 1, 1, RED);
        let bytes = canvas.read_pixels(0, 0, 2, 1);
        assert_eq!(bytes, vec![255, 0, 0, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn test_draw_region_copies_and_scales() {
        let mut src = Canvas::new(4, 4);
        src.fill_rect(2, 2, 2, 2, RED);

        let mut tile = Canvas::new(2, 2);
        tile.draw_region(&src, 2, 2, 2, 2, 0, 0, 2, 2);
        assert_eq!(tile.pixel(0, 0), RED);
        assert_eq!(tile.pixel(1, 1), RED);

        let mut zoomed = Canvas::new(4, 4);
        zoomed.draw_region(&src, 3, 3, 1, 1, 0, 0, 4, 4);
        assert!(zoomed.read_pixels(0, 0, 4, 4).chunks(4).all(|p| p == RED.0));
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(Canvas::from_rgba(2, 2, vec![0; 16]).is_some());
        assert!(Canvas::from_rgba(2, 2, vec![0; 15]).is_none());
    }

    #[test]
    fn test_scaled() {
        let mut canvas = Canvas::new(1, 1);
        canvas.fill_rect(0, 0, 1, 1, BLUE);
        let scaled = canvas.scaled(3);
        assert_eq!(scaled.width(), 3);
        assert_eq!(scaled.pixel(2, 2), BLUE);
    }
}
