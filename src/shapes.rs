//! Shape rasterization primitives for pixel-perfect rendering.
//!
//! Converts lines and rectangle outlines into integer pixel coordinates.
//! Surfaces clip the results to their own bounds.

/// Rasterize a line using Bresenham's line algorithm.
///
/// Returns all pixels between the two endpoints, inclusive, in drawing order.
///
/// # Examples
///
/// ```
/// use pxsprite::shapes::rasterize_line;
///
/// let pixels = rasterize_line((0, 0), (3, 3));
/// assert_eq!(pixels, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
/// ```
pub fn rasterize_line(p0: (i32, i32), p1: (i32, i32)) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();

    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        pixels.push((x0, y0));

        if x0 == x1 && y0 == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }

    pixels
}

/// Rasterize a one pixel wide rectangle outline.
///
/// The outline covers the border of the `w` x `h` area starting at `(x, y)`.
///
/// ```
/// use pxsprite::shapes::rasterize_stroke;
///
/// let pixels = rasterize_stroke(0, 0, 4, 4);
/// assert!(pixels.contains(&(0, 0)));
/// assert!(pixels.contains(&(3, 3)));
/// assert!(!pixels.contains(&(1, 1)));
/// ```
pub fn rasterize_stroke(x: i32, y: i32, w: i32, h: i32) -> Vec<(i32, i32)> {
    let mut pixels = Vec::new();

    if w <= 0 || h <= 0 {
        return pixels;
    }

    for dx in 0..w {
        pixels.push((x + dx, y));
        if h > 1 {
            pixels.push((x + dx, y + h - 1));
        }
    }
    for dy in 1..h - 1 {
        pixels.push((x, y + dy));
        if w > 1 {
            pixels.push((x + w - 1, y + dy));
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_single_point() {
        assert_eq!(rasterize_line((2, 5), (2, 5)), vec![(2, 5)]);
    }

    #[test]
    fn test_line_horizontal_and_reverse() {
        assert_eq!(rasterize_line((0, 1), (3, 1)).len(), 4);
        let reverse = rasterize_line((3, 0), (0, 0));
        assert_eq!(reverse.first(), Some(&(3, 0)));
        assert_eq!(reverse.last(), Some(&(0, 0)));
    }

    #[test]
    fn test_line_anti_diagonal() {
        let pixels = rasterize_line((0, 3), (3, 0));
        assert_eq!(pixels, vec![(0, 3), (1, 2), (2, 1), (3, 0)]);
    }

    #[test]
    fn test_stroke_counts() {
        // 4x3 outline: 4 top + 4 bottom + 1 left + 1 right
        assert_eq!(rasterize_stroke(0, 0, 4, 3).len(), 10);
        assert_eq!(rasterize_stroke(5, 5, 1, 1), vec![(5, 5)]);
        assert!(rasterize_stroke(0, 0, 0, 4).is_empty());
    }
}
