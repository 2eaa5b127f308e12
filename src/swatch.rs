//! Palette swatch: draws a shared palette as tiled 3x3 groups and maps
//! pointer positions back to color indices.
//!
//! Each group shows eight colors around a center cell marked with an X. The
//! center selects the eraser ([`BLANK_INDEX`]). Groups tile left to right:
//!
//! ```text
//! +---+---+---+---+---+---+
//! | 0 | 1 | 2 | 8 | 9 |10 |
//! +---+---+---+---+---+---+
//! | 3 | X | 4 |11 | X |12 |
//! +---+---+---+---+---+---+
//! | 5 | 6 | 7 |13 |14 |15 |
//! +---+---+---+---+---+---+
//! ```

use image::Rgba;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::color::{is_transparent, Color};
use crate::palette::{
    color_index_to_grid, grid_to_color_index, ColorIndex, PaletteError, SharedPalette,
    BLANK_INDEX, CENTER_CELL, GROUP_CELLS, GROUP_COLORS,
};
use crate::surface::Surface;

/// Outline and eraser-marker color
const INK: Color = Rgba([0, 0, 0, 255]);

/// Cell geometry of a swatch, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwatchLayout {
    /// Width and height of one swatch cell
    #[serde(default = "default_cell_size")]
    pub cell_size: u32,
    /// Padding around the swatch; also how far the selection highlight grows
    #[serde(default = "default_margin")]
    pub margin: u32,
}

fn default_cell_size() -> u32 {
    40
}

fn default_margin() -> u32 {
    5
}

impl Default for SwatchLayout {
    fn default() -> Self {
        Self { cell_size: default_cell_size(), margin: default_margin() }
    }
}

impl SwatchLayout {
    /// Number of 3x3 groups needed for `colors` entries (at least one).
    pub fn groups(&self, colors: usize) -> usize {
        colors.div_ceil(GROUP_COLORS).max(1)
    }

    /// Surface size needed to show `colors` entries, or `None` when the
    /// surface or its RGBA buffer would not fit in `u32`.
    pub fn surface_size(&self, colors: usize) -> Option<(u32, u32)> {
        let block = self.cell_size.checked_mul(3)?;
        let groups = u32::try_from(self.groups(colors)).ok()?;
        let border = self.margin.checked_mul(2)?.checked_add(1)?;
        let width = block.checked_mul(groups)?.checked_add(border)?;
        let height = block.checked_add(border)?;
        width.checked_mul(height)?.checked_mul(4)?;
        Some((width, height))
    }

    /// Top-left corner of the cell at a grid-space index.
    pub fn cell_origin(&self, grid: usize) -> (u32, u32) {
        let group = grid / GROUP_CELLS;
        let cell = grid % GROUP_CELLS;
        let col = (group * 3 + cell % 3) as u32;
        let row = (cell / 3) as u32;
        let offset = |n: u32| self.margin.saturating_add(n.saturating_mul(self.cell_size));
        (offset(col), offset(row))
    }

    /// Grid-space index under a surface position, if it hits one of the
    /// `groups` drawn groups.
    ///
    /// The column is taken relative to its group, so every group owns grid
    /// indices `group * 9 .. group * 9 + 9`.
    pub fn grid_at(&self, x: u32, y: u32, groups: usize) -> Option<usize> {
        if self.cell_size == 0 {
            return None;
        }
        let col = x.checked_sub(self.margin)? / self.cell_size;
        let row = y.checked_sub(self.margin)? / self.cell_size;
        if row >= 3 {
            return None;
        }
        let group = (col / 3) as usize;
        if group >= groups {
            return None;
        }
        Some((col % 3) as usize + row as usize * 3 + group * GROUP_CELLS)
    }
}

/// A palette view drawn onto its own surface.
#[derive(Debug)]
pub struct Swatch<S: Surface> {
    palette: SharedPalette,
    layout: SwatchLayout,
    surface: S,
    rendered_revision: Option<u64>,
}

impl<S: Surface> Swatch<S> {
    /// Create a swatch for `palette` and draw it.
    pub fn new(palette: SharedPalette, layout: SwatchLayout) -> Self {
        let (width, height) = layout.surface_size(palette.borrow().len()).unwrap_or((0, 0));
        let mut swatch = Self { palette, layout, surface: S::new(width, height), rendered_revision: None };
        swatch.render();
        swatch
    }

    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    pub fn layout(&self) -> SwatchLayout {
        self.layout
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Top-left corner of a color's cell, or `None` if the index is unused.
    pub fn coordinates_of(&self, index: ColorIndex) -> Option<(u32, u32)> {
        if !self.palette.borrow().contains(index) {
            return None;
        }
        Some(self.layout.cell_origin(color_index_to_grid(index as usize)))
    }

    /// Handle a press at a surface position.
    ///
    /// Selects the color (or eraser) under the pointer and redraws. Presses
    /// outside the groups or on a cell with no color are ignored.
    pub fn select_at(&mut self, x: u32, y: u32) -> Option<ColorIndex> {
        let groups = self.layout.groups(self.palette.borrow().len());
        let grid = self.layout.grid_at(x, y, groups)?;
        let index = grid_to_color_index(grid);

        self.palette.borrow_mut().select_index(index).ok()?;
        self.render();
        Some(index)
    }

    /// Select a color by index and redraw.
    pub fn select_index(&mut self, index: ColorIndex) -> Result<(), PaletteError> {
        self.palette.borrow_mut().select_index(index)?;
        self.render();
        Ok(())
    }

    /// Replace a color and redraw.
    pub fn set_color(&mut self, index: ColorIndex, color: Color) -> Result<(), PaletteError> {
        self.palette.borrow_mut().set_color(index, color)?;
        self.render();
        Ok(())
    }

    /// Redraw if the palette changed since the last render (for example
    /// after a sprite load inserted new colors).
    pub fn refresh(&mut self) -> bool {
        let revision = self.palette.borrow().revision();
        if self.rendered_revision == Some(revision) {
            return false;
        }
        self.render();
        true
    }

    /// Draw every group, color cell, eraser marker, and the selection.
    pub fn render(&mut self) {
        let palette = self.palette.borrow();
        let layout = self.layout;
        let cell = layout.cell_size;
        let groups = layout.groups(palette.len());

        let Some((width, height)) = layout.surface_size(palette.len()) else {
            warn!("swatch for {} colors does not fit a drawing surface", palette.len());
            return;
        };
        if self.surface.width() != width || self.surface.height() != height {
            self.surface = S::new(width, height);
        } else {
            self.surface.clear_rect(0, 0, width, height);
        }

        for grid in 0..groups * GROUP_CELLS {
            let (x, y) = layout.cell_origin(grid);
            let index = grid_to_color_index(grid);
            if index == BLANK_INDEX {
                draw_eraser(&mut self.surface, x, y, cell);
                continue;
            }
            if palette.contains(index) {
                self.surface.fill_rect(x, y, cell, cell, palette.get_color(index));
            }
            self.surface.stroke_rect(x, y, cell + 1, cell + 1, INK);
        }

        // Selection: the current cell grown by the margin on every side
        let current = palette.current();
        let grid = if palette.contains(current) {
            color_index_to_grid(current as usize)
        } else {
            CENTER_CELL
        };
        let (x, y) = layout.cell_origin(grid);
        let (hx, hy, hs) = (x - layout.margin, y - layout.margin, cell + layout.margin * 2);
        let color = palette.get_color(current);
        if is_transparent(color) {
            self.surface.clear_rect(hx, hy, hs, hs);
            draw_eraser(&mut self.surface, hx, hy, hs);
        } else {
            self.surface.fill_rect(hx, hy, hs, hs, color);
        }
        self.surface.stroke_rect(hx, hy, hs + 1, hs + 1, INK);

        self.rendered_revision = Some(palette.revision());
    }
}

fn draw_eraser<S: Surface>(surface: &mut S, x: u32, y: u32, size: u32) {
    surface.draw_line(x, y, x + size, y + size, INK);
    surface.draw_line(x + size, y, x, y + size, INK);
    surface.stroke_rect(x, y, size + 1, size + 1, INK);
}
