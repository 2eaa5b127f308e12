//! Indexed color palette
//!
//! A [`Palette`] is an ordered list of colors where the position of a color is
//! its identity. Sprites store these positions ([`ColorIndex`]) instead of raw
//! colors, so editing a palette entry recolors every sprite that uses it.
//!
//! The palette is also shown on screen as a swatch of 3x3 groups. The center
//! cell of each group is reserved for the eraser, so a color's list index and
//! its swatch position ("grid-space index") differ. The conversion functions
//! live here; drawing lives in [`crate::swatch`].

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;
use thiserror::Error;

use crate::color::{Color, BLANK_COLOR, DEFAULT_COLORS};

/// Position of a color within a palette, or [`BLANK_INDEX`].
pub type ColorIndex = i32;

/// Sentinel meaning "no color assigned" (unset pixel, eraser).
pub const BLANK_INDEX: ColorIndex = -1;

/// Swatch cells per 3x3 group.
pub const GROUP_CELLS: usize = 9;

/// Colors per 3x3 group (every cell except the center).
pub const GROUP_COLORS: usize = 8;

/// Grid-space position of the eraser cell within each group.
pub const CENTER_CELL: usize = 4;

/// A palette shared by every sprite and view that draws with it.
pub type SharedPalette = Rc<RefCell<Palette>>;

/// Error when addressing a palette entry that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaletteError {
    #[error("palette index {index} out of range for {len} colors")]
    IndexOutOfRange { index: ColorIndex, len: usize },
}

/// Ordered colors plus the active drawing color.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Color>,
    current: ColorIndex,
    revision: u64,
}

impl Default for Palette {
    /// A palette seeded with [`DEFAULT_COLORS`].
    fn default() -> Self {
        Self::new(DEFAULT_COLORS.to_vec())
    }
}

impl Palette {
    /// Create a palette seeded with exactly `colors` (which may be empty).
    ///
    /// The first color starts selected. An empty palette starts on the
    /// eraser and stays there until a color is selected explicitly.
    pub fn new(colors: Vec<Color>) -> Self {
        let current = if colors.is_empty() { BLANK_INDEX } else { 0 };
        Self { colors, current, revision: 0 }
    }

    /// Wrap this palette for sharing between sprites and views.
    pub fn shared(self) -> SharedPalette {
        Rc::new(RefCell::new(self))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Index of the active drawing color. [`BLANK_INDEX`] means the eraser.
    pub fn current(&self) -> ColorIndex {
        self.current
    }

    /// Counter bumped by every mutation, for views that re-render lazily.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `index` addresses an existing color.
    pub fn contains(&self, index: ColorIndex) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.colors.len())
    }

    /// Color at `index`, or [`BLANK_COLOR`] for blank or out-of-range indices.
    pub fn get_color(&self, index: ColorIndex) -> Color {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get(i))
            .copied()
            .unwrap_or(BLANK_COLOR)
    }

    pub fn get_current_color(&self) -> Color {
        self.get_color(self.current)
    }

    /// Index of the first color equal to `color`, appending it when missing.
    ///
    /// This is the only way the palette grows.
    pub fn get_or_insert_color(&mut self, color: Color) -> ColorIndex {
        if let Some(i) = self.colors.iter().position(|c| *c == color) {
            return i as ColorIndex;
        }

        self.colors.push(color);
        self.revision += 1;
        let index = (self.colors.len() - 1) as ColorIndex;
        debug!("palette grew to {} colors, added {:?} at {}", self.colors.len(), color.0, index);
        index
    }

    /// Replace the color at an existing index.
    ///
    /// Writing at or past the end is rejected; new colors only enter through
    /// [`Palette::get_or_insert_color`].
    pub fn set_color(&mut self, index: ColorIndex, color: Color) -> Result<(), PaletteError> {
        let len = self.colors.len();
        let slot = usize::try_from(index)
            .ok()
            .and_then(|i| self.colors.get_mut(i))
            .ok_or(PaletteError::IndexOutOfRange { index, len })?;
        *slot = color;
        self.revision += 1;
        Ok(())
    }

    /// Make `index` the active drawing color. [`BLANK_INDEX`] selects the
    /// eraser; any other index must exist.
    pub fn select_index(&mut self, index: ColorIndex) -> Result<(), PaletteError> {
        if index != BLANK_INDEX && !self.contains(index) {
            return Err(PaletteError::IndexOutOfRange { index, len: self.colors.len() });
        }
        self.current = index;
        self.revision += 1;
        Ok(())
    }
}

/// Whether a grid-space index is a reserved center (eraser) cell.
pub fn is_center(grid: usize) -> bool {
    grid % GROUP_CELLS == CENTER_CELL
}

/// Swatch position of a color, skipping every group's center cell.
///
/// ```
/// use pxsprite::palette::color_index_to_grid;
///
/// assert_eq!(color_index_to_grid(3), 3);
/// assert_eq!(color_index_to_grid(4), 5);
/// assert_eq!(color_index_to_grid(8), 9);
/// ```
pub fn color_index_to_grid(index: usize) -> usize {
    let group = index / GROUP_COLORS;
    let within = index % GROUP_COLORS;
    let cell = if within >= CENTER_CELL { within + 1 } else { within };
    group * GROUP_CELLS + cell
}

/// Color index shown at a swatch position; center cells map to [`BLANK_INDEX`].
///
/// The result may exceed the palette length; callers check
/// [`Palette::contains`].
pub fn grid_to_color_index(grid: usize) -> ColorIndex {
    if is_center(grid) {
        return BLANK_INDEX;
    }
    let group = grid / GROUP_CELLS;
    let cell = grid % GROUP_CELLS;
    let within = if cell > CENTER_CELL { cell - 1 } else { cell };
    (group * GROUP_COLORS + within) as ColorIndex
}
