//! Interactive sprite editor
//!
//! A [`Creator`] shows one [`Sprite`] zoomed onto a [`Surface`] and turns
//! pointer input into pixel writes with the palette's current color.
//!
//! Pointer handling is a two-state machine. While pressed, moves only paint
//! when they enter a different cell than the last one painted. Cells between
//! two far-apart move events are not interpolated, so fast drags can skip
//! cells.

use image::Rgba;
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{is_transparent, Color};
use crate::palette::SharedPalette;
use crate::sprite::Sprite;
use crate::surface::Surface;

/// Grid overlay color
const GRID_INK: Color = Rgba([0, 0, 0, 255]);

/// Editor geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatorOptions {
    /// Sprite width in cells
    #[serde(default = "default_size")]
    pub width: u32,
    /// Sprite height in cells
    #[serde(default = "default_size")]
    pub height: u32,
    /// Surface pixels per sprite cell
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Draw grid lines between cells
    #[serde(default)]
    pub grid: bool,
}

fn default_size() -> u32 {
    16
}

fn default_zoom() -> u32 {
    20
}

impl Default for CreatorOptions {
    fn default() -> Self {
        Self { width: default_size(), height: default_size(), zoom: default_zoom(), grid: false }
    }
}

impl CreatorOptions {
    /// Surface size: the zoomed sprite plus a one pixel border for the
    /// closing grid lines when the overlay is on.
    ///
    /// `None` when the surface or its RGBA buffer would not fit in `u32`.
    pub fn surface_size(&self) -> Option<(u32, u32)> {
        let border = u32::from(self.grid);
        let width = self.width.checked_mul(self.zoom)?.checked_add(border)?;
        let height = self.height.checked_mul(self.zoom)?.checked_add(border)?;
        width.checked_mul(height)?.checked_mul(4)?;
        Some((width, height))
    }

    /// Size with the grid border included, whatever `grid` is set to.
    /// Both overlay states must fit for an editor to be created.
    fn bordered_surface_size(&self) -> Option<(u32, u32)> {
        CreatorOptions { grid: true, ..*self }.surface_size()
    }
}

/// Errors from setting up an editor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreatorError {
    #[error("{width}x{height} cells at zoom {zoom} is too large for a drawing surface")]
    SurfaceTooLarge { width: u32, height: u32, zoom: u32 },
}

impl CreatorError {
    fn too_large(options: &CreatorOptions) -> Self {
        CreatorError::SurfaceTooLarge {
            width: options.width,
            height: options.height,
            zoom: options.zoom,
        }
    }
}

/// Pointer input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { x: u32, y: u32 },
    Move { x: u32, y: u32 },
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    /// Button held; `last` is the cell painted most recently during this press
    Pressed { last: Option<(usize, usize)> },
}

/// Editing session for one sprite.
#[derive(Debug)]
pub struct Creator<S: Surface> {
    sprite: Sprite,
    options: CreatorOptions,
    surface: S,
    pointer: PointerState,
}

impl<S: Surface> Creator<S> {
    /// Bind a sprite to a new surface and paint it.
    pub fn new(sprite: Sprite, options: CreatorOptions) -> Result<Self, CreatorError> {
        options.bordered_surface_size().ok_or_else(|| CreatorError::too_large(&options))?;
        let (width, height) =
            options.surface_size().ok_or_else(|| CreatorError::too_large(&options))?;
        let mut creator =
            Self { sprite, options, surface: S::new(width, height), pointer: PointerState::Idle };
        creator.refresh();
        Ok(creator)
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    /// Direct sprite access. Call [`Creator::refresh`] after editing.
    pub fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }

    pub fn into_sprite(self) -> Sprite {
        self.sprite
    }

    pub fn palette(&self) -> &SharedPalette {
        self.sprite.palette()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn options(&self) -> CreatorOptions {
        self.options
    }

    pub fn is_grid_active(&self) -> bool {
        self.options.grid
    }

    pub fn pointer_state(&self) -> PointerState {
        self.pointer
    }

    /// Whether `(x, y)` is a cell of the editing area.
    pub fn contains_cell(&self, x: usize, y: usize) -> bool {
        x < self.options.width as usize && y < self.options.height as usize
    }

    /// Sprite cell under a surface position.
    pub fn cell_at(&self, x: u32, y: u32) -> Option<(usize, usize)> {
        let zoom = self.options.zoom;
        if zoom == 0 {
            return None;
        }
        let (cx, cy) = (x / zoom, y / zoom);
        if cx >= self.options.width || cy >= self.options.height {
            return None;
        }
        Some((cx as usize, cy as usize))
    }

    /// Paint one cell and restore the grid lines around it.
    ///
    /// Cells outside the editing area are ignored. Returns whether the cell
    /// was drawn.
    pub fn draw_pixel(&mut self, x: usize, y: usize, color: Color) -> bool {
        if !self.contains_cell(x, y) {
            return false;
        }
        self.paint_cell(x, y, color);
        if self.options.grid {
            self.draw_cell_grid(x as u32, y as u32);
        }
        true
    }

    /// Write the palette's current color (or the eraser) into the sprite and
    /// show it. Cells outside the editing area are ignored.
    pub fn add_pixel(&mut self, x: usize, y: usize) -> bool {
        if !self.contains_cell(x, y) {
            return false;
        }
        let (index, color) = {
            let palette = self.sprite.palette().borrow();
            (palette.current(), palette.get_current_color())
        };
        self.sprite.set_pixel(x, y, index);
        self.draw_pixel(x, y, color)
    }

    /// Feed one pointer event. Returns whether a cell was painted.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { x, y } => {
                self.pointer = PointerState::Pressed { last: None };
                self.paint_at(x, y)
            }
            PointerEvent::Move { x, y } => match self.pointer {
                PointerState::Idle => false,
                PointerState::Pressed { .. } => self.paint_at(x, y),
            },
            PointerEvent::Up => {
                self.pointer = PointerState::Idle;
                false
            }
        }
    }

    /// Show or hide the grid overlay.
    ///
    /// Turning it off repaints every cell from the sprite. If the border
    /// changes the surface size, the surface is recreated and repainted.
    pub fn set_grid_overlay(&mut self, active: bool) {
        let previous = (self.surface.width(), self.surface.height());
        let toggled = CreatorOptions { grid: active, ..self.options };
        let Some((width, height)) = toggled.surface_size() else {
            warn!("grid overlay: {}", CreatorError::too_large(&toggled));
            return;
        };
        self.options = toggled;

        if (width, height) != previous {
            self.surface = S::new(width, height);
            self.refresh();
        } else if active {
            self.draw_grid();
        } else {
            self.refresh();
        }
    }

    /// Clear the surface and repaint every cell from the sprite.
    pub fn refresh(&mut self) {
        let (width, height) = (self.surface.width(), self.surface.height());
        self.surface.clear_rect(0, 0, width, height);

        for y in 0..self.options.height as usize {
            for x in 0..self.options.width as usize {
                let color = self.sprite.get_pixel_color(x, y);
                self.paint_cell(x, y, color);
            }
        }

        if self.options.grid {
            self.draw_grid();
        }
    }

    fn paint_at(&mut self, x: u32, y: u32) -> bool {
        let Some(cell) = self.cell_at(x, y) else {
            return false;
        };
        if self.pointer == (PointerState::Pressed { last: Some(cell) }) {
            return false;
        }
        self.pointer = PointerState::Pressed { last: Some(cell) };
        self.add_pixel(cell.0, cell.1)
    }

    fn paint_cell(&mut self, x: usize, y: usize, color: Color) {
        let zoom = self.options.zoom;
        let (px, py) = (x as u32 * zoom, y as u32 * zoom);
        if is_transparent(color) {
            self.surface.clear_rect(px, py, zoom, zoom);
        } else {
            self.surface.fill_rect(px, py, zoom, zoom, color);
        }
    }

    /// Grid lines bounding a single cell.
    fn draw_cell_grid(&mut self, x: u32, y: u32) {
        let zoom = self.options.zoom;
        let (left, top) = (x * zoom, y * zoom);
        let (right, bottom) = (left + zoom, top + zoom);
        self.surface.draw_line(left, top, right, top, GRID_INK);
        self.surface.draw_line(left, bottom, right, bottom, GRID_INK);
        self.surface.draw_line(left, top, left, bottom, GRID_INK);
        self.surface.draw_line(right, top, right, bottom, GRID_INK);
    }

    fn draw_grid(&mut self) {
        let CreatorOptions { width, height, zoom, .. } = self.options;
        for x in 0..=width {
            self.surface.draw_line(x * zoom, 0, x * zoom, height * zoom, GRID_INK);
        }
        for y in 0..=height {
            self.surface.draw_line(0, y * zoom, width * zoom, y * zoom, GRID_INK);
        }
    }
}
