//! WASM API module for browser/JS interop
//!
//! Wraps a [`Creator`] and its [`Swatch`] behind one `WasmEditor` object.
//! The page forwards pointer events in surface coordinates and blits the
//! RGBA buffers it gets back into `ImageData`.

use std::rc::Rc;

use log::warn;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::color::{parse_color, to_css};
use crate::config::{parse_config, SpriteConfig};
use crate::creator::{Creator, CreatorOptions, PointerEvent};
use crate::palette::{ColorIndex, Palette, SharedPalette};
use crate::sheet::slice_sheet;
use crate::sprite::Sprite;
use crate::surface::{Canvas, Surface};
use crate::swatch::{Swatch, SwatchLayout};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// Browser positions can be negative or fractional; surfaces are not.
fn to_surface(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

#[derive(Serialize)]
struct PaletteSnapshot {
    colors: Vec<String>,
    current: ColorIndex,
}

/// Sprite editor with its palette swatch.
#[wasm_bindgen]
pub struct WasmEditor {
    creator: Creator<Canvas>,
    swatch: Swatch<Canvas>,
}

impl WasmEditor {
    fn build(
        palette: SharedPalette,
        options: CreatorOptions,
        layout: SwatchLayout,
    ) -> Result<Self, String> {
        let creator =
            Creator::new(Sprite::new(Rc::clone(&palette)), options).map_err(|e| e.to_string())?;
        let swatch = Swatch::new(palette, layout);
        Ok(Self { creator, swatch })
    }

    fn from_sprite_config(config: &SpriteConfig) -> Result<Self, String> {
        let palette = config.build_palette().map_err(|e| e.to_string())?;
        Self::build(palette.shared(), config.creator, config.palette.layout)
    }
}

#[wasm_bindgen]
impl WasmEditor {
    /// New editor with the default palette. Fails when the zoomed sprite
    /// does not fit a drawing surface.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, zoom: u32) -> Result<WasmEditor, String> {
        let options = CreatorOptions { width, height, zoom, ..CreatorOptions::default() };
        Self::build(Palette::default().shared(), options, SwatchLayout::default())
    }

    /// New editor from `pxsprite.toml` text.
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(toml: &str) -> Result<WasmEditor, String> {
        let config = parse_config(toml).map_err(|e| e.to_string())?;
        Self::from_sprite_config(&config)
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        self.creator.handle_pointer(PointerEvent::Down { x: to_surface(x), y: to_surface(y) })
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.creator.handle_pointer(PointerEvent::Move { x: to_surface(x), y: to_surface(y) })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.creator.handle_pointer(PointerEvent::Up);
    }

    /// Press on the swatch. Returns the selected index, if any.
    #[wasm_bindgen(js_name = palettePointerDown)]
    pub fn palette_pointer_down(&mut self, x: f64, y: f64) -> Option<i32> {
        self.swatch.select_at(to_surface(x), to_surface(y))
    }

    #[wasm_bindgen(js_name = setGrid)]
    pub fn set_grid(&mut self, active: bool) {
        self.creator.set_grid_overlay(active);
    }

    #[wasm_bindgen(getter, js_name = gridActive)]
    pub fn grid_active(&self) -> bool {
        self.creator.is_grid_active()
    }

    #[wasm_bindgen(js_name = selectIndex)]
    pub fn select_index(&mut self, index: i32) -> bool {
        match self.swatch.select_index(index) {
            Ok(()) => true,
            Err(e) => {
                warn!("select_index: {}", e);
                false
            }
        }
    }

    /// Replace a palette color with a CSS color. Sprites using it repaint.
    #[wasm_bindgen(js_name = setColor)]
    pub fn set_color(&mut self, index: i32, css: &str) -> bool {
        let color = match parse_color(css) {
            Ok(color) => color,
            Err(e) => {
                warn!("set_color: '{}' {}", css, e);
                return false;
            }
        };
        if let Err(e) = self.swatch.set_color(index, color) {
            warn!("set_color: {}", e);
            return false;
        }
        self.creator.refresh();
        true
    }

    /// Replace the sprite with a decoded RGBA image, quantized into the palette.
    #[wasm_bindgen(js_name = loadRgba)]
    pub fn load_rgba(&mut self, pixels: Vec<u8>, width: u32, height: u32) -> bool {
        let Some(canvas) = Canvas::from_rgba(width, height, pixels) else {
            warn!("load_rgba: buffer does not match {}x{}", width, height);
            return false;
        };
        let palette = Rc::clone(self.creator.palette());
        let sprite = Sprite::from_surface(&canvas, palette);
        match Creator::new(sprite, self.creator.options()) {
            Ok(creator) => self.creator = creator,
            Err(e) => {
                warn!("load_rgba: {}", e);
                return false;
            }
        }
        self.swatch.refresh();
        true
    }

    #[wasm_bindgen(getter, js_name = currentColor)]
    pub fn current_color(&self) -> String {
        to_css(self.creator.palette().borrow().get_current_color())
    }

    #[wasm_bindgen(getter, js_name = currentIndex)]
    pub fn current_index(&self) -> i32 {
        self.creator.palette().borrow().current()
    }

    /// Palette colors and selection as JSON.
    #[wasm_bindgen(js_name = paletteJson)]
    pub fn palette_json(&self) -> String {
        let palette = self.creator.palette().borrow();
        let snapshot = PaletteSnapshot {
            colors: palette.colors().iter().map(|c| to_css(*c)).collect(),
            current: palette.current(),
        };
        serde_json::to_string(&snapshot).unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.creator.surface().width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.creator.surface().height()
    }

    /// Raw RGBA pixel data of the editor surface (4 bytes per pixel)
    pub fn pixels(&self) -> Vec<u8> {
        self.creator.surface().image().as_raw().clone()
    }

    #[wasm_bindgen(getter, js_name = paletteWidth)]
    pub fn palette_width(&self) -> u32 {
        self.swatch.surface().width()
    }

    #[wasm_bindgen(getter, js_name = paletteHeight)]
    pub fn palette_height(&self) -> u32 {
        self.swatch.surface().height()
    }

    /// Raw RGBA pixel data of the swatch surface
    #[wasm_bindgen(js_name = palettePixels)]
    pub fn palette_pixels(&self) -> Vec<u8> {
        self.swatch.surface().image().as_raw().clone()
    }

    /// The sprite alone, one pixel per cell. Empty if nothing was drawn.
    #[wasm_bindgen(js_name = spritePixels)]
    pub fn sprite_pixels(&self) -> Vec<u8> {
        self.creator.sprite().to_image().map(|image| image.into_raw()).unwrap_or_default()
    }
}

/// Tiles cut from a sheet, all sharing one palette.
#[wasm_bindgen]
pub struct SlicedSheet {
    tile_size: u32,
    palette: SharedPalette,
    sprites: Vec<Vec<Sprite>>,
}

#[wasm_bindgen]
impl SlicedSheet {
    #[wasm_bindgen(getter)]
    pub fn columns(&self) -> usize {
        self.sprites.len()
    }

    #[wasm_bindgen(getter)]
    pub fn rows(&self) -> usize {
        self.sprites.first().map_or(0, Vec::len)
    }

    #[wasm_bindgen(getter, js_name = tileSize)]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Palette indices of one tile, row-major. Empty if out of range.
    #[wasm_bindgen(js_name = tileIndices)]
    pub fn tile_indices(&self, x: usize, y: usize) -> Vec<i32> {
        self.tile(x, y).map(|sprite| sprite.pixels().concat()).unwrap_or_default()
    }

    /// RGBA pixels of one tile. Empty if out of range.
    #[wasm_bindgen(js_name = tilePixels)]
    pub fn tile_pixels(&self, x: usize, y: usize) -> Vec<u8> {
        self.tile(x, y)
            .and_then(|sprite| sprite.to_image().ok())
            .map(|image| image.into_raw())
            .unwrap_or_default()
    }

    /// Colors of the shared palette as CSS strings.
    pub fn colors(&self) -> Vec<String> {
        self.palette.borrow().colors().iter().map(|c| to_css(*c)).collect()
    }
}

impl SlicedSheet {
    fn tile(&self, x: usize, y: usize) -> Option<&Sprite> {
        self.sprites.get(x).and_then(|column| column.get(y))
    }
}

/// Slice an RGBA sheet into square tiles quantized into the default palette.
#[wasm_bindgen(js_name = sliceSheetRgba)]
pub fn slice_sheet_rgba(
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    tile_size: u32,
) -> Result<SlicedSheet, String> {
    let canvas = Canvas::from_rgba(width, height, pixels)
        .ok_or_else(|| format!("pixel buffer does not match {}x{}", width, height))?;
    let palette = Palette::default().shared();
    let sprites = slice_sheet(&canvas, tile_size, &palette).map_err(|e| e.to_string())?;
    Ok(SlicedSheet { tile_size, palette, sprites })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_surface_clamps() {
        assert_eq!(to_surface(-3.0), 0);
        assert_eq!(to_surface(f64::NAN), 0);
        assert_eq!(to_surface(12.9), 12);
    }

    #[test]
    fn test_editor_drag_paints_once_per_cell() {
        let mut editor = WasmEditor::new(4, 4, 10).expect("editor should fit");
        assert_eq!((editor.width(), editor.height()), (40, 40));

        assert!(editor.pointer_down(5.0, 5.0));
        assert!(!editor.pointer_move(7.0, 7.0));
        assert!(editor.pointer_move(15.0, 5.0));
        editor.pointer_up();
        assert!(!editor.pointer_move(25.0, 5.0));

        // Default selection is black
        let pixels = editor.pixels();
        let at = |x: usize, y: usize| &pixels[(y * 40 + x) * 4..(y * 40 + x) * 4 + 4];
        assert_eq!(at(5, 5), &[0, 0, 0, 255]);
        assert_eq!(at(15, 5), &[0, 0, 0, 255]);
        assert_eq!(at(25, 5), &[0, 0, 0, 0]);
        assert_eq!(editor.sprite_pixels().len(), 2 * 4);
    }

    #[test]
    fn test_palette_pointer_selects_color() {
        let mut editor = WasmEditor::new(4, 4, 10).expect("editor should fit");
        // Second cell of the first group: x = margin + cell + 1
        assert_eq!(editor.palette_pointer_down(50.0, 10.0), Some(1));
        assert_eq!(editor.current_index(), 1);
        assert_eq!(editor.current_color(), "rgba(255, 255, 255, 1)");
        assert_eq!(editor.palette_pointer_down(1000.0, 1000.0), None);
        assert_eq!(editor.current_index(), 1);
    }

    #[test]
    fn test_set_color_repaints_sprite() {
        let mut editor = WasmEditor::new(2, 2, 1).expect("editor should fit");
        editor.pointer_down(0.0, 0.0);
        editor.pointer_up();

        assert!(editor.set_color(0, "#00ff00"));
        assert_eq!(&editor.pixels()[0..4], &[0, 255, 0, 255]);
        assert!(!editor.set_color(0, "not a color"));
        assert!(!editor.set_color(99, "red"));
    }

    #[test]
    fn test_palette_json() {
        let editor = WasmEditor::from_config("[palette]\ncolors = [\"red\"]").expect("valid config");
        assert_eq!(editor.palette_json(), r#"{"colors":["rgba(255, 0, 0, 1)"],"current":0}"#);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let err = WasmEditor::from_config("[creator]\nzoom = 0").err().expect("should fail");
        assert!(err.contains("creator.zoom"));
    }

    #[test]
    fn test_new_rejects_oversized_editor() {
        let err = WasmEditor::new(70_000, 1, 70_000).err().expect("should fail");
        assert!(err.contains("too large"));
    }

    #[test]
    fn test_grid_toggle() {
        let mut editor = WasmEditor::new(2, 2, 10).expect("editor should fit");
        assert!(!editor.grid_active());
        editor.set_grid(true);
        assert!(editor.grid_active());
        editor.set_grid(false);
        assert!(!editor.grid_active());
    }

    #[test]
    fn test_load_rgba_grows_palette_and_swatch() {
        let mut editor = WasmEditor::new(2, 1, 1).expect("editor should fit");
        let before = editor.palette_width();
        let pixels = vec![10, 20, 30, 255, 0, 0, 0, 255];

        assert!(editor.load_rgba(pixels, 2, 1));
        assert_eq!(&editor.pixels()[0..4], &[10, 20, 30, 255]);
        assert!(editor.palette_width() > before);
        assert!(!editor.load_rgba(vec![0; 3], 2, 1));
    }

    #[test]
    fn test_slice_sheet_rgba() {
        let mut pixels = vec![0u8; 4 * 4 * 2];
        pixels[0..4].copy_from_slice(&[255, 0, 0, 255]);
        let sheet = slice_sheet_rgba(pixels, 4, 2, 2).expect("should slice");

        assert_eq!((sheet.columns(), sheet.rows()), (2, 1));
        assert_eq!(sheet.tile_indices(0, 0)[0], 2);
        assert_eq!(&sheet.tile_pixels(0, 0)[0..4], &[255, 0, 0, 255]);
        assert!(sheet.tile_pixels(5, 5).is_empty());
        assert!(slice_sheet_rgba(vec![0; 4], 4, 2, 2).is_err());
        assert!(slice_sheet_rgba(vec![0; 32], 4, 2, 0).is_err());
    }
}
