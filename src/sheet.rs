//! Sprite sheets: slicing one image into a grid of equally sized sprites
//!
//! A [`SpriteSheet`] is created from a [`SheetSource`] and populated once by
//! the asynchronous [`SpriteSheet::load`]. Tiles are square, `tile_size`
//! pixels wide, and taken left to right, top to bottom from the origin.
//! Columns or rows that would only partially fit are dropped.
//!
//! ```
//! use pxsprite::palette::Palette;
//! use pxsprite::sheet::slice_sheet;
//! use pxsprite::surface::{Canvas, Surface};
//!
//! let sheet = Canvas::new(105, 100);
//! let tiles = slice_sheet(&sheet, 20, &Palette::default().shared()).unwrap();
//! assert_eq!(tiles.len(), 5);    // columns
//! assert_eq!(tiles[0].len(), 5); // rows
//! ```

use std::future::Future;
use std::mem;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{DynamicImage, RgbaImage};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::SharedPalette;
use crate::sprite::Sprite;
use crate::surface::{Canvas, Surface};

/// Errors from resolving and slicing a sprite sheet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SheetError {
    /// Source is neither a readable image, a surface, nor a usable sprite grid
    #[error("unable to resolve sprite sheet source: {0}")]
    UnresolvableSource(String),
    /// Reading the image file failed
    #[error("failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The image bytes could not be decoded
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// `load` was already called on this sheet
    #[error("sprite sheet load was already attempted; create a new sheet to retry")]
    AlreadyLoaded,
    /// Tiles were requested before `load` completed
    #[error("sprite sheet has not been loaded")]
    NotLoaded,
    #[error("tile ({x}, {y}) out of range for a {columns}x{rows} sheet")]
    TileOutOfRange { x: usize, y: usize, columns: usize, rows: usize },
    #[error("tile size must be a positive number of pixels")]
    InvalidTileSize,
}

/// The shapes a sprite sheet can be created from.
#[derive(Debug)]
pub enum SheetSource {
    /// An image file to decode
    Path(PathBuf),
    /// An already decoded image
    Image(DynamicImage),
    /// Raw pixels
    Surface(Canvas),
    /// Sprites that were sliced elsewhere, indexed `[column][row]`
    Sprites(Vec<Vec<Sprite>>),
}

impl From<PathBuf> for SheetSource {
    fn from(path: PathBuf) -> Self {
        SheetSource::Path(path)
    }
}

impl From<&Path> for SheetSource {
    fn from(path: &Path) -> Self {
        SheetSource::Path(path.to_path_buf())
    }
}

impl From<&str> for SheetSource {
    fn from(path: &str) -> Self {
        SheetSource::Path(PathBuf::from(path))
    }
}

impl From<DynamicImage> for SheetSource {
    fn from(image: DynamicImage) -> Self {
        SheetSource::Image(image)
    }
}

impl From<RgbaImage> for SheetSource {
    fn from(image: RgbaImage) -> Self {
        SheetSource::Surface(Canvas::from_image(image))
    }
}

impl From<Canvas> for SheetSource {
    fn from(canvas: Canvas) -> Self {
        SheetSource::Surface(canvas)
    }
}

impl From<Vec<Vec<Sprite>>> for SheetSource {
    fn from(sprites: Vec<Vec<Sprite>>) -> Self {
        SheetSource::Sprites(sprites)
    }
}

/// Slicing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetOptions {
    /// Width and height of each tile in pixels
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
}

fn default_tile_size() -> u32 {
    16
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self { tile_size: default_tile_size() }
    }
}

/// Resolves an image reference into pixels.
pub trait ImageLoader {
    fn load_image(&self, path: &Path) -> impl Future<Output = Result<RgbaImage, SheetError>>;
}

/// Loads images from the local filesystem.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

#[cfg(not(target_arch = "wasm32"))]
impl ImageLoader for FsLoader {
    async fn load_image(&self, path: &Path) -> Result<RgbaImage, SheetError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| SheetError::Io { path: path.to_path_buf(), source })?;
        Ok(image::load_from_memory(&bytes)?.to_rgba8())
    }
}

#[derive(Debug)]
enum SheetState {
    Pending(SheetSource),
    Loading,
    Loaded(Vec<Vec<Sprite>>),
    Failed,
}

/// A grid of sprites cut from one source.
#[derive(Debug)]
pub struct SpriteSheet {
    options: SheetOptions,
    palette: SharedPalette,
    state: SheetState,
}

impl SpriteSheet {
    /// Create an unloaded sheet. Sliced tiles quantize into `palette`.
    pub fn new(source: impl Into<SheetSource>, options: SheetOptions, palette: SharedPalette) -> Self {
        Self { options, palette, state: SheetState::Pending(source.into()) }
    }

    pub fn options(&self) -> SheetOptions {
        self.options
    }

    pub fn palette(&self) -> &SharedPalette {
        &self.palette
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, SheetState::Loaded(_))
    }

    /// Resolve the source and slice it.
    ///
    /// Only one load is allowed per sheet; later calls fail with
    /// [`SheetError::AlreadyLoaded`], whether or not the first one succeeded.
    pub async fn load<L: ImageLoader>(&mut self, loader: &L) -> Result<(), SheetError> {
        let source = match mem::replace(&mut self.state, SheetState::Loading) {
            SheetState::Pending(source) => source,
            other => {
                self.state = other;
                return Err(SheetError::AlreadyLoaded);
            }
        };

        match self.resolve(source, loader).await {
            Ok(sprites) => {
                self.state = SheetState::Loaded(sprites);
                Ok(())
            }
            Err(e) => {
                self.state = SheetState::Failed;
                Err(e)
            }
        }
    }

    /// [`SpriteSheet::load`] reading paths from the local filesystem.
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn load_from_fs(&mut self) -> Result<(), SheetError> {
        self.load(&FsLoader).await
    }

    async fn resolve<L: ImageLoader>(
        &self,
        source: SheetSource,
        loader: &L,
    ) -> Result<Vec<Vec<Sprite>>, SheetError> {
        let canvas = match source {
            SheetSource::Sprites(sprites) => {
                validate_grid(&sprites)?;
                info!("adopted prebuilt {}x{} sprite grid", sprites.len(), sprites[0].len());
                return Ok(sprites);
            }
            SheetSource::Surface(canvas) => canvas,
            SheetSource::Image(image) => Canvas::from_image(image.to_rgba8()),
            SheetSource::Path(path) => {
                if path.as_os_str().is_empty() {
                    return Err(SheetError::UnresolvableSource("empty image path".to_string()));
                }
                Canvas::from_image(loader.load_image(&path).await?)
            }
        };

        let sprites = slice_sheet(&canvas, self.options.tile_size, &self.palette)?;
        info!(
            "sliced {}x{} sheet into {}x{} tiles of {}px",
            canvas.width(),
            canvas.height(),
            sprites.len(),
            sprites.first().map_or(0, Vec::len),
            self.options.tile_size
        );
        Ok(sprites)
    }

    /// Loaded tiles, indexed `[column][row]`.
    pub fn sprites(&self) -> Option<&[Vec<Sprite>]> {
        match &self.state {
            SheetState::Loaded(sprites) => Some(sprites),
            _ => None,
        }
    }

    /// Number of tile columns (0 until loaded).
    pub fn columns(&self) -> usize {
        self.sprites().map_or(0, <[_]>::len)
    }

    /// Number of tile rows (0 until loaded).
    pub fn rows(&self) -> usize {
        self.sprites().and_then(|s| s.first()).map_or(0, Vec::len)
    }

    /// Tile at column `x`, row `y`.
    pub fn get_sprite(&self, x: usize, y: usize) -> Result<&Sprite, SheetError> {
        let sprites = self.sprites().ok_or(SheetError::NotLoaded)?;
        sprites.get(x).and_then(|column| column.get(y)).ok_or(SheetError::TileOutOfRange {
            x,
            y,
            columns: self.columns(),
            rows: self.rows(),
        })
    }
}

/// Cut a surface into `tile_size` square sprites, indexed `[column][row]`.
///
/// Each tile is copied into its own surface before quantizing, so tiles never
/// share pixel storage with the sheet.
pub fn slice_sheet(
    sheet: &Canvas,
    tile_size: u32,
    palette: &SharedPalette,
) -> Result<Vec<Vec<Sprite>>, SheetError> {
    if tile_size == 0 {
        return Err(SheetError::InvalidTileSize);
    }

    let (width, height) = (sheet.width(), sheet.height());
    let columns = width / tile_size;
    let rows = height / tile_size;
    if width % tile_size != 0 || height % tile_size != 0 {
        debug!(
            "{}x{} sheet is not a multiple of {}px, dropping {}px right and {}px bottom",
            width,
            height,
            tile_size,
            width % tile_size,
            height % tile_size
        );
    }

    let sprites = (0..columns)
        .map(|col| {
            (0..rows)
                .map(|row| {
                    let mut tile = Canvas::new(tile_size, tile_size);
                    tile.draw_region(
                        sheet,
                        col * tile_size,
                        row * tile_size,
                        tile_size,
                        tile_size,
                        0,
                        0,
                        tile_size,
                        tile_size,
                    );
                    Sprite::from_surface(&tile, Rc::clone(palette))
                })
                .collect()
        })
        .collect();

    Ok(sprites)
}

/// A prebuilt grid must have at least one tile and equal-length columns.
fn validate_grid(sprites: &[Vec<Sprite>]) -> Result<(), SheetError> {
    let rows = match sprites.first() {
        Some(column) if !column.is_empty() => column.len(),
        _ => return Err(SheetError::UnresolvableSource("sprite grid is empty".to_string())),
    };
    if let Some(bad) = sprites.iter().position(|column| column.len() != rows) {
        return Err(SheetError::UnresolvableSource(format!(
            "sprite grid column {} has {} tiles, expected {}",
            bad,
            sprites[bad].len(),
            rows
        )));
    }
    Ok(())
}
