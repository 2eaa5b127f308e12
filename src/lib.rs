//! pxsprite - Pixel-art sprite editing and sprite-sheet slicing
//!
//! This library provides functionality to:
//! - Keep a growable, shared color palette and show it as a clickable swatch
//! - Store sprites as grids of palette indices
//! - Paint sprites through pointer input on a zoomed, optionally gridded surface
//! - Slice sprite-sheet images into tiles
//!
//! Drawing goes through the [`surface::Surface`] trait; [`surface::Canvas`]
//! is the in-memory implementation. With the `wasm` feature the editor is
//! exported to JavaScript from [`wasm`].

pub mod color;
pub mod config;
pub mod creator;
pub mod palette;
pub mod shapes;
pub mod sheet;
pub mod sprite;
pub mod surface;
pub mod swatch;

#[cfg(feature = "wasm")]
pub mod wasm;
