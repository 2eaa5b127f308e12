//! Sprite sheet loading from disk
//!
//! Writes PNG fixtures into a temp dir and loads them through the filesystem
//! loader.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use image::{Rgba, RgbaImage};
use pxsprite::palette::Palette;
use pxsprite::sheet::{SheetError, SheetOptions, SheetSource, SpriteSheet};
use tempfile::TempDir;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// A `width` x `height` sheet where each 8px tile is red or blue in a checkerboard.
fn write_checker_sheet(dir: &TempDir, width: u32, height: u32) -> PathBuf {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        if (x / 8 + y / 8) % 2 == 0 {
            RED
        } else {
            BLUE
        }
    });
    let path = dir.path().join("sheet.png");
    image.save(&path).expect("should write sheet png");
    path
}

#[tokio::test]
async fn test_load_png_sheet() {
    let _ = env_logger::builder().is_test(true).try_init();
    let temp = TempDir::new().expect("should create temp dir");
    let path = write_checker_sheet(&temp, 35, 16);
    let palette = Palette::default().shared();

    let mut sheet = SpriteSheet::new(path, SheetOptions { tile_size: 8 }, Rc::clone(&palette));
    sheet.load_from_fs().await.expect("should load sheet");

    // 35px wide leaves a 3px remainder that is dropped
    assert_eq!((sheet.columns(), sheet.rows()), (4, 2));
    assert_eq!(palette.borrow().len(), 8);

    let tile = sheet.get_sprite(1, 0).expect("tile exists");
    assert_eq!(tile.dimensions(), Ok((8, 8)));
    assert_eq!(tile.get_pixel_color(0, 0), BLUE);
    assert!(tile.shares_palette(sheet.get_sprite(0, 1).expect("tile exists")));
    assert_eq!(sheet.get_sprite(0, 0).expect("tile exists").get_pixel(7, 7), 2);
}

#[tokio::test]
async fn test_missing_file() {
    let temp = TempDir::new().expect("should create temp dir");
    let path = temp.path().join("absent.png");

    let mut sheet = SpriteSheet::new(path.clone(), SheetOptions::default(), Palette::default().shared());
    match sheet.load_from_fs().await {
        Err(SheetError::Io { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected io error, got {:?}", other),
    }
    assert!(!sheet.is_loaded());
    assert!(matches!(sheet.get_sprite(0, 0), Err(SheetError::NotLoaded)));
}

#[tokio::test]
async fn test_undecodable_file() {
    let temp = TempDir::new().expect("should create temp dir");
    let path = temp.path().join("sheet.png");
    fs::write(&path, b"definitely not a png").expect("should write garbage");

    let mut sheet = SpriteSheet::new(path.as_path(), SheetOptions::default(), Palette::default().shared());
    assert!(matches!(sheet.load_from_fs().await, Err(SheetError::Decode(_))));
    assert!(matches!(sheet.load_from_fs().await, Err(SheetError::AlreadyLoaded)));
}

#[tokio::test]
async fn test_decoded_image_source() {
    let image = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(100, 100, RED));
    let mut sheet =
        SpriteSheet::new(SheetSource::Image(image), SheetOptions { tile_size: 20 }, Palette::default().shared());

    sheet.load_from_fs().await.expect("decoded images need no io");
    assert_eq!((sheet.columns(), sheet.rows()), (5, 5));
    assert!(matches!(
        sheet.get_sprite(5, 0),
        Err(SheetError::TileOutOfRange { x: 5, y: 0, columns: 5, rows: 5 })
    ));
}
