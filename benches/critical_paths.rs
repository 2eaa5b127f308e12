//! Criterion benchmarks for pxsprite critical paths
//!
//! Benchmarks the operations that run per pointer event or per loaded image:
//! - Color: CSS color parsing
//! - Palette: grid-space mapping and color lookup
//! - Sprite: quantizing images into palette indices
//! - Sheet: slicing sheets into tiles
//! - Creator: painting under a pointer drag

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgba, RgbaImage};
use pxsprite::color::parse_color;
use pxsprite::creator::{Creator, CreatorOptions, PointerEvent};
use pxsprite::palette::{color_index_to_grid, grid_to_color_index, Palette};
use pxsprite::sheet::slice_sheet;
use pxsprite::sprite::Sprite;
use pxsprite::surface::Canvas;
use std::rc::Rc;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Image cycling through `colors` distinct opaque colors
fn make_image(width: u32, height: u32, colors: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let i = (x + y * width) % colors;
        Rgba([(i * 16) as u8, (i * 8) as u8, 255 - (i * 4) as u8, 255])
    })
}

// =============================================================================
// Color Parsing Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    group.bench_function("parse_hex_6", |b| b.iter(|| parse_color(black_box("#FF0000"))));

    group.bench_function("parse_rgb", |b| b.iter(|| parse_color(black_box("rgb(255, 0, 0)"))));

    group.bench_function("parse_named", |b| b.iter(|| parse_color(black_box("red"))));

    group.finish();
}

// =============================================================================
// Palette Benchmarks
// =============================================================================

fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");

    group.bench_function("grid_round_trip_256", |b| {
        b.iter(|| {
            for i in 0..256usize {
                black_box(grid_to_color_index(color_index_to_grid(black_box(i))));
            }
        })
    });

    // Lookup is linear in palette size
    for size in [8usize, 64, 256] {
        let colors: Vec<_> = (0..size).map(|i| Rgba([i as u8, 0, 0, 255])).collect();
        let mut palette = Palette::new(colors);
        let last = Rgba([(size - 1) as u8, 0, 0, 255]);
        group.bench_with_input(BenchmarkId::new("get_or_insert_existing", size), &size, |b, _| {
            b.iter(|| palette.get_or_insert_color(black_box(last)))
        });
    }

    group.finish();
}

// =============================================================================
// Sprite Benchmarks
// =============================================================================

fn bench_sprite(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite");

    for size in [16u32, 64] {
        let image = make_image(size, size, 16);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("from_image", size), &image, |b, image| {
            b.iter(|| Sprite::from_image(black_box(image), Palette::default().shared()))
        });
    }

    group.bench_function("set_pixel_diagonal_64", |b| {
        b.iter(|| {
            let mut sprite = Sprite::new(Palette::default().shared());
            for i in 0..64 {
                sprite.set_pixel(i, i, 1);
            }
            sprite
        })
    });

    group.finish();
}

// =============================================================================
// Sheet Benchmarks
// =============================================================================

fn bench_sheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("sheet");

    for size in [64u32, 256] {
        let canvas = Canvas::from_image(make_image(size, size, 32));
        group.bench_with_input(BenchmarkId::new("slice_16px", size), &canvas, |b, canvas| {
            b.iter(|| slice_sheet(black_box(canvas), 16, &Palette::default().shared()))
        });
    }

    group.finish();
}

// =============================================================================
// Creator Benchmarks
// =============================================================================

fn bench_creator(c: &mut Criterion) {
    let mut group = c.benchmark_group("creator");

    for grid in [false, true] {
        let options = CreatorOptions { grid, ..CreatorOptions::default() };
        group.bench_with_input(BenchmarkId::new("diagonal_drag", grid), &options, |b, options| {
            b.iter(|| {
                let palette = Palette::default().shared();
                let mut creator: Creator<Canvas> =
                    Creator::new(Sprite::new(Rc::clone(&palette)), *options).unwrap();
                let step = options.zoom;
                creator.handle_pointer(PointerEvent::Down { x: 0, y: 0 });
                for i in 0..options.width * step {
                    creator.handle_pointer(PointerEvent::Move { x: i, y: i * options.height / options.width });
                }
                creator.handle_pointer(PointerEvent::Up);
                creator
            })
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_color, bench_palette, bench_sprite, bench_sheet, bench_creator);

criterion_main!(benches);
