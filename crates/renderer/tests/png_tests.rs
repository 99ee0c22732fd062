//! Tests for PNG encoding functionality.
//!
//! Tests the indexed PNG and RGBA PNG encoders, including:
//! - Palette extraction (sequential and parallel)
//! - PNG format selection (auto mode)
//! - SVG rasterization

use renderer::png::{create_png, create_png_auto, create_png_indexed, render_svg_to_png};
use std::collections::HashSet;

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

// ============================================================================
// Helper functions
// ============================================================================

/// Pack RGBA bytes into a u32 for color counting
fn pack_color(r: u8, g: u8, b: u8, a: u8) -> u32 {
    (r as u32) | ((g as u32) << 8) | ((b as u32) << 16) | ((a as u32) << 24)
}

/// Colors a plain diagram is drawn with
fn diagram_palette() -> [(u8, u8, u8); 8] {
    [
        (255, 255, 255), // background
        (0, 0, 0),       // frame and text
        (211, 211, 211), // grid lines
        (176, 176, 176), // major grid
        (31, 119, 180),  // first set
        (255, 127, 14),  // second set
        (44, 160, 44),   // third set
        (214, 39, 40),   // fourth set
    ]
}

/// Generate pixel data resembling a rasterized diagram: mostly background
/// with bands and blocks of the palette colors
fn generate_diagram_pixels(width: usize, height: usize) -> Vec<u8> {
    let palette = diagram_palette();
    let mut pixels = Vec::with_capacity(width * height * 4);

    for y in 0..height {
        for x in 0..width {
            let idx = if x % 32 == 0 || y % 32 == 0 {
                2
            } else if (x / 16 + y / 16) % 7 == 0 {
                4 + (x / 16) % 4
            } else if x < 4 || y < 4 {
                1
            } else {
                0
            };
            let (r, g, b) = palette[idx];
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }
    pixels
}

/// Count unique colors in pixel data
fn count_unique_colors(pixels: &[u8]) -> usize {
    let mut unique: HashSet<u32> = HashSet::new();
    for chunk in pixels.chunks_exact(4) {
        unique.insert(pack_color(chunk[0], chunk[1], chunk[2], chunk[3]));
    }
    unique.len()
}

/// Color type byte from the IHDR chunk
fn color_type(png: &[u8]) -> u8 {
    png[25]
}

fn dimensions(png: &[u8]) -> (u32, u32) {
    let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
    let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
    (width, height)
}

fn has_chunk(png: &[u8], name: &[u8; 4]) -> bool {
    png.windows(4).any(|w| w == name)
}

// ============================================================================
// Basic PNG creation tests
// ============================================================================

#[test]
fn test_create_png_simple() {
    // Simple 2x2 image with 2 colors
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 255, 0, 255, // green
        255, 0, 0, 255, // red
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 3);
    assert_eq!(dimensions(&png), (2, 2));
    assert!(has_chunk(&png, b"PLTE"));
    assert!(!has_chunk(&png, b"tRNS"));
}

#[test]
fn test_create_png_rgba() {
    let pixels = [
        255, 0, 0, 255, // red
        0, 255, 0, 255, // green
        0, 0, 255, 255, // blue
        255, 255, 0, 255, // yellow
    ];

    let png = create_png(&pixels, 2, 2).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 6);
    assert!(has_chunk(&png, b"IEND"));
}

#[test]
fn test_create_png_with_transparency() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];

    let png = create_png_auto(&pixels, 2, 2).unwrap();
    assert_eq!(color_type(&png), 3);
    assert!(has_chunk(&png, b"tRNS"));
}

#[test]
fn test_create_png_indexed_explicit_palette() {
    let palette = [(255, 255, 255, 255), (0, 0, 0, 255)];
    let indices = [0, 1, 1, 0, 0, 1];

    let png = create_png_indexed(3, 2, &palette, &indices).unwrap();
    assert_eq!(color_type(&png), 3);
    assert_eq!(dimensions(&png), (3, 2));
}

// ============================================================================
// Invalid input
// ============================================================================

#[test]
fn test_buffer_size_mismatch_rejected() {
    let pixels = [0u8; 12];
    assert!(create_png(&pixels, 2, 2).is_err());
    assert!(create_png_auto(&pixels, 2, 2).is_err());
}

#[test]
fn test_zero_dimensions_rejected() {
    assert!(create_png(&[], 0, 5).is_err());
    assert!(create_png_auto(&[], 5, 0).is_err());
}

#[test]
fn test_indexed_palette_bounds() {
    assert!(create_png_indexed(1, 1, &[], &[0]).is_err());

    let oversized = vec![(0, 0, 0, 255); 257];
    assert!(create_png_indexed(1, 1, &oversized, &[0]).is_err());
}

// ============================================================================
// Format selection tests
// ============================================================================

#[test]
fn test_create_png_rgba_fallback_many_colors() {
    let mut pixels = Vec::with_capacity(300 * 4);
    for i in 0..300 {
        pixels.push((i % 256) as u8); // R
        pixels.push(((i / 2) % 256) as u8); // G
        pixels.push(((i / 3) % 256) as u8); // B
        pixels.push(255); // A
    }

    let png = create_png_auto(&pixels, 300, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

#[test]
fn test_create_png_auto_diagram_like() {
    let pixels = generate_diagram_pixels(64, 64);

    let indexed = create_png_auto(&pixels, 64, 64).unwrap();
    let rgba = create_png(&pixels, 64, 64).unwrap();

    assert_eq!(color_type(&indexed), 3);
    assert!(
        indexed.len() < rgba.len(),
        "Indexed PNG ({} bytes) should be smaller than RGBA ({} bytes)",
        indexed.len(),
        rgba.len()
    );
}

// ============================================================================
// Large image tests (parallel processing)
// ============================================================================

#[test]
fn test_large_image_parallel_extraction() {
    // 128x128 = 16384 pixels, above the parallel threshold
    let mut pixels = Vec::with_capacity(128 * 128 * 4);
    for y in 0..128 {
        for x in 0..128 {
            let color_idx = ((x / 8) + (y / 8)) % 50;
            let r = (color_idx * 5) as u8;
            let g = (100 + color_idx * 3) as u8;
            let b = (200 - color_idx * 2) as u8;
            pixels.extend_from_slice(&[r, g, b, 255]);
        }
    }

    let png = create_png_auto(&pixels, 128, 128).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_small_and_large_diagrams_use_palette() {
    // Same content laid out as a small and a large image
    let small = generate_diagram_pixels(32, 32);
    let large = generate_diagram_pixels(256, 256);

    assert_eq!(color_type(&create_png_auto(&small, 32, 32).unwrap()), 3);
    assert_eq!(color_type(&create_png_auto(&large, 256, 256).unwrap()), 3);
}

#[test]
fn test_file_size_comparison_512x512() {
    let pixels = generate_diagram_pixels(512, 512);
    let unique_count = count_unique_colors(&pixels);

    let indexed = create_png_auto(&pixels, 512, 512).unwrap();
    let rgba = create_png(&pixels, 512, 512).unwrap();

    println!("\n=== 512x512 diagram ===");
    println!("Unique colors: {}", unique_count);
    println!("RGBA PNG:    {:>6} bytes", rgba.len());
    println!("Indexed PNG: {:>6} bytes", indexed.len());

    assert!(unique_count <= 256);
    assert!(
        indexed.len() <= rgba.len(),
        "Indexed should be <= RGBA when colors fit"
    );
}

// ============================================================================
// Edge case tests
// ============================================================================

#[test]
fn test_single_pixel() {
    let png = create_png_auto(&[255, 0, 0, 255], 1, 1).unwrap();
    assert_eq!(dimensions(&png), (1, 1));
}

#[test]
fn test_single_color_image() {
    let mut pixels = Vec::with_capacity(100 * 100 * 4);
    for _ in 0..(100 * 100) {
        pixels.extend_from_slice(&[255, 255, 255, 255]);
    }

    let png = create_png_auto(&pixels, 100, 100).unwrap();
    assert!(
        png.len() < 1000,
        "Single color 100x100 should be very small"
    );
}

#[test]
fn test_all_transparent() {
    let pixels = vec![0u8; 10 * 10 * 4];
    let png = create_png_auto(&pixels, 10, 10).unwrap();
    assert!(has_chunk(&png, b"tRNS"));
}

#[test]
fn test_grayscale_gradient() {
    // Exactly 256 unique colors still fits a palette
    let mut pixels = Vec::with_capacity(256 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }

    let png = create_png_auto(&pixels, 256, 1).unwrap();
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_grayscale_gradient_plus_one() {
    let mut pixels = Vec::with_capacity(257 * 4);
    for i in 0..256 {
        let v = i as u8;
        pixels.extend_from_slice(&[v, v, v, 255]);
    }
    pixels.extend_from_slice(&[128, 0, 0, 255]);

    let png = create_png_auto(&pixels, 257, 1).unwrap();
    assert_eq!(color_type(&png), 6);
}

// ============================================================================
// SVG rasterization
// ============================================================================

#[test]
fn test_render_svg_to_png() {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="6">
<rect x="0" y="0" width="8" height="6" fill="#ff0000"/>
</svg>"##;

    let png = render_svg_to_png(svg).unwrap();
    assert_eq!(&png[0..8], &PNG_SIGNATURE);
    assert_eq!(dimensions(&png), (8, 6));
    // A single solid fill fits a palette
    assert_eq!(color_type(&png), 3);
}

#[test]
fn test_render_invalid_svg_fails() {
    assert!(render_svg_to_png("<svg").is_err());
}
