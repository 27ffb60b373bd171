//! Tests for PNG encoding.
//!
//! Encoded images are decoded again with the `image` crate to check that the
//! chunk layout, CRCs and scanline filtering produce a readable file.

use renderer::png::encode_png;
use renderer::RenderError;

// ============================================================================
// Helper functions
// ============================================================================

/// Horizontal gradient with a transparent first column.
fn gradient_pixels(width: usize, height: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            if x == 0 {
                pixels.extend_from_slice(&[0, 0, 0, 0]);
            } else {
                let v = (x * 255 / width.max(1)) as u8;
                pixels.extend_from_slice(&[v, (y % 256) as u8, 255 - v, 255]);
            }
        }
    }
    pixels
}

// ============================================================================
// Round-trip through a real decoder
// ============================================================================

#[test]
fn test_decodes_to_same_pixels() {
    let (width, height) = (37, 19);
    let pixels = gradient_pixels(width, height);

    let png = encode_png(&pixels, width, height).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(decoded.width(), width as u32);
    assert_eq!(decoded.height(), height as u32);
    assert_eq!(decoded.into_raw(), pixels);
}

#[test]
fn test_transparency_preserved() {
    let pixels = [
        255, 0, 0, 255, // red, opaque
        0, 0, 0, 0, // transparent
        0, 255, 0, 128, // green, semi-transparent
        0, 0, 255, 255, // blue, opaque
    ];

    let png = encode_png(&pixels, 2, 2).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();

    assert_eq!(decoded.get_pixel(1, 0).0, [0, 0, 0, 0]);
    assert_eq!(decoded.get_pixel(0, 1).0, [0, 255, 0, 128]);
}

#[test]
fn test_single_row_image() {
    let pixels = gradient_pixels(300, 1);
    let png = encode_png(&pixels, 300, 1).unwrap();
    let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (300, 1));
}

// ============================================================================
// Error cases
// ============================================================================

#[test]
fn test_buffer_size_mismatch() {
    let pixels = gradient_pixels(4, 4);
    let err = encode_png(&pixels, 4, 5).unwrap_err();
    match err {
        RenderError::BufferSize {
            expected, actual, ..
        } => {
            assert_eq!(expected, 80);
            assert_eq!(actual, 64);
        }
        other => panic!("unexpected error: {other}"),
    }
}
