//! Generated preview images.
//!
//! Packages carry a `preview.png`. When no suitable image is available in
//! the package itself, a neutral placeholder is generated; accent and LED
//! packages get a swatch of their colors instead.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};

use crate::manifest::{AccentColors, HexColor, LedSettings};

/// Width of generated previews in pixels.
pub const PREVIEW_WIDTH: u32 = 320;

/// Height of generated previews in pixels.
pub const PREVIEW_HEIGHT: u32 = 240;

const PLACEHOLDER_DARK: Rgba<u8> = Rgba([0x1E, 0x23, 0x29, 0xFF]);
const PLACEHOLDER_LIGHT: Rgba<u8> = Rgba([0x2E, 0x34, 0x3B, 0xFF]);
const CHECKER_SIZE: u32 = 16;

/// Errors writing a preview image.
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to encode preview {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// A dark checkerboard placeholder.
pub fn generate_placeholder(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if ((x / CHECKER_SIZE) + (y / CHECKER_SIZE)) % 2 == 0 {
            PLACEHOLDER_DARK
        } else {
            PLACEHOLDER_LIGHT
        }
    })
}

/// Vertical stripes, one per color, of equal width.
///
/// An empty color list yields the placeholder.
pub fn generate_swatch(colors: &[HexColor], width: u32, height: u32) -> RgbaImage {
    if colors.is_empty() {
        return generate_placeholder(width, height);
    }
    let stripes = colors.len() as u32;
    RgbaImage::from_fn(width, height, |x, _| {
        let index = ((x * stripes) / width.max(1)).min(stripes - 1) as usize;
        let [r, g, b] = colors[index].rgb();
        Rgba([r, g, b, 0xFF])
    })
}

/// Swatch colors of an accent palette, in slot order.
pub fn accent_swatch_colors(colors: &AccentColors) -> Vec<HexColor> {
    colors.slots().to_vec()
}

/// Swatch colors of an LED profile: both colors of every zone.
pub fn led_swatch_colors(settings: &LedSettings) -> Vec<HexColor> {
    settings
        .zones()
        .iter()
        .flat_map(|(_, zone)| [zone.color1, zone.color2])
        .collect()
}

/// Encode an image as PNG at `path`, creating parent directories.
pub fn write_png(image: &RgbaImage, path: &Path) -> Result<(), PreviewError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PreviewError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| PreviewError::Encode {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Write a default-sized placeholder preview.
pub fn write_placeholder(path: &Path) -> Result<(), PreviewError> {
    write_png(&generate_placeholder(PREVIEW_WIDTH, PREVIEW_HEIGHT), path)
}

/// Write a default-sized swatch preview.
pub fn write_swatch(path: &Path, colors: &[HexColor]) -> Result<(), PreviewError> {
    write_png(&generate_swatch(colors, PREVIEW_WIDTH, PREVIEW_HEIGHT), path)
}
