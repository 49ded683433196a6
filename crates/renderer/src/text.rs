//! Text drawing for titles, tick labels and the color bar.

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rusttype::{Font, Scale};
use tracing::{debug, warn};

/// TrueType fonts tried when no font path is configured.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded font plus the size it is drawn at.
pub struct LabelFont {
    font: Font<'static>,
    scale: Scale,
    pub path: PathBuf,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("path", &self.path)
            .field("size", &self.scale.y)
            .finish()
    }
}

impl LabelFont {
    /// Load a TrueType font from disk.
    pub fn from_file(path: &Path, size: f32) -> Option<Self> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Font not readable");
                return None;
            }
        };
        let font = Font::try_from_vec(bytes)?;
        Some(Self {
            font,
            scale: Scale::uniform(size),
            path: path.to_path_buf(),
        })
    }

    /// Load the configured font, or the first system font found.
    ///
    /// Returns `None` with a warning when nothing usable exists.
    pub fn locate(configured: Option<&Path>, size: f32) -> Option<Self> {
        if let Some(path) = configured {
            let font = Self::from_file(path, size);
            if font.is_none() {
                warn!(path = %path.display(), "Configured font could not be loaded");
            }
            return font;
        }

        let found = FONT_SEARCH_PATHS
            .iter()
            .map(Path::new)
            .find_map(|path| Self::from_file(path, size));
        if found.is_none() {
            warn!("No TrueType font found, rendering without text annotations");
        }
        found
    }

    pub fn size(&self) -> f32 {
        self.scale.y
    }

    /// Pixel width and height of `text`.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        let (w, h) = text_size(self.scale, &self.font, text);
        (w.max(0) as u32, h.max(0) as u32)
    }

    /// Height of one line of text in pixels.
    pub fn line_height(&self) -> u32 {
        self.scale.y.ceil() as u32
    }

    /// Draw `text` with its top-left corner at (x, y).
    pub fn draw(&self, img: &mut RgbaImage, text: &str, x: i32, y: i32, color: Rgba<u8>) {
        draw_text_mut(img, color, x, y, self.scale, &self.font, text);
    }

    /// Draw `text` horizontally centered on `center_x`.
    pub fn draw_centered(
        &self,
        img: &mut RgbaImage,
        text: &str,
        center_x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        let (w, _) = self.measure(text);
        self.draw(img, text, center_x - (w as i32) / 2, y, color);
    }

    /// Draw `text` so that it ends at `right_x`.
    pub fn draw_right_aligned(
        &self,
        img: &mut RgbaImage,
        text: &str,
        right_x: i32,
        y: i32,
        color: Rgba<u8>,
    ) {
        let (w, _) = self.measure(text);
        self.draw(img, text, right_x - w as i32, y, color);
    }
}

/// Format a value for the color bar ticks (2 decimal places).
pub fn format_value(value: f64) -> String {
    format!("{:.2}", value)
}
