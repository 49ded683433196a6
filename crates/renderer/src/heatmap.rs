//! Heatmap renderer: one colored square per grid cell, optionally
//! composited over a background image, with a color bar and labels.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{RenderError, Result};
use crate::gradient::{render_grid, Color};
use crate::png::create_png_auto;
use crate::request::{GridRenderer, RenderRequest};
use crate::style::{ColorRamp, CompiledRamp};
use crate::text::{format_value, LabelFont};

/// Blank space around the drawing.
const PADDING: u32 = 10;
/// Space between the plot and the color bar.
const BAR_GAP: u32 = 12;
/// Width of the color bar.
const BAR_WIDTH: u32 = 16;
/// Space between an edge and its tick labels.
const TICK_GAP: u32 = 6;

const TEXT_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FRAME_COLOR: Rgba<u8> = Rgba([64, 64, 64, 255]);

/// Options for [`HeatmapRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapOptions {
    /// Side of one grid cell in pixels
    pub cell_size: u32,
    /// Opacity of the background image over white
    pub background_opacity: f32,
    /// Opacity of the heatmap when a background is shown
    pub heatmap_opacity: f32,
    /// Opacity of the heatmap over plain white
    pub standalone_opacity: f32,
    /// Draw title, tick labels and color bar text
    pub annotate: bool,
    /// TrueType font for annotations; system fonts are searched if unset
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub title: String,
    pub colorbar_label: String,
    pub ramp: ColorRamp,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            cell_size: 20,
            background_opacity: 0.8,
            heatmap_opacity: 0.2,
            standalone_opacity: 1.0,
            annotate: true,
            font_path: None,
            font_size: 12.0,
            title: "Tree Volume Grid Map".to_string(),
            colorbar_label: "Tree Volume (m³)".to_string(),
            ramp: ColorRamp::yl_or_rd(),
        }
    }
}

impl HeatmapOptions {
    pub fn validate(&self) -> Result<()> {
        if self.cell_size == 0 {
            return Err(RenderError::InvalidOption("cell_size must be positive".into()));
        }
        for (name, value) in [
            ("background_opacity", self.background_opacity),
            ("heatmap_opacity", self.heatmap_opacity),
            ("standalone_opacity", self.standalone_opacity),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RenderError::InvalidOption(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if self.font_size.is_nan() || self.font_size <= 0.0 {
            return Err(RenderError::InvalidOption("font_size must be positive".into()));
        }
        self.ramp.validate()
    }
}

/// Pixel geometry of one rendered image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub plot_x: u32,
    pub plot_y: u32,
    pub plot_width: u32,
    pub plot_height: u32,
    pub bar_x: u32,
}

impl Layout {
    /// Pixel at the center of a 0-based grid cell.
    pub fn cell_center(&self, row: usize, column: usize, cell_size: u32) -> (u32, u32) {
        (
            self.plot_x + column as u32 * cell_size + cell_size / 2,
            self.plot_y + row as u32 * cell_size + cell_size / 2,
        )
    }
}

/// Renders a [`RenderRequest`] as a PNG heatmap.
#[derive(Debug, Clone, Default)]
pub struct HeatmapRenderer {
    options: HeatmapOptions,
    ramp: CompiledRamp,
}

impl HeatmapRenderer {
    pub fn new(options: HeatmapOptions) -> Result<Self> {
        options.validate()?;
        let ramp = options.ramp.compile()?;
        Ok(Self { options, ramp })
    }

    pub fn options(&self) -> &HeatmapOptions {
        &self.options
    }

    /// The annotation font, if annotations are enabled and a font exists.
    pub fn label_font(&self) -> Option<LabelFont> {
        if !self.options.annotate {
            return None;
        }
        LabelFont::locate(self.options.font_path.as_deref(), self.options.font_size)
    }

    /// Compute the image geometry for a request.
    ///
    /// Fails when the image would not fit in `u32` pixel coordinates.
    pub fn layout(&self, request: &RenderRequest, font: Option<&LabelFont>) -> Result<Layout> {
        let cell = self.options.cell_size;
        let plot_width = plot_extent("width", request.width, cell)?;
        let plot_height = plot_extent("height", request.height, cell)?;

        let (left, top, bottom, right_text) = match font {
            None => (PADDING, PADDING, PADDING, 0),
            Some(font) => {
                let line = font.line_height();
                let widest = |labels: &[String]| {
                    labels.iter().map(|l| font.measure(l).0).max().unwrap_or(0)
                };

                let y_label_width = widest(&request.y_labels);
                let left = PADDING + y_label_width + if y_label_width > 0 { TICK_GAP } else { 0 };
                let top = if self.options.title.is_empty() {
                    PADDING
                } else {
                    PADDING + line + PADDING
                };
                let bottom = if request.x_labels.is_empty() {
                    PADDING
                } else {
                    TICK_GAP + line + PADDING
                };

                let (min, max) = request.value_range();
                let right_text = widest(&[
                    format_value(min),
                    format_value(max),
                    self.options.colorbar_label.clone(),
                ]);

                (left, top, bottom, right_text + TICK_GAP)
            }
        };

        let too_large = || {
            RenderError::InvalidOption(format!(
                "{}x{} cells at {} px do not fit in one image",
                request.width, request.height, cell
            ))
        };
        let bar_x = checked_sum(&[left, plot_width, BAR_GAP]).ok_or_else(too_large)?;
        let width = checked_sum(&[bar_x, BAR_WIDTH, right_text, PADDING]).ok_or_else(too_large)?;
        let height = checked_sum(&[top, plot_height, bottom]).ok_or_else(too_large)?;

        Ok(Layout {
            width,
            height,
            plot_x: left,
            plot_y: top,
            plot_width,
            plot_height,
            bar_x,
        })
    }

    /// Draw the request into an RGBA image without encoding it.
    pub fn render_image(&self, request: &RenderRequest) -> Result<RgbaImage> {
        request.validate()?;

        let font = self.label_font();
        let layout = self.layout(request, font.as_ref())?;
        let mut img = RgbaImage::from_pixel(layout.width, layout.height, Rgba([255, 255, 255, 255]));

        let background = request
            .background()
            .and_then(|path| load_background(path, layout.plot_width, layout.plot_height));
        let heat_opacity = if background.is_some() {
            self.options.heatmap_opacity
        } else {
            self.options.standalone_opacity
        };

        let (min, max) = request.value_range();
        let cell = self.options.cell_size;

        let cell_colors = render_grid(
            &request.values,
            request.width,
            request.height,
            min,
            max,
            |t| self.ramp.color_at(t),
        );

        for (idx, rgba) in cell_colors.chunks_exact(4).enumerate() {
            let (row, column) = (idx / request.width, idx % request.width);
            let heat = Color::new(rgba[0], rgba[1], rgba[2], rgba[3]);

            for dy in 0..cell {
                for dx in 0..cell {
                    let px = column as u32 * cell + dx;
                    let py = row as u32 * cell + dy;
                    let base = match &background {
                        Some(bg) => Color::white()
                            .blend(to_color(bg.get_pixel(px, py)), self.options.background_opacity),
                        None => Color::white(),
                    };
                    let out = base.blend(heat, heat_opacity);
                    img.put_pixel(layout.plot_x + px, layout.plot_y + py, Rgba(out.to_array()));
                }
            }
        }

        self.draw_colorbar(&mut img, &layout);
        draw_hollow_rect_mut(
            &mut img,
            Rect::at(layout.plot_x as i32 - 1, layout.plot_y as i32 - 1)
                .of_size(layout.plot_width + 2, layout.plot_height + 2),
            FRAME_COLOR,
        );

        if let Some(font) = &font {
            self.draw_annotations(&mut img, &layout, request, font);
        }

        debug!(
            width = layout.width,
            height = layout.height,
            background = background.is_some(),
            annotated = font.is_some(),
            "Rendered heatmap image"
        );

        Ok(img)
    }

    /// Vertical ramp next to the plot, maximum at the top.
    fn draw_colorbar(&self, img: &mut RgbaImage, layout: &Layout) {
        let span = layout.plot_height.saturating_sub(1).max(1) as f32;
        for dy in 0..layout.plot_height {
            let color = self.ramp.color_at(1.0 - dy as f32 / span);
            for dx in 0..BAR_WIDTH {
                img.put_pixel(layout.bar_x + dx, layout.plot_y + dy, Rgba(color.to_array()));
            }
        }
        draw_hollow_rect_mut(
            img,
            Rect::at(layout.bar_x as i32 - 1, layout.plot_y as i32 - 1)
                .of_size(BAR_WIDTH + 2, layout.plot_height + 2),
            FRAME_COLOR,
        );
    }

    fn draw_annotations(
        &self,
        img: &mut RgbaImage,
        layout: &Layout,
        request: &RenderRequest,
        font: &LabelFont,
    ) {
        let cell = self.options.cell_size as i32;
        let line = font.line_height() as i32;
        let plot_x = layout.plot_x as i32;
        let plot_y = layout.plot_y as i32;
        let plot_bottom = plot_y + layout.plot_height as i32;

        if !self.options.title.is_empty() {
            let center = plot_x + layout.plot_width as i32 / 2;
            font.draw_centered(img, &self.options.title, center, PADDING as i32, TEXT_COLOR);
        }

        for (column, label) in request.x_labels.iter().enumerate() {
            let center = plot_x + column as i32 * cell + cell / 2;
            font.draw_centered(img, label, center, plot_bottom + TICK_GAP as i32, TEXT_COLOR);
        }

        for (row, label) in request.y_labels.iter().enumerate() {
            let y = plot_y + row as i32 * cell + (cell - line) / 2;
            font.draw_right_aligned(img, label, plot_x - TICK_GAP as i32, y, TEXT_COLOR);
        }

        let (min, max) = request.value_range();
        let text_x = (layout.bar_x + BAR_WIDTH + TICK_GAP) as i32;
        font.draw(img, &format_value(max), text_x, plot_y, TEXT_COLOR);
        font.draw(img, &format_value(min), text_x, plot_bottom - line, TEXT_COLOR);
        font.draw(
            img,
            &self.options.colorbar_label,
            text_x,
            plot_y + (layout.plot_height as i32 - line) / 2,
            TEXT_COLOR,
        );
    }
}

impl GridRenderer for HeatmapRenderer {
    fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let img = self.render_image(request)?;
        let png = create_png_auto(img.as_raw(), img.width() as usize, img.height() as usize)?;

        info!(
            width = img.width(),
            height = img.height(),
            bytes = png.len(),
            "Encoded heatmap PNG"
        );

        Ok(png)
    }
}

/// Pixel length of `cells` cells of `cell_size` pixels.
fn plot_extent(axis: &str, cells: usize, cell_size: u32) -> Result<u32> {
    u32::try_from(cells)
        .ok()
        .and_then(|n| n.checked_mul(cell_size))
        .ok_or_else(|| {
            RenderError::InvalidOption(format!(
                "plot {} of {} cells at {} px exceeds image limits",
                axis, cells, cell_size
            ))
        })
}

fn checked_sum(parts: &[u32]) -> Option<u32> {
    parts.iter().try_fold(0u32, |acc, &p| acc.checked_add(p))
}

fn to_color(pixel: &Rgba<u8>) -> Color {
    let [r, g, b, a] = pixel.0;
    Color::new(r, g, b, a)
}

/// Load and stretch the background to the plot area.
///
/// Missing or unreadable images are logged and skipped.
fn load_background(path: &Path, width: u32, height: u32) -> Option<RgbaImage> {
    if !path.exists() {
        warn!(path = %path.display(), "Background image not found, rendering without it");
        return None;
    }

    match image::open(path) {
        Ok(img) => {
            let resized = imageops::resize(&img.to_rgba8(), width, height, FilterType::Triangle);
            debug!(path = %path.display(), width, height, "Loaded background image");
            Some(resized)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load background image, rendering without it");
            None
        }
    }
}
