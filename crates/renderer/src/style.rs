//! Color ramps for heatmap rendering.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::gradient::{interpolate_color, Color};

/// Yellow-orange-red sequential ramp, light to dark.
pub const YL_OR_RD: [&str; 9] = [
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

/// Color stop for gradient
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    /// Position along the ramp in [0, 1]
    pub position: f32,
    pub color: String,
}

/// A named sequence of color stops.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColorRamp {
    pub name: String,
    pub stops: Vec<ColorStop>,
}

impl Default for ColorRamp {
    fn default() -> Self {
        Self::yl_or_rd()
    }
}

impl ColorRamp {
    /// Evenly spaced stops from a list of hex colors.
    pub fn from_hex(name: &str, colors: &[&str]) -> Self {
        let last = colors.len().saturating_sub(1).max(1) as f32;
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, color)| ColorStop {
                position: i as f32 / last,
                color: color.to_string(),
            })
            .collect();
        Self {
            name: name.to_string(),
            stops,
        }
    }

    pub fn yl_or_rd() -> Self {
        Self::from_hex("YlOrRd", &YL_OR_RD)
    }

    /// Check that there are at least two stops with parseable colors.
    pub fn validate(&self) -> Result<()> {
        if self.stops.len() < 2 {
            return Err(RenderError::InvalidOption(format!(
                "color ramp '{}' needs at least two stops",
                self.name
            )));
        }
        for stop in &self.stops {
            if hex_to_rgb(&stop.color).is_none() {
                return Err(RenderError::InvalidColor(stop.color.clone()));
            }
            if !(0.0..=1.0).contains(&stop.position) {
                return Err(RenderError::InvalidOption(format!(
                    "stop position {} is outside [0, 1]",
                    stop.position
                )));
            }
        }
        Ok(())
    }

    /// Resolve the stops to colors, sorted by position.
    pub fn compile(&self) -> Result<CompiledRamp> {
        self.validate()?;
        Ok(CompiledRamp::from_stops(&self.stops))
    }
}

/// A ramp with parsed colors, ready for per-pixel lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRamp {
    stops: Vec<(f32, Color)>,
}

impl Default for CompiledRamp {
    fn default() -> Self {
        Self::from_stops(&ColorRamp::yl_or_rd().stops)
    }
}

impl CompiledRamp {
    /// Stops with unparseable colors are dropped.
    fn from_stops(stops: &[ColorStop]) -> Self {
        let mut stops: Vec<(f32, Color)> = stops
            .iter()
            .filter_map(|s| {
                hex_to_rgb(&s.color).map(|(r, g, b)| (s.position, Color::rgb(r, g, b)))
            })
            .collect();
        stops.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { stops }
    }

    /// Color at a normalized position in [0, 1].
    pub fn color_at(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Color::black(),
        };
        if t <= first.0 {
            return first.1;
        }
        if t >= last.0 {
            return last.1;
        }

        self.stops
            .windows(2)
            .find(|w| t >= w[0].0 && t <= w[1].0)
            .map(|w| {
                let span = w[1].0 - w[0].0;
                let local = if span > 0.0 { (t - w[0].0) / span } else { 0.0 };
                interpolate_color(w[0].1, w[1].1, local)
            })
            .unwrap_or(last.1)
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
