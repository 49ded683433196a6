//! Gradient/heatmap color mapping for gridded volume data.

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Paint `top` over this color with the given opacity.
    ///
    /// The top color's own alpha scales the opacity. The result is opaque.
    pub fn blend(self, top: Color, opacity: f32) -> Color {
        let alpha = (opacity * f32::from(top.a) / 255.0).clamp(0.0, 1.0);
        let mix = |under: u8, over: u8| {
            (f32::from(under) * (1.0 - alpha) + f32::from(over) * alpha).round() as u8
        };
        Color::rgb(mix(self.r, top.r), mix(self.g, top.g), mix(self.b, top.b))
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Linear interpolation between two colors, `t` clamped to [0, 1].
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| (f32::from(a) * t_inv + f32::from(b) * t).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Position of `value` within [min_val, max_val] as 0-1.
///
/// A flat range maps every value to the midpoint.
pub fn normalize(value: f64, min_val: f64, max_val: f64) -> f32 {
    let range = max_val - min_val;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        return 0.5;
    }
    ((value - min_val) / range).clamp(0.0, 1.0) as f32
}

/// Render grid data as one RGBA pixel per cell.
///
/// # Arguments
/// - `data`: Grid values (row-major order)
/// - `width`: Number of columns
/// - `height`: Number of rows
/// - `min_val`: Minimum value in the data (for scaling)
/// - `max_val`: Maximum value in the data (for scaling)
/// - `color_fn`: Function to convert a normalized value (0-1) to a color
///
/// # Returns
/// RGBA pixel data (4 bytes per pixel)
pub fn render_grid<F>(
    data: &[f64],
    width: usize,
    height: usize,
    min_val: f64,
    max_val: f64,
    color_fn: F,
) -> Vec<u8>
where
    F: Fn(f32) -> Color,
{
    let mut pixels = vec![0u8; width * height * 4];

    for (idx, &value) in data.iter().take(width * height).enumerate() {
        let color = color_fn(normalize(value, min_val, max_val));
        pixels[idx * 4..idx * 4 + 4].copy_from_slice(&color.to_array());
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_color() {
        let black = Color::black();
        let white = Color::white();
        assert_eq!(interpolate_color(black, white, 0.0), black);
        assert_eq!(interpolate_color(black, white, 1.0), white);
        assert_eq!(interpolate_color(black, white, 0.5), Color::rgb(128, 128, 128));
        assert_eq!(interpolate_color(black, white, 7.0), white);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.5);
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.5);
    }

    #[test]
    fn test_blend() {
        let red = Color::rgb(255, 0, 0);
        assert_eq!(Color::white().blend(red, 1.0), red);
        assert_eq!(Color::white().blend(red, 0.0), Color::white());
        assert_eq!(Color::white().blend(red, 0.2), Color::rgb(255, 204, 204));
        assert_eq!(Color::white().blend(Color::new(0, 0, 0, 0), 1.0), Color::white());
    }

    #[test]
    fn test_render_grid_maps_each_cell() {
        let pixels = render_grid(&[0.0, 10.0], 2, 1, 0.0, 10.0, |t| {
            interpolate_color(Color::black(), Color::white(), t)
        });
        assert_eq!(pixels, vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }
}
