//! Rendering request and the renderer seam.

use std::path::{Path, PathBuf};

use crate::error::{RenderError, Result};

/// Everything a renderer needs to draw one grid.
///
/// `values` are row-major with the first row drawn at the top. Axis labels
/// are optional; when present there must be one per column and one per row.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub values: Vec<f64>,
    pub width: usize,
    pub height: usize,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    pub background: Option<PathBuf>,
}

impl RenderRequest {
    pub fn new(values: Vec<f64>, width: usize, height: usize) -> Self {
        Self {
            values,
            width,
            height,
            x_labels: Vec::new(),
            y_labels: Vec::new(),
            background: None,
        }
    }

    pub fn with_labels(mut self, x_labels: Vec<String>, y_labels: Vec<String>) -> Self {
        self.x_labels = x_labels;
        self.y_labels = y_labels;
        self
    }

    pub fn with_background(mut self, background: impl Into<PathBuf>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn background(&self) -> Option<&Path> {
        self.background.as_deref()
    }

    /// Check that values and labels match the grid dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }

        let expected = self.width * self.height;
        if self.values.len() != expected {
            return Err(RenderError::ValueCountMismatch {
                expected,
                actual: self.values.len(),
            });
        }

        for (axis, labels, expected) in [
            ("x", &self.x_labels, self.width),
            ("y", &self.y_labels, self.height),
        ] {
            if !labels.is_empty() && labels.len() != expected {
                return Err(RenderError::LabelCountMismatch {
                    axis,
                    expected,
                    actual: labels.len(),
                });
            }
        }

        Ok(())
    }

    /// Smallest and largest finite value, `(0.0, 0.0)` if there are none.
    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .values
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if min > max {
            (0.0, 0.0)
        } else {
            (min, max)
        }
    }
}

/// Turns a [`RenderRequest`] into encoded image bytes.
pub trait GridRenderer {
    fn render(&self, request: &RenderRequest) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (1..=n).map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_validate_dimensions() {
        assert!(RenderRequest::new(vec![0.0; 6], 3, 2).validate().is_ok());
        assert_eq!(
            RenderRequest::new(vec![0.0; 5], 3, 2).validate(),
            Err(RenderError::ValueCountMismatch {
                expected: 6,
                actual: 5
            })
        );
        assert!(matches!(
            RenderRequest::new(vec![], 0, 2).validate(),
            Err(RenderError::EmptyGrid { .. })
        ));
    }

    #[test]
    fn test_validate_labels() {
        let ok = RenderRequest::new(vec![0.0; 6], 3, 2).with_labels(labels(3), labels(2));
        assert!(ok.validate().is_ok());

        let bad = RenderRequest::new(vec![0.0; 6], 3, 2).with_labels(labels(3), labels(3));
        assert_eq!(
            bad.validate(),
            Err(RenderError::LabelCountMismatch {
                axis: "y",
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_value_range() {
        let request = RenderRequest::new(vec![0.0, 2.5, f64::NAN, 1.0], 2, 2);
        assert_eq!(request.value_range(), (0.0, 2.5));
        assert_eq!(RenderRequest::new(vec![f64::NAN], 1, 1).value_range(), (0.0, 0.0));
    }

    #[test]
    fn test_background_builder() {
        let request = RenderRequest::new(vec![0.0], 1, 1).with_background("plot/background.png");
        assert_eq!(request.background(), Some(Path::new("plot/background.png")));
    }
}
