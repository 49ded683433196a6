//! Image rendering for tree volume grids.
//!
//! A [`RenderRequest`] carries the row-major cell values, optional axis
//! labels and an optional background image. [`HeatmapRenderer`] draws it as
//! one colored square per cell on the YlOrRd ramp, adds a color bar, and
//! encodes the result as PNG.
//!
//! ```
//! use renderer::{GridRenderer, HeatmapOptions, HeatmapRenderer, RenderRequest};
//!
//! let renderer = HeatmapRenderer::new(HeatmapOptions {
//!     annotate: false,
//!     ..HeatmapOptions::default()
//! })
//! .unwrap();
//! let png = renderer
//!     .render(&RenderRequest::new(vec![0.0, 0.5, 1.0, 0.25], 2, 2))
//!     .unwrap();
//! assert_eq!(&png[1..4], b"PNG");
//! ```

pub mod error;
pub mod gradient;
pub mod heatmap;
pub mod png;
pub mod request;
pub mod style;
pub mod text;

pub use error::{RenderError, Result};
pub use gradient::Color;
pub use heatmap::{HeatmapOptions, HeatmapRenderer, Layout};
pub use request::{GridRenderer, RenderRequest};
pub use style::{ColorRamp, CompiledRamp};
pub use text::LabelFont;
