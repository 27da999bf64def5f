//! # chartsmith_charts
//!
//! Built-in chart renderers for chartsmith.
//!
//! Each renderer reads the chart's CSV data file, applies the site theme and
//! produces a standalone HTML page that loads Plotly.js from the CDN.
//!
//! ## Example
//!
//! ```rust,ignore
//! use chartsmith_charts::default_registry;
//! use chartsmith_core::Builder;
//!
//! let builder = Builder::new(default_registry(Some("docs/_data/site.yml".into())));
//! ```

mod charts;
pub mod data;
mod error;
mod figure;
pub mod html;
mod theme;

use std::path::PathBuf;

use chartsmith_core::RendererRegistry;

pub use charts::{ChartKind, ChartRenderer, least_squares};
pub use error::ChartError;
pub use figure::Figure;
pub use theme::Theme;

/// Creates a registry with every built-in chart type.
///
/// `theme` is the site file the renderers read their theme from; a missing
/// file falls back to [`Theme::fallback`].
pub fn default_registry(theme: Option<PathBuf>) -> RendererRegistry {
    let mut registry = RendererRegistry::new();
    for kind in ChartKind::ALL {
        registry.register(kind.as_str(), ChartRenderer::new(kind, theme.clone()));
    }
    registry
}
