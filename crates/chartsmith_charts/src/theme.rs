//! Chart theme loaded from the site configuration.
//!
//! ```yaml
//! charts:
//!   colors: { primary: "#005EB8", secondary: "#00A3E0", accent: "#FFC300" }
//!   template: simple_white
//!   font_family: "Inter, sans-serif"
//!   title_size: 20
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::ChartError;

/// Colors, template and typography applied to every chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub colors: Vec<String>,
    pub template: String,
    pub font_family: String,
    pub title_size: u32,
}

#[derive(Debug, Deserialize)]
struct SiteFile {
    charts: ChartsSection,
}

#[derive(Debug, Deserialize)]
struct ChartsSection {
    colors: Palette,
    #[serde(default = "default_template")]
    template: String,
    font_family: String,
    title_size: u32,
}

#[derive(Debug, Deserialize)]
struct Palette {
    primary: String,
    secondary: String,
    accent: String,
}

fn default_template() -> String {
    "simple_white".to_string()
}

impl Theme {
    /// Theme used when no site file exists.
    pub fn fallback() -> Self {
        Self {
            colors: vec![
                "#005EB8".to_string(),
                "#00A3E0".to_string(),
                "#FFC300".to_string(),
            ],
            template: default_template(),
            font_family: "Inter, sans-serif".to_string(),
            title_size: 20,
        }
    }

    /// Loads the theme from a site file.
    ///
    /// A missing file (or no file at all) yields [`Theme::fallback`]. A file
    /// that exists but lacks the `charts` section is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ChartError> {
        let Some(path) = path else {
            return Ok(Self::fallback());
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Theme file {} not found, using fallback", path.display());
                return Ok(Self::fallback());
            }
            Err(e) => {
                return Err(ChartError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };

        Self::from_yaml(&content).map_err(|reason| ChartError::Theme {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parses a theme from site YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        let site: SiteFile = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        let charts = site.charts;
        Ok(Self {
            colors: vec![
                charts.colors.primary,
                charts.colors.secondary,
                charts.colors.accent,
            ],
            template: charts.template,
            font_family: charts.font_family,
            title_size: charts.title_size,
        })
    }

    /// Layout attributes for this theme, to be merged into a figure layout.
    pub fn layout(&self) -> Value {
        let mut layout = template_layout(&self.template);
        layout["colorway"] = json!(self.colors);
        layout["font"] = json!({ "family": self.font_family });
        layout["margin"] = json!({ "l": 40, "r": 10, "t": 40, "b": 40 });
        layout["autosize"] = json!(true);
        layout
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Layout defaults for the Plotly template names used by the site.
///
/// Plotly.js has no named templates, so the few we use are spelled out.
fn template_layout(name: &str) -> Value {
    match name {
        "simple_white" => json!({
            "paper_bgcolor": "white",
            "plot_bgcolor": "white",
            "xaxis": { "showgrid": false, "showline": true, "linecolor": "rgb(36,36,36)", "ticks": "outside" },
            "yaxis": { "showgrid": false, "showline": true, "linecolor": "rgb(36,36,36)", "ticks": "outside" }
        }),
        "plotly_white" => json!({
            "paper_bgcolor": "white",
            "plot_bgcolor": "white",
            "xaxis": { "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" },
            "yaxis": { "gridcolor": "#EBF0F8", "zerolinecolor": "#EBF0F8" }
        }),
        "plotly" | "none" => json!({}),
        other => {
            warn!("Unknown chart template '{}', using Plotly defaults", other);
            json!({})
        }
    }
}
