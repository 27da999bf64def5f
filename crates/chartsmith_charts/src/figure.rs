//! Plotly figure model.

use serde_json::{Value, json};

use crate::Theme;

/// Traces plus layout, in the shape `Plotly.newPlot` expects.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl Figure {
    /// Creates an empty figure styled with `theme`.
    pub fn new(title: &str, theme: &Theme) -> Self {
        let mut layout = theme.layout();
        layout["title"] = json!({ "font": { "size": theme.title_size } });
        if !title.is_empty() {
            layout["title"]["text"] = json!(title);
        }
        Self {
            data: Vec::new(),
            layout,
        }
    }

    /// Sets the axis titles.
    pub fn axes(mut self, x: &str, y: &str) -> Self {
        self.layout["xaxis"]["title"] = json!({ "text": x });
        self.layout["yaxis"]["title"] = json!({ "text": y });
        self
    }

    /// Sets the legend title.
    pub fn legend(mut self, title: &str) -> Self {
        self.layout["legend"] = json!({ "title": { "text": title } });
        self
    }

    pub fn push(&mut self, trace: Value) {
        self.data.push(trace);
    }

    /// Serializes the figure as `{ "data": [...], "layout": {...} }`.
    pub fn to_json(&self) -> Value {
        json!({ "data": self.data, "layout": self.layout })
    }
}
