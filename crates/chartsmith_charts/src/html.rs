//! Standalone HTML pages.

use serde_json::{Value, json};

use crate::Figure;

/// Plotly.js bundle loaded by every page.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Mode-bar configuration shared by all charts.
pub fn plotly_config() -> Value {
    json!({
        "displayModeBar": true,
        "displaylogo": false,
        "modeBarButtonsToRemove": ["pan2d", "lasso2d", "select2d"],
        "responsive": true
    })
}

/// Renders a full HTML document that draws `figure` on load.
pub fn render_page(title: &str, figure: &Figure) -> String {
    let figure = figure.to_json();
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{title}</title>
    <script src="{cdn}" charset="utf-8"></script>
    <style>html, body {{ margin: 0; height: 100%; }} #chart {{ width: 100%; height: 100%; }}</style>
</head>
<body>
    <div id="chart" class="plotly-graph-div"></div>
    <script type="text/javascript">
        Plotly.newPlot("chart", {data}, {layout}, {config});
    </script>
</body>
</html>
"#,
        title = escape_html(title),
        cdn = PLOTLY_CDN,
        data = script_json(&figure["data"]),
        layout = script_json(&figure["layout"]),
        config = script_json(&plotly_config()),
    )
}

/// JSON safe to inline in a `<script>` element.
fn script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
