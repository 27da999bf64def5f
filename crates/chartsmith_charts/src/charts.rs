//! Built-in chart types.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use chartsmith_core::{Artifact, JobSpec, RenderError, Renderer};

use crate::data::{Table, data_file};
use crate::{ChartError, Figure, Theme, html};

/// Chart types understood by [`ChartRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// One line per `ys` column.
    LineMulti,
    /// Bars grouped by a `color` column.
    BarGrouped,
    /// Markers with an optional least-squares trend line.
    ScatterTrend,
    /// Stacked filled areas.
    AreaFilled,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::LineMulti,
        ChartKind::BarGrouped,
        ChartKind::ScatterTrend,
        ChartKind::AreaFilled,
    ];

    /// The `type` value used in spec files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::LineMulti => "line_multi",
            ChartKind::BarGrouped => "bar_grouped",
            ChartKind::ScatterTrend => "scatter_trend",
            ChartKind::AreaFilled => "area_filled",
        }
    }

    /// Builds the figure for this chart type.
    pub fn build(&self, table: &Table, params: &Value, theme: &Theme) -> Result<Figure, ChartError> {
        match self {
            ChartKind::LineMulti => line_multi(table, parse_params(*self, params)?, theme),
            ChartKind::BarGrouped => bar_grouped(table, parse_params(*self, params)?, theme),
            ChartKind::ScatterTrend => scatter_trend(table, parse_params(*self, params)?, theme),
            ChartKind::AreaFilled => area_filled(table, parse_params(*self, params)?, theme),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders one chart type to a standalone Plotly HTML page.
///
/// The theme file is read on every render so a theme edit is picked up by
/// the next build without restarting anything.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    kind: ChartKind,
    theme: Option<PathBuf>,
}

impl ChartRenderer {
    pub fn new(kind: ChartKind, theme: Option<PathBuf>) -> Self {
        Self { kind, theme }
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }
}

impl Renderer for ChartRenderer {
    fn render(&self, job: &JobSpec) -> Result<Artifact, RenderError> {
        let theme = Theme::load(self.theme.as_deref())?;
        let data = data_file(job.data_path())?;
        let table = Table::read(&data)?;

        debug!(
            "Rendering {} '{}' from {} ({} rows)",
            self.kind,
            job.id,
            data.display(),
            table.len()
        );

        let figure = self.kind.build(&table, job.params(), &theme)?;
        Ok(Artifact::from(html::render_page(&job.id, &figure)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LineParams {
    x: String,
    ys: Vec<String>,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeriesParams {
    x: String,
    y: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScatterParams {
    x: String,
    y: String,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default = "default_trendline")]
    trendline: bool,
}

fn default_trendline() -> bool {
    true
}

fn parse_params<T: DeserializeOwned>(kind: ChartKind, params: &Value) -> Result<T, ChartError> {
    let params = if params.is_null() {
        json!({})
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| ChartError::Params {
        kind: kind.as_str(),
        reason: e.to_string(),
    })
}

/// Splits `table` by `color`, or returns it whole under `fallback`.
fn series(
    table: &Table,
    color: Option<&str>,
    fallback: &str,
) -> Result<Vec<(String, Table)>, ChartError> {
    match color {
        Some(column) => table.group_by(column),
        None => Ok(vec![(fallback.to_string(), table.clone())]),
    }
}

fn line_multi(table: &Table, params: LineParams, theme: &Theme) -> Result<Figure, ChartError> {
    if params.ys.is_empty() {
        return Err(ChartError::Params {
            kind: ChartKind::LineMulti.as_str(),
            reason: "'ys' must name at least one column".to_string(),
        });
    }

    let x = table.values(&params.x)?;
    let mut figure = Figure::new(&params.title, theme)
        .axes(&params.x, "value")
        .legend("variable");

    for y in &params.ys {
        figure.push(json!({
            "type": "scatter",
            "mode": "lines",
            "name": y,
            "x": x,
            "y": table.values(y)?,
            "line": { "width": 2 }
        }));
    }

    Ok(figure)
}

fn bar_grouped(table: &Table, params: SeriesParams, theme: &Theme) -> Result<Figure, ChartError> {
    let mut figure = Figure::new(&params.title, theme).axes(&params.x, &params.y);
    figure.layout["barmode"] = json!("group");
    if let Some(color) = &params.color {
        figure = figure.legend(color);
    }

    for (name, group) in series(table, params.color.as_deref(), &params.y)? {
        figure.push(json!({
            "type": "bar",
            "name": name,
            "x": group.values(&params.x)?,
            "y": group.values(&params.y)?
        }));
    }

    Ok(figure)
}

fn area_filled(table: &Table, params: SeriesParams, theme: &Theme) -> Result<Figure, ChartError> {
    let mut figure = Figure::new(&params.title, theme).axes(&params.x, &params.y);
    if let Some(color) = &params.color {
        figure = figure.legend(color);
    }

    for (name, group) in series(table, params.color.as_deref(), &params.y)? {
        figure.push(json!({
            "type": "scatter",
            "mode": "lines",
            "stackgroup": "one",
            "name": name,
            "x": group.values(&params.x)?,
            "y": group.values(&params.y)?
        }));
    }

    Ok(figure)
}

fn scatter_trend(
    table: &Table,
    params: ScatterParams,
    theme: &Theme,
) -> Result<Figure, ChartError> {
    let mut figure = Figure::new(&params.title, theme).axes(&params.x, &params.y);
    if let Some(color) = &params.color {
        figure = figure.legend(color);
    }

    let groups = series(table, params.color.as_deref(), &params.y)?;
    for (i, (name, group)) in groups.into_iter().enumerate() {
        let color = theme.colors.get(i % theme.colors.len().max(1));
        figure.push(json!({
            "type": "scatter",
            "mode": "markers",
            "name": name,
            "legendgroup": name,
            "marker": { "color": color },
            "x": group.values(&params.x)?,
            "y": group.values(&params.y)?
        }));

        if !params.trendline {
            continue;
        }

        let xs = group.numbers(&params.x)?;
        let ys = group.numbers(&params.y)?;
        let mut points: Vec<(f64, f64)> = xs
            .into_iter()
            .zip(ys)
            .filter_map(|(x, y)| Some((x?, y?)))
            .collect();

        let Some((slope, intercept)) = least_squares(&points) else {
            debug!("Not enough points for a trend line in '{}'", name);
            continue;
        };

        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let trend_x: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
        let trend_y: Vec<f64> = trend_x.iter().map(|x| slope * x + intercept).collect();

        figure.push(json!({
            "type": "scatter",
            "mode": "lines",
            "name": format!("{} trend", name),
            "legendgroup": name,
            "showlegend": false,
            "line": { "color": color },
            "x": trend_x,
            "y": trend_y
        }));
    }

    Ok(figure)
}

/// Ordinary least-squares fit `y = slope * x + intercept`.
///
/// `None` with fewer than two points or when every `x` is the same.
pub fn least_squares(points: &[(f64, f64)]) -> Option<(f64, f64)> {
    if points.len() < 2 {
        return None;
    }
    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (x, y) in points {
        sxy += (x - mean_x) * (y - mean_y);
        sxx += (x - mean_x) * (x - mean_x);
    }
    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some((slope, mean_y - slope * mean_x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn table(csv: &str) -> Table {
        Table::parse(csv).unwrap()
    }

    #[test]
    fn test_least_squares_exact_fit() {
        let (slope, intercept) = least_squares(&[(1.0, 3.0), (2.0, 5.0), (3.0, 7.0)]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::single(&[(1.0, 1.0)])]
    #[case::vertical(&[(2.0, 1.0), (2.0, 5.0)])]
    fn test_least_squares_degenerate(#[case] points: &[(f64, f64)]) {
        assert_eq!(least_squares(points), None);
    }

    #[test]
    fn test_line_multi_one_trace_per_column() {
        let t = table("year,north,south\n2023,1,2\n2024,3,4\n");
        let params = json!({ "x": "year", "ys": ["north", "south"], "title": "Revenue" });

        let figure = ChartKind::LineMulti
            .build(&t, &params, &Theme::fallback())
            .unwrap();

        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[1]["name"], "south");
        assert_eq!(figure.data[1]["y"], json!([2, 4]));
        assert_eq!(figure.data[0]["line"]["width"], 2);
        assert_eq!(figure.layout["title"]["text"], "Revenue");
    }

    #[test]
    fn test_bar_grouped_splits_by_color() {
        let t = table("quarter,sales,region\nQ1,1,north\nQ1,2,south\nQ2,3,north\n");
        let params = json!({ "x": "quarter", "y": "sales", "color": "region" });

        let figure = ChartKind::BarGrouped
            .build(&t, &params, &Theme::fallback())
            .unwrap();

        assert_eq!(figure.layout["barmode"], "group");
        let names: Vec<_> = figure.data.iter().map(|t| t["name"].clone()).collect();
        assert_eq!(names, vec![json!("north"), json!("south")]);
        assert_eq!(figure.data[0]["x"], json!(["Q1", "Q2"]));
    }

    #[test]
    fn test_area_filled_stacks() {
        let t = table("year,value\n2023,1\n2024,2\n");
        let params = json!({ "x": "year", "y": "value" });

        let figure = ChartKind::AreaFilled
            .build(&t, &params, &Theme::fallback())
            .unwrap();

        assert_eq!(figure.data.len(), 1);
        assert_eq!(figure.data[0]["stackgroup"], "one");
        assert_eq!(figure.data[0]["name"], "value");
    }

    #[test]
    fn test_scatter_trend_adds_fitted_line() {
        let t = table("x,y\n3,7\n1,3\n2,5\n");
        let params = json!({ "x": "x", "y": "y" });

        let figure = ChartKind::ScatterTrend
            .build(&t, &params, &Theme::fallback())
            .unwrap();

        assert_eq!(figure.data.len(), 2);
        assert_eq!(figure.data[1]["mode"], "lines");
        assert_eq!(figure.data[1]["x"], json!([1.0, 2.0, 3.0]));
        assert_eq!(figure.data[1]["y"], json!([3.0, 5.0, 7.0]));
    }

    #[test]
    fn test_scatter_without_trendline() {
        let t = table("x,y\n1,3\n2,5\n");
        let params = json!({ "x": "x", "y": "y", "trendline": false });

        let figure = ChartKind::ScatterTrend
            .build(&t, &params, &Theme::fallback())
            .unwrap();
        assert_eq!(figure.data.len(), 1);
    }

    #[rstest]
    #[case::missing_field(ChartKind::LineMulti, json!({ "x": "year" }), "missing field `ys`")]
    #[case::unknown_field(ChartKind::BarGrouped, json!({ "x": "a", "y": "b", "colour": "c" }), "unknown field `colour`")]
    #[case::no_params(ChartKind::AreaFilled, Value::Null, "missing field `x`")]
    #[case::empty_ys(ChartKind::LineMulti, json!({ "x": "a", "ys": [] }), "at least one column")]
    fn test_invalid_params(#[case] kind: ChartKind, #[case] params: Value, #[case] expected: &str) {
        let t = table("a,b\n1,2\n");
        let err = kind.build(&t, &params, &Theme::fallback()).unwrap_err();
        assert!(matches!(err, ChartError::Params { .. }));
        assert!(
            err.to_string().contains(expected),
            "'{}' should contain '{}'",
            err,
            expected
        );
    }

    #[test]
    fn test_unknown_column_is_data_error() {
        let t = table("a,b\n1,2\n");
        let params = json!({ "x": "a", "y": "missing" });
        let err = ChartKind::AreaFilled
            .build(&t, &params, &Theme::fallback())
            .unwrap_err();
        assert!(matches!(err, ChartError::MissingColumn { .. }));
    }
}
