//! ASCII chart rendering for a [`ChartSpec`]

use crate::chart::{ChartKind, ChartSpec};
use crate::warehouse::QueryResult;

/// Rows drawn at most
pub const MAX_CHART_ROWS: usize = 20;

const BAR_WIDTH: usize = 40;

/// Draw a chart spec as horizontal bars, one per row (row order kept)
///
/// Returns `None` when the chart columns are not in the result.
pub fn render_chart(spec: &ChartSpec, result: &QueryResult) -> Option<String> {
    let x = result.columns.iter().position(|c| *c == spec.x)?;
    let y = result.columns.iter().position(|c| *c == spec.y)?;

    let points: Vec<(String, f64)> = result
        .rows
        .iter()
        .take(MAX_CHART_ROWS)
        .filter_map(|row| {
            let value = row.get(y)?.as_f64()?;
            Some((row.get(x).map(|v| v.to_string()).unwrap_or_default(), value))
        })
        .collect();
    if points.is_empty() {
        return None;
    }

    let max = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let title = match spec.kind {
        ChartKind::Bar => format!("{} by {}", spec.y, spec.x),
        ChartKind::Line => format!("{} over {}", spec.y, spec.x),
    };
    let mut out = title;
    for (label, value) in &points {
        let len = if max > 0.0 && *value > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        out.push_str(&format!(
            "\n{:<width$} | {} {}",
            label,
            "#".repeat(len),
            value,
            width = label_width
        ));
    }
    Some(out)
}
