//! Chart suggestion
//!
//! Declarative chart spec inferred from a result's shape. Nothing is
//! generated by the model and nothing is executed; renderers decide how to
//! draw a chart spec.

use serde::Serialize;

use crate::warehouse::QueryResult;

/// Column-name fragments that mark a temporal axis
const TEMPORAL_MARKERS: &[&str] = &["TIME", "DATE", "DAY", "HOUR", "WEEK", "MONTH", "YEAR"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

/// Which columns to plot and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    /// Category / time axis column
    pub x: String,
    /// Measure column
    pub y: String,
}

/// Suggest a chart for `result`, if its shape allows one
///
/// `y` is the first column whose non-null values are all numeric (at least
/// one); `x` is the first column that is not numeric in that sense.
pub fn suggest_chart(result: &QueryResult) -> Option<ChartSpec> {
    if result.is_empty() {
        return None;
    }

    let numeric: Vec<bool> = (0..result.columns.len())
        .map(|index| is_numeric_column(result, index))
        .collect();

    let y = numeric.iter().position(|n| *n)?;
    let x = numeric.iter().position(|n| !*n)?;

    let x_name = result.columns[x].clone();
    let kind = if is_temporal(&x_name) {
        ChartKind::Line
    } else {
        ChartKind::Bar
    };

    Some(ChartSpec {
        kind,
        x: x_name,
        y: result.columns[y].clone(),
    })
}

fn is_numeric_column(result: &QueryResult, index: usize) -> bool {
    let mut seen = false;
    for value in result.column_values(index) {
        if value.is_null() {
            continue;
        }
        if !value.is_numeric() {
            return false;
        }
        seen = true;
    }
    seen
}

fn is_temporal(column: &str) -> bool {
    let upper = column.to_ascii_uppercase();
    TEMPORAL_MARKERS.iter().any(|marker| upper.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::Value;

    fn result(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
        QueryResult {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_bar_for_category_and_measure() {
        let r = result(
            &["WAREHOUSE_NAME", "TOTAL_CREDITS"],
            vec![vec![text("A"), Value::Float(1.0)], vec![text("B"), Value::Null]],
        );
        assert_eq!(
            suggest_chart(&r),
            Some(ChartSpec {
                kind: ChartKind::Bar,
                x: "WAREHOUSE_NAME".to_string(),
                y: "TOTAL_CREDITS".to_string(),
            })
        );
    }

    #[test]
    fn test_line_for_temporal_axis() {
        let r = result(
            &["USAGE_DATE", "CREDITS"],
            vec![vec![text("2024-09-01"), Value::Integer(3)]],
        );
        assert_eq!(suggest_chart(&r).unwrap().kind, ChartKind::Line);
    }

    #[test]
    fn test_measure_may_come_first() {
        let r = result(
            &["CREDITS", "START_TIME"],
            vec![vec![Value::Float(2.0), text("2024-09-01 00:00")]],
        );
        let spec = suggest_chart(&r).unwrap();
        assert_eq!(spec.x, "START_TIME");
        assert_eq!(spec.y, "CREDITS");
    }

    #[test]
    fn test_no_chart_without_both_axes() {
        let only_numbers = result(&["A", "B"], vec![vec![Value::Integer(1), Value::Integer(2)]]);
        assert_eq!(suggest_chart(&only_numbers), None);

        let only_text = result(&["A"], vec![vec![text("x")]]);
        assert_eq!(suggest_chart(&only_text), None);

        let all_null = result(&["A", "B"], vec![vec![text("x"), Value::Null]]);
        assert_eq!(suggest_chart(&all_null), None);
    }

    #[test]
    fn test_no_chart_for_empty_result() {
        let r = result(&["A", "B"], vec![]);
        assert_eq!(suggest_chart(&r), None);
    }
}
