//! Terminal table rendering

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{ContentArrangement, Table};

use crate::warehouse::QueryResult;

/// Render a result as a terminal table
///
/// `max_rows` truncates long results; a footer line reports the cut.
pub fn render_table(result: &QueryResult, max_rows: Option<usize>) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(result.columns.clone());

    let shown = max_rows.unwrap_or(result.rows.len()).min(result.rows.len());
    for row in &result.rows[..shown] {
        table.add_row(row.iter().map(|value| value.to_string()));
    }

    let mut out = table.to_string();
    if shown < result.rows.len() {
        out.push_str(&format!("\n({} of {} rows shown)", shown, result.rows.len()));
    } else if result.rows.is_empty() {
        out.push_str("\n(no rows)");
    }
    out
}
