//! Presentation helpers for the CLI: tables, CSV, ASCII charts

pub mod chart;
pub mod csv_export;
pub mod table;

pub use chart::render_chart;
pub use csv_export::{to_csv_string, write_csv_file, DEFAULT_CSV_FILE};
pub use table::render_table;
