//! CSV export

use std::path::Path;

use crate::warehouse::QueryResult;

/// Default export file name
pub const DEFAULT_CSV_FILE: &str = "snowflake_data.csv";

fn write_result<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    result: &QueryResult,
) -> Result<(), csv::Error> {
    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row.iter().map(|value| value.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Header plus one record per row; nulls become empty fields
pub fn to_csv_string(result: &QueryResult) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_result(&mut writer, result)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn write_csv_file(path: &Path, result: &QueryResult) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    write_result(&mut writer, result)
}
