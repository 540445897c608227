use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use super::model::Table;

// ---------------------------------------------------------------------------
// CSV export
// ---------------------------------------------------------------------------

/// Serialize a table to CSV text, header row included, rows in table order.
pub fn write_csv(table: &Table) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&table.column_names)
        .context("writing CSV header")?;

    for i in 0..table.len() {
        let record: Vec<String> = table
            .column_names
            .iter()
            .map(|col| table.cell(i, col).to_string())
            .collect();
        writer
            .write_record(&record)
            .with_context(|| format!("writing CSV row {i}"))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV writer: {e}"))?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Write a table to a file at `path`.
pub fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let text = write_csv(table)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

/// Default export file name: `<kind>_<YYYYMMDD>_<HHMMSS>.csv`, local time.
pub fn export_file_name(kind: &str) -> String {
    format!("{kind}_{}.csv", Local::now().format("%Y%m%d_%H%M%S"))
}
