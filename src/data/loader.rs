use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{CellValue, Row, Table};

// ---------------------------------------------------------------------------
// Source configuration
// ---------------------------------------------------------------------------

/// Where the signal table comes from. Passed into the loader explicitly;
/// there is no ambient source location.
#[derive(Debug, Clone, Default)]
pub struct SourceConfig {
    /// Path to a `.csv` or `.json` table. `None` selects the built-in
    /// sample dataset.
    pub path: Option<PathBuf>,
}

impl SourceConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        SourceConfig {
            path: Some(path.into()),
        }
    }

    /// Check the source up front so a bad locator fails before any request.
    pub fn validate(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let ext = extension(path);
        if ext != "csv" && ext != "json" {
            bail!("Unsupported file extension: .{ext}");
        }
        if !path.is_file() {
            bail!("source file not found: {}", path.display());
        }
        Ok(())
    }
}

/// Load the signal table described by `config`. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row with column names, one signal per data row
/// * `.json` – `[{ "column": value, ... }, ...]` (records orientation)
pub fn load_source(config: &SourceConfig) -> Result<Table> {
    config.validate()?;
    match &config.path {
        Some(path) => match extension(path).as_str() {
            "csv" => load_csv(path),
            "json" => load_json(path),
            other => bail!("Unsupported file extension: .{other}"),
        },
        None => Ok(builtin_dataset()),
    }
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

// ---------------------------------------------------------------------------
// Built-in sample dataset
// ---------------------------------------------------------------------------

/// The hard-coded fallback table used when no source file is configured.
pub fn builtin_dataset() -> Table {
    let columns: [(&str, [f64; 5]); 6] = [
        ("Time created", [1.0, 2.0, 1.0, 3.0, 1.0]),
        ("Dev bought own token (SOL)", [0.5, 1.2, 0.8, 1.5, 0.2]),
        ("Dev sold %", [100.0, 50.0, 100.0, 90.0, 100.0]),
        ("ATH market cap", [5e7, 2e8, 3e8, 1e8, 4.5e7]),
        ("ROI", [10.0, 8.0, 5.0, 15.0, 20.0]),
        ("X's", [2.0, 5.0, 3.0, 7.0, 10.0]),
    ];

    let column_names: Vec<String> = columns.iter().map(|(c, _)| c.to_string()).collect();
    let rows: Vec<Row> = (0..5)
        .map(|i| {
            columns
                .iter()
                .map(|(c, vals)| {
                    let v = vals[i];
                    let cell = if v.fract() == 0.0 {
                        CellValue::Integer(v as i64)
                    } else {
                        CellValue::Float(v)
                    };
                    (c.to_string(), cell)
                })
                .collect()
        })
        .collect();

    Table::new(column_names, rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening CSV")?;
    read_csv(file)
}

/// Parse CSV from any reader: first record = column headers, every following
/// record one row. Cell types are guessed per field.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: has {} fields, expected {}",
                record.len(),
                headers.len()
            );
        }
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, field)| (col.clone(), CellValue::guess(field)))
            .collect();
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Time created": 1, "Dev sold %": 100.0, "X's": 2 },
///   ...
/// ]
/// ```
///
/// Columns are taken from the first record, in its key order.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut row = Row::new();
        for (key, val) in obj {
            if !column_names.iter().any(|c| c == key) {
                column_names.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(Table::new(column_names, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_dataset_shape() {
        let t = builtin_dataset();
        assert_eq!(t.len(), 5);
        assert_eq!(t.column_names.len(), 6);
        assert!(t.has_column("X's"));
        assert_eq!(t.cell(1, "Dev bought own token (SOL)"), &CellValue::Float(1.2));
        assert_eq!(t.cell(3, "Time created"), &CellValue::Integer(3));
    }

    #[test]
    fn read_csv_headers_then_rows() {
        let input = "Time created,Dev sold %,X's\n1,100,2\n2,50.5,11\n";
        let t = read_csv(input.as_bytes()).unwrap();
        assert_eq!(
            t.column_names,
            vec!["Time created", "Dev sold %", "X's"]
        );
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(1, "Dev sold %"), &CellValue::Float(50.5));
        assert_eq!(t.cell(1, "X's"), &CellValue::Integer(11));
    }

    #[test]
    fn read_csv_rejects_ragged_rows() {
        let input = "a,b\n1,2\n3\n";
        assert!(read_csv(input.as_bytes()).is_err());
    }

    #[test]
    fn validate_rejects_unknown_extension() {
        let cfg = SourceConfig::file("signals.parquet");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn no_path_falls_back_to_builtin() {
        let t = load_source(&SourceConfig::default()).unwrap();
        assert_eq!(t, builtin_dataset());
    }
}
