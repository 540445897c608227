use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common spreadsheet dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for numeric comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Parse a raw text field into the narrowest fitting type.
    pub fn guess(s: &str) -> CellValue {
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Row / Table – the in-memory dataset
// ---------------------------------------------------------------------------

/// One row of the dataset: column name → value.
pub type Row = BTreeMap<String, CellValue>;

/// A rectangular dataset with named columns and ordered rows.
///
/// `column_names` carries the schema in source order; a key missing from a
/// row reads as [`CellValue::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub column_names: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(column_names: Vec<String>, rows: Vec<Row>) -> Self {
        Table { column_names, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column); Null for a missing key.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        self.rows[row].get(column).unwrap_or(&CellValue::Null)
    }

    /// Whether the schema contains the given column.
    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// New table with the rows at `indices`, in the given order, same schema.
    pub fn subset(&self, indices: &[usize]) -> Table {
        Table {
            column_names: self.column_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table restricted to the named columns, keeping their given order.
    /// Unknown names are ignored.
    pub fn select_columns(&self, columns: &[String]) -> Table {
        let kept: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                kept.iter()
                    .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
                    .collect::<Row>()
            })
            .collect();
        Table {
            column_names: kept,
            rows,
        }
    }

    /// Per-column numeric summary (count / mean / min / max), one summary row
    /// per numeric column. Columns without a single numeric value are skipped.
    pub fn describe(&self) -> Table {
        let column_names: Vec<String> = ["column", "count", "mean", "min", "max"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::new();
        for col in &self.column_names {
            let values: Vec<f64> = self
                .rows
                .iter()
                .filter_map(|row| row.get(col).and_then(CellValue::as_f64))
                .collect();
            if values.is_empty() {
                continue;
            }
            let count = values.len();
            let sum: f64 = values.iter().sum();
            let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            let mut row = Row::new();
            row.insert("column".into(), CellValue::Text(col.clone()));
            row.insert("count".into(), CellValue::Integer(count as i64));
            row.insert("mean".into(), CellValue::Float(sum / count as f64));
            row.insert("min".into(), CellValue::Float(min));
            row.insert("max".into(), CellValue::Float(max));
            rows.push(row);
        }

        Table { column_names, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn guess_picks_narrowest_type() {
        assert_eq!(CellValue::guess("42"), CellValue::Integer(42));
        assert_eq!(CellValue::guess("1.5"), CellValue::Float(1.5));
        assert_eq!(CellValue::guess("pump"), CellValue::Text("pump".into()));
        assert_eq!(CellValue::guess(""), CellValue::Null);
    }

    #[test]
    fn subset_preserves_order_and_schema() {
        let t = Table::new(
            vec!["a".into()],
            vec![
                row(&[("a", CellValue::Integer(1))]),
                row(&[("a", CellValue::Integer(2))]),
                row(&[("a", CellValue::Integer(3))]),
            ],
        );
        let s = t.subset(&[2, 0]);
        assert_eq!(s.column_names, t.column_names);
        assert_eq!(s.cell(0, "a"), &CellValue::Integer(3));
        assert_eq!(s.cell(1, "a"), &CellValue::Integer(1));
    }

    #[test]
    fn select_columns_keeps_requested_order_and_drops_unknown() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![row(&[
                ("a", CellValue::Integer(1)),
                ("b", CellValue::Text("x".into())),
            ])],
        );
        let s = t.select_columns(&["b".into(), "missing".into(), "a".into()]);
        assert_eq!(s.column_names, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(s.cell(0, "b"), &CellValue::Text("x".into()));
    }

    #[test]
    fn describe_skips_text_columns() {
        let t = Table::new(
            vec!["name".into(), "v".into()],
            vec![
                row(&[
                    ("name", CellValue::Text("a".into())),
                    ("v", CellValue::Integer(2)),
                ]),
                row(&[
                    ("name", CellValue::Text("b".into())),
                    ("v", CellValue::Integer(4)),
                ]),
            ],
        );
        let d = t.describe();
        assert_eq!(d.len(), 1);
        assert_eq!(d.cell(0, "column"), &CellValue::Text("v".into()));
        assert_eq!(d.cell(0, "mean"), &CellValue::Float(3.0));
        assert_eq!(d.cell(0, "min"), &CellValue::Float(2.0));
        assert_eq!(d.cell(0, "max"), &CellValue::Float(4.0));
    }
}
