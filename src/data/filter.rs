use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter policy constants
// ---------------------------------------------------------------------------

/// Column holding the return multiplier used for the good/bad cut.
pub const MULTIPLIER_COLUMN: &str = "X's";

/// Signals at or above this multiplier count as "good".
pub const QUALITY_THRESHOLD: f64 = 10.0;

/// Columns the condition form may filter on.
pub const FILTERABLE_COLUMNS: &[&str] =
    &["Time created", "Dev bought own token (SOL)", "Dev sold %"];

/// Upper bound on conditions in a single request.
pub const MAX_CONDITIONS: usize = 5;

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparator {
    Eq,
    Le,
    Ge,
}

impl Comparator {
    pub const ALL: [Comparator; 3] = [Comparator::Eq, Comparator::Le, Comparator::Ge];

    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            // Exact comparison, no epsilon.
            Comparator::Eq => lhs == rhs,
            Comparator::Le => lhs <= rhs,
            Comparator::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Eq => "==",
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

/// One (column, comparator, value) test applied to every row. The value is
/// kept as entered and coerced to a number at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub comparator: Comparator,
    pub value: String,
}

impl FilterCondition {
    pub fn new(column: impl Into<String>, comparator: Comparator, value: impl Into<String>) -> Self {
        FilterCondition {
            column: column.into(),
            comparator,
            value: value.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid value for column {column}: {value}")]
    InvalidValue { column: String, value: String },

    #[error("unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("row {row}: multiplier column is not numeric")]
    Multiplier { row: usize },
}

// ---------------------------------------------------------------------------
// Filter request – one user action over one table snapshot
// ---------------------------------------------------------------------------

/// An ordered, conjunctive list of conditions, built once per user action.
#[derive(Debug, Clone, Default)]
pub struct FilterRequest {
    pub conditions: Vec<FilterCondition>,
}

impl FilterRequest {
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        FilterRequest { conditions }
    }

    /// Apply every condition in order (logical AND), then the quality cut.
    ///
    /// All condition values are validated before any row is tested; a value
    /// that does not parse as a number, or a column missing from the schema,
    /// rejects the whole request and no condition is applied. Row order is
    /// preserved. Pure and deterministic.
    pub fn apply(&self, table: &Table) -> Result<Table, FilterError> {
        let parsed = self.parse_conditions(table)?;

        let indices: Vec<usize> = (0..table.len())
            .filter(|&i| {
                parsed.iter().all(|(column, comparator, rhs)| {
                    match table.cell(i, column).as_f64() {
                        Some(lhs) => comparator.holds(lhs, *rhs),
                        // Non-numeric cell never satisfies a numeric test.
                        None => false,
                    }
                })
            })
            .collect();

        good_signals(&table.subset(&indices))
    }

    fn parse_conditions(&self, table: &Table) -> Result<Vec<(String, Comparator, f64)>, FilterError> {
        self.conditions
            .iter()
            .map(|c| {
                if !table.has_column(&c.column) {
                    return Err(FilterError::UnknownColumn {
                        column: c.column.clone(),
                    });
                }
                let rhs: f64 =
                    c.value
                        .trim()
                        .parse()
                        .map_err(|_| FilterError::InvalidValue {
                            column: c.column.clone(),
                            value: c.value.clone(),
                        })?;
                Ok((c.column.clone(), c.comparator, rhs))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Good / bad signal cut
// ---------------------------------------------------------------------------

fn multiplier(table: &Table, row: usize) -> Result<f64, FilterError> {
    match table.cell(row, MULTIPLIER_COLUMN) {
        CellValue::Text(s) => s.trim().parse().map_err(|_| FilterError::Multiplier { row }),
        other => other.as_f64().ok_or(FilterError::Multiplier { row }),
    }
}

fn split_by_threshold(table: &Table, keep_good: bool) -> Result<Table, FilterError> {
    let mut indices = Vec::new();
    for i in 0..table.len() {
        if (multiplier(table, i)? >= QUALITY_THRESHOLD) == keep_good {
            indices.push(i);
        }
    }
    Ok(table.subset(&indices))
}

/// Rows whose multiplier is at or above the threshold.
pub fn good_signals(table: &Table) -> Result<Table, FilterError> {
    split_by_threshold(table, true)
}

/// Rows whose multiplier is strictly below the threshold. Together with
/// [`good_signals`] this partitions the table: the two sets are disjoint and
/// their union is the input.
pub fn bad_signals(table: &Table) -> Result<Table, FilterError> {
    split_by_threshold(table, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::builtin_dataset;

    // builtin_dataset(): Time created [1,2,1,3,1], Dev sold % [100,50,100,90,100],
    // X's [2,5,3,7,10].

    #[test]
    fn classifier_partitions_sample_table() {
        let t = builtin_dataset();
        let good = good_signals(&t).unwrap();
        let bad = bad_signals(&t).unwrap();

        assert_eq!(good.len(), 1);
        assert_eq!(bad.len(), 4);
        assert_eq!(good.len() + bad.len(), t.len());
        assert_eq!(good.cell(0, MULTIPLIER_COLUMN), &CellValue::Integer(10));
    }

    #[test]
    fn empty_request_is_quality_cut_only() {
        let t = builtin_dataset();
        let out = FilterRequest::default().apply(&t).unwrap();
        assert_eq!(out, good_signals(&t).unwrap());
    }

    #[test]
    fn dev_sold_eq_100_then_cut_leaves_one_row() {
        let t = builtin_dataset();
        let req = FilterRequest::new(vec![FilterCondition::new(
            "Dev sold %",
            Comparator::Eq,
            "100",
        )]);
        // ==100 rows carry multipliers {2,3,10}; only the 10x row passes the cut.
        let out = req.apply(&t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.cell(0, "Dev sold %").as_f64(), Some(100.0));
        assert_eq!(out.cell(0, MULTIPLIER_COLUMN), &CellValue::Integer(10));
    }

    #[test]
    fn time_created_le_2_keeps_only_the_ten_x_row() {
        let t = builtin_dataset();
        let req = FilterRequest::new(vec![FilterCondition::new(
            "Time created",
            Comparator::Le,
            "2",
        )]);
        let out = req.apply(&t).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.cell(0, MULTIPLIER_COLUMN), &CellValue::Integer(10));
    }

    #[test]
    fn conditions_are_conjunctive_and_order_preserving() {
        let t = builtin_dataset();
        let req = FilterRequest::new(vec![
            FilterCondition::new("Time created", Comparator::Ge, "1"),
            FilterCondition::new("Dev sold %", Comparator::Ge, "90"),
        ]);
        let out = req.apply(&t).unwrap();
        // Every survivor satisfies both conditions and the cut.
        let mut last_seen = None;
        for i in 0..out.len() {
            assert!(out.cell(i, "Time created").as_f64().unwrap() >= 1.0);
            assert!(out.cell(i, "Dev sold %").as_f64().unwrap() >= 90.0);
            let m = out.cell(i, MULTIPLIER_COLUMN).as_f64().unwrap();
            assert!(m >= QUALITY_THRESHOLD);
            last_seen = Some(m);
        }
        assert_eq!(last_seen, Some(10.0));
    }

    #[test]
    fn non_numeric_value_rejects_whole_request() {
        let t = builtin_dataset();
        let req = FilterRequest::new(vec![
            FilterCondition::new("Time created", Comparator::Le, "2"),
            FilterCondition::new("Dev sold %", Comparator::Eq, "all of it"),
        ]);
        let err = req.apply(&t).unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue {
                column: "Dev sold %".into(),
                value: "all of it".into(),
            }
        );
    }

    #[test]
    fn unknown_column_is_rejected() {
        let t = builtin_dataset();
        let req = FilterRequest::new(vec![FilterCondition::new(
            "Moon phase",
            Comparator::Ge,
            "1",
        )]);
        assert_eq!(
            req.apply(&t).unwrap_err(),
            FilterError::UnknownColumn {
                column: "Moon phase".into()
            }
        );
    }

    #[test]
    fn unparseable_multiplier_is_surfaced_not_dropped() {
        let mut t = builtin_dataset();
        t.rows[2].insert(
            MULTIPLIER_COLUMN.to_string(),
            CellValue::Text("soon".into()),
        );
        assert_eq!(
            bad_signals(&t).unwrap_err(),
            FilterError::Multiplier { row: 2 }
        );
    }

    #[test]
    fn numeric_text_multiplier_still_parses() {
        let mut t = builtin_dataset();
        t.rows[4].insert(MULTIPLIER_COLUMN.to_string(), CellValue::Text("12".into()));
        assert_eq!(good_signals(&t).unwrap().len(), 1);
    }
}
