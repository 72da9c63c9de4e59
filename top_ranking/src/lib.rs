/*!
Ranking of tabular percentage data.

This crate takes a [`Table`] (one identifier column followed by numeric
columns), picks the rows with the largest values in one column and describes
them as a horizontal bar chart.

```
use top_ranking::{top_n, Row, Table, TOP_N};
use top_ranking::chart::build_spec;
# use top_ranking::RankingErrors;

let header = vec!["Country".to_string(), "INFJ".to_string()];
let table = Table::new(
    &header,
    vec![
        Row { id: "A".to_string(), values: vec![Some(10.0)] },
        Row { id: "B".to_string(), values: vec![Some(90.0)] },
    ],
)?;
let ranked = top_n(&table, "INFJ", TOP_N)?;
assert_eq!(ranked.rows[0].id, "B");

let spec = build_spec(&ranked, "INFJ")?;
assert_eq!(spec.bars.len(), 2);
# Ok::<(), RankingErrors>(())
```

See the [`manual`] for the input format and the output of the `mbtitop`
program.
*/

pub mod chart;
mod config;
pub mod manual;

use log::{debug, info, warn};

use std::collections::HashSet;

pub use crate::config::*;

/// The number of rows kept by the ranking in the `mbtitop` program.
pub const TOP_N: usize = 10;

impl Table {
    /// Builds a table from a header and its data rows.
    ///
    /// The first header entry is the identifier column, the others are the value
    /// columns. Every row must hold one value per value column.
    pub fn new(header: &[String], rows: Vec<Row>) -> Result<Table, RankingErrors> {
        let (id_column, type_columns) = match header {
            [] => return Err(RankingErrors::MissingHeader),
            [_] => return Err(RankingErrors::NoTypeColumns),
            [id, rest @ ..] => (id, rest),
        };

        let mut seen: HashSet<&str> = HashSet::new();
        for (idx, name) in header.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(RankingErrors::EmptyColumnName { position: idx + 1 });
            }
            if !seen.insert(name.as_str()) {
                return Err(RankingErrors::DuplicateColumn(name.clone()));
            }
        }

        let mut ids: HashSet<&str> = HashSet::new();
        for (idx, row) in rows.iter().enumerate() {
            if row.values.len() != type_columns.len() {
                return Err(RankingErrors::RowLength {
                    row: idx + 1,
                    expected: header.len(),
                    found: row.values.len() + 1,
                });
            }
            if !ids.insert(row.id.as_str()) {
                warn!("Table::new: identifier {:?} appears more than once", row.id);
            }
        }

        info!(
            "Table::new: {} rows, identifier column {:?}, {} value columns",
            rows.len(),
            id_column,
            type_columns.len()
        );
        Ok(Table {
            id_column: id_column.clone(),
            type_columns: type_columns.to_vec(),
            rows,
        })
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }

    pub fn type_columns(&self) -> &[String] {
        &self.type_columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The position of a value column in [`Row::values`].
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.type_columns.iter().position(|c| c == name)
    }

    /// A SHA-256 digest of the content of the table, as a hex string.
    ///
    /// Two tables with the same header and the same cells have the same fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut content = String::new();
        content.push_str(&self.id_column);
        for c in self.type_columns.iter() {
            content.push('\u{1f}');
            content.push_str(c);
        }
        for row in self.rows.iter() {
            content.push('\u{1e}');
            content.push_str(&row.id);
            for v in row.values.iter() {
                content.push('\u{1f}');
                if let Some(x) = v {
                    content.push_str(&format!("{:?}", x));
                }
            }
        }
        sha256::digest(content.as_str())
    }
}

/// The labels that can be ranked: all the columns except the identifier, in header order.
pub fn available_types(table: &Table) -> Vec<String> {
    table.type_columns.clone()
}

/// Picks the label to display.
///
/// The previous selection is kept as long as it is still available. Otherwise this
/// falls back to the first choice. Returns `None` only if there is nothing to choose from.
pub fn select_type(choices: &[String], previous: Option<&str>) -> Option<String> {
    match previous {
        Some(p) if choices.iter().any(|c| c == p) => Some(p.to_string()),
        _ => choices.first().cloned(),
    }
}

/// Returns the `n` rows with the largest values in `column`, in descending order.
///
/// Rows with the same value keep their order in the table. Rows with a missing
/// value for this column are never ranked. If the table has fewer than `n`
/// rankable rows, all of them are returned.
///
/// Arguments:
/// * `table` the table to rank. It is not modified.
/// * `column` one of the value columns of the table. The identifier column cannot be ranked.
/// * `n` the maximum number of rows to return
pub fn top_n(table: &Table, column: &str, n: usize) -> Result<RankedSubset, RankingErrors> {
    let col_idx = table
        .column_index(column)
        .ok_or_else(|| RankingErrors::UnknownColumn(column.to_string()))?;

    let mut ranked: Vec<RankedRow> = table
        .rows
        .iter()
        .filter_map(|row| match row.values[col_idx] {
            Some(value) if !value.is_nan() => Some(RankedRow {
                id: row.id.clone(),
                value,
            }),
            _ => {
                debug!("top_n: {:?}: no value for {:?}, skipping", row.id, column);
                None
            }
        })
        .collect();

    // sort_by is stable: equal values keep the table order.
    ranked.sort_by(|a, b| b.value.total_cmp(&a.value));
    ranked.truncate(n);

    debug!("top_n: column {:?}: {:?}", column, ranked);
    Ok(RankedSubset {
        id_column: table.id_column.clone(),
        column: column.to_string(),
        rows: ranked,
    })
}
