// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of a table: the identifier (a country name in the reference dataset)
/// and one value per type column.
///
/// A value is `None` when the cell was a missing-value marker in the source.
#[derive(PartialEq, Debug, Clone)]
pub struct Row {
    pub id: String,
    pub values: Vec<Option<f64>>,
}

/// A loaded dataset.
///
/// The identifier column always comes first in the header. All the other
/// columns are numeric and their names are the labels that can be ranked.
/// The set of labels is whatever the header contains.
#[derive(PartialEq, Debug, Clone)]
pub struct Table {
    pub(crate) id_column: String,
    pub(crate) type_columns: Vec<String>,
    pub(crate) rows: Vec<Row>,
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct RankedRow {
    pub id: String,
    pub value: f64,
}

/// The rows with the largest values for one column, in descending order.
/// Only the identifier and the value of the ranked column are retained.
#[derive(PartialEq, Debug, Clone)]
pub struct RankedSubset {
    pub id_column: String,
    pub column: String,
    pub rows: Vec<RankedRow>,
}

/// The order of the categories along their axis, by value.
///
/// Rankings are always largest first, so [`chart::build_spec`](crate::chart::build_spec)
/// only produces `Descending`.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A single horizontal bar.
#[derive(PartialEq, Debug, Clone)]
pub struct Bar {
    pub category: String,
    pub value: f64,
    /// Fill color, as a `#rrggbb` string.
    pub color: String,
    /// The (field, value) pairs shown when hovering the bar.
    pub tooltip: Vec<(String, String)>,
}

/// Declarative description of a horizontal bar chart.
///
/// This is plain data: it says what to draw, not how. Rendering surfaces
/// translate it into their own primitives.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartSpec {
    /// The field on the category (vertical) axis.
    pub category_field: String,
    /// The field on the value (horizontal) axis.
    pub value_field: String,
    pub value_title: String,
    /// Lower and upper bounds of the value axis.
    pub value_domain: (f64, f64),
    pub category_sort: SortOrder,
    pub bars: Vec<Bar>,
    pub show_legend: bool,
    /// Whether the renderer should allow panning and zooming the value axis.
    pub interactive: bool,
}

/// Errors when building a table or ranking its columns.
#[derive(PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// The header is absent or has no cell.
    MissingHeader,
    /// The header only holds the identifier column.
    NoTypeColumns,
    EmptyColumnName { position: usize },
    DuplicateColumn(String),
    /// A row does not have as many cells as the header.
    /// The row index starts at 1 with the first data row.
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// The column is not one of the type columns of the table.
    UnknownColumn(String),
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::MissingHeader => write!(f, "the table has no header row"),
            RankingErrors::NoTypeColumns => write!(
                f,
                "the header must have an identifier column followed by at least one value column"
            ),
            RankingErrors::EmptyColumnName { position } => {
                write!(f, "the header column at position {} has no name", position)
            }
            RankingErrors::DuplicateColumn(name) => {
                write!(f, "the column {:?} appears more than once in the header", name)
            }
            RankingErrors::RowLength {
                row,
                expected,
                found,
            } => write!(
                f,
                "row {} has {} cells, expected {} (one per header column)",
                row, found, expected
            ),
            RankingErrors::UnknownColumn(name) => {
                write!(f, "unknown column {:?}", name)
            }
        }
    }
}
