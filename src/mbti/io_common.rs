// Primitives shared by the readers: input types, value parsing and table validation.

use log::{debug, info};
use snafu::prelude::*;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use top_ranking::{RankingErrors, Row, Table};

use crate::mbti::upload::{Upload, UploadPrompt, UPLOAD_MESSAGE};
use crate::mbti::{io_csv, io_excel, BMbtiResult, DataFormatSnafu, MbtiError};

/// The cell contents that stand for a missing value.
const MISSING_VALUES: [&str; 12] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "#N/A", "<NA>", "None",
];

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Xlsx,
}

impl InputType {
    /// The input type implied by the extension of a file, if any.
    pub fn from_path(path: &Path) -> Option<InputType> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "csv" => Some(InputType::Csv),
            "xlsx" => Some(InputType::Xlsx),
            _ => None,
        }
    }
}

impl FromStr for InputType {
    type Err = MbtiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(InputType::Csv),
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            x => Err(MbtiError::UnknownInputType {
                input_type: x.to_string(),
            }),
        }
    }
}

/// Where the dataset of a session comes from when no upload is involved.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataSource {
    pub path: PathBuf,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
}

/// A table as read from a file, before any check.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedTable {
    pub header: Vec<String>,
    pub rows: Vec<ParsedRow>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedRow {
    /// The line in the source, starting at 1 with the header.
    pub lineno: u64,
    pub cells: Vec<String>,
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

pub fn is_missing(content: &str) -> bool {
    MISSING_VALUES.contains(&content.trim())
}

/// Parses the content of a value cell. Missing-value markers give `None`.
pub fn parse_value(
    content: &str,
    origin: &str,
    lineno: u64,
    column: &str,
) -> BMbtiResult<Option<f64>> {
    if is_missing(content) {
        return Ok(None);
    }
    match content.trim().parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(Some(x)),
        _ => Err(Box::new(MbtiError::ParsingNumber {
            origin: origin.to_string(),
            lineno,
            column: column.to_string(),
            content: content.to_string(),
        })),
    }
}

fn data_format(source: RankingErrors, origin: &str) -> Box<MbtiError> {
    Box::new(MbtiError::DataFormat {
        source,
        origin: origin.to_string(),
    })
}

/// Checks the structure of a parsed table and converts its values to numbers.
pub fn validate_table(parsed: ParsedTable, origin: &str) -> BMbtiResult<Table> {
    let header = parsed.header;

    // A header made only of numbers is a data row: the header is missing.
    if header.is_empty()
        || (header.len() > 1 && header[1..].iter().all(|s| s.trim().parse::<f64>().is_ok()))
    {
        return Err(data_format(RankingErrors::MissingHeader, origin));
    }

    let mut rows: Vec<Row> = Vec::with_capacity(parsed.rows.len());
    for (idx, pr) in parsed.rows.into_iter().enumerate() {
        if pr.cells.len() != header.len() {
            return Err(data_format(
                RankingErrors::RowLength {
                    row: idx + 1,
                    expected: header.len(),
                    found: pr.cells.len(),
                },
                origin,
            ));
        }
        let mut cells = pr.cells.into_iter();
        let id = cells.next().unwrap_or_default();
        let mut values: Vec<Option<f64>> = Vec::with_capacity(header.len() - 1);
        for (column, content) in header[1..].iter().zip(cells) {
            values.push(parse_value(&content, origin, pr.lineno, column)?);
        }
        debug!("validate_table: line {}: {:?} {:?}", pr.lineno, id, values);
        rows.push(Row { id, values });
    }

    let table = Table::new(&header, rows).context(DataFormatSnafu { origin })?;
    Ok(table)
}

/// Loads the table of a session.
///
/// The file of the data source is read if it exists. Otherwise the prompt is asked for
/// an upload. Returns `None` if there is no file and nothing was uploaded.
pub fn load_table(
    source: &DataSource,
    prompt: &mut dyn UploadPrompt,
) -> BMbtiResult<Option<Table>> {
    if source.path.is_file() {
        let path = source.path.display().to_string();
        info!("Attempting to read data file {:?}", path);
        let parsed = match source.input_type {
            InputType::Csv => io_csv::read_csv_file(&path)?,
            InputType::Xlsx => {
                io_excel::read_excel_file(&path, source.excel_worksheet_name.as_deref())?
            }
        };
        return validate_table(parsed, &simplify_file_name(&path)).map(Some);
    }

    info!(
        "No data file at {:?}, asking for an upload",
        source.path.display()
    );
    match prompt.request(UPLOAD_MESSAGE)? {
        Some(upload) => read_upload(&upload, source).map(Some),
        None => {
            info!("No file was uploaded");
            Ok(None)
        }
    }
}

/// Reads an uploaded file. The format follows the extension of its name.
pub fn read_upload(upload: &Upload, source: &DataSource) -> BMbtiResult<Table> {
    info!(
        "Reading upload {:?} ({} bytes)",
        upload.name,
        upload.content.len()
    );
    let name_p = Path::new(upload.name.as_str());
    let parsed = match (name_p.extension(), InputType::from_path(name_p)) {
        (None, _) | (_, Some(InputType::Csv)) => {
            io_csv::read_csv_bytes(&upload.content, &upload.name)?
        }
        (_, Some(InputType::Xlsx)) => io_excel::read_excel_bytes(
            &upload.content,
            &upload.name,
            source.excel_worksheet_name.as_deref(),
        )?,
        (Some(_), None) => {
            return Err(Box::new(MbtiError::UnsupportedUpload {
                name: upload.name.clone(),
            }));
        }
    };
    validate_table(parsed, &upload.name)
}
