// Primitives for reading CSV files.

use log::debug;
use snafu::prelude::*;

use std::io::Read;

use csv::{Reader, ReaderBuilder, Trim};

use crate::mbti::io_common::{simplify_file_name, ParsedRow, ParsedTable};
use crate::mbti::{BMbtiResult, CsvLineParseSnafu, CsvOpenSnafu};

pub fn read_csv_file(path: &str) -> BMbtiResult<ParsedTable> {
    let rdr = reader_builder()
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    read_records(rdr, &simplify_file_name(path))
}

pub fn read_csv_bytes(content: &[u8], origin: &str) -> BMbtiResult<ParsedTable> {
    read_records(reader_builder().from_reader(content), origin)
}

fn reader_builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    // The header is handled by hand, and ragged rows are reported by the validation.
    builder.has_headers(false).flexible(true).trim(Trim::All);
    builder
}

fn read_records<R: Read>(rdr: Reader<R>, origin: &str) -> BMbtiResult<ParsedTable> {
    let mut records = rdr.into_records();

    let header: Vec<String> = match records.next() {
        Some(line_r) => {
            let line = line_r.context(CsvLineParseSnafu { origin, lineno: 1u64 })?;
            line.iter()
                .enumerate()
                .map(|(idx, s)| {
                    if idx == 0 {
                        s.trim_start_matches('\u{feff}').trim().to_string()
                    } else {
                        s.to_string()
                    }
                })
                .collect()
        }
        None => vec![],
    };
    debug!("read_csv: {}: header: {:?}", origin, header);

    let mut rows: Vec<ParsedRow> = Vec::new();
    for (idx, line_r) in records.enumerate() {
        let lineno = (idx + 2) as u64;
        let line = line_r.context(CsvLineParseSnafu { origin, lineno })?;
        let lineno = line.position().map(|p| p.line()).unwrap_or(lineno);
        rows.push(ParsedRow {
            lineno,
            cells: line.iter().map(|s| s.to_string()).collect(),
        });
    }
    debug!("read_csv: {}: {} rows", origin, rows.len());
    Ok(ParsedTable { header, rows })
}
