use log::debug;
use snafu::prelude::*;

use std::io::{Cursor, Read, Seek};

use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::mbti::io_common::{simplify_file_name, ParsedRow, ParsedTable};
use crate::mbti::{BMbtiResult, MbtiError, MissingWorksheetSnafu, OpeningExcelSnafu};

pub fn read_excel_file(path: &str, worksheet: Option<&str>) -> BMbtiResult<ParsedTable> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    read_workbook(&mut workbook, worksheet, &simplify_file_name(path))
}

pub fn read_excel_bytes(
    content: &[u8],
    origin: &str,
    worksheet: Option<&str>,
) -> BMbtiResult<ParsedTable> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(content.to_vec())).context(OpeningExcelSnafu { path: origin })?;
    read_workbook(&mut workbook, worksheet, origin)
}

fn read_workbook<RS: Read + Seek>(
    workbook: &mut Xlsx<RS>,
    worksheet: Option<&str>,
    origin: &str,
) -> BMbtiResult<ParsedTable> {
    let wrange = match worksheet {
        Some(name) => workbook.worksheet_range(name),
        None => workbook.worksheet_range_at(0),
    }
    .context(MissingWorksheetSnafu {
        path: origin,
        worksheet: worksheet.map(|s| s.to_string()),
    })?
    .context(OpeningExcelSnafu { path: origin })?;

    let mut iter = wrange.rows();

    let mut header: Vec<String> = match iter.next() {
        Some(cells) => cells
            .iter()
            .map(|c| read_cell(c, origin, 1))
            .collect::<BMbtiResult<Vec<String>>>()?,
        None => vec![],
    };
    // The range of a sheet may be wider than the table.
    while header.last().map(|s| s.is_empty()).unwrap_or(false) {
        header.pop();
    }
    debug!("read_excel_file: {}: header: {:?}", origin, header);

    let mut rows: Vec<ParsedRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        let lineno = (idx + 2) as u64;
        let mut cells: Vec<String> = row
            .iter()
            .map(|c| read_cell(c, origin, lineno))
            .collect::<BMbtiResult<Vec<String>>>()?;
        while cells.len() > header.len() && cells.last().map(|s| s.is_empty()).unwrap_or(false) {
            cells.pop();
        }
        if cells.iter().all(|s| s.is_empty()) {
            debug!("read_excel_file: {}: skipping empty line {}", origin, lineno);
            continue;
        }
        rows.push(ParsedRow { lineno, cells });
    }
    Ok(ParsedTable { header, rows })
}

fn read_cell(cell: &DataType, origin: &str, lineno: u64) -> BMbtiResult<String> {
    match cell {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        // Formula errors such as #N/A read as missing values.
        DataType::Empty | DataType::Error(_) => Ok("".to_string()),
        _ => Err(Box::new(MbtiError::ExcelWrongCellType {
            origin: origin.to_string(),
            lineno,
            content: format!("{:?}", cell),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::CellErrorType;

    #[test]
    fn cells_as_text() {
        assert_eq!(
            read_cell(&DataType::String(" Chile ".to_string()), "t.xlsx", 2).unwrap(),
            "Chile"
        );
        assert_eq!(read_cell(&DataType::Float(0.0425), "t.xlsx", 2).unwrap(), "0.0425");
        assert_eq!(read_cell(&DataType::Int(3), "t.xlsx", 2).unwrap(), "3");
        assert_eq!(read_cell(&DataType::Empty, "t.xlsx", 2).unwrap(), "");
        assert_eq!(
            read_cell(&DataType::Error(CellErrorType::NA), "t.xlsx", 2).unwrap(),
            ""
        );
        match read_cell(&DataType::Bool(true), "t.xlsx", 4) {
            Err(e) => assert!(matches!(
                *e,
                MbtiError::ExcelWrongCellType { lineno: 4, .. }
            )),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn not_a_workbook() {
        match read_excel_bytes(b"Country,X\nA,1\n", "fake.xlsx", None) {
            Err(e) => assert!(matches!(*e, MbtiError::OpeningExcel { .. })),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn missing_file() {
        assert!(read_excel_file("/nonexistent/mbtitop/data.xlsx", None).is_err());
    }

    fn sample_path() -> String {
        [env!("CARGO_MANIFEST_DIR"), "tests", "countries_sample.xlsx"]
            .iter()
            .collect::<std::path::PathBuf>()
            .display()
            .to_string()
    }

    fn cells(parsed: &ParsedTable) -> Vec<(u64, Vec<&str>)> {
        parsed
            .rows
            .iter()
            .map(|r| (r.lineno, r.cells.iter().map(|c| c.as_str()).collect()))
            .collect()
    }

    #[test]
    fn first_worksheet_by_default() {
        let _ = env_logger::try_init();
        let parsed = read_excel_file(&sample_path(), None).unwrap();
        // The trailing blank column and the blank line 3 are dropped.
        assert_eq!(parsed.header, vec!["Country", "INFJ", "ENFP"]);
        assert_eq!(
            cells(&parsed),
            vec![
                (2, vec!["Chile", "2.5", "10"]),
                (4, vec!["Peru", "4", ""]),
                (5, vec!["Spain", "1.25", "3"]),
            ]
        );
    }

    #[test]
    fn named_worksheet() {
        let parsed = read_excel_file(&sample_path(), Some("Notes")).unwrap();
        assert_eq!(parsed.header, vec!["Country", "ISTJ"]);
        assert_eq!(cells(&parsed), vec![(2, vec!["Japan", "12"])]);
    }

    #[test]
    fn absent_worksheet() {
        match read_excel_file(&sample_path(), Some("Summary")) {
            Err(e) => match *e {
                MbtiError::MissingWorksheet { worksheet, .. } => {
                    assert_eq!(worksheet, Some("Summary".to_string()))
                }
                other => panic!("unexpected error {:?}", other),
            },
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn uploaded_workbook() {
        let content = std::fs::read(sample_path()).unwrap();
        let from_bytes = read_excel_bytes(&content, "countries_sample.xlsx", None).unwrap();
        let from_file = read_excel_file(&sample_path(), None).unwrap();
        assert_eq!(from_bytes, from_file);

        let notes = read_excel_bytes(&content, "countries_sample.xlsx", Some("Notes")).unwrap();
        assert_eq!(notes.header, vec!["Country", "ISTJ"]);
    }
}
