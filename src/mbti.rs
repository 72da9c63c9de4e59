use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{self, BufRead};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use top_ranking::RankingErrors;

use crate::args::Args;
use crate::mbti::config_reader::*;
use crate::mbti::session::*;
use crate::mbti::upload::*;
use crate::mbti::vega::chart_spec_to_json;

pub mod config_reader;
pub mod io_common;
mod io_csv;
mod io_excel;
pub mod session;
pub mod upload;
pub mod vega;

/// The dataset read when nothing else is specified.
pub const DEFAULT_PATH: &str = "countriesMBTI_16types.csv";

pub const DEFAULT_TITLE: &str = "Top 10 countries by share of an MBTI type";

/// Shown instead of a chart when there is no data.
pub const NO_DATA_MESSAGE: &str = "No default CSV file was found. Upload a CSV file to continue.";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MbtiError {
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Malformed CSV data in {origin} at line {lineno}"))]
    CsvLineParse {
        source: csv::Error,
        origin: String,
        lineno: u64,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet {worksheet:?} in Excel file {path}"))]
    MissingWorksheet {
        path: String,
        worksheet: Option<String>,
    },
    #[snafu(display("Unexpected cell in {origin} at line {lineno}: {content}"))]
    ExcelWrongCellType {
        origin: String,
        lineno: u64,
        content: String,
    },
    #[snafu(display("Invalid value {content:?} for column {column:?} in {origin} at line {lineno}: expected a number"))]
    ParsingNumber {
        origin: String,
        lineno: u64,
        column: String,
        content: String,
    },
    #[snafu(display("The data in {origin} is not a well-formed table: {source}"))]
    DataFormat {
        source: RankingErrors,
        origin: String,
    },
    #[snafu(display("Cannot rank by {name:?}: {source}"))]
    UnknownType { source: RankingErrors, name: String },
    #[snafu(display("Unsupported upload {name:?}: only .csv and .xlsx files are accepted"))]
    UnsupportedUpload { name: String },
    #[snafu(display("Unknown input type {input_type:?}: expected csv or xlsx"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Error reading upload {name}"))]
    ReadingUpload { source: io::Error, name: String },
    #[snafu(display("Error reading the standard input"))]
    ReadingStdin { source: io::Error },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson { source: io::Error, path: String },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing the chart to {path}"))]
    WritingOutput { source: io::Error, path: String },
    #[snafu(display("Difference detected between the generated chart and the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type MbtiResult<T> = Result<T, MbtiError>;
pub type BMbtiResult<T> = Result<T, Box<MbtiError>>;

/// Runs one session: loads the data, prints the chart for the selected type and,
/// in interactive mode, one more chart per line read on the standard input.
pub fn run(args: &Args) -> BMbtiResult<()> {
    let config = match &args.config {
        Some(p) => Some(read_config(p)?),
        None => None,
    };
    let settings = resolve_settings(args, config.as_ref())?;
    info!("run: settings: {:?}", settings);

    let mut session = Session::new(settings.source.clone());
    let stdin = io::stdin();
    let mut input = stdin.lock();

    // The reference only applies to the first screen.
    let mut reference = args.reference.as_deref();
    run_session(
        &mut session,
        &mut input,
        args.upload,
        args.interactive,
        settings.mbti_type.as_deref(),
        |s| emit(s, &settings, reference.take()),
    )
}

/// Drives a session over some input: the first screen, then, in interactive mode, one
/// screen per line of input.
///
/// While there is no data, each line is the path of a file to upload. Once there is a
/// chart, each line is a personality type. An empty line or the end of the input stops.
fn run_session(
    session: &mut Session,
    input: &mut dyn BufRead,
    upload: bool,
    interactive: bool,
    initial_choice: Option<&str>,
    mut show: impl FnMut(&Session) -> BMbtiResult<()>,
) -> BMbtiResult<()> {
    interact_once(session, input, upload, initial_choice)?;
    show(session)?;

    if !interactive {
        return Ok(());
    }

    loop {
        let choice: Option<String> = match session.screen() {
            Screen::NoData { .. } => {
                if !upload {
                    debug!("run_session: no data and no upload offered");
                    return Ok(());
                }
                if input.fill_buf().context(ReadingStdinSnafu {})?.is_empty() {
                    debug!("run_session: end of input without data");
                    return Ok(());
                }
                // The upload prompt reads the next line.
                None
            }
            Screen::Chart {
                choices, selected, ..
            } => {
                eprintln!(
                    "Personality type ({}) [current: {}], empty to stop:",
                    choices.join(", "),
                    selected
                );
                let mut line = String::new();
                let num_read = input.read_line(&mut line).context(ReadingStdinSnafu {})?;
                let choice = line.trim();
                if num_read == 0 || choice.is_empty() {
                    debug!("run_session: end of the interactive session");
                    return Ok(());
                }
                Some(choice.to_string())
            }
        };
        match interact_once(session, input, upload, choice.as_deref()) {
            Ok(()) => show(session)?,
            Err(e) => {
                // The previous screen stays current.
                warn!("run_session: interaction failed: {:?}", e);
                eprintln!("Error: {}", e);
            }
        }
    }
}

fn interact_once(
    session: &mut Session,
    input: &mut dyn BufRead,
    upload: bool,
    choice: Option<&str>,
) -> BMbtiResult<()> {
    if upload {
        session.interact(&mut PathPrompt::new(input), choice)?;
    } else {
        session.interact(&mut NoUpload, choice)?;
    }
    Ok(())
}

/// Writes the current screen of the session: the chart, or the no-data message.
fn emit(session: &Session, settings: &RunSettings, reference: Option<&str>) -> BMbtiResult<()> {
    let spec = match session.screen() {
        Screen::NoData { message } => {
            println!("{}", message);
            return Ok(());
        }
        Screen::Chart { spec, .. } => spec,
    };
    debug!(
        "emit: {:?} over {:?} rows",
        session.selected(),
        session.table().map(|t| t.len())
    );

    let js = chart_spec_to_json(spec, &settings.title, session.fingerprint());
    let pretty_js = serde_json::to_string_pretty(&js).context(ParsingJsonSnafu {})?;
    write_output(&pretty_js, settings.out.as_deref())?;

    // The reference chart, if provided for comparison
    if let Some(reference_p) = reference {
        check_reference(&pretty_js, reference_p)?;
    }
    Ok(())
}

fn write_output(content: &str, out: Option<&str>) -> BMbtiResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", content);
        }
        Some(path) => {
            info!("Writing chart to {:?}", path);
            fs::write(path, content).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(pretty_js: &str, reference_p: &str) -> BMbtiResult<()> {
    let reference: JSValue = read_reference(reference_p)?;
    let pretty_js_ref = serde_json::to_string_pretty(&reference).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference chart");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        return Err(Box::new(MbtiError::ReferenceMismatch {
            path: reference_p.to_string(),
        }));
    }
    info!("The chart matches the reference {:?}", reference_p);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::io_common::{DataSource, InputType};
    use super::*;
    use std::path::PathBuf;
    use top_ranking::chart::build_spec;
    use top_ranking::{top_n, TOP_N};

    fn sample_path() -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "tests", "countries_sample.csv"]
            .iter()
            .collect()
    }

    fn sample_session() -> Session {
        Session::new(DataSource {
            path: sample_path(),
            input_type: InputType::Csv,
            excel_worksheet_name: None,
        })
    }

    #[test]
    fn sample_dataset_top_ten() {
        let _ = env_logger::try_init();
        let mut session = sample_session();
        let screen = session.interact(&mut NoUpload, Some("INFJ")).unwrap();
        let spec = match screen {
            Screen::Chart { spec, selected, .. } => {
                assert_eq!(selected, "INFJ");
                spec.clone()
            }
            Screen::NoData { .. } => panic!("expected a chart"),
        };
        assert_eq!(spec.bars.len(), TOP_N);
        let values: Vec<f64> = spec.bars.iter().map(|b| b.value).collect();
        let mut sorted = values.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        assert_eq!(values, sorted);
        assert_eq!(spec.value_domain, (0.0, values[0] * 1.1));
    }

    #[test]
    fn sample_dataset_has_sixteen_types() {
        let mut session = sample_session();
        match session.interact(&mut NoUpload, None).unwrap() {
            Screen::Chart {
                choices, selected, ..
            } => {
                assert_eq!(choices.len(), 16);
                assert_eq!(selected, &choices[0]);
            }
            Screen::NoData { .. } => panic!("expected a chart"),
        }
    }

    #[test]
    fn reference_comparison() {
        let mut session = sample_session();
        session.interact(&mut NoUpload, Some("ESTP")).unwrap();
        let table = session.table().unwrap();
        let ranked = top_n(table, "ESTP", TOP_N).unwrap();
        let spec = build_spec(&ranked, "ESTP").unwrap();
        let js = chart_spec_to_json(&spec, DEFAULT_TITLE, session.fingerprint());
        let pretty_js = serde_json::to_string_pretty(&js).unwrap();

        let p = std::env::temp_dir().join(format!("mbtitop-reference-{}.json", std::process::id()));
        fs::write(&p, &pretty_js).unwrap();
        let p_s = p.display().to_string();
        assert!(check_reference(&pretty_js, &p_s).is_ok());

        let other = pretty_js.replace("ESTP", "ISTP");
        match check_reference(&other, &p_s) {
            Err(e) => assert!(matches!(*e, MbtiError::ReferenceMismatch { .. })),
            Ok(_) => panic!("expected a mismatch"),
        }
        let _ = fs::remove_file(&p);
    }

    fn missing_source() -> DataSource {
        DataSource {
            path: std::env::temp_dir().join(format!(
                "mbtitop-run-missing-{}.csv",
                std::process::id()
            )),
            input_type: InputType::Csv,
            excel_worksheet_name: None,
        }
    }

    /// Runs an interactive session over the given input and returns the screens shown.
    fn screens(session: &mut Session, input: &str, upload: bool) -> Vec<Screen> {
        let mut input: &[u8] = input.as_bytes();
        let mut shown: Vec<Screen> = Vec::new();
        run_session(session, &mut input, upload, true, None, |s| {
            shown.push(s.screen().clone());
            Ok(())
        })
        .unwrap();
        shown
    }

    fn selected_of(screen: &Screen) -> Option<&str> {
        match screen {
            Screen::Chart { selected, .. } => Some(selected.as_str()),
            Screen::NoData { .. } => None,
        }
    }

    #[test]
    fn upload_after_no_data() {
        let mut session = Session::new(missing_source());
        let input = format!("\n{}\nENFP\n", sample_path().display());
        let shown = screens(&mut session, &input, true);
        let selected: Vec<Option<&str>> = shown.iter().map(selected_of).collect();
        // No upload, then the uploaded file with the first type, then the chosen type.
        assert_eq!(selected, vec![None, Some("ESTJ"), Some("ENFP")]);
        assert!(session.table().is_some());
    }

    #[test]
    fn skipped_uploads_until_end_of_input() {
        let mut session = Session::new(missing_source());
        let shown = screens(&mut session, "\n\n", true);
        assert_eq!(shown.len(), 2);
        assert!(shown
            .iter()
            .all(|s| matches!(s, Screen::NoData { .. })));
    }

    #[test]
    fn no_data_without_upload_stops() {
        let mut session = Session::new(missing_source());
        let shown = screens(&mut session, "ENFP\n", false);
        assert_eq!(shown.len(), 1);
        assert!(matches!(shown[0], Screen::NoData { .. }));
    }

    #[test]
    fn interactive_choices_keep_the_last_good_chart() {
        let mut session = sample_session();
        let shown = screens(&mut session, "INFJ\nXXXX\nISTP\n\nENFP\n", false);
        let selected: Vec<Option<&str>> = shown.iter().map(selected_of).collect();
        // XXXX fails and shows nothing; the empty line stops before ENFP.
        assert_eq!(selected, vec![Some("ESTJ"), Some("INFJ"), Some("ISTP")]);
        assert_eq!(session.selected(), Some("ISTP"));
    }
}
