use log::debug;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

use crate::args::Args;
use crate::mbti::io_common::{DataSource, InputType};
use crate::mbti::{
    BMbtiResult, OpeningJsonSnafu, ParsingJsonSnafu, DEFAULT_PATH, DEFAULT_TITLE,
};

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub title: Option<String>,
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSourceSettings {
    /// csv or xlsx
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionSettings {
    #[serde(rename = "mbtiType")]
    pub mbti_type: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct MbtiConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSource", default)]
    pub data_source: DataSourceSettings,
    #[serde(default)]
    pub selection: SelectionSettings,
    /// The directory of the configuration file, to resolve relative paths.
    #[serde(skip)]
    pub root_dir: Option<PathBuf>,
}

/// The settings of a run, once the configuration file and the command line are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub source: DataSource,
    pub title: String,
    pub mbti_type: Option<String>,
    pub out: Option<String>,
}

pub fn read_config(path: &str) -> BMbtiResult<MbtiConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let mut config = parse_config(&contents)?;
    config.root_dir = Path::new(path).parent().map(|p| p.to_path_buf());
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn parse_config(contents: &str) -> BMbtiResult<MbtiConfig> {
    let config: MbtiConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Reads a chart in JSON format, to compare it with a generated one.
pub fn read_reference(path: &str) -> BMbtiResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Merges the configuration file (if any) and the command line. The command line wins.
pub fn resolve_settings(args: &Args, config: Option<&MbtiConfig>) -> BMbtiResult<RunSettings> {
    let default_config = MbtiConfig::default();
    let config = config.unwrap_or(&default_config);

    let path: PathBuf = match (&args.input, &config.data_source.file_path) {
        (Some(p), _) => PathBuf::from(p),
        (None, Some(p)) => match &config.root_dir {
            Some(root) if Path::new(p).is_relative() => root.join(p),
            _ => PathBuf::from(p),
        },
        (None, None) => PathBuf::from(DEFAULT_PATH),
    };

    let input_type = match args
        .input_type
        .as_ref()
        .or(config.data_source.provider.as_ref())
    {
        Some(s) => s.parse::<InputType>()?,
        None => InputType::from_path(&path).unwrap_or(InputType::Csv),
    };

    Ok(RunSettings {
        source: DataSource {
            path,
            input_type,
            excel_worksheet_name: args
                .excel_worksheet_name
                .clone()
                .or_else(|| config.data_source.excel_worksheet_name.clone()),
        },
        title: config
            .output_settings
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        mbti_type: args
            .mbti_type
            .clone()
            .or_else(|| config.selection.mbti_type.clone()),
        out: args
            .out
            .clone()
            .or_else(|| config.output_settings.output_path.clone()),
    })
}
