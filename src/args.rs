use clap::Parser;

/// Shows the countries with the largest share of a personality type, as a bar chart.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. See the manual of the top_ranking crate
    /// for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default countriesMBTI_16types.csv) The dataset to read. Setting this option overrides
    /// the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use (default: the first one).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (column name, optional) The personality type to rank. Defaults to the first type column
    /// of the dataset.
    #[clap(short = 't', long, value_parser)]
    pub mbti_type: Option<String>,

    /// (file path, 'stdout' or empty) Where the chart will be written, in Vega-Lite JSON format.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference chart in JSON format. If provided, mbtitop will
    /// check that the generated chart matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// If the dataset file does not exist, asks on the standard input for a file to use instead.
    #[clap(long, takes_value = false)]
    pub upload: bool,

    /// After the first chart, reads one personality type per line on the standard input
    /// and prints the chart for each of them.
    #[clap(long, takes_value = false)]
    pub interactive: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn help_names_the_log_stream() {
        let mut buf: Vec<u8> = Vec::new();
        Args::command()
            .term_width(0)
            .write_long_help(&mut buf)
            .unwrap();
        let help = String::from_utf8(buf).unwrap();
        assert!(help.contains("verbose logging to the standard error"));
    }
}
