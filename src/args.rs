use clap::Parser;

/// Computes team and individual leaderboards from PALMS report exports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The competition configuration in JSON: teams, members, captains and
    /// optional scoring rules. See the manual of palms_scoring for the format.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path, repeatable) A PALMS report to upload (csv, xls or xlsx). The files are
    /// uploaded in order. Setting this option overrides the fileSources of the configuration.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (csv or excel) The type of the input files. By default, it is deduced from the
    /// file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using an Excel file, indicates the name of the worksheet to use. By default
    /// the first worksheet is read.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (file path) The file that keeps the counters between runs. Defaults to
    /// palms_state.json in the output directory of the configuration, if any.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the leaderboards will be written in
    /// JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing leaderboards in JSON format. If provided,
    /// palmsboard checks that the computed output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default total) The category of the individual leaderboard: total, attendance,
    /// late, referrals, visitors, oneToOnes, tyfcb or ceu.
    #[clap(long, value_parser)]
    pub category: Option<String>,

    /// (default 10) The number of members in the individual leaderboard.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (member name, repeatable) Records one late arrival for this member.
    #[clap(long, value_parser)]
    pub mark_late: Vec<String>,

    /// If passed as an argument, all the counters are cleared before uploading.
    #[clap(long, takes_value = false)]
    pub reset: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
