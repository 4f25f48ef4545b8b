use clap::Parser;

/// Tallies official and shadow roll-call votes from bulk-import files.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The configuration file, listing the import sources and the display options.
    /// See the manual of the vote_tally library for the format.
    #[clap(short, long, value_parser)]
    pub config: String,

    /// (file path) A reference summary in JSON format. If provided, shadowvote will check that
    /// the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified in the configuration.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (default 1) The page of the vote listing to include in the summary.
    #[clap(short, long, value_parser)]
    pub page: Option<u32>,

    /// (default from the configuration, or 0) Number of page links shown on each side of the current page.
    #[clap(long, value_parser)]
    pub on_each_side: Option<u32>,

    /// (default from the configuration, or 10) Number of symbols in the progress bars.
    #[clap(long, value_parser)]
    pub bar_slots: Option<u32>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
