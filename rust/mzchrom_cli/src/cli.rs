use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long, required_unless_present = "print_template")]
    pub config: Option<PathBuf>,

    /// Raw data source JSON files (will over-write the inputs of the config file)
    #[arg(short, long)]
    pub input: Vec<PathBuf>,

    /// The format to print the results in
    #[arg(short, long, default_value_t, value_enum)]
    pub format: OutputFormat,

    /// Print a template configuration file and exit
    #[arg(long)]
    pub print_template: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line per data source
    #[default]
    Summary,
    Json,
    PrettyJson,
}
