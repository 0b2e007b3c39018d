use mzchrom::MzChromError;
use std::path::PathBuf;

#[derive(Debug)]
pub enum CliError {
    /// The run configuration could not be read, parsed or validated.
    Config {
        reason: String,
        path: Option<PathBuf>,
    },
    /// A raw data source file could not be opened or parsed.
    Input { path: PathBuf, reason: String },
    /// Building failed for one input, the others are unaffected.
    Build { input: PathBuf, source: MzChromError },
    /// Results could not be serialized or written to stdout.
    Output(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config {
                reason,
                path: Some(path),
            } => write!(f, "Invalid config {}: {}", path.display(), reason),
            CliError::Config { reason, path: None } => write!(f, "Invalid config: {}", reason),
            CliError::Input { path, reason } => {
                write!(f, "Unable to load raw data from {}: {}", path.display(), reason)
            }
            CliError::Build { input, source } => {
                write!(f, "{}: {}", input.display(), source)
            }
            CliError::Output(reason) => write!(f, "Unable to write results: {}", reason),
        }
    }
}

impl std::error::Error for CliError {}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
