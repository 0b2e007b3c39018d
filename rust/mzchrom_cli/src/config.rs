use mzchrom::BuilderConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::Cli;
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Raw data source files, each a JSON `{"name": ..., "scans": [...]}` document.
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    #[serde(default)]
    pub builder: BuilderConfig,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let config_err = |reason: String| CliError::Config {
            reason,
            path: Some(path.to_path_buf()),
        };
        let file = std::fs::File::open(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| config_err(e.to_string()))
    }

    /// Command line inputs replace the ones of the config file.
    pub fn with_cli_args(mut self, args: &Cli) -> Result<Self, CliError> {
        if !args.input.is_empty() {
            self.inputs = args.input.clone();
        }
        if self.inputs.is_empty() {
            return Err(CliError::Config {
                reason: "No inputs provided, please provide them in either the config file or with the --input flag".to_string(),
                path: None,
            });
        }
        self.builder.validate().map_err(|e| CliError::Config {
            reason: e.to_string(),
            path: None,
        })?;
        Ok(self)
    }

    pub fn template() -> Self {
        Self {
            inputs: vec![PathBuf::from("path/to/raw_data_source.json")],
            builder: BuilderConfig::default(),
        }
    }
}
