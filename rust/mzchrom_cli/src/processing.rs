use crate::cli::OutputFormat;
use crate::errors::CliError;
use indicatif::{
    ParallelProgressIterator,
    ProgressStyle,
};
use mzchrom::{
    BuildOutput,
    BuilderConfig,
    ChromatogramBuilder,
    RawDataSource,
    RunContext,
};
use rayon::prelude::*;
use std::io::Write;
use std::path::{
    Path,
    PathBuf,
};
use tracing::{
    error,
    info,
};

pub fn read_source(path: &Path) -> Result<RawDataSource, CliError> {
    let input_err = |reason: String| CliError::Input {
        path: path.to_path_buf(),
        reason,
    };
    let file = std::fs::File::open(path).map_err(|e| input_err(e.to_string()))?;
    RawDataSource::from_reader(std::io::BufReader::new(file)).map_err(|e| input_err(e.to_string()))
}

/// Builds every input independently and in parallel.
///
/// Results come back in input order.
pub fn process_inputs(
    inputs: &[PathBuf],
    config: &BuilderConfig,
) -> Result<Vec<Result<BuildOutput, CliError>>, CliError> {
    let builder = ChromatogramBuilder::new(config.clone()).map_err(|e| CliError::Config {
        reason: e.to_string(),
        path: None,
    })?;
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    let st = std::time::Instant::now();
    let out: Vec<Result<BuildOutput, CliError>> = inputs
        .par_iter()
        .progress_with_style(style)
        .map(|path| {
            let source = read_source(path)?;
            info!(
                "Loaded {} with {} scans from {}",
                source.name,
                source.scans.len(),
                path.display()
            );
            builder
                .build(&source, &RunContext::new())
                .map_err(|source| CliError::Build {
                    input: path.clone(),
                    source,
                })
        })
        .collect();
    info!("Processed {} inputs in {:?}", inputs.len(), st.elapsed());
    Ok(out)
}

pub fn summary_line(output: &BuildOutput) -> String {
    format!(
        "{}: {} chromatograms from {} scans ({} traces created, {:.2?})",
        output.name,
        output.chromatograms.len(),
        output.stats.scans_selected,
        output.stats.traces_created,
        output.stats.elapsed
    )
}

/// Prints the successful results, logs the failed ones.
///
/// Returns the first failure, if any.
pub fn print_results(
    results: Vec<Result<BuildOutput, CliError>>,
    format: OutputFormat,
    mut out: impl Write,
) -> Result<(), CliError> {
    let mut first_error = None;
    let mut outputs = Vec::with_capacity(results.len());
    for result in results {
        match result {
            Ok(x) => outputs.push(x),
            Err(e) => {
                error!("{}", e);
                first_error.get_or_insert(e);
            }
        }
    }

    match format {
        OutputFormat::Summary => {
            for output in outputs.iter() {
                writeln!(out, "{}", summary_line(output))?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer(&mut out, &outputs)?;
            writeln!(out)?;
        }
        OutputFormat::PrettyJson => {
            serde_json::to_writer_pretty(&mut out, &outputs)?;
            writeln!(out)?;
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
