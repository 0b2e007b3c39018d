mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging, stdout is reserved for the results
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .with_writer(std::io::stderr)
        .init();

    // Parse command line arguments
    let args = Cli::parse();

    if args.print_template {
        let template = serde_json::to_string_pretty(&Config::template())?;
        println!("{}", template);
        return Ok(());
    }

    let config_path = match args.config {
        Some(ref x) => x.clone(),
        None => {
            return Err(errors::CliError::Config {
                reason: "No config file provided, use --config".to_string(),
                path: None,
            });
        }
    };
    let config = Config::from_path(&config_path)?.with_cli_args(&args)?;
    info!("Parsed configuration: {:#?}", config.clone());

    let results = processing::process_inputs(&config.inputs, &config.builder)?;
    let stdout = std::io::stdout();
    processing::print_results(results, args.format, stdout.lock())
}
