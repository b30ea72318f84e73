use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

mod utils;

#[derive(Parser, Debug)]
struct Args {
    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Number of points to generate, overrides the config file
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Random seed, overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the report as json instead of text
    #[arg(short, long)]
    json: bool,
}

fn main() -> ExitCode {
    // .env may carry RUST_LOG
    dotenv::dotenv().ok();
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let args = Args::parse();
    debug!("Args: {:?}", args);

    // Load configuration from yaml
    let config = match utils::load_config(&args.config, args.count, args.seed) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Fitting a line to {} generated points", config.generator.count);

    let report = match utils::run_pipeline(&config) {
        Ok(report) => report,
        Err(e) => {
            error!("Fit failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = if args.json {
        match report.to_json() {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to write report: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        report.to_text(config.report.precision)
    };
    println!("{}", output);

    ExitCode::SUCCESS
}
