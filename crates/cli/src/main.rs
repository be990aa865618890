use clap::Parser;
use project_scan_cli::args::Args;
use project_scan_cli::config::resolve_config;
use project_scan_cli::presentation;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout carries the report; diagnostics go to stderr
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.behavior.log_level());

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let scanned_at = chrono::Local::now();
    let report = project_scan_engine::scan(&config);

    match presentation::render(
        &config.root,
        &report,
        args.output.format,
        args.output.human,
        scanned_at,
    ) {
        Ok(text) => print!("{text}"),
        Err(e) => {
            eprintln!("Output Error: {e}");
            return ExitCode::FAILURE;
        }
    }

    if let Some(err) = &report.root_error {
        eprintln!("Scan Error: {err}");
        return ExitCode::FAILURE;
    }

    if args.behavior.strict && !report.issues.is_empty() {
        eprintln!(
            "Strict mode: {} file(s) or folder(s) could not be read",
            report.issues.len()
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
