use clap::Parser;
use simplelog::{ConfigBuilder, WriteLogger};
use splitscreen::core::config::{self, CliOverrides};
use splitscreen::tui;
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "splitscreen", about = "Split-screen console: scrolling log above, prompt below")]
struct Args {
    /// Config file to use instead of ~/.splitscreen/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Idle pause of the display loop, in milliseconds
    #[arg(long)]
    poll_interval_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Nothing can be logged until the log file is known
    let mut warnings = Vec::new();
    let file_config = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: {e}, using defaults");
            warnings.push(format!("{e}, using defaults"));
            config::SplitscreenConfig::default()
        }
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            log_file: args.log_file,
            poll_interval_ms: args.poll_interval_ms,
        },
    );

    // The terminal belongs to the UI, so logs go to a file
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&resolved.log_file) {
        let _ = WriteLogger::init(resolved.log_level, log_config, log_file);
    }

    for warning in warnings.iter().chain(&resolved.warnings) {
        log::warn!("{}", warning);
    }

    log::info!(
        "Splitscreen starting (pid {}, poll interval {:?})",
        std::process::id(),
        resolved.poll_interval
    );

    tui::run(resolved).await
}
