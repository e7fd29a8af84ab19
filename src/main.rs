use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use quizdesk::{Config, DEFAULT_TIME_LIMIT, QuizDesk};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding questions.json, users.json and results.txt
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Seconds allowed per question
    #[arg(short, long, default_value_t = DEFAULT_TIME_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    time_limit: u32,
}

fn init_logging(config: &Config) -> std::io::Result<()> {
    fs::create_dir_all(&config.data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quizdesk=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = Config::new(args.data_dir).with_time_limit(args.time_limit);

    if let Err(e) = init_logging(&config) {
        eprintln!("Failed to open log file {}: {}", config.log_path().display(), e);
        std::process::exit(1);
    }

    let desk = match QuizDesk::open(config) {
        Ok(desk) => desk,
        Err(e) => {
            eprintln!("Failed to open quiz data: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = desk.run().await {
        eprintln!("Error running quiz: {}", e);
        std::process::exit(1);
    }
}
