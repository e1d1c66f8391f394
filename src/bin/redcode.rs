use clap::error::ErrorKind;
use clap::{command, Parser};
use redcode::{Interpreter, RuntimeConfig};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: redcode <filename.red>";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// RedCode program to run
    script: PathBuf,

    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig, String> {
    if !cli.config.exists() {
        return Ok(RuntimeConfig::default());
    }
    let content = std::fs::read_to_string(&cli.config)
        .map_err(|e| format!("Failed to read config file: {}", e))?;
    serde_json::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        Err(_) => {
            println!("{}", USAGE);
            std::process::exit(1);
        }
    };

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if cli.script.extension().and_then(|e| e.to_str()) != Some("red") {
        println!("Error: File must have .red extension");
        std::process::exit(1);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(message) => {
            println!("{}", message);
            std::process::exit(1);
        }
    };
    debug!("config loaded");

    let mut interpreter = Interpreter::new(config);
    if let Err(e) = interpreter.run_file(&cli.script).await {
        println!("{}", e);
        std::process::exit(1);
    }
}
