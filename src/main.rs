use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use promptpad::core::config::{self, CliOverrides};
use promptpad::core::params::Model;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "promptpad", about = "Terminal chat prototype with a simulated model")]
struct Args {
    /// Model to start with
    #[arg(short, long, value_enum)]
    model: Option<Model>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long)]
    temperature: Option<f32>,

    /// Maximum response tokens (100 - 2000)
    #[arg(long)]
    max_tokens: Option<u32>,

    /// Simulated response delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Directory for chat-export.json
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        Self {
            model: args.model,
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            delay_ms: args.delay_ms,
            export_dir: args.export_dir,
        }
    }
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to promptpad.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("promptpad.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let resolved = config::resolve(&file_config, &args.into());

    log::info!(
        "promptpad starting: model={}, temperature={:.1}, max_tokens={}, delay={:?}",
        resolved.model.slug(),
        resolved.parameters.temperature(),
        resolved.parameters.max_tokens(),
        resolved.response_delay
    );

    promptpad::tui::run(resolved)
}
