use clap::Parser;
use puntes::core::config::ConfigStore;
use puntes::tui::{self, Outcome};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "puntes", about = "Browse and read Markdown and PDF notes in the terminal")]
struct Args {
    /// Config file to use instead of <config dir>/gopuntes/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log file (default: <cache dir>/puntes/puntes.log)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Log at debug level instead of info
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let store = match args.config {
        Some(path) => ConfigStore::at(path),
        None => match ConfigStore::default_location() {
            Ok(store) => store,
            Err(e) => {
                log::error!("{}", e);
                eprintln!("puntes: {e}");
                return ExitCode::FAILURE;
            }
        },
    };
    log::info!("Puntes starting up with config at {}", store.path().display());

    match tui::run(store) {
        Ok(Outcome::Quit) => ExitCode::SUCCESS,
        Ok(Outcome::Fatal(error)) => {
            log::error!("Fatal: {}", error);
            eprintln!("puntes: {error}");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("Terminal error: {}", e);
            eprintln!("puntes: terminal error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Log to a file; stdout belongs to the UI. Logging is skipped if the file
/// cannot be created.
fn init_logging(args: &Args) {
    let Some(path) = args.log_file.clone().or_else(default_log_path) else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("puntes").join("puntes.log"))
}
