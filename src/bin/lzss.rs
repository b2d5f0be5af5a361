//! Command-line front end
//!
//! ```bash
//! lzss notes.txt notes.lzs        # compress
//! lzss -e notes.lzs notes.txt     # expand
//! ```

use std::{
    fs,
    io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use lzss::{CompressError, CompressState, DecompressError};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "lzss")]
#[command(version)]
#[command(about = "LZSS file compressor", long_about = None)]
struct Args {
    /// Expand SOURCE instead of compressing it
    #[arg(short = 'e', long)]
    expand: bool,

    /// File to read
    source: PathBuf,

    /// File to write
    target: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error reading \"{}\": {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("error writing \"{}\": {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Compress(#[from] CompressError),
    #[error(transparent)]
    Expand(#[from] DecompressError),
}

impl CliError {
    fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Compress(_) | CliError::Expand(_) => ExitCode::from(1),
            CliError::Read { .. } => ExitCode::from(2),
            CliError::Write { .. } => ExitCode::from(3),
        }
    }
}

fn read_all(path: &Path) -> Result<Vec<u8>, CliError> {
    fs::read(path).map_err(|source| CliError::Read {
        path: path.to_owned(),
        source,
    })
}

fn write_all(path: &Path, data: &[u8]) -> Result<(), CliError> {
    fs::write(path, data).map_err(|source| CliError::Write {
        path: path.to_owned(),
        source,
    })
}

fn init_logging(log_level: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    // only fails if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn run(args: &Args) -> Result<(), CliError> {
    let inp = read_all(&args.source)?;

    let outp = if args.expand {
        lzss::expand(&inp)?
    } else {
        CompressState::new().compress_to_vec(&inp)?
    };

    let ratio = if inp.is_empty() {
        0.0
    } else {
        outp.len() as f64 / inp.len() as f64
    };
    info!(
        source = %args.source.display(),
        target = %args.target.display(),
        input_len = inp.len(),
        output_len = outp.len(),
        "{} ({:.3})",
        if args.expand { "expanded" } else { "compressed" },
        ratio
    );

    write_all(&args.target, &outp)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("lzss: {e}");
            e.exit_code()
        }
    }
}
