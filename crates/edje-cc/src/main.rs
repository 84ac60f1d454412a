//! `edje_cc` entrypoint: argument parsing, logging setup, and the
//! compile pipeline. All real work lives in the library crates; this
//! binary only wires them together and owns the exit-code contract.

use clap::Parser;
use edje_compile::CompileOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const PROG: &str = "edje_cc";

/// Theme compiler: turns a declarative .edc description into a binary
/// .edj artifact.
#[derive(Parser, Debug)]
#[command(name = PROG, version, about = "Edje theme compiler")]
struct Args {
    /// Input theme source (.edc).
    pub input: PathBuf,
    /// Output artifact path (defaults to the input with a .edj extension).
    #[arg(value_name = "OUTPUT", conflicts_with = "output_flag")]
    pub output_pos: Option<PathBuf>,
    /// Output artifact path; flag spelling of the positional OUTPUT.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_flag: Option<PathBuf>,
    /// Directory to search for image files; repeatable, searched in order.
    #[arg(long = "image-dir", value_name = "DIR")]
    pub image_dirs: Vec<PathBuf>,
    /// Directory to search for font files; repeatable, searched in order.
    #[arg(long = "font-dir", value_name = "DIR")]
    pub font_dirs: Vec<PathBuf>,
    /// Directory to search for data files; repeatable, searched in order.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dirs: Vec<PathBuf>,
    /// Configuration file (overrides discovery of `edje_cc.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Do not embed the regenerated canonical source.
    #[arg(long = "no-sources")]
    pub no_sources: bool,
    /// Write a debug log to this file.
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// The two output spellings are mutually exclusive (clap enforces it);
    /// whichever was given wins, else the input path with `.edj`.
    fn output(&self) -> PathBuf {
        self.output_flag
            .clone()
            .or_else(|| self.output_pos.clone())
            .unwrap_or_else(|| self.input.with_extension("edj"))
    }
}

fn init_logging(args: &Args) -> Option<WorkerGuard> {
    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if let Some(log_file) = &args.log_file {
        let dir = log_file.parent().unwrap_or_else(|| std::path::Path::new("."));
        let name = log_file
            .file_name()
            .unwrap_or_else(|| std::ffi::OsStr::new("edje_cc.log"));
        let appender = tracing_appender::rolling::never(dir, name);
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .init();
        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        None
    }
}

fn run(args: &Args) -> Result<PathBuf, String> {
    let output = args.output();
    let paths = edje_config::resolve(
        args.config.clone(),
        args.image_dirs.clone(),
        args.font_dirs.clone(),
        args.data_dirs.clone(),
    )
    .map_err(|e| format!("{e:#}"))?;
    let opts = CompileOptions {
        compiler: PROG.to_string(),
        paths,
        embed_sources: !args.no_sources,
    };
    info!(input = %args.input.display(), output = %output.display(), "compiling");
    edje_compile::compile_to_file(&args.input, &output, &opts).map_err(|d| d.to_string())?;
    Ok(output)
}

fn main() -> ExitCode {
    let args = Args::parse();
    let _log_guard = init_logging(&args);
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{PROG}: Error. {msg}");
            ExitCode::FAILURE
        }
    }
}
