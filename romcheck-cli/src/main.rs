use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use romcheck_core::localize::Messages;
use romcheck_core::progress::Progress;
use romcheck_core::report::{self, Counts, DEFAULT_REPORT};
use romcheck_core::scan::ScanPolicy;
use romcheck_core::verify::{preflight, VerificationEngine, VerifyOptions};
use romcheck_core::{hash::DEFAULT_CHUNK, manifest};

const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "romcheck", version, about = "Verify ROM files against a DAT manifest")]
struct Cli {
    /// DAT file listing expected names and SHA-256 digests
    dat_file: PathBuf,
    /// Directory holding the ROM files (not searched recursively)
    roms_folder: PathBuf,
    /// Where to write the text report
    #[arg(long, default_value = DEFAULT_REPORT)]
    report: PathBuf,
    /// Hashing threads (default: available parallelism)
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    threads: Option<u16>,
    /// Read size used while hashing, in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK, value_parser = parse_chunk)]
    chunk_size: usize,
    /// Skip symlinks instead of verifying the files they point to
    #[arg(long, default_value_t = false)]
    no_follow_symlinks: bool,
    /// Skip files whose name matches this glob (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
    /// Print the result as JSON on stdout
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Periodic progress on stderr while hashing
    #[arg(long, default_value_t = false)]
    progress: bool,
    /// Debug logging (ROMCHECK_LOG overrides)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn parse_chunk(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("chunk size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("ROMCHECK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let msgs = Messages::builtin("en-GB");
    match run(&cli, &msgs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let reason = format!("{e:#}");
            eprintln!("{}", msgs.get("error-fatal", &[("reason", reason.as_str())]));
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli, msgs: &Messages) -> Result<()> {
    preflight(&cli.dat_file, &cli.roms_folder)?;

    if !cli.json {
        println!("{}", msgs.get("verify-start", &[]));
    }
    let index = manifest::parse(&cli.dat_file)?;
    tracing::info!(entries = index.len(), "manifest loaded");

    let opts = VerifyOptions {
        chunk_size: cli.chunk_size,
        threads: cli.threads.map(usize::from),
        policy: ScanPolicy { follow_symlinks: !cli.no_follow_symlinks, exclude: cli.exclude.clone() },
    };
    let engine = VerificationEngine::new(opts).with_progress(Progress::new(cli.progress));
    let result = engine.verify(&index, &cli.roms_folder)?;

    write_report(&result, &cli.report)?;

    if cli.json {
        println!("{}", report::render_json(&result).context("serialize result")?);
        return Ok(());
    }
    println!();
    let report_path = cli.report.display().to_string();
    println!("{}", msgs.get("verify-complete", &[("path", report_path.as_str())]));
    println!("{}", msgs.summary(&Counts::from(&result)));
    if result.is_clean() && !result.verified.is_empty() {
        println!("{}", msgs.get("verify-clean", &[]));
    }
    Ok(())
}

fn write_report(result: &romcheck_core::ClassificationResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    report::write_report(result, path).with_context(|| format!("write report {}", path.display()))
}
