//! tsync - tiny rsync
//!
//! A local, one-way file synchronization command powered by tinysync.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tinysync::{SyncReport, SyncStats, TransferPolicy, sync_all};
use tracing::Level;

/// Exit status when some entries could not be synchronized.
const EXIT_PARTIAL: u8 = 23;

/// tsync - synchronize files and directories
///
/// Brings the destination in line with the sources, transferring only what
/// changed. Symbolic and hard links are replicated as links.
///
/// Usage:
///   tsync SOURCE DEST
///   tsync SOURCE... DIRECTORY
///   tsync -r DIR/ DEST        (copy the contents of DIR)
#[derive(Parser, Debug)]
#[command(name = "tsync", version, about, long_about = None)]
struct Args {
    /// Source file(s) or directory(ies), followed by the destination
    ///
    /// An existing destination directory receives the sources inside it.
    /// A trailing slash on a source directory copies its contents instead
    /// of the directory itself.
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Skip files that are newer at the destination
    #[arg(short = 'u', long)]
    update: bool,

    /// Always transfer instead of comparing size and modification time
    #[arg(short = 'c', long)]
    checksum: bool,

    /// Recurse into directories
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Verbose output (repeat for more detail)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    /// Split the positionals into sources and the destination.
    fn split(&self) -> (&[PathBuf], Option<&PathBuf>) {
        match self.paths.split_last() {
            Some((dest, sources)) => (sources, Some(dest)),
            None => (&[], None),
        }
    }

    fn policy(&self) -> TransferPolicy {
        let mut policy = TransferPolicy::default();
        if self.update {
            policy = policy.with_update();
        }
        if self.checksum {
            policy = policy.with_checksum();
        }
        if self.recursive {
            policy = policy.with_recursive();
        }
        policy
    }

    fn log_level(&self) -> Level {
        if self.quiet {
            return Level::ERROR;
        }
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to initialize logging: {source}")]
    Logging {
        source: tracing::subscriber::SetGlobalDefaultError,
    },

    #[error("some files/attrs were not transferred (see previous errors) (code 23)")]
    Partial { errors: usize },
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Logging { .. } => 1,
            Self::Partial { .. } => EXIT_PARTIAL,
        }
    }
}

type CliResult<T> = std::result::Result<T, CliError>;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if let CliError::Partial { errors } = &error {
                tracing::info!(errors, "run finished with errors");
            }
            eprintln!("tsync error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    init_logging(args.log_level())?;

    let (sources, dest) = args.split();
    let Some(dest) = dest else {
        return Ok(());
    };
    let policy = args.policy();

    tracing::info!(
        sources = sources.len(),
        dest = %dest.display(),
        update = policy.update,
        checksum = policy.checksum,
        recursive = policy.recursive,
        "starting"
    );

    let report = sync_all(sources, dest, &policy);
    report_errors(&report);

    if args.verbose > 0 {
        print_stats(&report.stats);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::Partial {
            errors: report.errors.len(),
        })
    }
}

fn init_logging(level: Level) -> CliResult<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| CliError::Logging { source })
}

fn report_errors(report: &SyncReport) {
    for error in &report.errors {
        tracing::debug!(code = %error.code(), "entry failed");
        eprintln!("tsync: {error}");
    }
}

fn print_stats(stats: &SyncStats) {
    if stats.files_transferred() == 0 && stats.dirs_created == 0 {
        if stats.files_skipped > 0 {
            println!(
                "Nothing to transfer ({} files up to date)",
                stats.files_skipped
            );
        } else {
            println!("Nothing to transfer");
        }
        return;
    }

    println!("Sync completed in {:?}", stats.duration);
    println!("  Files copied:   {}", stats.files_copied);
    println!("  Files patched:  {}", stats.files_patched);
    println!("  Files skipped:  {}", stats.files_skipped);
    println!(
        "  Links:          {} symbolic, {} hard",
        stats.symlinks_replicated, stats.hardlinks_replicated
    );
    if stats.link_fallbacks > 0 {
        println!("  Link fallbacks: {}", stats.link_fallbacks);
    }
    println!("  Directories:    {}", stats.dirs_created);
    println!("  Written:        {}", format_bytes(stats.bytes_written));

    if stats.duration.as_secs_f64() > 0.0 {
        let speed = stats.bytes_written as f64 / stats.duration.as_secs_f64();
        println!("  Speed:          {}/s", format_bytes(speed as u64));
    }
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
