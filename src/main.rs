//! iopid - print I/O statistics for a process.
//!
//! Entry point: parses arguments, resolves configuration, sets up logging and
//! hands off to the sampler, which only returns on error or after `--count`.

mod cli;
mod config;

use clap::Parser;
use std::io;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use cli::Args;
use config::{resolve_config, show_config, validate_effective_config, Config};
use iopid::{io_path, RedrawPolicy, Sampler};

/// Initializes tracing on stderr; stdout belongs to the table.
fn setup_logging(config: &Config) {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level().as_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("{}: failed to set tracing subscriber: {}", progname(), e);
    }
}

/// Basename of argv[0], used to prefix diagnostics.
fn progname() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .and_then(|p| std::path::Path::new(p).file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "iopid".to_string())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match resolve_config(&args).and_then(|c| {
        validate_effective_config(&c)?;
        Ok(c)
    }) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: configuration invalid: {:#}", progname(), e);
            return ExitCode::FAILURE;
        }
    };

    if args.show_config {
        return match show_config(&config, args.config_format) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{}: {:#}", progname(), e);
                ExitCode::FAILURE
            }
        };
    }

    setup_logging(&config);

    let source = io_path(config.proc_root(), args.pid);
    let policy = RedrawPolicy::for_stdout(config.redraw_header.unwrap_or(true));
    debug!(
        "sampling {} every {}s, terminal {:?}",
        source.display(),
        args.interval,
        policy.state()
    );

    // Stdout is line buffered; every row is flushed on its own as well.
    let mut sampler = Sampler::new(
        source,
        Duration::from_secs(args.interval),
        policy,
        io::stdout().lock(),
    );

    match sampler.run(config.count) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("sampling stopped after {} polls", sampler.polls());
            eprintln!("{}: {}", progname(), e);
            ExitCode::FAILURE
        }
    }
}
