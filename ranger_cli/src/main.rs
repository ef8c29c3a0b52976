//! `ranger`: query an ultrasonic pulse-width rangefinder from the command line.

mod cli;
mod error_fmt;
mod measure;
mod rt;

use std::path::Path;

use clap::Parser;
use eyre::{WrapErr, eyre};
use ranger_config::{Logging, Rotation};
use ranger_core::CancelToken;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "command failed");
        if JSON_MODE.get().copied().unwrap_or(false) {
            println!("{}", format_error_json(&err));
        } else {
            eprintln!("{}", humanize(&err));
        }
        std::process::exit(exit_code_for_error(&err));
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    color_eyre::install()?;

    let cfg = ranger_config::load_file(&cli.config)?;
    // Dropping the guard flushes the file sink.
    let _file_guard = init_tracing(&cli, &cfg.logging)?;
    tracing::debug!(config = %cli.config.display(), pin = cfg.sensor.pin, "config loaded");

    if cli.rt {
        rt::setup_rt_once(cli.rt_prio);
    }

    let cancel = CancelToken::new();
    {
        let cancel = cancel.clone();
        ctrlc::set_handler(move || cancel.cancel()).wrap_err("install Ctrl-C handler")?;
    }

    match cli.cmd {
        Commands::Measure { retries } => {
            let mut source = measure::build_source(&cfg, cancel)?;
            measure::run_measure(&mut *source, retries, cli.json)
        }
        Commands::Watch { hz, count } => {
            let mut source = measure::build_source(&cfg, cancel.clone())?;
            measure::run_watch(&mut *source, hz, count, &cancel, cli.json)
        }
        Commands::SelfCheck => measure::run_self_check(&cfg, cli.json),
    }
}

/// Console layer on stderr (RUST_LOG overrides --log-level), plus an optional
/// JSON file sink from `[logging]`.
fn init_tracing(cli: &Cli, logging: &Logging) -> eyre::Result<Option<WorkerGuard>> {
    let console_filter = match EnvFilter::try_from_default_env() {
        Ok(f) => f,
        Err(_) => EnvFilter::try_new(&cli.log_level).wrap_err("invalid --log-level")?,
    };
    let console = if cli.json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(console_filter)
            .boxed()
    };

    let mut guard = None;
    let file = match logging.file.as_deref() {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .ok_or_else(|| eyre!("logging.file has no file name"))?;
            let appender = match logging.rotation {
                Rotation::Never => tracing_appender::rolling::never(dir, name),
                Rotation::Daily => tracing_appender::rolling::daily(dir, name),
                Rotation::Hourly => tracing_appender::rolling::hourly(dir, name),
            };
            let (writer, g) = tracing_appender::non_blocking(appender);
            guard = Some(g);
            let level = logging.level.as_deref().unwrap_or("info");
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(EnvFilter::try_new(level).wrap_err("invalid logging.level")?)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre!("init tracing: {e}"))?;
    Ok(guard)
}
