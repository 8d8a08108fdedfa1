mod app;
mod components;
mod config;
mod error;
mod event;
mod export;
mod fs;
mod handler;
mod theme;
mod tui;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::config::AppConfig;
use crate::event::{Event, EventSource};
use crate::tui::{install_panic_hook, Tui};

/// Interactive TUI for picking files into a tar/gzip/zstd archive or a
/// git-style patch.
#[derive(Parser, Debug)]
#[command(name = "arpick", version, about)]
struct Cli {
    /// Directory to browse (defaults to current directory)
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Display nested entries as paths relative to the invocation directory
    /// instead of bare names
    #[arg(short = 'f', long)]
    full_path_display: bool,

    /// Explicit config file path
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color scheme: dark, light, custom
    #[arg(long, value_name = "SCHEME")]
    theme: Option<String>,
}

/// Partial config derived from CLI flags; highest merge priority.
fn cli_overrides(cli: &Cli) -> AppConfig {
    AppConfig {
        general: config::GeneralConfig {
            full_path_display: cli.full_path_display.then_some(true),
            ..Default::default()
        },
        theme: config::ThemeConfig {
            scheme: cli.theme.clone(),
            custom: None,
        },
        ..Default::default()
    }
}

fn main() -> error::Result<()> {
    // Logs go to stderr so they are only seen when redirected; default quiet.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli_overrides(&cli)));

    // The configured default path applies only when the positional arg was
    // left at its default.
    let requested = if cli.path == PathBuf::from(".") {
        config
            .general
            .default_path
            .clone()
            .map(PathBuf::from)
            .unwrap_or(cli.path)
    } else {
        cli.path
    };

    let path = requested.canonicalize().map_err(|_| {
        error::AppError::InvalidPath(format!("{} does not exist", requested.display()))
    })?;
    if !path.is_dir() {
        return Err(error::AppError::InvalidPath(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    let theme = theme::resolve_theme(&config.theme);
    tracing::debug!(scheme = config.theme_scheme(), path = %path.display(), "starting up");

    // Build all interactive state before touching the terminal so startup
    // errors print cleanly.
    let mut app = App::new(&path, &config)?;

    install_panic_hook();
    let mut tui = Tui::new()?;
    let events = EventSource::new();

    loop {
        tui.terminal_mut()
            .draw(|frame| ui::render(&mut app, &theme, frame))?;

        match events.next()? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Resize(_, _) => {}
        }

        // A confirmed filename prompt stages an export job; run it with the
        // screen torn down so the subprocess owns the terminal.
        if let Some(job) = app.take_export_job() {
            let result = tui.suspend(|| export::run(&job))?;
            app.finish_export(&job, result);
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    Ok(())
}
