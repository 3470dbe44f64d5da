mod app;
mod components;
mod config;
mod error;
mod event;
mod fs;
mod handler;
mod logging;
mod nav;
mod theme;
mod tui;
mod ui;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;

use crate::app::App;
use crate::config::{AppConfig, GeneralConfig, LogConfig, ThemeConfig};
use crate::event::{Event, EventHandler};
use crate::fs::gateway::NativeGateway;
use crate::tui::{install_panic_hook, Tui};

/// Browse drives and folders, with back/forward history and basic file operations.
#[derive(Parser, Debug)]
#[command(name = "dnav", version, about)]
struct Cli {
    /// Folder to open at startup (defaults to the drive list)
    path: Option<PathBuf>,

    /// Config file to load on top of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write diagnostic logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Delete without asking for confirmation
    #[arg(long)]
    no_confirm: bool,

    /// Color scheme: dark, light, or custom
    #[arg(long)]
    theme: Option<String>,
}

impl Cli {
    /// CLI flags as a config layer; unset flags leave the files' values alone.
    fn overrides(&self) -> AppConfig {
        AppConfig {
            general: GeneralConfig {
                start_path: self
                    .path
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                confirm_delete: self.no_confirm.then_some(false),
            },
            theme: ThemeConfig {
                scheme: self.theme.clone(),
                custom: None,
            },
            log: LogConfig {
                file: self
                    .log_file
                    .as_ref()
                    .map(|p| p.to_string_lossy().to_string()),
                level: None,
            },
            ..Default::default()
        }
    }
}

/// Resolve a user-supplied start path to an absolute folder.
fn resolve_start_path(raw: &str) -> error::Result<PathBuf> {
    let path = Path::new(raw);
    let resolved = path
        .canonicalize()
        .map_err(|_| error::AppError::InvalidPath(format!("{} does not exist", path.display())))?;
    // Drive roots are plain `C:\`, not the verbatim form canonicalize returns.
    #[cfg(windows)]
    let resolved = match resolved.to_str().and_then(|s| s.strip_prefix(r"\\?\")) {
        Some(plain) => PathBuf::from(plain),
        None => resolved,
    };
    if !resolved.is_dir() {
        return Err(error::AppError::InvalidPath(format!(
            "{} is not a folder",
            path.display()
        )));
    }
    Ok(resolved)
}

#[tokio::main]
async fn main() -> error::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref(), Some(&cli.overrides()));

    let start = config.start_path().map(resolve_start_path).transpose()?;
    logging::init(config.log_file().map(Path::new), config.log_level())?;
    tracing::debug!(
        theme = config.theme_scheme(),
        icons = config.use_icons(),
        confirm_delete = config.confirm_delete(),
        "config loaded"
    );

    install_panic_hook();

    let mut tui = Tui::new(true)?;
    let mut app = App::new(Box::new(NativeGateway::new()), &config);
    if let Some(path) = start {
        app.reveal(&path);
    }
    let mut events = EventHandler::new(Duration::from_millis(16));

    loop {
        tui.draw(&mut app)?;

        match events.next().await? {
            Event::Key(key) => handler::handle_key_event(&mut app, key),
            Event::Mouse(mouse) => handler::handle_mouse_event(&mut app, mouse),
            Event::Tick => app.clear_expired_status(),
            Event::Resize(_, _) => {}
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    tracing::info!("exit");
    Ok(())
}
