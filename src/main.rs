use std::io::{self, Write};
use std::path::PathBuf;
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal::{disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement, Clear, ClearType},
};
use log::{error, info, LevelFilter};
use thiserror::Error;

use asteroid_smasher::game::Game;
use asteroid_smasher::rendering::{OutputTarget, ScreenBuffer};
use asteroid_smasher::terminal_io::SimulatedInput;
use asteroid_smasher::{ConfigError, GameConfig, Session};

#[derive(Parser, Debug)]
#[command(name = "asteroid-smasher")]
#[command(about = "Fly a ship, split rocks, stay alive", long_about = None)]
struct Cli {
    /// TOML file overriding the built-in tuning.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Lives at the start of each game.
    #[arg(long)]
    lives: Option<i32>,

    /// Run headless against a scripted demo instead of the terminal.
    #[arg(long)]
    debug: bool,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Headless screen width in columns.
    #[arg(long, default_value_t = 80)]
    width: u16,

    /// Headless screen height in rows.
    #[arg(long, default_value_t = 24)]
    height: u16,

    /// Where the log is written.
    #[arg(long, default_value = "asteroid-smasher.log")]
    log_file: PathBuf,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not open log file {path}: {source}")]
    Logging { path: PathBuf, source: io::Error },
}

fn load_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(lives) = cli.lives {
        config.initial_lives = lives;
    }
    Ok(config)
}

fn run_headless(cli: &Cli, session: Session) -> Result<(), AppError> {
    info!("Debug mode enabled. Resolution {}x{}", cli.width, cli.height);
    let stdout_target = OutputTarget::ScreenBuffer(ScreenBuffer::new(cli.width, cli.height));
    let mut game = Game::new(
        session,
        cli.width,
        cli.height,
        stdout_target,
        Some(SimulatedInput::demo_script()),
        cli.frames,
        true,
    );
    game.run()?;
    Ok(())
}

fn run_terminal(cli: &Cli, session: Session) -> Result<(), AppError> {
    info!("Attempting to enable raw mode.");
    enable_raw_mode().map_err(|e| { error!("Failed to enable raw mode: {}", e); e })?;

    let reports_key_release = supports_keyboard_enhancement().unwrap_or(false);
    let mut stdout_target = OutputTarget::Stdout(io::stdout());
    if reports_key_release {
        stdout_target.execute_other_command(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    info!("Key release events {}.", if reports_key_release { "enabled" } else { "unavailable, using timeouts" });

    let result = play_in_terminal(cli, session, stdout_target, reports_key_release);
    if let Err(e) = disable_raw_mode() {
        error!("Failed to disable raw mode: {}", e);
    }
    result
}

fn play_in_terminal(
    cli: &Cli,
    session: Session,
    mut stdout_target: OutputTarget,
    reports_key_release: bool,
) -> Result<(), AppError> {
    let (width, height) = size().map_err(|e| { error!("Failed to get terminal size: {}", e); e })?;
    info!("Terminal size: {}x{}", width, height);
    stdout_target.execute_other_command(Clear(ClearType::All))?;
    stdout_target.execute_other_command(Hide)?;
    stdout_target.flush()?;

    let mut game = Game::new(session, width, height, stdout_target, None, cli.frames, reports_key_release);
    let outcome = game.run();
    restore_terminal(&mut game.stdout_target, reports_key_release);
    Ok(outcome?)
}

fn restore_terminal(stdout_target: &mut OutputTarget, reports_key_release: bool) {
    if reports_key_release {
        let _ = stdout_target.execute_other_command(PopKeyboardEnhancementFlags);
    }
    let _ = stdout_target.execute_other_command(Clear(ClearType::All));
    let _ = stdout_target.execute_other_command(Show);
    let _ = stdout_target.flush();
}

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    let level = if cli.debug { LevelFilter::Debug } else { LevelFilter::Info };
    simple_logging::log_to_file(&cli.log_file, level)
        .map_err(|source| AppError::Logging { path: cli.log_file.clone(), source })?;
    info!("Starting asteroid-smasher.");

    let config = load_config(&cli).map_err(|e| { error!("{}", e); e })?;
    let session = Session::new(config).map_err(|e| { error!("{}", e); e })?;

    let result = if cli.debug { run_headless(&cli, session) } else { run_terminal(&cli, session) };
    match &result {
        Ok(()) => info!("Application exited cleanly."),
        Err(e) => error!("Application exited with error: {}", e),
    }
    result
}
