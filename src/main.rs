use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod events;
mod game;
mod screen;
mod sweep;
mod ui;

fn main() -> Result<()> {
    // stdout belongs to the terminal UI, so logs go to stderr and stay quiet
    // unless RUST_LOG asks for more. stderr shares the tty with the board, so
    // anything above `error` is only readable redirected, e.g.
    // `RUST_LOG=debug minesweep-grid 2>sweep.log`
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = config::Config::default();
    let mut screen =
        ui::TerminalScreen::new(&config).context("failed to initialize the terminal")?;

    game::Game::new(config, rand::thread_rng(), &screen)
        .run(&mut screen)
        .context("sweep failed")
}
