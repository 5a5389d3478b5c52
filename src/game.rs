use crate::{
    config::Config,
    error::Error,
    screen::{Color, PixelRect, Screen},
    sweep::{Cell, Grid},
};
use num_traits::ToPrimitive;
use rand::Rng;
use tracing::{debug, info, trace};

const LOSE_MESSAGE: &str = "You lose. Press ENTER to continue";
const WIN_MESSAGE: &str = "You win! Press ENTER to continue";

const TEXT_SIZE: u16 = 20;
const BANNER_SIZE: u16 = 30;

#[derive(Debug)]
pub(crate) enum Phase {
    Playing { grid: Grid, started: f64 },
    Lost,
    Won,
}

enum Transition {
    Stay,
    Lose,
    Win,
    Restart,
    Exit,
}

/// Formats whole seconds as `minutes : seconds`, unpadded.
fn format_clock(elapsed: f64) -> String {
    let seconds = elapsed.floor().to_i64().unwrap_or(0).max(0);
    format!("{} : {}", seconds / 60, seconds % 60)
}

pub(crate) struct Game<R> {
    config: Config,
    rng: R,
    phase: Phase,
    round: u32,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new<S: Screen>(config: Config, mut rng: R, screen: &S) -> Self {
        let phase = Self::new_round(&config, &mut rng, 1, screen);
        Self {
            config,
            rng,
            phase,
            round: 1,
        }
    }

    fn new_round<S: Screen>(config: &Config, rng: &mut R, round: u32, screen: &S) -> Phase {
        let grid = Grid::new(config, rng);
        info!(
            round,
            width = grid.width(),
            height = grid.height(),
            mines = grid.mines(),
            "starting round"
        );
        Phase::Playing {
            grid,
            started: screen.elapsed_time(),
        }
    }

    /// Plays until the window is closed or a won game is acknowledged.
    pub(crate) fn run<S: Screen>(&mut self, screen: &mut S) -> Result<(), Error> {
        loop {
            screen.begin_frame()?;
            if screen.should_close() {
                info!(round = self.round, "window closed");
                return Ok(());
            }

            let transition = self.step(screen);
            screen.end_frame()?;

            match transition {
                Transition::Stay => {}
                Transition::Lose => {
                    info!(round = self.round, "mine opened, round lost");
                    self.phase = Phase::Lost;
                }
                Transition::Win => {
                    info!(round = self.round, "all mines flagged, game won");
                    self.phase = Phase::Won;
                }
                Transition::Restart => {
                    self.round += 1;
                    self.phase = Self::new_round(&self.config, &mut self.rng, self.round, screen);
                }
                Transition::Exit => {
                    info!(round = self.round, "leaving after a win");
                    return Ok(());
                }
            }
        }
    }

    fn step<S: Screen>(&mut self, screen: &mut S) -> Transition {
        let config = &self.config;
        screen.clear(Color::White);

        match &mut self.phase {
            Phase::Playing { grid, started } => {
                let (x, y) = config.grid_coordinate(screen.cursor_position());
                trace!(x, y, "cursor");

                if screen.primary_clicked() {
                    grid.reveal(x, y);
                    debug!(x, y, cell = ?grid.cell(x, y), "reveal");
                }
                if screen.secondary_clicked() {
                    debug!(x, y, "toggle flag");
                    grid.toggle_flag(x, y);
                }

                screen.draw_text(
                    &format_clock(screen.elapsed_time() - *started),
                    config.clock_x,
                    config.clock_y,
                    BANNER_SIZE,
                    Color::Blue,
                );
                draw_grid(config, grid, screen);

                if grid.is_lost() {
                    Transition::Lose
                } else if grid.is_won() {
                    Transition::Win
                } else {
                    Transition::Stay
                }
            }
            Phase::Lost => {
                screen.draw_text(
                    LOSE_MESSAGE,
                    config.clock_x,
                    config.clock_y,
                    BANNER_SIZE,
                    Color::Red,
                );
                if screen.confirm_released() {
                    Transition::Restart
                } else {
                    Transition::Stay
                }
            }
            Phase::Won => {
                screen.draw_text(
                    WIN_MESSAGE,
                    config.clock_x,
                    config.clock_y,
                    BANNER_SIZE,
                    Color::Green,
                );
                if screen.confirm_released() {
                    Transition::Exit
                } else {
                    Transition::Stay
                }
            }
        }
    }
}

fn draw_grid<S: Screen>(config: &Config, grid: &Grid, screen: &mut S) {
    for ((x, y), cell) in grid.cells() {
        draw_cell(config, x, y, cell, screen);
    }
}

fn draw_cell<S: Screen>(config: &Config, x: i32, y: i32, cell: &Cell, screen: &mut S) {
    let rect = PixelRect::new(
        x * config.cell_width,
        y * config.cell_height + config.grid_top,
        config.cell_width,
        config.cell_height,
    );
    let (text_x, text_y) = (
        rect.x + config.cell_width / 2,
        rect.y + config.cell_height / 2,
    );

    if !cell.opened {
        screen.draw_filled_rect(rect, Color::LightGray);
        screen.draw_rect_outline(rect, Color::Black);
        if cell.flagged {
            screen.draw_text("F", text_x, text_y, TEXT_SIZE, Color::Green);
        }
        return;
    }

    screen.draw_rect_outline(rect, Color::Black);
    match cell.mine_count() {
        -1 => screen.draw_text("X", text_x, text_y, TEXT_SIZE, Color::Red),
        count => screen.draw_text(&count.to_string(), text_x, text_y, TEXT_SIZE, Color::Black),
    }
}
