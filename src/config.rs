use std::time::Duration;

/// Everything that shapes a game: grid dimensions, mine density, frame rate
/// and where things are drawn. One terminal character cell is one pixel.
#[derive(Debug, Clone, Copy, PartialEq, typed_builder::TypedBuilder)]
pub(crate) struct Config {
    /// The number of columns in the grid.
    #[builder(default = 16)]
    pub(crate) width: i32,

    /// The number of rows in the grid.
    #[builder(default = 16)]
    pub(crate) height: i32,

    /// Probability that any single cell holds a mine.
    #[builder(default = 0.20)]
    pub(crate) mine_chance: f64,

    #[builder(default = 60)]
    pub(crate) target_fps: u32,

    /// The width of each cell.
    #[builder(default = 5)]
    pub(crate) cell_width: i32,

    /// The height of each cell.
    #[builder(default = 3)]
    pub(crate) cell_height: i32,

    /// Vertical offset of the grid from the top of the screen.
    #[builder(default = 3)]
    pub(crate) grid_top: i32,

    #[builder(default = 2)]
    pub(crate) clock_x: i32,

    #[builder(default = 1)]
    pub(crate) clock_y: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    pub(crate) fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    /// Maps a pointer position to the grid cell underneath it.
    ///
    /// Floors rather than truncates, so positions above or left of the grid
    /// land on negative (out of range) coordinates instead of row/column 0.
    pub(crate) fn grid_coordinate(&self, (x, y): (i32, i32)) -> (i32, i32) {
        (
            x.div_euclid(self.cell_width),
            (y - self.grid_top).div_euclid(self.cell_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_board() {
        let config = Config::default();
        assert_eq!((config.width, config.height), (16, 16));
        assert!((config.mine_chance - 0.20).abs() < f64::EPSILON);
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn frame_interval_follows_target_fps() {
        let config = Config::builder().target_fps(50).build();
        assert_eq!(config.frame_interval(), Duration::from_millis(20));
    }

    #[test]
    fn grid_coordinate_buckets_by_cell_size() {
        let config = Config::default();
        assert_eq!(config.grid_coordinate((0, 3)), (0, 0));
        assert_eq!(config.grid_coordinate((4, 5)), (0, 0));
        assert_eq!(config.grid_coordinate((5, 6)), (1, 1));
        assert_eq!(config.grid_coordinate((79, 50)), (15, 15));
    }

    #[test]
    fn grid_coordinate_floors_above_the_grid() {
        let config = Config::default();
        // the clock rows sit above the grid and must not map onto row 0
        assert_eq!(config.grid_coordinate((0, 2)), (0, -1));
        assert_eq!(config.grid_coordinate((0, 0)), (0, -1));
        assert_eq!(config.grid_coordinate((-1, 3)), (-1, 0));
    }
}
