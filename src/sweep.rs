use crate::config::Config;
use bit_set::BitSet;
use rand::Rng;

pub(crate) type Coordinate = (i32, i32);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Content {
    Mine,
    /// A safe cell and the number of mines around it.
    Clear(u8),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) content: Content,
    pub(crate) opened: bool,
    pub(crate) flagged: bool,
}

impl Cell {
    fn new(mine: bool) -> Self {
        Self {
            content: if mine {
                Content::Mine
            } else {
                Content::Clear(0)
            },
            opened: false,
            flagged: false,
        }
    }

    pub(crate) fn is_mine(&self) -> bool {
        self.content == Content::Mine
    }

    /// The number of neighbouring mines, or -1 for a mine.
    pub(crate) fn mine_count(&self) -> i8 {
        match self.content {
            Content::Mine => -1,
            Content::Clear(count) => count as i8,
        }
    }
}

const DISPLACEMENTS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn adjacent((x, y): Coordinate, width: i32, height: i32) -> impl Iterator<Item = Coordinate> {
    DISPLACEMENTS
        .iter()
        .map(move |&(dx, dy)| (x + dx, y + dy))
        .filter(move |&(x, y)| (0..width).contains(&x) && (0..height).contains(&y))
}

fn index_from_coord((x, y): Coordinate, width: i32) -> usize {
    (y * width + x) as usize
}

fn coord_from_index(index: usize, width: i32) -> Coordinate {
    let index = index as i32;
    (index % width, index / width)
}

/// The board for one round. Cells live in a single buffer laid out row by
/// row; every operation takes signed coordinates and quietly ignores the ones
/// that fall outside the board.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    cells: Vec<Cell>,
    width: i32,
    height: i32,
}

impl Grid {
    pub(crate) fn new<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Self {
        let Config {
            width,
            height,
            mine_chance,
            ..
        } = *config;
        let mine_chance = mine_chance.clamp(0.0, 1.0);
        let cells = (0..width * height)
            .map(|_| Cell::new(rng.gen_bool(mine_chance)))
            .collect();
        Self::with_cells(cells, width, height)
    }

    /// Builds a grid with mines at exactly the given coordinates. Coordinates
    /// outside the grid are dropped.
    pub(crate) fn from_mines(width: i32, height: i32, mines: &[Coordinate]) -> Self {
        let mut cells = vec![Cell::new(false); (width * height).max(0) as usize];
        for &(x, y) in mines {
            if (0..width).contains(&x) && (0..height).contains(&y) {
                cells[index_from_coord((x, y), width)] = Cell::new(true);
            }
        }
        Self::with_cells(cells, width, height)
    }

    // mines must all be placed before any count is taken, hence the second pass
    fn with_cells(mut cells: Vec<Cell>, width: i32, height: i32) -> Self {
        for index in 0..cells.len() {
            if cells[index].is_mine() {
                continue;
            }
            let count = adjacent(coord_from_index(index, width), width, height)
                .filter(|&coord| cells[index_from_coord(coord, width)].is_mine())
                .count();
            cells[index].content = Content::Clear(count as u8);
        }
        Self {
            cells,
            width,
            height,
        }
    }

    pub(crate) fn width(&self) -> i32 {
        self.width
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    fn index(&self, (x, y): Coordinate) -> Option<usize> {
        if (0..self.width).contains(&x) && (0..self.height).contains(&y) {
            Some(index_from_coord((x, y), self.width))
        } else {
            None
        }
    }

    pub(crate) fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index((x, y)).map(|index| &self.cells[index])
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = (Coordinate, &Cell)> {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(index, cell)| (coord_from_index(index, width), cell))
    }

    pub(crate) fn mines(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_mine()).count()
    }

    /// Opens the cell at `(x, y)`. Opening a cell with no neighbouring mines
    /// keeps opening its neighbours until the region is bounded by numbered
    /// cells, mines, flags or the edge of the grid.
    pub(crate) fn reveal(&mut self, x: i32, y: i32) {
        let Some(start) = self.index((x, y)) else {
            return;
        };

        let mut pending = vec![start];
        let mut queued = BitSet::with_capacity(self.cells.len());
        queued.insert(start);

        while let Some(index) = pending.pop() {
            let cell = &mut self.cells[index];
            if cell.opened || cell.flagged {
                continue;
            }
            cell.opened = true;

            if cell.content == Content::Clear(0) {
                let (width, height) = (self.width, self.height);
                pending.extend(
                    adjacent(coord_from_index(index, width), width, height)
                        .map(|coord| index_from_coord(coord, width))
                        .filter(|&neighbor| queued.insert(neighbor)),
                );
            }
        }
    }

    pub(crate) fn toggle_flag(&mut self, x: i32, y: i32) {
        if let Some(index) = self.index((x, y)) {
            let cell = &mut self.cells[index];
            cell.flagged = !cell.flagged;
        }
    }

    pub(crate) fn is_lost(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_mine() && cell.opened)
    }

    /// Every mine must be flagged and left closed, and every safe cell opened;
    /// uncovering all the safe cells alone is not enough.
    pub(crate) fn is_won(&self) -> bool {
        self.cells.iter().all(|cell| {
            if cell.is_mine() {
                cell.flagged && !cell.opened
            } else {
                cell.opened
            }
        })
    }
}
