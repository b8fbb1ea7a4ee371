use std::fmt;

use serde::{Deserialize, Serialize};

pub const GRID_SIZE: usize = 3;
pub const BOARD_COUNT: usize = GRID_SIZE * GRID_SIZE;
pub const CELLS_PER_BOARD: usize = GRID_SIZE * GRID_SIZE;
pub const TOTAL_CELLS: usize = BOARD_COUNT * CELLS_PER_BOARD;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn opponent(&self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::X => write!(f, "X"),
            Player::O => write!(f, "O"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mark {
    #[default]
    Empty,
    X,
    O,
}

impl Mark {
    pub fn player(&self) -> Option<Player> {
        match self {
            Mark::Empty => None,
            Mark::X => Some(Player::X),
            Mark::O => Some(Player::O),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Mark::Empty
    }

    /// Owner code used by the move log: 0 empty, 1 X, 2 O.
    pub fn to_code(&self) -> u8 {
        match self {
            Mark::Empty => 0,
            Mark::X => 1,
            Mark::O => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Mark> {
        match code {
            0 => Some(Mark::Empty),
            1 => Some(Mark::X),
            2 => Some(Mark::O),
            _ => None,
        }
    }
}

impl From<Player> for Mark {
    fn from(player: Player) -> Self {
        match player {
            Player::X => Mark::X,
            Player::O => Mark::O,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Outcome {
    #[default]
    Ongoing,
    Won(Player),
    Drawn,
}

impl Outcome {
    pub fn is_decided(&self) -> bool {
        *self != Outcome::Ongoing
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            Outcome::Won(player) => Some(*player),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ongoing => write!(f, "ongoing"),
            Outcome::Won(player) => write!(f, "won by {}", player),
            Outcome::Drawn => write!(f, "drawn"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const CENTER: Coord = Coord { row: 1, col: 1 };
    pub const CORNERS: [Coord; 4] = [
        Coord { row: 0, col: 0 },
        Coord { row: 0, col: 2 },
        Coord { row: 2, col: 0 },
        Coord { row: 2, col: 2 },
    ];

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < GRID_SIZE && self.col < GRID_SIZE
    }

    pub fn index(&self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    pub fn from_index(index: usize) -> Self {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        (0..GRID_SIZE * GRID_SIZE).map(Coord::from_index)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A placement: which local board (global row/col) and which cell inside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub global_row: usize,
    pub global_col: usize,
    pub local_row: usize,
    pub local_col: usize,
}

impl Move {
    pub fn new(global_row: usize, global_col: usize, local_row: usize, local_col: usize) -> Self {
        Self {
            global_row,
            global_col,
            local_row,
            local_col,
        }
    }

    pub fn at(board: Coord, cell: Coord) -> Self {
        Self::new(board.row, board.col, cell.row, cell.col)
    }

    pub fn board(&self) -> Coord {
        Coord::new(self.global_row, self.global_col)
    }

    pub fn cell(&self) -> Coord {
        Coord::new(self.local_row, self.local_col)
    }

    pub fn in_bounds(&self) -> bool {
        self.board().in_bounds() && self.cell().in_bounds()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "board {} cell {}",
            self.board(),
            self.cell()
        )
    }
}
