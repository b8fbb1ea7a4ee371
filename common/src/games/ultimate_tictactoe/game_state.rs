use std::fmt;

use super::types::{
    BOARD_COUNT, CELLS_PER_BOARD, Coord, Mark, Move, Outcome, Player, TOTAL_CELLS,
};
use super::win_detector::{Grid, classify};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IllegalMove {
    OutOfBounds(Move),
    GameOver,
    BoardDecided { board: Coord, status: Outcome },
    CellOccupied(Move),
    WrongBoard { expected: Coord, got: Coord },
}

impl fmt::Display for IllegalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IllegalMove::OutOfBounds(mv) => write!(f, "Move {:?} is out of bounds", mv),
            IllegalMove::GameOver => write!(f, "Game is already over"),
            IllegalMove::BoardDecided { board, status } => {
                write!(f, "Board {} is already {}", board, status)
            }
            IllegalMove::CellOccupied(mv) => write!(f, "Cell {} is already marked", mv),
            IllegalMove::WrongBoard { expected, got } => {
                write!(f, "Must play in board {}, not {}", expected, got)
            }
        }
    }
}

impl std::error::Error for IllegalMove {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    WrongCellCount { found: usize },
    MarkCountMismatch { x: usize, o: usize, to_move: Player },
    ActiveBoardOutOfBounds(Coord),
    ActiveBoardDecided { board: Coord, status: Outcome },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::WrongCellCount { found } => {
                write!(f, "Expected {} cells, found {}", TOTAL_CELLS, found)
            }
            SnapshotError::MarkCountMismatch { x, o, to_move } => write!(
                f,
                "{} X marks and {} O marks cannot have {} to move",
                x, o, to_move
            ),
            SnapshotError::ActiveBoardOutOfBounds(board) => {
                write!(f, "Active board {} is out of bounds", board)
            }
            SnapshotError::ActiveBoardDecided { board, status } => {
                write!(f, "Active board {} is already {}", board, status)
            }
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Full position as a flat value. Copying it is how search branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    cells: [Mark; TOTAL_CELLS],
    board_statuses: [Outcome; BOARD_COUNT],
    global_status: Outcome,
    active_board: Option<Coord>,
    current_player: Player,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_index(board: Coord, cell: Coord) -> usize {
    board.index() * CELLS_PER_BOARD + cell.index()
}

impl GameState {
    pub fn new() -> Self {
        Self {
            cells: [Mark::Empty; TOTAL_CELLS],
            board_statuses: [Outcome::Ongoing; BOARD_COUNT],
            global_status: Outcome::Ongoing,
            active_board: None,
            current_player: Player::X,
        }
    }

    /// Rebuilds a position from its 81 cells (board by board, each row-major).
    pub fn from_snapshot(
        cells: &[Mark],
        active_board: Option<Coord>,
        current_player: Player,
    ) -> Result<Self, SnapshotError> {
        let cells: [Mark; TOTAL_CELLS] = cells
            .try_into()
            .map_err(|_| SnapshotError::WrongCellCount { found: cells.len() })?;

        let x = cells.iter().filter(|&&m| m == Mark::X).count();
        let o = cells.iter().filter(|&&m| m == Mark::O).count();
        let parity_ok = match current_player {
            Player::X => x == o,
            Player::O => x == o + 1,
        };
        if !parity_ok {
            return Err(SnapshotError::MarkCountMismatch {
                x,
                o,
                to_move: current_player,
            });
        }

        let mut state = Self {
            cells,
            board_statuses: [Outcome::Ongoing; BOARD_COUNT],
            global_status: Outcome::Ongoing,
            active_board: None,
            current_player,
        };
        for board in Coord::all() {
            state.board_statuses[board.index()] = classify(&state.local_grid(board));
        }
        state.global_status = classify(&state.meta_grid());

        if let Some(board) = active_board {
            if !board.in_bounds() {
                return Err(SnapshotError::ActiveBoardOutOfBounds(board));
            }
            let status = state.board_status(board);
            if status.is_decided() {
                return Err(SnapshotError::ActiveBoardDecided { board, status });
            }
        }
        state.active_board = active_board;

        Ok(state)
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn active_board(&self) -> Option<Coord> {
        self.active_board
    }

    pub fn winner(&self) -> Outcome {
        self.global_status
    }

    pub fn board_status(&self, board: Coord) -> Outcome {
        self.board_statuses[board.index()]
    }

    pub fn cell(&self, board: Coord, cell: Coord) -> Mark {
        self.cells[cell_index(board, cell)]
    }

    pub fn cells(&self) -> &[Mark; TOTAL_CELLS] {
        &self.cells
    }

    pub fn move_count(&self) -> usize {
        self.cells.iter().filter(|m| !m.is_empty()).count()
    }

    pub fn empty_cell_count(&self) -> usize {
        TOTAL_CELLS - self.move_count()
    }

    pub fn local_grid(&self, board: Coord) -> Grid<Mark> {
        let mut grid = [[Mark::Empty; 3]; 3];
        for cell in Coord::all() {
            grid[cell.row][cell.col] = self.cell(board, cell);
        }
        grid
    }

    pub fn meta_grid(&self) -> Grid<Outcome> {
        let mut grid = [[Outcome::Ongoing; 3]; 3];
        for board in Coord::all() {
            grid[board.row][board.col] = self.board_status(board);
        }
        grid
    }

    /// Canonical order: boards row-major, cells row-major inside each board.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        if self.global_status.is_decided() {
            return moves;
        }

        match self.active_board {
            Some(board) => self.push_board_moves(board, &mut moves),
            None => {
                for board in Coord::all() {
                    self.push_board_moves(board, &mut moves);
                }
            }
        }
        moves
    }

    fn push_board_moves(&self, board: Coord, moves: &mut Vec<Move>) {
        if self.board_status(board).is_decided() {
            return;
        }
        for cell in Coord::all() {
            if self.cell(board, cell).is_empty() {
                moves.push(Move::at(board, cell));
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        // An Ongoing board always has an empty cell, so this matches
        // `legal_moves().is_empty()` without allocating.
        self.global_status.is_decided() || self.board_statuses.iter().all(|s| s.is_decided())
    }

    pub fn validate_move(&self, mv: &Move) -> Result<(), IllegalMove> {
        if !mv.in_bounds() {
            return Err(IllegalMove::OutOfBounds(*mv));
        }
        if self.is_terminal() {
            return Err(IllegalMove::GameOver);
        }

        let board = mv.board();
        let status = self.board_status(board);
        if status.is_decided() {
            return Err(IllegalMove::BoardDecided { board, status });
        }

        if !self.cell(board, mv.cell()).is_empty() {
            return Err(IllegalMove::CellOccupied(*mv));
        }

        if let Some(expected) = self.active_board
            && expected != board
        {
            return Err(IllegalMove::WrongBoard {
                expected,
                got: board,
            });
        }

        Ok(())
    }

    /// Validates first; on error the state is left untouched.
    pub fn apply_move(&mut self, mv: Move) -> Result<(), IllegalMove> {
        self.validate_move(&mv)?;

        let board = mv.board();
        self.cells[cell_index(board, mv.cell())] = Mark::from(self.current_player);
        self.board_statuses[board.index()] = classify(&self.local_grid(board));
        self.global_status = classify(&self.meta_grid());

        let next = mv.cell();
        self.active_board = if self.board_status(next).is_decided() {
            None
        } else {
            Some(next)
        };
        self.current_player = self.current_player.opponent();

        Ok(())
    }

    pub fn after_move(&self, mv: Move) -> Result<GameState, IllegalMove> {
        let mut next = *self;
        next.apply_move(mv)?;
        Ok(next)
    }

    #[cfg(test)]
    pub(crate) fn set_raw(
        cells: [Mark; TOTAL_CELLS],
        active_board: Option<Coord>,
        current_player: Player,
    ) -> Self {
        let mut state = Self {
            cells,
            board_statuses: [Outcome::Ongoing; BOARD_COUNT],
            global_status: Outcome::Ongoing,
            active_board,
            current_player,
        };
        for board in Coord::all() {
            state.board_statuses[board.index()] = classify(&state.local_grid(board));
        }
        state.global_status = classify(&state.meta_grid());
        state
    }
}
