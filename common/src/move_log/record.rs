use serde::{Deserialize, Serialize};

use crate::games::ultimate_tictactoe::{
    CELLS_PER_BOARD, Coord, GameState, Mark, Move, Player, TOTAL_CELLS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCell {
    pub global_row: usize,
    pub global_col: usize,
    pub local_row: usize,
    pub local_col: usize,
    /// 0 empty, 1 X, 2 O.
    pub player: u8,
}

/// The side to move is logged with the same code as cell owners: 1 X, 2 O.
mod player_code {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::games::ultimate_tictactoe::{Mark, Player};

    pub fn serialize<S: Serializer>(player: &Player, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(Mark::from(*player).to_code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Player, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Mark::from_code(code)
            .and_then(|mark| mark.player())
            .ok_or_else(|| D::Error::custom(format!("player code must be 1 or 2, got {}", code)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLogRecord {
    #[serde(with = "player_code")]
    pub player: Player,
    #[serde(rename = "image path")]
    pub image_path: Option<String>,
    #[serde(rename = "legal moves")]
    pub legal_moves: Vec<Move>,
    #[serde(rename = "allowed squares")]
    pub allowed_square: Option<[usize; 2]>,
    #[serde(rename = "global state")]
    pub global_state: Vec<LoggedCell>,
    #[serde(rename = "best move")]
    pub best_move: Move,
}

impl MoveLogRecord {
    /// Snapshot of `state` just before `chosen` is applied.
    pub fn capture(state: &GameState, chosen: Move, image_path: Option<String>) -> Self {
        let global_state = Coord::all()
            .flat_map(|board| Coord::all().map(move |cell| (board, cell)))
            .map(|(board, cell)| LoggedCell {
                global_row: board.row,
                global_col: board.col,
                local_row: cell.row,
                local_col: cell.col,
                player: state.cell(board, cell).to_code(),
            })
            .collect();

        Self {
            player: state.current_player(),
            image_path,
            legal_moves: state.legal_moves(),
            allowed_square: state.active_board().map(|board| [board.row, board.col]),
            global_state,
            best_move: chosen,
        }
    }

    pub fn to_game_state(&self) -> Result<GameState, String> {
        let mut cells = [Mark::Empty; TOTAL_CELLS];
        let mut seen = [false; TOTAL_CELLS];

        for entry in &self.global_state {
            let mv = Move::new(entry.global_row, entry.global_col, entry.local_row, entry.local_col);
            if !mv.in_bounds() {
                return Err(format!("Cell {:?} is out of bounds", mv));
            }
            let index = mv.board().index() * CELLS_PER_BOARD + mv.cell().index();
            if seen[index] {
                return Err(format!("Cell {:?} is listed twice", mv));
            }
            seen[index] = true;
            cells[index] = Mark::from_code(entry.player)
                .ok_or_else(|| format!("Unknown owner code {}", entry.player))?;
        }

        if self.global_state.len() != TOTAL_CELLS {
            return Err(format!(
                "Expected {} cells, found {}",
                TOTAL_CELLS,
                self.global_state.len()
            ));
        }

        let active_board = self.allowed_square.map(|[row, col]| Coord::new(row, col));
        GameState::from_snapshot(&cells, active_board, self.player).map_err(|e| e.to_string())
    }
}
