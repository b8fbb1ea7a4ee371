use crate::proto;
use super::game_state::GameState;
use super::types::{Coord, Mark, Move, Player};

impl Mark {
    pub fn to_proto(&self) -> i32 {
        match self {
            Mark::Empty => proto::CellMark::Empty as i32,
            Mark::X => proto::CellMark::X as i32,
            Mark::O => proto::CellMark::O as i32,
        }
    }

    pub fn from_proto(value: i32) -> Option<Mark> {
        match proto::CellMark::try_from(value).ok()? {
            proto::CellMark::Empty => Some(Mark::Empty),
            proto::CellMark::X => Some(Mark::X),
            proto::CellMark::O => Some(Mark::O),
        }
    }
}

impl Player {
    pub fn to_proto(&self) -> i32 {
        match self {
            Player::X => proto::PlayerMark::X as i32,
            Player::O => proto::PlayerMark::O as i32,
        }
    }

    pub fn from_proto(value: i32) -> Option<Player> {
        match proto::PlayerMark::try_from(value).ok()? {
            proto::PlayerMark::X => Some(Player::X),
            proto::PlayerMark::O => Some(Player::O),
            proto::PlayerMark::Unspecified => None,
        }
    }
}

impl Coord {
    pub fn to_proto(&self) -> proto::BoardCoord {
        proto::BoardCoord {
            row: self.row as u32,
            col: self.col as u32,
        }
    }
}

impl Move {
    pub fn to_proto(&self) -> proto::Move {
        proto::Move {
            global_row: self.global_row as u32,
            global_col: self.global_col as u32,
            local_row: self.local_row as u32,
            local_col: self.local_col as u32,
        }
    }

    /// `None` when any coordinate falls outside the board.
    pub fn from_proto(value: &proto::Move) -> Option<Move> {
        let mv = Move::new(
            value.global_row as usize,
            value.global_col as usize,
            value.local_row as usize,
            value.local_col as usize,
        );
        mv.in_bounds().then_some(mv)
    }
}

impl GameState {
    pub fn to_suggest_request(&self, time_budget_ms: u32) -> proto::SuggestMoveRequest {
        proto::SuggestMoveRequest {
            player: self.current_player().to_proto(),
            cells: self.cells().iter().map(Mark::to_proto).collect(),
            active_board: self.active_board().map(|board| board.to_proto()),
            time_budget_ms,
        }
    }

    pub fn from_suggest_request(request: &proto::SuggestMoveRequest) -> Result<GameState, String> {
        let player = Player::from_proto(request.player)
            .ok_or_else(|| format!("Unknown player mark {}", request.player))?;

        let cells = request
            .cells
            .iter()
            .map(|&value| Mark::from_proto(value).ok_or_else(|| format!("Unknown cell mark {}", value)))
            .collect::<Result<Vec<Mark>, String>>()?;

        let active_board = request
            .active_board
            .as_ref()
            .map(|board| Coord::new(board.row as usize, board.col as usize));

        GameState::from_snapshot(&cells, active_board, player).map_err(|e| e.to_string())
    }
}
