use serde::{Deserialize, Serialize};

use super::game_state::GameState;
use super::types::{Coord, Outcome, Player};
use super::win_detector::{Grid, LINES, LineCell};

/// Score of a decided game. Every heuristic sum stays well below it.
pub const WIN_SCORE: i64 = 10_000_000;

const TWO_IN_LINE: i64 = 20;
const ONE_IN_LINE: i64 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorWeights {
    pub global_weight: i64,
    pub center_bonus: i64,
    pub corner_bonus: i64,
    pub local_weight: i64,
    pub decided_board_bonus: i64,
    pub center_board_extra: i64,
    pub free_play_penalty: i64,
}

impl Default for EvaluatorWeights {
    fn default() -> Self {
        Self {
            global_weight: 10_000,
            center_bonus: 3_500,
            corner_bonus: 3_000,
            local_weight: 5,
            decided_board_bonus: 2_000,
            center_board_extra: 2_000,
            free_play_penalty: 500,
        }
    }
}

impl EvaluatorWeights {
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("global_weight", self.global_weight),
            ("center_bonus", self.center_bonus),
            ("corner_bonus", self.corner_bonus),
            ("local_weight", self.local_weight),
            ("decided_board_bonus", self.decided_board_bonus),
            ("center_board_extra", self.center_board_extra),
            ("free_play_penalty", self.free_play_penalty),
        ];
        for (name, value) in weights {
            if value < 0 {
                return Err(format!("Weight {} must not be negative, got {}", name, value));
            }
        }
        match self.max_heuristic_magnitude() {
            Some(bound) if bound < WIN_SCORE => Ok(()),
            Some(bound) => Err(format!(
                "Weights allow heuristic scores up to {}, which reaches the win score {}",
                bound, WIN_SCORE
            )),
            None => Err(format!(
                "Weights are too large: heuristic scores could exceed the win score {}",
                WIN_SCORE
            )),
        }
    }

    /// `None` when the bound itself does not fit in an i64.
    fn max_heuristic_magnitude(&self) -> Option<i64> {
        let lines = LINES.len() as i64 * TWO_IN_LINE;
        let terms = [
            lines.checked_mul(self.global_weight)?,
            self.center_bonus,
            self.corner_bonus.checked_mul(4)?,
            lines.checked_mul(9)?.checked_mul(self.local_weight)?,
            self.decided_board_bonus.checked_mul(9)?,
            self.center_board_extra,
            self.free_play_penalty,
        ];
        terms.into_iter().try_fold(0i64, |sum, term| sum.checked_add(term))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    weights: EvaluatorWeights,
}

impl Evaluator {
    pub fn new(weights: EvaluatorWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &EvaluatorWeights {
        &self.weights
    }

    pub fn score(&self, state: &GameState, perspective: Player) -> i64 {
        if state.is_terminal() {
            return match state.winner() {
                Outcome::Won(player) if player == perspective => WIN_SCORE,
                Outcome::Won(_) => -WIN_SCORE,
                _ => 0,
            };
        }

        let w = &self.weights;
        let meta = state.meta_grid();
        let mut score = line_pattern_score(&meta, perspective) * w.global_weight;
        score += control_score(meta[1][1], perspective) * w.center_bonus;
        for corner in Coord::CORNERS {
            score += control_score(meta[corner.row][corner.col], perspective) * w.corner_bonus;
        }

        for board in Coord::all() {
            match state.board_status(board) {
                Outcome::Ongoing => {
                    score += line_pattern_score(&state.local_grid(board), perspective)
                        * w.local_weight;
                }
                Outcome::Won(player) if player == perspective => {
                    score += w.decided_board_bonus;
                    if board == Coord::CENTER {
                        score += w.center_board_extra;
                    }
                }
                Outcome::Won(_) => score -= w.decided_board_bonus,
                Outcome::Drawn => {}
            }
        }

        if state.active_board().is_none() {
            score -= w.free_play_penalty;
        }

        score
    }
}

fn control_score<C: LineCell>(cell: C, perspective: Player) -> i64 {
    match cell.owner() {
        Some(owner) if owner == perspective => 1,
        Some(_) => -1,
        None => 0,
    }
}

/// Rewards open lines: two own marks and a gap count 20, one mark and two
/// gaps count 1, mirrored for the opponent. A line scores at most once.
pub fn line_pattern_score<C: LineCell>(grid: &Grid<C>, perspective: Player) -> i64 {
    let opponent = perspective.opponent();
    let mut score = 0;

    for line in LINES {
        let mut own = 0;
        let mut theirs = 0;
        let mut open = 0;
        for coord in line {
            let cell = grid[coord.row][coord.col];
            match cell.owner() {
                Some(p) if p == perspective => own += 1,
                Some(p) if p == opponent => theirs += 1,
                _ if !cell.filled() => open += 1,
                _ => {}
            }
        }

        score += match (own, theirs, open) {
            (2, _, o) if o >= 1 => TWO_IN_LINE,
            (_, 2, o) if o >= 1 => -TWO_IN_LINE,
            (1, _, 2) => ONE_IN_LINE,
            (_, 1, 2) => -ONE_IN_LINE,
            _ => 0,
        };
    }

    score
}
