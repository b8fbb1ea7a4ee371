use std::fmt;
use std::iter;
use std::time::{Duration, Instant};

use crate::log;
use super::evaluator::Evaluator;
use super::game_state::{GameState, IllegalMove};
use super::types::{Move, Player, TOTAL_CELLS};

pub const MAX_SEARCH_DEPTH: u32 = TOTAL_CELLS as u32;

/// Share of the budget after which no new depth is started.
const DEADLINE_FACTOR: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub time_budget: Duration,
    pub max_depth: Option<u32>,
}

impl SearchLimits {
    pub fn with_time(time_budget: Duration) -> Self {
        Self {
            time_budget,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i64,
    pub nodes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub best_move: Option<Move>,
    pub score: Option<i64>,
    pub depth_reached: u32,
    pub nodes: u64,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    IllegalMove { mv: Move, source: IllegalMove },
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::IllegalMove { mv, source } => {
                write!(f, "Search tried illegal move {}: {}", mv, source)
            }
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SearchError::IllegalMove { source, .. } => Some(source),
        }
    }
}

/// Iterative-deepening alpha-beta search for one player.
///
/// The clock is only consulted between depths, so a single deep iteration
/// can run past the budget before the search notices.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    perspective: Player,
    evaluator: Evaluator,
    limits: SearchLimits,
}

impl SearchEngine {
    pub fn new(perspective: Player, evaluator: Evaluator, limits: SearchLimits) -> Self {
        Self {
            perspective,
            evaluator,
            limits,
        }
    }

    pub fn perspective(&self) -> Player {
        self.perspective
    }

    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn choose_move(&self, state: &GameState) -> Option<Move> {
        self.choose_move_with_report(state).best_move
    }

    pub fn choose_move_with_report(&self, state: &GameState) -> SearchReport {
        let start = Instant::now();
        let legal_moves = state.legal_moves();

        let mut report = SearchReport {
            best_move: legal_moves.first().copied(),
            score: None,
            depth_reached: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        };
        let Some(mut best_move) = report.best_move else {
            return report;
        };

        let deadline = self.limits.time_budget.mul_f64(DEADLINE_FACTOR);
        let depth_cap = self.depth_cap(state);
        let mut depth = 1;

        while depth <= depth_cap && start.elapsed() <= deadline {
            let ordered: Vec<Move> = if depth > 1 {
                iter::once(best_move)
                    .chain(legal_moves.iter().copied().filter(|&mv| mv != best_move))
                    .collect()
            } else {
                legal_moves.clone()
            };

            match self.search_depth(state, depth, Some(&ordered)) {
                Ok(result) => {
                    if let Some(mv) = result.best_move {
                        best_move = mv;
                    }
                    report.score = Some(result.score);
                    report.depth_reached = depth;
                    report.nodes += result.nodes;
                }
                Err(e) => {
                    log!("Search for {} stopped at depth {}: {}", self.perspective, depth, e);
                    break;
                }
            }
            depth += 1;
        }

        report.best_move = Some(best_move);
        report.elapsed = start.elapsed();
        report
    }

    /// Depths past the number of empty cells explore nothing new.
    fn depth_cap(&self, state: &GameState) -> u32 {
        let remaining = state.empty_cell_count() as u32;
        let configured = self.limits.max_depth.unwrap_or(MAX_SEARCH_DEPTH);
        configured.min(remaining).max(1)
    }

    /// Full-width alpha-beta to a fixed depth. `root_order` replaces the
    /// canonical move order at the root only.
    pub fn search_depth(
        &self,
        state: &GameState,
        depth: u32,
        root_order: Option<&[Move]>,
    ) -> Result<SearchResult, SearchError> {
        let mut nodes = 0;
        let maximizing = state.current_player() == self.perspective;
        let (score, best_move) = self.minimax(
            state,
            depth,
            i64::MIN,
            i64::MAX,
            maximizing,
            root_order,
            &mut nodes,
        )?;
        Ok(SearchResult {
            best_move,
            score,
            nodes,
        })
    }

    fn minimax(
        &self,
        state: &GameState,
        depth: u32,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        moves: Option<&[Move]>,
        nodes: &mut u64,
    ) -> Result<(i64, Option<Move>), SearchError> {
        *nodes += 1;

        let generated;
        let moves = match moves {
            Some(moves) => moves,
            None => {
                generated = state.legal_moves();
                &generated[..]
            }
        };

        if depth == 0 || state.is_terminal() || moves.is_empty() {
            return Ok((self.evaluator.score(state, self.perspective), None));
        }

        let mut best_move = None;
        let mut value = if maximizing { i64::MIN } else { i64::MAX };

        for &mv in moves {
            let child = state
                .after_move(mv)
                .map_err(|source| SearchError::IllegalMove { mv, source })?;
            let (score, _) = self.minimax(&child, depth - 1, alpha, beta, !maximizing, None, nodes)?;

            if maximizing {
                if score > value {
                    value = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(value);
            } else {
                if score < value {
                    value = score;
                    best_move = Some(mv);
                }
                beta = beta.min(value);
            }

            if beta <= alpha {
                break;
            }
        }

        Ok((value, best_move))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::ultimate_tictactoe::evaluator::WIN_SCORE;
    use crate::games::ultimate_tictactoe::game_state::test_support::*;
    use crate::games::ultimate_tictactoe::types::{Coord, Mark};

    fn engine(perspective: Player, max_depth: Option<u32>) -> SearchEngine {
        SearchEngine::new(
            perspective,
            Evaluator::default(),
            SearchLimits {
                time_budget: Duration::from_secs(60),
                max_depth,
            },
        )
    }

    /// X owns boards (0,0) and (0,1) and needs cell (2,2) of board (0,2).
    fn one_move_from_global_win() -> GameState {
        let mut boards = [[Mark::Empty; 9]; 9];
        boards[0] = X_ROW_BOARD;
        boards[1] = X_ROW_BOARD;
        boards[2] = [
            Mark::O, Mark::O, Mark::Empty,
            Mark::Empty, Mark::Empty, Mark::Empty,
            Mark::X, Mark::X, Mark::Empty,
        ];
        boards[8][0] = Mark::O;
        boards[8][4] = Mark::O;
        GameState::from_snapshot(&cells_from_boards(boards), Some(Coord::new(0, 2)), Player::X)
            .unwrap()
    }

    fn plain_minimax(
        engine: &SearchEngine,
        state: &GameState,
        depth: u32,
        maximizing: bool,
    ) -> i64 {
        let moves = state.legal_moves();
        if depth == 0 || state.is_terminal() || moves.is_empty() {
            return engine.evaluator.score(state, engine.perspective);
        }
        let scores = moves.iter().map(|&mv| {
            let child = state.after_move(mv).unwrap();
            plain_minimax(engine, &child, depth - 1, !maximizing)
        });
        if maximizing {
            scores.max().unwrap()
        } else {
            scores.min().unwrap()
        }
    }

    #[test]
    fn test_finds_winning_move_regardless_of_order() {
        let state = one_move_from_global_win();
        let winning = Move::new(0, 2, 2, 2);
        let legal = state.legal_moves();
        assert_eq!(legal.last(), Some(&winning));

        let engine = engine(Player::X, None);
        let mut reversed = legal.clone();
        reversed.reverse();

        for depth in [2, 3] {
            let natural = engine.search_depth(&state, depth, None).unwrap();
            assert_eq!(natural.best_move, Some(winning));
            assert_eq!(natural.score, WIN_SCORE);

            let flipped = engine.search_depth(&state, depth, Some(&reversed)).unwrap();
            assert_eq!(flipped.best_move, Some(winning));
        }

        let timed = SearchEngine::new(
            Player::X,
            Evaluator::default(),
            SearchLimits::with_time(Duration::from_millis(200)),
        );
        assert_eq!(timed.choose_move(&state), Some(winning));
    }

    #[test]
    fn test_no_legal_moves_returns_none() {
        let state = GameState::set_raw(cells_from_boards([DRAWN_BOARD; 9]), None, Player::X);
        let report = engine(Player::X, None).choose_move_with_report(&state);
        assert_eq!(report.best_move, None);
        assert_eq!(report.depth_reached, 0);
    }

    #[test]
    fn test_fixed_depth_is_deterministic() {
        let state = play(&[(1, 1, 1, 1), (1, 1, 0, 0), (0, 0, 1, 1)]);
        let first = engine(Player::O, Some(3)).choose_move_with_report(&state);
        let second = engine(Player::O, Some(3)).choose_move_with_report(&state);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.depth_reached, 3);
        assert!(state.legal_moves().contains(&first.best_move.unwrap()));
    }

    #[test]
    fn test_pruning_matches_plain_minimax() {
        let positions = [
            play(&[(1, 1, 1, 1)]),
            play(&[(1, 1, 1, 1), (1, 1, 0, 0), (0, 0, 1, 1)]),
            play(&[(0, 0, 2, 2), (2, 2, 0, 0), (0, 0, 0, 0), (0, 0, 1, 1)]),
            one_move_from_global_win(),
        ];
        for state in positions {
            let perspective = state.current_player();
            let engine = engine(perspective, None);
            for depth in 1..=3 {
                let pruned = engine.search_depth(&state, depth, None).unwrap();
                let plain = plain_minimax(&engine, &state, depth, true);
                assert_eq!(pruned.score, plain, "depth {}", depth);
            }
        }
    }

    #[test]
    fn test_root_tie_break_prefers_first_move() {
        // Every board's center cell scores the same at depth 1; the earliest
        // one in canonical order must win the tie.
        let state = GameState::new();
        let engine = engine(Player::X, None);
        let result = engine.search_depth(&state, 1, None).unwrap();
        let best = result.best_move.unwrap();
        assert_eq!(best, Move::new(0, 0, 1, 1));
        let evaluator = Evaluator::default();
        let best_score = evaluator.score(&state.after_move(best).unwrap(), Player::X);
        assert_eq!(best_score, result.score);
        for mv in state.legal_moves().into_iter().take_while(|&mv| mv != best) {
            let score = evaluator.score(&state.after_move(mv).unwrap(), Player::X);
            assert!(score < best_score);
        }
    }

    #[test]
    fn test_search_respects_depth_cap() {
        let state = play(&[(1, 1, 1, 1)]);
        let report = engine(Player::O, Some(2)).choose_move_with_report(&state);
        assert_eq!(report.depth_reached, 2);
        assert!(report.nodes > 0);
    }

    #[test]
    fn test_search_from_opponent_perspective_minimizes_at_root() {
        let state = one_move_from_global_win();
        // O evaluates X's options; X's best reply is still the winning move,
        // which is the worst outcome for O.
        let result = engine(Player::O, None).search_depth(&state, 1, None).unwrap();
        assert_eq!(result.best_move, Some(Move::new(0, 2, 2, 2)));
        assert_eq!(result.score, -WIN_SCORE);
    }
}
