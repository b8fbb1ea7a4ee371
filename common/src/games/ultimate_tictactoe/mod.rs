mod agents;
mod evaluator;
mod game_state;
mod proto_convert;
mod search;
mod types;
mod win_detector;

pub use agents::{MinimaxAgent, MoveProvider, RandomAgent};
pub use evaluator::{Evaluator, EvaluatorWeights, WIN_SCORE, line_pattern_score};
pub use game_state::{GameState, IllegalMove, SnapshotError};
pub use search::{MAX_SEARCH_DEPTH, SearchEngine, SearchError, SearchLimits, SearchReport, SearchResult};
pub use types::{BOARD_COUNT, CELLS_PER_BOARD, Coord, GRID_SIZE, Mark, Move, Outcome, Player, TOTAL_CELLS};
pub use win_detector::{Grid, LINES, LineCell, check_win, check_win_with_line, classify};
