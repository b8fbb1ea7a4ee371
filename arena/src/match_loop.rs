use std::fmt;

use uttt_common::log;
use uttt_common::move_log::{MoveLogError, MoveLogRecord, MoveLogWriter};
use uttt_common::ultimate_tictactoe::{
    GameState, IllegalMove, MoveProvider, Outcome, Player, RandomAgent,
};

use crate::config::FallbackPolicy;

#[derive(Debug)]
pub enum ArenaError {
    MoveLogError(MoveLogError),
    IllegalMove(IllegalMove),
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::MoveLogError(e) => write!(f, "Move log error: {}", e),
            ArenaError::IllegalMove(e) => write!(f, "Illegal move: {}", e),
        }
    }
}

impl std::error::Error for ArenaError {}

impl From<MoveLogError> for ArenaError {
    fn from(e: MoveLogError) -> Self {
        ArenaError::MoveLogError(e)
    }
}

impl From<IllegalMove> for ArenaError {
    fn from(e: IllegalMove) -> Self {
        ArenaError::IllegalMove(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    Finished(Outcome),
    Resigned { loser: Player },
}

impl GameResult {
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Finished(outcome) => outcome.winner(),
            GameResult::Resigned { loser } => Some(loser.opponent()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchSummary {
    pub games: u32,
    pub x_wins: u32,
    pub o_wins: u32,
    pub draws: u32,
    pub resignations: u32,
    pub fallback_moves: u32,
}

impl MatchSummary {
    fn record(&mut self, result: GameResult) {
        self.games += 1;
        if let GameResult::Resigned { .. } = result {
            self.resignations += 1;
        }
        match result.winner() {
            Some(Player::X) => self.x_wins += 1,
            Some(Player::O) => self.o_wins += 1,
            None => self.draws += 1,
        }
    }
}

impl fmt::Display for MatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} games: X won {}, O won {}, {} drawn ({} by resignation, {} fallback moves)",
            self.games, self.x_wins, self.o_wins, self.draws, self.resignations, self.fallback_moves
        )
    }
}

/// Plays complete games between two agents. Positions only ever change
/// through `GameState::apply_move`.
pub struct Arena {
    x: Box<dyn MoveProvider>,
    o: Box<dyn MoveProvider>,
    fallback: FallbackPolicy,
    fallback_agent: RandomAgent,
    move_log: Option<MoveLogWriter>,
    summary: MatchSummary,
}

impl Arena {
    pub fn new(
        x: Box<dyn MoveProvider>,
        o: Box<dyn MoveProvider>,
        fallback: FallbackPolicy,
        fallback_agent: RandomAgent,
        move_log: Option<MoveLogWriter>,
    ) -> Self {
        Self {
            x,
            o,
            fallback,
            fallback_agent,
            move_log,
            summary: MatchSummary::default(),
        }
    }

    pub fn summary(&self) -> MatchSummary {
        self.summary
    }

    pub fn run(&mut self, games: u32) -> Result<MatchSummary, ArenaError> {
        for game in 1..=games {
            let result = self.play_game(game)?;
            log!("Game {} result: {:?}", game, result);
        }
        Ok(self.summary())
    }

    pub fn play_game(&mut self, game: u32) -> Result<GameResult, ArenaError> {
        let mut state = GameState::new();

        while !state.is_terminal() {
            let player = state.current_player();
            let agent = match player {
                Player::X => &mut self.x,
                Player::O => &mut self.o,
            };

            let proposed = agent.choose_move(&state).filter(|mv| match state.validate_move(mv) {
                Ok(()) => true,
                Err(e) => {
                    log!("Game {}: {} proposed {}: {}", game, agent.name(), mv, e);
                    false
                }
            });

            let mv = match (proposed, self.fallback) {
                (Some(mv), _) => mv,
                (None, FallbackPolicy::Resign) => {
                    log!("Game {}: {} ({}) resigns", game, agent.name(), player);
                    let result = GameResult::Resigned { loser: player };
                    self.summary.record(result);
                    return Ok(result);
                }
                (None, FallbackPolicy::Random) => {
                    // A live position always has a legal move.
                    let Some(mv) = self.fallback_agent.choose_move(&state) else {
                        break;
                    };
                    log!("Game {}: {} gave no move, playing random {}", game, agent.name(), mv);
                    self.summary.fallback_moves += 1;
                    mv
                }
            };

            if let Some(writer) = self.move_log.as_mut() {
                writer.append(&MoveLogRecord::capture(&state, mv, None))?;
            }
            state.apply_move(mv)?;
            log!("Game {}: {} played {}", game, player, mv);
        }

        let result = GameResult::Finished(state.winner());
        self.summary.record(result);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use uttt_common::games::SessionRng;
    use uttt_common::move_log::load_move_log;
    use uttt_common::ultimate_tictactoe::{Evaluator, MinimaxAgent, Move, SearchLimits};

    /// Answers from a script, then gives up.
    struct Scripted {
        moves: Vec<Option<Move>>,
    }

    impl MoveProvider for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn choose_move(&mut self, _state: &GameState) -> Option<Move> {
            if self.moves.is_empty() {
                None
            } else {
                self.moves.remove(0)
            }
        }
    }

    fn random(seed: u64) -> Box<dyn MoveProvider> {
        Box::new(RandomAgent::new(SessionRng::new(seed)))
    }

    fn arena(
        x: Box<dyn MoveProvider>,
        o: Box<dyn MoveProvider>,
        fallback: FallbackPolicy,
        move_log: Option<MoveLogWriter>,
    ) -> Arena {
        Arena::new(x, o, fallback, RandomAgent::new(SessionRng::new(7)), move_log)
    }

    #[test]
    fn test_random_games_reach_terminal_results() {
        let mut arena = arena(random(1), random(2), FallbackPolicy::Random, None);
        let summary = arena.run(5).unwrap();

        assert_eq!(summary.games, 5);
        assert_eq!(summary.x_wins + summary.o_wins + summary.draws, 5);
        assert_eq!(summary.resignations, 0);
        assert_eq!(summary.fallback_moves, 0);
    }

    #[test]
    fn test_seeded_matches_repeat() {
        let first = arena(random(11), random(12), FallbackPolicy::Random, None)
            .run(3)
            .unwrap();
        let second = arena(random(11), random(12), FallbackPolicy::Random, None)
            .run(3)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resign_policy_awards_game_to_opponent() {
        let x = Box::new(Scripted {
            moves: vec![Some(Move::new(1, 1, 1, 1))],
        });
        let mut arena = arena(x, random(3), FallbackPolicy::Resign, None);

        let result = arena.play_game(1).unwrap();
        assert_eq!(result, GameResult::Resigned { loser: Player::X });
        assert_eq!(result.winner(), Some(Player::O));
        assert_eq!(arena.summary().o_wins, 1);
        assert_eq!(arena.summary().resignations, 1);
    }

    #[test]
    fn test_random_policy_replaces_missing_and_illegal_moves() {
        let x = Box::new(Scripted {
            // The second answer targets the wrong board.
            moves: vec![Some(Move::new(1, 1, 1, 1)), Some(Move::new(2, 2, 2, 2))],
        });
        let mut arena = arena(x, random(4), FallbackPolicy::Random, None);

        let result = arena.play_game(1).unwrap();
        assert!(matches!(result, GameResult::Finished(outcome) if outcome.is_decided()));
        assert!(arena.summary().fallback_moves >= 2);
    }

    #[test]
    fn test_move_log_gets_one_record_per_move() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("arena.jsonl");
        let writer = MoveLogWriter::open(&path).unwrap();
        let mut arena = arena(random(5), random(6), FallbackPolicy::Random, Some(writer));
        arena.play_game(1).unwrap();

        let records = load_move_log(&path).unwrap();
        assert!(records.len() >= 17);

        let mut replay = GameState::new();
        for record in &records {
            assert_eq!(record.to_game_state(), Ok(replay));
            assert!(record.legal_moves.contains(&record.best_move));
            replay.apply_move(record.best_move).unwrap();
        }
        assert!(replay.is_terminal());
    }

    #[test]
    fn test_minimax_agent_completes_a_game() {
        let limits = SearchLimits {
            time_budget: Duration::from_secs(30),
            max_depth: Some(2),
        };
        let x = Box::new(MinimaxAgent::new(Player::X, Evaluator::default(), limits));
        let mut arena = arena(x, random(8), FallbackPolicy::Resign, None);
        let result = arena.play_game(1).unwrap();
        assert!(matches!(result, GameResult::Finished(_)));
    }
}
