use crate::games::SessionRng;
use crate::log;
use super::evaluator::Evaluator;
use super::game_state::GameState;
use super::search::{SearchEngine, SearchLimits, SearchReport};
use super::types::{Move, Player};

/// Anything that can pick a move for the side to play. `None` means no move
/// was produced; the caller decides what to do about it.
pub trait MoveProvider: Send {
    fn name(&self) -> &str;

    fn choose_move(&mut self, state: &GameState) -> Option<Move>;
}

pub struct MinimaxAgent {
    name: String,
    player: Player,
    engine: SearchEngine,
    last_report: Option<SearchReport>,
}

impl MinimaxAgent {
    pub fn new(player: Player, evaluator: Evaluator, limits: SearchLimits) -> Self {
        Self {
            name: format!("minimax-{}", player),
            player,
            engine: SearchEngine::new(player, evaluator, limits),
            last_report: None,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    pub fn search(&mut self, state: &GameState) -> Option<SearchReport> {
        if state.current_player() != self.player {
            log!(
                "{} asked to move while {} is to play",
                self.name,
                state.current_player()
            );
            return None;
        }

        let report = self.engine.choose_move_with_report(state);
        log!(
            "{} picked {:?} at depth {} (score {:?}, {} nodes, {} ms)",
            self.name,
            report.best_move,
            report.depth_reached,
            report.score,
            report.nodes,
            report.elapsed.as_millis()
        );
        self.last_report = Some(report);
        Some(report)
    }
}

impl MoveProvider for MinimaxAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        self.search(state).and_then(|report| report.best_move)
    }
}

pub struct RandomAgent {
    name: String,
    rng: SessionRng,
}

impl RandomAgent {
    pub fn new(rng: SessionRng) -> Self {
        Self {
            name: format!("random-{}", rng.seed()),
            rng,
        }
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl MoveProvider for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        self.rng.choose(&state.legal_moves())
    }
}
