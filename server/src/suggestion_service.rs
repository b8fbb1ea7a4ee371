use tonic::{Request, Response, Status};
use uttt_common::log;
use uttt_common::proto::move_suggestion_server::MoveSuggestion;
use uttt_common::proto::{SuggestMoveRequest, SuggestMoveResponse};
use uttt_common::ultimate_tictactoe::{GameState, MinimaxAgent, SearchLimits};

use crate::config::ServerConfig;

/// Answers "what would you play here" for any legal snapshot. Holds no
/// per-game state; every request carries the full position.
#[derive(Debug, Clone)]
pub struct MoveSuggestionService {
    config: ServerConfig,
}

impl MoveSuggestionService {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }
}

#[tonic::async_trait]
impl MoveSuggestion for MoveSuggestionService {
    async fn suggest_move(
        &self,
        request: Request<SuggestMoveRequest>,
    ) -> Result<Response<SuggestMoveResponse>, Status> {
        let request = request.into_inner();
        let state = GameState::from_suggest_request(&request).map_err(|e| {
            log!("Rejected suggestion request: {}", e);
            Status::invalid_argument(e)
        })?;

        if state.is_terminal() {
            log!("Suggestion requested for finished game ({})", state.winner());
            return Ok(Response::new(SuggestMoveResponse {
                suggested_move: None,
                depth_reached: 0,
                score: 0,
            }));
        }

        let player = state.current_player();
        let limits = SearchLimits {
            time_budget: self.config.resolve_time_budget(request.time_budget_ms),
            max_depth: self.config.search.max_depth,
        };
        let mut agent = MinimaxAgent::new(player, self.config.search.evaluator(), limits);

        let report = tokio::task::spawn_blocking(move || agent.search(&state))
            .await
            .map_err(|e| Status::internal(format!("Search task failed: {}", e)))?
            .ok_or_else(|| Status::internal("Search agent refused to move"))?;

        log!(
            "Suggested {:?} for {} (depth {}, score {:?}, {} nodes, {} ms)",
            report.best_move,
            player,
            report.depth_reached,
            report.score,
            report.nodes,
            report.elapsed.as_millis()
        );

        Ok(Response::new(SuggestMoveResponse {
            suggested_move: report.best_move.map(|mv| mv.to_proto()),
            depth_reached: report.depth_reached,
            score: report.score.unwrap_or(0),
        }))
    }
}
