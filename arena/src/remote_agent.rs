use std::time::Duration;

use tokio::runtime::Handle;
use tonic::transport::Channel;
use uttt_common::log;
use uttt_common::proto::move_suggestion_client::MoveSuggestionClient;
use uttt_common::ultimate_tictactoe::{GameState, Move, MoveProvider};

/// Asks a move suggestion server for each move.
///
/// Every failure mode (connection, timeout, empty answer, out-of-range or
/// illegal move) is logged and reported as `None`. `choose_move` blocks on
/// the runtime handle, so it must be called from a blocking thread.
pub struct RemoteAgent {
    name: String,
    address: String,
    timeout: Duration,
    time_budget_ms: u32,
    runtime: Handle,
    client: Option<MoveSuggestionClient<Channel>>,
}

impl RemoteAgent {
    pub fn new(address: String, timeout: Duration, time_budget_ms: u32, runtime: Handle) -> Self {
        Self {
            name: format!("remote-{}", address),
            address,
            timeout,
            time_budget_ms,
            runtime,
            client: None,
        }
    }

    async fn request_move(&mut self, state: &GameState) -> Result<Move, String> {
        let client = match self.client.take() {
            Some(client) => client,
            None => MoveSuggestionClient::connect(self.address.clone())
                .await
                .map_err(|e| format!("Failed to connect to {}: {}", self.address, e))?,
        };
        let client = self.client.insert(client);

        let response = client
            .suggest_move(state.to_suggest_request(self.time_budget_ms))
            .await
            .map_err(|status| format!("Request failed: {}", status.message()))?
            .into_inner();

        let suggested = response
            .suggested_move
            .ok_or_else(|| "Server returned no move".to_string())?;
        let mv = Move::from_proto(&suggested)
            .ok_or_else(|| format!("Server returned out-of-range move {:?}", suggested))?;
        state
            .validate_move(&mv)
            .map_err(|e| format!("Server suggested illegal move {}: {}", mv, e))?;

        Ok(mv)
    }
}

impl MoveProvider for RemoteAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, state: &GameState) -> Option<Move> {
        let runtime = self.runtime.clone();
        let timeout = self.timeout;
        let result = runtime.block_on(tokio::time::timeout(timeout, self.request_move(state)));

        match result {
            Ok(Ok(mv)) => Some(mv),
            Ok(Err(e)) => {
                log!("{}: {}", self.name, e);
                None
            }
            Err(_) => {
                log!("{}: no answer within {} ms", self.name, timeout.as_millis());
                self.client = None;
                None
            }
        }
    }
}
