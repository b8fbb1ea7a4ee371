use std::time::Duration;
use serde::{Deserialize, Serialize};

use crate::games::ultimate_tictactoe::{Evaluator, EvaluatorWeights, MAX_SEARCH_DEPTH, SearchLimits};
use super::Validate;

pub const DEFAULT_TIME_BUDGET_MS: u64 = 2000;

/// Bot tuning shared by the server and the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub time_budget_ms: u64,
    pub max_depth: Option<u32>,
    pub weights: EvaluatorWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget_ms: DEFAULT_TIME_BUDGET_MS,
            max_depth: None,
            weights: EvaluatorWeights::default(),
        }
    }
}

impl SearchConfig {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.weights.clone())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            time_budget: self.time_budget(),
            max_depth: self.max_depth,
        }
    }
}

impl Validate for SearchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.time_budget_ms == 0 {
            return Err("Time budget must be positive".to_string());
        }
        if self.time_budget_ms > 600_000 {
            return Err(format!(
                "Time budget ({} ms) cannot exceed 600000 ms",
                self.time_budget_ms
            ));
        }
        if let Some(depth) = self.max_depth
            && (depth == 0 || depth > MAX_SEARCH_DEPTH)
        {
            return Err(format!(
                "Max depth must be between 1 and {}, got {}",
                MAX_SEARCH_DEPTH, depth
            ));
        }
        self.weights.validate()
    }
}
