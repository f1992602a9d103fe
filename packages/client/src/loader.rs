// ABOUTME: Per-status load state for the seven workflow tables
// ABOUTME: Generation counter drops results of refreshes that were reset

use futures::future::join_all;
use std::collections::HashMap;

use llc_core::{LlcRecord, WorkflowStatus};

use crate::client::ApiClient;
use crate::error::LlcError;

/// Load state of one remote value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Loadable::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The record sets behind the seven status tables.
///
/// A reset invalidates any refresh still in flight: results are applied
/// only when they carry the generation current at apply time.
#[derive(Debug)]
pub struct StatusBoard {
    generation: u64,
    by_status: HashMap<WorkflowStatus, Loadable<Vec<LlcRecord>>>,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusBoard {
    pub fn new() -> Self {
        let by_status = WorkflowStatus::ALL
            .into_iter()
            .map(|s| (s, Loadable::Loading))
            .collect();
        Self {
            generation: 0,
            by_status,
        }
    }

    pub fn get(&self, status: WorkflowStatus) -> &Loadable<Vec<LlcRecord>> {
        &self.by_status[&status]
    }

    /// Records of one status, empty while loading or failed.
    pub fn records(&self, status: WorkflowStatus) -> &[LlcRecord] {
        self.get(status).loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Drop whatever is shown and invalidate in-flight refreshes.
    pub fn reset(&mut self) {
        self.generation += 1;
        for state in self.by_status.values_mut() {
            *state = Loadable::Loading;
        }
    }

    /// Mark every table loading and return the refresh generation.
    pub fn begin_refresh(&mut self) -> u64 {
        self.reset();
        self.generation
    }

    /// Apply one fetch result. Results from a superseded generation are
    /// dropped silently.
    pub fn apply(
        &mut self,
        generation: u64,
        status: WorkflowStatus,
        result: Result<Vec<LlcRecord>, LlcError>,
    ) {
        if generation != self.generation {
            tracing::debug!("Dropping stale refresh result for {}", status);
            return;
        }
        let state = match result {
            Ok(records) => Loadable::Loaded(records),
            Err(e) => Loadable::Failed(e.to_string()),
        };
        self.by_status.insert(status, state);
    }

    /// Fetch all seven status lists concurrently and apply the results.
    pub async fn refresh_all(&mut self, client: &ApiClient) {
        let generation = self.begin_refresh();
        let fetches = WorkflowStatus::ALL
            .into_iter()
            .map(|status| async move { (status, client.list_records(Some(status)).await) });
        for (status, result) in join_all(fetches).await {
            self.apply(generation, status, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64) -> LlcRecord {
        serde_json::from_value(serde_json::json!({"id": id, "status": "CLOSED"})).unwrap()
    }

    #[test]
    fn board_starts_loading_everywhere() {
        let board = StatusBoard::new();
        for status in WorkflowStatus::ALL {
            assert!(board.get(status).is_loading());
            assert!(board.records(status).is_empty());
        }
    }

    #[test]
    fn apply_fills_in_results_and_errors() {
        let mut board = StatusBoard::new();
        let generation = board.begin_refresh();

        board.apply(generation, WorkflowStatus::Closed, Ok(vec![record(1)]));
        board.apply(
            generation,
            WorkflowStatus::InPreparation,
            Err(LlcError::api("boom")),
        );

        assert_eq!(board.records(WorkflowStatus::Closed).len(), 1);
        assert_eq!(
            board.get(WorkflowStatus::InPreparation).error(),
            Some("API error: boom")
        );
        assert!(board.get(WorkflowStatus::WaitingForValidation).is_loading());
    }

    #[test]
    fn reset_drops_stale_in_flight_results() {
        let mut board = StatusBoard::new();
        let old = board.begin_refresh();

        board.reset();
        board.apply(old, WorkflowStatus::Closed, Ok(vec![record(1)]));
        // Result carried a superseded generation, so the table stays loading
        assert!(board.get(WorkflowStatus::Closed).is_loading());

        let current = board.begin_refresh();
        board.apply(current, WorkflowStatus::Closed, Ok(vec![record(2)]));
        assert_eq!(board.records(WorkflowStatus::Closed)[0].id, 2);
    }
}
