//! In-Memory Run Tracker Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::{Arc, Mutex};

use crate::application::ports::{BookRun, BookRunState, RunError, RunSummary, RunTrackerPort};

/// 内存运行状态记录
pub struct InMemoryRunTracker {
    /// title -> BookRun
    runs: DashMap<String, BookRun>,
    /// 登记顺序
    order: Mutex<Vec<String>>,
}

impl InMemoryRunTracker {
    pub fn new() -> Self {
        Self {
            runs: DashMap::new(),
            order: Mutex::new(Vec::new()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryRunTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RunTrackerPort for InMemoryRunTracker {
    fn register(&self, title: &str) -> Result<(), RunError> {
        if self.runs.contains_key(title) {
            return Err(RunError::AlreadyExists(title.to_string()));
        }

        self.runs.insert(title.to_string(), BookRun::new(title));
        if let Ok(mut order) = self.order.lock() {
            order.push(title.to_string());
        }

        tracing::debug!(book = %title, "Book registered");
        Ok(())
    }

    fn get(&self, title: &str) -> Option<BookRun> {
        self.runs.get(title).map(|r| r.clone())
    }

    fn set_state(&self, title: &str, state: BookRunState) -> Result<(), RunError> {
        let mut run = self
            .runs
            .get_mut(title)
            .ok_or_else(|| RunError::NotFound(title.to_string()))?;

        let old_state = run.state;
        if !old_state.can_transition_to(state) {
            return Err(RunError::InvalidStateTransition(format!(
                "{}: {} -> {}",
                title,
                old_state.as_str(),
                state.as_str()
            )));
        }

        run.state = state;
        if state.is_terminal() {
            run.finished_at = Some(Utc::now());
        }

        tracing::debug!(
            book = %title,
            old_state = ?old_state,
            new_state = ?state,
            "Book state changed"
        );
        Ok(())
    }

    fn set_failed(&self, title: &str, error: String) -> Result<(), RunError> {
        let mut run = self
            .runs
            .get_mut(title)
            .ok_or_else(|| RunError::NotFound(title.to_string()))?;

        if run.state.is_terminal() {
            return Err(RunError::InvalidStateTransition(format!(
                "{}: {} -> failed",
                title,
                run.state.as_str()
            )));
        }

        run.failed_in = Some(run.state);
        run.state = BookRunState::Failed;
        run.error_message = Some(error);
        run.finished_at = Some(Utc::now());
        Ok(())
    }

    fn record_counts(
        &self,
        title: &str,
        relationships: usize,
        characters: usize,
    ) -> Result<(), RunError> {
        let mut run = self
            .runs
            .get_mut(title)
            .ok_or_else(|| RunError::NotFound(title.to_string()))?;

        run.relationships = relationships;
        run.characters = characters;
        Ok(())
    }

    fn all(&self) -> Vec<BookRun> {
        let order = match self.order.lock() {
            Ok(order) => order.clone(),
            Err(_) => return Vec::new(),
        };
        order.iter().filter_map(|title| self.get(title)).collect()
    }

    fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for run in self.runs.iter() {
            summary.total += 1;
            match run.state {
                BookRunState::Done => summary.done += 1,
                BookRunState::Failed => summary.failed += 1,
                _ => summary.unfinished += 1,
            }
        }
        summary
    }
}
