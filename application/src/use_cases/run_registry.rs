//! In-memory registry of quiz runs.
//!
//! Keeps the latest [`QuizRunReport`] of every run so clients can poll the
//! progress of a background run. The registry is bounded: once `capacity`
//! runs are stored, the oldest finished run is evicted to make room (or the
//! oldest run at all when every stored run is still in flight).

use quiz_domain::QuizRunReport;
use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;
use tracing::debug;

/// Default number of runs kept in memory
pub const DEFAULT_REGISTRY_CAPACITY: usize = 256;

#[derive(Default)]
struct Inner {
    runs: HashMap<String, QuizRunReport>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

pub struct RunRegistry {
    capacity: usize,
    inner: RwLock<Inner>,
}

impl Default for RunRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}

impl RunRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Store a report, replacing any previous report of the same run.
    pub async fn upsert(&self, report: QuizRunReport) {
        let mut inner = self.inner.write().await;

        if inner.runs.contains_key(&report.run_id) {
            inner.runs.insert(report.run_id.clone(), report);
            return;
        }

        if inner.runs.len() >= self.capacity {
            let victim_pos = inner
                .order
                .iter()
                .position(|id| inner.runs.get(id).is_some_and(QuizRunReport::is_finished))
                .unwrap_or(0);
            if let Some(victim) = inner.order.remove(victim_pos) {
                debug!(run_id = %victim, "Evicting run from registry");
                inner.runs.remove(&victim);
            }
        }

        inner.order.push_back(report.run_id.clone());
        inner.runs.insert(report.run_id.clone(), report);
    }

    pub async fn get(&self, run_id: &str) -> Option<QuizRunReport> {
        self.inner.read().await.runs.get(run_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.runs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Number of runs that have not reached a terminal status
    pub async fn active_count(&self) -> usize {
        self.inner
            .read()
            .await
            .runs
            .values()
            .filter(|r| !r.is_finished())
            .count()
    }
}
