//! Shared server state and background run scheduling.

use quiz_application::{RunRegistry, SolveQuizUseCase};
use quiz_domain::{QuizRequest, QuizRunReport};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{Instrument, info, info_span};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    solver: Arc<SolveQuizUseCase>,
    registry: Arc<RunRegistry>,
    /// Bounds the number of runs executing at the same time
    permits: Arc<Semaphore>,
    shutdown: CancellationToken,
    tasks: TaskTracker,
}

impl AppState {
    pub fn new(solver: SolveQuizUseCase, registry: Arc<RunRegistry>, max_concurrent_runs: usize) -> Self {
        Self {
            solver: Arc::new(solver.with_registry(registry.clone())),
            registry,
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
            shutdown: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    pub fn registry(&self) -> &RunRegistry {
        &self.registry
    }

    /// Register the run and start it in the background.
    ///
    /// The run waits for a free slot first; a run still waiting at shutdown
    /// finishes as cancelled without touching the network.
    pub async fn spawn_run(&self, run_id: String, request: QuizRequest) {
        let report = QuizRunReport::new(&run_id, &request.url);
        self.registry.upsert(report.clone()).await;

        let solver = self.solver.clone();
        let permits = self.permits.clone();
        let cancel = self.shutdown.child_token();
        let span = info_span!("run", run_id = %run_id);

        self.tasks.spawn(
            async move {
                let _permit = tokio::select! {
                    permit = permits.acquire_owned() => permit.ok(),
                    _ = cancel.cancelled() => None,
                };
                let report = solver.execute_report(report, &request, &cancel).await;
                info!(status = ?report.status, "Run ended");
            }
            .instrument(span),
        );
    }

    /// Cancel in-flight runs and wait for them to record their final report.
    pub async fn shutdown(&self) {
        let in_flight = self.tasks.len();
        if in_flight > 0 {
            info!(in_flight, "Cancelling runs");
        }
        self.shutdown.cancel();
        self.tasks.close();
        self.tasks.wait().await;
    }
}
