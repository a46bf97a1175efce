//! Solve Quiz use case.
//!
//! Walks a chain of quiz pages. Each step:
//!
//! 1. Render the current page with the [`PageScraper`]
//! 2. Ask the model for the submit URL and the question (JSON, retried)
//! 3. Ask the model for Python code defining `get_answer()`
//! 4. Run the code with the [`CodeRunner`] (a failure yields a `null` answer)
//! 5. Post the answer with the [`AnswerSubmitter`]
//! 6. Follow the next URL while the server keeps answering `correct: true`
//!
//! The use case never fails: every outcome ends up in the returned
//! [`QuizRunReport`].

use crate::config::SolverParams;
use crate::ports::answer_submitter::AnswerSubmitter;
use crate::ports::code_runner::CodeRunner;
use crate::ports::llm_gateway::{GenerateRequest, LlmGateway};
use crate::ports::page_scraper::PageScraper;
use crate::ports::run_logger::{NoRunLogger, RunEvent, RunLogger};
use crate::use_cases::run_registry::RunRegistry;
use quiz_domain::util::preview;
use quiz_domain::{
    PromptTemplate, QuizRequest, QuizRunReport, RunStage, RunStatus, StepRecord, Submission,
    TaskAnalysis, resolve_submit_url, strip_code_fence,
};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What to do after a step
enum StepFlow {
    Next(String),
    Stop(RunStatus),
}

/// Use case for solving a chain of quiz pages.
#[derive(Clone)]
pub struct SolveQuizUseCase {
    gateway: Arc<dyn LlmGateway>,
    scraper: Arc<dyn PageScraper>,
    runner: Arc<dyn CodeRunner>,
    submitter: Arc<dyn AnswerSubmitter>,
    run_logger: Arc<dyn RunLogger>,
    registry: Option<Arc<RunRegistry>>,
    params: SolverParams,
}

impl SolveQuizUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        scraper: Arc<dyn PageScraper>,
        runner: Arc<dyn CodeRunner>,
        submitter: Arc<dyn AnswerSubmitter>,
        params: SolverParams,
    ) -> Self {
        Self {
            gateway,
            scraper,
            runner,
            submitter,
            run_logger: Arc::new(NoRunLogger),
            registry: None,
            params,
        }
    }

    /// Create with a run logger.
    pub fn with_run_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.run_logger = logger;
        self
    }

    /// Publish intermediate reports to a registry after every step.
    pub fn with_registry(mut self, registry: Arc<RunRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Run the solving loop for one request.
    pub async fn execute(
        &self,
        run_id: &str,
        request: &QuizRequest,
        cancel: &CancellationToken,
    ) -> QuizRunReport {
        self.execute_report(QuizRunReport::new(run_id, &request.url), request, cancel)
            .await
    }

    /// Run the solving loop, continuing a report created when the request
    /// was accepted (its `started_at` is kept).
    pub async fn execute_report(
        &self,
        mut report: QuizRunReport,
        request: &QuizRequest,
        cancel: &CancellationToken,
    ) -> QuizRunReport {
        let run_id = report.run_id.clone();
        let run_id = run_id.as_str();
        self.publish(&report).await;
        self.log(run_id, "run_started", json!({ "url": request.url }));

        let mut current_url = request.url.clone();
        let mut status = RunStatus::StepLimitReached;

        for step in 1..=self.params.max_steps {
            if cancel.is_cancelled() {
                status = RunStatus::Cancelled;
                break;
            }

            info!(run_id, step, url = %current_url, "Processing quiz page");
            let mut record = StepRecord::new(step, &current_url);

            let flow = tokio::select! {
                flow = self.solve_step(run_id, request, &mut record) => flow,
                _ = cancel.cancelled() => StepFlow::Stop(RunStatus::Cancelled),
            };

            report.push_step(record);
            match flow {
                StepFlow::Next(next_url) => {
                    current_url = next_url;
                    self.publish(&report).await;
                }
                StepFlow::Stop(terminal) => {
                    status = terminal;
                    break;
                }
            }
        }

        if status == RunStatus::StepLimitReached {
            warn!(run_id, max_steps = self.params.max_steps, "Step limit reached");
        }
        info!(run_id, status = ?status, steps = report.steps.len(), "Quiz run finished");

        report.finish(status);
        self.log(
            run_id,
            "run_finished",
            json!({ "status": report.status, "steps": report.steps.len() }),
        );
        self.publish(&report).await;
        report
    }

    async fn solve_step(
        &self,
        run_id: &str,
        request: &QuizRequest,
        record: &mut StepRecord,
    ) -> StepFlow {
        let current_url = record.page_url.clone();

        // 1. Render the page
        let page = match self.scraper.scrape(&current_url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(run_id, url = %current_url, error = %e, "Scraping failed");
                return StepFlow::Stop(RunStatus::failed(RunStage::Scrape, e.to_string()));
            }
        };
        if page.text.is_empty() {
            warn!(run_id, url = %current_url, "Page has no visible text, content may need JavaScript");
        }
        self.log(
            run_id,
            "page_scraped",
            json!({
                "step": record.step,
                "url": current_url,
                "html_bytes": page.html.len(),
                "text_bytes": page.text.len(),
                "text_preview": preview(&page.text, 200),
            }),
        );

        // 2. Extract the task
        let Some(analysis) = self.analyze_page(run_id, &page.html).await else {
            warn!(run_id, url = %current_url, "Failed to analyze page or find submit URL");
            return StepFlow::Stop(RunStatus::failed(
                RunStage::Analyze,
                "no submit URL found on page",
            ));
        };
        info!(run_id, question = %preview(analysis.question_or_none(), 200), "Task extracted");
        info!(run_id, submit_url = %analysis.submit_url, "Submit target");
        record.submit_url = Some(analysis.submit_url.clone());
        record.question = analysis.question.clone();
        self.log(
            run_id,
            "task_extracted",
            json!({
                "step": record.step,
                "submit_url": analysis.submit_url,
                "question": analysis.question,
            }),
        );

        // 3. Generate code
        let code_request = GenerateRequest::new(
            self.params.model.clone(),
            PromptTemplate::solve_code(analysis.question_or_none()),
        );
        let generated = match self.gateway.generate(&code_request).await {
            Ok(text) => text,
            Err(e) => {
                warn!(run_id, error = %e, "Code generation failed");
                return StepFlow::Stop(RunStatus::failed(RunStage::Generate, e.to_string()));
            }
        };
        let code = strip_code_fence(&generated);
        debug!(run_id, bytes = code.len(), "Generated code");

        // 4. Execute
        let answer = match self.runner.run(&code).await {
            Ok(value) => value,
            Err(e) => {
                warn!(run_id, error = %e, "Code execution failed, submitting null answer");
                self.log(
                    run_id,
                    "execution_failed",
                    json!({ "step": record.step, "error": e.to_string() }),
                );
                Value::Null
            }
        };
        info!(run_id, answer = %preview(&answer.to_string(), 200), "Calculated answer");
        record.answer = Some(answer.clone());

        // 5. Submit
        let submit_url = match resolve_submit_url(&current_url, &analysis.submit_url) {
            Ok(url) => url,
            Err(e) => {
                warn!(run_id, error = %e, "Could not resolve submit URL");
                return StepFlow::Stop(RunStatus::failed(RunStage::Submit, e.to_string()));
            }
        };
        record.submit_url = Some(submit_url.clone());

        let submission = Submission {
            email: request.email.clone(),
            secret: request.secret.clone(),
            url: current_url.clone(),
            answer,
        };
        info!(run_id, url = %submit_url, "Posting answer");
        let outcome = match self.submitter.submit(&submit_url, &submission).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(run_id, error = %e, "Submission failed");
                return StepFlow::Stop(RunStatus::failed(RunStage::Submit, e.to_string()));
            }
        };
        record.correct = outcome.correct;
        record.next_url = outcome.next_url().map(str::to_string);
        self.log(
            run_id,
            "answer_submitted",
            json!({
                "step": record.step,
                "submit_url": submit_url,
                "answer": submission.answer,
                "correct": outcome.correct,
                "next_url": outcome.url,
                "reason": outcome.reason,
            }),
        );

        // 6. Next step
        if !outcome.is_correct() {
            info!(run_id, reason = ?outcome.reason, "Answer incorrect, stopping");
            return StepFlow::Stop(RunStatus::Incorrect);
        }
        match outcome.next_url() {
            Some(next) => StepFlow::Next(next.to_string()),
            None => {
                info!(run_id, "Quiz completed successfully");
                StepFlow::Stop(RunStatus::Completed)
            }
        }
    }

    /// Ask the model for the task, retrying gateway errors.
    ///
    /// A successful call ends the retries even when its text cannot be
    /// parsed.
    async fn analyze_page(&self, run_id: &str, html: &str) -> Option<TaskAnalysis> {
        let request = GenerateRequest::new(
            self.params.model.clone(),
            PromptTemplate::analysis(html, self.params.page_char_limit),
        )
        .json();

        let attempts = self.params.analysis_attempts;
        for attempt in 1..=attempts {
            match self.gateway.generate(&request).await {
                Ok(text) => {
                    let analysis = TaskAnalysis::from_llm_text(&text);
                    if analysis.is_none() {
                        warn!(run_id, raw = %preview(&text, 500), "Could not parse analysis response");
                    }
                    return analysis;
                }
                Err(e) => {
                    warn!(run_id, attempt, attempts, error = %e, "Analysis request failed");
                    if attempt < attempts {
                        tokio::time::sleep(self.params.analysis_retry_delay).await;
                    }
                }
            }
        }
        None
    }

    async fn publish(&self, report: &QuizRunReport) {
        if let Some(registry) = &self.registry {
            registry.upsert(report.clone()).await;
        }
    }

    fn log(&self, run_id: &str, event_type: &'static str, payload: Value) {
        self.run_logger.log(RunEvent::new(run_id, event_type, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::answer_submitter::SubmitError;
    use crate::ports::code_runner::ExecutionError;
    use crate::ports::llm_gateway::{GatewayError, ResponseFormat};
    use crate::ports::page_scraper::ScrapeError;
    use async_trait::async_trait;
    use quiz_domain::{PageSnapshot, SubmitOutcome};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Mocks ====================

    #[derive(Default)]
    struct MockGateway {
        analysis: Mutex<VecDeque<Result<String, GatewayError>>>,
        code: Mutex<VecDeque<Result<String, GatewayError>>>,
        analysis_calls: AtomicUsize,
    }

    impl MockGateway {
        fn with_analysis(self, r: Result<String, GatewayError>) -> Self {
            self.analysis.lock().unwrap().push_back(r);
            self
        }

        fn with_code(self, r: Result<String, GatewayError>) -> Self {
            self.code.lock().unwrap().push_back(r);
            self
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn generate(&self, request: &GenerateRequest) -> Result<String, GatewayError> {
            match request.response_format {
                ResponseFormat::Json => {
                    self.analysis_calls.fetch_add(1, Ordering::SeqCst);
                    self.analysis.lock().unwrap().pop_front().unwrap_or_else(|| {
                        Ok(r#"{"submit_url": "https://quiz.test/submit", "question": "q"}"#
                            .to_string())
                    })
                }
                ResponseFormat::Text => self
                    .code
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Ok("def get_answer():\n    return 42".to_string())),
            }
        }

        async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
            Ok(vec!["gemini-2.0-flash-001".to_string()])
        }
    }

    #[derive(Default)]
    struct MockScraper {
        fail: bool,
        visited: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PageScraper for MockScraper {
        async fn scrape(&self, url: &str) -> Result<PageSnapshot, ScrapeError> {
            self.visited.lock().unwrap().push(url.to_string());
            if self.fail {
                return Err(ScrapeError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()));
            }
            Ok(PageSnapshot::new(url, "<html><body>quiz</body></html>", "quiz"))
        }
    }

    struct MockRunner {
        result: Mutex<Option<Result<Value, ExecutionError>>>,
        seen_code: Mutex<Vec<String>>,
    }

    impl MockRunner {
        fn returning(result: Result<Value, ExecutionError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                seen_code: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CodeRunner for MockRunner {
        async fn run(&self, code: &str) -> Result<Value, ExecutionError> {
            self.seen_code.lock().unwrap().push(code.to_string());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Ok(json!(42)))
        }
    }

    #[derive(Default)]
    struct MockSubmitter {
        outcomes: Mutex<VecDeque<Result<SubmitOutcome, SubmitError>>>,
        repeat_next: Option<String>,
        posted: Mutex<Vec<(String, Submission)>>,
    }

    impl MockSubmitter {
        fn with(self, outcome: Result<SubmitOutcome, SubmitError>) -> Self {
            self.outcomes.lock().unwrap().push_back(outcome);
            self
        }
    }

    #[async_trait]
    impl AnswerSubmitter for MockSubmitter {
        async fn submit(
            &self,
            submit_url: &str,
            submission: &Submission,
        ) -> Result<SubmitOutcome, SubmitError> {
            self.posted
                .lock()
                .unwrap()
                .push((submit_url.to_string(), submission.clone()));
            if let Some(next) = &self.repeat_next {
                return Ok(outcome(Some(true), Some(next.as_str())));
            }
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(outcome(Some(true), None)))
        }
    }

    fn outcome(correct: Option<bool>, url: Option<&str>) -> SubmitOutcome {
        SubmitOutcome {
            correct,
            url: url.map(str::to_string),
            reason: None,
        }
    }

    struct Fixture {
        gateway: Arc<MockGateway>,
        scraper: Arc<MockScraper>,
        runner: Arc<MockRunner>,
        submitter: Arc<MockSubmitter>,
    }

    impl Fixture {
        fn new(gateway: MockGateway, submitter: MockSubmitter) -> Self {
            Self {
                gateway: Arc::new(gateway),
                scraper: Arc::new(MockScraper::default()),
                runner: Arc::new(MockRunner::returning(Ok(json!(42)))),
                submitter: Arc::new(submitter),
            }
        }

        fn use_case(&self, params: SolverParams) -> SolveQuizUseCase {
            SolveQuizUseCase::new(
                self.gateway.clone(),
                self.scraper.clone(),
                self.runner.clone(),
                self.submitter.clone(),
                params,
            )
        }
    }

    fn fast_params() -> SolverParams {
        SolverParams::default().with_analysis_retry_delay(Duration::ZERO)
    }

    fn request() -> QuizRequest {
        QuizRequest::new("me@test", "s3cr3t", "https://quiz.test/start")
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_single_step_completed() {
        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let report = fx
            .use_case(fast_params())
            .execute("run-1", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.steps.len(), 1);
        assert!(report.finished_at.is_some());

        let posted = fx.submitter.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        let (url, submission) = &posted[0];
        assert_eq!(url, "https://quiz.test/submit");
        assert_eq!(submission.url, "https://quiz.test/start");
        assert_eq!(submission.email, "me@test");
        assert_eq!(submission.secret, "s3cr3t");
        assert_eq!(submission.answer, json!(42));
    }

    #[tokio::test]
    async fn test_follows_next_url() {
        let submitter = MockSubmitter::default()
            .with(Ok(outcome(Some(true), Some("https://quiz.test/2"))))
            .with(Ok(outcome(Some(true), None)));
        let fx = Fixture::new(MockGateway::default(), submitter);

        let report = fx
            .use_case(fast_params())
            .execute("run-2", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(report.steps.len(), 2);
        assert_eq!(
            *fx.scraper.visited.lock().unwrap(),
            vec!["https://quiz.test/start", "https://quiz.test/2"]
        );
        let posted = fx.submitter.posted.lock().unwrap();
        assert_eq!(posted[1].1.url, "https://quiz.test/2");
        assert_eq!(report.steps[0].next_url.as_deref(), Some("https://quiz.test/2"));
    }

    #[tokio::test]
    async fn test_incorrect_answer_stops() {
        let submitter = MockSubmitter::default().with(Ok(outcome(
            Some(false),
            Some("https://quiz.test/2"),
        )));
        let fx = Fixture::new(MockGateway::default(), submitter);

        let report = fx
            .use_case(fast_params())
            .execute("run-3", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Incorrect);
        assert_eq!(report.steps.len(), 1);
        assert_eq!(report.steps[0].correct, Some(false));
    }

    #[tokio::test]
    async fn test_missing_correct_flag_is_incorrect() {
        let submitter = MockSubmitter::default().with(Ok(outcome(None, None)));
        let fx = Fixture::new(MockGateway::default(), submitter);

        let report = fx
            .use_case(fast_params())
            .execute("run-3b", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Incorrect);
    }

    #[tokio::test]
    async fn test_analysis_retries_gateway_errors() {
        let gateway = MockGateway::default()
            .with_analysis(Err(GatewayError::RateLimited("429".into())))
            .with_analysis(Err(GatewayError::ConnectionError("reset".into())));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        let report = fx
            .use_case(fast_params())
            .execute("run-4", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_analysis_gives_up_after_attempts() {
        let gateway = MockGateway::default()
            .with_analysis(Err(GatewayError::RateLimited("429".into())))
            .with_analysis(Err(GatewayError::RateLimited("429".into())))
            .with_analysis(Err(GatewayError::RateLimited("429".into())));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        let report = fx
            .use_case(fast_params())
            .execute("run-5", &request(), &CancellationToken::new())
            .await;

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: RunStage::Analyze, .. }
        ));
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 3);
        assert!(fx.submitter.posted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_analysis_is_not_retried() {
        let gateway = MockGateway::default()
            .with_analysis(Ok(r#"{"question": "no url here"}"#.to_string()));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        let report = fx
            .use_case(fast_params())
            .execute("run-6", &request(), &CancellationToken::new())
            .await;

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: RunStage::Analyze, .. }
        ));
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_code_generation_failure() {
        let gateway = MockGateway::default()
            .with_code(Err(GatewayError::RequestFailed("500".into())));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        let report = fx
            .use_case(fast_params())
            .execute("run-7", &request(), &CancellationToken::new())
            .await;

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: RunStage::Generate, .. }
        ));
    }

    #[tokio::test]
    async fn test_execution_failure_submits_null() {
        let mut fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        fx.runner = Arc::new(MockRunner::returning(Err(ExecutionError::MissingEntryPoint)));

        let report = fx
            .use_case(fast_params())
            .execute("run-8", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::Completed);
        let posted = fx.submitter.posted.lock().unwrap();
        assert_eq!(posted[0].1.answer, Value::Null);
    }

    #[tokio::test]
    async fn test_generated_code_fence_is_stripped() {
        let gateway = MockGateway::default().with_code(Ok(
            "```python\ndef get_answer():\n    return 1\n```".to_string(),
        ));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        fx.use_case(fast_params())
            .execute("run-9", &request(), &CancellationToken::new())
            .await;

        let seen = fx.runner.seen_code.lock().unwrap();
        assert_eq!(seen[0], "def get_answer():\n    return 1");
    }

    #[tokio::test]
    async fn test_relative_submit_url_is_resolved() {
        let gateway = MockGateway::default()
            .with_analysis(Ok(r#"[{"submit_url": "/submit", "question": "q"}]"#.to_string()));
        let fx = Fixture::new(gateway, MockSubmitter::default());

        let report = fx
            .use_case(fast_params())
            .execute("run-10", &request(), &CancellationToken::new())
            .await;

        let posted = fx.submitter.posted.lock().unwrap();
        assert_eq!(posted[0].0, "https://quiz.test/submit");
        assert_eq!(
            report.steps[0].submit_url.as_deref(),
            Some("https://quiz.test/submit")
        );
    }

    #[tokio::test]
    async fn test_submission_error_fails_run() {
        let submitter = MockSubmitter::default()
            .with(Err(SubmitError::InvalidResponse("expected value".into())));
        let fx = Fixture::new(MockGateway::default(), submitter);

        let report = fx
            .use_case(fast_params())
            .execute("run-11", &request(), &CancellationToken::new())
            .await;

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: RunStage::Submit, .. }
        ));
    }

    #[tokio::test]
    async fn test_scrape_failure_fails_run() {
        let mut fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        fx.scraper = Arc::new(MockScraper {
            fail: true,
            ..Default::default()
        });

        let report = fx
            .use_case(fast_params())
            .execute("run-12", &request(), &CancellationToken::new())
            .await;

        assert!(matches!(
            report.status,
            RunStatus::Failed { stage: RunStage::Scrape, .. }
        ));
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_step_limit() {
        let submitter = MockSubmitter {
            repeat_next: Some("https://quiz.test/loop".to_string()),
            ..Default::default()
        };
        let fx = Fixture::new(MockGateway::default(), submitter);

        let report = fx
            .use_case(fast_params().with_max_steps(3))
            .execute("run-13", &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.status, RunStatus::StepLimitReached);
        assert_eq!(report.steps.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let report = fx
            .use_case(fast_params())
            .execute("run-14", &request(), &cancel)
            .await;

        assert_eq!(report.status, RunStatus::Cancelled);
        assert!(report.steps.is_empty());
        assert!(fx.scraper.visited.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registry_receives_final_report() {
        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let registry = Arc::new(RunRegistry::new(8));

        fx.use_case(fast_params())
            .with_registry(registry.clone())
            .execute("run-15", &request(), &CancellationToken::new())
            .await;

        let stored = registry.get("run-15").await.unwrap();
        assert_eq!(stored.status, RunStatus::Completed);
        assert_eq!(stored.steps.len(), 1);
    }

    #[tokio::test]
    async fn test_execute_report_keeps_start_time() {
        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let accepted = QuizRunReport::new("run-17", "https://quiz.test/start");
        let started_at = accepted.started_at;

        let report = fx
            .use_case(fast_params())
            .execute_report(accepted, &request(), &CancellationToken::new())
            .await;

        assert_eq!(report.run_id, "run-17");
        assert_eq!(report.started_at, started_at);
        assert_eq!(report.status, RunStatus::Completed);
    }

    #[tokio::test]
    async fn test_page_scraped_event_carries_visible_text() {
        #[derive(Default)]
        struct Recorder(Mutex<Vec<RunEvent>>);
        impl RunLogger for Recorder {
            fn log(&self, event: RunEvent) {
                self.0.lock().unwrap().push(event);
            }
        }

        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let recorder = Arc::new(Recorder::default());
        fx.use_case(fast_params())
            .with_run_logger(recorder.clone())
            .execute("run-18", &request(), &CancellationToken::new())
            .await;

        let events = recorder.0.lock().unwrap();
        let scraped = events
            .iter()
            .find(|e| e.event_type == "page_scraped")
            .unwrap();
        assert_eq!(scraped.payload["text_bytes"], 4);
        assert_eq!(scraped.payload["text_preview"], "quiz");
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_retries_wait_between_attempts_only() {
        let gateway = MockGateway::default()
            .with_analysis(Err(GatewayError::RateLimited("429".into())))
            .with_analysis(Err(GatewayError::RateLimited("429".into())))
            .with_analysis(Err(GatewayError::RateLimited("429".into())));
        let fx = Fixture::new(gateway, MockSubmitter::default());
        let params = SolverParams::default().with_analysis_retry_delay(Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        let report = fx
            .use_case(params)
            .execute("run-19", &request(), &CancellationToken::new())
            .await;

        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(matches!(
            report.status,
            RunStatus::Failed {
                stage: RunStage::Analyze,
                ..
            }
        ));
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_success_after_failure_waits_once() {
        let gateway = MockGateway::default()
            .with_analysis(Err(GatewayError::ConnectionError("reset".into())));
        let fx = Fixture::new(gateway, MockSubmitter::default());
        let params = SolverParams::default().with_analysis_retry_delay(Duration::from_secs(5));

        let start = tokio::time::Instant::now();
        let report = fx
            .use_case(params)
            .execute("run-20", &request(), &CancellationToken::new())
            .await;

        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert_eq!(report.status, RunStatus::Completed);
        assert_eq!(fx.gateway.analysis_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_logger_records_events() {
        #[derive(Default)]
        struct Recorder(Mutex<Vec<&'static str>>);
        impl RunLogger for Recorder {
            fn log(&self, event: RunEvent) {
                self.0.lock().unwrap().push(event.event_type);
            }
        }

        let fx = Fixture::new(MockGateway::default(), MockSubmitter::default());
        let recorder = Arc::new(Recorder::default());

        fx.use_case(fast_params())
            .with_run_logger(recorder.clone())
            .execute("run-16", &request(), &CancellationToken::new())
            .await;

        let events = recorder.0.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "run_started",
                "page_scraped",
                "task_extracted",
                "answer_submitted",
                "run_finished"
            ]
        );
    }
}
