//! Python runner for generated code
//!
//! The code is piped to `python3 -c <HARNESS>`. The harness pre-imports the
//! libraries the prompt advertises (when installed), executes the code, calls
//! `get_answer()` and prints the JSON-encoded answer behind a marker so that
//! anything the code itself prints is ignored.

use crate::process::{bind_to_parent, last_stderr_line};
use async_trait::async_trait;
use quiz_application::ports::code_runner::{CodeRunner, ExecutionError};
use serde_json::Value;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Interpreter names searched on `PATH`, in order
pub const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];

/// Prefix of the stdout line carrying the answer
const ANSWER_MARKER: &str = "@@QUIZ_SOLVER_ANSWER@@";

/// Exit code used by the harness when `get_answer` is missing
const MISSING_ENTRY_POINT_EXIT: i32 = 3;

const HARNESS: &str = r#"
import json, sys
_scope = {"__name__": "__generated__"}
for _module, _alias in (("json", "json"), ("re", "re"), ("io", "io"), ("math", "math"),
                        ("requests", "requests"), ("pandas", "pd"), ("numpy", "np"),
                        ("PyPDF2", "PyPDF2")):
    try:
        _scope[_alias] = __import__(_module)
    except ImportError:
        pass
exec(compile(sys.stdin.read(), "<generated>", "exec"), _scope)
_entry = _scope.get("get_answer")
if not callable(_entry):
    sys.stderr.write("get_answer() is not defined\n")
    sys.exit(3)
_answer = _entry()
def _to_json(o):
    item = getattr(o, "item", None)
    if callable(item):
        try:
            return item()
        except Exception:
            pass
    tolist = getattr(o, "tolist", None)
    if callable(tolist):
        return tolist()
    return str(o)
sys.stdout.write("\n@@QUIZ_SOLVER_ANSWER@@" + json.dumps(_answer, default=_to_json) + "\n")
"#;

/// Find a Python interpreter on `PATH`
pub fn discover_interpreter() -> Option<PathBuf> {
    INTERPRETER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
}

pub struct PythonCodeRunner {
    interpreter: PathBuf,
    timeout: Duration,
    working_dir: Option<PathBuf>,
}

impl PythonCodeRunner {
    pub fn new(interpreter: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            timeout: Duration::from_secs(60),
            working_dir: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Directory the generated code runs in (downloads land here)
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.interpreter);
        cmd.arg("-c")
            .arg(HARNESS)
            .env("PYTHONIOENCODING", "utf-8")
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        bind_to_parent(&mut cmd);
        cmd
    }
}

/// Decode the answer line printed by the harness
fn parse_answer(stdout: &str) -> Result<Value, ExecutionError> {
    let line = stdout
        .lines()
        .rev()
        .find_map(|l| l.strip_prefix(ANSWER_MARKER))
        .ok_or_else(|| ExecutionError::InvalidOutput("no answer line in output".to_string()))?;
    serde_json::from_str(line.trim()).map_err(|e| ExecutionError::InvalidOutput(e.to_string()))
}

#[async_trait]
impl CodeRunner for PythonCodeRunner {
    async fn run(&self, code: &str) -> Result<Value, ExecutionError> {
        debug!(interpreter = %self.interpreter.display(), bytes = code.len(), "Executing generated code");

        let mut child = self.command().spawn().map_err(|e| {
            ExecutionError::InterpreterUnavailable(format!(
                "{}: {}",
                self.interpreter.display(),
                e
            ))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(code.as_bytes())
                .await
                .map_err(|e| ExecutionError::Failed(format!("Failed to send code: {}", e)))?;
            // Closing stdin ends the harness' read
            drop(stdin);
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ExecutionError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| ExecutionError::Failed(e.to_string()))?;

        if output.status.code() == Some(MISSING_ENTRY_POINT_EXIT) {
            return Err(ExecutionError::MissingEntryPoint);
        }
        if !output.status.success() {
            return Err(ExecutionError::Failed(last_stderr_line(&output.stderr)));
        }

        parse_answer(&String::from_utf8_lossy(&output.stdout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn runner() -> Option<PythonCodeRunner> {
        discover_interpreter().map(PythonCodeRunner::new)
    }

    #[test]
    fn test_parse_answer_takes_marker_line() {
        let out = format!("noise\n{}{{\"a\": [1, 2]}}\n", ANSWER_MARKER);
        assert_eq!(parse_answer(&out).unwrap(), json!({"a": [1, 2]}));
    }

    #[test]
    fn test_harness_uses_marker_and_exit_code() {
        assert!(HARNESS.contains(&format!("\"\\n{}\"", ANSWER_MARKER)));
        assert!(HARNESS.contains(&format!("sys.exit({})", MISSING_ENTRY_POINT_EXIT)));
    }

    #[test]
    fn test_parse_answer_missing_marker() {
        assert!(matches!(
            parse_answer("just prints"),
            Err(ExecutionError::InvalidOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_runs_get_answer() {
        let Some(runner) = runner() else { return };
        let code = "def get_answer():\n    print('working...')\n    return sum([1, 2, 39])";
        assert_eq!(runner.run(code).await.unwrap(), json!(42));
    }

    #[tokio::test]
    async fn test_structured_answer() {
        let Some(runner) = runner() else { return };
        let code = "def get_answer():\n    return {'ok': True, 'items': ['a', 'b']}";
        assert_eq!(
            runner.run(code).await.unwrap(),
            json!({"ok": true, "items": ["a", "b"]})
        );
    }

    #[tokio::test]
    async fn test_missing_entry_point() {
        let Some(runner) = runner() else { return };
        let err = runner.run("x = 1").await.unwrap_err();
        assert!(matches!(err, ExecutionError::MissingEntryPoint));
    }

    #[tokio::test]
    async fn test_exception_reports_last_line() {
        let Some(runner) = runner() else { return };
        let err = runner
            .run("def get_answer():\n    return 1 / 0")
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Failed(ref m) if m.contains("ZeroDivisionError")));
    }

    #[tokio::test]
    async fn test_timeout() {
        let Some(runner) = runner() else { return };
        let err = runner
            .with_timeout(Duration::from_millis(300))
            .run("import time\ndef get_answer():\n    time.sleep(10)\n    return 1")
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_missing_interpreter() {
        let err = PythonCodeRunner::new("/nonexistent/python3")
            .run("def get_answer():\n    return 1")
            .await
            .unwrap_err();
        assert!(matches!(err, ExecutionError::InterpreterUnavailable(_)));
    }
}
