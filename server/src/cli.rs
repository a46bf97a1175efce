//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for quiz-solver
#[derive(Parser, Debug)]
#[command(name = "quiz-solver")]
#[command(author, version, about = "HTTP service that solves chains of quiz pages with an LLM")]
#[command(long_about = r#"
quiz-solver accepts quiz tasks over HTTP and solves them in the background.

For every page of a quiz chain it renders the page, asks the model where
answers go and what is asked, has the model write Python that computes the
answer, runs it, and posts the answer back.

Configuration files are loaded from (in priority order):
1. QUIZ_SOLVER_<SECTION>__<KEY>   Environment variables
2. --config <path>                Explicit config file
3. ./quiz-solver.toml             Project-level config
4. ~/.config/quiz-solver/config.toml   Global config

Example:
  quiz-solver --port 8000 -v
  QUIZ_SOLVER_SOLVER__MAX_STEPS=5 quiz-solver --no-config
"#)]
pub struct Cli {
    /// Address to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Verbosity level (-v = debug, -vv = trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,
}
