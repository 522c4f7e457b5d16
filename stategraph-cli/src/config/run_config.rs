//! Run config: topology, recursion limit, thread id, checkpoint DB path. Filled from env / .env.
//!
//! Interacts with [`RunOptions`](super::RunOptions) and [`run_with_config`](crate::run_with_config).

use crate::topologies::Topology;

/// Error type used for config loading and runs.
pub type Error = Box<dyn std::error::Error + Send + Sync>;

/// Recursion limit when `STATEGRAPH_RECURSION_LIMIT` is not set.
pub const DEFAULT_RECURSION_LIMIT: usize = 25;

/// SQLite checkpoint file when `DB_PATH` is not set.
pub const DEFAULT_DB_PATH: &str = "stategraph.db";

/// Run config. Can be filled from env / .env and overridden by [`RunOptions`](super::RunOptions).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Graph to run.
    pub topology: Topology,
    /// Maximum node steps of the run.
    pub recursion_limit: usize,
    /// Thread id for checkpointing. When set, the run is checkpointed and resumable.
    pub thread_id: Option<String>,
    /// SQLite database path for checkpoints (used only with a thread id).
    pub db_path: Option<String>,
    /// When true, nodes are compiled with `LoggingMiddleware` (enter/exit debug events).
    pub verbose: bool,
}

impl RunConfig {
    /// Config with defaults for `topology`: limit 25, no thread, default DB path.
    pub fn new(topology: Topology) -> Self {
        Self {
            topology,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            thread_id: None,
            db_path: Some(DEFAULT_DB_PATH.to_string()),
            verbose: false,
        }
    }

    /// Apply optional overrides from `RunOptions`. Only set fields override.
    pub fn apply_options(&mut self, options: &super::RunOptions) {
        if let Some(topology) = options.topology {
            self.topology = topology;
        }
        if let Some(limit) = options.recursion_limit {
            self.recursion_limit = limit;
        }
        if options.thread_id.is_some() {
            self.thread_id = options.thread_id.clone();
        }
        if options.db_path.is_some() {
            self.db_path = options.db_path.clone();
        }
        self.verbose = options.verbose;
    }

    /// Enable checkpointing under `thread_id`.
    pub fn with_thread_id(mut self, thread_id: &str) -> Self {
        self.thread_id = Some(thread_id.to_string());
        self
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    /// Effective checkpoint DB path.
    pub fn db_path(&self) -> &str {
        self.db_path.as_deref().unwrap_or(DEFAULT_DB_PATH)
    }
}

impl RunConfig {
    /// Fill config from env vars (and .env). Call `dotenv::dotenv().ok()` first or use
    /// [`run_with_options`](crate::run_with_options), which does.
    ///
    /// `STATEGRAPH_TOPOLOGY` (adaptive-rag|reflection|hierarchical|plan-execute, default adaptive-rag),
    /// `STATEGRAPH_RECURSION_LIMIT` (default 25), `THREAD_ID`, `DB_PATH` optional.
    pub fn from_env() -> Result<Self, Error> {
        let topology = match std::env::var("STATEGRAPH_TOPOLOGY") {
            Ok(s) => s.parse::<Topology>().map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("STATEGRAPH_TOPOLOGY: {}", e),
                )
            })?,
            Err(_) => Topology::AdaptiveRag,
        };
        let recursion_limit = match std::env::var("STATEGRAPH_RECURSION_LIMIT") {
            Ok(s) => s.trim().parse::<usize>().map_err(|e| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("STATEGRAPH_RECURSION_LIMIT must be a non-negative integer: {}", e),
                )
            })?,
            Err(_) => DEFAULT_RECURSION_LIMIT,
        };
        let thread_id = std::env::var("THREAD_ID").ok().filter(|s| !s.is_empty());
        let db_path = std::env::var("DB_PATH")
            .ok()
            .or_else(|| Some(DEFAULT_DB_PATH.to_string()));
        Ok(Self {
            topology,
            recursion_limit,
            thread_id,
            db_path,
            verbose: false,
        })
    }
}
