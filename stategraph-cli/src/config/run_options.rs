//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options) and
//! [`run_with_options`](crate::run_with_options).

use crate::topologies::Topology;

/// Optional overrides for a run: topology, recursion limit, thread id, DB path.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub topology: Option<Topology>,
    pub recursion_limit: Option<usize>,
    /// Thread id for checkpointing / resume.
    pub thread_id: Option<String>,
    /// Override SQLite database path for checkpoints.
    pub db_path: Option<String>,
    pub verbose: bool,
}
