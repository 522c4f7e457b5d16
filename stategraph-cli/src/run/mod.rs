//! Run entry points: run with default config, run_with_config, or run_with_options.
//!
//! Re-exports [`run`], [`run_with_config`], [`run_with_options`] and [`Error`].

pub use crate::config::Error;

mod checkpointer;
mod run_with_config;

use stategraph::{State, StepEvent};

use crate::config::{RunConfig, RunOptions};
use crate::topologies::Topology;

pub(crate) use checkpointer::build_checkpointer;
#[cfg(test)]
pub(crate) use run_with_config::compile_topology;
pub use run_with_config::run_with_config;

/// Runs `topology` with default config (from .env) and returns the final state.
///
/// Loads `.env` internally, then calls `run_with_config` without a step callback.
pub async fn run(topology: Topology, question: &str) -> Result<State, Error> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.topology = topology;
    run_with_config(&config, question, |_| {}).await
}

/// Runs with config from env and optional overrides (e.g. from CLI).
///
/// Loads `.env`, builds `RunConfig` from env, applies `options`, then runs the graph,
/// calling `on_step` for every committed step as it is pulled.
pub async fn run_with_options<F>(
    question: &str,
    options: &RunOptions,
    on_step: F,
) -> Result<State, Error>
where
    F: FnMut(&StepEvent),
{
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    run_with_config(&config, question, on_step).await
}
