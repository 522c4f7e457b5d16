//! stategraph-cli library: build a reference topology, stream it, report each step.
//!
//! Reads run config from .env / env, compiles the chosen topology with node logging (and a
//! checkpointer when a thread id is set), then pulls the run step by step.
//!
//! ## Usage
//!
//! ```rust,no_run
//! # async fn demo() -> Result<(), stategraph_cli::Error> {
//! use stategraph_cli::{run_with_options, RunOptions, Topology};
//!
//! let options = RunOptions {
//!     topology: Some(Topology::Reflection),
//!     ..Default::default()
//! };
//! let state = run_with_options("the borrow checker", &options, |step| {
//!     println!("[{}] {}", step.step, step.node);
//! })
//! .await?;
//! println!("{}", state.to_json());
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;
mod topologies;

pub use config::{Error, RunConfig, RunOptions, DEFAULT_DB_PATH, DEFAULT_RECURSION_LIMIT};
pub use middleware::{LoggingMiddleware, WithNodeLogging};
pub use run::{run, run_with_config, run_with_options};
pub use topologies::Topology;

#[cfg(test)]
mod tests;
