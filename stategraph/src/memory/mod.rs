//! # Memory: Checkpointing
//!
//! Per-thread snapshots for suspend/resume.
//!
//! ## Overview
//!
//! A [`Checkpointer`] stores the latest [`Checkpoint`] per thread id. The engine writes one
//! after every committed step and reads one at run start: if it is unfinished the run
//! resumes at `next_node` with the stored state and step counter.
//!
//! ## Config
//!
//! [`RunnableConfig`] is passed to `CompiledStateGraph::stream` / `invoke`:
//! - `recursion_limit`: Required. Maximum node steps of the run.
//! - `thread_id`: Optional. Enables checkpoint reads/writes for this lineage.
//!
//! ## Checkpointer Implementations
//!
//! | Type             | Persistence | Use case                | Feature  |
//! |------------------|-------------|-------------------------|----------|
//! | [`MemorySaver`]  | In-memory   | Dev, tests              | -        |
//! | `SqliteSaver`    | SQLite file | Single-node, production | `sqlite` |
//!
//! Use with [`StateGraph::compile_with_checkpointer`](crate::graph::StateGraph::compile_with_checkpointer).

mod checkpoint;
mod checkpointer;
mod config;
mod memory_saver;
mod serializer;

#[cfg(feature = "sqlite")]
mod sqlite_saver;

pub use checkpoint::Checkpoint;
pub use checkpointer::{CheckpointError, Checkpointer};
pub use config::RunnableConfig;
pub use memory_saver::MemorySaver;
pub use serializer::{JsonSerializer, Serializer};

#[cfg(feature = "sqlite")]
pub use sqlite_saver::SqliteSaver;
