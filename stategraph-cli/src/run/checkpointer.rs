//! Checkpointer selection for a run.
//!
//! With a thread id: `SqliteSaver` at `config.db_path()` (feature `sqlite`), otherwise an
//! in-process `MemorySaver`. Without a thread id the run is not checkpointed.

use std::sync::Arc;

use stategraph::Checkpointer;

use crate::config::{Error, RunConfig};

#[cfg(feature = "sqlite")]
pub(crate) fn build_checkpointer(
    config: &RunConfig,
) -> Result<Option<Arc<dyn Checkpointer>>, Error> {
    if config.thread_id().is_none() {
        return Ok(None);
    }
    let saver = stategraph::SqliteSaver::new(config.db_path())?;
    tracing::debug!(db_path = config.db_path(), "using sqlite checkpointer");
    Ok(Some(Arc::new(saver)))
}

#[cfg(not(feature = "sqlite"))]
pub(crate) fn build_checkpointer(
    config: &RunConfig,
) -> Result<Option<Arc<dyn Checkpointer>>, Error> {
    if config.thread_id().is_none() {
        return Ok(None);
    }
    tracing::warn!("sqlite feature disabled; checkpoints are kept in memory for this process only");
    Ok(Some(Arc::new(stategraph::MemorySaver::new())))
}
