//! Extension trait: compile a graph with [`LoggingMiddleware`] attached.
//!
//! Example of extending the build chain from outside stategraph.

use std::sync::Arc;

use stategraph::{Checkpointer, CompilationError, CompiledStateGraph, StateGraph};

use super::logging::LoggingMiddleware;

/// Compiles with `LoggingMiddleware`, and with a checkpointer when one is given.
pub trait WithNodeLogging {
    fn compile_with_node_logging(
        self,
        checkpointer: Option<Arc<dyn Checkpointer>>,
    ) -> Result<CompiledStateGraph, CompilationError>;
}

impl WithNodeLogging for StateGraph {
    fn compile_with_node_logging(
        self,
        checkpointer: Option<Arc<dyn Checkpointer>>,
    ) -> Result<CompiledStateGraph, CompilationError> {
        let middleware = Arc::new(LoggingMiddleware);
        match checkpointer {
            Some(cp) => self.compile_with_checkpointer_and_middleware(cp, middleware),
            None => self.compile_with_middleware(middleware),
        }
    }
}
