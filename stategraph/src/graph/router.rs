//! Router trait: picks one outgoing label from the post-merge state.

use crate::state::State;

/// Pure, total function from state to a label.
///
/// `labels` is the declared output set; the builder rejects a conditional edge whose
/// table misses any of them (`UnmappedRoute`). A label outside the table at run time
/// is a `GraphError::Routing`.
pub trait Router: Send + Sync {
    fn route(&self, state: &State) -> String;

    fn labels(&self) -> Vec<String>;
}

/// Router backed by a closure plus its declared label set.
///
/// ```
/// use stategraph::{FnRouter, State};
///
/// let router = FnRouter::new(["generate", "transform_query"], |state: &State| {
///     if state.get_seq("documents").is_empty() {
///         "transform_query".to_string()
///     } else {
///         "generate".to_string()
///     }
/// });
/// # let _ = router;
/// ```
pub struct FnRouter<F> {
    labels: Vec<String>,
    f: F,
}

impl<F> FnRouter<F>
where
    F: Fn(&State) -> String + Send + Sync,
{
    pub fn new<I, L>(labels: I, f: F) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            f,
        }
    }
}

impl<F> Router for FnRouter<F>
where
    F: Fn(&State) -> String + Send + Sync,
{
    fn route(&self, state: &State) -> String {
        (self.f)(state)
    }

    fn labels(&self) -> Vec<String> {
        self.labels.clone()
    }
}
