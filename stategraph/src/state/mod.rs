//! State model: schema with per-key merge policy, full state, partial updates.

mod schema;
mod values;

pub use schema::{MergePolicy, StateSchema};
pub use values::{State, StateUpdate};
