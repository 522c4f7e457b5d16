//! State schema: declared keys, each with a fixed merge policy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaViolation;

use super::{State, StateUpdate};

/// How a partial update combines with the current value of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MergePolicy {
    /// The new value supersedes the old one.
    Replace,
    /// The new sequence is concatenated after the existing one (order kept, no dedup).
    Append,
}

#[derive(Debug, Clone)]
struct KeySpec {
    policy: MergePolicy,
    default: Value,
}

/// Fixed set of declared keys. Immutable once handed to [`StateGraph`](crate::graph::StateGraph).
///
/// ```
/// use stategraph::{MergePolicy, StateSchema};
///
/// let schema = StateSchema::new()
///     .replace("question")
///     .append("documents");
/// assert_eq!(schema.policy("documents"), Some(MergePolicy::Append));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StateSchema {
    keys: BTreeMap<String, KeySpec>,
}

impl StateSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a `Replace` key with a `null` initial value.
    pub fn replace(self, key: impl Into<String>) -> Self {
        self.declare(key, MergePolicy::Replace, Value::Null)
    }

    /// Declares a `Replace` key with the given initial value.
    pub fn replace_with_default(self, key: impl Into<String>, default: impl Into<Value>) -> Self {
        self.declare(key, MergePolicy::Replace, default.into())
    }

    /// Declares an `Append` key starting as an empty sequence.
    pub fn append(self, key: impl Into<String>) -> Self {
        self.declare(key, MergePolicy::Append, Value::Array(Vec::new()))
    }

    fn declare(mut self, key: impl Into<String>, policy: MergePolicy, default: Value) -> Self {
        self.keys.insert(key.into(), KeySpec { policy, default });
        self
    }

    pub fn policy(&self, key: &str) -> Option<MergePolicy> {
        self.keys.get(key).map(|spec| spec.policy)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// State holding every declared key at its initial value.
    pub fn initial_state(&self) -> State {
        State {
            values: self
                .keys
                .iter()
                .map(|(k, spec)| (k.clone(), spec.default.clone()))
                .collect(),
        }
    }

    /// Checks an update against the schema and the current state without applying it.
    pub fn validate(&self, current: &State, update: &StateUpdate) -> Result<(), SchemaViolation> {
        for (key, value) in update.iter() {
            let spec = self
                .keys
                .get(key)
                .ok_or_else(|| SchemaViolation::UnknownKey(key.to_string()))?;
            if spec.policy == MergePolicy::Append {
                if !value.is_array() {
                    return Err(SchemaViolation::NotASequence(key.to_string()));
                }
                match current.get(key) {
                    None | Some(Value::Null) | Some(Value::Array(_)) => {}
                    Some(_) => return Err(SchemaViolation::NotASequence(key.to_string())),
                }
            }
        }
        Ok(())
    }

    /// Merges `update` into `current`, returning the new state.
    ///
    /// All-or-nothing: on error `current` is untouched and no key of the update is applied.
    /// Keys absent from the update keep their value.
    pub fn merge(&self, current: &State, update: &StateUpdate) -> Result<State, SchemaViolation> {
        self.validate(current, update)?;
        let mut next = current.clone();
        for (key, value) in update.iter() {
            match self.policy(key) {
                Some(MergePolicy::Append) => {
                    let items = value.as_array().cloned().unwrap_or_default();
                    let slot = next
                        .values
                        .entry(key.to_string())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    match slot {
                        Value::Array(existing) => existing.extend(items),
                        other => *other = Value::Array(items),
                    }
                }
                _ => {
                    next.values.insert(key.to_string(), value.clone());
                }
            }
        }
        Ok(next)
    }

    /// Brings a state loaded from outside (a checkpoint) back under this schema.
    ///
    /// Undeclared keys are rejected; declared keys the saved state lacks take their
    /// initial value.
    pub fn restore(&self, saved: State) -> Result<State, SchemaViolation> {
        for (key, value) in saved.iter() {
            let spec = self
                .keys
                .get(key)
                .ok_or_else(|| SchemaViolation::UnknownKey(key.to_string()))?;
            if spec.policy == MergePolicy::Append && !(value.is_array() || value.is_null()) {
                return Err(SchemaViolation::NotASequence(key.to_string()));
            }
        }
        let mut state = self.initial_state();
        state.values.extend(saved.values);
        Ok(state)
    }
}
