//! Declared inputs of the capability matrix.
//!
//! These are static configuration supplied by the consuming application:
//! the operation universe and the allowed (operations × scenario) products.
//! A change to any of them invalidates the compiled matrix.

use serde::{Deserialize, Serialize};

use crate::NONE_SCENARIO;

/// One allowed combination: every operation in `operate`, paired with `scenario`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductDecl {
    #[serde(default)]
    pub operate: Vec<String>,
    pub scenario: String,
}

impl ProductDecl {
    pub fn new<I, S>(operate: I, scenario: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operate: operate.into_iter().map(Into::into).collect(),
            scenario: scenario.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Declarations {
    #[serde(default)]
    pub operations: Vec<String>,
    #[serde(default)]
    pub products: Vec<ProductDecl>,
}

impl Declarations {
    pub fn new<I, S>(operations: I, products: Vec<ProductDecl>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            operations: operations.into_iter().map(Into::into).collect(),
            products,
        }
    }
}

/// The task the consuming application currently has in flight.
///
/// Supplied per call. A context whose scenario is `none` is equivalent to
/// having no context at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    scenario_id: String,
    executable: bool,
}

impl TaskContext {
    pub fn new(scenario_id: impl Into<String>, executable: bool) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            executable,
        }
    }

    #[must_use]
    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    /// Whether the task can act right now.
    #[must_use]
    pub fn executable(&self) -> bool {
        self.executable
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.scenario_id == NONE_SCENARIO
    }
}
