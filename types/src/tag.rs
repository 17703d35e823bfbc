//! Tag identity: bit positions, namespaces and the scenario set.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Scenario sentinel meaning "no active scenario".
pub const NONE_SCENARIO: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("bit positions start at 1")]
    Zero,
    #[error("bit position {0} does not fit in 32 bits")]
    OutOfRange(usize),
}

/// A 1-based bit position. Zero is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Position(NonZeroU32);

impl Position {
    pub fn new(value: u32) -> Result<Self, PositionError> {
        NonZeroU32::new(value).map(Self).ok_or(PositionError::Zero)
    }

    /// Position for the `index`-th registered tag (0-based index, 1-based position).
    pub fn from_index(index: usize) -> Result<Self, PositionError> {
        let value = index
            .checked_add(1)
            .and_then(|value| u32::try_from(value).ok())
            .ok_or(PositionError::OutOfRange(index))?;
        Self::new(value)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl TryFrom<u32> for Position {
    type Error = PositionError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Position> for u32 {
    fn from(value: Position) -> Self {
        value.get()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Namespace a tag is registered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Operation,
    Scenario,
}

impl TagKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Operation => "operation",
            Self::Scenario => "scenario",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, de-duplicated scenario names.
///
/// Invariant: [`NONE_SCENARIO`] is always a member. When the caller omits it,
/// it is placed first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ScenarioSet(Vec<String>);

impl ScenarioSet {
    pub fn new<I, S>(scenarios: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = Vec::new();
        for name in scenarios {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        if !names.iter().any(|name| name == NONE_SCENARIO) {
            names.insert(0, NONE_SCENARIO.to_string());
        }
        Self(names)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|scenario| scenario == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the set holds at least the `none` sentinel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ScenarioSet {
    fn default() -> Self {
        Self(vec![NONE_SCENARIO.to_string()])
    }
}

impl From<Vec<String>> for ScenarioSet {
    fn from(value: Vec<String>) -> Self {
        Self::new(value)
    }
}

impl From<ScenarioSet> for Vec<String> {
    fn from(value: ScenarioSet) -> Self {
        value.0
    }
}
