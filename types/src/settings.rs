//! Resolved matrix settings shared across crates.
//!
//! Raw TOML deserialization structs stay private in `capmatrix-config`. The
//! config loader resolves them into [`MatrixSettings`] at the parse boundary,
//! so holding a `MatrixSettings` proves every product references declared tags.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Declarations, ScenarioSet};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{kind} name must not be empty")]
    EmptyTagName { kind: &'static str },
    #[error("product {index} references undeclared operation '{name}'")]
    UndeclaredOperation { index: usize, name: String },
    #[error("product {index} references undeclared scenario '{name}'")]
    UndeclaredScenario { index: usize, name: String },
}

/// How the matrix answers queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatrixMode {
    /// Run the combinatorial subset test.
    #[default]
    Enforce,
    /// Allow every query without consulting the products.
    AllowAll,
}

impl MatrixMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enforce => "enforce",
            Self::AllowAll => "allow_all",
        }
    }

    #[must_use]
    pub const fn is_enforcing(self) -> bool {
        matches!(self, Self::Enforce)
    }
}

/// Validated matrix configuration.
///
/// Invariant: tag names are non-blank and every product's operations and
/// scenario are declared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixSettings {
    mode: MatrixMode,
    scenarios: ScenarioSet,
    declarations: Declarations,
}

impl MatrixSettings {
    pub fn new(
        mode: MatrixMode,
        scenarios: ScenarioSet,
        declarations: Declarations,
    ) -> Result<Self, SettingsError> {
        if scenarios.iter().any(|name| name.trim().is_empty()) {
            return Err(SettingsError::EmptyTagName { kind: "scenario" });
        }
        if declarations
            .operations
            .iter()
            .any(|name| name.trim().is_empty())
        {
            return Err(SettingsError::EmptyTagName { kind: "operation" });
        }

        for (index, product) in declarations.products.iter().enumerate() {
            if !scenarios.contains(&product.scenario) {
                return Err(SettingsError::UndeclaredScenario {
                    index,
                    name: product.scenario.clone(),
                });
            }
            if let Some(name) = product
                .operate
                .iter()
                .find(|name| !declarations.operations.contains(*name))
            {
                return Err(SettingsError::UndeclaredOperation {
                    index,
                    name: name.clone(),
                });
            }
        }

        Ok(Self {
            mode,
            scenarios,
            declarations,
        })
    }

    #[must_use]
    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    #[must_use]
    pub fn scenarios(&self) -> &ScenarioSet {
        &self.scenarios
    }

    #[must_use]
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }
}
