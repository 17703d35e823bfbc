//! Query evaluator.
//!
//! A query pairs one operation with the active scenario (or `none`) and is
//! permitted when its bits are a subset of at least one compiled product.
//! While a real task is active, a match can additionally be suppressed by the
//! task's executable flag unless the caller skips that gate.

use std::fmt;

use capmatrix_types::{BitVector, TaskContext};

use crate::compiler::CompiledProduct;
use crate::registry::{TagLookup, TagRegistry};

/// Whether a positive match must also pass the task's executable flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Gate {
    #[default]
    Enforce,
    Skip,
}

/// How [`check_tags`] folds its individual checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Every path must pass.
    All,
    /// At least one path must pass.
    Any,
}

/// Outcome of a single check, with the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Covered by the product at this index.
    Allowed { product: usize },
    /// The matrix is configured to allow everything.
    Bypassed,
    /// The path is not a registered operation.
    UnknownOperation,
    NoMatchingProduct,
    /// Covered by a product, but the active task is not executable.
    NotExecutable { product: usize },
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed { .. } | Self::Bypassed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed { .. } => "allowed",
            Self::Bypassed => "bypassed",
            Self::UnknownOperation => "unknown_operation",
            Self::NoMatchingProduct => "no_matching_product",
            Self::NotExecutable { .. } => "not_executable",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed { product } | Self::NotExecutable { product } => {
                write!(f, "{} (product {product})", self.as_str())
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Evaluate `path` under `context`.
#[must_use]
pub fn evaluate(
    registry: &TagRegistry,
    products: &[CompiledProduct],
    path: &str,
    context: Option<&TaskContext>,
    gate: Gate,
) -> Decision {
    let TagLookup::Operation(operation) = registry.resolve(path) else {
        return Decision::UnknownOperation;
    };
    let (scenario, task) = active_scenario(registry, context);
    let query = BitVector::add([operation, scenario]);

    let Some(product) = products.iter().find(|product| product.covers(&query)) else {
        return Decision::NoMatchingProduct;
    };

    match (task, gate) {
        (Some(task), Gate::Enforce) if !task.executable() => Decision::NotExecutable {
            product: product.index(),
        },
        _ => Decision::Allowed {
            product: product.index(),
        },
    }
}

#[must_use]
pub fn check_tag(
    registry: &TagRegistry,
    products: &[CompiledProduct],
    path: &str,
    context: Option<&TaskContext>,
    gate: Gate,
) -> bool {
    evaluate(registry, products, path, context, gate).is_allowed()
}

/// Fold `check` over `paths`. An empty list passes in both modes.
pub fn check_tags<I, S, F>(paths: I, mode: CheckMode, mut check: F) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(&str) -> bool,
{
    let mut paths = paths.into_iter().peekable();
    if paths.peek().is_none() {
        return true;
    }
    match mode {
        CheckMode::All => paths.all(|path| check(path.as_ref())),
        CheckMode::Any => paths.any(|path| check(path.as_ref())),
    }
}

/// The scenario vector for the query, plus the task when it is a real one.
///
/// A missing context, the `none` scenario, or a scenario the registry does not
/// know all evaluate as `none`, and none of them engage the executable gate.
fn active_scenario<'a>(
    registry: &'a TagRegistry,
    context: Option<&'a TaskContext>,
) -> (&'a BitVector, Option<&'a TaskContext>) {
    let Some(task) = context.filter(|task| !task.is_idle()) else {
        return (registry.none(), None);
    };
    if let Some(vector) = registry.scenario(task.scenario_id()) {
        (vector, Some(task))
    } else {
        tracing::debug!(
            scenario = task.scenario_id(),
            "Unknown task scenario; evaluating as none"
        );
        (registry.none(), None)
    }
}
