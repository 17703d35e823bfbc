//! The capability matrix engine object.
//!
//! [`CapabilityMatrix`] owns a tag registry and the compiled products for one
//! set of declarations. It is never patched in place: [`CapabilityMatrix::refresh`]
//! rebuilds both from scratch when the declarations' fingerprint changes.

use capmatrix_types::{Declarations, MatrixMode, MatrixSettings, ScenarioSet, TaskContext};

use crate::compiler::{CompiledProduct, compile_products};
use crate::evaluator::{self, CheckMode, Decision, Gate};
use crate::fingerprint::Fingerprint;
use crate::registry::TagRegistry;

/// Result of [`CapabilityMatrix::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    Unchanged,
    Rebuilt,
}

#[derive(Debug, Clone)]
pub struct CapabilityMatrix {
    mode: MatrixMode,
    scenarios: ScenarioSet,
    registry: TagRegistry,
    products: Vec<CompiledProduct>,
    fingerprint: Fingerprint,
}

impl CapabilityMatrix {
    /// Compile `declarations` against a scenario set that stays fixed for the
    /// lifetime of the matrix.
    #[must_use]
    pub fn new(scenarios: ScenarioSet, declarations: &Declarations) -> Self {
        let (registry, products) = compile(&scenarios, declarations);
        Self {
            mode: MatrixMode::default(),
            scenarios,
            registry,
            products,
            fingerprint: Fingerprint::of(declarations),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &MatrixSettings) -> Self {
        Self::new(settings.scenarios().clone(), settings.declarations()).with_mode(settings.mode())
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatrixMode) -> Self {
        self.mode = mode;
        self
    }

    /// Rebuild the registry and products if `declarations` differ from the
    /// ones this matrix was compiled from.
    pub fn refresh(&mut self, declarations: &Declarations) -> Refresh {
        let fingerprint = Fingerprint::of(declarations);
        if fingerprint == self.fingerprint {
            return Refresh::Unchanged;
        }
        let (registry, products) = compile(&self.scenarios, declarations);
        self.registry = registry;
        self.products = products;
        self.fingerprint = fingerprint;
        Refresh::Rebuilt
    }

    #[must_use]
    pub fn evaluate(&self, path: &str, context: Option<&TaskContext>, gate: Gate) -> Decision {
        if !self.mode.is_enforcing() {
            return Decision::Bypassed;
        }
        evaluator::evaluate(&self.registry, &self.products, path, context, gate)
    }

    #[must_use]
    pub fn check_tag(&self, path: &str, context: Option<&TaskContext>, gate: Gate) -> bool {
        self.evaluate(path, context, gate).is_allowed()
    }

    pub fn check_tags<I, S>(
        &self,
        paths: I,
        mode: CheckMode,
        context: Option<&TaskContext>,
        gate: Gate,
    ) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        evaluator::check_tags(paths, mode, |path| self.check_tag(path, context, gate))
    }

    /// Bind the task context for one call or render cycle.
    #[must_use]
    pub fn scope<'a>(&'a self, context: Option<&'a TaskContext>) -> QueryScope<'a> {
        QueryScope {
            matrix: self,
            context,
        }
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
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    #[must_use]
    pub fn products(&self) -> &[CompiledProduct] {
        &self.products
    }

    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

fn compile(
    scenarios: &ScenarioSet,
    declarations: &Declarations,
) -> (TagRegistry, Vec<CompiledProduct>) {
    let registry = TagRegistry::build(scenarios, &declarations.operations);
    let products = compile_products(&registry, &declarations.products);
    tracing::debug!(
        tags = registry.len(),
        products = products.len(),
        "Compiled capability matrix"
    );
    (registry, products)
}

/// A matrix paired with the active task context.
#[derive(Debug, Clone, Copy)]
pub struct QueryScope<'a> {
    matrix: &'a CapabilityMatrix,
    context: Option<&'a TaskContext>,
}

impl QueryScope<'_> {
    #[must_use]
    pub fn check_tag(&self, path: &str) -> bool {
        self.check_tag_with(path, Gate::Enforce)
    }

    #[must_use]
    pub fn check_tag_with(&self, path: &str, gate: Gate) -> bool {
        self.matrix.check_tag(path, self.context, gate)
    }

    pub fn check_tags<I, S>(&self, paths: I, mode: CheckMode) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.check_tags_with(paths, mode, Gate::Enforce)
    }

    pub fn check_tags_with<I, S>(&self, paths: I, mode: CheckMode, gate: Gate) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.matrix.check_tags(paths, mode, self.context, gate)
    }

    #[must_use]
    pub fn evaluate(&self, path: &str) -> Decision {
        self.matrix.evaluate(path, self.context, Gate::Enforce)
    }

    #[must_use]
    pub fn context(&self) -> Option<&TaskContext> {
        self.context
    }
}
