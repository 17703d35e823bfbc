//! Capability matrix engine.
//!
//! Answers whether an operation is permitted in the active scenario, given a
//! declared list of allowed (operations × scenario) products.
//!
//! ```text
//! ScenarioSet + operations ──► TagRegistry   (tag → bit position → BitVector)
//!                                  │
//! products ───────────────────► compile_products  (one BitVector per product)
//!                                  │
//! (path, TaskContext) ────────► evaluate   (query ⊆ some product? + executable gate)
//! ```
//!
//! [`CapabilityMatrix`] bundles the three stages and rebuilds them whenever the
//! declarations change.
//!
//! # Example
//!
//! ```
//! use capmatrix_engine::{CapabilityMatrix, CheckMode, Declarations, ProductDecl, ScenarioSet, TaskContext};
//!
//! let declarations = Declarations::new(
//!     ["view", "edit"],
//!     vec![
//!         ProductDecl::new(["view"], "none"),
//!         ProductDecl::new(["view", "edit"], "draft"),
//!     ],
//! );
//! let matrix = CapabilityMatrix::new(ScenarioSet::new(["draft", "published"]), &declarations);
//!
//! assert!(matrix.scope(None).check_tag("view"));
//! assert!(!matrix.scope(None).check_tag("edit"));
//!
//! let draft = TaskContext::new("draft", true);
//! assert!(matrix.scope(Some(&draft)).check_tags(["view", "edit"], CheckMode::All));
//! ```

pub mod compiler;
pub mod evaluator;
mod fingerprint;
mod matrix;
pub mod registry;

pub use compiler::{CompiledProduct, compile_products};
pub use evaluator::{CheckMode, Decision, Gate};
pub use fingerprint::Fingerprint;
pub use matrix::{CapabilityMatrix, QueryScope, Refresh};
pub use registry::{TagLookup, TagRegistry};

pub use capmatrix_types::{
    BitVector, Declarations, MatrixMode, MatrixSettings, ProductDecl, ScenarioSet, TaskContext,
};
