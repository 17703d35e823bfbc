//! Product compiler: declared combinations into queryable vectors.

use std::collections::HashSet;

use capmatrix_types::{BitVector, ProductDecl};

use crate::registry::{TagLookup, TagRegistry};

/// A declared product compiled against a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledProduct {
    index: usize,
    vector: BitVector,
}

impl CompiledProduct {
    /// Position of the source declaration in the product list.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn vector(&self) -> &BitVector {
        &self.vector
    }

    /// True when every bit of `query` is present in this product.
    #[must_use]
    pub fn covers(&self, query: &BitVector) -> bool {
        self.vector.contains(query)
    }
}

/// Compile every product, preserving input order.
#[must_use]
pub fn compile_products(registry: &TagRegistry, products: &[ProductDecl]) -> Vec<CompiledProduct> {
    products
        .iter()
        .enumerate()
        .map(|(index, product)| compile_product(registry, index, product))
        .collect()
}

/// The product vector is the union of its (operation, scenario) pair vectors.
///
/// Every pair carries the same scenario bit, so summing the pairs directly
/// would carry that bit into a neighbouring position. Instead each distinct tag
/// of the cross join is summed exactly once, which keeps `add` over disjoint
/// bits and yields the same union.
fn compile_product(registry: &TagRegistry, index: usize, product: &ProductDecl) -> CompiledProduct {
    let Some(scenario) = registry.scenario(&product.scenario) else {
        tracing::warn!(
            product = index,
            scenario = %product.scenario,
            "Product names an unknown scenario and will never match"
        );
        return CompiledProduct {
            index,
            vector: BitVector::zero(),
        };
    };

    let mut seen: HashSet<&str> = HashSet::with_capacity(product.operate.len());
    let mut parts: Vec<&BitVector> = Vec::with_capacity(product.operate.len() + 1);
    parts.push(scenario);

    for name in &product.operate {
        match registry.resolve(name) {
            TagLookup::Operation(vector) => {
                if seen.insert(name.as_str()) {
                    parts.push(vector);
                }
            }
            TagLookup::Scenario(_) | TagLookup::Unknown => {
                tracing::warn!(
                    product = index,
                    operation = %name,
                    "Product names an unknown operation; skipping it"
                );
            }
        }
    }

    CompiledProduct {
        index,
        vector: BitVector::add(parts),
    }
}
