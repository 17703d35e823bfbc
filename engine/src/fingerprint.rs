//! Structural fingerprints of matrix declarations.
//!
//! A matrix remembers the fingerprint of the declarations it was compiled
//! from and only rebuilds when a refresh brings a different one.

use std::fmt;

use capmatrix_types::Declarations;
use sha2::{Digest, Sha256};

/// Structural hash of a set of declarations.
///
/// Two declaration sets with equal fingerprints compile to the same matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    #[must_use]
    pub fn of(declarations: &Declarations) -> Self {
        let mut hasher = Sha256::new();

        // Length prefixes keep ["ab"] and ["a", "b"] apart.
        update_len(&mut hasher, declarations.operations.len());
        for operation in &declarations.operations {
            update_str(&mut hasher, operation);
        }

        update_len(&mut hasher, declarations.products.len());
        for product in &declarations.products {
            update_str(&mut hasher, &product.scenario);
            update_len(&mut hasher, product.operate.len());
            for operation in &product.operate {
                update_str(&mut hasher, operation);
            }
        }

        Self(hasher.finalize().into())
    }
}

fn update_len(hasher: &mut Sha256, len: usize) {
    hasher.update((len as u64).to_le_bytes());
}

fn update_str(hasher: &mut Sha256, value: &str) {
    update_len(hasher, value.len());
    hasher.update(value.as_bytes());
}

/// First 8 bytes as hex, enough to tell rebuilds apart in logs.
impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
