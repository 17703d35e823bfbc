//! Chunked arbitrary-precision bit vectors.
//!
//! A [`BitVector`] is a non-negative integer of unbounded size stored as
//! little-endian limbs. Each limb packs [`LIMB_BITS`] value bits, so bit
//! position `p` (1-based) lives in limb `(p - 1) / 30` at local bit
//! `(p - 1) % 30`:
//!
//! ```text
//! limb:      0                 1                 2
//! positions: 1..=30            31..=60           61..=90
//! ```
//!
//! Only three operations exist: [`BitVector::add`], [`BitVector::and`] and
//! structural equality (`==`). Together they implement the subset test
//! [`BitVector::contains`] that the capability matrix is built on.
//!
//! # Invariants
//!
//! - A vector always has at least one limb.
//! - Trailing all-zero high limbs are trimmed after `and`, never after `add`.
//! - Equality compares limb count as well as limb values. Normalize through
//!   `and` before comparing vectors from different sources.

use std::fmt;

use crate::Position;

/// Value bits packed into each limb.
pub const LIMB_BITS: u32 = 30;

/// Running-sum ceiling for a single limb during [`BitVector::add`].
///
/// One bit wider than the packing width. Limbs built from 30-bit packing stay
/// below it, so additions of disjoint vectors never carry.
pub const LIMB_CAPACITY: u64 = (1 << 31) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    limbs: Vec<u32>,
}

impl BitVector {
    /// The normalized zero vector: a single zero limb.
    #[must_use]
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    /// Build a vector from raw little-endian limbs. No trimming is applied.
    #[must_use]
    pub fn from_limbs(limbs: Vec<u32>) -> Self {
        if limbs.is_empty() {
            return Self::zero();
        }
        Self { limbs }
    }

    /// A vector with exactly one set bit at `position`.
    ///
    /// ```
    /// use capmatrix_types::{BitVector, Position};
    ///
    /// let first = BitVector::encode_bit(Position::new(1).unwrap());
    /// assert_eq!(first.limbs(), [1]);
    ///
    /// let thirty_first = BitVector::encode_bit(Position::new(31).unwrap());
    /// assert_eq!(thirty_first.limbs(), [0, 1]);
    /// ```
    #[must_use]
    pub fn encode_bit(position: Position) -> Self {
        let offset = position.get() - 1;
        let index = (offset / LIMB_BITS) as usize;
        let mut limbs = vec![0; index + 1];
        limbs[index] = 1 << (offset % LIMB_BITS);
        Self { limbs }
    }

    /// Limb-wise sum of every vector, aligned at limb 0.
    ///
    /// When a limb's running sum exceeds [`LIMB_CAPACITY`] the capacity is
    /// subtracted and 1 is carried into the next limb, growing the vector as
    /// needed. Callers pass vectors with pairwise-disjoint bits, which makes
    /// the sum a bitwise OR; that precondition is not checked here.
    ///
    /// An empty input yields [`BitVector::zero`].
    #[must_use]
    pub fn add<'a, I>(vectors: I) -> Self
    where
        I: IntoIterator<Item = &'a BitVector>,
    {
        let mut limbs = vec![0];
        for vector in vectors {
            limbs = add_limbs(&limbs, &vector.limbs);
        }
        Self { limbs }
    }

    /// Limb-wise AND with trailing zero limbs trimmed.
    ///
    /// The shorter operand is zero-padded, so only the common prefix of limbs
    /// can carry set bits into the result.
    #[must_use]
    pub fn and(&self, other: &BitVector) -> Self {
        let mut limbs: Vec<u32> = self
            .limbs
            .iter()
            .zip(&other.limbs)
            .map(|(a, b)| a & b)
            .collect();
        while limbs.len() > 1 && limbs.last() == Some(&0) {
            limbs.pop();
        }
        Self::from_limbs(limbs)
    }

    /// Subset test: every bit of `query` is also set in `self`.
    ///
    /// `query` must be free of trailing zero limbs for this to hold, which is
    /// the case for every vector built from tags.
    #[must_use]
    pub fn contains(&self, query: &BitVector) -> bool {
        self.and(query) == *query
    }

    #[must_use]
    pub fn is_set(&self, position: Position) -> bool {
        let offset = position.get() - 1;
        self.limbs
            .get((offset / LIMB_BITS) as usize)
            .is_some_and(|limb| limb & (1 << (offset % LIMB_BITS)) != 0)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|limb| *limb == 0)
    }

    #[must_use]
    pub fn limbs(&self) -> &[u32] {
        &self.limbs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.limbs.len()
    }

    /// Always false: a vector holds at least one limb.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.limbs.is_empty()
    }
}

impl Default for BitVector {
    fn default() -> Self {
        Self::zero()
    }
}

fn add_limbs(a: &[u32], b: &[u32]) -> Vec<u32> {
    let width = a.len().max(b.len());
    let mut out = Vec::with_capacity(width + 1);
    let mut carry: u64 = 0;
    let mut index = 0;

    while index < width || carry > 0 {
        let mut sum = u64::from(a.get(index).copied().unwrap_or(0))
            + u64::from(b.get(index).copied().unwrap_or(0))
            + carry;
        carry = 0;
        while sum > LIMB_CAPACITY {
            sum -= LIMB_CAPACITY;
            carry += 1;
        }
        out.push(sum as u32);
        index += 1;
    }

    out
}

/// Hex limbs, high limb first: `0x1:00000002`.
impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut limbs = self.limbs.iter().rev();
        if let Some(high) = limbs.next() {
            write!(f, "{high:#x}")?;
        }
        for limb in limbs {
            write!(f, ":{limb:08x}")?;
        }
        Ok(())
    }
}
