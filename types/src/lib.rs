//! Core domain types for capmatrix.
//!
//! This crate contains pure domain types with no IO and minimal dependencies:
//! the chunked [`BitVector`] arithmetic, tag identity ([`Position`],
//! [`TagKind`], [`ScenarioSet`]), the declared inputs of a matrix, and the
//! validated [`MatrixSettings`] the config loader produces.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod bitvec;
mod decl;
mod settings;
mod tag;

pub use bitvec::{BitVector, LIMB_BITS, LIMB_CAPACITY};
pub use decl::{Declarations, ProductDecl, TaskContext};
pub use settings::{MatrixMode, MatrixSettings, SettingsError};
pub use tag::{NONE_SCENARIO, Position, PositionError, ScenarioSet, TagKind};
