//! Fixtures for source map verification.
//!
//! Each fixture is a small group of input files with a staggered call chain
//! `a0 → a1 → a2 → b0 → … → c2`. Every function passes its own name to the next
//! as a string literal, so each quoted name sits at a unique line and column
//! that the verifier can find with a plain text search.

mod catalog;
mod fixture;

pub use fixture::{Fixture, FixtureError, FixtureFile, Probe, Variant};
