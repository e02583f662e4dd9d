//! Property-based tests for the Zenithal parser
//!
//! These tests check properties that hold for ANY input, not just the
//! fixtures: the parser never panics, errors point inside the input, and
//! parsing is deterministic.

mod generators;
mod invariants;
