//! Integration tests for pixfx crates.
//!
//! End-to-end checks that cross crate boundaries: whole-stack rendering,
//! project persistence, PNG round trips, and the behavioral properties each
//! effect family guarantees.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod properties;
#[cfg(test)]
mod workflow;
