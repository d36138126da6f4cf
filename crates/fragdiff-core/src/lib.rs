//! Generic alignment primitives shared by the fragment diff engine.
//!
//! This crate knows nothing about fragments, Go, or rendering: it is a
//! narrow, reusable layer, kept separate so the edit-distance and
//! assignment math can be tested without any language-specific baggage.

mod assignment;
mod edit_distance;

pub use assignment::{greedy_match, Assignment};
pub use edit_distance::{align, string_edit_distance, Alignment};
