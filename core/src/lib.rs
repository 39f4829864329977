//! Text algorithms behind CLI flag parsing helpers.
//!
//! This crate holds the pure, I/O-free pieces used when reporting mistyped
//! flags and printing usage screens:
//!
//! - [`DistanceEngine`]: bounded optimal string alignment distance over
//!   code points, backed by a reusable, non-blocking scratch pool.
//! - [`closest_match`]: "did you mean" selection on top of the distance.
//! - [`optimal_breakpoint`]: picks the label column width that keeps the
//!   most usage entries on a single line.
//! - [`wrapped_lines`] / [`wrap`]: greedy paragraph wrapping that breaks at
//!   spaces and after hyphens.
//!
//! Precondition violations (oversized distance inputs, control characters in
//! wrapped text) are reported as [`TextError`].
//!
//! # Example
//!
//! ```
//! use flagkit_core::*;
//!
//! let engine = DistanceEngine::new();
//! let hit = closest_match(&engine, "nubmer", ["color", "number"]).unwrap();
//! assert_eq!(hit.candidate, "number");
//!
//! let width = optimal_breakpoint(&[Split::new(8, 25), Split::new(14, 89)], 72);
//! assert_eq!(width, 8);
//!
//! let lines = wrap_to_vec("flags can't be repeated", 12).unwrap();
//! assert_eq!(lines, ["flags can't", "be repeated"]);
//! ```

mod breakpoint;
mod distance;
mod error;
mod suggest;
mod wrap;

pub use breakpoint::{Split, optimal_breakpoint};
pub use distance::{
    DistanceEngine, MAX_COMBINED_LEN, ScratchPool, check_combined_len, edit_distance,
};
pub use error::{Result, TextError};
pub use suggest::{
    MIN_SIMILARITY, MIN_SUGGESTION_CUTOFF, Suggestion, closest_match, suggestion_cutoff,
};
pub use wrap::{
    Fragment, FragmentKind, Fragments, WrappedLines, fragments, validate_paragraph, wrap, wrap_to_vec,
    wrapped_lines,
};
