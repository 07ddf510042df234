//! # Matcher Module
//!
//! Path pattern compilation and prefix matching for the route tree.
//!
//! ## Overview
//!
//! The matcher is responsible for:
//! - Compiling declarative path patterns (e.g., `family/:fid`) into regexes
//! - Matching a pattern against the leading portion of a location
//! - Extracting named path parameters from matched segments
//!
//! ## Architecture
//!
//! Matching uses a two-phase approach:
//!
//! 1. **Compilation**: At tree-construction time, each pattern is converted
//!    into an anchored regex plus an ordered list of parameter names. A
//!    segment of the form `:name` binds one non-slash-delimited value;
//!    literal segments are escaped and matched verbatim.
//!
//! 2. **Prefix matching**: At resolution time, a pattern only needs to match
//!    an initial portion of the remaining location. The unmatched suffix is
//!    handed to the matched route's children. A match must end on a segment
//!    boundary, checked in code since the `regex` crate has no lookahead.

mod pattern;

pub use pattern::{PathPattern, PatternAnchor, PatternError, PrefixMatch};

use smallvec::SmallVec;
use std::sync::Arc;

/// Maximum number of path parameters before heap allocation.
/// Navigation routes rarely carry more than a couple of parameters
/// (e.g., `/family/:fid/person/:pid`), so matches stay on the stack.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the resolution hot path.
///
/// Param names use `Arc<str>` because they come from the static route tree
/// (known at construction); values are per-resolution data from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;
