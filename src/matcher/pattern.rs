use regex::Regex;
use std::fmt;
use std::sync::Arc;

use super::ParamVec;

/// Pattern compilation error.
///
/// Returned by [`PathPattern::compile`] when a route declares a pattern the
/// matcher cannot turn into a usable regex. These are construction-time
/// programmer errors; a built tree never produces them at resolution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// The pattern string is empty
    Empty,
    /// A parameter segment is `:` with no name (e.g., `/users/:`)
    EmptyParamName {
        /// The offending pattern
        pattern: String,
    },
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => {
                write!(f, "path pattern error: pattern must not be empty")
            }
            PatternError::EmptyParamName { pattern } => {
                write!(
                    f,
                    "path pattern error: parameter segment in '{pattern}' has no name. \
                    Expected ':name' where name is non-empty."
                )
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Whether a pattern is matched from the start of a location or against the
/// suffix left over by an ancestor.
///
/// Root-level routes declare absolute patterns (`/a/b`); nested routes
/// declare relative ones (`b/:id`). The distinction only affects how the
/// regex is assembled; both forms are prefix matchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternAnchor {
    /// Pattern begins with `/` and matches from the start of the location
    Absolute,
    /// Pattern matches the remainder handed down by the parent route
    Relative,
}

/// Result of a successful prefix match: how much of the input was consumed
/// and the raw capture values, positionally aligned with the pattern's
/// declared parameter names.
#[derive(Debug, Clone)]
pub struct PrefixMatch {
    /// Byte length of the matched prefix within the input
    pub consumed: usize,
    /// Raw capture-group values in declaration order
    pub captures: Vec<String>,
}

/// A compiled route pattern: anchored regex plus ordered parameter names.
///
/// Compiled once at tree construction; the pattern survives for the tree's
/// lifetime and matching allocates only for captured values.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    regex: Regex,
    param_names: Vec<Arc<str>>,
    /// The bare root pattern `/` consumes exactly the leading slash and is
    /// matched without the regex.
    is_root: bool,
}

impl PathPattern {
    /// Compile a path pattern into a prefix matcher.
    ///
    /// Segments of the form `:name` become `([^/]+)` capture groups; literal
    /// segments are regex-escaped. The ordered parameter-name list is zipped
    /// positionally with capture groups on extraction.
    ///
    /// # Errors
    ///
    /// [`PatternError::Empty`] for an empty pattern, and
    /// [`PatternError::EmptyParamName`] for a bare `:` segment.
    pub fn compile(pattern: &str, anchor: PatternAnchor) -> Result<Self, PatternError> {
        if pattern.is_empty() {
            return Err(PatternError::Empty);
        }

        if pattern == "/" {
            // Matched structurally in `match_prefix`; the stored regex is
            // never consulted for the root pattern.
            return Ok(Self {
                raw: pattern.to_string(),
                regex: Regex::new("^/").map_err(|_| PatternError::Empty)?,
                param_names: Vec::new(),
                is_root: true,
            });
        }

        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');
        let mut param_names: Vec<Arc<str>> = Vec::new();

        let mut first = true;
        for segment in pattern.split('/') {
            if segment.is_empty() {
                continue;
            }
            if !first || anchor == PatternAnchor::Absolute {
                expr.push('/');
            }
            first = false;
            if let Some(name) = segment.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::EmptyParamName {
                        pattern: pattern.to_string(),
                    });
                }
                expr.push_str("([^/]+)");
                param_names.push(Arc::from(name));
            } else {
                expr.push_str(&regex::escape(segment));
            }
        }

        // The expression is assembled from escaped literals and a fixed
        // capture form, so compilation cannot fail for a non-empty pattern.
        let regex = Regex::new(&expr).map_err(|_| PatternError::Empty)?;

        Ok(Self {
            raw: pattern.to_string(),
            regex,
            param_names,
            is_root: false,
        })
    }

    /// The pattern string as declared.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Ordered parameter names declared by this pattern.
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.param_names
    }

    /// Match this pattern against the leading portion of `rest`.
    ///
    /// Returns `None` unless the pattern matches a prefix that ends on a
    /// segment boundary: end of input, or immediately before a `/`. The
    /// boundary check replaces the lookahead the `regex` crate lacks.
    #[must_use]
    pub fn match_prefix(&self, rest: &str) -> Option<PrefixMatch> {
        if self.is_root {
            // Consume only the separator; everything after it belongs to
            // child routes.
            return rest.starts_with('/').then(|| PrefixMatch {
                consumed: 1,
                captures: Vec::new(),
            });
        }

        let caps = self.regex.captures(rest)?;
        let full = caps.get(0)?;
        let end = full.end();
        if end < rest.len() && !rest[end..].starts_with('/') {
            return None;
        }

        let captures = caps
            .iter()
            .skip(1)
            .map(|c| c.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect();

        Some(PrefixMatch {
            consumed: end,
            captures,
        })
    }

    /// Zip raw captures with declared parameter names.
    ///
    /// Purely positional; no duplicate-name checking is performed here.
    /// Duplicate names across nested patterns silently overwrite when the
    /// resolver merges levels (later wins).
    #[must_use]
    pub fn extract_params(&self, m: &PrefixMatch) -> ParamVec {
        self.param_names
            .iter()
            .zip(m.captures.iter())
            .map(|(name, value)| (Arc::clone(name), value.clone()))
            .collect()
    }
}
