//! The resolved match chain for a location, plus its restorable encoding.
//!
//! A [`MatchList`] is a pure value: the ordered chain of matched routes with
//! their extracted parameters, the merged path/query parameter maps, and an
//! opaque `extra` payload. It owns no container state. Branch diffing in the
//! multi-branch shell compares match lists by value to decide rebuild vs
//! reuse, and persistence round-trips them through
//! [`RestorableMatchList`].

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::NavHost;
use crate::location::Location;
use crate::matcher::ParamVec;
use crate::resolver::{self, ResolveError};
use crate::route::{RouteId, RouteTree};

/// One link of the matched chain: a route identity plus the parameters its
/// own pattern captured.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchEntry {
    /// The matched route
    pub route: RouteId,
    /// Parameters captured by this route's pattern (empty for shells)
    pub params: ParamVec,
}

/// Ordered chain of matched routes for a location.
///
/// Equality compares the route-identity chain with per-entry parameters in
/// order, plus the query map; the `extra` payload is deliberately excluded
/// (it is carried, not matched).
#[derive(Debug, Clone)]
pub struct MatchList {
    entries: Vec<MatchEntry>,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    location: Location,
    extra: Option<Value>,
}

impl MatchList {
    pub(crate) fn new(
        entries: Vec<MatchEntry>,
        location: Location,
        extra: Option<Value>,
    ) -> Self {
        let mut path_params = HashMap::new();
        for entry in &entries {
            for (name, value) in &entry.params {
                // Descendant wins on duplicate names across chain levels.
                path_params.insert(name.to_string(), value.clone());
            }
        }
        let query_params = location.query_map();
        Self {
            entries,
            path_params,
            query_params,
            location,
            extra,
        }
    }

    /// The "no match yet" value.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            path_params: HashMap::new(),
            query_params: HashMap::new(),
            location: Location::parse("/"),
            extra: None,
        }
    }

    /// True for a list with no matched routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of routes in the matched chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The chain, root first.
    #[must_use]
    pub fn entries(&self) -> &[MatchEntry] {
        &self.entries
    }

    /// The deepest matched route.
    #[must_use]
    pub fn deepest(&self) -> Option<&MatchEntry> {
        self.entries.last()
    }

    /// Position of `route` in the chain, if present.
    #[must_use]
    pub fn position(&self, route: RouteId) -> Option<usize> {
        self.entries.iter().position(|e| e.route == route)
    }

    /// The location this list was resolved from.
    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// All path parameters along the chain (descendant wins on duplicates).
    #[must_use]
    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.path_params
    }

    /// Query parameters of the location.
    #[must_use]
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// The opaque payload carried with the navigation, if any.
    #[must_use]
    pub fn extra(&self) -> Option<&Value> {
        self.extra.as_ref()
    }

    /// Encode into the restorable primitive form.
    #[must_use]
    pub fn encode<H: NavHost>(&self, tree: &RouteTree<H>) -> RestorableMatchList {
        RestorableMatchList {
            chain: self
                .entries
                .iter()
                .map(|e| RestorableMatch {
                    token: tree.route_token(e.route).to_string(),
                    params: e
                        .params
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.clone()))
                        .collect(),
                })
                .collect(),
            location: self.location.to_string(),
            query: self.query_params.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            extra: self.extra.clone(),
        }
    }

    /// Decode a restorable form by re-resolving its stored location and
    /// verifying the chain tokens.
    ///
    /// # Errors
    ///
    /// [`DecodeError::Unresolvable`] when the stored location no longer
    /// resolves, [`DecodeError::ChainMismatch`] when it resolves to a
    /// different chain than the one that was persisted (e.g., the route tree
    /// changed between runs).
    pub fn decode<H: NavHost>(
        tree: &RouteTree<H>,
        restorable: RestorableMatchList,
    ) -> Result<Self, DecodeError> {
        let location = Location::parse(&restorable.location);
        let list = resolver::resolve(tree, &location, restorable.extra)
            .map_err(DecodeError::Unresolvable)?;

        if list.entries.len() != restorable.chain.len() {
            return Err(DecodeError::ChainMismatch {
                expected: restorable.chain.len(),
                found: list.entries.len(),
            });
        }
        for (entry, stored) in list.entries.iter().zip(&restorable.chain) {
            if tree.route_token(entry.route) != stored.token {
                return Err(DecodeError::TokenMismatch {
                    token: stored.token.clone(),
                });
            }
        }

        Ok(list)
    }
}

impl PartialEq for MatchList {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries && self.query_params == other.query_params
    }
}

/// Restorable primitive representation of a [`MatchList`].
///
/// Serialized per branch into the host's restoration store; a plain serde
/// value tree so any key/value snapshot facility can hold it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorableMatchList {
    /// Route-location tokens plus per-route parameters, root first
    pub chain: Vec<RestorableMatch>,
    /// The full location string (path plus query)
    pub location: String,
    /// Query parameters at encode time
    pub query: BTreeMap<String, String>,
    /// Opaque payload, if any
    pub extra: Option<Value>,
}

/// One encoded chain link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestorableMatch {
    /// Stable route token (name or full pattern path)
    pub token: String,
    /// Parameters captured by that route
    pub params: BTreeMap<String, String>,
}

/// Failure to decode a persisted match list.
///
/// Recoverable per branch: a branch whose blob fails to decode falls back
/// to the unvisited state without touching its siblings.
#[derive(Debug)]
pub enum DecodeError {
    /// The stored location no longer resolves against the tree
    Unresolvable(ResolveError),
    /// The stored chain length differs from the re-resolved one
    ChainMismatch {
        /// Stored chain length
        expected: usize,
        /// Re-resolved chain length
        found: usize,
    },
    /// A stored token names a different route than the re-resolved chain
    TokenMismatch {
        /// The stale token
        token: String,
    },
    /// The persisted blob is not a valid encoding at all
    Malformed(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Unresolvable(err) => {
                write!(f, "match list decode error: stored location no longer resolves: {err}")
            }
            DecodeError::ChainMismatch { expected, found } => {
                write!(
                    f,
                    "match list decode error: stored chain has {expected} entries but the \
                    location resolves to {found}"
                )
            }
            DecodeError::TokenMismatch { token } => {
                write!(
                    f,
                    "match list decode error: stored token '{token}' does not match the \
                    re-resolved chain"
                )
            }
            DecodeError::Malformed(err) => {
                write!(f, "match list decode error: malformed persisted value: {err}")
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Unresolvable(err) => Some(err),
            DecodeError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}
