//! Location resolution: the depth-first tree walk, redirect chasing, and
//! the supersede guard for interleaved navigations.
//!
//! ## Matching contract
//!
//! At each tree level, siblings are tried in declaration order and the FIRST
//! one whose pattern prefix-matches the remaining suffix wins; later
//! siblings are never tried at that level. Declaration order is therefore an
//! explicit precedence contract: static routes go before parameterized
//! catch-alls. Shell routes consume no path; a shell matches when one of
//! its children matches the same suffix, and it is inserted into the chain
//! ahead of that child. Resolution succeeds only when the whole path is
//! consumed.
//!
//! ## Redirects
//!
//! After a chain is built, redirects are evaluated from the root downward;
//! the first non-`None` destination wins (a parent's redirect takes priority
//! over any descendant's) and resolution restarts at the new location.
//! Chains are bounded by [`RedirectPolicy`] and fail with
//! [`ResolveError::RedirectLoop`] past the bound.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::host::{NavHost, RouteContext};
use crate::location::Location;
use crate::matcher::ParamVec;
use crate::matchlist::{MatchEntry, MatchList};
use crate::route::{RouteId, RouteKind, RouteTree};

/// Default bound on redirect hops for one resolution.
pub const DEFAULT_REDIRECT_LIMIT: usize = 5;

/// Configurable bound on redirect chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectPolicy {
    /// Maximum number of redirect hops before aborting
    pub max_redirects: usize,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_REDIRECT_LIMIT,
        }
    }
}

/// Resolution-time error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No route chain consumes the location.
    ///
    /// Recoverable: the host typically renders a not-found presentation.
    NoMatch {
        /// The location that failed to resolve
        location: String,
    },
    /// A redirect chain exceeded the configured bound.
    RedirectLoop {
        /// The originally requested location
        location: String,
        /// The bound that was exceeded
        limit: usize,
    },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoMatch { location } => {
                write!(f, "resolution error: no route matches location '{location}'")
            }
            ResolveError::RedirectLoop { location, limit } => {
                write!(
                    f,
                    "resolution error: redirect chain starting at '{location}' exceeded \
                    {limit} hops; check the routes' redirects for a cycle"
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolve a location against the tree without evaluating redirects.
///
/// # Errors
///
/// [`ResolveError::NoMatch`] when no chain consumes the whole path.
pub fn resolve<H: NavHost>(
    tree: &RouteTree<H>,
    location: &Location,
    extra: Option<Value>,
) -> Result<MatchList, ResolveError> {
    debug!(location = %location, "route match attempt");

    let mut entries = Vec::new();
    if walk(tree, tree.roots(), location.path(), &mut entries) {
        info!(
            location = %location,
            chain_len = entries.len(),
            "location resolved"
        );
        Ok(MatchList::new(entries, location.clone(), extra))
    } else {
        warn!(location = %location, "no route matched");
        Err(ResolveError::NoMatch {
            location: location.to_string(),
        })
    }
}

fn walk<H: NavHost>(
    tree: &RouteTree<H>,
    siblings: &[RouteId],
    rest: &str,
    entries: &mut Vec<MatchEntry>,
) -> bool {
    for &id in siblings {
        match &tree.entry(id).kind {
            RouteKind::Leaf { pattern, .. } => {
                let Some(prefix) = pattern.match_prefix(rest) else {
                    continue;
                };
                let params = pattern.extract_params(&prefix);
                entries.push(MatchEntry { route: id, params });

                let mut remainder = &rest[prefix.consumed..];
                if let Some(stripped) = remainder.strip_prefix('/') {
                    remainder = stripped;
                }
                if remainder.is_empty() {
                    return true;
                }
                // The first prefix match commits this subtree; an unmatched
                // remainder fails the whole resolution rather than falling
                // through to later siblings.
                return walk(tree, tree.children(id), remainder, entries);
            }
            RouteKind::SingleShell { .. } | RouteKind::BranchShell { .. } => {
                // Shells consume no path. If no child matches, the shell is
                // unwound and the next sibling gets its turn.
                let before = entries.len();
                entries.push(MatchEntry {
                    route: id,
                    params: ParamVec::new(),
                });
                if walk(tree, tree.children(id), rest, entries) {
                    return true;
                }
                entries.truncate(before);
            }
        }
    }
    false
}

/// Resolve with redirect chasing, bounded by `policy`.
///
/// # Errors
///
/// [`ResolveError::NoMatch`] from any hop, or
/// [`ResolveError::RedirectLoop`] once the hop bound is exceeded.
pub fn resolve_with_redirects<H: NavHost>(
    tree: &RouteTree<H>,
    location: &str,
    extra: Option<Value>,
    policy: RedirectPolicy,
) -> Result<MatchList, ResolveError> {
    let mut current = location.to_string();
    let mut hops = 0usize;
    loop {
        let loc = Location::parse(&current);
        let list = resolve(tree, &loc, extra.clone())?;
        let Some(dest) = first_redirect(tree, &list) else {
            return Ok(list);
        };
        if hops >= policy.max_redirects {
            warn!(
                location = %location,
                limit = policy.max_redirects,
                "redirect chain exceeded bound"
            );
            return Err(ResolveError::RedirectLoop {
                location: location.to_string(),
                limit: policy.max_redirects,
            });
        }
        hops += 1;
        debug!(from = %current, to = %dest, hop = hops, "following redirect");
        current = dest;
    }
}

/// Evaluate redirects along a chain, root first; the root-most non-`None`
/// destination wins.
fn first_redirect<H: NavHost>(tree: &RouteTree<H>, list: &MatchList) -> Option<String> {
    for entry in list.entries() {
        let RouteKind::Leaf {
            redirect: Some(redirect),
            ..
        } = &tree.entry(entry.route).kind
        else {
            continue;
        };
        let ctx = RouteContext {
            location: list.location(),
            params: &entry.params,
            path_params: list.path_params(),
            query_params: list.query_params(),
            extra: list.extra(),
        };
        if let Some(dest) = redirect(&ctx) {
            return Some(dest);
        }
    }
    None
}

/// Ticket identifying one requested resolution; see [`Resolver::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveTicket {
    serial: u64,
    location: String,
}

impl ResolveTicket {
    /// The location this ticket was issued for.
    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

/// Stateful resolution front end: redirect policy plus the supersede guard.
///
/// Navigation events are serialized by the host's event queue, but a host
/// may still interleave a deferred redirect hop with a fresh user
/// navigation. Each request gets a [`ResolveTicket`]; committing a result
/// whose ticket is no longer the latest discards it, so a newer resolve
/// always supersedes an older one.
#[derive(Debug, Default)]
pub struct Resolver {
    policy: RedirectPolicy,
    latest: u64,
}

impl Resolver {
    /// A resolver with the default redirect policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A resolver with an explicit redirect policy.
    #[must_use]
    pub fn with_policy(policy: RedirectPolicy) -> Self {
        Self { policy, latest: 0 }
    }

    /// Record a requested location and issue its ticket.
    pub fn begin(&mut self, location: impl Into<String>) -> ResolveTicket {
        self.latest += 1;
        ResolveTicket {
            serial: self.latest,
            location: location.into(),
        }
    }

    /// Resolve the ticket's location, chasing redirects per policy.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] from the underlying resolution.
    pub fn run<H: NavHost>(
        &self,
        tree: &RouteTree<H>,
        ticket: &ResolveTicket,
        extra: Option<Value>,
    ) -> Result<MatchList, ResolveError> {
        resolve_with_redirects(tree, &ticket.location, extra, self.policy)
    }

    /// Accept a result only if its ticket is still the latest request.
    ///
    /// Returns `None` for a superseded result, which the caller must
    /// discard.
    #[must_use]
    pub fn commit(&self, ticket: &ResolveTicket, list: MatchList) -> Option<MatchList> {
        if ticket.serial == self.latest {
            Some(list)
        } else {
            debug!(
                location = %ticket.location,
                "discarding superseded resolution"
            );
            None
        }
    }

    /// Resolve a location synchronously: begin, run, and commit in one call.
    ///
    /// # Errors
    ///
    /// Propagates [`ResolveError`] from the underlying resolution.
    pub fn resolve_location<H: NavHost>(
        &mut self,
        tree: &RouteTree<H>,
        location: &str,
        extra: Option<Value>,
    ) -> Result<MatchList, ResolveError> {
        let ticket = self.begin(location);
        let list = self.run(tree, &ticket, extra)?;
        // Nothing can supersede within a synchronous call.
        Ok(self.commit(&ticket, list).unwrap_or_else(MatchList::empty))
    }
}
