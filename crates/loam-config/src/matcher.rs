//! Path matcher compilation
//!
//! Ignore entries and asset `test` fields are declared as literal
//! prefixes or regex patterns; programmatic callers may also supply an
//! arbitrary predicate. Compilation coerces all three into one uniform
//! boolean predicate over paths and is idempotent: an already-compiled
//! matcher passes through unchanged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A matcher as it appears in the configuration tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MatcherSpec {
    /// `{ regex = "..." }`: matched via the compiled pattern
    Pattern { regex: String },
    /// A bare string: anchored literal-prefix match
    Literal(String),
}

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

enum MatcherKind {
    Prefix(String),
    Regex(regex::Regex),
    Predicate(Predicate),
}

/// A compiled single-argument boolean predicate over paths.
#[derive(Clone)]
pub struct Matcher {
    kind: Arc<MatcherKind>,
}

/// Input accepted by [`Matcher::compile`]: a declared spec or an
/// already-compiled matcher.
pub enum MatcherInput {
    Spec(MatcherSpec),
    Compiled(Matcher),
}

impl From<MatcherSpec> for MatcherInput {
    fn from(spec: MatcherSpec) -> Self {
        Self::Spec(spec)
    }
}

impl From<Matcher> for MatcherInput {
    fn from(matcher: Matcher) -> Self {
        Self::Compiled(matcher)
    }
}

impl From<&str> for MatcherInput {
    fn from(literal: &str) -> Self {
        Self::Spec(MatcherSpec::Literal(literal.to_string()))
    }
}

impl Matcher {
    /// Compile a matcher input into a predicate.
    ///
    /// A literal becomes an anchored starts-with check, a regex spec is
    /// compiled, and an already-compiled matcher is returned as-is,
    /// never re-wrapped.
    pub fn compile(input: impl Into<MatcherInput>) -> Result<Matcher> {
        match input.into() {
            MatcherInput::Compiled(matcher) => Ok(matcher),
            MatcherInput::Spec(MatcherSpec::Literal(prefix)) => Ok(Matcher {
                kind: Arc::new(MatcherKind::Prefix(prefix)),
            }),
            MatcherInput::Spec(MatcherSpec::Pattern { regex }) => {
                let compiled = regex::Regex::new(&regex).map_err(|e| Error::Matcher {
                    pattern: regex.clone(),
                    message: e.to_string(),
                })?;
                Ok(Matcher {
                    kind: Arc::new(MatcherKind::Regex(compiled)),
                })
            }
        }
    }

    /// Wrap an arbitrary predicate as a matcher.
    pub fn from_fn(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Matcher {
        Matcher {
            kind: Arc::new(MatcherKind::Predicate(Arc::new(predicate))),
        }
    }

    /// Test a candidate path against the predicate.
    pub fn matches(&self, candidate: &str) -> bool {
        match self.kind.as_ref() {
            MatcherKind::Prefix(prefix) => candidate.starts_with(prefix.as_str()),
            MatcherKind::Regex(regex) => regex.is_match(candidate),
            MatcherKind::Predicate(predicate) => predicate(candidate),
        }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind.as_ref() {
            MatcherKind::Prefix(prefix) => f.debug_tuple("Matcher::Prefix").field(prefix).finish(),
            MatcherKind::Regex(regex) => f
                .debug_tuple("Matcher::Regex")
                .field(&regex.as_str())
                .finish(),
            MatcherKind::Predicate(_) => f.write_str("Matcher::Predicate(..)"),
        }
    }
}
