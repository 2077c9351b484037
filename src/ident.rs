//! Identifier generation and sanitizing.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Identifier of a placed component, unique across the whole forest.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Produces `<tag>_<millis>_<suffix>` identifiers.
///
/// Every identifier handed out (or reserved) is remembered, and a fresh
/// random suffix is drawn until the candidate is unused.
pub struct IdGenerator {
    rng: StdRng,
    issued: HashSet<String>,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            issued: HashSet::new(),
        }
    }

    /// Deterministic suffixes, for tests and replayable sessions.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
        }
    }

    pub fn next(&mut self, tag: &str) -> ComponentId {
        let millis = Utc::now().timestamp_millis();
        loop {
            let suffix: u32 = self.rng.gen_range(0..100_000);
            let candidate = format!("{tag}_{millis}_{suffix}");
            if self.issued.insert(candidate.clone()) {
                return ComponentId(candidate);
            }
            tracing::debug!("identifier collision on {candidate}, redrawing");
        }
    }

    /// Mark an identifier that entered the session from elsewhere (a loaded design).
    pub fn reserve(&mut self, id: &ComponentId) {
        self.issued.insert(id.0.clone());
    }

    pub fn is_issued(&self, id: &ComponentId) -> bool {
        self.issued.contains(&id.0)
    }
}

/// Replace every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_id(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
