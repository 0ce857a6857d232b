//! Dependency map and impact analysis.
//!
//! Unlike [`TokenGraph`](crate::TokenGraph), which keeps only the winning
//! alias per path, this map keeps every alias reference seen in any
//! document, oriented for "what uses this" queries.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use tokenweave_core::{walk, TokenDocument, TokenKind};

/// Token -> token reference map, in both directions.
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    uses: IndexMap<String, IndexSet<String>>,
    used_by: IndexMap<String, IndexSet<String>>,
}

/// A token whose value may change because of a change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactedToken {
    pub path: String,
    /// Number of alias hops from the change.
    pub depth: usize,
    /// The changed token it was reached from.
    pub via: String,
}

/// Result of an impact query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactReport {
    pub changed: Vec<String>,
    pub affected: Vec<ImpactedToken>,
}

impl ImpactReport {
    pub fn is_empty(&self) -> bool {
        self.affected.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.affected.iter().any(|t| t.path == path)
    }
}

impl DependencyMap {
    /// Collect every alias reference from `documents`.
    pub fn build(documents: &[&TokenDocument]) -> Self {
        let mut map = Self::default();
        for doc in documents {
            for (path, token) in walk(doc) {
                if let Some(target) = &token.alias_target {
                    map.add_edge(&path.canonical(), &target.canonical());
                }
            }
        }
        map
    }

    /// Record that `from` references `to`.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.uses
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.used_by
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
    }

    /// Tokens `path` references directly.
    pub fn uses(&self, path: &str) -> impl Iterator<Item = &str> {
        self.uses.get(path).into_iter().flatten().map(String::as_str)
    }

    /// Tokens that reference `path` directly.
    pub fn used_by(&self, path: &str) -> impl Iterator<Item = &str> {
        self.used_by
            .get(path)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn is_referenced(&self, path: &str) -> bool {
        self.used_by.get(path).map_or(false, |s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.uses.is_empty()
    }

    /// Edge count.
    pub fn len(&self) -> usize {
        self.uses.values().map(IndexSet::len).sum()
    }

    /// Breadth-first over `used_by` from every changed token. The changed
    /// tokens themselves are not reported; each affected token appears
    /// once, at its shallowest depth.
    pub fn impact<S: AsRef<str>>(&self, changed: &[S]) -> ImpactReport {
        let changed: Vec<String> = changed.iter().map(|s| s.as_ref().to_string()).collect();
        let mut visited: HashSet<&str> = changed.iter().map(String::as_str).collect();
        let mut queue: VecDeque<(&str, usize, &str)> = changed
            .iter()
            .map(|c| (c.as_str(), 0, c.as_str()))
            .collect();
        let mut affected = Vec::new();

        while let Some((path, depth, via)) = queue.pop_front() {
            for dependent in self.used_by(path) {
                if !visited.insert(dependent) {
                    continue;
                }
                affected.push(ImpactedToken {
                    path: dependent.to_string(),
                    depth: depth + 1,
                    via: via.to_string(),
                });
                queue.push_back((dependent, depth + 1, via));
            }
        }

        tracing::debug!(changed = changed.len(), affected = affected.len(), "impact analysis");
        ImpactReport {
            changed: changed.clone(),
            affected,
        }
    }
}

/// Color primitives no alias points at.
///
/// Empty when the documents contain no aliases at all, since nothing can
/// be said about usage then.
pub fn unused_primitives(documents: &[&TokenDocument]) -> Vec<String> {
    let deps = DependencyMap::build(documents);
    if deps.is_empty() {
        return Vec::new();
    }
    let mut unused: IndexSet<String> = IndexSet::new();
    for doc in documents {
        for (path, token) in walk(doc) {
            if token.kind != TokenKind::Color || token.is_alias() {
                continue;
            }
            let name = path.canonical();
            if !deps.is_referenced(&name) {
                unused.insert(name);
            }
        }
    }
    unused.into_iter().collect()
}
