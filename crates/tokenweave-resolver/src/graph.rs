//! The token graph.
//!
//! Nodes live in an arena keyed by canonical path; aliases are a separate
//! `path -> target` edge map. Every traversal carries its own visited set.

use crate::errors::ResolveError;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use tokenweave_core::{walk, TokenDocument, TokenKind, TokenPath, TokenValue};

/// One concrete token path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenGraphNode {
    pub path: TokenPath,
    pub kind: TokenKind,
    pub raw_value: Option<TokenValue>,
    pub alias_target: Option<TokenPath>,
    /// Materialised from a value carried by an alias to an absent target.
    pub synthesized: bool,
    /// Name of the document the node came from.
    pub document: String,
}

/// A token followed to its terminal concrete value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedToken {
    /// The terminal node's path.
    pub path: TokenPath,
    pub kind: TokenKind,
    pub value: TokenValue,
    /// Canonical names visited, from the requested token to the terminal.
    pub chain: Vec<String>,
}

impl ResolvedToken {
    /// Whether the requested token was an alias.
    pub fn is_alias(&self) -> bool {
        self.chain.len() > 1
    }

    pub fn requested(&self) -> &str {
        self.chain.first().map(String::as_str).unwrap_or("")
    }
}

/// Outcome of resolving every node of a graph.
#[derive(Debug, Default)]
pub struct Resolution {
    pub resolved: IndexMap<String, ResolvedToken>,
    pub failures: Vec<ResolveError>,
}

/// Alias graph over one or more merged documents.
#[derive(Debug, Clone, Default)]
pub struct TokenGraph {
    nodes: IndexMap<String, TokenGraphNode>,
    edges: IndexMap<String, String>,
}

impl TokenGraph {
    /// Build a graph from documents in order; a later document's node for
    /// a path overwrites an earlier one.
    pub fn build(documents: &[&TokenDocument]) -> Self {
        let mut graph = Self::default();
        for doc in documents {
            graph.insert_document(doc);
        }
        graph.synthesize_missing_targets();
        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built token graph"
        );
        graph
    }

    fn insert_document(&mut self, doc: &TokenDocument) {
        for (path, token) in walk(doc) {
            let key = path.canonical();
            match &token.alias_target {
                Some(target) => {
                    self.edges.insert(key.clone(), target.canonical());
                }
                None => {
                    self.edges.shift_remove(&key);
                }
            }
            self.nodes.insert(
                key,
                TokenGraphNode {
                    path,
                    kind: token.kind,
                    raw_value: token.value.clone(),
                    alias_target: token.alias_target.clone(),
                    synthesized: false,
                    document: doc.name.clone(),
                },
            );
        }
    }

    /// Give absent alias targets a node built from the value the aliasing
    /// token carries. Aliases without a carried value stay dangling.
    fn synthesize_missing_targets(&mut self) {
        let mut synthesized = Vec::new();
        for (key, target) in &self.edges {
            if self.nodes.contains_key(target) || synthesized.iter().any(|n: &TokenGraphNode| n.path.canonical() == *target) {
                continue;
            }
            let Some(node) = self.nodes.get(key) else { continue };
            let Some(value) = node.raw_value.clone() else { continue };
            tracing::trace!(target = %target, from = %key, "synthesized primitive node");
            synthesized.push(TokenGraphNode {
                path: TokenPath::from_canonical(target),
                kind: value.kind(),
                raw_value: Some(value),
                alias_target: None,
                synthesized: true,
                document: node.document.clone(),
            });
        }
        for node in synthesized {
            self.nodes.insert(node.path.canonical(), node);
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = &TokenGraphNode> {
        self.nodes.values()
    }

    /// Alias edges as `(from, to)` canonical names.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn node(&self, path: &str) -> Option<&TokenGraphNode> {
        self.nodes.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every distinct cycle, each reported as the stack slice from the
    /// first occurrence of the repeated node through its repetition
    /// (`[A, B, A]`).
    pub fn detect_cycles(&self) -> Vec<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut cycles = Vec::new();

        for start in self.nodes.keys() {
            if visited.contains(start.as_str()) {
                continue;
            }
            let mut stack: Vec<&str> = Vec::new();
            let mut on_stack: HashSet<&str> = HashSet::new();
            let mut current = Some(start.as_str());

            while let Some(path) = current {
                if on_stack.contains(path) {
                    if let Some(first) = stack.iter().position(|p| *p == path) {
                        let mut cycle: Vec<String> =
                            stack[first..].iter().map(|p| p.to_string()).collect();
                        cycle.push(path.to_string());
                        tracing::warn!(cycle = %cycle.join(" -> "), "alias cycle");
                        cycles.push(cycle);
                    }
                    break;
                }
                if visited.contains(path) || !self.nodes.contains_key(path) {
                    break;
                }
                stack.push(path);
                on_stack.insert(path);
                current = self.edges.get(path).map(String::as_str);
            }
            visited.extend(stack);
        }
        cycles
    }

    /// Follow alias edges from `path` to a node without an alias.
    ///
    /// Fails on a repeated path or a missing target; never returns a
    /// partial value.
    pub fn resolve(&self, path: &str) -> Result<ResolvedToken, ResolveError> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut chain: Vec<String> = Vec::new();
        let mut current = path;

        loop {
            if !seen.insert(current) {
                let first = chain.iter().position(|p| p == current).unwrap_or(0);
                let mut cycle = chain[first..].to_vec();
                cycle.push(current.to_string());
                return Err(ResolveError::CircularAlias { cycle });
            }
            let node = match self.nodes.get(current) {
                Some(node) => node,
                None if chain.is_empty() => {
                    return Err(ResolveError::UnknownToken {
                        path: current.to_string(),
                    })
                }
                None => {
                    return Err(ResolveError::MissingTarget {
                        path: chain.last().cloned().unwrap_or_default(),
                        target: current.to_string(),
                    })
                }
            };
            chain.push(current.to_string());

            match self.edges.get(current) {
                Some(target) => current = target.as_str(),
                None => {
                    let value = node.raw_value.clone().ok_or_else(|| ResolveError::NoValue {
                        path: current.to_string(),
                    })?;
                    return Ok(ResolvedToken {
                        path: node.path.clone(),
                        kind: node.kind,
                        value,
                        chain,
                    });
                }
            }
        }
    }

    /// Resolve every node, collecting failures instead of stopping.
    pub fn resolve_all(&self) -> Resolution {
        let mut resolution = Resolution::default();
        for key in self.nodes.keys() {
            match self.resolve(key) {
                Ok(resolved) => {
                    resolution.resolved.insert(key.clone(), resolved);
                }
                Err(err) => {
                    tracing::debug!(path = %key, error = %err, "token did not resolve");
                    resolution.failures.push(err);
                }
            }
        }
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenweave_core::{Color, Token};

    fn color(hex: &str) -> TokenValue {
        TokenValue::Color(Color::from_hex(hex).unwrap())
    }

    fn doc(name: &str, tokens: &[(&str, Token)]) -> TokenDocument {
        let mut doc = TokenDocument::empty(name);
        for (path, token) in tokens {
            doc.insert(&TokenPath::from_canonical(path), token.clone());
        }
        doc
    }

    fn alias(target: &str) -> Token {
        Token::alias(TokenKind::Color, TokenPath::from_canonical(target), None)
    }

    #[test]
    fn test_resolve_chain() {
        let d = doc(
            "light",
            &[
                ("Colour/Grey/750", Token::concrete(color("#1d1d1d"))),
                ("Text/base", alias("Colour/Grey/750")),
                ("Text/primary", alias("Text/base")),
            ],
        );
        let graph = TokenGraph::build(&[&d]);
        let resolved = graph.resolve("Text/primary").unwrap();
        assert_eq!(resolved.path.canonical(), "Colour/Grey/750");
        assert_eq!(resolved.chain, vec!["Text/primary", "Text/base", "Colour/Grey/750"]);
        assert_eq!(resolved.value, color("#1d1d1d"));
    }

    #[test]
    fn test_cycle_detected_and_resolution_fails() {
        let d = doc("light", &[("A", alias("B")), ("B", alias("A"))]);
        let graph = TokenGraph::build(&[&d]);
        let cycles = graph.detect_cycles();
        assert_eq!(cycles, vec![vec!["A".to_string(), "B".to_string(), "A".to_string()]]);
        assert!(matches!(graph.resolve("A"), Err(ResolveError::CircularAlias { .. })));
    }

    #[test]
    fn test_every_distinct_cycle_reported() {
        let d = doc(
            "light",
            &[
                ("A", alias("B")),
                ("B", alias("A")),
                ("C", alias("D")),
                ("D", alias("E")),
                ("E", alias("C")),
                ("F", alias("C")),
            ],
        );
        let cycles = TokenGraph::build(&[&d]).detect_cycles();
        assert_eq!(cycles.len(), 2);
        assert!(cycles[1].contains(&"E".to_string()));
    }

    #[test]
    fn test_missing_target_fails_closed() {
        let d = doc("light", &[("Text/primary", alias("Colour/Nope"))]);
        let graph = TokenGraph::build(&[&d]);
        assert_eq!(
            graph.resolve("Text/primary"),
            Err(ResolveError::MissingTarget {
                path: "Text/primary".into(),
                target: "Colour/Nope".into(),
            })
        );
        assert!(matches!(graph.resolve("Nope"), Err(ResolveError::UnknownToken { .. })));
    }

    #[test]
    fn test_synthesized_target_from_carried_value() {
        let token = Token::alias(
            TokenKind::Color,
            TokenPath::from_canonical("Colour/Grey/50"),
            Some(color("#f5f5f5")),
        );
        let d = doc("dark", &[("Text/primary", token)]);
        let graph = TokenGraph::build(&[&d]);
        let node = graph.node("Colour/Grey/50").unwrap();
        assert!(node.synthesized);
        assert_eq!(graph.resolve("Text/primary").unwrap().value, color("#f5f5f5"));
    }

    #[test]
    fn test_later_document_overwrites() {
        let light = doc(
            "light",
            &[
                ("Colour/Grey/750", Token::concrete(color("#1d1d1d"))),
                ("Colour/Grey/50", Token::concrete(color("#f5f5f5"))),
                ("Text/primary", alias("Colour/Grey/750")),
            ],
        );
        let dark = doc("dark", &[("Text/primary", alias("Colour/Grey/50"))]);
        let graph = TokenGraph::build(&[&light, &dark]);
        let resolved = graph.resolve("Text/primary").unwrap();
        assert_eq!(resolved.path.canonical(), "Colour/Grey/50");
        assert_eq!(graph.node("Text/primary").unwrap().document, "dark");
    }

    #[test]
    fn test_resolve_all_collects_failures() {
        let d = doc(
            "light",
            &[
                ("Colour/White", Token::concrete(color("#ffffff"))),
                ("Surface", alias("Colour/White")),
                ("Broken", alias("Missing")),
            ],
        );
        let resolution = TokenGraph::build(&[&d]).resolve_all();
        assert_eq!(resolution.resolved.len(), 2);
        assert_eq!(resolution.failures.len(), 1);
    }
}
