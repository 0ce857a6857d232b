//! The color palette shared by every color emitter.
//!
//! Primitives are the concrete colors semantic tokens resolve to, keyed by
//! canonical path. Semantic entries carry a light and a dark reference.

use indexmap::IndexMap;
use tokenweave_core::{
    family_of, find, is_elided_segment, primitive_segments, walk, Color, TokenDocument, TokenKind,
    TokenPath,
};
use tokenweave_resolver::{ResolvedToken, TokenGraph};

/// A concrete color.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Canonical path.
    pub key: String,
    /// Name segments: collection root and elided segments removed.
    pub segments: Vec<String>,
    pub family: String,
    pub color: Color,
}

/// What a semantic entry points at in one mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorRef {
    /// Canonical path of a primitive.
    Primitive(String),
    /// A color with no primitive behind it.
    Literal(Color),
}

/// A semantic color with its light and dark references.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticEntry {
    pub path: TokenPath,
    /// Path segments without elided ones.
    pub segments: Vec<String>,
    pub group: String,
    pub light: ColorRef,
    pub dark: ColorRef,
    /// The dark reference was substituted from light.
    pub dark_fallback: bool,
}

impl SemanticEntry {
    /// Same reference in both modes: never wrapped in a light/dark form.
    pub fn is_static(&self) -> bool {
        self.light == self.dark
    }
}

/// Primitives and semantic entries for one generation.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    pub primitives: IndexMap<String, Primitive>,
    pub semantics: Vec<SemanticEntry>,
}

impl Palette {
    /// Build from the light document and its graph, plus the dark ones.
    ///
    /// Tokens that fail to resolve in light are dropped; the orchestrator
    /// reports them.
    pub fn build(
        light: &TokenDocument,
        light_graph: &TokenGraph,
        dark: Option<(&TokenDocument, &TokenGraph)>,
    ) -> Self {
        let mut palette = Self::default();

        for (path, token) in walk(light) {
            if token.kind != TokenKind::Color {
                continue;
            }
            let key = path.canonical();
            let dark_resolved = dark.and_then(|(doc, graph)| {
                find(doc, path.segments())?;
                graph.resolve(&key).ok()
            });

            if !token.is_alias() {
                let Some(color) = token.value.as_ref().and_then(|v| v.as_color()) else {
                    continue;
                };
                let differs = dark_resolved
                    .as_ref()
                    .map_or(false, |r| r.is_alias() || r.value.as_color() != Some(color));
                if !differs {
                    palette.add_primitive(&key, color);
                    continue;
                }
            }

            let light_ref = match light_graph.resolve(&key) {
                Ok(resolved) => match palette.reference(&resolved) {
                    Some(r) => r,
                    None => continue,
                },
                Err(_) => continue,
            };
            // Missing or unresolvable in dark: use the light reference.
            // Deliberate product behavior, not a graph invariant.
            let (dark_ref, dark_fallback) = match dark_resolved.as_ref().and_then(|r| palette.reference(r)) {
                Some(r) => (r, false),
                None => (light_ref.clone(), dark.is_some()),
            };
            if dark_fallback {
                tracing::trace!(token = %key, "dark value missing, using light");
            }

            let segments: Vec<String> = path
                .segments()
                .iter()
                .filter(|s| !is_elided_segment(s))
                .cloned()
                .collect();
            let Some(group) = segments.first().cloned() else {
                continue;
            };
            palette.semantics.push(SemanticEntry {
                path,
                segments,
                group,
                light: light_ref,
                dark: dark_ref,
                dark_fallback,
            });
        }

        tracing::debug!(
            primitives = palette.primitives.len(),
            semantics = palette.semantics.len(),
            "built palette"
        );
        palette
    }

    fn add_primitive(&mut self, key: &str, color: Color) {
        if self.primitives.contains_key(key) {
            return;
        }
        let path = TokenPath::from_canonical(key);
        let segments = primitive_segments(path.segments());
        if segments.is_empty() {
            return;
        }
        let family = family_of(&segments);
        self.primitives.insert(
            key.to_string(),
            Primitive {
                key: key.to_string(),
                segments,
                family,
                color,
            },
        );
    }

    /// Reference for a resolved token, registering its primitive.
    fn reference(&mut self, resolved: &ResolvedToken) -> Option<ColorRef> {
        let color = resolved.value.as_color()?;
        if resolved.is_alias() {
            let key = resolved.path.canonical();
            self.add_primitive(&key, color);
            if self.primitives.contains_key(&key) {
                return Some(ColorRef::Primitive(key));
            }
        }
        Some(ColorRef::Literal(color))
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty() && self.semantics.is_empty()
    }

    pub fn primitive(&self, key: &str) -> Option<&Primitive> {
        self.primitives.get(key)
    }

    /// Semantic group labels in first-seen order.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for entry in &self.semantics {
            if !groups.contains(&entry.group.as_str()) {
                groups.push(&entry.group);
            }
        }
        groups
    }
}
