//! The primitive + semantic color pipeline.
//!
//! Names, ordering, grouping and container placement are decided here;
//! an [`EmitterPolicy`] only renders.

use super::palette::{ColorRef, Palette};
use super::{Container, EmitterPolicy, SourceWriter};
use crate::conventions::{ContainerShape, DarkModeStrategy};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokenweave_core::{compare_labels, path_words, split_words, trailing_number, Color, NamingCase};

/// Which part of the palette an artifact carries.
#[derive(Debug, Clone)]
pub struct PaletteSlice {
    pub primitives: bool,
    /// Semantic groups to include; `None` for all of them.
    pub groups: Option<Vec<String>>,
    /// Module holding the primitives when they are emitted into another
    /// file (`primitives` for `primitives.ts`).
    pub primitives_module: Option<String>,
}

impl PaletteSlice {
    pub fn all() -> Self {
        Self {
            primitives: true,
            groups: None,
            primitives_module: None,
        }
    }

    pub fn primitives_only() -> Self {
        Self {
            primitives: true,
            groups: Some(Vec::new()),
            primitives_module: None,
        }
    }

    pub fn group(group: &str, primitives_module: &str) -> Self {
        Self {
            primitives: false,
            groups: Some(vec![group.to_string()]),
            primitives_module: Some(primitives_module.to_string()),
        }
    }

    fn includes(&self, group: &str) -> bool {
        self.groups
            .as_ref()
            .map_or(true, |groups| groups.iter().any(|g| g == group))
    }
}

/// A primitive with its generated identifier.
#[derive(Debug, Clone)]
pub struct NamedPrimitive {
    pub ident: String,
    pub path: String,
    pub color: Color,
}

/// One side of a semantic entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Identifier of a primitive.
    Primitive(String),
    Literal(Color),
}

/// A semantic entry with its generated identifier.
#[derive(Debug, Clone)]
pub struct NamedSemantic {
    pub ident: String,
    /// Words the identifier was built from, for derived names.
    pub words: Vec<String>,
    pub path: String,
    pub light: Operand,
    pub dark: Operand,
}

impl NamedSemantic {
    pub fn is_static(&self) -> bool {
        self.light == self.dark
    }
}

/// Everything the renderers need, already named and ordered.
#[derive(Debug, Clone)]
pub struct PalettePlan {
    /// Primitives grouped by family, families alphabetical.
    pub primitives: Vec<(String, Vec<NamedPrimitive>)>,
    /// Semantic entries grouped by their first path segment.
    pub semantics: Vec<(String, Vec<NamedSemantic>)>,
    pub strategy: DarkModeStrategy,
    /// Identifiers of primitives the semantic entries reference.
    pub referenced_primitives: Vec<String>,
    pub primitives_module: Option<String>,
    /// Qualifier for primitive references from outside their container.
    pub qualifier: Option<String>,
    pub collisions: Vec<Collision>,
}

impl PalettePlan {
    pub fn has_primitives(&self) -> bool {
        self.primitives.iter().any(|(_, items)| !items.is_empty())
    }

    pub fn has_semantics(&self) -> bool {
        self.semantics.iter().any(|(_, items)| !items.is_empty())
    }

    /// Whether any declaration will use a dynamic light/dark form.
    pub fn has_dynamic(&self) -> bool {
        self.strategy == DarkModeStrategy::Dynamic && self.semantic_entries().any(|s| !s.is_static())
    }

    pub fn semantic_entries(&self) -> impl Iterator<Item = &NamedSemantic> {
        self.semantics.iter().flat_map(|(_, items)| items.iter())
    }

    /// Render an operand with a policy.
    pub fn operand<P: EmitterPolicy + ?Sized>(&self, policy: &P, operand: &Operand, qualifier: Option<&str>) -> String {
        match operand {
            Operand::Primitive(ident) => policy.primitive_ref(qualifier, ident),
            Operand::Literal(color) => policy.color_literal(*color),
        }
    }
}

/// Order by trailing number, then by name.
fn by_number_then_name(a: &str, b: &str) -> Ordering {
    trailing_number(a)
        .cmp(&trailing_number(b))
        .then_with(|| a.cmp(b))
}

/// Two tokens whose paths produce the same identifier. Only `kept` is
/// emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub identifier: String,
    pub kept: String,
    pub dropped: String,
}

/// Sort groups by label and their members by generated name, dropping
/// members whose name repeats one already kept. Every drop is returned
/// as a [`Collision`].
pub(crate) fn ordered<T>(
    groups: Vec<(String, Vec<T>)>,
    name: impl Fn(&T) -> &str,
    path: impl Fn(&T) -> &str,
) -> (Vec<(String, Vec<T>)>, Vec<Collision>) {
    let mut groups = groups;
    groups.sort_by(|a, b| compare_labels(&a.0, &b.0));
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut collisions = Vec::new();
    for (_, items) in groups.iter_mut() {
        items.sort_by(|a, b| by_number_then_name(name(a), name(b)));
        items.retain(|item| match seen.get(name(item)) {
            Some(kept) => {
                collisions.push(Collision {
                    identifier: name(item).to_string(),
                    kept: kept.clone(),
                    dropped: path(item).to_string(),
                });
                false
            }
            None => {
                seen.insert(name(item).to_string(), path(item).to_string());
                true
            }
        });
    }
    groups.retain(|(_, items)| !items.is_empty());
    (groups, collisions)
}

pub(crate) fn push_grouped<T>(groups: &mut Vec<(String, Vec<T>)>, label: &str, item: T) {
    match groups.iter_mut().find(|(l, _)| l == label) {
        Some((_, items)) => items.push(item),
        None => groups.push((label.to_string(), vec![item])),
    }
}

/// Container name of a semantic group (`Text` → `TextColors`).
pub fn group_container_name<P: EmitterPolicy + ?Sized>(policy: &P, group: &str) -> String {
    let profile = policy.profile();
    let name = format!(
        "{}{}",
        NamingCase::Pascal.apply(&split_words(group)),
        profile.category_suffix
    );
    profile
        .vocabulary
        .lookup(&name)
        .map(str::to_string)
        .unwrap_or(name)
}

/// Name and order a palette for one policy.
pub fn plan<P: EmitterPolicy + ?Sized>(policy: &P, palette: &Palette, slice: &PaletteSlice) -> PalettePlan {
    let profile = policy.profile();
    let per_category = profile.shape == ContainerShape::PerCategory && policy.scoped();
    // Group containers cannot also be split into light and dark halves.
    let strategy = match profile.dark_mode {
        DarkModeStrategy::SeparateContainers if per_category => DarkModeStrategy::Paired,
        other => other,
    };

    let mut prim_idents: HashMap<&str, String> = HashMap::new();
    let mut families: Vec<(String, Vec<NamedPrimitive>)> = Vec::new();
    for primitive in palette.primitives.values() {
        let ident = policy.identifier(&path_words(&primitive.segments));
        if ident.is_empty() {
            continue;
        }
        prim_idents.insert(primitive.key.as_str(), ident.clone());
        push_grouped(
            &mut families,
            &primitive.family,
            NamedPrimitive {
                ident,
                path: primitive.key.clone(),
                color: primitive.color,
            },
        );
    }

    let operand = |r: &ColorRef| match r {
        ColorRef::Primitive(key) => prim_idents
            .get(key.as_str())
            .map(|ident| Operand::Primitive(ident.clone()))
            .or_else(|| palette.primitive(key).map(|p| Operand::Literal(p.color))),
        ColorRef::Literal(color) => Some(Operand::Literal(*color)),
    };

    let mut groups: Vec<(String, Vec<NamedSemantic>)> = Vec::new();
    for entry in palette.semantics.iter().filter(|e| slice.includes(&e.group)) {
        let segments = if per_category && entry.segments.len() > 1 {
            &entry.segments[1..]
        } else {
            &entry.segments[..]
        };
        let words = path_words(segments);
        let ident = policy.identifier(&words);
        let (Some(light), Some(dark)) = (operand(&entry.light), operand(&entry.dark)) else {
            continue;
        };
        if ident.is_empty() {
            continue;
        }
        push_grouped(
            &mut groups,
            &entry.group,
            NamedSemantic {
                ident,
                words,
                path: entry.path.canonical(),
                light,
                dark,
            },
        );
    }

    let mut collisions = Vec::new();
    let primitives = if slice.primitives {
        let (families, dropped) = ordered(families, |p| p.ident.as_str(), |p| p.path.as_str());
        collisions.extend(dropped);
        families
    } else {
        Vec::new()
    };
    let semantics = if per_category {
        // Members only collide within their own container.
        let mut groups = groups;
        groups.sort_by(|a, b| compare_labels(&a.0, &b.0));
        let mut semantics = Vec::new();
        for group in groups {
            let (group, dropped) = ordered(vec![group], |s| s.ident.as_str(), |s| s.path.as_str());
            semantics.extend(group);
            collisions.extend(dropped);
        }
        semantics
    } else {
        let (groups, dropped) = ordered(groups, |s| s.ident.as_str(), |s| s.path.as_str());
        collisions.extend(dropped);
        groups
    };

    let mut referenced_primitives: Vec<String> = Vec::new();
    for entry in semantics.iter().flat_map(|(_, items)| items.iter()) {
        for side in [&entry.light, &entry.dark] {
            if let Operand::Primitive(ident) = side {
                if !referenced_primitives.contains(ident) {
                    referenced_primitives.push(ident.clone());
                }
            }
        }
    }

    let qualifier = if !policy.scoped() {
        None
    } else if per_category || slice.primitives_module.is_some() {
        Some(
            profile
                .primitives_container
                .clone()
                .unwrap_or_else(|| "Primitives".to_string()),
        )
    } else if let Some(container) = &profile.primitives_container {
        Some(container.clone())
    } else if policy.main_container() {
        Some(profile.container_name.clone())
    } else {
        None
    };

    PalettePlan {
        primitives,
        semantics,
        strategy,
        referenced_primitives,
        primitives_module: slice.primitives_module.clone(),
        qualifier,
        collisions,
    }
}

/// Emit a palette through a policy.
pub fn emit_palette<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    palette: &Palette,
    slice: &PaletteSlice,
) -> PalettePlan {
    let plan = plan(policy, palette, slice);
    w.collided(&plan.collisions);
    let profile = policy.profile();
    let per_category = profile.shape == ContainerShape::PerCategory && policy.scoped();
    let separate = plan.strategy == DarkModeStrategy::SeparateContainers;
    let nested = profile.nested_sections;

    let prim_container = if !policy.scoped() {
        None
    } else if per_category || plan.primitives_module.is_some() {
        plan.qualifier.clone()
    } else {
        profile.primitives_container.clone()
    };
    let has_prims = plan.has_primitives();
    let has_semantics = plan.has_semantics();

    let prims_in_main = has_prims && !per_category && (prim_container.is_none() || nested);
    let semantics_in_main =
        has_semantics && !per_category && (!separate || policy.light_in_main() || nested);
    let use_main = policy.main_container() && (prims_in_main || semantics_in_main);
    let main_name = profile.container_name.clone();

    // Primitives are addressed bare from declarations sharing their container.
    let shared_container = prim_container.is_none() && use_main;
    let direct_qualifier = if shared_container { None } else { plan.qualifier.as_deref() };
    let nested_qualifier = plan.qualifier.as_deref();

    policy.preamble(w, &plan);

    if has_prims && prim_container.is_some() && !(use_main && nested) {
        emit_primitives(policy, w, &plan, prim_container.as_deref());
    }

    if use_main {
        w.blank();
        policy.open(w, Container::Main, &main_name);
    }
    if has_prims && (prim_container.is_none() || (use_main && nested)) {
        emit_primitives(policy, w, &plan, prim_container.as_deref());
    }

    if has_semantics && !per_category {
        match plan.strategy {
            DarkModeStrategy::Dynamic | DarkModeStrategy::Paired => {
                emit_semantics(policy, w, &plan, Container::Main, direct_qualifier);
            }
            DarkModeStrategy::SeparateContainers if policy.light_in_main() => {
                emit_side(policy, w, &plan, Container::Main, direct_qualifier, false);
            }
            DarkModeStrategy::SeparateContainers if use_main && nested => {
                emit_separate(policy, w, &plan, nested_qualifier);
            }
            DarkModeStrategy::SeparateContainers => {}
        }
    }

    if use_main {
        policy.close(w, Container::Main);
    }

    if has_semantics && separate && !per_category {
        if policy.light_in_main() {
            w.blank();
            policy.open(w, Container::Dark, &profile.dark_container);
            emit_side(policy, w, &plan, Container::Dark, nested_qualifier, true);
            policy.close(w, Container::Dark);
        } else if !(use_main && nested) {
            emit_separate(policy, w, &plan, nested_qualifier);
        }
    }

    if per_category {
        for (group, items) in &plan.semantics {
            w.blank();
            policy.open(w, Container::Group, &group_container_name(policy, group));
            for entry in items {
                emit_semantic(policy, w, &plan, Container::Group, entry, nested_qualifier);
            }
            policy.close(w, Container::Group);
        }
    }

    policy.postamble(w, &plan);
    plan
}

fn emit_primitives<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    container: Option<&str>,
) {
    match container {
        Some(name) => {
            w.blank();
            policy.open(w, Container::Primitives, name);
            emit_primitive_members(policy, w, plan, Container::Primitives);
            policy.close(w, Container::Primitives);
        }
        None => emit_primitive_members(policy, w, plan, Container::Main),
    }
}

fn emit_primitive_members<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    container: Container,
) {
    for (family, items) in &plan.primitives {
        w.blank();
        if !family.is_empty() {
            w.comment(family);
        }
        for primitive in items {
            policy.primitive(w, container, &primitive.ident, &primitive.path, primitive.color);
        }
    }
}

fn emit_semantics<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    container: Container,
    qualifier: Option<&str>,
) {
    for (group, items) in &plan.semantics {
        w.blank();
        w.comment(group);
        for entry in items {
            emit_semantic(policy, w, plan, container, entry, qualifier);
        }
    }
}

/// One semantic entry under the dynamic or paired strategy.
fn emit_semantic<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    container: Container,
    entry: &NamedSemantic,
    qualifier: Option<&str>,
) {
    let light = plan.operand(policy, &entry.light, qualifier);
    if entry.is_static() {
        policy.constant(w, container, &entry.ident, &entry.path, None, &light);
        return;
    }
    let dark = plan.operand(policy, &entry.dark, qualifier);
    match plan.strategy {
        DarkModeStrategy::Dynamic => policy.dynamic(w, &entry.ident, &entry.path, &light, &dark),
        _ => {
            for (suffix, expr) in [("Light", &light), ("Dark", &dark)] {
                let mut words = entry.words.clone();
                words.push(suffix.to_string());
                let ident = policy.identifier(&words);
                policy.constant(w, container, &ident, &entry.path, None, expr);
            }
        }
    }
}

/// Light and dark containers with the same members.
fn emit_separate<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    qualifier: Option<&str>,
) {
    let profile = policy.profile();
    for (container, name, dark) in [
        (Container::Light, &profile.light_container, false),
        (Container::Dark, &profile.dark_container, true),
    ] {
        w.blank();
        policy.open(w, container, name);
        emit_side(policy, w, plan, container, qualifier, dark);
        policy.close(w, container);
    }
}

fn emit_side<P: EmitterPolicy + ?Sized>(
    policy: &P,
    w: &mut SourceWriter,
    plan: &PalettePlan,
    container: Container,
    qualifier: Option<&str>,
    dark: bool,
) {
    for (group, items) in &plan.semantics {
        let members: Vec<&NamedSemantic> = items
            .iter()
            .filter(|entry| !dark || policy.dark_includes_static() || !entry.is_static())
            .collect();
        if members.is_empty() {
            continue;
        }
        w.blank();
        w.comment(group);
        for entry in members {
            let operand = if dark { &entry.dark } else { &entry.light };
            let expr = plan.operand(policy, operand, qualifier);
            policy.constant(w, container, &entry.ident, &entry.path, None, &expr);
        }
    }
}
