//! The generation orchestrator.
//!
//! One call builds the alias graphs, collects warnings, decides the
//! artifact set, renders every artifact through its policy, then diffs
//! against the references and traces the impact of what changed.

use crate::conventions::{detector_for, lint_reference, ConventionProfile};
use crate::error::Result;
use crate::generators::colors::group_container_name;
use crate::generators::composite::{by_category, collect_composites, emit_composite, CompositeToken};
use crate::generators::spacing::{collect_spacing, emit_spacing, NumberToken};
use crate::generators::typography::{collect_typography, emit_typography, partition, TypographyToken};
use crate::generators::{
    emit_palette, policy_for, Collision, EmitterPolicy, FileHeader, Palette, PaletteSlice, SourceWriter, TemplateEngine,
};
use crate::model::{
    GeneratedArtifact, GenerationInput, GenerationMode, GenerationResult, GenerationSummary, ReferenceFile, Warning,
    WarningKind,
};
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tokenweave_core::{
    normalize_identifier, split_words, ArtifactCategory, NamingCase, Platform, SourceFormat, TokenDocument,
    TokenKind,
};
use tokenweave_diff::{diff, extract_declarations, DiffRecord};
use tokenweave_resolver::{unused_primitives, DependencyMap, ImpactReport, ResolveError, TokenGraph};

/// What one artifact carries.
#[derive(Debug, Clone)]
enum Payload {
    Colors(PaletteSlice),
    Spacing,
    Typography,
    Composite(ArtifactCategory),
}

/// One artifact to render.
#[derive(Debug, Clone)]
struct Slot {
    platform: Platform,
    format: SourceFormat,
    category: ArtifactCategory,
    filename: String,
    profile: ConventionProfile,
    payload: Payload,
    /// The reference the output is annotated and diffed against.
    reference: Option<ReferenceFile>,
    /// Reference filenames listed in the header.
    consulted: Vec<String>,
    warnings: Vec<Warning>,
}

/// Tokens collected once and shared by every artifact.
struct Prepared {
    palette: Palette,
    spacing: Vec<NumberToken>,
    typography: Vec<TypographyToken>,
    composites: Vec<(ArtifactCategory, Vec<CompositeToken>)>,
}

impl Prepared {
    fn composites(&self, category: ArtifactCategory) -> &[CompositeToken] {
        self.composites
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(&[], |(_, tokens)| tokens.as_slice())
    }

    /// Categories with content for a platform, in artifact order.
    fn categories(&self, platform: Platform) -> Vec<ArtifactCategory> {
        let mut categories = Vec::new();
        if !self.palette.is_empty() {
            categories.push(ArtifactCategory::Colors);
        }
        if !self.spacing.is_empty() {
            categories.push(ArtifactCategory::Spacing);
        }
        if !partition(&self.typography, platform).is_empty() {
            categories.push(ArtifactCategory::Typography);
        }
        categories.extend(self.composites.iter().map(|(category, _)| *category));
        categories
    }
}

/// Run one generation.
///
/// Only a malformed input document is an error, and that surfaces while
/// parsing [`GenerationInput`]. Everything else found along the way is
/// reported as a [`Warning`].
pub fn generate(input: &GenerationInput) -> Result<GenerationResult> {
    let options = &input.options;
    let documents = input.documents();

    // Later documents win: light over typography over values.
    let base_docs: Vec<&TokenDocument> = input
        .values
        .iter()
        .chain(input.typography.iter())
        .chain(std::iter::once(&input.light))
        .collect();
    let graph = TokenGraph::build(&base_docs);
    let dark_graph = input.dark.as_ref().map(|dark| {
        let mut docs = base_docs.clone();
        docs.push(dark);
        TokenGraph::build(&docs)
    });

    let mut warnings = Vec::new();
    let graphs: Vec<&TokenGraph> = std::iter::once(&graph).chain(dark_graph.as_ref()).collect();
    warnings.extend(graph_warnings(&graphs));
    warnings.extend(structural_warnings(input));
    let unused = unused_primitives(&documents);
    if !unused.is_empty() {
        warnings.push(
            Warning::new(
                WarningKind::Unused,
                format!("{} color primitive(s) are never referenced", unused.len()),
            )
            .with_details(unused),
        );
    }

    let prepared = prepare(input, &graph, dark_graph.as_ref());
    let slots = plan_slots(input, &prepared, &mut warnings);

    let engine = TemplateEngine::new();
    let timestamp = options.timestamp_label();
    let render = |slot: &Slot| render_slot(slot, &prepared, &engine, options.mode, &timestamp);
    let rendered: Vec<(GeneratedArtifact, Vec<Warning>)> = if options.parallel {
        slots.par_iter().map(&render).collect::<Result<_>>()?
    } else {
        slots.iter().map(&render).collect::<Result<_>>()?
    };
    let mut artifacts = Vec::with_capacity(rendered.len());
    for (artifact, collisions) in rendered {
        warnings.extend(collisions);
        artifacts.push(artifact);
    }

    let diffs: Vec<DiffRecord> = artifacts
        .iter()
        .filter_map(|artifact| {
            let reference = artifact.reference_content.as_deref()?;
            Some(diff(&artifact.filename, reference, &artifact.content, artifact.format))
        })
        .collect();
    let impact = impact_of(&diffs, &artifacts, &documents);
    let summary = summarize(options.mode, &documents, &artifacts, warnings.len());

    tracing::debug!(
        artifacts = artifacts.len(),
        diffs = diffs.len(),
        warnings = warnings.len(),
        "generation finished"
    );
    Ok(GenerationResult {
        artifacts,
        diffs,
        impact,
        summary,
        warnings,
    })
}

/// Cycles and resolution failures across graphs, each reported once.
fn graph_warnings(graphs: &[&TokenGraph]) -> Vec<Warning> {
    let mut warnings = Vec::new();
    let mut seen_cycles: BTreeSet<Vec<String>> = BTreeSet::new();
    let mut seen_failures: HashSet<String> = HashSet::new();
    for graph in graphs {
        for cycle in graph.detect_cycles() {
            let mut members = cycle.clone();
            members.sort();
            members.dedup();
            if !seen_cycles.insert(members) {
                continue;
            }
            let chain = cycle.join(" -> ");
            tracing::warn!(cycle = %chain, "alias cycle");
            warnings.push(Warning::new(WarningKind::Cycle, format!("Circular alias: {}", chain)).with_details(cycle));
        }
        for failure in graph.resolve_all().failures {
            if matches!(failure, ResolveError::CircularAlias { .. }) {
                continue;
            }
            let message = failure.to_string();
            if !seen_failures.insert(message.clone()) {
                continue;
            }
            tracing::warn!(token = failure.path(), "{}", message);
            warnings.push(
                Warning::new(WarningKind::Resolution, message).with_details(vec![failure.path().to_string()]),
            );
        }
    }
    warnings
}

/// Documents that hold none of the tokens their role implies.
fn structural_warnings(input: &GenerationInput) -> Vec<Warning> {
    [
        (Some(&input.light), TokenKind::Color),
        (input.dark.as_ref(), TokenKind::Color),
        (input.typography.as_ref(), TokenKind::Typography),
    ]
    .into_iter()
    .filter_map(|(doc, kind)| {
        let doc = doc?;
        if doc.has_kind(kind) {
            return None;
        }
        Some(Warning::new(
            WarningKind::Lint,
            format!("Document '{}' contains no {} tokens", doc.name, kind.as_str()),
        ))
    })
    .collect()
}

fn prepare(input: &GenerationInput, graph: &TokenGraph, dark_graph: Option<&TokenGraph>) -> Prepared {
    let palette = Palette::build(&input.light, graph, input.dark.as_ref().zip(dark_graph));
    let spacing = input
        .values
        .as_ref()
        .map(|values| collect_spacing(values, graph))
        .unwrap_or_default();

    let typography_docs: Vec<&TokenDocument> = input
        .typography
        .iter()
        .chain(input.values.iter())
        .chain(std::iter::once(&input.light))
        .collect();
    let typography = collect_typography(&typography_docs, graph);

    let composite_docs: Vec<&TokenDocument> = input.values.iter().chain(std::iter::once(&input.light)).collect();
    let composites = by_category(&collect_composites(
        &composite_docs,
        graph,
        input.options.seconds_threshold(),
    ));

    Prepared {
        palette,
        spacing,
        typography,
        composites,
    }
}

/// Formats a platform gets for a category before references add theirs.
fn default_formats(platform: Platform, category: ArtifactCategory) -> &'static [SourceFormat] {
    match (platform, category) {
        (Platform::Web, ArtifactCategory::Colors) => &[SourceFormat::Css, SourceFormat::Scss, SourceFormat::TypeScript],
        (Platform::Web, ArtifactCategory::Spacing | ArtifactCategory::Typography) => {
            &[SourceFormat::Css, SourceFormat::TypeScript]
        }
        (Platform::Web, _) => &[SourceFormat::Css],
        (Platform::Ios, _) => &[SourceFormat::Swift],
        (Platform::Android, _) => &[SourceFormat::Kotlin],
    }
}

fn web_stem(category: ArtifactCategory) -> &'static str {
    match category {
        ArtifactCategory::Colors => "tokens",
        other => other.as_str(),
    }
}

fn web_filename(format: SourceFormat, stem: &str) -> String {
    match format {
        SourceFormat::Scss => format!("_{}.scss", stem),
        other => format!("{}.{}", stem, other.extension()),
    }
}

/// Best-practices file name: `tokens.css`, `_spacing.scss`, `AppColors.swift`.
fn default_filename(format: SourceFormat, category: ArtifactCategory, profile: &ConventionProfile) -> String {
    match format {
        SourceFormat::Swift | SourceFormat::Kotlin => format!("{}.{}", profile.container_name, format.extension()),
        web => web_filename(web, web_stem(category)),
    }
}

/// `src/_primitives.scss` → `primitives`.
fn module_name(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    let stem = base.rsplit_once('.').map_or(base, |(stem, _)| stem);
    stem.trim_start_matches('_').to_string()
}

/// References in match-existing mode grouped by format and category, plus
/// the lint findings of each file.
fn collect_references<'a>(
    input: &'a GenerationInput,
    warnings: &mut Vec<Warning>,
) -> (
    IndexMap<(SourceFormat, ArtifactCategory), Vec<&'a ReferenceFile>>,
    HashMap<String, Vec<Warning>>,
) {
    let mut grouped: IndexMap<(SourceFormat, ArtifactCategory), Vec<&ReferenceFile>> = IndexMap::new();
    let mut lints: HashMap<String, Vec<Warning>> = HashMap::new();
    if input.options.mode.uses_best_practices() {
        if !input.references.is_empty() {
            tracing::debug!(count = input.references.len(), "best-practices mode, references ignored");
        }
        return (grouped, lints);
    }

    for reference in &input.references {
        let format = match reference.format() {
            Ok(format) => format,
            Err(err) => {
                tracing::warn!(file = %reference.filename, "{}", err);
                warnings.push(Warning::new(WarningKind::Lint, err.to_string()));
                continue;
            }
        };
        if !input.options.targets(format.platform()) {
            tracing::debug!(file = %reference.filename, "platform not targeted, reference skipped");
            continue;
        }
        let findings = lint_reference(&reference.filename, &reference.content, format);
        warnings.extend(findings.iter().cloned());
        lints.insert(reference.filename.clone(), findings);
        grouped
            .entry((format, reference.category()))
            .or_default()
            .push(reference);
    }
    (grouped, lints)
}

/// Decide every artifact of the run.
fn plan_slots(input: &GenerationInput, prepared: &Prepared, warnings: &mut Vec<Warning>) -> Vec<Slot> {
    let options = &input.options;
    let (references, lints) = collect_references(input, warnings);

    let mut slots = Vec::new();
    for platform in Platform::ALL {
        if !options.targets(platform) {
            continue;
        }
        for category in prepared.categories(platform) {
            let mut formats = default_formats(platform, category).to_vec();
            for (format, ref_category) in references.keys() {
                if *ref_category == category && format.platform() == platform && !formats.contains(format) {
                    formats.push(*format);
                }
            }
            for format in formats {
                let refs = references
                    .get(&(format, category))
                    .map_or(&[][..], Vec::as_slice);
                let mut profile = match refs {
                    [] => detector_for(format, category).detect(None, true),
                    _ => {
                        let text: Vec<&str> = refs.iter().map(|r| r.content.as_str()).collect();
                        detector_for(format, category).detect(Some(&text.join("\n")), false)
                    }
                };
                if format == SourceFormat::Kotlin && profile.package.is_none() {
                    profile.package = Some(options.kotlin_package().to_string());
                }
                let base = Slot {
                    platform,
                    format,
                    category,
                    filename: default_filename(format, category, &profile),
                    profile,
                    payload: match category {
                        ArtifactCategory::Colors => Payload::Colors(PaletteSlice::all()),
                        ArtifactCategory::Spacing => Payload::Spacing,
                        ArtifactCategory::Typography => Payload::Typography,
                        composite => Payload::Composite(composite),
                    },
                    reference: None,
                    consulted: refs.iter().map(|r| r.filename.clone()).collect(),
                    warnings: Vec::new(),
                };
                match refs {
                    [] => slots.push(base),
                    [_, _, ..] if category == ArtifactCategory::Colors => {
                        slots.extend(split_colors(base, refs, &prepared.palette, &lints));
                    }
                    [first, rest @ ..] => {
                        if !rest.is_empty() {
                            tracing::debug!(
                                file = %first.filename,
                                extra = rest.len(),
                                "several references for one artifact, later ones only inform conventions"
                            );
                        }
                        slots.push(Slot {
                            filename: first.filename.clone(),
                            reference: Some((*first).clone()),
                            warnings: refs
                                .iter()
                                .flat_map(|r| lints.get(&r.filename).cloned().unwrap_or_default())
                                .collect(),
                            ..base
                        });
                    }
                }
            }
        }
    }
    slots
}

/// Semantic groups a reference file already declares: by container for
/// scoped formats, by name prefix for flat ones.
fn claimed_groups<P: EmitterPolicy + ?Sized>(policy: &P, reference: &ReferenceFile, groups: &[&str]) -> Vec<String> {
    let declarations = extract_declarations(&reference.content, policy.format());
    groups
        .iter()
        .filter(|group| {
            let container = group_container_name(policy, group);
            let prefix = normalize_identifier(group);
            declarations.iter().any(|d| {
                let mut parts: Vec<&str> = d.name.split('.').collect();
                let leaf = parts.pop().unwrap_or_default();
                if parts.is_empty() {
                    normalize_identifier(leaf).starts_with(&prefix)
                } else {
                    parts.contains(&container.as_str())
                }
            })
        })
        .map(|group| group.to_string())
        .collect()
}

/// One color artifact per reference file, each carrying the groups it
/// declares. The first file claiming no group holds the primitives;
/// groups no file claims get a file of their own.
fn split_colors(
    base: Slot,
    refs: &[&ReferenceFile],
    palette: &Palette,
    lints: &HashMap<String, Vec<Warning>>,
) -> Vec<Slot> {
    let policy = policy_for(base.profile.clone());
    let groups = palette.groups();
    let claims: Vec<Vec<String>> = refs
        .iter()
        .map(|reference| claimed_groups(policy.as_ref(), reference, &groups))
        .collect();
    let primitives_at = claims.iter().position(Vec::is_empty).unwrap_or(0);
    let primitives_module = module_name(&refs[primitives_at].filename);

    let mut taken: HashSet<String> = HashSet::new();
    let mut slots = Vec::new();
    for (index, (reference, claim)) in refs.iter().zip(claims).enumerate() {
        let claim: Vec<String> = claim.into_iter().filter(|g| taken.insert(g.clone())).collect();
        let slice = if index == primitives_at {
            PaletteSlice {
                primitives: true,
                groups: Some(claim),
                primitives_module: None,
            }
        } else {
            PaletteSlice {
                primitives: false,
                groups: Some(claim),
                primitives_module: Some(primitives_module.clone()),
            }
        };
        slots.push(Slot {
            filename: reference.filename.clone(),
            payload: Payload::Colors(slice),
            reference: Some((*reference).clone()),
            warnings: lints.get(&reference.filename).cloned().unwrap_or_default(),
            ..base.clone()
        });
    }

    for group in groups.iter().filter(|g| !taken.contains(**g)) {
        let filename = match base.format {
            SourceFormat::Swift | SourceFormat::Kotlin => {
                format!("{}.{}", group_container_name(policy.as_ref(), group), base.format.extension())
            }
            web => web_filename(web, &NamingCase::Kebab.apply(&split_words(group))),
        };
        tracing::debug!(group = *group, file = %filename, "group without a reference file");
        slots.push(Slot {
            filename,
            payload: Payload::Colors(PaletteSlice::group(group, &primitives_module)),
            ..base.clone()
        });
    }
    slots
}

/// Render one artifact. Tokens dropped for a taken identifier come back
/// as warnings alongside it.
fn render_slot(
    slot: &Slot,
    prepared: &Prepared,
    engine: &TemplateEngine,
    mode: GenerationMode,
    timestamp: &str,
) -> Result<(GeneratedArtifact, Vec<Warning>)> {
    let header = engine.render_header(&FileHeader::new(slot.format, mode, timestamp, &slot.consulted))?;
    let policy = policy_for(slot.profile.clone());
    let reference = slot.reference.as_ref().map(|r| r.content.as_str());
    let mut w = SourceWriter::new(slot.format, &slot.profile.indent, reference);

    match &slot.payload {
        Payload::Colors(slice) => {
            emit_palette(policy.as_ref(), &mut w, &prepared.palette, slice);
        }
        Payload::Spacing => emit_spacing(policy.as_ref(), &mut w, &prepared.spacing),
        Payload::Typography => {
            let tokens = partition(&prepared.typography, slot.platform);
            emit_typography(policy.as_ref(), &mut w, &tokens);
        }
        Payload::Composite(category) => emit_composite(policy.as_ref(), &mut w, prepared.composites(*category)),
    }

    let collisions: Vec<Warning> = w
        .collisions()
        .iter()
        .map(|c| collision_warning(&slot.filename, c))
        .collect();
    let (content, symbols) = w.finish(&header);
    tracing::debug!(
        file = %slot.filename,
        platform = %slot.platform,
        category = %slot.category,
        symbols = symbols.len(),
        collisions = collisions.len(),
        "emitted artifact"
    );
    let mut warnings = slot.warnings.clone();
    warnings.extend(collisions.iter().cloned());
    let artifact = GeneratedArtifact {
        filename: slot.filename.clone(),
        content,
        format: slot.format,
        platform: slot.platform,
        category: slot.category,
        reference_filename: slot.reference.as_ref().map(|r| r.filename.clone()),
        reference_content: slot.reference.as_ref().map(|r| r.content.clone()),
        symbols,
        warnings,
    };
    Ok((artifact, collisions))
}

fn collision_warning(filename: &str, collision: &Collision) -> Warning {
    Warning::new(
        WarningKind::Lint,
        format!(
            "Tokens '{}' and '{}' both map to '{}' in {}; only the first is emitted",
            collision.kept, collision.dropped, collision.identifier, filename
        ),
    )
    .with_details(vec![collision.kept.clone(), collision.dropped.clone()])
}

/// Map changed declarations back to token paths and trace their dependents.
fn impact_of(diffs: &[DiffRecord], artifacts: &[GeneratedArtifact], documents: &[&TokenDocument]) -> ImpactReport {
    let mut changed: IndexSet<String> = IndexSet::new();
    for record in diffs {
        let Some(artifact) = artifacts.iter().find(|a| a.filename == record.filename) else {
            continue;
        };
        let renamed = record.renamed_tokens.iter().map(|r| r.new_name.as_str());
        for name in record.changed_names().chain(renamed) {
            if let Some(path) = artifact.symbols.get(name).filter(|path| !path.is_empty()) {
                changed.insert(path.clone());
            }
        }
    }
    if changed.is_empty() {
        return ImpactReport::default();
    }
    let changed: Vec<String> = changed.into_iter().collect();
    DependencyMap::build(documents).impact(&changed)
}

fn summarize(
    mode: GenerationMode,
    documents: &[&TokenDocument],
    artifacts: &[GeneratedArtifact],
    warnings: usize,
) -> GenerationSummary {
    let mut tokens: BTreeMap<String, usize> = BTreeMap::new();
    for doc in documents {
        for (kind, count) in doc.count_by_kind() {
            *tokens.entry(kind.as_str().to_string()).or_default() += count;
        }
    }
    let mut per_platform: BTreeMap<String, usize> = BTreeMap::new();
    for artifact in artifacts {
        *per_platform.entry(artifact.platform.as_str().to_string()).or_default() += 1;
    }
    GenerationSummary {
        mode,
        tokens,
        artifacts: per_platform,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GenerationOptions;
    use chrono::{DateTime, Utc};

    fn pinned() -> GenerationOptions {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        GenerationOptions::default().with_timestamp(at)
    }

    const LIGHT: &str = r##"{
        "Colour": {
            "Grey": {
                "750": { "$type": "color", "$value": "#1d1d1d" },
                "50": { "$type": "color", "$value": "#f5f5f5" }
            }
        },
        "Text": {
            "primary": { "$type": "color", "$value": "{Colour.Grey.750}" }
        }
    }"##;

    const DARK: &str = r##"{
        "Text": {
            "primary": { "$type": "color", "$value": "{Colour.Grey.50}" }
        }
    }"##;

    #[test]
    fn test_module_name() {
        assert_eq!(module_name("src/theme/_primitives.scss"), "primitives");
        assert_eq!(module_name("Primitives.swift"), "Primitives");
    }

    #[test]
    fn test_default_filenames() {
        let profile = detector_for(SourceFormat::Swift, ArtifactCategory::Shadow).detect(None, true);
        assert_eq!(default_filename(SourceFormat::Swift, ArtifactCategory::Shadow, &profile), "AppShadows.swift");
        let profile = detector_for(SourceFormat::Scss, ArtifactCategory::Colors).detect(None, true);
        assert_eq!(default_filename(SourceFormat::Scss, ArtifactCategory::Colors, &profile), "_tokens.scss");
        assert_eq!(default_filename(SourceFormat::Css, ArtifactCategory::Motion, &profile), "motion.css");
    }

    #[test]
    fn test_best_practices_artifact_set() {
        let input = GenerationInput::from_json(LIGHT, Some(DARK), None, None)
            .unwrap()
            .with_options(pinned());
        let result = generate(&input).unwrap();
        let names: Vec<&str> = result.artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["tokens.css", "_tokens.scss", "tokens.ts", "AppColors.swift", "AppColors.kt"]);
        assert_eq!(result.summary.artifacts.get("web"), Some(&3));
        assert_eq!(result.summary.tokens.get("color"), Some(&4));
        assert!(result.diffs.is_empty());
    }

    #[test]
    fn test_cycle_reported_once() {
        let light = r#"{
            "A": { "$type": "color", "$value": "{B}" },
            "B": { "$type": "color", "$value": "{A}" }
        }"#;
        let input = GenerationInput::from_json(light, Some(light), None, None)
            .unwrap()
            .with_options(pinned());
        let result = generate(&input).unwrap();
        let cycles: Vec<&Warning> = result.warnings.iter().filter(|w| w.kind == WarningKind::Cycle).collect();
        assert_eq!(cycles.len(), 1);
        assert!(cycles[0].details.contains(&"A".to_string()));
        assert!(cycles[0].details.contains(&"B".to_string()));
    }

    #[test]
    fn test_structural_sniff() {
        let input = GenerationInput::from_json(r#"{ "Spacing": { "4": { "$type": "number", "$value": 4 } } }"#, None, None, None)
            .unwrap()
            .with_options(pinned());
        let result = generate(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.kind == WarningKind::Lint && w.message.contains("'light' contains no color tokens")));
        assert!(result.artifacts.iter().all(|a| a.category != ArtifactCategory::Colors));
    }

    #[test]
    fn test_identifier_collision_warns() {
        let light = r##"{
            "Colour": {
                "Grey": {
                    "200": { "$type": "color", "$value": "#eeeeee" },
                    "300": { "$type": "color", "$value": "#e0e0e0" }
                }
            },
            "Border": {
                "subtle": { "$type": "color", "$value": "{Colour.Grey.200}" },
                "standard": {
                    "subtle": { "$type": "color", "$value": "{Colour.Grey.300}" }
                }
            }
        }"##;
        let options = pinned().with_platforms(&[Platform::Web]);
        let input = GenerationInput::from_json(light, None, None, None)
            .unwrap()
            .with_options(options);
        let result = generate(&input).unwrap();
        let collisions: Vec<&Warning> = result
            .warnings
            .iter()
            .filter(|w| w.kind == WarningKind::Lint && w.message.contains("both map to"))
            .collect();
        assert!(!collisions.is_empty());
        let css = collisions.iter().find(|w| w.message.contains("tokens.css")).unwrap();
        assert!(css.message.contains("'Border/subtle'"));
        assert!(css.message.contains("'Border/standard/subtle'"));
        assert!(css.message.contains("'border-subtle'"));
        assert_eq!(css.details, vec!["Border/subtle".to_string(), "Border/standard/subtle".to_string()]);

        let artifact = result.artifact("tokens.css").unwrap();
        assert!(artifact.warnings.iter().any(|w| w.message.contains("both map to")));
        assert!(artifact.content.contains("  --border-subtle: var(--grey-200);\n"));
        assert_eq!(result.summary.warnings, result.warnings.len());
    }

    #[test]
    fn test_split_color_references() {
        let primitives = "enum Primitives {\n    static let grey750 = Color(red: 0.114, green: 0.114, blue: 0.114)\n}\n";
        let text = "enum TextColors {\n    static let primary = Color(light: Primitives.grey750, dark: Primitives.grey50)\n}\n";
        let options = pinned()
            .with_mode(GenerationMode::MatchExisting)
            .with_platforms(&[Platform::Ios]);
        let input = GenerationInput::from_json(LIGHT, Some(DARK), None, None)
            .unwrap()
            .with_reference(ReferenceFile::new(Platform::Ios, "Primitives.swift", primitives))
            .with_reference(ReferenceFile::new(Platform::Ios, "TextColors.swift", text))
            .with_options(options);
        let result = generate(&input).unwrap();
        let names: Vec<&str> = result.artifacts.iter().map(|a| a.filename.as_str()).collect();
        assert_eq!(names, vec!["Primitives.swift", "TextColors.swift"]);
        let text_file = result.artifact("TextColors.swift").unwrap();
        assert!(text_file.content.contains("primary"));
        assert!(!text_file.content.contains("static let grey750"));
        assert_eq!(text_file.reference_filename.as_deref(), Some("TextColors.swift"));
        assert_eq!(result.diffs.len(), 2);
    }
}
