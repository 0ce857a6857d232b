//! The `tokenweave` command.
//!
//! ```bash
//! # Best-practices output for every platform
//! tokenweave generate --light light.json --dark dark.json --out generated
//!
//! # Follow existing files
//! tokenweave generate --light light.json --mode match-existing -r ios/AppColors.swift
//!
//! # Classify the changes between two files
//! tokenweave diff old/tokens.css new/tokens.css
//!
//! # Alias edges, cycles and unused primitives
//! tokenweave graph light.json dark.json
//! ```

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokenweave_codegen::{
    generate, GeneratedArtifact, GenerationInput, GenerationMode, GenerationSummary, ReferenceFile, Warning,
};
use tokenweave_core::{ArtifactCategory, Platform, SourceFormat, TokenDocument};
use tokenweave_diff::DiffRecord;
use tokenweave_resolver::{unused_primitives, ImpactReport, ResolveError, TokenGraph};
use tracing_subscriber::{fmt, EnvFilter};

/// Design tokens in, platform source files out.
#[derive(Parser, Debug)]
#[command(name = "tokenweave", version, about)]
struct Cli {
    /// Log level when RUST_LOG is unset.
    #[arg(long, value_enum, global = true, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate source files and print a JSON report.
    Generate(GenerateArgs),
    /// Classify the token changes between a reference and a generated file.
    Diff {
        reference: PathBuf,
        generated: PathBuf,
        /// Source format; inferred from the reference's extension if omitted.
        #[arg(long)]
        format: Option<SourceFormat>,
    },
    /// Print alias edges, cycles and unused primitives of token documents.
    Graph {
        /// Documents in merge order; later ones win.
        #[arg(required = true)]
        documents: Vec<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Light color tokens.
    #[arg(long)]
    light: PathBuf,
    /// Dark color tokens.
    #[arg(long)]
    dark: Option<PathBuf>,
    /// Spacing, sizing and other values.
    #[arg(long)]
    values: Option<PathBuf>,
    #[arg(long)]
    typography: Option<PathBuf>,
    /// Reference source file; repeatable.
    #[arg(short, long = "reference")]
    references: Vec<PathBuf>,
    /// TOML file with generation options.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Target platform; repeatable. Defaults to all.
    #[arg(long = "platform")]
    platforms: Vec<Platform>,
    /// Unitless motion durations below this are read as seconds.
    #[arg(long)]
    seconds_threshold: Option<f64>,
    #[arg(long)]
    no_seconds_heuristic: bool,
    /// Emit artifacts on the thread pool.
    #[arg(long)]
    parallel: bool,
    #[arg(long)]
    kotlin_package: Option<String>,
    /// Output directory, one subdirectory per platform.
    #[arg(short, long, default_value = "generated")]
    out: PathBuf,
    /// Write the report here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
    /// Print the report without writing any files.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ModeArg {
    BestPractices,
    MatchExisting,
}

impl From<ModeArg> for GenerationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::BestPractices => GenerationMode::BestPractices,
            ModeArg::MatchExisting => GenerationMode::MatchExisting,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };
        f.write_str(level)
    }
}

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);

    let outcome = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Diff {
            reference,
            generated,
            format,
        } => run_diff(&reference, &generated, format),
        Command::Graph { documents } => run_graph(&documents),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn read_optional(path: Option<&PathBuf>) -> Result<Option<String>> {
    path.map(|p| read(p)).transpose()
}

/// A reference file, its platform taken from the extension.
fn load_reference(path: &Path) -> Result<ReferenceFile> {
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} is not a file", path.display()))?;
    let Some(format) = SourceFormat::from_filename(&filename) else {
        bail!("cannot infer the source format of {}", path.display());
    };
    Ok(ReferenceFile::new(format.platform(), filename, read(path)?))
}

/// Artifact entry of the report; the content lives on disk.
#[derive(Serialize)]
struct ArtifactEntry<'a> {
    filename: &'a str,
    path: String,
    platform: Platform,
    category: ArtifactCategory,
    format: SourceFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_filename: Option<&'a str>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    warnings: &'a [Warning],
}

#[derive(Serialize)]
struct GenerateReport<'a> {
    summary: &'a GenerationSummary,
    artifacts: Vec<ArtifactEntry<'a>>,
    diffs: &'a [DiffRecord],
    impact: &'a ImpactReport,
    warnings: &'a [Warning],
}

fn artifact_path(out: &Path, artifact: &GeneratedArtifact) -> PathBuf {
    out.join(artifact.platform.as_str()).join(&artifact.filename)
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    let file_options = config::load(args.config.as_deref())?;
    let options = config::apply(
        file_options,
        config::Overrides {
            mode: args.mode.map(GenerationMode::from),
            platforms: args.platforms.clone(),
            motion_seconds_threshold: args.seconds_threshold,
            disable_seconds_heuristic: args.no_seconds_heuristic,
            parallel: args.parallel,
            kotlin_package: args.kotlin_package.clone(),
        },
    );

    let light = read(&args.light)?;
    let dark = read_optional(args.dark.as_ref())?;
    let values = read_optional(args.values.as_ref())?;
    let typography = read_optional(args.typography.as_ref())?;
    let mut input = GenerationInput::from_json(&light, dark.as_deref(), values.as_deref(), typography.as_deref())
        .context("parsing token documents")?
        .with_options(options);
    for path in &args.references {
        input = input.with_reference(load_reference(path)?);
    }

    let result = generate(&input).context("generating")?;
    tracing::info!(
        artifacts = result.artifacts.len(),
        warnings = result.warnings.len(),
        "generated"
    );

    if !args.dry_run {
        for artifact in &result.artifacts {
            let path = artifact_path(&args.out, artifact);
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
            }
            fs::write(&path, &artifact.content).with_context(|| format!("writing {}", path.display()))?;
            tracing::debug!(file = %path.display(), "wrote artifact");
        }
    }

    let report = GenerateReport {
        summary: &result.summary,
        artifacts: result
            .artifacts
            .iter()
            .map(|a| ArtifactEntry {
                filename: &a.filename,
                path: artifact_path(&args.out, a).display().to_string(),
                platform: a.platform,
                category: a.category,
                format: a.format,
                reference_filename: a.reference_filename.as_deref(),
                warnings: &a.warnings,
            })
            .collect(),
        diffs: &result.diffs,
        impact: &result.impact,
        warnings: &result.warnings,
    };
    emit(&report, args.report.as_deref())
}

fn run_diff(reference: &Path, generated: &Path, format: Option<SourceFormat>) -> Result<()> {
    let format = match format {
        Some(format) => format,
        None => SourceFormat::from_filename(&reference.to_string_lossy())
            .with_context(|| format!("cannot infer the source format of {}; pass --format", reference.display()))?,
    };
    let filename = generated
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = tokenweave_diff::diff(&filename, &read(reference)?, &read(generated)?, format);
    emit(&record, None)
}

#[derive(Serialize)]
struct GraphReport {
    nodes: usize,
    edges: Vec<(String, String)>,
    cycles: Vec<Vec<String>>,
    unresolved: Vec<String>,
    unused: Vec<String>,
}

fn run_graph(paths: &[PathBuf]) -> Result<()> {
    let documents = paths
        .iter()
        .map(|path| {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            TokenDocument::from_json_str(&name, &read(path)?).with_context(|| format!("parsing {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&TokenDocument> = documents.iter().collect();
    let graph = TokenGraph::build(&refs);

    let report = GraphReport {
        nodes: graph.len(),
        edges: graph
            .edges()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        cycles: graph.detect_cycles(),
        unresolved: graph
            .resolve_all()
            .failures
            .iter()
            .filter(|failure| !matches!(failure, ResolveError::CircularAlias { .. }))
            .map(ToString::to_string)
            .collect(),
        unused: unused_primitives(&refs),
    };
    emit(&report, None)
}

/// Pretty JSON to `path`, or stdout.
fn emit<T: Serialize>(value: &T, path: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing report")?;
    match path {
        Some(path) => fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).context("writing report")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_generate() {
        let cli = Cli::try_parse_from([
            "tokenweave",
            "generate",
            "--light",
            "light.json",
            "-r",
            "AppColors.swift",
            "--platform",
            "ios",
            "--mode",
            "match-existing",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.references, vec![PathBuf::from("AppColors.swift")]);
        assert_eq!(args.platforms, vec![Platform::Ios]);
        assert_eq!(args.mode, Some(ModeArg::MatchExisting));
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_cli_requires_graph_documents() {
        assert!(Cli::try_parse_from(["tokenweave", "graph"]).is_err());
    }

    #[test]
    fn test_artifact_path_per_platform() {
        let artifact = GeneratedArtifact {
            filename: "AppColors.kt".to_string(),
            content: String::new(),
            format: SourceFormat::Kotlin,
            platform: Platform::Android,
            category: ArtifactCategory::Colors,
            reference_filename: None,
            reference_content: None,
            symbols: Default::default(),
            warnings: Vec::new(),
        };
        assert_eq!(
            artifact_path(Path::new("out"), &artifact),
            PathBuf::from("out/android/AppColors.kt")
        );
    }
}
