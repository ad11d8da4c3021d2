use anyhow::{Context, Result, bail, ensure};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{
    AssetEntry, InjectOptions, Injection, Manifest, Replacement, ReplacementReport,
    ResolvedManifest, RunOptions, Template, TextSource, encode_file, fs_utils, inject_with,
    template::FALLBACK_MIME,
};
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Default constants
const DEFAULT_PRESET: &str = "invoice";
const DEFAULT_LABEL_PREFIX: &str = "asset";

// --- CLI Structure ---

#[derive(Parser, Debug)]
#[command(name = "inlay")]
#[command(version, about = "inlay: embed images into source files as base64 data URIs", long_about = None)]
struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    command: Command,

    /// Set the logging level [default: info]
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    /// Allow overriding log level via RUST_LOG environment variable
    #[arg(long, default_value_t = false, global = true)]
    allow_env_log: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Encode a file to a base64 text artifact
    Encode {
        /// File to encode (any bytes)
        #[arg(long)]
        input: PathBuf,
        /// Where to write the base64 text; overwritten if present
        #[arg(long)]
        output: PathBuf,
    },
    /// Replace placeholder blocks in a document with rendered templates
    Inject {
        /// Document to rewrite [default: the manifest's target]
        #[arg(long, required_unless_present = "manifest")]
        target: Option<PathBuf>,
        /// Take placeholders, templates and artifacts from a manifest
        #[arg(long, conflicts_with_all = ["placeholder", "template", "artifact", "label", "mime"])]
        manifest: Option<PathBuf>,
        #[command(flatten)]
        pairs: PairArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Encode every asset of a manifest, then inject them into its target
    Run {
        /// Manifest describing sources, artifacts and placeholder blocks
        #[arg(long)]
        manifest: PathBuf,
        /// Reuse the artifacts already on disk
        #[arg(long, default_value_t = false)]
        skip_encode: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Write a bundled preset manifest to a file
    Init {
        /// Path where the manifest will be written
        path: PathBuf,
        /// Preset to write
        #[arg(long, default_value = DEFAULT_PRESET)]
        preset: String,
        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// Placeholder/template/artifact triples, paired by position.
#[derive(Args, Debug, Clone, Default)]
struct PairArgs {
    /// File holding the exact placeholder block (repeatable)
    #[arg(long)]
    placeholder: Vec<PathBuf>,
    /// File holding the substitute template (repeatable)
    #[arg(long)]
    template: Vec<PathBuf>,
    /// Base64 artifact written by `encode` (repeatable)
    #[arg(long)]
    artifact: Vec<PathBuf>,
    /// Name used in reports (repeatable, optional)
    #[arg(long)]
    label: Vec<String>,
    /// MIME type for the `{mime}`/`{data_uri}` slots (repeatable, optional)
    #[arg(long)]
    mime: Vec<String>,
}

#[derive(Args, Debug, Clone, Default)]
struct OutputArgs {
    /// Show what would change without writing the document
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    /// Print the report as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}
impl From<LogLevel> for tracing_subscriber::filter::Directive {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from(level).into()
    }
}

// --- Logging ---
fn init_logging(level: LogLevel, allow_env: bool) {
    let filter = if allow_env && std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .parse_lossy("")
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::Layer::new()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .init();
}

// --- Main ---
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.allow_env_log);

    match cli.command {
        Command::Encode { input, output } => run_encode(&input, &output),
        Command::Inject {
            target,
            manifest,
            pairs,
            output,
        } => run_inject(target, manifest, pairs, output),
        Command::Run {
            manifest,
            skip_encode,
            output,
        } => run_manifest(&manifest, skip_encode, output),
        Command::Init {
            path,
            preset,
            force,
        } => write_preset(&path, &preset, force),
    }
}

// --- Commands ---

fn run_encode(input: &Path, output: &Path) -> Result<()> {
    let summary = encode_file(input, output)
        .with_context(|| format!("Failed to encode {:?}", input))?;
    println!(
        "{} -> {} ({} bytes, {} chars)",
        summary.input.display(),
        summary.output.display(),
        summary.bytes_read,
        summary.chars_written
    );
    Ok(())
}

fn run_inject(
    target: Option<PathBuf>,
    manifest: Option<PathBuf>,
    pairs: PairArgs,
    output: OutputArgs,
) -> Result<()> {
    let (target, replacements) = match manifest {
        Some(path) => {
            let resolved = ResolvedManifest::load(&path)
                .with_context(|| format!("Failed to load manifest {:?}", path))?;
            let replacements = resolved
                .replacements()
                .context("Failed to read artifacts")?;
            (target.unwrap_or(resolved.target), replacements)
        }
        None => {
            let Some(target) = target else {
                bail!("--target is required without --manifest");
            };
            (target, pairs_to_replacements(&pairs)?)
        }
    };

    let injection = inject_with(
        &target,
        &replacements,
        InjectOptions {
            dry_run: output.dry_run,
        },
    )
    .with_context(|| format!("Failed to inject into {:?}", target))?;
    print_injection(&injection, &output)
}

fn run_manifest(path: &Path, skip_encode: bool, output: OutputArgs) -> Result<()> {
    info!("Running manifest {:?}", path);
    let resolved = ResolvedManifest::load(path)
        .with_context(|| format!("Failed to load manifest {:?}", path))?;
    let summary = engine::run(
        &resolved,
        RunOptions {
            dry_run: output.dry_run,
            skip_encode,
        },
    )
    .with_context(|| format!("Failed to run manifest {:?}", path))?;

    if !output.json {
        for encoded in &summary.encoded {
            println!(
                "encoded {} -> {} ({} bytes)",
                encoded.input.display(),
                encoded.output.display(),
                encoded.bytes_read
            );
        }
    }
    print_injection(&summary.injection, &output)
}

fn write_preset(path: &Path, preset_name: &str, force: bool) -> Result<()> {
    use std::fs;

    let manifest = preset_manifest(preset_name)?;
    if path.exists() && !force {
        bail!("{:?} already exists; pass --force to overwrite", path);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    manifest
        .save(path)
        .with_context(|| format!("Failed to write to {:?}", path))?;
    info!("Preset '{}' written to: {:?}", preset_name, path);
    Ok(())
}

// --- Helpers ---

fn preset_manifest(name: &str) -> Result<Manifest> {
    let Some(preset) = assets::get_preset(name) else {
        let known: Vec<_> = assets::preset_names().collect();
        bail!("Unknown preset '{}' (available: {})", name, known.join(", "));
    };
    Ok(Manifest {
        target: PathBuf::from(preset.target),
        assets: preset
            .assets
            .iter()
            .map(|a| AssetEntry {
                label: a.label.to_string(),
                source: PathBuf::from(a.source),
                artifact: PathBuf::from(a.artifact),
                mime: Some(a.mime.to_string()),
                placeholder: TextSource::from(fs_utils::strip_line_break(a.placeholder)),
                template: TextSource::from(fs_utils::strip_line_break(a.template)),
            })
            .collect(),
    })
}

fn pairs_to_replacements(pairs: &PairArgs) -> Result<Vec<Replacement>> {
    let count = pairs.placeholder.len();
    ensure!(count > 0, "At least one --placeholder/--template/--artifact triple is required");
    ensure!(
        pairs.template.len() == count && pairs.artifact.len() == count,
        "Got {} --placeholder, {} --template and {} --artifact; they pair by position",
        count,
        pairs.template.len(),
        pairs.artifact.len()
    );
    ensure!(
        pairs.label.is_empty() || pairs.label.len() == count,
        "Give --label for every pair or for none"
    );
    ensure!(
        pairs.mime.is_empty() || pairs.mime.len() == count,
        "Give --mime for every pair or for none"
    );

    (0..count)
        .map(|i| {
            let label = pairs
                .label
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("{}{}", DEFAULT_LABEL_PREFIX, i + 1));
            let mime = pairs.mime.get(i).map_or(FALLBACK_MIME, String::as_str);
            let placeholder = read_block(&pairs.placeholder[i])?;
            let template = Template::new(&label, read_block(&pairs.template[i])?)?;
            Replacement::from_artifact(label, placeholder, &template, &pairs.artifact[i], mime)
                .with_context(|| format!("Failed to read artifact {:?}", pairs.artifact[i]))
        })
        .collect()
}

/// Reads a block file, dropping the single line break editors append.
fn read_block(path: &Path) -> Result<String> {
    let text = fs_utils::read_text(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(fs_utils::strip_line_break(&text).to_string())
}

fn print_injection(injection: &Injection, output: &OutputArgs) -> Result<()> {
    let report = &injection.report;
    if output.json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", json);
        return Ok(());
    }
    if output.dry_run && report.changed {
        print!("{}", injection.preview());
    }
    println!("{}", render_report(report));
    Ok(())
}

fn render_report(report: &ReplacementReport) -> String {
    let mut lines: Vec<String> = report
        .entries
        .iter()
        .map(|e| {
            if e.found {
                format!("{}: found ({})", e.label, e.occurrences)
            } else {
                format!("{}: not found", e.label)
            }
        })
        .collect();
    lines.push(format!("{}: {}", report.target.display(), report.outcome()));
    lines.join("\n")
}
