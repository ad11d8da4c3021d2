use crate::Result;
use crate::fs_utils::{read_text, unified_preview, write_atomic};
use crate::models::{PlaceholderStatus, ReplacementReport};
use crate::template::Template;
use log::{debug, info, warn};
use std::path::Path;

/// Exact block of text to find, and what to put in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub label: String,
    pub placeholder: String,
    pub substitute: String,
}

impl Replacement {
    pub fn new(
        label: impl Into<String>,
        placeholder: impl Into<String>,
        substitute: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            placeholder: placeholder.into(),
            substitute: substitute.into(),
        }
    }

    /// Builds the substitute from a base64 artifact on disk. Surrounding
    /// whitespace in the artifact is dropped before rendering.
    pub fn from_artifact(
        label: impl Into<String>,
        placeholder: impl Into<String>,
        template: &Template,
        artifact: &Path,
        mime: &str,
    ) -> Result<Self> {
        let base64 = read_text(artifact)?;
        let label = label.into();
        debug!(
            "Loaded artifact {:?} for '{}' ({} chars)",
            artifact,
            label,
            base64.trim().len()
        );
        Ok(Self {
            substitute: template.render(mime, base64.trim()),
            placeholder: placeholder.into(),
            label,
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectOptions {
    /// Compute everything but never touch the target.
    pub dry_run: bool,
}

/// Result of `plan`: the rewritten text and per-placeholder findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Planned {
    pub text: String,
    pub entries: Vec<PlaceholderStatus>,
    pub changed: bool,
}

/// Applies `replacements` in order to `original` without any I/O.
///
/// Presence is always judged against `original`, while each replacement
/// rewrites the working copy left by the previous one. An empty placeholder
/// never matches.
pub fn plan(original: &str, replacements: &[Replacement]) -> Planned {
    let mut working = original.to_string();
    let mut entries = Vec::with_capacity(replacements.len());

    for r in replacements {
        let occurrences = if r.placeholder.is_empty() {
            0
        } else {
            original.matches(r.placeholder.as_str()).count()
        };
        if occurrences > 0 {
            info!("Placeholder '{}' found ({} occurrence(s))", r.label, occurrences);
        } else {
            warn!("Placeholder '{}' not found in document", r.label);
        }

        if !r.placeholder.is_empty() && working.contains(r.placeholder.as_str()) {
            working = working.replace(r.placeholder.as_str(), &r.substitute);
        }

        entries.push(PlaceholderStatus {
            label: r.label.clone(),
            found: occurrences > 0,
            occurrences,
        });
    }

    let changed = working != original;
    Planned {
        text: working,
        entries,
        changed,
    }
}

/// Everything an injection run saw, for callers that want a preview.
#[derive(Debug, Clone)]
pub struct Injection {
    pub report: ReplacementReport,
    pub original: String,
    pub updated: String,
}

impl Injection {
    pub fn preview(&self) -> String {
        unified_preview(&self.original, &self.updated)
    }
}

/// Reads `target`, applies `replacements`, and rewrites the file in place
/// only if the text changed.
pub fn inject(target: &Path, replacements: &[Replacement]) -> Result<ReplacementReport> {
    inject_with(target, replacements, InjectOptions::default()).map(|i| i.report)
}

pub fn inject_with(
    target: &Path,
    replacements: &[Replacement],
    options: InjectOptions,
) -> Result<Injection> {
    let original = read_text(target)?;
    let planned = plan(&original, replacements);

    let written = if !planned.changed {
        info!("No changes made to {:?}", target);
        false
    } else if options.dry_run {
        info!("Dry run: {:?} would be rewritten", target);
        false
    } else {
        write_atomic(target, &planned.text)?;
        info!("Injected assets into {:?}", target);
        true
    };

    Ok(Injection {
        report: ReplacementReport {
            target: target.to_path_buf(),
            entries: planned.entries,
            changed: planned.changed,
            written,
        },
        original,
        updated: planned.text,
    })
}
