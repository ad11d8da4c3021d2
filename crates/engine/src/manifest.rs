use crate::Result;
use crate::error::InlayError;
use crate::fs_utils::{read_text, resolve_path, strip_line_break, write_text};
use crate::injector::Replacement;
use crate::template::{Template, mime_for_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text given inline in the manifest or kept in a separate file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextSource {
    Inline(String),
    File { file: PathBuf },
}

impl TextSource {
    /// Loads the text. One trailing line break is dropped from file
    /// contents, since editors add it and placeholder blocks never end in one.
    fn load(&self, base: &Path) -> Result<String> {
        match self {
            TextSource::Inline(text) => Ok(text.clone()),
            TextSource::File { file } => {
                let text = read_text(&resolve_path(base, file))?;
                Ok(strip_line_break(&text).to_string())
            }
        }
    }
}

impl From<&str> for TextSource {
    fn from(value: &str) -> Self {
        TextSource::Inline(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetEntry {
    pub label: String,
    /// Binary file to encode.
    pub source: PathBuf,
    /// Base64 text file written by the encoder and read by the injector.
    pub artifact: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime: Option<String>,
    pub placeholder: TextSource,
    pub template: TextSource,
}

/// Replaces the hard-coded paths and blocks of a one-off embedding script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub target: PathBuf,
    pub assets: Vec<AssetEntry>,
}

impl Manifest {
    pub fn from_json(text: &str, origin: &Path) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| InlayError::Manifest(origin.to_path_buf(), e))
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_json(&read_text(path)?, path)
    }

    /// `origin` is the manifest's own path, used in error messages.
    pub fn to_json(&self, origin: &Path) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| InlayError::Manifest(origin.to_path_buf(), e))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json(path)?;
        json.push('\n');
        write_text(path, &json)
    }

    /// Resolves relative paths against `base` and loads every text source.
    pub fn resolve(&self, base: &Path, origin: &Path) -> Result<ResolvedManifest> {
        if self.assets.is_empty() {
            return Err(InlayError::EmptyManifest(origin.to_path_buf()));
        }
        let assets = self
            .assets
            .iter()
            .map(|entry| -> Result<ResolvedAsset> {
                let source = resolve_path(base, &entry.source);
                let mime = entry
                    .mime
                    .clone()
                    .unwrap_or_else(|| mime_for_path(&source).to_string());
                Ok(ResolvedAsset {
                    label: entry.label.clone(),
                    artifact: resolve_path(base, &entry.artifact),
                    placeholder: entry.placeholder.load(base)?,
                    template: Template::new(&entry.label, entry.template.load(base)?)?,
                    source,
                    mime,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ResolvedManifest {
            target: resolve_path(base, &self.target),
            assets,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    pub label: String,
    pub source: PathBuf,
    pub artifact: PathBuf,
    pub mime: String,
    pub placeholder: String,
    pub template: Template,
}

impl ResolvedAsset {
    pub fn replacement(&self) -> Result<Replacement> {
        Replacement::from_artifact(
            self.label.as_str(),
            self.placeholder.as_str(),
            &self.template,
            &self.artifact,
            &self.mime,
        )
    }
}

/// A manifest with absolute paths and all text loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedManifest {
    pub target: PathBuf,
    pub assets: Vec<ResolvedAsset>,
}

impl ResolvedManifest {
    /// Loads `path` and resolves it against the directory holding it.
    pub fn load(path: &Path) -> Result<Self> {
        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Manifest::load(path)?.resolve(&base, path)
    }

    /// Reads every artifact, in manifest order.
    pub fn replacements(&self) -> Result<Vec<Replacement>> {
        self.assets.iter().map(ResolvedAsset::replacement).collect()
    }
}
