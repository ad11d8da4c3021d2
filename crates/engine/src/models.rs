use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Whether one placeholder was present in the document as loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderStatus {
    pub label: String,
    pub found: bool,
    /// Non-overlapping matches in the original text.
    pub occurrences: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectOutcome {
    Modified,
    /// Dry run: the document would have changed but was left alone.
    WouldModify,
    Unchanged,
}

impl fmt::Display for InjectOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InjectOutcome::Modified => "modified",
            InjectOutcome::WouldModify => "would modify",
            InjectOutcome::Unchanged => "unchanged",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementReport {
    pub target: PathBuf,
    /// One entry per replacement, in the order they were applied.
    pub entries: Vec<PlaceholderStatus>,
    /// Final text differs from the text that was read.
    pub changed: bool,
    /// The target file was rewritten.
    pub written: bool,
}

impl ReplacementReport {
    pub fn outcome(&self) -> InjectOutcome {
        match (self.changed, self.written) {
            (true, true) => InjectOutcome::Modified,
            (true, false) => InjectOutcome::WouldModify,
            (false, _) => InjectOutcome::Unchanged,
        }
    }

    pub fn missing(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| !e.found)
            .map(|e| e.label.as_str())
    }

    pub fn all_found(&self) -> bool {
        self.entries.iter().all(|e| e.found)
    }

    pub fn found(&self, label: &str) -> Option<bool> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.found)
    }
}
