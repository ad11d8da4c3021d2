use crate::Result;
use crate::error::InlayError;
use std::path::Path;

pub const BASE64_TOKEN: &str = "{base64}";
pub const MIME_TOKEN: &str = "{mime}";
pub const DATA_URI_TOKEN: &str = "{data_uri}";

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Substitute markup with a `{base64}` or `{data_uri}` slot, and
/// optionally `{mime}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template(String);

impl Template {
    pub fn new(label: &str, text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if !text.contains(BASE64_TOKEN) && !text.contains(DATA_URI_TOKEN) {
            return Err(InlayError::InvalidTemplate(label.to_string()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fills every slot in one pass; substituted values are never scanned
    /// for tokens again.
    pub fn render(&self, mime: &str, base64: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + base64.len());
        let mut rest = self.0.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            rest = if let Some(after) = tail.strip_prefix(BASE64_TOKEN) {
                out.push_str(base64);
                after
            } else if let Some(after) = tail.strip_prefix(MIME_TOKEN) {
                out.push_str(mime);
                after
            } else if let Some(after) = tail.strip_prefix(DATA_URI_TOKEN) {
                out.push_str(&data_uri(mime, base64));
                after
            } else {
                out.push('{');
                &tail[1..]
            };
        }
        out.push_str(rest);
        out
    }
}

/// Picks a MIME type from the file extension alone; the bytes are never
/// inspected.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => FALLBACK_MIME,
    }
}

pub fn data_uri(mime: &str, base64: &str) -> String {
    format!("data:{mime};base64,{base64}")
}
