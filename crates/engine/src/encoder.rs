use crate::Result;
use crate::error::InlayError;
use crate::fs_utils::{read_bytes, write_text};
use base64::{Engine, engine::general_purpose::STANDARD};
use log::info;
use std::path::{Path, PathBuf};

/// What one `encode_file` call read and wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub bytes_read: usize,
    pub chars_written: usize,
}

/// Standard alphabet, padded, single line.
pub fn encode_bytes(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Reads `input` whole and writes its base64 text to `output`, replacing
/// anything already there. The input is treated as opaque bytes.
pub fn encode_file(input: &Path, output: &Path) -> Result<EncodeSummary> {
    let data = read_bytes(input)?;
    let encoded = encode_bytes(&data);
    write_text(output, &encoded)?;

    info!(
        "Encoded {:?} ({} bytes) -> {:?} ({} chars)",
        input,
        data.len(),
        output,
        encoded.len()
    );
    Ok(EncodeSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        bytes_read: data.len(),
        chars_written: encoded.len(),
    })
}

/// Decodes artifact text, ignoring surrounding whitespace.
pub fn decode_artifact(text: &str, origin: &Path) -> Result<Vec<u8>> {
    STANDARD
        .decode(text.trim())
        .map_err(|e| InlayError::InvalidArtifact(origin.to_path_buf(), e))
}
