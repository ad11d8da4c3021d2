pub mod encoder;
pub mod error;
pub mod fs_utils;
pub mod injector;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod template;

pub use encoder::{EncodeSummary, decode_artifact, encode_bytes, encode_file};
pub use error::{InlayError, IoOp, Result};
pub use injector::{InjectOptions, Injection, Replacement, inject, inject_with, plan};
pub use manifest::{AssetEntry, Manifest, ResolvedAsset, ResolvedManifest, TextSource};
pub use models::*;
pub use pipeline::{RunOptions, RunSummary, run};
pub use template::{Template, data_uri, mime_for_path};
