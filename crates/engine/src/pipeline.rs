use crate::Result;
use crate::encoder::{EncodeSummary, encode_file};
use crate::injector::{InjectOptions, Injection, inject_with};
use crate::manifest::ResolvedManifest;
use log::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Reuse artifacts already on disk instead of re-encoding the sources.
    pub skip_encode: bool,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub encoded: Vec<EncodeSummary>,
    pub injection: Injection,
}

/// Encodes every asset, then injects all of them into the target.
///
/// Encoding always finishes before the first artifact is read. Any I/O
/// failure stops the run; artifacts already written stay on disk.
pub fn run(manifest: &ResolvedManifest, options: RunOptions) -> Result<RunSummary> {
    let encoded = if options.skip_encode {
        info!("Skipping encode step, reusing existing artifacts");
        Vec::new()
    } else {
        manifest
            .assets
            .iter()
            .map(|asset| encode_file(&asset.source, &asset.artifact))
            .collect::<Result<Vec<_>>>()?
    };

    let replacements = manifest.replacements()?;
    let injection = inject_with(
        &manifest.target,
        &replacements,
        InjectOptions {
            dry_run: options.dry_run,
        },
    )?;

    Ok(RunSummary { encoded, injection })
}
