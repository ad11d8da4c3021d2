use inlay_engine::{
    InjectOutcome, InlayError, Manifest, Replacement, ResolvedManifest, RunOptions, Template,
    decode_artifact, inject, run,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LOGO_BLOCK: &str = r##"            <svg width="250" height="64" viewBox="0 0 250 64" fill="none" xmlns="http://www.w3.org/2000/svg">
                <rect width="64" height="64" rx="12" fill="#3B82F6"/>
            </svg>"##;

const QR_BLOCK: &str = r#"                    <!-- Placeholder for QR Code -->
                    <div class="w-48 h-48 bg-gray-200">QR Code</div>"#;

const LOGO_IMG: &str = r#"            <img src="data:image/png;base64,iVBORw0KGgo=" alt="logo" />"#;
const QR_IMG: &str = r#"                    <img src="data:image/jpeg;base64,/9j/" alt="Scan to Pay" />"#;

fn document() -> String {
    format!("val html = \"\"\"\n<header>\n{LOGO_BLOCK}\n</header>\n<footer>\n{QR_BLOCK}\n</footer>\n\"\"\"\n")
}

fn replacements() -> Vec<Replacement> {
    vec![
        Replacement::new("logo", LOGO_BLOCK, LOGO_IMG),
        Replacement::new("qr", QR_BLOCK, QR_IMG),
    ]
}

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn second_injection_is_a_noop() {
    let dir = TempDir::new().unwrap();
    let target = write(dir.path(), "InvoiceHtmlTemplate.kt", &document());

    let first = inject(&target, &replacements()).unwrap();
    assert_eq!(first.outcome(), InjectOutcome::Modified);
    assert!(first.all_found());
    let after_first = fs::read_to_string(&target).unwrap();
    let mtime = fs::metadata(&target).unwrap().modified().unwrap();

    let second = inject(&target, &replacements()).unwrap();

    assert_eq!(second.outcome(), InjectOutcome::Unchanged);
    assert!(!second.changed);
    assert_eq!(second.missing().collect::<Vec<_>>(), vec!["logo", "qr"]);
    assert_eq!(fs::read_to_string(&target).unwrap(), after_first);
    assert_eq!(fs::metadata(&target).unwrap().modified().unwrap(), mtime);
}

#[test]
fn absent_placeholder_does_not_block_the_other() {
    let dir = TempDir::new().unwrap();
    let doc = format!("<footer>\n{QR_BLOCK}\n</footer>\n");
    let target = write(dir.path(), "Invoice.kt", &doc);

    let report = inject(&target, &replacements()).unwrap();

    assert_eq!(report.found("logo"), Some(false));
    assert_eq!(report.found("qr"), Some(true));
    assert_eq!(report.outcome(), InjectOutcome::Modified);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        format!("<footer>\n{QR_IMG}\n</footer>\n")
    );
}

#[test]
fn altered_indentation_is_not_matched() {
    let dir = TempDir::new().unwrap();
    // one space less in front of the <svg> line
    let shifted = LOGO_BLOCK.replacen("            <svg", "           <svg", 1);
    let doc = format!("{shifted}\nrest\n");
    let target = write(dir.path(), "Invoice.kt", &doc);

    let report = inject(&target, &replacements()[..1]).unwrap();

    assert_eq!(report.found("logo"), Some(false));
    assert_eq!(report.outcome(), InjectOutcome::Unchanged);
    assert_eq!(fs::read_to_string(&target).unwrap(), doc);
}

#[test]
fn logo_block_then_unrelated_text() {
    let dir = TempDir::new().unwrap();
    let tail = "\n// unrelated: ünïcödé stays byte-identical\nfun render() = Unit\n";
    let target = write(dir.path(), "Invoice.kt", &format!("{LOGO_BLOCK}{tail}"));

    inject(&target, &replacements()[..1]).unwrap();

    let bytes = fs::read(&target).unwrap();
    assert_eq!(bytes, format!("{LOGO_IMG}{tail}").into_bytes());
}

#[test]
fn missing_artifact_aborts_before_touching_target() {
    let dir = TempDir::new().unwrap();
    let target = write(dir.path(), "Invoice.kt", &document());
    let template = Template::new("logo", "<img src=\"{data_uri}\"/>").unwrap();

    let err = Replacement::from_artifact(
        "logo",
        LOGO_BLOCK,
        &template,
        &dir.path().join("logo_b64.txt"),
        "image/png",
    )
    .unwrap_err();

    assert!(matches!(err, InlayError::NotFound(_)));
    assert_eq!(fs::read_to_string(&target).unwrap(), document());
}

#[test]
fn manifest_pipeline_encodes_then_injects() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("assets")).unwrap();
    fs::write(dir.path().join("assets/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    fs::write(dir.path().join("assets/qr_code.jpg"), [0xFF, 0xD8, 0xFF]).unwrap();
    let target = write(dir.path(), "Invoice.kt", &document());

    let manifest = serde_json::json!({
        "target": "Invoice.kt",
        "assets": [
            {
                "label": "logo",
                "source": "assets/logo.png",
                "artifact": "logo_b64.txt",
                "placeholder": LOGO_BLOCK,
                "template": "<img src=\"data:{mime};base64,{base64}\"/>"
            },
            {
                "label": "qr",
                "source": "assets/qr_code.jpg",
                "artifact": "qr_b64.txt",
                "placeholder": QR_BLOCK,
                "template": "<img src=\"{data_uri}\"/>"
            }
        ]
    });
    let manifest_path = write(dir.path(), "inlay.json", &manifest.to_string());
    let resolved = ResolvedManifest::load(&manifest_path).unwrap();

    let summary = run(&resolved, RunOptions::default()).unwrap();

    assert_eq!(summary.encoded.len(), 2);
    assert_eq!(summary.injection.report.outcome(), InjectOutcome::Modified);
    let qr_text = fs::read_to_string(dir.path().join("qr_b64.txt")).unwrap();
    assert_eq!(qr_text, "/9j/");
    let logo_text = fs::read_to_string(dir.path().join("logo_b64.txt")).unwrap();
    assert_eq!(
        decode_artifact(&logo_text, Path::new("logo_b64.txt")).unwrap(),
        vec![0x89, b'P', b'N', b'G']
    );

    let updated = fs::read_to_string(&target).unwrap();
    assert!(updated.contains(&format!("<img src=\"data:image/png;base64,{logo_text}\"/>")));
    assert!(updated.contains("<img src=\"data:image/jpeg;base64,/9j/\"/>"));
    assert!(!updated.contains("QR Code"));
}

#[test]
fn manifest_pipeline_dry_run_and_skip_encode() {
    let dir = TempDir::new().unwrap();
    let target = write(dir.path(), "Invoice.kt", &document());
    write(dir.path(), "qr_b64.txt", "/9j/\n");

    let manifest = Manifest {
        target: "Invoice.kt".into(),
        assets: vec![inlay_engine::AssetEntry {
            label: "qr".into(),
            source: "assets/does_not_exist.jpg".into(),
            artifact: "qr_b64.txt".into(),
            mime: None,
            placeholder: QR_BLOCK.into(),
            template: "{data_uri}".into(),
        }],
    };
    let resolved = manifest
        .resolve(dir.path(), &dir.path().join("inlay.json"))
        .unwrap();

    let summary = run(
        &resolved,
        RunOptions {
            dry_run: true,
            skip_encode: true,
        },
    )
    .unwrap();

    assert!(summary.encoded.is_empty());
    assert_eq!(summary.injection.report.outcome(), InjectOutcome::WouldModify);
    assert!(summary.injection.preview().contains("+data:image/jpeg;base64,/9j/"));
    assert_eq!(fs::read_to_string(&target).unwrap(), document());

    let err = run(&resolved, RunOptions::default()).unwrap_err();
    assert!(err.is_not_found());
}
