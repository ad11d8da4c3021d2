//! Static assets for inlay
//!
//! Bundles the placeholder blocks and substitute templates of the invoice
//! preset so the binary can write a ready-to-edit manifest without any
//! files on disk.

/// SVG logo block that stands in for the real logo in the invoice template
pub const LOGO_PLACEHOLDER: &str = include_str!("../blocks/logo_placeholder.html");

/// `<img>` markup embedding the logo as a data URI
pub const LOGO_TEMPLATE: &str = include_str!("../blocks/logo_img.html");

/// Grey box marking where the payment QR code goes
pub const QR_PLACEHOLDER: &str = include_str!("../blocks/qr_placeholder.html");

/// `<img>` markup embedding the QR code as a data URI
pub const QR_TEMPLATE: &str = include_str!("../blocks/qr_img.html");

/// Document the invoice preset rewrites, relative to the project root
pub const INVOICE_TARGET: &str =
    "app/src/main/java/com/bitflow/finance/ui/screens/invoice/InvoiceHtmlTemplate.kt";

/// One image of a bundled preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAsset {
    pub label: &'static str,
    pub source: &'static str,
    pub artifact: &'static str,
    pub mime: &'static str,
    pub placeholder: &'static str,
    pub template: &'static str,
}

/// A named set of assets injected into one target document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub target: &'static str,
    pub assets: &'static [PresetAsset],
}

const INVOICE_ASSETS: &[PresetAsset] = &[
    PresetAsset {
        label: "logo",
        source: "invoice_generator/assets/logo.png",
        artifact: "logo_b64.txt",
        mime: "image/png",
        placeholder: LOGO_PLACEHOLDER,
        template: LOGO_TEMPLATE,
    },
    PresetAsset {
        label: "qr",
        source: "invoice_generator/assets/qr_code.jpg",
        artifact: "qr_b64.txt",
        mime: "image/jpeg",
        placeholder: QR_PLACEHOLDER,
        template: QR_TEMPLATE,
    },
];

const PRESETS: &[Preset] = &[Preset {
    name: "invoice",
    target: INVOICE_TARGET,
    assets: INVOICE_ASSETS,
}];

/// Get a preset by name
pub fn get_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// Names of every bundled preset
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|p| p.name)
}
