//! Document requests, the HTML shell they are printed in, and the output

use std::fmt::Write as _;

use base64::Engine as _;

use crate::options::{Margins, OptionsOverride};
use crate::template::TemplateRef;

/// One document to generate
///
/// Built with consuming `with_*` methods; nothing here is shared between
/// generation calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentRequest {
    /// Body HTML, embedded verbatim
    pub html: String,
    /// Template printed in the top margin of every page
    pub header: Option<TemplateRef>,
    /// Template printed in the bottom margin of every page
    pub footer: Option<TemplateRef>,
    /// Options that win over the generator's defaults for this document
    pub options: OptionsOverride,
}

impl DocumentRequest {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, header: TemplateRef) -> Self {
        self.header = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: TemplateRef) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn with_options(mut self, options: OptionsOverride) -> Self {
        self.options = options;
        self
    }
}

/// The bytes of a generated PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocument {
    bytes: Vec<u8>,
}

impl GeneratedDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the bytes start with the `%PDF-` magic
    pub fn looks_like_pdf(&self) -> bool {
        self.bytes.starts_with(b"%PDF-")
    }

    /// Standard base64 of the document, for JSON transports
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn write_to(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

impl AsRef<[u8]> for GeneratedDocument {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// CSS length for a margin value: whole numbers print without a fraction
fn px(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}px", value as i64)
    } else {
        format!("{}px", value)
    }
}

/// Wrap an HTML fragment in a standalone document carrying the margins.
///
/// The fragment is not parsed or validated.
pub fn wrap_content(fragment: &str, margins: &Margins) -> String {
    let mut doc = String::with_capacity(fragment.len() + 320);
    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n    <style>\n");
    let _ = write!(
        doc,
        "        @page {{\n            margin: {} {} {} {};\n        }}\n",
        px(margins.top),
        px(margins.right),
        px(margins.bottom),
        px(margins.left)
    );
    doc.push_str(
        "        body {\n            margin: 0;\n            padding: 0;\n            font-family: Arial, sans-serif;\n        }\n",
    );
    doc.push_str("    </style>\n</head>\n<body>\n");
    doc.push_str(fragment);
    doc.push_str("\n</body>\n</html>\n");
    doc
}
