//! End-to-end tests against a real headless Chrome

#![cfg(feature = "cdp")]

use rfpdf::{
    AsyncGenerator, BrowserDriver, DocumentRequest, OptionsOverride, PdfConfig, PdfGenerator, TemplateRef,
    TemplateRegistry,
};
use serde_json::json;

fn chrome_generator() -> PdfGenerator<rfpdf::ChromeDriver> {
    PdfGenerator::chrome(PdfConfig::default()).expect("Failed to create generator")
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_generate_from_html() {
    let generator = chrome_generator();

    let pdf = generator
        .generate_html("<h1>Test Document</h1><p>This is a test.</p>", &OptionsOverride::default())
        .expect("Failed to generate PDF");

    assert!(!pdf.is_empty());
    assert!(pdf.as_bytes().starts_with(b"%PDF-"));
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_browser_is_reused_between_documents() {
    let mut generator = chrome_generator();
    assert!(!generator.driver().is_connected());

    for size in ["a4", "letter", "legal"] {
        let pdf = generator
            .generate_html(
                "<p>page</p>",
                &OptionsOverride::default().with_page(size, "landscape"),
            )
            .expect("Failed to generate PDF");
        assert!(pdf.looks_like_pdf());
        assert!(generator.driver().is_connected());
    }

    generator.close().unwrap();
    assert!(!generator.driver().is_connected());
}

#[test]
#[ignore] // Requires Chrome to be installed
fn test_header_and_footer_templates() {
    let mut templates = TemplateRegistry::new();
    templates.register(
        "header",
        r#"<div style="font-size:8px;width:100%;text-align:center">{{ title }}</div>"#,
    );
    templates.register(
        "footer",
        r#"<div style="font-size:8px;width:100%;text-align:right"><span class="pageNumber"></span>/<span class="totalPages"></span></div>"#,
    );
    let generator = chrome_generator().with_templates(templates);

    let request = DocumentRequest::new("<h1>Report</h1>")
        .with_header(TemplateRef::new("header", json!({ "title": "Quarterly Report" })))
        .with_footer(TemplateRef::named("footer"))
        .with_options(OptionsOverride::from_json_str(r#"{"margins":{"top":60,"bottom":60}}"#).unwrap());

    let pdf = generator.generate(&request).expect("Failed to generate PDF");
    assert!(pdf.looks_like_pdf());
}

#[tokio::test]
#[ignore] // Requires Chrome to be installed
async fn test_async_generator() {
    let handle = AsyncGenerator::new(chrome_generator());

    let pdf = handle
        .generate(DocumentRequest::new("<p>async</p>"))
        .await
        .expect("Failed to generate PDF");
    assert!(pdf.looks_like_pdf());

    handle.close().await.unwrap();
}
