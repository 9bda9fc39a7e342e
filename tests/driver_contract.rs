//! Generator behavior against a recording driver (no Chrome required)

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rfpdf::{
    AsyncGenerator, BrowserDriver, DocumentRequest, Error, OptionsOverride, PdfConfig, PdfGenerator,
    PrintOptions, Result, TemplateRef, TemplateRegistry,
};
use serde_json::json;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Connect,
    Open(u32),
    Navigate(u32, String),
    Print(u32, PrintOptions),
    ClosePage(u32),
    Close,
}

/// Shared call log so tests can inspect it after the driver moved
#[derive(Clone, Default)]
struct Log(Arc<Mutex<Vec<Call>>>);

impl Log {
    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

#[derive(Default)]
struct RecordingDriver {
    log: Log,
    connected: Mutex<bool>,
    next_page: Mutex<u32>,
    fail_navigation: bool,
    /// Snapshot of whether the temp document existed while navigating
    seen_files: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl BrowserDriver for RecordingDriver {
    type Page = u32;

    fn open_page(&self) -> Result<u32> {
        let mut connected = self.connected.lock().unwrap();
        if !*connected {
            self.log.push(Call::Connect);
            *connected = true;
        }
        let mut next = self.next_page.lock().unwrap();
        *next += 1;
        self.log.push(Call::Open(*next));
        Ok(*next)
    }

    fn navigate(&self, page: &u32, url: &str) -> Result<()> {
        self.log.push(Call::Navigate(*page, url.to_string()));
        let path = url::Url::parse(url).unwrap().to_file_path().unwrap();
        let exists = path.exists();
        self.seen_files.lock().unwrap().push((path, exists));
        if self.fail_navigation {
            return Err(anyhow::anyhow!("net::ERR_FILE_NOT_FOUND").into());
        }
        Ok(())
    }

    fn print_to_pdf(&self, page: &u32, options: &PrintOptions) -> Result<Vec<u8>> {
        self.log.push(Call::Print(*page, options.clone()));
        Ok(b"%PDF-1.7\n%recorded\n".to_vec())
    }

    fn close_page(&self, page: u32) -> Result<()> {
        self.log.push(Call::ClosePage(page));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        *self.connected.lock().unwrap()
    }

    fn close(&mut self) -> Result<()> {
        self.log.push(Call::Close);
        *self.connected.lock().unwrap() = false;
        Ok(())
    }
}

fn generator(driver: RecordingDriver) -> PdfGenerator<RecordingDriver> {
    let mut templates = TemplateRegistry::new();
    templates.register("pdf.header", "<div class=\"title\">{{ title }}</div>");
    templates.register(
        "pdf.footer",
        "<div>Page <span class=\"pageNumber\"></span> of <span class=\"totalPages\"></span></div>",
    );
    templates.register("invoice", "<h1>Invoice {{ number }}</h1>");
    PdfGenerator::new(driver, PdfConfig::default())
        .unwrap()
        .with_templates(templates)
}

#[test]
fn unknown_size_never_reaches_the_driver() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let gen = generator(driver);

    let request = DocumentRequest::new("<p>x</p>").with_options(OptionsOverride::default().with_size("banner"));
    let err = gen.generate(&request).unwrap_err();

    assert!(err.is_invalid_configuration(), "got {:?}", err);
    assert!(log.calls().is_empty());
    assert!(!gen.driver().is_connected());
}

#[test]
fn missing_header_template_never_reaches_the_driver() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let gen = generator(driver);

    let request = DocumentRequest::new("<p>x</p>").with_header(TemplateRef::named("pdf.nope"));
    assert!(matches!(
        gen.generate(&request),
        Err(Error::TemplateRenderFailure { .. })
    ));
    assert!(log.calls().is_empty());
}

#[test]
fn connection_is_reused_and_each_document_gets_its_own_page() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let gen = generator(driver);

    gen.generate_html("<p>one</p>", &OptionsOverride::default()).unwrap();
    gen.generate_html("<p>two</p>", &OptionsOverride::default()).unwrap();

    let calls = log.calls();
    assert_eq!(calls.iter().filter(|c| **c == Call::Connect).count(), 1);
    assert!(calls.contains(&Call::ClosePage(1)));
    assert!(calls.contains(&Call::ClosePage(2)));
}

#[test]
fn print_options_carry_templates_and_paper() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let gen = generator(driver);

    let request = DocumentRequest::new("<h1>Test Document</h1><p>This is a test.</p>")
        .with_header(TemplateRef::new("pdf.header", json!({ "title": "Quarterly" })))
        .with_footer(TemplateRef::named("pdf.footer"))
        .with_options(OptionsOverride::default().with_page("legal", "landscape"));
    let doc = gen.generate(&request).unwrap();
    assert!(doc.looks_like_pdf());

    let print = log
        .calls()
        .into_iter()
        .find_map(|c| match c {
            Call::Print(_, options) => Some(options),
            _ => None,
        })
        .expect("print call");
    assert_eq!(print.paper.width, 1008.0);
    assert_eq!(print.paper.height, 612.0);
    assert_eq!(print.header_template.as_deref(), Some("<div class=\"title\">Quarterly</div>"));
    assert!(print.footer_template.unwrap().contains("pageNumber"));
    assert!(print.display_header_footer);
}

#[test]
fn temp_document_exists_during_navigation_and_is_removed_after() {
    let driver = RecordingDriver::default();
    let seen = driver.seen_files.clone();
    let gen = generator(driver);

    gen.generate_html("<p>x</p>", &OptionsOverride::default()).unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    let (path, existed) = &seen[0];
    assert!(*existed);
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
    assert!(!path.exists(), "temp document left behind at {}", path.display());
}

#[test]
fn failed_navigation_still_cleans_up() {
    let driver = RecordingDriver {
        fail_navigation: true,
        ..Default::default()
    };
    let log = driver.log.clone();
    let seen = driver.seen_files.clone();
    let gen = generator(driver);

    let err = gen.generate_html("<p>x</p>", &OptionsOverride::default()).unwrap_err();
    match &err {
        Error::RenderFailure { context, .. } => assert!(context.contains("ERR_FILE_NOT_FOUND")),
        other => panic!("expected RenderFailure, got {:?}", other),
    }

    let calls = log.calls();
    assert!(!calls.iter().any(|c| matches!(c, Call::Print(..))));
    assert_eq!(calls.last(), Some(&Call::ClosePage(1)));
    let (path, _) = seen.lock().unwrap()[0].clone();
    assert!(!path.exists());
}

#[test]
fn views_render_the_body() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let gen = generator(driver);

    let request = gen.view_request("invoice", &json!({ "number": 42 })).unwrap();
    assert_eq!(request.html, "<h1>Invoice 42</h1>");
    gen.view("invoice", &json!({ "number": 42 }), &OptionsOverride::default())
        .unwrap();
    assert!(log.calls().iter().any(|c| matches!(c, Call::Print(..))));
}

#[test]
fn close_tears_down_the_connection() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let mut gen = generator(driver);

    gen.generate_html("<p>x</p>", &OptionsOverride::default()).unwrap();
    assert!(gen.driver().is_connected());
    gen.close().unwrap();
    assert!(!gen.driver().is_connected());
    assert_eq!(log.calls().last(), Some(&Call::Close));
}

#[tokio::test]
async fn async_generator_runs_requests_on_the_worker() {
    let driver = RecordingDriver::default();
    let log = driver.log.clone();
    let handle = AsyncGenerator::new(generator(driver));

    let doc = handle
        .generate(DocumentRequest::new("<p>async</p>"))
        .await
        .unwrap();
    assert!(doc.looks_like_pdf());

    let other = handle.clone();
    let doc = other
        .view("invoice", json!({ "number": 7 }), OptionsOverride::default())
        .await
        .unwrap();
    assert!(doc.looks_like_pdf());

    let err = handle
        .generate(DocumentRequest::new("").with_options(OptionsOverride::default().with_orientation("sideways")))
        .await
        .unwrap_err();
    assert!(err.is_invalid_configuration());

    handle.close().await.unwrap();
    assert_eq!(log.calls().last(), Some(&Call::Close));
    assert!(other.generate(DocumentRequest::new("<p>late</p>")).await.is_err());
}
