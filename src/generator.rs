//! The document pipeline: options, templates, browser, bytes
//!
//! [`PdfGenerator::generate`] is the single entry point. Everything that can
//! be validated without a browser (option merge, template rendering, content
//! wrapping) happens first in [`PdfGenerator::prepare`], so a bad page size
//! or a missing template never touches the driver.

use std::io::Write;

use log::{debug, info, warn};
use serde_json::Value;
use url::Url;

use crate::document::{wrap_content, DocumentRequest, GeneratedDocument};
use crate::driver::{BrowserDriver, PrintOptions};
use crate::options::{OptionsOverride, PdfConfig, RenderOptions};
use crate::template::{TemplateRef, TemplateRegistry, TemplateRenderer};
use crate::{Error, Result};

/// Prefix applied to component names before lookup
pub const COMPONENT_PREFIX: &str = "components.";

/// A request that passed validation and is ready to print
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDocument {
    /// The standalone HTML document handed to the browser
    pub html: String,
    pub options: RenderOptions,
    pub print: PrintOptions,
}

/// Generates PDFs through a [`BrowserDriver`]
pub struct PdfGenerator<D: BrowserDriver> {
    driver: D,
    config: PdfConfig,
    templates: Box<dyn TemplateRenderer>,
}

impl<D: BrowserDriver> PdfGenerator<D> {
    /// Create a generator. The configured defaults are resolved once here
    /// so an invalid config file fails at startup rather than per document.
    pub fn new(driver: D, config: PdfConfig) -> Result<Self> {
        config.resolve()?;
        Ok(Self {
            driver,
            config,
            templates: Box::new(TemplateRegistry::new()),
        })
    }

    /// Replace the template renderer used for views, headers, and footers
    pub fn with_templates(mut self, templates: impl TemplateRenderer + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn config(&self) -> &PdfConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Resolve the options a document with `overrides` would print with
    pub fn render_options(&self, overrides: &OptionsOverride) -> Result<RenderOptions> {
        RenderOptions::merge(&self.config, overrides)
    }

    fn render_template(&self, template: Option<&TemplateRef>) -> Result<Option<String>> {
        template
            .map(|t| self.templates.render(&t.name, &t.data))
            .transpose()
    }

    /// Validate a request and build everything the browser needs
    pub fn prepare(&self, request: &DocumentRequest) -> Result<PreparedDocument> {
        let options = self.render_options(&request.options)?;
        let header = self.render_template(request.header.as_ref())?;
        let footer = self.render_template(request.footer.as_ref())?;
        let html = wrap_content(&request.html, &options.margins);
        let print = PrintOptions::assemble(&options, header, footer);
        Ok(PreparedDocument {
            html,
            options,
            print,
        })
    }

    /// Generate a PDF for `request`
    pub fn generate(&self, request: &DocumentRequest) -> Result<GeneratedDocument> {
        let prepared = self.prepare(request)?;

        // Removed when dropped, after the page guard below has closed the page
        let mut file = tempfile::Builder::new()
            .prefix("pdf_")
            .suffix(".html")
            .tempfile()?;
        file.write_all(prepared.html.as_bytes())?;
        file.flush()?;

        let url = Url::from_file_path(file.path()).map_err(|_| {
            Error::render(
                format!("Temp document {} has no file URL", file.path().display()),
                "path is not absolute",
            )
        })?;
        debug!("Wrote temp document {}", file.path().display());

        let page = PageGuard::open(&self.driver)?;
        self.driver.navigate(page.get(), url.as_str())?;
        let bytes = self.driver.print_to_pdf(page.get(), &prepared.print)?;
        drop(page);

        info!(
            "Generated PDF ({} bytes, {}x{}pt)",
            bytes.len(),
            prepared.print.paper.width,
            prepared.print.paper.height
        );
        Ok(GeneratedDocument::new(bytes))
    }

    /// Generate a PDF from a bare HTML body
    pub fn generate_html(&self, html: &str, overrides: &OptionsOverride) -> Result<GeneratedDocument> {
        self.generate(&DocumentRequest::new(html).with_options(overrides.clone()))
    }

    /// Render a named template into a request body. Headers and footers can
    /// be attached to the returned request before generating it.
    pub fn view_request(&self, name: &str, data: &Value) -> Result<DocumentRequest> {
        Ok(DocumentRequest::new(self.templates.render(name, data)?))
    }

    /// Generate a PDF whose body is the named template
    pub fn view(&self, name: &str, data: &Value, overrides: &OptionsOverride) -> Result<GeneratedDocument> {
        let request = self.view_request(name, data)?.with_options(overrides.clone());
        self.generate(&request)
    }

    /// Generate a PDF from a component template (`components.<name>`)
    pub fn component(&self, name: &str, data: &Value, overrides: &OptionsOverride) -> Result<GeneratedDocument> {
        self.view(&format!("{}{}", COMPONENT_PREFIX, name), data, overrides)
    }

    /// Shut down the browser connection
    pub fn close(&mut self) -> Result<()> {
        self.driver.close()
    }
}

#[cfg(feature = "cdp")]
impl PdfGenerator<crate::cdp::ChromeDriver> {
    /// Generator backed by headless Chrome, launched on first use
    pub fn chrome(config: PdfConfig) -> Result<Self> {
        let driver = crate::cdp::ChromeDriver::from_config(&config);
        Self::new(driver, config)
    }
}

/// Closes its page when dropped, on success and error paths alike
struct PageGuard<'a, D: BrowserDriver> {
    driver: &'a D,
    page: Option<D::Page>,
}

impl<'a, D: BrowserDriver> PageGuard<'a, D> {
    fn open(driver: &'a D) -> Result<Self> {
        let page = driver.open_page()?;
        Ok(Self {
            driver,
            page: Some(page),
        })
    }

    fn get(&self) -> &D::Page {
        match &self.page {
            Some(page) => page,
            None => unreachable!("page is only taken on drop"),
        }
    }
}

impl<D: BrowserDriver> Drop for PageGuard<'_, D> {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            if let Err(e) = self.driver.close_page(page) {
                warn!("Failed to close page: {}", e);
            }
        }
    }
}
