//! The browser seam: everything the generator needs from a headless browser
//!
//! A driver owns one persistent browser connection. It connects on the first
//! [`BrowserDriver::open_page`] call and keeps the connection for every later
//! document until [`BrowserDriver::close`] (or drop). Each document gets its
//! own page so per-document state never leaks between calls.

use crate::options::{Margins, RenderOptions};
use crate::page::PageFormat;
use crate::Result;

/// CSS pixels per inch, used to convert margins for the print call
pub const CSS_PX_PER_INCH: f64 = 96.0;

/// Parameters of one print-to-PDF call
#[derive(Debug, Clone, PartialEq)]
pub struct PrintOptions {
    /// Paper size in points
    pub paper: PageFormat,
    /// Margins in CSS pixels
    pub margins: Margins,
    pub scale: f64,
    pub print_background: bool,
    pub prefer_css_page_size: bool,
    pub display_header_footer: bool,
    /// Rendered header HTML, passed to the browser verbatim
    pub header_template: Option<String>,
    /// Rendered footer HTML, passed to the browser verbatim
    pub footer_template: Option<String>,
}

impl PrintOptions {
    /// Assemble print options from resolved render options and the rendered
    /// header/footer templates.
    pub fn assemble(
        options: &RenderOptions,
        header_template: Option<String>,
        footer_template: Option<String>,
    ) -> Self {
        Self {
            paper: options.format,
            margins: options.margins,
            scale: options.scale,
            print_background: options.print_background,
            prefer_css_page_size: options.prefer_css_page_size,
            display_header_footer: options.display_header_footer,
            header_template,
            footer_template,
        }
    }

    /// Margins as (top, right, bottom, left) in inches
    pub fn margins_inches(&self) -> (f64, f64, f64, f64) {
        let m = &self.margins;
        (
            m.top / CSS_PX_PER_INCH,
            m.right / CSS_PX_PER_INCH,
            m.bottom / CSS_PX_PER_INCH,
            m.left / CSS_PX_PER_INCH,
        )
    }
}

/// A headless browser able to print local documents to PDF
pub trait BrowserDriver: Send {
    /// Handle to one open page
    type Page;

    /// Open a fresh page, connecting to the browser first if needed
    fn open_page(&self) -> Result<Self::Page>;

    /// Navigate `page` to `url` and wait until navigation completes
    fn navigate(&self, page: &Self::Page, url: &str) -> Result<()>;

    /// Print the current contents of `page`
    fn print_to_pdf(&self, page: &Self::Page, options: &PrintOptions) -> Result<Vec<u8>>;

    /// Close a page previously returned by `open_page`
    fn close_page(&self, page: Self::Page) -> Result<()>;

    /// Whether a browser connection is currently held
    fn is_connected(&self) -> bool;

    /// Tear down the browser connection. Later calls may reconnect.
    fn close(&mut self) -> Result<()>;
}
