//! RFox PDF
//!
//! Turns HTML and named templates into PDF files by printing them with a
//! headless Chrome instance over the Chrome DevTools Protocol.
//!
//! # Features
//!
//! - **CDP Backend** (`cdp`, default): headless Chrome via `headless_chrome`
//! - **Pluggable Driver**: the generator talks to the browser only through
//!   the [`BrowserDriver`] trait
//! - **Fail Fast**: page sizes, margins, and templates are validated before
//!   the browser is touched
//! - **HTTP Responses**: inline or attachment responses, and a small
//!   `tiny_http` server (`server`, default)
//!
//! # Example
//!
//! ```no_run
//! use rfpdf::{DocumentRequest, OptionsOverride, PdfConfig, PdfGenerator};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generator = PdfGenerator::chrome(PdfConfig::default())?;
//!
//! let request = DocumentRequest::new("<h1>Invoice</h1><p>Due today.</p>")
//!     .with_options(OptionsOverride::default().with_page("letter", "landscape"));
//! let pdf = generator.generate(&request)?;
//!
//! let response = pdf.download("invoice.pdf");
//! assert_eq!(response.header("Content-Type"), Some("application/pdf"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod page;
pub use page::{resolve, Orientation, PageFormat, PageSize};

pub mod options;
pub use options::{Margins, MarginsOverride, OptionsOverride, PdfConfig, RenderOptions, WindowSize};

pub mod template;
pub use template::{TemplateRef, TemplateRegistry, TemplateRenderer};

pub mod document;
pub use document::{wrap_content, DocumentRequest, GeneratedDocument};

pub mod driver;
pub use driver::{BrowserDriver, PrintOptions};

pub mod generator;
pub use generator::{PdfGenerator, PreparedDocument};

pub mod response;
pub use response::{Disposition, PdfResponse};

#[cfg(feature = "server")]
pub mod server;

// Async-friendly generator handle (worker-thread backed)
pub mod async_api;
pub use async_api::AsyncGenerator;

#[cfg(feature = "cdp")]
pub mod cdp;

#[cfg(feature = "cdp")]
pub use cdp::ChromeDriver;
