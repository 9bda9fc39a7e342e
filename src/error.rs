//! Error types for PDF generation

use thiserror::Error;

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed cause carried by [`Error::RenderFailure`]
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while generating a PDF
#[derive(Error, Debug)]
pub enum Error {
    /// An option value was rejected while resolving the render options.
    /// Raised before any browser interaction.
    #[error("Invalid configuration: {field} = {value:?}")]
    InvalidConfiguration { field: String, value: String },

    /// The browser failed to connect, navigate, or print
    #[error("Rendering failed: {context}")]
    RenderFailure {
        context: String,
        #[source]
        source: BoxedCause,
    },

    /// A header, footer, or body template could not be rendered
    #[error("Template '{template}' failed to render: {reason}")]
    TemplateRenderFailure { template: String, reason: String },

    /// Filesystem error (temp documents, config files, views)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid(field: impl Into<String>, value: impl ToString) -> Self {
        Error::InvalidConfiguration {
            field: field.into(),
            value: value.to_string(),
        }
    }

    pub(crate) fn render(context: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Error::RenderFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    pub(crate) fn template(template: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::TemplateRenderFailure {
            template: template.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error was raised while validating options
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Error::InvalidConfiguration { .. })
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        let context = err.to_string();
        Error::RenderFailure {
            context,
            source: err.into(),
        }
    }
}
