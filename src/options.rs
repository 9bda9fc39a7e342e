//! Process-wide defaults, per-call overrides, and the merge between them
//!
//! [`PdfConfig`] holds the defaults a generator is created with (usually
//! loaded once from a JSON config file). Each generation call may carry an
//! [`OptionsOverride`] whose set fields win over the defaults. Merging the
//! two produces an immutable [`RenderOptions`] value, or fails as a whole
//! with [`Error::InvalidConfiguration`].
//!
//! # Examples
//!
//! ```
//! use rfpdf::{OptionsOverride, PdfConfig, RenderOptions};
//!
//! let config = PdfConfig::default();
//! let overrides = OptionsOverride::default().with_page("legal", "landscape");
//! let options = RenderOptions::merge(&config, &overrides).unwrap();
//! assert_eq!(options.format.width, 1008.0);
//! assert_eq!(options.margins.top, 10.0);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::page::{self, PageFormat};
use crate::{Error, Result};

/// Browser window dimensions used when launching Chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl From<[u32; 2]> for WindowSize {
    fn from([width, height]: [u32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<WindowSize> for [u32; 2] {
    fn from(w: WindowSize) -> Self {
        [w.width, w.height]
    }
}

/// Page margins in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Same margin on every side
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    fn validate(&self) -> Result<()> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(format!("margins.{}", side), value));
            }
        }
        Ok(())
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(10.0)
    }
}

/// Default page size and orientation keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSettings {
    pub size: String,
    pub orientation: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            size: "a4".to_string(),
            orientation: "portrait".to_string(),
        }
    }
}

/// Process-wide generator configuration
///
/// Field names serialize in camelCase so a config file reads like:
///
/// ```json
/// { "page": { "size": "letter" }, "margins": { "top": 20 }, "chromePath": null }
/// ```
///
/// Missing keys fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfConfig {
    /// Default page size and orientation
    pub page: PageSettings,
    /// Browser window size
    pub window_size: WindowSize,
    /// Default page margins
    pub margins: Margins,
    /// Print scale factor
    pub scale: f64,
    /// Whether background graphics are printed
    pub print_background: bool,
    /// Whether a CSS `@page size` wins over the configured paper size
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: bool,
    /// Whether header/footer templates are printed
    pub display_header_footer: bool,
    /// Chrome binary; `None` lets the driver auto-detect it
    pub chrome_path: Option<PathBuf>,
    /// How long an idle persistent browser is kept alive, in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page: PageSettings::default(),
            window_size: WindowSize::default(),
            margins: Margins::default(),
            scale: 1.0,
            print_background: true,
            prefer_css_page_size: true,
            display_header_footer: true,
            chrome_path: None,
            idle_timeout_secs: 3600,
        }
    }
}

impl PdfConfig {
    /// Parse a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    /// Render options for a call without overrides
    pub fn resolve(&self) -> Result<RenderOptions> {
        RenderOptions::merge(self, &OptionsOverride::default())
    }
}

/// Per-side margin overrides; unset sides keep the default
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarginsOverride {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl MarginsOverride {
    fn apply(&self, base: Margins) -> Margins {
        Margins {
            top: self.top.unwrap_or(base.top),
            right: self.right.unwrap_or(base.right),
            bottom: self.bottom.unwrap_or(base.bottom),
            left: self.left.unwrap_or(base.left),
        }
    }
}

impl From<Margins> for MarginsOverride {
    fn from(m: Margins) -> Self {
        Self {
            top: Some(m.top),
            right: Some(m.right),
            bottom: Some(m.bottom),
            left: Some(m.left),
        }
    }
}

/// Page size/orientation overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageOverride {
    pub size: Option<String>,
    pub orientation: Option<String>,
}

/// A partial set of options supplied with a single generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionsOverride {
    pub page: PageOverride,
    pub window_size: Option<WindowSize>,
    pub margins: MarginsOverride,
    pub scale: Option<f64>,
    pub print_background: Option<bool>,
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: Option<bool>,
    pub display_header_footer: Option<bool>,
}

impl OptionsOverride {
    /// Parse overrides from a JSON object
    ///
    /// Per-call overrides are caller input, so a value of the wrong shape is
    /// an [`Error::InvalidConfiguration`] on field `overrides`, not a config
    /// file parse error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid("overrides", e))
    }

    pub fn with_page(mut self, size: impl Into<String>, orientation: impl Into<String>) -> Self {
        self.page.size = Some(size.into());
        self.page.orientation = Some(orientation.into());
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.page.size = Some(size.into());
        self
    }

    pub fn with_orientation(mut self, orientation: impl Into<String>) -> Self {
        self.page.orientation = Some(orientation.into());
        self
    }

    pub fn with_margins(mut self, margins: impl Into<MarginsOverride>) -> Self {
        self.margins = margins.into();
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn with_display_header_footer(mut self, display: bool) -> Self {
        self.display_header_footer = Some(display);
        self
    }
}

/// Fully resolved options for one document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub window_size: WindowSize,
    pub margins: Margins,
    pub scale: f64,
    pub print_background: bool,
    pub prefer_css_page_size: bool,
    pub display_header_footer: bool,
    /// Resolved paper size in points
    pub format: PageFormat,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            window_size: WindowSize::default(),
            margins: Margins::default(),
            scale: 1.0,
            print_background: true,
            prefer_css_page_size: true,
            display_header_footer: true,
            format: PageFormat::default(),
        }
    }
}

impl RenderOptions {
    /// Merge `overrides` onto `config`.
    ///
    /// Top-level fields are replaced when set; margins merge per side. The
    /// page format is resolved from the overriding size/orientation when
    /// given, otherwise from the configured defaults. Every resulting value
    /// is validated before anything is returned.
    pub fn merge(config: &PdfConfig, overrides: &OptionsOverride) -> Result<Self> {
        let size = overrides.page.size.as_deref().unwrap_or(&config.page.size);
        let orientation = overrides
            .page
            .orientation
            .as_deref()
            .unwrap_or(&config.page.orientation);
        let format = page::resolve(size, orientation)?;

        let margins = overrides.margins.apply(config.margins);
        margins.validate()?;

        let scale = overrides.scale.unwrap_or(config.scale);
        if !scale.is_finite() || scale <= 0.0 {
            return Err(Error::invalid("scale", scale));
        }

        let window_size = overrides.window_size.unwrap_or(config.window_size);
        if window_size.width == 0 || window_size.height == 0 {
            return Err(Error::invalid(
                "windowSize",
                format!("{}x{}", window_size.width, window_size.height),
            ));
        }

        Ok(Self {
            window_size,
            margins,
            scale,
            print_background: overrides.print_background.unwrap_or(config.print_background),
            prefer_css_page_size: overrides
                .prefer_css_page_size
                .unwrap_or(config.prefer_css_page_size),
            display_header_footer: overrides
                .display_header_footer
                .unwrap_or(config.display_header_footer),
            format,
        })
    }
}
