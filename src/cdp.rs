//! Chrome DevTools Protocol driver (uses the `headless_chrome` crate)

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use headless_chrome::browser::tab::Tab;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, info, warn};

use crate::driver::{BrowserDriver, PrintOptions};
use crate::options::{PdfConfig, WindowSize};
use crate::{Error, Result};

/// Chrome fills a missing header/footer template with the date and title;
/// an empty element keeps the margin area blank instead.
const BLANK_TEMPLATE: &str = "<span></span>";

/// Settings used when the browser is (re)launched
#[derive(Debug, Clone)]
pub struct LaunchSettings {
    pub window_size: WindowSize,
    /// Chrome binary; `None` auto-detects
    pub chrome_path: Option<PathBuf>,
    /// How long the browser may sit idle before `headless_chrome` drops it
    pub idle_timeout: Duration,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        LaunchSettings::from(&PdfConfig::default())
    }
}

impl From<&PdfConfig> for LaunchSettings {
    fn from(config: &PdfConfig) -> Self {
        Self {
            window_size: config.window_size,
            chrome_path: config.chrome_path.clone(),
            idle_timeout: Duration::from_secs(config.idle_timeout_secs),
        }
    }
}

/// A lazily launched handle that is reused until it stops working
struct Cached<B> {
    slot: Mutex<Option<B>>,
}

impl<B: Clone> Cached<B> {
    fn empty() -> Self {
        Self { slot: Mutex::new(None) }
    }

    fn lock(&self) -> MutexGuard<'_, Option<B>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_some(&self) -> bool {
        self.lock().is_some()
    }

    fn take(&self) -> Option<B> {
        self.lock().take()
    }

    /// The cached handle (and `true`), or a freshly launched one
    fn get_or_launch(&self, launch: impl FnOnce() -> Result<B>) -> Result<(B, bool)> {
        let mut slot = self.lock();
        if let Some(handle) = slot.as_ref() {
            return Ok((handle.clone(), true));
        }
        let handle = launch()?;
        *slot = Some(handle.clone());
        Ok((handle, false))
    }

    /// Run `op` against the handle. A reused handle may have been dropped
    /// while idle, so a failure on it relaunches and retries once. Any
    /// final failure empties the cache.
    fn run<T>(
        &self,
        context: &str,
        launch: impl Fn() -> Result<B>,
        op: impl Fn(&B) -> anyhow::Result<T>,
    ) -> Result<T> {
        let (handle, reused) = self.get_or_launch(&launch)?;
        let err = match op(&handle) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        self.take();
        if !reused {
            warn!("{}, dropping browser connection: {}", context, err);
            return Err(Error::render(context, err));
        }

        warn!("{} on reused browser, relaunching: {}", context, err);
        let (handle, _) = self.get_or_launch(&launch)?;
        op(&handle).map_err(|e| {
            warn!("{} after relaunch, dropping browser connection: {}", context, e);
            self.take();
            Error::render(context, e)
        })
    }
}

/// Headless Chrome driver holding one persistent browser process
///
/// The browser is launched on the first page request and reused for every
/// document after that. If a reused browser cannot open a page (for example
/// after `headless_chrome` dropped it for idling) it is relaunched once
/// within the same request.
pub struct ChromeDriver {
    settings: LaunchSettings,
    browser: Cached<Browser>,
}

impl ChromeDriver {
    pub fn new(settings: LaunchSettings) -> Self {
        Self {
            settings,
            browser: Cached::empty(),
        }
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self::new(LaunchSettings::from(config))
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }

    fn launch(&self) -> Result<Browser> {
        let WindowSize { width, height } = self.settings.window_size;

        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .window_size(Some((width, height)))
            .path(self.settings.chrome_path.clone())
            .ignore_certificate_errors(true)
            .idle_browser_timeout(self.settings.idle_timeout)
            .build()
            .map_err(|e| Error::render("Failed to build launch options", e.to_string()))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::render("Failed to launch browser", e))?;
        info!(
            "Launched headless Chrome ({}x{}, path: {})",
            width,
            height,
            self.settings
                .chrome_path
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "auto".to_string())
        );
        Ok(browser)
    }
}

impl BrowserDriver for ChromeDriver {
    type Page = Arc<Tab>;

    fn open_page(&self) -> Result<Arc<Tab>> {
        self.browser
            .run("Failed to create tab", || self.launch(), |browser| browser.new_tab())
    }

    fn navigate(&self, page: &Arc<Tab>, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        page.navigate_to(url)
            .map_err(|e| Error::render(format!("Navigation to {} failed", url), e))?;
        page.wait_until_navigated()
            .map_err(|e| Error::render("Wait for navigation failed", e))?;
        Ok(())
    }

    fn print_to_pdf(&self, page: &Arc<Tab>, options: &PrintOptions) -> Result<Vec<u8>> {
        let (top, right, bottom, left) = options.margins_inches();
        let blank = || Some(BLANK_TEMPLATE.to_string());

        let pdf_options = PrintToPdfOptions {
            // orientation is already folded into the paper size
            landscape: Some(false),
            display_header_footer: Some(options.display_header_footer),
            print_background: Some(options.print_background),
            scale: Some(options.scale),
            paper_width: Some(options.paper.width_inches()),
            paper_height: Some(options.paper.height_inches()),
            margin_top: Some(top),
            margin_right: Some(right),
            margin_bottom: Some(bottom),
            margin_left: Some(left),
            header_template: options.header_template.clone().or_else(blank),
            footer_template: options.footer_template.clone().or_else(blank),
            prefer_css_page_size: Some(options.prefer_css_page_size),
            ..Default::default()
        };

        let bytes = page
            .print_to_pdf(Some(pdf_options))
            .map_err(|e| Error::render("Print to PDF failed", e))?;
        debug!("Printed {} bytes", bytes.len());
        Ok(bytes)
    }

    fn close_page(&self, page: Arc<Tab>) -> Result<()> {
        page.close(true)
            .map_err(|e| Error::render("Failed to close tab", e))?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.browser.is_some()
    }

    fn close(&mut self) -> Result<()> {
        // Dropping the last handle terminates the child process
        if self.browser.take().is_some() {
            info!("Closed headless Chrome");
        }
        Ok(())
    }
}

impl Drop for ChromeDriver {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
