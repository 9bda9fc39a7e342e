//! Async-friendly generator handle (worker-thread backed)

use std::sync::mpsc::{self, Sender};
use std::thread;

use log::debug;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::driver::BrowserDriver;
use crate::generator::PdfGenerator;
use crate::{DocumentRequest, Error, GeneratedDocument, OptionsOverride, Result};

enum Command {
    Generate(DocumentRequest, oneshot::Sender<Result<GeneratedDocument>>),
    View(String, Value, OptionsOverride, oneshot::Sender<Result<GeneratedDocument>>),
    Close(oneshot::Sender<Result<()>>),
}

/// An async handle to a [`PdfGenerator`] running on a dedicated thread.
///
/// The worker owns the generator (and with it the browser connection) and
/// runs requests one at a time in arrival order, so async callers never block
/// their runtime on Chrome. Clones share the same worker.
#[derive(Clone)]
pub struct AsyncGenerator {
    cmd_tx: Sender<Command>,
}

impl AsyncGenerator {
    /// Move `generator` onto a new worker thread
    pub fn new<D>(generator: PdfGenerator<D>) -> Self
    where
        D: BrowserDriver + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut generator = generator;

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Generate(request, resp) => {
                        let _ = resp.send(generator.generate(&request));
                    }
                    Command::View(name, data, overrides, resp) => {
                        let _ = resp.send(generator.view(&name, &data, &overrides));
                    }
                    Command::Close(resp) => {
                        let _ = resp.send(generator.close());
                        break;
                    }
                }
            }
            debug!("PDF worker stopped");
        });

        Self { cmd_tx }
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| Error::render("PDF worker has shut down", "channel closed"))
    }

    /// Generate a PDF for `request`
    pub async fn generate(&self, request: DocumentRequest) -> Result<GeneratedDocument> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Generate(request, tx))?;
        rx.await
            .map_err(|e| Error::render("Generate canceled", e))?
    }

    /// Generate a PDF from a named template
    pub async fn view(&self, name: &str, data: Value, overrides: OptionsOverride) -> Result<GeneratedDocument> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::View(name.to_string(), data, overrides, tx))?;
        rx.await
            .map_err(|e| Error::render("View canceled", e))?
    }

    /// Stop the worker and close the browser
    pub async fn close(self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Close(tx))?;
        rx.await
            .map_err(|e| Error::render("Close canceled", e))?
    }
}
