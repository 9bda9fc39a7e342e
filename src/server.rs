//! `POST /pdf` over `tiny_http`
//!
//! The request body is the HTML fragment. Query parameters `size` and
//! `orientation` override the page, and `download=<name>` switches the
//! response to an attachment.

use std::io::{Cursor, Read};

use log::{debug, warn};
use tiny_http::{Method, Request, Response, Server};

use crate::driver::BrowserDriver;
use crate::generator::PdfGenerator;
use crate::options::OptionsOverride;
use crate::response::DEFAULT_FILENAME;

type Reply = Response<Cursor<Vec<u8>>>;

fn text(status: u16, body: impl Into<String>) -> Reply {
    Response::from_string(body).with_status_code(status)
}

/// Answer every request from `server` until it stops accepting
pub fn serve<D: BrowserDriver>(generator: &PdfGenerator<D>, server: &Server) {
    for request in server.incoming_requests() {
        handle(generator, request);
    }
}

/// Answer one request; failures turn into error responses, never panics
pub fn handle<D: BrowserDriver>(generator: &PdfGenerator<D>, mut request: Request) {
    debug!("{} {}", request.method(), request.url());
    let reply = route(generator, &mut request);
    if let Err(e) = request.respond(reply) {
        warn!("Failed to send response: {}", e);
    }
}

fn route<D: BrowserDriver>(generator: &PdfGenerator<D>, request: &mut Request) -> Reply {
    let url = match url::Url::parse(&format!("http://localhost{}", request.url())) {
        Ok(url) => url,
        Err(e) => {
            warn!("Rejecting request target {:?}: {}", request.url(), e);
            return text(400, format!("Bad request target: {}", e));
        }
    };
    if request.method() != &Method::Post || url.path() != "/pdf" {
        return text(404, "Not Found");
    }

    let mut html = String::new();
    if let Err(e) = request.as_reader().read_to_string(&mut html) {
        return text(400, e.to_string());
    }

    let mut overrides = OptionsOverride::default();
    let mut download = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "size" => overrides.page.size = Some(value.into_owned()),
            "orientation" => overrides.page.orientation = Some(value.into_owned()),
            "download" => download = Some(value.into_owned()),
            _ => {}
        }
    }

    match generator.generate_html(&html, &overrides) {
        Ok(pdf) => match download {
            Some(name) => pdf.download(&name).into(),
            None => pdf.inline(DEFAULT_FILENAME).into(),
        },
        Err(e) => {
            let status = if e.is_invalid_configuration() { 400 } else { 500 };
            warn!("PDF request failed: {}", e);
            text(status, e.to_string())
        }
    }
}
