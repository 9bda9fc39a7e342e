//! Packaging generated PDFs as HTTP responses
//!
//! [`PdfResponse`] is framework-neutral: a status, a header list, and the
//! body. With the `server` feature it converts into a `tiny_http` response.

use std::fmt;

use crate::document::GeneratedDocument;
#[cfg(feature = "server")]
use log::warn;

/// Filename used when the caller does not pick one
pub const DEFAULT_FILENAME: &str = "document.pdf";

/// How a browser should treat the PDF
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Display in the browser
    Inline,
    /// Force a download
    Attachment,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Disposition::Inline => f.write_str("inline"),
            Disposition::Attachment => f.write_str("attachment"),
        }
    }
}

/// An HTTP response carrying a PDF
#[derive(Debug, Clone, PartialEq)]
pub struct PdfResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl PdfResponse {
    pub fn new(bytes: Vec<u8>, disposition: Disposition, filename: &str) -> Self {
        let filename = if filename.is_empty() { DEFAULT_FILENAME } else { filename };
        Self {
            status: 200,
            headers: vec![
                ("Content-Type".to_string(), "application/pdf".to_string()),
                ("Content-Disposition".to_string(), content_disposition(disposition, filename)),
            ],
            body: bytes,
        }
    }

    /// Response for in-browser viewing
    pub fn inline(bytes: Vec<u8>, filename: &str) -> Self {
        Self::new(bytes, Disposition::Inline, filename)
    }

    /// Response that forces a download
    pub fn download(bytes: Vec<u8>, filename: &str) -> Self {
        Self::new(bytes, Disposition::Attachment, filename)
    }

    /// First header value with the given (case-insensitive) name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Header values must stay ASCII, so a non-ASCII filename gets an
/// underscored `filename` fallback plus an RFC 5987 `filename*` parameter.
fn content_disposition(disposition: Disposition, filename: &str) -> String {
    let fallback = quote(filename);
    if filename.is_ascii() {
        return format!("{}; filename=\"{}\"", disposition, fallback);
    }
    format!(
        "{}; filename=\"{}\"; filename*=UTF-8''{}",
        disposition,
        fallback,
        ext_value(filename)
    )
}

fn quote(filename: &str) -> String {
    let mut out = String::with_capacity(filename.len());
    for c in filename.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\r' | '\n' => {}
            c if !c.is_ascii() => out.push('_'),
            _ => out.push(c),
        }
    }
    out
}

// form_urlencoded leaves `*` alone and writes spaces as `+`; neither is an
// RFC 5987 attr-char. A literal `+` is already escaped as `%2B`.
fn ext_value(filename: &str) -> String {
    let filename: String = filename.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();
    url::form_urlencoded::byte_serialize(filename.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
        .replace('*', "%2A")
}

impl GeneratedDocument {
    /// Wrap the document in an inline response
    pub fn inline(self, filename: &str) -> PdfResponse {
        PdfResponse::inline(self.into_bytes(), filename)
    }

    /// Wrap the document in an attachment response
    pub fn download(self, filename: &str) -> PdfResponse {
        PdfResponse::download(self.into_bytes(), filename)
    }
}

#[cfg(feature = "server")]
impl From<PdfResponse> for tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    fn from(resp: PdfResponse) -> Self {
        let mut out = tiny_http::Response::from_data(resp.body).with_status_code(resp.status);
        for (name, value) in &resp.headers {
            match tiny_http::Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                Ok(header) => out.add_header(header),
                Err(_) => warn!("Dropping invalid response header {}: {:?}", name, value),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_response_headers() {
        let resp = PdfResponse::inline(b"%PDF-".to_vec(), "report.pdf");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.header("content-type"), Some("application/pdf"));
        assert_eq!(resp.header("Content-Disposition"), Some("inline; filename=\"report.pdf\""));
        assert_eq!(resp.body, b"%PDF-");
    }

    #[test]
    fn download_response_is_an_attachment() {
        let resp = GeneratedDocument::new(b"%PDF-".to_vec()).download("");
        assert_eq!(
            resp.header("Content-Disposition"),
            Some("attachment; filename=\"document.pdf\"")
        );
    }

    #[test]
    fn filenames_are_escaped() {
        let resp = PdfResponse::download(Vec::new(), "a\"b\\c\r\n.pdf");
        assert_eq!(
            resp.header("Content-Disposition"),
            Some("attachment; filename=\"a\\\"b\\\\c.pdf\"")
        );
    }

    #[test]
    fn non_ascii_filenames_get_an_extended_parameter() {
        let resp = PdfResponse::download(Vec::new(), "résumé 2024*.pdf");
        let value = resp.header("Content-Disposition").unwrap();
        assert!(value.is_ascii());
        assert_eq!(
            value,
            "attachment; filename=\"r_sum_ 2024*.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9%202024%2A.pdf"
        );
    }
}
