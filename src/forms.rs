// src/forms.rs
//
// Query-string and form-body decoding. The dashboard keeps all widget
// state in GET parameters, so repeated keys (multi-selects) must survive
// decoding in order.

use crate::errors::ServerError;
use std::io::Read;

/// Reject bodies larger than this before buffering them.
pub const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// Decoded key/value pairs from a query string or urlencoded body.
/// Repeated keys are kept, in order.
#[derive(Debug, Default, Clone)]
pub struct FormValues {
    values: Vec<(String, String)>,
}

impl FormValues {
    pub fn from_query(query: Option<&str>) -> Self {
        FormValues::from_urlencoded(query.unwrap_or("").as_bytes())
    }

    pub fn from_urlencoded(raw: &[u8]) -> Self {
        let values = url::form_urlencoded::parse(raw)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        FormValues { values }
    }

    /// First value for a key, if present.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for a key, in submission order.
    pub fn all(&self, key: &str) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.iter().any(|(k, _)| k == key)
    }
}

/// One file part of a multipart/form-data body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// File parts of a parsed multipart body. Plain fields are discarded
/// during parsing.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub fn file(&self, field: &str) -> Option<&UploadedFile> {
        self.files.iter().find(|f| f.field == field)
    }
}

/// Read a request body fully into memory, refusing oversized payloads.
pub fn read_body(mut body: astra::Body) -> Result<Vec<u8>, ServerError> {
    let mut buf = Vec::new();
    body.reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut buf)
        .map_err(|e| ServerError::BadRequest(format!("Could not read request body: {e}")))?;
    if buf.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("Request body too large".into()));
    }
    Ok(buf)
}

/// Boundary parameter of a multipart/form-data content type, or None when
/// the header says something else.
pub fn multipart_boundary(content_type: &str) -> Option<String> {
    let mime: mime::Mime = content_type.parse().ok()?;
    if mime.essence_str() == mime::MULTIPART_FORM_DATA.essence_str() {
        mime.get_param(mime::BOUNDARY)
            .map(|b| b.as_str().to_string())
    } else {
        None
    }
}

/// Parse a multipart/form-data body against its boundary.
///
/// Minimal parser: parts are delimited by `--boundary` lines, headers end
/// at a blank line, and only Content-Disposition is inspected. Parts with
/// a `filename` land in `files`; plain fields are skipped.
pub fn parse_multipart(body: &[u8], boundary: &str) -> Result<MultipartForm, ServerError> {
    let delim = format!("--{boundary}");
    let delim_bytes = delim.as_bytes();

    let mut files: Vec<UploadedFile> = Vec::new();

    let first = find_bytes(body, delim_bytes, 0)
        .ok_or_else(|| ServerError::BadRequest("Multipart body missing its boundary".into()))?;
    let mut pos = first + delim_bytes.len();

    loop {
        // "--boundary--" closes the body.
        if body[pos..].starts_with(b"--") {
            break;
        }
        if body[pos..].starts_with(b"\r\n") {
            pos += 2;
        }

        let headers_end = find_bytes(body, b"\r\n\r\n", pos)
            .ok_or_else(|| ServerError::BadRequest("Malformed multipart part headers".into()))?;
        let headers_text = String::from_utf8_lossy(&body[pos..headers_end]);
        let content_start = headers_end + 4;

        let next = find_bytes(body, delim_bytes, content_start)
            .ok_or_else(|| ServerError::BadRequest("Unterminated multipart part".into()))?;
        // The part content ends before the CRLF that precedes the boundary.
        let content_end = if next >= content_start + 2 {
            next - 2
        } else {
            content_start
        };

        let mut name = None;
        let mut file_name = None;
        for line in headers_text.split("\r\n") {
            if line.to_ascii_lowercase().starts_with("content-disposition:") {
                name = disposition_param(line, "name");
                file_name = disposition_param(line, "filename");
            }
        }

        let field = name
            .ok_or_else(|| ServerError::BadRequest("Multipart part without a field name".into()))?;
        if let Some(file_name) = file_name {
            files.push(UploadedFile {
                field,
                file_name,
                bytes: body[content_start..content_end].to_vec(),
            });
        }

        pos = next + delim_bytes.len();
    }

    Ok(MultipartForm { files })
}

/// `key="value"` (or bare `key=value`) out of a Content-Disposition line.
fn disposition_param(line: &str, key: &str) -> Option<String> {
    for piece in line.split(';') {
        let piece = piece.trim();
        if let Some(rest) = piece.strip_prefix(key) {
            if let Some(rest) = rest.trim_start().strip_prefix('=') {
                let rest = rest.trim();
                let value = rest
                    .strip_prefix('"')
                    .and_then(|r| r.strip_suffix('"'))
                    .unwrap_or(rest);
                return Some(value.to_string());
            }
        }
    }
    None
}

fn find_bytes(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from > haystack.len() || haystack.len() - from < needle.len() {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
