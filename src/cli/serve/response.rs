//! HTTP response helpers.

use crate::utils::mime::types::PLAIN;
use anyhow::{Context, Result, anyhow};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a generated document.
pub fn respond_document(request: Request, content_type: &'static str, body: String) -> Result<()> {
    send_body(request, 200, content_type, body.into_bytes())
}

/// Respond with a file from disk.
pub fn respond_file(request: Request, path: &Path) -> Result<()> {
    let content_type = crate::utils::mime::from_path(path);
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    send_body(request, 200, content_type, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    send_body(request, 404, PLAIN, b"404 Not Found".to_vec())
}

/// 500 with the full error chain as plain text.
pub fn respond_error(request: Request, error: &anyhow::Error) -> Result<()> {
    let body = format!("500 Internal Server Error\n\n{error:#}\n");
    send_body(request, 500, PLAIN, body.into_bytes())
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, PLAIN, b"503 Service Unavailable".to_vec())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

/// Send `body`, or only the headers for `HEAD`.
fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
) -> Result<()> {
    let header = make_header("Content-Type", content_type)?;
    if is_head_request(&request) {
        let response = Response::empty(StatusCode(status)).with_header(header);
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_header() {
        let header = make_header("Content-Type", PLAIN).unwrap();
        assert_eq!(header.value.as_str(), PLAIN);
        assert!(make_header("X-ключ", PLAIN).is_err());
    }
}
