//! Streamed file responses.

use std::fmt;
use std::pin::Pin;

use axum::body::Body;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;

use crate::error::DispatchError;

/// Content type sent when a file response does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// What a file endpoint's service logic returns.
pub struct FileResponse {
    pub filename: String,
    /// Empty means [`DEFAULT_CONTENT_TYPE`].
    pub content_type: String,
    /// Sent as `Content-Length` when positive.
    pub content_length: u64,
    pub data: Pin<Box<dyn AsyncRead + Send + 'static>>,
}

impl FileResponse {
    pub fn new(filename: impl Into<String>, data: impl AsyncRead + Send + 'static) -> Self {
        Self {
            filename: filename.into(),
            content_type: String::new(),
            content_length: 0,
            data: Box::pin(data),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn with_content_length(mut self, content_length: u64) -> Self {
        self.content_length = content_length;
        self
    }

    fn headers(&self) -> Result<HeaderMap, DispatchError> {
        let invalid = |e: axum::http::header::InvalidHeaderValue| DispatchError::Encode(e.to_string());
        let content_type = if self.content_type.is_empty() {
            DEFAULT_CONTENT_TYPE
        } else {
            self.content_type.as_str()
        };

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).map_err(invalid)?);
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!("attachment; filename={}", quote_ascii(&self.filename)))
                .map_err(invalid)?,
        );
        if self.content_length > 0 {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(self.content_length));
        }
        Ok(headers)
    }

    /// Turn into a streaming response. Read failures after the headers are
    /// sent go to `on_stream_error` and end the body.
    pub(crate) fn into_streaming_response<F>(self, mut on_stream_error: F) -> Result<Response, DispatchError>
    where
        F: FnMut(DispatchError) + Send + 'static,
    {
        let headers = self.headers()?;
        let stream = ReaderStream::new(self.data)
            .inspect_err(move |e| on_stream_error(DispatchError::Stream(e.to_string())));
        Ok((StatusCode::OK, headers, Body::from_stream(stream)).into_response())
    }
}

impl fmt::Debug for FileResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileResponse")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Quote `s` as a double-quoted string of printable ASCII, escaping
/// everything else Go-style (`\n`, `\x7f`, `\u00e9`, `\U0001f600`).
pub fn quote_ascii(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0b}' => out.push_str("\\v"),
            ' '..='~' => out.push(c),
            c if (c as u32) < 0x80 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c if (c as u32) < 0x10000 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push_str(&format!("\\U{:08x}", c as u32)),
        }
    }
    out.push('"');
    out
}

/// Inverse of [`quote_ascii`]. Returns `None` for malformed input.
pub fn unquote_ascii(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next()? {
            '"' => '"',
            '\\' => '\\',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0b}',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        out.push(escaped);
    }
    Some(out)
}

fn hex_char(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_like_go() {
        assert_eq!(quote_ascii("photo.jpg"), "\"photo.jpg\"");
        assert_eq!(quote_ascii("say \"hi\".txt"), "\"say \\\"hi\\\".txt\"");
        assert_eq!(quote_ascii("a\tb\nc"), "\"a\\tb\\nc\"");
        assert_eq!(quote_ascii("café.txt"), "\"caf\\u00e9.txt\"");
        assert_eq!(quote_ascii("\u{7f}"), "\"\\x7f\"");
        assert_eq!(quote_ascii("😀"), "\"\\U0001f600\"");
    }

    #[test]
    fn unquote_reverses_quote() {
        for name in ["plain.bin", "with \"quotes\"", "tab\there", "naïve résumé.pdf", "😀.png", ""] {
            assert_eq!(unquote_ascii(&quote_ascii(name)).as_deref(), Some(name));
        }
        assert_eq!(unquote_ascii("no-quotes"), None);
        assert_eq!(unquote_ascii("\"bad \\q\""), None);
        assert_eq!(unquote_ascii("\"short \\u00\""), None);
    }

    #[test]
    fn headers_default_content_type() {
        let file = FileResponse::new("a.txt", tokio::io::empty());
        let headers = file.headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], DEFAULT_CONTENT_TYPE);
        assert_eq!(headers[CONTENT_DISPOSITION], "attachment; filename=\"a.txt\"");
        assert!(headers.get(CONTENT_LENGTH).is_none());
    }

    #[test]
    fn headers_with_type_and_length() {
        let file = FileResponse::new("a.png", tokio::io::empty())
            .with_content_type("image/png")
            .with_content_length(42);
        let headers = file.headers().unwrap();
        assert_eq!(headers[CONTENT_TYPE], "image/png");
        assert_eq!(headers[CONTENT_LENGTH], "42");
    }

    #[test]
    fn invalid_content_type_is_an_encode_error() {
        let file = FileResponse::new("a", tokio::io::empty()).with_content_type("bad\nvalue");
        assert!(matches!(file.headers(), Err(DispatchError::Encode(_))));
    }
}
