//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate encodes descriptors into `HttpRequest` values and hands them to a
//! `Transport`; whatever executes the call reports back an `HttpResponse`.
//! Nothing in here touches the network.
//!
//! All fields use owned types (`String`, `Vec`) so values can move across
//! threads and into `spawn_blocking` without lifetime concerns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Content type sent with the token endpoints.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

/// Content type sent with every control endpoint.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a descriptor's parameters travel in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyEncoding {
    /// No body at all.
    None,
    /// `application/x-www-form-urlencoded`, scalar values only.
    Form,
    /// `application/json`.
    Json,
}

impl BodyEncoding {
    /// The `Content-Type` header value announcing this encoding.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            BodyEncoding::None => None,
            BodyEncoding::Form => Some(FORM_CONTENT_TYPE),
            BodyEncoding::Json => Some(JSON_CONTENT_TYPE),
        }
    }
}

/// An HTTP request described as plain data.
///
/// Produced by `RequestDescriptor::to_request`. The transport is responsible
/// for executing it and returning the corresponding `HttpResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// The body is kept as raw bytes; the core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
