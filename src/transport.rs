//! The transport seam: wire-level request/response values and the trait a
//! backing HTTP stack implements.
//!
//! The core never talks to the network itself. It assembles a
//! [`WireRequest`], hands it to a [`Transport`], and interprets the
//! returned [`WireResponse`]. Connection pooling, TLS and friends are the
//! transport's concern.

use std::fmt;

use futures::future::BoxFuture;
use url::Url;

use crate::status::StatusCode;
use crate::Result;

/// A transport-ready request.
#[derive(Debug, Clone)]
pub struct WireRequest {
    /// The fully resolved URL, query string included.
    pub url: Url,
    /// The HTTP verb.
    pub verb: &'static str,
    /// Header names and values, one entry per name.
    pub headers: Vec<(String, String)>,
    /// Body bytes, if the descriptor produced any.
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    pub(crate) fn new(url: Url, verb: &'static str) -> Self {
        Self {
            url,
            verb,
            headers: Vec::new(),
            body: None,
        }
    }

    /// Sets a header, replacing any previous value for the same
    /// case-insensitive name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response as delivered by a transport.
#[derive(Debug, Clone)]
pub struct WireResponse {
    /// The response status.
    pub status: StatusCode,
    /// Response header names and values.
    pub headers: Vec<(String, String)>,
    /// The collected response body.
    pub body: Vec<u8>,
}

impl WireResponse {
    /// Looks up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP stack capable of executing one assembled request.
///
/// Implementations are shared across many loader entities; they must be
/// thread-safe. A single `send` call performs the whole exchange and
/// resolves once the body has been collected. Cancellation happens by
/// dropping the returned future, which the loader does when a load is
/// canceled, so implementations should tie any underlying work to the
/// future's lifetime.
pub trait Transport: Send + Sync + 'static {
    /// A textual description of this transport.
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transport")
    }

    /// Executes `request` and collects the response.
    fn send(&self, request: WireRequest) -> BoxFuture<'_, Result<WireResponse>>;
}
