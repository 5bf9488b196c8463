//! A [`wireline::Transport`] backed by [`reqwest`].
//!
//! The adapter converts an assembled [`WireRequest`] into a `reqwest`
//! request, executes it on the shared client, and collects status, headers
//! and body into a [`WireResponse`]. Everything below the wire format —
//! pooling, TLS, proxies, redirects — is `reqwest`'s business, configured
//! through the [`reqwest::Client`] handed to [`ReqwestTransport`].

#![deny(missing_docs)]

use std::fmt;

use futures::future::BoxFuture;
use wireline::{Error, StatusCode, Transport, WireRequest, WireResponse};

/// A transport executing requests through a shared [`reqwest::Client`].
///
/// Cloning is cheap and clones share the underlying connection pool, so
/// one transport can serve any number of loader entities.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport over an already-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f)
    }
}

fn convert_request(
    client: &reqwest::Client,
    request: WireRequest,
) -> wireline::Result<reqwest::RequestBuilder> {
    let method =
        reqwest::Method::from_bytes(request.verb.as_bytes()).map_err(|_| Error::InvalidRequest)?;
    let mut builder = client.request(method, request.url);
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    if let Some(body) = request.body {
        builder = builder.body(body);
    }
    Ok(builder)
}

impl Transport for ReqwestTransport {
    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReqwestTransport")
    }

    fn send(&self, request: WireRequest) -> BoxFuture<'_, wireline::Result<WireResponse>> {
        Box::pin(async move {
            let builder = convert_request(&self.client, request)?;
            let response = builder.send().await.map_err(Error::transport)?;

            let status = StatusCode::new(response.status().as_u16());
            // Values that are not valid UTF-8 are dropped; nothing in the
            // core reads raw header bytes.
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|err| {
                    log::warn!("response body collection failed: {err}");
                    Error::UnexpectedResponse
                })?
                .to_vec();
            Ok(WireResponse {
                status,
                headers,
                body,
            })
        })
    }
}
