//! A request-building and load-guarding layer for typed API clients.
//!
//! ## Overview
//!
//! Wireline sits between a typed API client and an HTTP stack. It turns a
//! declarative [`RequestDescriptor`] — path, method, headers, typed
//! parameter bags, file attachments — into a transport-ready
//! [`WireRequest`], executes it through a pluggable [`Transport`], decodes
//! the JSON response, and guards every logical endpoint with an in-flight
//! flag so redundant concurrent loads never reach the wire. It is a
//! convenience layer, not a network stack: pooling, TLS, proxies and
//! caching all belong to the transport.
//!
//! The pieces, from the bottom up:
//!
//! - [`ParamBag`] captures any `serde::Serialize` value once as a JSON
//!   tree; JSON bodies and percent-encoded query strings both derive from
//!   that single tree.
//! - [`RequestDescriptor`] is an immutable description of one call,
//!   reusable across loads.
//! - [`assemble`] compiles a descriptor into a [`WireRequest`], picking
//!   the body encoding (JSON, form-urlencoded, multipart) and generating a
//!   fresh [`Boundary`] per multipart body.
//! - [`Loader`] owns the per-endpoint load state: one in-flight call at a
//!   time, silent de-duplication, cancellation, status checking and
//!   response decoding.
//! - [`PagedLoader`] adds "load more" semantics on top, remembering when a
//!   collection has been fetched to its end.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use serde::Deserialize;
//! use wireline::{Loader, RequestDescriptor};
//!
//! #[derive(Deserialize)]
//! struct User {
//!     name: String,
//! }
//!
//! # async fn run(transport: Arc<dyn wireline::Transport>) -> wireline::Result<()> {
//! let loader = Loader::new(transport);
//! let descriptor = RequestDescriptor::get("https://api.example.com/users/1");
//! if let Some(user) = loader.load::<User>(&descriptor, false).await?.into_loaded() {
//!     println!("{}", user.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A ready-made `reqwest`-backed transport lives in the companion
//! `wireline-reqwest` crate; any other stack can participate by
//! implementing [`Transport`].

#![deny(missing_docs)]

mod assemble;
mod descriptor;
mod error;
pub mod header;
mod loader;
mod multipart;
mod paging;
mod params;
mod status;
mod transport;

pub use assemble::assemble;
pub use descriptor::{BodyEncoding, Method, RequestDescriptor};
pub use error::{Error, Result};
pub use loader::{LoadOutcome, Loader};
pub use multipart::{Boundary, FileAttachment, FileSet};
pub use paging::{PageOutcome, PagedLoader};
pub use params::{ParamBag, ParamScalar, ParamValue};
pub use status::{AcceptedStatuses, StatusCode};
pub use transport::{Transport, WireRequest, WireResponse};
