//! Load execution with an in-flight guard.
//!
//! A [`Loader`] is a long-lived entity owning the load state for one
//! logical endpoint. It admits at most one in-flight transport call at a
//! time: a second non-forced load is dropped silently while the first is
//! running, and the state always reverts to idle before a caller observes
//! any outcome.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};
use serde::de::DeserializeOwned;

use crate::assemble::assemble;
use crate::descriptor::RequestDescriptor;
use crate::status::AcceptedStatuses;
use crate::transport::{Transport, WireResponse};
use crate::{Error, Result};

/// The outcome of a [`Loader::load`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    /// The response body decoded into the requested type.
    Loaded(T),
    /// The server acknowledged the request without a decodable payload:
    /// an empty body or the literal `ok`.
    Acknowledged,
    /// Another load was already in flight; no request was issued.
    Skipped,
}

impl<T> LoadOutcome<T> {
    /// The decoded value, if any.
    pub fn into_loaded(self) -> Option<T> {
        match self {
            LoadOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this call was dropped by the in-flight guard.
    pub fn is_skipped(&self) -> bool {
        matches!(self, LoadOutcome::Skipped)
    }
}

enum Exchange {
    Response(WireResponse),
    Skipped,
}

/// Executes loads for one logical endpoint, one at a time.
pub struct Loader {
    transport: Arc<dyn Transport>,
    accepted: AcceptedStatuses,
    in_flight: AtomicBool,
    abort_slot: Mutex<Option<(u64, AbortHandle)>>,
    generation: AtomicU64,
}

impl Loader {
    /// Creates a loader executing through `transport`, accepting the
    /// default `{200, 204}` statuses.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            accepted: AcceptedStatuses::default(),
            in_flight: AtomicBool::new(false),
            abort_slot: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Replaces the accepted status set.
    pub fn with_accepted_statuses(mut self, accepted: AcceptedStatuses) -> Self {
        self.accepted = accepted;
        self
    }

    /// Whether a load is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Cancels the in-flight transport call, if any.
    ///
    /// The canceled load completes with [`Error::Canceled`] and the loader
    /// returns to idle. Calling this with nothing in flight is a no-op.
    pub fn cancel(&self) {
        let handle = self
            .abort_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some((_, handle)) = handle {
            handle.abort();
        }
    }

    /// Loads `descriptor` and decodes the response body as `T`.
    ///
    /// With `force_reload` set, the guard is reset first, so the call
    /// proceeds even while an earlier load is still in flight. Without it,
    /// a duplicate call returns [`LoadOutcome::Skipped`] and touches
    /// neither the transport nor the guard.
    pub async fn load<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        force_reload: bool,
    ) -> Result<LoadOutcome<T>> {
        match self.exchange(descriptor, force_reload).await? {
            Exchange::Skipped => Ok(LoadOutcome::Skipped),
            Exchange::Response(response) => decode_outcome(&response.body),
        }
    }

    /// Loads `descriptor` for effect only, ignoring any response payload.
    pub async fn load_unit(
        &self,
        descriptor: &RequestDescriptor,
        force_reload: bool,
    ) -> Result<LoadOutcome<()>> {
        match self.exchange(descriptor, force_reload).await? {
            Exchange::Skipped => Ok(LoadOutcome::Skipped),
            Exchange::Response(_) => Ok(LoadOutcome::Acknowledged),
        }
    }

    async fn exchange(
        &self,
        descriptor: &RequestDescriptor,
        force_reload: bool,
    ) -> Result<Exchange> {
        if force_reload {
            self.in_flight.store(false, Ordering::Release);
        }
        // The duplicate check and the claim are one atomic step, so two
        // racing loads can never both reach the transport.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("load dropped, another load is in flight");
            return Ok(Exchange::Skipped);
        }
        let _guard = IdleOnDrop(&self.in_flight);

        let request = assemble(descriptor)?;
        log::debug!(
            "-> {} {} ({} header(s), {} body byte(s))",
            request.verb,
            request.url,
            request.headers.len(),
            request.body.as_ref().map_or(0, Vec::len),
        );

        let (handle, registration) = AbortHandle::new_pair();
        let token = self.generation.fetch_add(1, Ordering::Relaxed);
        *self
            .abort_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some((token, handle));

        let sent = Abortable::new(self.transport.send(request), registration).await;
        self.release_abort_slot(token);

        let response = match sent {
            Ok(result) => result.inspect_err(|err| log::warn!("load failed: {err}"))?,
            Err(_aborted) => {
                log::debug!("load canceled");
                return Err(Error::Canceled);
            }
        };
        log::debug!(
            "<- {} ({} body byte(s))",
            response.status,
            response.body.len()
        );

        if !self.accepted.contains(response.status) {
            log::warn!("load rejected: status {}", response.status);
            return Err(Error::Status(response.status));
        }
        Ok(Exchange::Response(response))
    }

    /// Clears the abort slot, but only if it still belongs to this load;
    /// a forced reload may have installed a newer handle meanwhile.
    fn release_abort_slot(&self, token: u64) {
        let mut slot = self
            .abort_slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if matches!(*slot, Some((current, _)) if current == token) {
            *slot = None;
        }
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct TransportDebug<'a>(&'a dyn Transport);
        impl fmt::Debug for TransportDebug<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.describe(f)
            }
        }
        f.debug_struct("Loader")
            .field("transport", &TransportDebug(&*self.transport))
            .field("is_loading", &self.is_loading())
            .finish()
    }
}

/// Reverts the entity to idle on every exit path, including panics and
/// early `?` returns, before the caller can observe the outcome.
struct IdleOnDrop<'a>(&'a AtomicBool);

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn decode_outcome<T: DeserializeOwned>(body: &[u8]) -> Result<LoadOutcome<T>> {
    if body.is_empty() {
        return Ok(LoadOutcome::Acknowledged);
    }
    // Some endpoints reply with a bare acknowledgement instead of JSON.
    if std::str::from_utf8(body).is_ok_and(|text| text.eq_ignore_ascii_case("ok")) {
        return Ok(LoadOutcome::Acknowledged);
    }
    Ok(LoadOutcome::Loaded(serde_json::from_slice(body)?))
}
