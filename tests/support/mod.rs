//! An in-process transport for exercising loaders without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::Notify;
use wireline::{StatusCode, Transport, WireRequest, WireResponse};

type Responder = dyn Fn(&WireRequest) -> wireline::Result<WireResponse> + Send + Sync;

pub struct MockTransport {
    hits: AtomicUsize,
    gate: Option<Arc<Notify>>,
    respond: Box<Responder>,
}

impl MockTransport {
    /// Replies immediately with `status` and `body`.
    pub fn replying(status: u16, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            hits: AtomicUsize::new(0),
            gate: None,
            respond: Box::new(move |_| {
                Ok(WireResponse {
                    status: StatusCode::new(status),
                    headers: Vec::new(),
                    body: body.to_vec(),
                })
            }),
        })
    }

    /// Fails every send with the given error constructor.
    pub fn failing(error: impl Fn() -> wireline::Error + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            hits: AtomicUsize::new(0),
            gate: None,
            respond: Box::new(move |_| Err(error())),
        })
    }

    /// Holds every send until `gate` is notified, then replies with
    /// `status` and `body`.
    pub fn gated(gate: Arc<Notify>, status: u16, body: &'static [u8]) -> Arc<Self> {
        Arc::new(Self {
            hits: AtomicUsize::new(0),
            gate: Some(gate),
            respond: Box::new(move |_| {
                Ok(WireResponse {
                    status: StatusCode::new(status),
                    headers: Vec::new(),
                    body: body.to_vec(),
                })
            }),
        })
    }

    /// How many sends reached this transport.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Waits until at least `count` sends have started.
    pub async fn wait_for_hits(&self, count: usize) {
        while self.hits() < count {
            tokio::task::yield_now().await;
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: WireRequest) -> BoxFuture<'_, wireline::Result<WireResponse>> {
        Box::pin(async move {
            self.hits.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            (self.respond)(&request)
        })
    }
}
