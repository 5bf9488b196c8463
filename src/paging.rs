//! Paged list loading with implicit "load more" tracking.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::descriptor::RequestDescriptor;
use crate::loader::{LoadOutcome, Loader};
use crate::transport::Transport;
use crate::Result;

/// The outcome of a [`PagedLoader::load_page`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    /// One page of decoded items.
    Page(Vec<T>),
    /// Every page has already been fetched; no request was issued.
    AlreadyComplete,
    /// Another load was already in flight; no request was issued.
    Skipped,
}

/// A [`Loader`] that additionally tracks whether a paged collection has
/// been fetched to its end.
///
/// After a successful page the loader remembers whether the page came back
/// short of the requested limit; once it did, further non-forced page
/// loads return [`PageOutcome::AlreadyComplete`] without touching the
/// transport. A forced reload starts the collection over.
pub struct PagedLoader {
    loader: Loader,
    loading_all: AtomicBool,
}

impl PagedLoader {
    /// Creates a paged loader executing through `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::from_loader(Loader::new(transport))
    }

    /// Wraps an already-configured [`Loader`].
    pub fn from_loader(loader: Loader) -> Self {
        Self {
            loader,
            loading_all: AtomicBool::new(false),
        }
    }

    /// The underlying loader, for `cancel` and `is_loading`.
    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Whether the last page fell short of its limit, meaning no further
    /// pages remain.
    pub fn is_loading_all(&self) -> bool {
        self.loading_all.load(Ordering::Acquire)
    }

    /// Loads one page of `T`s described by `descriptor`.
    ///
    /// `limit` is the page size the descriptor asks the server for; a
    /// successful page updates the all-loaded flag by comparing the
    /// received count against it. Passing `None` leaves the flag
    /// untouched. The page load itself is gated by the single-load
    /// in-flight rule of the underlying [`Loader`].
    pub async fn load_page<T: DeserializeOwned>(
        &self,
        descriptor: &RequestDescriptor,
        force_reload: bool,
        limit: Option<usize>,
    ) -> Result<PageOutcome<T>> {
        if force_reload {
            self.loading_all.store(false, Ordering::Release);
        }
        if self.loading_all.load(Ordering::Acquire) {
            log::debug!("page load dropped, collection already fetched to its end");
            return Ok(PageOutcome::AlreadyComplete);
        }

        let outcome = self.loader.load::<Vec<T>>(descriptor, force_reload).await?;
        Ok(match outcome {
            LoadOutcome::Skipped => PageOutcome::Skipped,
            // A bare acknowledgement counts as an empty page.
            LoadOutcome::Acknowledged => {
                self.note_page(0, limit);
                PageOutcome::Page(Vec::new())
            }
            LoadOutcome::Loaded(items) => {
                self.note_page(items.len(), limit);
                PageOutcome::Page(items)
            }
        })
    }

    fn note_page(&self, received: usize, limit: Option<usize>) {
        if let Some(limit) = limit {
            self.loading_all.store(received < limit, Ordering::Release);
        }
    }
}
