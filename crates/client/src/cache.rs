//! Page-keyed cache over the books resource.
//!
//! One slot per page number. A successful mutation anywhere in the catalog
//! marks every slot stale (resource-wide invalidation); stale values keep
//! being served while a refetch is outstanding, and concurrent fetches for
//! the same page coalesce into a single network call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use biblio_catalog::models::PageResult;
use futures::future::{BoxFuture, FutureExt, Shared};

use crate::api::{ApiError, CatalogApi};

type SharedFetch = Shared<BoxFuture<'static, Result<PageResult, ApiError>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Freshness {
    Fresh,
    Stale,
}

struct Slot {
    result: Option<PageResult>,
    freshness: Freshness,
    inflight: Option<SharedFetch>,
    /// Invalidation epoch observed when the in-flight fetch started.
    started_epoch: u64,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            result: None,
            freshness: Freshness::Stale,
            inflight: None,
            started_epoch: 0,
        }
    }
}

struct CacheInner {
    api: Arc<dyn CatalogApi>,
    limit: u32,
    slots: Mutex<HashMap<u32, Slot>>,
    /// Bumped on every invalidation. A fetch that started before the bump
    /// lands as stale, never fresh.
    epoch: AtomicU64,
}

impl CacheInner {
    fn lock_slots(&self) -> MutexGuard<'_, HashMap<u32, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Client-side cache of catalog pages with stale-while-revalidate semantics.
///
/// Injectable: constructed over any [`CatalogApi`] implementation, owned by
/// whoever drives the UI, and substitutable with a fake in tests. Cloning is
/// cheap and shares the underlying slots.
#[derive(Clone)]
pub struct PageCache {
    inner: Arc<CacheInner>,
}

impl PageCache {
    pub fn new(api: Arc<dyn CatalogApi>, limit: u32) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                api,
                limit,
                slots: Mutex::new(HashMap::new()),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    pub fn limit(&self) -> u32 {
        self.inner.limit
    }

    /// The cached result for a page, fresh or stale, without fetching.
    pub fn peek(&self, page: u32) -> Option<PageResult> {
        self.inner
            .lock_slots()
            .get(&page)
            .and_then(|slot| slot.result.clone())
    }

    /// Serve the page, preferring cached data: a fresh hit returns at once, a
    /// stale hit returns the old value while a background revalidation runs,
    /// and a miss awaits the (coalesced) network call.
    pub async fn get(&self, page: u32) -> Result<PageResult, ApiError> {
        let (stale, fetch) = {
            let mut slots = self.inner.lock_slots();
            let slot = slots.entry(page).or_default();

            if let (Some(result), Freshness::Fresh) = (&slot.result, slot.freshness) {
                return Ok(result.clone());
            }

            let stale = slot.result.clone();
            let fetch = self.ensure_inflight(slot, page);
            (stale, fetch)
        };

        match stale {
            // Stale-while-revalidate: the old value is served now and the
            // refetch completes in the background.
            Some(result) => {
                tokio::spawn(fetch);
                Ok(result)
            }
            None => fetch.await,
        }
    }

    /// Await an up-to-date result for the page.
    ///
    /// Joins an in-flight fetch that started against the current invalidation
    /// epoch; a fetch from before the last invalidation is allowed to land
    /// first and a new one is issued, so a read after a successful write
    /// always reflects the write.
    pub async fn get_fresh(&self, page: u32) -> Result<PageResult, ApiError> {
        enum Step {
            Done(PageResult),
            Await(SharedFetch),
            AwaitOutdated(SharedFetch),
        }

        loop {
            let step = {
                let current_epoch = self.inner.epoch.load(Ordering::SeqCst);
                let mut slots = self.inner.lock_slots();
                let slot = slots.entry(page).or_default();

                if let (Some(result), Freshness::Fresh) = (&slot.result, slot.freshness) {
                    Step::Done(result.clone())
                } else if let Some(fetch) = slot.inflight.clone() {
                    if slot.started_epoch == current_epoch {
                        Step::Await(fetch)
                    } else {
                        Step::AwaitOutdated(fetch)
                    }
                } else {
                    Step::Await(self.ensure_inflight(slot, page))
                }
            };

            match step {
                Step::Done(result) => return Ok(result),
                Step::Await(fetch) => return fetch.await,
                Step::AwaitOutdated(fetch) => {
                    let _ = fetch.await;
                }
            }
        }
    }

    /// Mark every cached page stale. Values are kept so stale data can keep
    /// being served; the next access triggers a refetch.
    pub fn invalidate_all(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        let mut slots = self.inner.lock_slots();
        for slot in slots.values_mut() {
            slot.freshness = Freshness::Stale;
        }
        tracing::debug!("page cache invalidated");
    }

    /// Register (or join) the in-flight fetch for a page. The fetch itself
    /// writes its result back into the slot when it completes; a failed fetch
    /// leaves the previous value in place.
    fn ensure_inflight(&self, slot: &mut Slot, page: u32) -> SharedFetch {
        if let Some(fetch) = &slot.inflight {
            return fetch.clone();
        }

        let inner = Arc::clone(&self.inner);
        let started_epoch = self.inner.epoch.load(Ordering::SeqCst);
        let fetch: SharedFetch = async move {
            let result = inner.api.fetch_page(page, inner.limit).await;

            let mut slots = inner.lock_slots();
            let slot = slots.entry(page).or_default();
            slot.inflight = None;
            match &result {
                Ok(page_result) => {
                    slot.result = Some(page_result.clone());
                    slot.freshness = if inner.epoch.load(Ordering::SeqCst) == started_epoch {
                        Freshness::Fresh
                    } else {
                        Freshness::Stale
                    };
                }
                Err(error) => {
                    tracing::warn!(page, %error, "page fetch failed; keeping previous value");
                }
            }
            result
        }
        .boxed()
        .shared();

        slot.inflight = Some(fetch.clone());
        slot.started_epoch = started_epoch;
        fetch
    }
}
