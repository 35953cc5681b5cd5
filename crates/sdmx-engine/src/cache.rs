// Dweve SDMX - Structural Metadata Engine
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Response caching for the fetch port
//!
//! Concrete-version structures are immutable, so their responses never go
//! stale. Entries are keyed by endpoint base URL and resolved reference.
//! `latest` references always go to the inner fetcher.
//!
//! The cache holds at most `capacity` entries; adding one past that evicts
//! the oldest insertion first.
//!
//! Concurrent requests for the same entry share one fetch. A failed fetch
//! is handed to everyone already waiting on it and then dropped, so the
//! next request retries.
//!
//! # Thread Safety
//!
//! Uses `DashMap` for concurrent access plus a `Mutex`-guarded insertion
//! queue. No lock is held across an await.

use crate::error::FetchError;
use crate::fetch::StructureFetcher;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sdmx_core::config::{EndpointConfig, EngineConfig, DEFAULT_CACHE_CAPACITY};
use sdmx_core::reference::{ResolvedRef, StructureRef};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;
use tracing::debug;

type CacheKey = (String, ResolvedRef);
type CacheEntry = Arc<OnceCell<Result<Vec<u8>, FetchError>>>;

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests answered from the cache (including joined in-flight fetches).
    pub hits: u64,
    /// Requests that triggered a fetch.
    pub misses: u64,
    /// `latest` requests passed straight through.
    pub bypassed: u64,
    /// Entries dropped to stay within capacity.
    pub evictions: u64,
    /// Current number of entries.
    pub size: usize,
    /// Maximum number of entries.
    pub max_size: usize,
}

impl CacheStats {
    /// Hit rate over cacheable requests (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Hit rate as a percentage.
    pub fn hit_rate_percent(&self) -> f64 {
        self.hit_rate() * 100.0
    }
}

/// A [`StructureFetcher`] that remembers concrete-version responses.
///
/// ```
/// use sdmx_engine::cache::CachingFetcher;
/// # use sdmx_engine::{FetchError, StructureFetcher};
/// # use sdmx_core::{EndpointConfig, StructureRef};
/// # struct Offline;
/// # #[async_trait::async_trait]
/// # impl StructureFetcher for Offline {
/// #     async fn fetch(&self, _: &EndpointConfig, _: &StructureRef) -> Result<Vec<u8>, FetchError> {
/// #         Err(FetchError::NotFound)
/// #     }
/// # }
/// let fetcher = CachingFetcher::with_capacity(Offline, 64);
/// assert_eq!(fetcher.stats().size, 0);
/// assert_eq!(fetcher.stats().max_size, 64);
/// ```
pub struct CachingFetcher<F> {
    inner: F,
    entries: DashMap<CacheKey, CacheEntry>,
    /// Keys in insertion order, oldest first.
    order: Mutex<VecDeque<CacheKey>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    bypassed: AtomicU64,
    evictions: AtomicU64,
}

impl<F: StructureFetcher> CachingFetcher<F> {
    /// Wrap `inner` with the default capacity.
    pub fn new(inner: F) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Wrap `inner`, keeping at most `capacity` entries (at least one).
    pub fn with_capacity(inner: F, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner,
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            bypassed: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Wrap `inner` with the capacity from `config`.
    pub fn from_config(inner: F, config: &EngineConfig) -> Self {
        Self::with_capacity(inner, config.cache_capacity)
    }

    /// The wrapped fetcher.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Current statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            bypassed: self.bypassed.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.entries.len(),
            max_size: self.capacity,
        }
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
        if let Ok(mut order) = self.order.lock() {
            order.clear();
        }
    }

    /// True if a completed response for `reference` is held.
    pub fn contains(&self, endpoint: &EndpointConfig, reference: &ResolvedRef) -> bool {
        self.entries
            .get(&(endpoint.base_url.clone(), reference.clone()))
            .map_or(false, |entry| entry.initialized())
    }
}

impl<F> CachingFetcher<F> {
    /// Queue a newly inserted key and evict the oldest entries past
    /// capacity.
    fn admit(&self, key: CacheKey) {
        let Ok(mut order) = self.order.lock() else {
            return;
        };
        order.push_back(key);
        while order.len() > self.capacity {
            let Some(oldest) = order.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(reference = %oldest.1, "cache eviction");
            }
        }
    }

    fn forget(&self, key: &CacheKey) {
        if let Ok(mut order) = self.order.lock() {
            order.retain(|queued| queued != key);
        }
    }
}

#[async_trait]
impl<F: StructureFetcher> StructureFetcher for CachingFetcher<F> {
    async fn fetch(
        &self,
        endpoint: &EndpointConfig,
        reference: &StructureRef,
    ) -> Result<Vec<u8>, FetchError> {
        let Some(resolved) = reference.clone().into_resolved() else {
            self.bypassed.fetch_add(1, Ordering::Relaxed);
            return self.inner.fetch(endpoint, reference).await;
        };

        let key = (endpoint.base_url.clone(), resolved);
        let entry = match self.entries.entry(key.clone()) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(slot) => {
                let entry = slot.insert(CacheEntry::default()).clone();
                self.admit(key.clone());
                entry
            }
        };

        let fetched = AtomicBool::new(false);
        let result = entry
            .get_or_init(|| async {
                fetched.store(true, Ordering::Relaxed);
                self.inner.fetch(endpoint, reference).await
            })
            .await
            .clone();

        if fetched.load(Ordering::Relaxed) {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(%reference, "cache miss");
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%reference, "cache hit");
        }

        if result.is_err() {
            // Only evict the entry this request saw; a retry may already
            // have replaced it.
            if self
                .entries
                .remove_if(&key, |_, current| Arc::ptr_eq(current, &entry))
                .is_some()
            {
                self.forget(&key);
            }
        }
        result
    }

    async fn fetch_constraints(
        &self,
        endpoint: &EndpointConfig,
        dataflow: &ResolvedRef,
    ) -> Result<Vec<u8>, FetchError> {
        self.inner.fetch_constraints(endpoint, dataflow).await
    }
}
