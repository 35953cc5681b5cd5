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

//! In-memory fetch port for the engine tests
//!
//! Serves the `sdmx-test` catalog, counts calls per reference, and can be
//! told to fail or stall for chosen references.

#![allow(dead_code)]

use async_trait::async_trait;
use dashmap::DashMap;
use sdmx_core::{EndpointConfig, RequestContext, ResolvedRef, StructureRef, StructureType};
use sdmx_engine::{FetchError, StructureFetcher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Catalog-backed [`StructureFetcher`].
#[derive(Default)]
pub struct MockFetcher {
    documents: DashMap<StructureRef, String>,
    constraints: DashMap<String, String>,
    failures: DashMap<StructureRef, FetchError>,
    calls: DashMap<StructureRef, usize>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockFetcher {
    /// Every catalog document, with the DF_X constraints.
    pub fn catalog() -> Self {
        let mock = Self::default();
        for (reference, xml) in sdmx_test::catalog() {
            mock.documents.insert(reference, xml.to_string());
        }
        mock.constraints
            .insert("DF_X".to_string(), sdmx_test::constraints_x().to_string());
        mock
    }

    /// Sleep this long inside every fetch.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serve `xml` for `reference`.
    pub fn with_document(self, reference: StructureRef, xml: impl Into<String>) -> Self {
        self.documents.insert(reference, xml.into());
        self
    }

    /// Fail every fetch of `reference` with `error`.
    pub fn failing(self, reference: StructureRef, error: FetchError) -> Self {
        self.failures.insert(reference, error);
        self
    }

    /// Stop failing `reference`.
    pub fn recover(&self, reference: &StructureRef) {
        self.failures.remove(reference);
    }

    /// Fetches of `reference` so far.
    pub fn calls(&self, reference: &StructureRef) -> usize {
        self.calls.get(reference).map_or(0, |c| *c)
    }

    /// Fetches of anything so far.
    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    /// Highest number of fetches seen running at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructureFetcher for MockFetcher {
    async fn fetch(&self, _endpoint: &EndpointConfig, reference: &StructureRef) -> Result<Vec<u8>, FetchError> {
        *self.calls.entry(reference.clone()).or_insert(0) += 1;

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(error) = self.failures.get(reference) {
            return Err(error.value().clone());
        }
        self.documents
            .get(reference)
            .map(|xml| xml.as_bytes().to_vec())
            .ok_or(FetchError::NotFound)
    }

    async fn fetch_constraints(
        &self,
        _endpoint: &EndpointConfig,
        dataflow: &ResolvedRef,
    ) -> Result<Vec<u8>, FetchError> {
        self.constraints
            .get(&dataflow.id)
            .map(|xml| xml.as_bytes().to_vec())
            .ok_or(FetchError::NotFound)
    }
}

/// Context for the default (SPC) endpoint.
pub fn ctx() -> RequestContext {
    RequestContext::new(EndpointConfig::default())
}

pub fn dataflow_x() -> StructureRef {
    StructureRef::new(StructureType::Dataflow, "SPC", "DF_X", "1.0")
}

pub fn dsd_y() -> StructureRef {
    StructureRef::new(StructureType::DataStructure, "SPC", "DSD_Y", "1.0")
}

pub fn codelist(id: &str, version: &str) -> StructureRef {
    StructureRef::new(StructureType::Codelist, "SPC", id, version)
}

pub fn concept_scheme() -> StructureRef {
    StructureRef::new(StructureType::ConceptScheme, "SPC", "CS_COMMON", "1.0")
}

pub fn category_scheme() -> StructureRef {
    StructureRef::latest(StructureType::CategoryScheme, "SPC", "CAS_TOPICS")
}

pub fn categorisation_listing() -> StructureRef {
    StructureRef::latest(StructureType::Categorisation, "SPC", "all")
}

pub fn resolved(reference: StructureRef) -> ResolvedRef {
    reference.into_resolved().expect("concrete reference")
}
