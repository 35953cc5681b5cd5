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

//! Fetch, resolve and parse
//!
//! [`StructureClient`] is the only place where bytes from the fetch port
//! become typed structures. Everything above it works on the model.

use crate::error::{EngineError, FetchError, Result};
use crate::fetch::StructureFetcher;
use sdmx_core::context::RequestContext;
use sdmx_core::model::{
    Categorisation, CategoryScheme, Codelist, ConceptScheme, ContentConstraint, DataStructure, Dataflow,
    Structure, StructureSet,
};
use sdmx_core::reference::{ResolvedRef, StructureRef, StructureType};
use sdmx_core::resolver::resolve_in_listing;
use sdmx_core::EngineConfig;
use sdmx_xml::{parse_bytes, DocumentKind, ParseConfig};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Id used to list every structure of a type (`/dataflow/SPC/all/latest`).
pub const ALL_IDS: &str = "all";

/// Typed access to structures behind a fetch port.
///
/// Cheap to clone; clones share the port.
#[derive(Clone)]
pub struct StructureClient {
    fetcher: Arc<dyn StructureFetcher>,
    parse: ParseConfig,
    max_concurrency: usize,
}

impl StructureClient {
    /// A client over `fetcher` configured from `config`.
    pub fn new(fetcher: Arc<dyn StructureFetcher>, config: &EngineConfig) -> Self {
        Self {
            fetcher,
            parse: ParseConfig::from_engine(config),
            max_concurrency: config.max_concurrency.max(1),
        }
    }

    /// Every structure of `kind` in the document returned for `reference`.
    pub async fn fetch_set(
        &self,
        ctx: &RequestContext,
        reference: &StructureRef,
        kind: DocumentKind,
    ) -> Result<StructureSet> {
        debug!(%reference, endpoint = %ctx.endpoint.key, "fetching structure");
        let bytes = self
            .fetcher
            .fetch(&ctx.endpoint, reference)
            .await
            .map_err(|source| EngineError::Fetch {
                reference: reference.clone(),
                source,
            })?;
        debug!(%reference, bytes = bytes.len(), "fetched structure");

        parse_bytes(&bytes, kind, &self.parse).map_err(|source| EngineError::Parse {
            reference: reference.clone(),
            source,
        })
    }

    /// The one structure `reference` names.
    ///
    /// A `latest` reference takes the greatest version present in the
    /// response. A response without a match fails with
    /// [`sdmx_core::VersionResolutionError::NoMatch`].
    pub async fn fetch_structure(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<Structure> {
        let set = self
            .fetch_set(ctx, reference, reference.structure_type.into())
            .await?;
        let structures = set.into_structures();
        let found: Vec<StructureRef> = structures
            .iter()
            .map(|s| s.reference().as_structure_ref().clone())
            .collect();
        let resolved = resolve_in_listing(reference, &found)?;
        if !reference.is_resolved() {
            debug!(%reference, version = resolved.version(), "resolved latest");
        }

        structures
            .into_iter()
            .find(|s| *s.reference() == resolved)
            .ok_or_else(|| {
                EngineError::from(sdmx_core::VersionResolutionError::NoMatch {
                    reference: reference.clone(),
                })
            })
    }

    /// Pin `reference` to a concrete version, fetching only when it is
    /// `latest`.
    pub async fn resolve(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<ResolvedRef> {
        match reference.clone().into_resolved() {
            Some(resolved) => Ok(resolved),
            None => Ok(self.fetch_structure(ctx, reference).await?.reference().clone()),
        }
    }

    /// Fetch many references, at most `max_concurrency` at a time.
    ///
    /// Results come back in input order whatever the completion order.
    pub async fn fetch_all(&self, ctx: &RequestContext, references: Vec<StructureRef>) -> Vec<Result<Structure>> {
        let total = references.len();
        let mut slots: Vec<Option<Result<Structure>>> = (0..total).map(|_| None).collect();
        let mut set = JoinSet::new();
        let mut pending = references.into_iter().enumerate();

        let spawn = |set: &mut JoinSet<(usize, Result<Structure>)>, index: usize, reference: StructureRef| {
            let client = self.clone();
            let ctx = ctx.clone();
            set.spawn(async move { (index, client.fetch_structure(&ctx, &reference).await) });
        };

        for (index, reference) in pending.by_ref().take(self.max_concurrency) {
            spawn(&mut set, index, reference);
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!(error = %e, "fetch task failed"),
            }
            if let Some((index, reference)) = pending.next() {
                spawn(&mut set, index, reference);
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or_else(|| Err(EngineError::Task("fetch task did not complete".to_string()))))
            .collect()
    }

    /// The dataflow `reference` names.
    pub async fn dataflow(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<Dataflow> {
        match self.typed(ctx, reference, StructureType::Dataflow).await? {
            Structure::Dataflow(df) => Ok(df),
            _ => Err(unexpected(reference, StructureType::Dataflow)),
        }
    }

    /// The DSD `reference` names.
    pub async fn data_structure(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<DataStructure> {
        match self.typed(ctx, reference, StructureType::DataStructure).await? {
            Structure::DataStructure(dsd) => Ok(dsd),
            _ => Err(unexpected(reference, StructureType::DataStructure)),
        }
    }

    /// The codelist `reference` names.
    pub async fn codelist(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<Codelist> {
        match self.typed(ctx, reference, StructureType::Codelist).await? {
            Structure::Codelist(cl) => Ok(cl),
            _ => Err(unexpected(reference, StructureType::Codelist)),
        }
    }

    /// The concept scheme `reference` names.
    pub async fn concept_scheme(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<ConceptScheme> {
        match self.typed(ctx, reference, StructureType::ConceptScheme).await? {
            Structure::ConceptScheme(cs) => Ok(cs),
            _ => Err(unexpected(reference, StructureType::ConceptScheme)),
        }
    }

    /// The category scheme `reference` names.
    pub async fn category_scheme(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<CategoryScheme> {
        match self.typed(ctx, reference, StructureType::CategoryScheme).await? {
            Structure::CategoryScheme(cs) => Ok(cs),
            _ => Err(unexpected(reference, StructureType::CategoryScheme)),
        }
    }

    /// Every categorisation the endpoint lists. A `NotFound` from the port
    /// means there are none.
    pub async fn categorisations(&self, ctx: &RequestContext) -> Result<Vec<Categorisation>> {
        let listing = StructureRef::latest(
            StructureType::Categorisation,
            ctx.endpoint.listing_agency(),
            ALL_IDS,
        );
        match self
            .fetch_set(ctx, &listing, StructureType::Categorisation.into())
            .await
        {
            Ok(set) => Ok(set.categorisations),
            Err(EngineError::Fetch {
                source: FetchError::NotFound,
                ..
            }) => {
                debug!("no categorisations published");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Every dataflow the endpoint lists.
    pub async fn dataflows(&self, ctx: &RequestContext) -> Result<Vec<Dataflow>> {
        let listing = StructureRef::latest(
            StructureType::Dataflow,
            ctx.endpoint.listing_agency(),
            ALL_IDS,
        );
        Ok(self
            .fetch_set(ctx, &listing, StructureType::Dataflow.into())
            .await?
            .dataflows)
    }

    /// Content constraints attached to `dataflow`. A `NotFound` from the
    /// port means there are none.
    pub async fn constraints_for(&self, ctx: &RequestContext, dataflow: &ResolvedRef) -> Result<Vec<ContentConstraint>> {
        let bytes = match self.fetcher.fetch_constraints(&ctx.endpoint, dataflow).await {
            Ok(bytes) => bytes,
            Err(FetchError::NotFound) => {
                debug!(%dataflow, "no constraints published");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(EngineError::Fetch {
                    reference: dataflow.as_structure_ref().clone(),
                    source,
                })
            }
        };

        let set = parse_bytes(&bytes, StructureType::ContentConstraint.into(), &self.parse).map_err(|source| {
            EngineError::Parse {
                reference: dataflow.as_structure_ref().clone(),
                source,
            }
        })?;
        Ok(set
            .constraints
            .into_iter()
            .filter(|c| c.attachments.is_empty() || c.applies_to(dataflow))
            .collect())
    }

    async fn typed(&self, ctx: &RequestContext, reference: &StructureRef, expected: StructureType) -> Result<Structure> {
        if reference.structure_type != expected {
            return Err(unexpected(reference, expected));
        }
        self.fetch_structure(ctx, reference).await
    }
}

fn unexpected(reference: &StructureRef, expected: StructureType) -> EngineError {
    EngineError::UnexpectedType {
        reference: reference.clone(),
        expected,
    }
}
