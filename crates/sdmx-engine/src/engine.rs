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

//! Engine facade
//!
//! [`SdmxEngine`] combines the structure client with the pure operations of
//! `sdmx-core`: discovery, summaries, concept and category browsing, code
//! checks, key and URL building, availability, comparison and graphs. Every call takes a
//! [`RequestContext`]; the engine holds no per-endpoint state.

use crate::client::StructureClient;
use crate::error::Result;
use crate::fetch::{ReverseIndex, StructureFetcher};
use crate::graph::{Direction, GraphBuilder, GraphOptions, StructureGraph};
use sdmx_core::availability::{constraint_coverage, resolve_availability, AvailabilityReport, DimensionCoverage};
use sdmx_core::compare::{compare_codelists, compare_data_structures, StructureDiff};
use sdmx_core::context::{Confirmation, RequestContext};
use sdmx_core::discovery::{
    self, CategoryTree, CodePage, ConceptPage, DataflowPage, Pagination, StructureSummary,
};
use sdmx_core::key::{CodeCheck, KeyBuilder, KeyPart};
use sdmx_core::model::{Codelist, ConceptScheme, DataStructure, Dataflow, Dimension, Structure};
use sdmx_core::reference::{StructureRef, StructureType};
use sdmx_core::url::{plan_data_url, DataRequest, DataUrl};
use sdmx_core::{EngineConfig, ValidationError};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Structural metadata operations over a fetch port.
///
/// # Example
///
/// ```no_run
/// use sdmx_core::{EndpointConfig, EngineConfig, Pagination, RequestContext};
/// use sdmx_engine::{SdmxEngine, StructureFetcher};
/// use std::sync::Arc;
///
/// # async fn run(fetcher: Arc<dyn StructureFetcher>) -> sdmx_engine::Result<()> {
/// let engine = SdmxEngine::new(fetcher, EngineConfig::default());
/// let ctx = RequestContext::new(EndpointConfig::default());
/// let page = engine.discover_dataflows(&ctx, &["population"], Pagination::default()).await?;
/// println!("{} of {} dataflows", page.total_found, page.total_before_filtering);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct SdmxEngine {
    client: StructureClient,
    graphs: GraphBuilder,
    config: EngineConfig,
}

impl SdmxEngine {
    /// An engine over `fetcher`.
    pub fn new(fetcher: Arc<dyn StructureFetcher>, config: EngineConfig) -> Self {
        let client = StructureClient::new(fetcher, &config);
        Self {
            graphs: GraphBuilder::new(client.clone()),
            client,
            config,
        }
    }

    /// Enable parent traversal in [`graph`](Self::graph) through `index`.
    pub fn with_reverse_index(mut self, index: Arc<dyn ReverseIndex>) -> Self {
        self.graphs = self.graphs.with_reverse_index(index);
        self
    }

    /// The underlying client, for direct structure access.
    pub fn client(&self) -> &StructureClient {
        &self.client
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Dataflows matching any of `keywords`, best matches first, one page at
    /// a time. No keywords lists everything.
    pub async fn discover_dataflows<S: AsRef<str> + Sync>(
        &self,
        ctx: &RequestContext,
        keywords: &[S],
        pagination: Pagination,
    ) -> Result<DataflowPage> {
        let dataflows = self.client.dataflows(ctx).await?;
        let page = discovery::discover_dataflows(&dataflows, keywords, pagination);
        info!(
            endpoint = %ctx.endpoint.key,
            total = page.total_before_filtering,
            found = page.total_found,
            "discovered dataflows"
        );
        Ok(page)
    }

    /// Dimension order, key template and query guide for a dataflow or DSD.
    pub async fn structure_summary(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<StructureSummary> {
        let (dataflow, dsd) = self.structure_of(ctx, reference).await?;
        Ok(StructureSummary::new(dataflow.as_ref(), &dsd))
    }

    /// Codes in `codelist` matching `query`, one page at a time.
    pub async fn search_codes(
        &self,
        ctx: &RequestContext,
        codelist: &StructureRef,
        query: Option<&str>,
        pagination: Pagination,
    ) -> Result<CodePage> {
        let codelist = self.client.codelist(ctx, codelist).await?;
        Ok(discovery::search_codes(&codelist, query, pagination))
    }

    /// Codes of the codelist behind `dimension` of a dataflow or DSD.
    pub async fn dimension_codes(
        &self,
        ctx: &RequestContext,
        reference: &StructureRef,
        dimension: &str,
        query: Option<&str>,
        pagination: Pagination,
    ) -> Result<Option<CodePage>> {
        let (_, dsd) = self.structure_of(ctx, reference).await?;
        let dim = dsd.dimension(dimension).ok_or_else(|| ValidationError::UnknownDimension {
            dimension: dimension.to_string(),
            valid: dsd.dimensions.iter().map(|d| d.id.clone()).collect(),
        })?;
        match dim.codelist.clone() {
            Some(codelist) => Ok(Some(self.search_codes(ctx, &codelist, query, pagination).await?)),
            None => Ok(None),
        }
    }

    /// The concept scheme `reference` names.
    pub async fn concept_scheme(&self, ctx: &RequestContext, reference: &StructureRef) -> Result<ConceptScheme> {
        self.client.concept_scheme(ctx, reference).await
    }

    /// Concepts in `scheme` whose id, name or description contains `query`,
    /// one page at a time.
    pub async fn search_concepts(
        &self,
        ctx: &RequestContext,
        scheme: &StructureRef,
        query: Option<&str>,
        pagination: Pagination,
    ) -> Result<ConceptPage> {
        let scheme = self.client.concept_scheme(ctx, scheme).await?;
        let page = discovery::search_concepts(&scheme, query, pagination);
        debug!(scheme = %page.scheme, found = page.total_found, "searched concepts");
        Ok(page)
    }

    /// The category tree of `scheme`, with the dataflows filed under each
    /// category when `include_dataflows` is set.
    ///
    /// Categorisations that cannot be fetched leave the tree without
    /// dataflows rather than failing the call.
    pub async fn browse_category_scheme(
        &self,
        ctx: &RequestContext,
        scheme: &StructureRef,
        include_dataflows: bool,
    ) -> Result<CategoryTree> {
        let scheme = self.client.category_scheme(ctx, scheme).await?;
        let categorisations = if include_dataflows {
            match self.client.categorisations(ctx).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(scheme = %scheme.reference, error = %e, "categorisations unavailable");
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };
        let tree = discovery::browse_categories(&scheme, &categorisations);
        info!(
            scheme = %tree.scheme,
            categories = tree.total_categories,
            categorised = tree.total_categorised,
            "browsed category scheme"
        );
        Ok(tree)
    }

    // =========================================================================
    // Keys and URLs
    // =========================================================================

    /// Check `codes` against the codelist of `dimension`.
    ///
    /// A codelist that cannot be fetched leaves the codes unverified rather
    /// than failing the call.
    pub async fn validate_codes<S: AsRef<str> + Sync>(
        &self,
        ctx: &RequestContext,
        reference: &StructureRef,
        dimension: &str,
        codes: &[S],
    ) -> Result<Vec<CodeCheck>> {
        let (_, dsd) = self.structure_of(ctx, reference).await?;
        let wanted: Vec<&Dimension> = dsd.dimension(dimension).into_iter().collect();
        let codelists = self.codelists_for(ctx, wanted).await;
        Ok(KeyBuilder::new(&dsd)
            .with_codelists(&codelists)
            .check_codes(dimension, codes)?)
    }

    /// Build the data URL for `request` against `dataflow`.
    ///
    /// Unknown codes fail when `strict_codes` is set, ask for confirmation
    /// when the context can confirm, and are otherwise applied with
    /// warnings.
    pub async fn data_url(
        &self,
        ctx: &RequestContext,
        dataflow: &StructureRef,
        request: &DataRequest,
    ) -> Result<Confirmation<DataUrl>> {
        let df = self.client.dataflow(ctx, dataflow).await?;
        let dsd = self.client.data_structure(ctx, &df.structure).await?;
        let wanted: Vec<&Dimension> = dsd
            .key_dimensions()
            .filter(|d| request.values.contains_key(&d.id))
            .collect();
        let codelists = self.codelists_for(ctx, wanted).await;

        let planned = plan_data_url(
            ctx,
            df.reference.as_structure_ref(),
            &dsd,
            &codelists,
            request,
            self.config.strict_codes,
        )?;
        if planned.needs_confirmation() {
            info!(%dataflow, "data url needs confirmation");
        }
        Ok(planned)
    }

    /// Break `key` into per-dimension selections with code names.
    pub async fn explain_key(&self, ctx: &RequestContext, reference: &StructureRef, key: &str) -> Result<Vec<KeyPart>> {
        let (_, dsd) = self.structure_of(ctx, reference).await?;
        let codelists = self.codelists_for(ctx, dsd.key_dimensions().collect()).await;
        Ok(KeyBuilder::new(&dsd).with_codelists(&codelists).explain(key)?)
    }

    // =========================================================================
    // Availability
    // =========================================================================

    /// Values and time range with data, from the dataflow's Actual
    /// constraints.
    pub async fn availability(&self, ctx: &RequestContext, dataflow: &StructureRef) -> Result<AvailabilityReport> {
        let df = self.client.dataflow(ctx, dataflow).await?;
        let dsd = self.client.data_structure(ctx, &df.structure).await?;
        let constraints = self.client.constraints_for(ctx, &df.reference).await?;
        let report = resolve_availability(&dsd, &constraints, Some(df.reference.as_structure_ref()));
        info!(
            dataflow = %df.reference,
            constraints = report.constraints.len(),
            "resolved availability"
        );
        Ok(report)
    }

    /// How much of each dimension's Allowed values actually has data.
    pub async fn coverage(&self, ctx: &RequestContext, dataflow: &StructureRef) -> Result<Vec<DimensionCoverage>> {
        let df = self.client.dataflow(ctx, dataflow).await?;
        let dsd = self.client.data_structure(ctx, &df.structure).await?;
        let constraints = self.client.constraints_for(ctx, &df.reference).await?;
        Ok(constraint_coverage(&dsd, &constraints, Some(df.reference.as_structure_ref())))
    }

    // =========================================================================
    // Comparison and graphs
    // =========================================================================

    /// Diff two codelists by code id and name.
    pub async fn compare_codelists(
        &self,
        ctx: &RequestContext,
        left: &StructureRef,
        right: &StructureRef,
    ) -> Result<StructureDiff> {
        let (left, right) = tokio::try_join!(self.client.codelist(ctx, left), self.client.codelist(ctx, right))?;
        Ok(compare_codelists(&left, &right))
    }

    /// Diff the codelist and concept scheme references of two DSDs. A
    /// dataflow on either side is replaced by its DSD.
    pub async fn compare_data_structures(
        &self,
        ctx: &RequestContext,
        left: &StructureRef,
        right: &StructureRef,
    ) -> Result<StructureDiff> {
        let (left, right) = tokio::try_join!(self.structure_of(ctx, left), self.structure_of(ctx, right))?;
        Ok(compare_data_structures(&left.1, &right.1))
    }

    /// Relationship graph from `root` with the configured depth and labels.
    pub async fn graph(&self, ctx: &RequestContext, root: &StructureRef, direction: Direction) -> Result<StructureGraph> {
        self.graph_with(ctx, root, &GraphOptions::from_config(direction, &self.config))
            .await
    }

    /// Relationship graph from `root` with explicit options.
    pub async fn graph_with(
        &self,
        ctx: &RequestContext,
        root: &StructureRef,
        options: &GraphOptions,
    ) -> Result<StructureGraph> {
        self.graphs.build(ctx, root, options).await
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// The DSD behind `reference`, with the dataflow when `reference` names
    /// one.
    async fn structure_of(
        &self,
        ctx: &RequestContext,
        reference: &StructureRef,
    ) -> Result<(Option<Dataflow>, DataStructure)> {
        if reference.structure_type == StructureType::Dataflow {
            let df = self.client.dataflow(ctx, reference).await?;
            let dsd = self.client.data_structure(ctx, &df.structure).await?;
            Ok((Some(df), dsd))
        } else {
            Ok((None, self.client.data_structure(ctx, reference).await?))
        }
    }

    /// Fetch the codelists of `dimensions`. Failures are logged and skipped;
    /// codes of those dimensions then stay unverified.
    async fn codelists_for(&self, ctx: &RequestContext, dimensions: Vec<&Dimension>) -> Vec<Codelist> {
        let mut references: Vec<StructureRef> = Vec::new();
        for reference in dimensions.into_iter().filter_map(|d| d.codelist.clone()) {
            if !references.contains(&reference) {
                references.push(reference);
            }
        }

        let results = self.client.fetch_all(ctx, references.clone()).await;
        references
            .into_iter()
            .zip(results)
            .filter_map(|(reference, result)| match result {
                Ok(Structure::Codelist(cl)) => Some(cl),
                Ok(_) => None,
                Err(e) => {
                    warn!(%reference, error = %e, "codelist unavailable, codes left unverified");
                    None
                }
            })
            .collect()
    }
}
