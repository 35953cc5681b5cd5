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

//! Ports to the outside world
//!
//! The engine performs no I/O of its own. A [`StructureFetcher`] returns raw
//! SDMX-ML for a reference; a [`ReverseIndex`] answers "what references
//! this?", which SDMX REST has no native query for.

use crate::error::FetchError;
use async_trait::async_trait;
use sdmx_core::config::EndpointConfig;
use sdmx_core::model::{Structure, StructureSet};
use sdmx_core::reference::{ResolvedRef, StructureRef};
use std::collections::BTreeMap;

/// Fetches SDMX-ML structure messages.
///
/// Implementations own transport concerns: HTTP, timeouts, retries.
/// `latest` references are passed through unchanged; the response may hold
/// one or several versions of the artefact.
#[async_trait]
pub trait StructureFetcher: Send + Sync {
    /// Raw SDMX-ML for `reference` on `endpoint`.
    async fn fetch(
        &self,
        endpoint: &EndpointConfig,
        reference: &StructureRef,
    ) -> Result<Vec<u8>, FetchError>;

    /// Raw SDMX-ML holding the content constraints attached to `dataflow`.
    ///
    /// The default reports [`FetchError::NotFound`], which the engine reads
    /// as "no constraints".
    async fn fetch_constraints(
        &self,
        _endpoint: &EndpointConfig,
        _dataflow: &ResolvedRef,
    ) -> Result<Vec<u8>, FetchError> {
        Err(FetchError::NotFound)
    }
}

/// Answers which structures reference a given one.
#[async_trait]
pub trait ReverseIndex: Send + Sync {
    /// Structures that directly reference `target`.
    async fn references_to(
        &self,
        endpoint: &EndpointConfig,
        target: &ResolvedRef,
    ) -> Result<Vec<StructureRef>, FetchError>;
}

/// REST path for a structure query:
/// `{base}/{resource}/{agency}/{id}/{version}[?references={detail}]`.
///
/// `references` is downgraded to what the endpoint supports.
pub fn structure_url(
    endpoint: &EndpointConfig,
    reference: &StructureRef,
    references: Option<&str>,
) -> String {
    let mut url = format!(
        "{}/{}/{}/{}/{}",
        endpoint.base_url.trim_end_matches('/'),
        reference.structure_type.resource(),
        reference.agency_id,
        reference.id,
        reference.version
    );
    if let Some(detail) = references.and_then(|d| endpoint.best_references(d)) {
        url.push_str("?references=");
        url.push_str(detail);
    }
    url
}

/// A [`ReverseIndex`] built from structures already in hand.
///
/// Every child reference of every added structure is inverted. `latest`
/// child references match any version of their target.
#[derive(Debug, Clone, Default)]
pub struct StructureIndex {
    referrers: BTreeMap<StructureRef, Vec<StructureRef>>,
}

impl StructureIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every structure in `set`.
    pub fn from_set(set: &StructureSet) -> Self {
        let mut index = Self::new();
        for structure in set.iter() {
            index.add(&structure);
        }
        index
    }

    /// Record the outgoing references of `structure`.
    pub fn add(&mut self, structure: &Structure) {
        let referrer = structure.reference().as_structure_ref();
        for (target, _) in structure.children() {
            let entry = self.referrers.entry(target).or_default();
            if !entry.contains(referrer) {
                entry.push(referrer.clone());
            }
        }
    }

    /// Referrers of `target`, sorted.
    pub fn lookup(&self, target: &StructureRef) -> Vec<StructureRef> {
        let mut found: Vec<StructureRef> = self
            .referrers
            .iter()
            .filter(|(child, _)| child.matches(target))
            .flat_map(|(_, referrers)| referrers.iter().cloned())
            .collect();
        found.sort();
        found.dedup();
        found
    }

    /// Number of distinct referenced structures.
    pub fn len(&self) -> usize {
        self.referrers.len()
    }

    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.referrers.is_empty()
    }
}

#[async_trait]
impl ReverseIndex for StructureIndex {
    async fn references_to(
        &self,
        _endpoint: &EndpointConfig,
        target: &ResolvedRef,
    ) -> Result<Vec<StructureRef>, FetchError> {
        Ok(self.lookup(target.as_structure_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdmx_core::model::Dataflow;
    use sdmx_core::reference::StructureType;

    fn dataflow(id: &str, dsd_version: &str) -> Structure {
        Structure::Dataflow(Dataflow {
            reference: ResolvedRef::new(StructureType::Dataflow, "SPC", id, "1.0").unwrap(),
            name: id.to_string(),
            description: None,
            structure: StructureRef::new(StructureType::DataStructure, "SPC", "DSD_Y", dsd_version),
        })
    }

    #[test]
    fn test_structure_url() {
        let endpoint = EndpointConfig::default();
        let reference = StructureRef::latest(StructureType::Codelist, "SPC", "CL_GEO");
        assert_eq!(
            structure_url(&endpoint, &reference, None),
            "https://stats-sdmx-disseminate.pacificdata.org/rest/codelist/SPC/CL_GEO/latest"
        );
        assert!(structure_url(&endpoint, &reference, Some("children")).ends_with("?references=children"));
    }

    #[test]
    fn test_index_inverts_children() {
        let mut index = StructureIndex::new();
        index.add(&dataflow("DF_B", "1.0"));
        index.add(&dataflow("DF_A", "1.0"));
        index.add(&dataflow("DF_A", "1.0"));

        let dsd = StructureRef::new(StructureType::DataStructure, "SPC", "DSD_Y", "1.0");
        let ids: Vec<_> = index.lookup(&dsd).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["DF_A", "DF_B"]);
        assert!(index
            .lookup(&StructureRef::new(StructureType::DataStructure, "SPC", "DSD_Y", "2.0"))
            .is_empty());
    }

    #[test]
    fn test_index_latest_child_matches_any_version() {
        let mut index = StructureIndex::new();
        index.add(&dataflow("DF_A", "latest"));
        let dsd = StructureRef::new(StructureType::DataStructure, "SPC", "DSD_Y", "3.1");
        assert_eq!(index.lookup(&dsd).len(), 1);
    }
}
