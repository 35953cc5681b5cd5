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

//! Shared SDMX-ML fixtures for the sdmx crates.
//!
//! # Quick Start
//!
//! ```rust
//! use sdmx_test::fixtures;
//!
//! let xml = fixtures::data_structure_y();
//! assert!(xml.contains(r#"id="DSD_Y""#));
//!
//! for (name, invalid) in fixtures::errors::invalid_samples() {
//!     assert!(!invalid.is_empty(), "{name}");
//! }
//!
//! // Documents keyed by the reference a fetcher would be asked for
//! let catalog = sdmx_test::catalog();
//! assert!(!catalog.is_empty());
//! ```

use sdmx_core::reference::{StructureRef, StructureType};

/// Type alias for a list of fixture functions (name, generator).
pub type FixtureList = Vec<(&'static str, fn() -> &'static str)>;

/// Canonical SDMX-ML documents.
pub mod fixtures;

pub use fixtures::*;

/// Agency of every catalog structure.
pub const AGENCY: &str = "SPC";

/// Documents keyed by the reference that returns them, the way a REST
/// endpoint would answer `/{resource}/{agency}/{id}/{version}`.
///
/// `CL_GEO` is also served for `latest`, returning both versions;
/// `CAS_TOPICS` is served for `latest` as well.
pub fn catalog() -> Vec<(StructureRef, &'static str)> {
    let concrete = |t, id: &str| StructureRef::new(t, AGENCY, id, "1.0");
    vec![
        (concrete(StructureType::Dataflow, "DF_X"), dataflow_x()),
        (StructureRef::new(StructureType::Dataflow, AGENCY, "all", "latest"), dataflow_listing()),
        (concrete(StructureType::DataStructure, "DSD_Y"), data_structure_y()),
        (concrete(StructureType::Codelist, "CL_FREQ"), codelist_freq()),
        (concrete(StructureType::Codelist, "CL_GEO"), codelist_geo_v1()),
        (StructureRef::new(StructureType::Codelist, AGENCY, "CL_GEO", "2.0"), codelist_geo_v2()),
        (StructureRef::latest(StructureType::Codelist, AGENCY, "CL_GEO"), codelist_geo_all_versions()),
        (concrete(StructureType::Codelist, "CL_INDICATOR"), codelist_indicator()),
        (concrete(StructureType::Codelist, "CL_UNIT"), codelist_unit()),
        (concrete(StructureType::ConceptScheme, "CS_COMMON"), concept_scheme_common()),
        (concrete(StructureType::ContentConstraint, "CR_X_ACTUAL"), constraints_x()),
        (concrete(StructureType::ContentConstraint, "CR_X_ALLOWED"), constraints_x()),
        (concrete(StructureType::CategoryScheme, "CAS_TOPICS"), category_scheme_topics()),
        (StructureRef::latest(StructureType::CategoryScheme, AGENCY, "CAS_TOPICS"), category_scheme_topics()),
        (StructureRef::latest(StructureType::Categorisation, AGENCY, "all"), categorisation_listing()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fixtures_are_structure_messages() {
        for (name, fixture) in fixtures::all() {
            assert!(fixture().contains("Structures"), "fixture {name} has no Structures element");
        }
    }

    #[test]
    fn test_catalog_keys_are_unique() {
        let catalog = catalog();
        for (i, (a, _)) in catalog.iter().enumerate() {
            assert!(
                catalog.iter().skip(i + 1).all(|(b, _)| a != b),
                "duplicate catalog key {a}"
            );
        }
    }

    #[test]
    fn test_invalid_samples_are_named_uniquely() {
        let samples = errors::invalid_samples();
        let mut names: Vec<_> = samples.iter().map(|(n, _)| *n).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), samples.len());
    }
}
