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

//! Typed structural model and pure analyses for SDMX metadata.
//!
//! This crate provides:
//! - Structure references with `latest` resolution ([`StructureRef`],
//!   [`ResolvedRef`], [`resolver`])
//! - The typed model produced by the parser ([`model`])
//! - Keyword discovery, pagination and summaries ([`discovery`])
//! - Series keys and data URLs ([`key`], [`url`])
//! - Availability from content constraints ([`availability`])
//! - Codelist and DSD comparison ([`compare`])
//!
//! Nothing here performs I/O. Fetching and graph traversal live in
//! `sdmx-engine`; XML parsing lives in `sdmx-xml`.
//!
//! # Example: building a key
//!
//! ```rust
//! use sdmx_core::key::{build_key, DimensionValues};
//! use sdmx_core::model::DataStructure;
//!
//! fn example(dsd: &DataStructure) -> sdmx_core::Result<String> {
//!     let mut values = DimensionValues::new();
//!     values.insert("GEO".to_string(), vec!["TO".to_string()]);
//!     values.insert("FREQ".to_string(), vec!["A".to_string()]);
//!     Ok(build_key(dsd, &values)?.to_string())
//! }
//! ```
//!
//! # Mapping Strategy
//!
//! | SDMX-ML | Model |
//! |---------|-------|
//! | `str:Dataflow` + `str:Structure/Ref` | [`model::Dataflow`] |
//! | `str:DataStructure` | [`model::DataStructure`] |
//! | `str:Dimension` / `str:TimeDimension` / `str:MeasureDimension` | [`model::Dimension`] |
//! | `str:Codelist` / `str:Code` | [`model::Codelist`] / [`model::Code`] |
//! | `str:ConceptScheme` | [`model::ConceptScheme`] |
//! | `str:ContentConstraint` | [`model::ContentConstraint`] |
//! | `str:CategoryScheme` / `str:Category` | [`model::CategoryScheme`] / [`model::Category`] |
//! | `str:Categorisation` | [`model::Categorisation`] |

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod availability;
pub mod compare;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod key;
pub mod model;
pub mod period;
pub mod reference;
pub mod resolver;
pub mod url;

pub use availability::{constraint_coverage, resolve_availability, AvailabilityReport};
pub use compare::{compare_codelists, compare_data_structures, StructureDiff};
pub use config::{EndpointConfig, EngineConfig, EngineConfigBuilder};
pub use context::{Confirmation, RequestContext};
pub use discovery::{
    discover_dataflows, filter_dataflows, paginate, search_codes, search_concepts, Pagination, StructureSummary,
};
pub use error::{Result, ValidationError, VersionResolutionError};
pub use key::{build_key, explain_key, parse_key, DataKey, KeyBuilder};
pub use model::{
    Categorisation, Category, CategoryScheme, Code, Codelist, ConceptScheme, ContentConstraint,
    DataStructure, Dataflow, Dimension, Relation, Structure, StructureSet,
};
pub use reference::{ResolvedRef, StructureRef, StructureType, Version};
pub use resolver::{compare_versions, resolve, Resolution};
pub use url::{build_data_url, plan_data_url, DataFormat, DataUrl};
