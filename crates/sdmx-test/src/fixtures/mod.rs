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

//! SDMX-ML fixtures.
//!
//! - **documents**: valid structure messages for one small domain
//! - **errors**: invalid messages the parser must reject
//! - **builders**: a builder for generated messages

pub mod builders;
mod documents;
pub mod errors;

pub use documents::*;

use crate::FixtureList;

/// Every valid document fixture, for iteration.
pub fn all() -> FixtureList {
    vec![
        ("dataflow_x", dataflow_x),
        ("dataflow_x_prefixed_ref", dataflow_x_prefixed_ref),
        ("dataflow_x_default_namespace", dataflow_x_default_namespace),
        ("dataflow_x_urn", dataflow_x_urn),
        ("dataflow_listing", dataflow_listing),
        ("data_structure_y", data_structure_y),
        ("codelist_freq", codelist_freq),
        ("codelist_geo_v1", codelist_geo_v1),
        ("codelist_geo_v2", codelist_geo_v2),
        ("codelist_geo_all_versions", codelist_geo_all_versions),
        ("codelist_indicator", codelist_indicator),
        ("codelist_unit", codelist_unit),
        ("concept_scheme_common", concept_scheme_common),
        ("constraints_x", constraints_x),
        ("category_scheme_topics", category_scheme_topics),
        ("categorisation_listing", categorisation_listing),
        ("empty_message", empty_message),
    ]
}
