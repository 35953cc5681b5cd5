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

//! SDMX-ML 2.1 structure parsing
//!
//! Turns structure messages into the typed model of `sdmx-core`. Downstream
//! code never touches XML again.
//!
//! # Features
//!
//! - DOM parsing of dataflows, DSDs, codelists, concept schemes, content
//!   constraints, category schemes and categorisations
//!   ([`parse_structures`])
//! - Namespaced, default-namespace and unprefixed `<Ref>` elements, with a
//!   `<URN>` fallback
//! - Dimension position checks (no gaps, no duplicates)
//! - Streaming version listing over `quick-xml` ([`scanner`])
//!
//! # Example
//!
//! ```rust
//! use sdmx_xml::{parse_dataflows, ParseConfig};
//!
//! let xml = r#"<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
//!     xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure">
//!   <mes:Structures><str:Dataflows>
//!     <str:Dataflow id="DF_POP" agencyID="SPC" version="1.0">
//!       <str:Structure><Ref id="DSD_POP" agencyID="SPC" version="1.0" class="DataStructure"/></str:Structure>
//!     </str:Dataflow>
//!   </str:Dataflows></mes:Structures>
//! </mes:Structure>"#;
//!
//! let flows = parse_dataflows(xml, &ParseConfig::default()).unwrap();
//! assert_eq!(flows[0].structure.id, "DSD_POP");
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod config;
mod error;
pub mod parser;
pub mod scanner;

pub use config::{DocumentKind, ParseConfig};
pub use error::{ParseError, Result};
pub use parser::{
    parse_bytes, parse_categorisations, parse_category_schemes, parse_codelists, parse_concept_schemes,
    parse_constraints, parse_data_structures, parse_dataflows, parse_structures,
};
pub use scanner::{scan_artefacts, scan_versions};
