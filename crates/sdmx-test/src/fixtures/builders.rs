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

//! Builder for SDMX-ML structure messages.

use std::fmt::Write;

const MESSAGE_NS: &str = "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message";
const STRUCTURE_NS: &str = "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure";
const COMMON_NS: &str = "http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common";

/// One DSD dimension for [`MessageBuilder::data_structure`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionSpec {
    /// Dimension id; the concept has the same id in `CS_COMMON`.
    pub id: String,
    /// Raw `position` attribute, omitted when `None`.
    pub position: Option<String>,
    /// Codelist id enumerating the dimension.
    pub codelist: Option<String>,
    /// Emit a `TimeDimension` instead of a `Dimension`.
    pub time: bool,
}

impl DimensionSpec {
    /// A coded dimension at `position`.
    pub fn coded(id: &str, position: usize, codelist: &str) -> Self {
        Self {
            id: id.to_string(),
            position: Some(position.to_string()),
            codelist: Some(codelist.to_string()),
            time: false,
        }
    }

    /// A time dimension at `position`.
    pub fn time(id: &str, position: usize) -> Self {
        Self {
            id: id.to_string(),
            position: Some(position.to_string()),
            codelist: None,
            time: true,
        }
    }

    /// A dimension with no `position` attribute.
    pub fn unpositioned(id: &str) -> Self {
        Self {
            id: id.to_string(),
            position: None,
            codelist: None,
            time: false,
        }
    }
}

/// Builder for a structure message with the usual `mes`/`str`/`com`
/// prefixes. Sections are emitted in SDMX order whatever the call order.
///
/// # Examples
///
/// ```
/// use sdmx_test::fixtures::builders::MessageBuilder;
///
/// let xml = MessageBuilder::new()
///     .codelist("CL_FREQ", "1.0", &[("A", "Annual"), ("M", "Monthly")])
///     .build();
///
/// assert!(xml.contains(r#"<str:Code id="M">"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    agency: String,
    dataflows: String,
    codelists: String,
    concepts: String,
    data_structures: String,
    constraints: String,
}

impl MessageBuilder {
    /// A builder for agency `SPC`.
    pub fn new() -> Self {
        Self::for_agency("SPC")
    }

    /// A builder for another maintenance agency.
    pub fn for_agency(agency: &str) -> Self {
        Self {
            agency: agency.to_string(),
            ..Self::default()
        }
    }

    /// Add a dataflow pointing at `dsd` version `dsd_version`.
    pub fn dataflow(mut self, id: &str, name: &str, dsd: &str, dsd_version: &str) -> Self {
        let _ = write!(
            self.dataflows,
            r#"<str:Dataflow id="{id}" agencyID="{agency}" version="1.0" isFinal="true"><com:Name xml:lang="en">{name}</com:Name><str:Structure><Ref id="{dsd}" version="{dsd_version}" agencyID="{agency}" package="datastructure" class="DataStructure"/></str:Structure></str:Dataflow>"#,
            agency = self.agency
        );
        self
    }

    /// Add a codelist.
    pub fn codelist(mut self, id: &str, version: &str, codes: &[(&str, &str)]) -> Self {
        let _ = write!(
            self.codelists,
            r#"<str:Codelist id="{id}" agencyID="{agency}" version="{version}"><com:Name xml:lang="en">{id}</com:Name>"#,
            agency = self.agency
        );
        for (code, name) in codes {
            let _ = write!(
                self.codelists,
                r#"<str:Code id="{code}"><com:Name xml:lang="en">{name}</com:Name></str:Code>"#
            );
        }
        self.codelists.push_str("</str:Codelist>");
        self
    }

    /// Add a concept scheme.
    pub fn concept_scheme(mut self, id: &str, concepts: &[(&str, &str)]) -> Self {
        let _ = write!(
            self.concepts,
            r#"<str:ConceptScheme id="{id}" agencyID="{agency}" version="1.0"><com:Name xml:lang="en">{id}</com:Name>"#,
            agency = self.agency
        );
        for (concept, name) in concepts {
            let _ = write!(
                self.concepts,
                r#"<str:Concept id="{concept}"><com:Name xml:lang="en">{name}</com:Name></str:Concept>"#
            );
        }
        self.concepts.push_str("</str:ConceptScheme>");
        self
    }

    /// Add a DSD whose concepts live in `CS_COMMON` 1.0. Dimensions are
    /// written in the order given.
    pub fn data_structure(mut self, id: &str, dimensions: &[DimensionSpec]) -> Self {
        let agency = self.agency.clone();
        let _ = write!(
            self.data_structures,
            r#"<str:DataStructure id="{id}" agencyID="{agency}" version="1.0"><com:Name xml:lang="en">{id}</com:Name><str:DataStructureComponents><str:DimensionList id="DimensionDescriptor">"#
        );
        for dim in dimensions {
            let element = if dim.time { "TimeDimension" } else { "Dimension" };
            let position = dim
                .position
                .as_ref()
                .map(|p| format!(r#" position="{p}""#))
                .unwrap_or_default();
            let _ = write!(
                self.data_structures,
                r#"<str:{element} id="{dim_id}"{position}><str:ConceptIdentity><Ref id="{dim_id}" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="{agency}" package="conceptscheme" class="Concept"/></str:ConceptIdentity>"#,
                dim_id = dim.id
            );
            if let Some(codelist) = &dim.codelist {
                let _ = write!(
                    self.data_structures,
                    r#"<str:LocalRepresentation><str:Enumeration><Ref id="{codelist}" version="1.0" agencyID="{agency}" package="codelist" class="Codelist"/></str:Enumeration></str:LocalRepresentation>"#
                );
            }
            let _ = write!(self.data_structures, "</str:{element}>");
        }
        self.data_structures
            .push_str("</str:DimensionList></str:DataStructureComponents></str:DataStructure>");
        self
    }

    /// Add an `Actual` constraint on dataflow `dataflow` with one include
    /// region.
    pub fn actual_constraint(mut self, id: &str, dataflow: &str, values: &[(&str, &[&str])]) -> Self {
        let _ = write!(
            self.constraints,
            r#"<str:ContentConstraint id="{id}" agencyID="{agency}" version="1.0" type="Actual"><com:Name xml:lang="en">{id}</com:Name><str:ConstraintAttachment><str:Dataflow><Ref id="{dataflow}" version="1.0" agencyID="{agency}" package="datastructure" class="Dataflow"/></str:Dataflow></str:ConstraintAttachment><str:CubeRegion include="true">"#,
            agency = self.agency
        );
        for (dimension, codes) in values {
            let _ = write!(self.constraints, r#"<com:KeyValue id="{dimension}">"#);
            for code in codes.iter() {
                let _ = write!(self.constraints, "<com:Value>{code}</com:Value>");
            }
            self.constraints.push_str("</com:KeyValue>");
        }
        self.constraints.push_str("</str:CubeRegion></str:ContentConstraint>");
        self
    }

    /// Render the message.
    pub fn build(self) -> String {
        let mut out = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><mes:Structure xmlns:mes="{MESSAGE_NS}" xmlns:str="{STRUCTURE_NS}" xmlns:com="{COMMON_NS}"><mes:Header><mes:ID>IREF000001</mes:ID><mes:Test>false</mes:Test><mes:Prepared>2024-01-01T00:00:00</mes:Prepared><mes:Sender id="{agency}"/></mes:Header><mes:Structures>"#,
            agency = self.agency
        );
        let sections = [
            ("Dataflows", &self.dataflows),
            ("Codelists", &self.codelists),
            ("Concepts", &self.concepts),
            ("DataStructures", &self.data_structures),
            ("Constraints", &self.constraints),
        ];
        for (section, body) in sections {
            if !body.is_empty() {
                let _ = write!(out, "<str:{section}>{body}</str:{section}>");
            }
        }
        out.push_str("</mes:Structures></mes:Structure>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_message_has_no_sections() {
        let xml = MessageBuilder::new().build();
        assert!(xml.contains("<mes:Structures></mes:Structures>"));
    }

    #[test]
    fn test_sections_in_sdmx_order() {
        let xml = MessageBuilder::new()
            .data_structure("DSD", &[DimensionSpec::unpositioned("A")])
            .dataflow("DF", "Flow", "DSD", "1.0")
            .build();
        let flows = xml.find("<str:Dataflows>").unwrap();
        let dsds = xml.find("<str:DataStructures>").unwrap();
        assert!(flows < dsds);
    }
}
