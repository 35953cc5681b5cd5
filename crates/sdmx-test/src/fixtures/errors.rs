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

//! Invalid SDMX-ML for parser error testing.

/// Invalid structure messages as (name, xml) pairs. Each must fail to parse.
pub fn invalid_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("malformed", malformed()),
        ("gap_in_positions", gap_in_positions()),
        ("duplicate_positions", duplicate_positions()),
        ("duplicate_codes", duplicate_codes()),
        ("duplicate_concepts", duplicate_concepts()),
        ("dataflow_without_structure", dataflow_without_structure()),
        ("structure_without_ref", structure_without_ref()),
        ("codelist_without_agency", codelist_without_agency()),
        ("constraint_with_bad_type", constraint_with_bad_type()),
        ("duplicate_categories", duplicate_categories()),
        ("categorisation_without_target", categorisation_without_target()),
    ]
}

/// Unclosed elements.
pub fn malformed() -> &'static str {
    r#"<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"><mes:Structures><Codelists>"#
}

/// Positions 1, 2 and 4.
pub fn gap_in_positions() -> &'static str {
    r#"<Structure><Structures><DataStructures>
  <DataStructure id="DSD_GAP" agencyID="SPC" version="1.0">
    <DataStructureComponents><DimensionList>
      <Dimension id="FREQ" position="1"><ConceptIdentity><Ref id="FREQ" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
      <Dimension id="GEO" position="2"><ConceptIdentity><Ref id="GEO" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
      <Dimension id="SEX" position="4"><ConceptIdentity><Ref id="SEX" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
    </DimensionList></DataStructureComponents>
  </DataStructure>
</DataStructures></Structures></Structure>"#
}

/// Two dimensions at position 2.
pub fn duplicate_positions() -> &'static str {
    r#"<Structure><Structures><DataStructures>
  <DataStructure id="DSD_DUP" agencyID="SPC" version="1.0">
    <DataStructureComponents><DimensionList>
      <Dimension id="FREQ" position="1"><ConceptIdentity><Ref id="FREQ" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
      <Dimension id="GEO" position="2"><ConceptIdentity><Ref id="GEO" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
      <Dimension id="SEX" position="2"><ConceptIdentity><Ref id="SEX" maintainableParentID="CS_COMMON" agencyID="SPC"/></ConceptIdentity></Dimension>
    </DimensionList></DataStructureComponents>
  </DataStructure>
</DataStructures></Structures></Structure>"#
}

/// Code `TO` listed twice.
pub fn duplicate_codes() -> &'static str {
    r#"<Structure><Structures><Codelists>
  <Codelist id="CL_GEO" agencyID="SPC" version="1.0">
    <Name>Geo</Name>
    <Code id="TO"><Name>Tonga</Name></Code>
    <Code id="TO"><Name>Tonga again</Name></Code>
  </Codelist>
</Codelists></Structures></Structure>"#
}

/// Concept `FREQ` listed twice.
pub fn duplicate_concepts() -> &'static str {
    r#"<Structure><Structures><Concepts>
  <ConceptScheme id="CS_COMMON" agencyID="SPC" version="1.0">
    <Concept id="FREQ"><Name>Frequency</Name></Concept>
    <Concept id="FREQ"><Name>Frequency</Name></Concept>
  </ConceptScheme>
</Concepts></Structures></Structure>"#
}

/// A dataflow with no `Structure` element.
pub fn dataflow_without_structure() -> &'static str {
    r#"<Structure><Structures><Dataflows>
  <Dataflow id="DF_X" agencyID="SPC" version="1.0"><Name>X</Name></Dataflow>
</Dataflows></Structures></Structure>"#
}

/// A dataflow `Structure` with neither `Ref` nor `URN`.
pub fn structure_without_ref() -> &'static str {
    r#"<Structure><Structures><Dataflows>
  <Dataflow id="DF_X" agencyID="SPC" version="1.0"><Name>X</Name><Structure/></Dataflow>
</Dataflows></Structures></Structure>"#
}

/// A codelist missing `agencyID`.
pub fn codelist_without_agency() -> &'static str {
    r#"<Structure><Structures><Codelists>
  <Codelist id="CL_GEO" version="1.0"><Name>Geo</Name></Codelist>
</Codelists></Structures></Structure>"#
}

/// A constraint whose `type` is neither Actual nor Allowed.
pub fn constraint_with_bad_type() -> &'static str {
    r#"<Structure><Structures><Constraints>
  <ContentConstraint id="CR" agencyID="SPC" version="1.0" type="Sometimes"><Name>CR</Name></ContentConstraint>
</Constraints></Structures></Structure>"#
}

/// Sibling categories `POP` listed twice under `SOC`.
pub fn duplicate_categories() -> &'static str {
    r#"<Structure><Structures><CategorySchemes>
  <CategoryScheme id="CAS_TOPICS" agencyID="SPC" version="1.0">
    <Category id="SOC"><Name>Society</Name>
      <Category id="POP"><Name>Population</Name></Category>
      <Category id="POP"><Name>Population again</Name></Category>
    </Category>
  </CategoryScheme>
</CategorySchemes></Structures></Structure>"#
}

/// A categorisation with a source but no target category.
pub fn categorisation_without_target() -> &'static str {
    r#"<Structure><Structures><Categorisations>
  <Categorisation id="CAT_DF_X" agencyID="SPC" version="1.0">
    <Source><Ref id="DF_X" version="1.0" agencyID="SPC" class="Dataflow"/></Source>
  </Categorisation>
</Categorisations></Structures></Structure>"#
}
