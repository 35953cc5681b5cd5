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

//! Canonical SDMX-ML 2.1 structure messages.
//!
//! The documents describe one small Pacific statistics domain:
//!
//! ```text
//! DF_X ──BasedOn──> DSD_Y ──UsesConcepts──> CS_COMMON
//!   ^                 ├──UsesCodelist──> CL_FREQ, CL_GEO(1.0), CL_INDICATOR, CL_UNIT
//!   └──Constrains── CR_X_ACTUAL, CR_X_ALLOWED
//! DF_DIGITAL ──BasedOn──> DSD_Y
//! CAT_DF_X, CAT_DF_DIGITAL, CAT_DF_TRADE ──FiledUnder──> CAS_TOPICS
//! ```
//!
//! `DSD_Y` lists its dimensions out of order; positions put FREQ first.

/// Dataflow `SPC:DF_X(1.0)`. Its DSD id differs from the dataflow id.
pub fn dataflow_x() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Header>
    <mes:ID>IREF000101</mes:ID>
    <mes:Test>false</mes:Test>
    <mes:Prepared>2024-03-01T10:00:00</mes:Prepared>
    <mes:Sender id="SPC"/>
  </mes:Header>
  <mes:Structures>
    <str:Dataflows>
      <str:Dataflow id="DF_X" agencyID="SPC" version="1.0" isFinal="true"
                    urn="urn:sdmx:org.sdmx.infomodel.datastructure.Dataflow=SPC:DF_X(1.0)">
        <com:Name xml:lang="en">Population by country</com:Name>
        <com:Name xml:lang="fr">Population par pays</com:Name>
        <com:Description xml:lang="en">Mid-year population estimates for Pacific Island countries and territories.</com:Description>
        <str:Structure>
          <Ref id="DSD_Y" version="1.0" agencyID="SPC" package="datastructure" class="DataStructure"/>
        </str:Structure>
      </str:Dataflow>
    </str:Dataflows>
  </mes:Structures>
</mes:Structure>"#
}

/// `DF_X` with a prefixed `<str:Ref>` instead of an unqualified `<Ref>`.
pub fn dataflow_x_prefixed_ref() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Dataflows>
      <str:Dataflow id="DF_X" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Population by country</com:Name>
        <com:Description xml:lang="en">Mid-year population estimates for Pacific Island countries and territories.</com:Description>
        <str:Structure>
          <str:Ref id="DSD_Y" version="1.0" agencyID="SPC" package="datastructure" class="DataStructure"/>
        </str:Structure>
      </str:Dataflow>
    </str:Dataflows>
  </mes:Structures>
</mes:Structure>"#
}

/// `DF_X` in a message whose default namespace is the structure namespace.
pub fn dataflow_x_default_namespace() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<Structure xmlns="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
           xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <Structures>
    <Dataflows>
      <Dataflow id="DF_X" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Population by country</com:Name>
        <com:Description xml:lang="en">Mid-year population estimates for Pacific Island countries and territories.</com:Description>
        <Structure>
          <Ref id="DSD_Y" version="1.0" agencyID="SPC" package="datastructure" class="DataStructure"/>
        </Structure>
      </Dataflow>
    </Dataflows>
  </Structures>
</Structure>"#
}

/// `DF_X` whose DSD is given as a URN.
pub fn dataflow_x_urn() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Dataflows>
      <str:Dataflow id="DF_X" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Population by country</com:Name>
        <com:Description xml:lang="en">Mid-year population estimates for Pacific Island countries and territories.</com:Description>
        <str:Structure>
          <URN>urn:sdmx:org.sdmx.infomodel.datastructure.DataStructure=SPC:DSD_Y(1.0)</URN>
        </str:Structure>
      </str:Dataflow>
    </str:Dataflows>
  </mes:Structures>
</mes:Structure>"#
}

/// Every dataflow of agency SPC (`/dataflow/SPC/all/latest`).
pub fn dataflow_listing() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Dataflows>
      <str:Dataflow id="DF_X" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Population by country</com:Name>
        <com:Description xml:lang="en">Mid-year population estimates for Pacific Island countries and territories.</com:Description>
        <str:Structure><Ref id="DSD_Y" version="1.0" agencyID="SPC" class="DataStructure"/></str:Structure>
      </str:Dataflow>
      <str:Dataflow id="DF_DIGITAL" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Digital development</com:Name>
        <com:Description xml:lang="en">Internet users, mobile subscriptions and digital access indicators reported by national statistics offices across the Pacific region.</com:Description>
        <str:Structure><Ref id="DSD_Y" version="1.0" agencyID="SPC" class="DataStructure"/></str:Structure>
      </str:Dataflow>
      <str:Dataflow id="DF_TRADE" agencyID="SPC" version="2.0">
        <com:Name xml:lang="en">International merchandise trade</com:Name>
        <str:Structure><Ref id="DSD_TRADE" version="2.0" agencyID="SPC" class="DataStructure"/></str:Structure>
      </str:Dataflow>
    </str:Dataflows>
  </mes:Structures>
</mes:Structure>"#
}

/// DSD `SPC:DSD_Y(1.0)` with 1-based positions listed out of order.
pub fn data_structure_y() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:DataStructures>
      <str:DataStructure id="DSD_Y" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Pacific population structure</com:Name>
        <str:DataStructureComponents>
          <str:DimensionList id="DimensionDescriptor">
            <str:Dimension id="GEO" position="2">
              <str:ConceptIdentity>
                <Ref id="GEO" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
              <str:LocalRepresentation>
                <str:Enumeration><Ref id="CL_GEO" version="1.0" agencyID="SPC" package="codelist" class="Codelist"/></str:Enumeration>
              </str:LocalRepresentation>
            </str:Dimension>
            <str:Dimension id="FREQ" position="1">
              <str:ConceptIdentity>
                <Ref id="FREQ" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
              <str:LocalRepresentation>
                <str:Enumeration><Ref id="CL_FREQ" version="1.0" agencyID="SPC" package="codelist" class="Codelist"/></str:Enumeration>
              </str:LocalRepresentation>
            </str:Dimension>
            <str:Dimension id="INDICATOR" position="3">
              <str:ConceptIdentity>
                <URN>urn:sdmx:org.sdmx.infomodel.conceptscheme.Concept=SPC:CS_COMMON(1.0).INDICATOR</URN>
              </str:ConceptIdentity>
              <str:LocalRepresentation>
                <str:Enumeration><Ref id="CL_INDICATOR" version="1.0" agencyID="SPC" package="codelist" class="Codelist"/></str:Enumeration>
              </str:LocalRepresentation>
            </str:Dimension>
            <str:TimeDimension id="TIME_PERIOD" position="4">
              <str:ConceptIdentity>
                <Ref id="TIME_PERIOD" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
            </str:TimeDimension>
          </str:DimensionList>
          <str:AttributeList id="AttributeDescriptor">
            <str:Attribute id="UNIT_MEASURE" assignmentStatus="Conditional">
              <str:ConceptIdentity>
                <Ref id="UNIT_MEASURE" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
              <str:LocalRepresentation>
                <str:Enumeration><Ref id="CL_UNIT" version="1.0" agencyID="SPC" package="codelist" class="Codelist"/></str:Enumeration>
              </str:LocalRepresentation>
              <str:AttributeRelationship>
                <str:Dimension><Ref id="FREQ"/></str:Dimension>
                <str:Dimension><Ref id="INDICATOR"/></str:Dimension>
              </str:AttributeRelationship>
            </str:Attribute>
            <str:Attribute id="OBS_STATUS" assignmentStatus="Mandatory">
              <str:ConceptIdentity>
                <Ref id="OBS_STATUS" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
              <str:AttributeRelationship>
                <str:PrimaryMeasure><Ref id="OBS_VALUE"/></str:PrimaryMeasure>
              </str:AttributeRelationship>
            </str:Attribute>
          </str:AttributeList>
          <str:MeasureList id="MeasureDescriptor">
            <str:PrimaryMeasure id="OBS_VALUE">
              <str:ConceptIdentity>
                <Ref id="OBS_VALUE" maintainableParentID="CS_COMMON" maintainableParentVersion="1.0" agencyID="SPC" package="conceptscheme" class="Concept"/>
              </str:ConceptIdentity>
            </str:PrimaryMeasure>
          </str:MeasureList>
        </str:DataStructureComponents>
      </str:DataStructure>
    </str:DataStructures>
  </mes:Structures>
</mes:Structure>"#
}

/// Codelist `SPC:CL_FREQ(1.0)`.
pub fn codelist_freq() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_FREQ" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Frequency</com:Name>
        <str:Code id="A"><com:Name xml:lang="en">Annual</com:Name></str:Code>
        <str:Code id="Q"><com:Name xml:lang="en">Quarterly</com:Name></str:Code>
        <str:Code id="M"><com:Name xml:lang="en">Monthly</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Codelist `SPC:CL_GEO(1.0)`.
pub fn codelist_geo_v1() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Pacific Island countries and territories</com:Name>
        <str:Code id="TO"><com:Name xml:lang="en">Tonga</com:Name></str:Code>
        <str:Code id="FJ"><com:Name xml:lang="en">Fiji</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Codelist `SPC:CL_GEO(2.0)`: TO renamed, PW added.
pub fn codelist_geo_v2() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="2.0">
        <com:Name xml:lang="en">Pacific Island countries and territories</com:Name>
        <str:Code id="TO"><com:Name xml:lang="en">Tonga (Kingdom of)</com:Name></str:Code>
        <str:Code id="FJ"><com:Name xml:lang="en">Fiji</com:Name></str:Code>
        <str:Code id="PW"><com:Name xml:lang="en">Palau</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Both versions of `CL_GEO`, as returned for `/codelist/SPC/CL_GEO/latest`
/// by providers that ignore `latest`.
pub fn codelist_geo_all_versions() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Pacific Island countries and territories</com:Name>
        <str:Code id="TO"><com:Name xml:lang="en">Tonga</com:Name></str:Code>
        <str:Code id="FJ"><com:Name xml:lang="en">Fiji</com:Name></str:Code>
      </str:Codelist>
      <str:Codelist id="CL_GEO" agencyID="SPC" version="2.0">
        <com:Name xml:lang="en">Pacific Island countries and territories</com:Name>
        <str:Code id="TO"><com:Name xml:lang="en">Tonga (Kingdom of)</com:Name></str:Code>
        <str:Code id="FJ"><com:Name xml:lang="en">Fiji</com:Name></str:Code>
        <str:Code id="PW"><com:Name xml:lang="en">Palau</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Codelist `SPC:CL_INDICATOR(1.0)` with a two-level hierarchy.
pub fn codelist_indicator() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_INDICATOR" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Indicators</com:Name>
        <str:Code id="POP">
          <com:Name xml:lang="en">Population</com:Name>
          <com:Description xml:lang="en">Mid-year population estimate</com:Description>
        </str:Code>
        <str:Code id="POP_URBAN">
          <com:Name xml:lang="en">Urban population</com:Name>
          <str:Parent><Ref id="POP"/></str:Parent>
        </str:Code>
        <str:Code id="NET_USERS"><com:Name xml:lang="en">Internet users</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Codelist `SPC:CL_UNIT(1.0)`.
pub fn codelist_unit() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Codelists>
      <str:Codelist id="CL_UNIT" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Units of measure</com:Name>
        <str:Code id="PERSONS"><com:Name xml:lang="en">Persons</com:Name></str:Code>
        <str:Code id="PERCENT"><com:Name xml:lang="en">Percent</com:Name></str:Code>
      </str:Codelist>
    </str:Codelists>
  </mes:Structures>
</mes:Structure>"#
}

/// Concept scheme `SPC:CS_COMMON(1.0)`.
pub fn concept_scheme_common() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Concepts>
      <str:ConceptScheme id="CS_COMMON" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Common concepts</com:Name>
        <str:Concept id="FREQ"><com:Name xml:lang="en">Frequency</com:Name></str:Concept>
        <str:Concept id="GEO">
          <com:Name xml:lang="en">Geographic area</com:Name>
          <com:Description xml:lang="en">Country or territory the data refer to.</com:Description>
        </str:Concept>
        <str:Concept id="INDICATOR">
          <com:Name xml:lang="en">Indicator</com:Name>
          <com:Description xml:lang="en">Statistical measure, such as mid-year population or internet users.</com:Description>
        </str:Concept>
        <str:Concept id="TIME_PERIOD"><com:Name xml:lang="en">Time period</com:Name></str:Concept>
        <str:Concept id="UNIT_MEASURE"><com:Name xml:lang="en">Unit of measure</com:Name></str:Concept>
        <str:Concept id="OBS_STATUS"><com:Name xml:lang="en">Observation status</com:Name></str:Concept>
        <str:Concept id="OBS_VALUE"><com:Name xml:lang="en">Observation value</com:Name></str:Concept>
      </str:ConceptScheme>
    </str:Concepts>
  </mes:Structures>
</mes:Structure>"#
}

/// The Actual and Allowed constraints attached to `DF_X`.
pub fn constraints_x() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Constraints>
      <str:ContentConstraint id="CR_X_ACTUAL" agencyID="SPC" version="1.0" type="Actual">
        <com:Name xml:lang="en">Availability of DF_X</com:Name>
        <str:ConstraintAttachment>
          <str:Dataflow><Ref id="DF_X" version="1.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Dataflow>
        </str:ConstraintAttachment>
        <str:CubeRegion include="true">
          <com:KeyValue id="FREQ"><com:Value>A</com:Value></com:KeyValue>
          <com:KeyValue id="GEO"><com:Value>TO</com:Value><com:Value>FJ</com:Value></com:KeyValue>
          <com:KeyValue id="INDICATOR"><com:Value>POP</com:Value><com:Value>POP_URBAN</com:Value></com:KeyValue>
          <com:KeyValue id="TIME_PERIOD">
            <com:TimeRange>
              <com:StartPeriod isInclusive="true">2000</com:StartPeriod>
              <com:EndPeriod isInclusive="true">2020</com:EndPeriod>
            </com:TimeRange>
          </com:KeyValue>
        </str:CubeRegion>
        <str:CubeRegion include="false">
          <com:KeyValue id="INDICATOR"><com:Value>POP_URBAN</com:Value></com:KeyValue>
        </str:CubeRegion>
      </str:ContentConstraint>
      <str:ContentConstraint id="CR_X_ALLOWED" agencyID="SPC" version="1.0" type="Allowed">
        <com:Name xml:lang="en">Allowed content of DF_X</com:Name>
        <str:ConstraintAttachment>
          <str:Dataflow><Ref id="DF_X" version="1.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Dataflow>
        </str:ConstraintAttachment>
        <str:CubeRegion include="true">
          <com:KeyValue id="FREQ"><com:Value>A</com:Value><com:Value>Q</com:Value></com:KeyValue>
          <com:KeyValue id="GEO"><com:Value>TO</com:Value><com:Value>FJ</com:Value><com:Value>PW</com:Value></com:KeyValue>
        </str:CubeRegion>
      </str:ContentConstraint>
    </str:Constraints>
  </mes:Structures>
</mes:Structure>"#
}

/// Category scheme `SPC:CAS_TOPICS(1.0)`: two topics with sub-topics.
pub fn category_scheme_topics() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:CategorySchemes>
      <str:CategoryScheme id="CAS_TOPICS" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">Pacific statistics by topic</com:Name>
        <str:Category id="ECO">
          <com:Name xml:lang="en">Economy</com:Name>
          <str:Category id="TRADE"><com:Name xml:lang="en">International trade</com:Name></str:Category>
          <str:Category id="PRICES"><com:Name xml:lang="en">Prices</com:Name></str:Category>
        </str:Category>
        <str:Category id="SOC">
          <com:Name xml:lang="en">Population and society</com:Name>
          <com:Description xml:lang="en">Demography, census and digital access.</com:Description>
          <str:Category id="POP"><com:Name xml:lang="en">Population</com:Name></str:Category>
          <str:Category id="DIGITAL"><com:Name xml:lang="en">Digital development</com:Name></str:Category>
        </str:Category>
      </str:CategoryScheme>
    </str:CategorySchemes>
  </mes:Structures>
</mes:Structure>"#
}

/// Every categorisation of agency SPC (`/categorisation/SPC/all/latest`).
///
/// `CAT_DF_X_OTHER` files `DF_X` under a scheme other than `CAS_TOPICS`.
pub fn categorisation_listing() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message"
               xmlns:str="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/structure"
               xmlns:com="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/common">
  <mes:Structures>
    <str:Categorisations>
      <str:Categorisation id="CAT_DF_X" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">DF_X in Population</com:Name>
        <str:Source><Ref id="DF_X" version="1.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Source>
        <str:Target><Ref id="SOC.POP" maintainableParentID="CAS_TOPICS" maintainableParentVersion="1.0" agencyID="SPC" package="categoryscheme" class="Category"/></str:Target>
      </str:Categorisation>
      <str:Categorisation id="CAT_DF_DIGITAL" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">DF_DIGITAL in Digital development</com:Name>
        <str:Source><Ref id="DF_DIGITAL" version="1.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Source>
        <str:Target><Ref id="DIGITAL" maintainableParentID="CAS_TOPICS" maintainableParentVersion="1.0" agencyID="SPC" package="categoryscheme" class="Category"/></str:Target>
      </str:Categorisation>
      <str:Categorisation id="CAT_DF_TRADE" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">DF_TRADE in International trade</com:Name>
        <str:Source><Ref id="DF_TRADE" version="2.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Source>
        <str:Target><URN>urn:sdmx:org.sdmx.infomodel.categoryscheme.Category=SPC:CAS_TOPICS(1.0).ECO.TRADE</URN></str:Target>
      </str:Categorisation>
      <str:Categorisation id="CAT_DF_X_OTHER" agencyID="SPC" version="1.0">
        <com:Name xml:lang="en">DF_X in another scheme</com:Name>
        <str:Source><Ref id="DF_X" version="1.0" agencyID="SPC" package="datastructure" class="Dataflow"/></str:Source>
        <str:Target><Ref id="POP" maintainableParentID="CAS_SDG" maintainableParentVersion="1.0" agencyID="SPC" package="categoryscheme" class="Category"/></str:Target>
      </str:Categorisation>
    </str:Categorisations>
  </mes:Structures>
</mes:Structure>"#
}

/// A structure message with an empty `Structures` element.
pub fn empty_message() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<mes:Structure xmlns:mes="http://www.sdmx.org/resources/sdmxml/schemas/v2_1/message">
  <mes:Header><mes:ID>IREF000000</mes:ID><mes:Test>false</mes:Test></mes:Header>
  <mes:Structures/>
</mes:Structure>"#
}
