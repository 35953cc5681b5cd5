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

//! DOM-based SDMX-ML structure parser
//!
//! Sections are located by local name, so `<str:Ref>`, `<Ref>` and a `<Ref>`
//! under a default namespace all parse to the same [`StructureRef`].
//!
//! # Positions
//!
//! SDMX-ML numbers dimensions from 1, some providers from 0. Either base is
//! accepted and normalised to 0. Gaps, duplicates and a mix of positioned
//! and unpositioned dimensions are errors. With no `position` attributes at
//! all, document order is used.

use crate::config::{DocumentKind, ParseConfig};
use crate::error::{ParseError, Result};
use roxmltree::{Document, Node};
use sdmx_core::model::{
    AttachmentLevel, Attribute, Categorisation, Category, CategoryRef, CategoryScheme, Code, Codelist,
    ConceptRef, ConceptScheme, ConstraintType, ContentConstraint, CubeRegion, DataStructure, Dataflow,
    Dimension, DimensionKind, PrimaryMeasure, StructureSet, TimeRange,
};
use sdmx_core::period::parse_period;
use sdmx_core::reference::{ResolvedRef, StructureRef, StructureType, Version};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Version assumed when a maintainable omits `version`.
pub const DEFAULT_VERSION: &str = "1.0";

/// Parse every structure of `kind` in an SDMX-ML structure message.
///
/// A document with no matching structures yields an empty set.
///
/// # Example
///
/// ```rust
/// use sdmx_xml::{parse_structures, DocumentKind, ParseConfig};
///
/// let xml = r#"<Structure><Structures><Codelists>
///   <Codelist id="CL_FREQ" agencyID="SPC" version="1.0">
///     <Name xml:lang="en">Frequency</Name>
///     <Code id="A"><Name xml:lang="en">Annual</Name></Code>
///   </Codelist>
/// </Codelists></Structures></Structure>"#;
///
/// let set = parse_structures(xml, DocumentKind::All, &ParseConfig::default()).unwrap();
/// assert_eq!(set.codelists[0].codes[0].name, "Annual");
/// ```
pub fn parse_structures(xml: &str, kind: DocumentKind, config: &ParseConfig) -> Result<StructureSet> {
    let doc = Document::parse(xml)?;
    let parser = Parser { config };
    let mut set = StructureSet::default();

    for section in doc.descendants().filter(|n| n.is_element()) {
        match section.tag_name().name() {
            "Dataflows" if kind.includes(StructureType::Dataflow) => {
                for node in children(section, "Dataflow") {
                    set.dataflows.push(parser.dataflow(node)?);
                }
            }
            "DataStructures" if kind.includes(StructureType::DataStructure) => {
                for node in children(section, "DataStructure") {
                    set.data_structures.push(parser.data_structure(node)?);
                }
            }
            "Codelists" if kind.includes(StructureType::Codelist) => {
                for node in children(section, "Codelist") {
                    set.codelists.push(parser.codelist(node)?);
                }
            }
            "Concepts" if kind.includes(StructureType::ConceptScheme) => {
                for node in children(section, "ConceptScheme") {
                    set.concept_schemes.push(parser.concept_scheme(node)?);
                }
            }
            "Constraints" if kind.includes(StructureType::ContentConstraint) => {
                for node in children(section, "ContentConstraint") {
                    set.constraints.push(parser.constraint(node)?);
                }
            }
            "CategorySchemes" if kind.includes(StructureType::CategoryScheme) => {
                for node in children(section, "CategoryScheme") {
                    set.category_schemes.push(parser.category_scheme(node)?);
                }
            }
            "Categorisations" if kind.includes(StructureType::Categorisation) => {
                for node in children(section, "Categorisation") {
                    set.categorisations.push(parser.categorisation(node)?);
                }
            }
            _ => {}
        }
    }

    Ok(set)
}

/// Parse raw response bytes. Non-UTF-8 input is malformed.
pub fn parse_bytes(bytes: &[u8], kind: DocumentKind, config: &ParseConfig) -> Result<StructureSet> {
    let xml = std::str::from_utf8(bytes).map_err(|e| ParseError::MalformedXml {
        message: e.to_string(),
    })?;
    parse_structures(xml, kind, config)
}

/// Parse only the dataflows of a document.
pub fn parse_dataflows(xml: &str, config: &ParseConfig) -> Result<Vec<Dataflow>> {
    Ok(parse_structures(xml, StructureType::Dataflow.into(), config)?.dataflows)
}

/// Parse only the data structure definitions of a document.
pub fn parse_data_structures(xml: &str, config: &ParseConfig) -> Result<Vec<DataStructure>> {
    Ok(parse_structures(xml, StructureType::DataStructure.into(), config)?.data_structures)
}

/// Parse only the codelists of a document.
pub fn parse_codelists(xml: &str, config: &ParseConfig) -> Result<Vec<Codelist>> {
    Ok(parse_structures(xml, StructureType::Codelist.into(), config)?.codelists)
}

/// Parse only the concept schemes of a document.
pub fn parse_concept_schemes(xml: &str, config: &ParseConfig) -> Result<Vec<ConceptScheme>> {
    Ok(parse_structures(xml, StructureType::ConceptScheme.into(), config)?.concept_schemes)
}

/// Parse only the content constraints of a document.
pub fn parse_constraints(xml: &str, config: &ParseConfig) -> Result<Vec<ContentConstraint>> {
    Ok(parse_structures(xml, StructureType::ContentConstraint.into(), config)?.constraints)
}

/// Parse only the category schemes of a document.
pub fn parse_category_schemes(xml: &str, config: &ParseConfig) -> Result<Vec<CategoryScheme>> {
    Ok(parse_structures(xml, StructureType::CategoryScheme.into(), config)?.category_schemes)
}

/// Parse only the categorisations of a document.
pub fn parse_categorisations(xml: &str, config: &ParseConfig) -> Result<Vec<Categorisation>> {
    Ok(parse_structures(xml, StructureType::Categorisation.into(), config)?.categorisations)
}

/// Identity and labels shared by every maintainable.
struct Header {
    reference: ResolvedRef,
    name: String,
    description: Option<String>,
}

/// A dimension before positions are checked.
struct Unordered {
    dimension: Dimension,
    position: Option<String>,
}

struct Parser<'c> {
    config: &'c ParseConfig,
}

impl Parser<'_> {
    fn maintainable(&self, node: Node, structure_type: StructureType) -> Result<Header> {
        let id = required(node, "id", || structure_type.to_string())?;
        let agency = required(node, "agencyID", || format!("{structure_type} {id}"))?;
        let version = node
            .attribute("version")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION);
        let reference = ResolvedRef::new(structure_type, agency, id, version).ok_or_else(|| {
            ParseError::InvalidAttribute {
                context: format!("{structure_type} {agency}:{id}"),
                attribute: "version",
                value: version.to_string(),
            }
        })?;

        Ok(Header {
            name: self.localized(node, "Name").unwrap_or_else(|| id.to_string()),
            description: self.localized(node, "Description"),
            reference,
        })
    }

    /// Text of the `element` child in the preferred language, else the first.
    fn localized(&self, node: Node, element: &'static str) -> Option<String> {
        let mut first = None;
        for candidate in children(node, element) {
            let Some(value) = text(candidate) else {
                continue;
            };
            if lang(candidate) == Some(self.config.preferred_language.as_str()) {
                return Some(value.to_string());
            }
            first = first.or(Some(value));
        }
        first.map(str::to_string)
    }

    /// The `<Ref>` (or `<URN>`) held by `container`.
    fn reference(
        &self,
        container: Node,
        expected: StructureType,
        agency: &str,
        context: &str,
    ) -> Result<StructureRef> {
        if let Some(r) = child(container, "Ref") {
            let id = required(r, "id", || context.to_string())?;
            let structure_type = r
                .attribute("class")
                .and_then(StructureType::from_class)
                .unwrap_or(expected);
            let agency_id = r
                .attribute("agencyID")
                .or(self.config.default_agency.as_deref())
                .unwrap_or(agency);
            let version = r.attribute("version").map(Version::parse).unwrap_or(Version::Latest);
            return Ok(StructureRef::new(structure_type, agency_id, id, version));
        }

        if let Some(urn) = child(container, "URN").and_then(text) {
            return StructureRef::from_urn(urn).map_err(|_| invalid_urn(context, urn));
        }

        Err(ParseError::MissingElement {
            context: context.to_string(),
            element: "Ref",
        })
    }

    fn concept(&self, component: Node, agency: &str, context: &str) -> Result<ConceptRef> {
        let identity = child(component, "ConceptIdentity").ok_or_else(|| ParseError::MissingElement {
            context: context.to_string(),
            element: "ConceptIdentity",
        })?;

        if let Some(r) = child(identity, "Ref") {
            let id = required(r, "id", || context.to_string())?;
            let scheme_id = required(r, "maintainableParentID", || context.to_string())?;
            let agency_id = r
                .attribute("agencyID")
                .or(self.config.default_agency.as_deref())
                .unwrap_or(agency);
            let version = r
                .attribute("maintainableParentVersion")
                .map(Version::parse)
                .unwrap_or(Version::Latest);
            return Ok(ConceptRef {
                scheme: StructureRef::new(StructureType::ConceptScheme, agency_id, scheme_id, version),
                id: id.to_string(),
            });
        }

        if let Some(urn) = child(identity, "URN").and_then(text) {
            return match StructureRef::from_item_urn(urn) {
                Ok((scheme, Some(id))) if scheme.structure_type == StructureType::ConceptScheme => {
                    Ok(ConceptRef { scheme, id })
                }
                _ => Err(invalid_urn(context, urn)),
            };
        }

        Err(ParseError::MissingElement {
            context: context.to_string(),
            element: "Ref",
        })
    }

    /// Codelist (or concept scheme) enumerating a component's values.
    fn enumeration(&self, component: Node, agency: &str, context: &str) -> Result<Option<StructureRef>> {
        match child(component, "LocalRepresentation").and_then(|r| child(r, "Enumeration")) {
            Some(enumeration) => self
                .reference(enumeration, StructureType::Codelist, agency, context)
                .map(Some),
            None => Ok(None),
        }
    }

    fn dataflow(&self, node: Node) -> Result<Dataflow> {
        let header = self.maintainable(node, StructureType::Dataflow)?;
        let context = header.reference.to_string();
        let container = child(node, "Structure").ok_or_else(|| ParseError::MissingElement {
            context: context.clone(),
            element: "Structure",
        })?;
        let structure = self.reference(
            container,
            StructureType::DataStructure,
            &header.reference.agency_id,
            &context,
        )?;

        Ok(Dataflow {
            reference: header.reference,
            name: header.name,
            description: header.description,
            structure,
        })
    }

    fn data_structure(&self, node: Node) -> Result<DataStructure> {
        let header = self.maintainable(node, StructureType::DataStructure)?;
        let context = header.reference.to_string();
        let agency = header.reference.agency_id.clone();

        let mut unordered = Vec::new();
        let mut attributes = Vec::new();
        let mut primary_measure = None;

        if let Some(components) = child(node, "DataStructureComponents") {
            if let Some(list) = child(components, "DimensionList") {
                for dim in list.children().filter(|n| n.is_element()) {
                    let kind = match dim.tag_name().name() {
                        "Dimension" => DimensionKind::Dimension,
                        "TimeDimension" => DimensionKind::TimeDimension,
                        "MeasureDimension" => DimensionKind::MeasureDimension,
                        _ => continue,
                    };
                    let id = required(dim, "id", || context.clone())?;
                    let scope = format!("{context} dimension {id}");
                    unordered.push(Unordered {
                        dimension: Dimension {
                            id: id.to_string(),
                            position: 0,
                            kind,
                            concept: self.concept(dim, &agency, &scope)?,
                            codelist: self.enumeration(dim, &agency, &scope)?,
                        },
                        position: dim.attribute("position").map(str::to_string),
                    });
                }
            }

            if let Some(list) = child(components, "AttributeList") {
                for attr in children(list, "Attribute") {
                    let id = required(attr, "id", || context.clone())?;
                    let scope = format!("{context} attribute {id}");
                    attributes.push(Attribute {
                        id: id.to_string(),
                        concept: self.concept(attr, &agency, &scope)?,
                        codelist: self.enumeration(attr, &agency, &scope)?,
                        attachment: attachment(child(attr, "AttributeRelationship")),
                        assignment_status: attr.attribute("assignmentStatus").map(str::to_string),
                    });
                }
            }

            if let Some(measure) = child(components, "MeasureList").and_then(|l| child(l, "PrimaryMeasure")) {
                let id = required(measure, "id", || context.clone())?;
                let scope = format!("{context} measure {id}");
                let concept = match child(measure, "ConceptIdentity") {
                    Some(_) => Some(self.concept(measure, &agency, &scope)?),
                    None => None,
                };
                primary_measure = Some(PrimaryMeasure {
                    id: id.to_string(),
                    concept,
                });
            }
        }

        Ok(DataStructure {
            dimensions: order_dimensions(&context, unordered)?,
            reference: header.reference,
            name: header.name,
            attributes,
            primary_measure,
        })
    }

    fn codelist(&self, node: Node) -> Result<Codelist> {
        let header = self.maintainable(node, StructureType::Codelist)?;
        let context = header.reference.to_string();
        let mut seen = HashSet::new();
        let mut codes = Vec::new();

        for code in children(node, "Code") {
            let id = required(code, "id", || context.clone())?;
            if !seen.insert(id) {
                return Err(ParseError::DuplicateCode {
                    codelist: context,
                    code: id.to_string(),
                });
            }
            let parent = child(code, "Parent").and_then(|p| match child(p, "Ref") {
                Some(r) => r.attribute("id"),
                None => text(p),
            });
            codes.push(Code {
                id: id.to_string(),
                name: self.localized(code, "Name").unwrap_or_else(|| id.to_string()),
                description: self.localized(code, "Description"),
                parent: parent.map(str::to_string),
            });
        }

        Ok(Codelist {
            reference: header.reference,
            name: header.name,
            codes,
        })
    }

    fn concept_scheme(&self, node: Node) -> Result<ConceptScheme> {
        let header = self.maintainable(node, StructureType::ConceptScheme)?;
        let context = header.reference.to_string();
        let mut concepts = BTreeMap::new();
        let mut descriptions = BTreeMap::new();

        for concept in children(node, "Concept") {
            let id = required(concept, "id", || context.clone())?;
            let name = self.localized(concept, "Name").unwrap_or_else(|| id.to_string());
            if concepts.insert(id.to_string(), name).is_some() {
                return Err(ParseError::DuplicateConcept {
                    scheme: context,
                    concept: id.to_string(),
                });
            }
            if let Some(description) = self.localized(concept, "Description") {
                descriptions.insert(id.to_string(), description);
            }
        }

        Ok(ConceptScheme {
            reference: header.reference,
            name: header.name,
            concepts,
            descriptions,
        })
    }

    fn category_scheme(&self, node: Node) -> Result<CategoryScheme> {
        let header = self.maintainable(node, StructureType::CategoryScheme)?;
        let context = header.reference.to_string();
        Ok(CategoryScheme {
            categories: self.categories(node, &context)?,
            reference: header.reference,
            name: header.name,
        })
    }

    /// Direct `<Category>` children of `parent`, recursively.
    fn categories(&self, parent: Node, context: &str) -> Result<Vec<Category>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for node in children(parent, "Category") {
            let id = required(node, "id", || context.to_string())?;
            if !seen.insert(id) {
                return Err(ParseError::DuplicateCategory {
                    scheme: context.to_string(),
                    category: id.to_string(),
                });
            }
            out.push(Category {
                id: id.to_string(),
                name: self.localized(node, "Name").unwrap_or_else(|| id.to_string()),
                description: self.localized(node, "Description"),
                children: self.categories(node, &format!("{context} category {id}"))?,
            });
        }
        Ok(out)
    }

    fn categorisation(&self, node: Node) -> Result<Categorisation> {
        let header = self.maintainable(node, StructureType::Categorisation)?;
        let context = header.reference.to_string();
        let agency = header.reference.agency_id.clone();

        let source = child(node, "Source").ok_or_else(|| ParseError::MissingElement {
            context: context.clone(),
            element: "Source",
        })?;
        let source = self.reference(source, StructureType::Dataflow, &agency, &context)?;

        let target = child(node, "Target").ok_or_else(|| ParseError::MissingElement {
            context: context.clone(),
            element: "Target",
        })?;
        let target = self.category_ref(target, &agency, &context)?;

        Ok(Categorisation {
            reference: header.reference,
            name: header.name,
            source,
            target,
        })
    }

    fn category_ref(&self, target: Node, agency: &str, context: &str) -> Result<CategoryRef> {
        if let Some(r) = child(target, "Ref") {
            let id = required(r, "id", || context.to_string())?;
            let scheme_id = required(r, "maintainableParentID", || context.to_string())?;
            let agency_id = r
                .attribute("agencyID")
                .or(self.config.default_agency.as_deref())
                .unwrap_or(agency);
            let version = r
                .attribute("maintainableParentVersion")
                .map(Version::parse)
                .unwrap_or(Version::Latest);
            return Ok(CategoryRef {
                scheme: StructureRef::new(StructureType::CategoryScheme, agency_id, scheme_id, version),
                id: id.to_string(),
            });
        }

        if let Some(urn) = child(target, "URN").and_then(text) {
            return match StructureRef::from_item_urn(urn) {
                Ok((scheme, Some(id))) if scheme.structure_type == StructureType::CategoryScheme => {
                    Ok(CategoryRef { scheme, id })
                }
                _ => Err(invalid_urn(context, urn)),
            };
        }

        Err(ParseError::MissingElement {
            context: context.to_string(),
            element: "Ref",
        })
    }

    fn constraint(&self, node: Node) -> Result<ContentConstraint> {
        let header = self.maintainable(node, StructureType::ContentConstraint)?;
        let context = header.reference.to_string();
        let agency = header.reference.agency_id.clone();

        let constraint_type = match node.attribute("type") {
            None | Some("Actual") => ConstraintType::Actual,
            Some("Allowed") => ConstraintType::Allowed,
            Some(other) => {
                return Err(ParseError::InvalidAttribute {
                    context,
                    attribute: "type",
                    value: other.to_string(),
                })
            }
        };

        let mut attachments = Vec::new();
        if let Some(attachment) = child(node, "ConstraintAttachment") {
            for target in attachment.children().filter(|n| n.is_element()) {
                if let Some(structure_type) = StructureType::from_class(target.tag_name().name()) {
                    attachments.push(self.reference(target, structure_type, &agency, &context)?);
                }
            }
        }

        let mut time_range: Option<TimeRange> = None;
        let mut widen = |range: TimeRange| {
            time_range = Some(match time_range.take() {
                Some(existing) => existing.union(&range),
                None => range,
            });
        };

        if let Some(period) = child(node, "ReferencePeriod") {
            widen(TimeRange {
                start: period.attribute("startTime").map(str::to_string),
                end: period.attribute("endTime").map(str::to_string),
            });
        }

        let mut cube_regions = Vec::new();
        for region in children(node, "CubeRegion") {
            let include = match region.attribute("include") {
                None | Some("true") | Some("1") => true,
                Some("false") | Some("0") => false,
                Some(other) => {
                    return Err(ParseError::InvalidAttribute {
                        context,
                        attribute: "include",
                        value: other.to_string(),
                    })
                }
            };

            let mut values: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
            for key_value in children(region, "KeyValue") {
                let id = required(key_value, "id", || context.clone())?;
                if include {
                    if let Some(range) = child(key_value, "TimeRange") {
                        widen(period_bounds(range));
                    }
                }
                let listed: BTreeSet<String> = children(key_value, "Value")
                    .filter_map(text)
                    .map(str::to_string)
                    .collect();
                if !listed.is_empty() {
                    values.entry(id.to_string()).or_default().extend(listed);
                }
            }
            cube_regions.push(CubeRegion { include, values });
        }

        Ok(ContentConstraint {
            reference: header.reference,
            name: header.name,
            constraint_type,
            attachments,
            cube_regions,
            time_range,
        })
    }
}

/// Check positions and sort. See the module docs for the accepted forms.
fn order_dimensions(structure: &str, unordered: Vec<Unordered>) -> Result<Vec<Dimension>> {
    if unordered.iter().all(|u| u.position.is_none()) {
        return Ok(unordered
            .into_iter()
            .enumerate()
            .map(|(position, u)| Dimension {
                position,
                ..u.dimension
            })
            .collect());
    }

    let mut positioned = Vec::with_capacity(unordered.len());
    for u in unordered {
        let raw = u.position.ok_or_else(|| ParseError::MissingAttribute {
            context: structure.to_string(),
            element: u.dimension.id.clone(),
            attribute: "position",
        })?;
        let position = raw.trim().parse::<usize>().map_err(|_| ParseError::InvalidPosition {
            structure: structure.to_string(),
            dimension: u.dimension.id.clone(),
            value: raw.clone(),
        })?;
        positioned.push((position, u.dimension));
    }

    let mut positions: Vec<usize> = positioned.iter().map(|(p, _)| *p).collect();
    positions.sort_unstable();
    let base = positions.first().copied().unwrap_or(0);
    let contiguous = base <= 1 && positions.iter().enumerate().all(|(i, p)| *p == base + i);
    if !contiguous {
        return Err(ParseError::NonContiguousPositions {
            structure: structure.to_string(),
            positions,
        });
    }

    positioned.sort_by_key(|(p, _)| *p);
    Ok(positioned
        .into_iter()
        .map(|(p, dimension)| Dimension {
            position: p - base,
            ..dimension
        })
        .collect())
}

fn attachment(relationship: Option<Node>) -> AttachmentLevel {
    let Some(rel) = relationship else {
        return AttachmentLevel::DataSet;
    };

    let dimensions: Vec<String> = children(rel, "Dimension")
        .filter_map(|d| child(d, "Ref").and_then(|r| r.attribute("id")).or_else(|| text(d)))
        .map(str::to_string)
        .collect();
    if !dimensions.is_empty() {
        return AttachmentLevel::Series(dimensions);
    }

    if let Some(group) = child(rel, "Group")
        .and_then(|g| child(g, "Ref").and_then(|r| r.attribute("id")).or_else(|| text(g)))
    {
        return AttachmentLevel::Group(group.to_string());
    }

    if child(rel, "PrimaryMeasure").is_some() {
        AttachmentLevel::Observation
    } else {
        AttachmentLevel::DataSet
    }
}

/// Bounds of a `<TimeRange>` as inclusive periods.
///
/// A bound marked `isInclusive="false"` moves one day past the period it
/// names: `<AfterPeriod isInclusive="false">2010</AfterPeriod>` starts on
/// `2011-01-01`. An exclusive bound that is not a period is kept as written.
fn period_bounds(range: Node) -> TimeRange {
    let start = child(range, "StartPeriod").or_else(|| child(range, "AfterPeriod"));
    let end = child(range, "EndPeriod").or_else(|| child(range, "BeforePeriod"));
    TimeRange {
        start: start.and_then(|n| inclusive_bound(n, true)),
        end: end.and_then(|n| inclusive_bound(n, false)),
    }
}

fn inclusive_bound(node: Node, is_start: bool) -> Option<String> {
    let value = text(node)?;
    if !matches!(node.attribute("isInclusive"), Some("false") | Some("0")) {
        return Some(value.to_string());
    }
    let shifted = parse_period(value).ok().and_then(|p| {
        if is_start {
            p.end.succ_opt()
        } else {
            p.start.pred_opt()
        }
    });
    Some(shifted.map_or_else(|| value.to_string(), |day| day.to_string()))
}

fn invalid_urn(context: &str, urn: &str) -> ParseError {
    ParseError::InvalidAttribute {
        context: context.to_string(),
        attribute: "URN",
        value: urn.to_string(),
    }
}

fn required<'a>(
    node: Node<'a, '_>,
    attribute: &'static str,
    context: impl FnOnce() -> String,
) -> Result<&'a str> {
    node.attribute(attribute)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ParseError::MissingAttribute {
            context: context(),
            element: node.tag_name().name().to_string(),
            attribute,
        })
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim).filter(|t| !t.is_empty())
}

fn lang<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.attributes().find(|a| a.name() == "lang").map(|a| a.value())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dsd(dimensions: &str) -> String {
        format!(
            r#"<Structure><Structures><DataStructures>
            <DataStructure id="DSD_T" agencyID="SPC" version="1.0">
              <Name>T</Name>
              <DataStructureComponents><DimensionList>{dimensions}</DimensionList></DataStructureComponents>
            </DataStructure>
            </DataStructures></Structures></Structure>"#
        )
    }

    fn dim(id: &str, position: Option<&str>) -> String {
        let position = position.map(|p| format!(r#" position="{p}""#)).unwrap_or_default();
        format!(
            r#"<Dimension id="{id}"{position}><ConceptIdentity><Ref id="{id}" maintainableParentID="CS" agencyID="SPC" maintainableParentVersion="1.0"/></ConceptIdentity></Dimension>"#
        )
    }

    fn parse_dsd(dimensions: &str) -> Result<DataStructure> {
        let mut all = parse_data_structures(&dsd(dimensions), &ParseConfig::default())?;
        Ok(all.remove(0))
    }

    #[test]
    fn test_one_based_positions_are_normalised() {
        let dims = format!("{}{}", dim("B", Some("2")), dim("A", Some("1")));
        let parsed = parse_dsd(&dims).unwrap();
        let ids: Vec<_> = parsed.dimensions.iter().map(|d| (d.id.as_str(), d.position)).collect();
        assert_eq!(ids, vec![("A", 0), ("B", 1)]);
    }

    #[test]
    fn test_document_order_without_positions() {
        let dims = format!("{}{}", dim("B", None), dim("A", None));
        let parsed = parse_dsd(&dims).unwrap();
        assert_eq!(parsed.dimensions[0].id, "B");
        assert_eq!(parsed.dimensions[1].position, 1);
    }

    #[test]
    fn test_gap_is_rejected() {
        let dims = format!("{}{}", dim("A", Some("1")), dim("B", Some("3")));
        assert!(matches!(
            parse_dsd(&dims),
            Err(ParseError::NonContiguousPositions { positions, .. }) if positions == vec![1, 3]
        ));
    }

    #[test]
    fn test_duplicate_position_is_rejected() {
        let dims = format!("{}{}", dim("A", Some("0")), dim("B", Some("0")));
        assert!(matches!(parse_dsd(&dims), Err(ParseError::NonContiguousPositions { .. })));
    }

    #[test]
    fn test_mixed_positions_are_rejected() {
        let dims = format!("{}{}", dim("A", Some("1")), dim("B", None));
        assert!(matches!(
            parse_dsd(&dims),
            Err(ParseError::MissingAttribute { attribute: "position", .. })
        ));
    }

    #[test]
    fn test_non_numeric_position() {
        let dims = dim("A", Some("first"));
        assert!(matches!(parse_dsd(&dims), Err(ParseError::InvalidPosition { .. })));
    }

    #[test]
    fn test_localized_prefers_language() {
        let xml = r#"<Structure><Structures><Codelists>
            <Codelist id="CL" agencyID="SPC" version="1.0">
              <Name xml:lang="fr">Fréquence</Name>
              <Name xml:lang="en">Frequency</Name>
            </Codelist></Codelists></Structures></Structure>"#;
        let en = parse_codelists(xml, &ParseConfig::default()).unwrap();
        assert_eq!(en[0].name, "Frequency");
        let de = parse_codelists(xml, &ParseConfig::default().with_language("de")).unwrap();
        assert_eq!(de[0].name, "Fréquence");
    }

    #[test]
    fn test_missing_version_defaults() {
        let xml = r#"<Structure><Structures><Codelists>
            <Codelist id="CL" agencyID="SPC"><Name>C</Name></Codelist>
            </Codelists></Structures></Structure>"#;
        let cls = parse_codelists(xml, &ParseConfig::default()).unwrap();
        assert_eq!(cls[0].reference.version(), DEFAULT_VERSION);
    }

    #[test]
    fn test_latest_maintainable_version_is_invalid() {
        let xml = r#"<Structure><Structures><Codelists>
            <Codelist id="CL" agencyID="SPC" version="latest"/>
            </Codelists></Structures></Structure>"#;
        assert!(matches!(
            parse_codelists(xml, &ParseConfig::default()),
            Err(ParseError::InvalidAttribute { attribute: "version", .. })
        ));
    }

    #[test]
    fn test_attachment_levels() {
        let parse = |xml: &str| {
            let doc = Document::parse(xml).unwrap();
            attachment(Some(doc.root_element()))
        };
        assert_eq!(
            parse(r#"<AttributeRelationship><Dimension><Ref id="FREQ"/></Dimension><Dimension><Ref id="GEO"/></Dimension></AttributeRelationship>"#),
            AttachmentLevel::Series(vec!["FREQ".to_string(), "GEO".to_string()])
        );
        assert_eq!(
            parse(r#"<AttributeRelationship><Group><Ref id="SIBLING"/></Group></AttributeRelationship>"#),
            AttachmentLevel::Group("SIBLING".to_string())
        );
        assert_eq!(
            parse(r#"<AttributeRelationship><PrimaryMeasure><Ref id="OBS_VALUE"/></PrimaryMeasure></AttributeRelationship>"#),
            AttachmentLevel::Observation
        );
        assert_eq!(parse("<AttributeRelationship><None/></AttributeRelationship>"), AttachmentLevel::DataSet);
        assert_eq!(attachment(None), AttachmentLevel::DataSet);
    }

    #[test]
    fn test_exclusive_time_bounds_become_inclusive() {
        let bounds = |xml: &str| {
            let doc = Document::parse(xml).unwrap();
            period_bounds(doc.root_element())
        };
        let exclusive = bounds(
            r#"<TimeRange><AfterPeriod isInclusive="false">2010</AfterPeriod><BeforePeriod isInclusive="false">2015-Q1</BeforePeriod></TimeRange>"#,
        );
        assert_eq!(exclusive.start.as_deref(), Some("2011-01-01"));
        assert_eq!(exclusive.end.as_deref(), Some("2014-12-31"));

        let inclusive = bounds(
            r#"<TimeRange><AfterPeriod isInclusive="true">2010</AfterPeriod><BeforePeriod>2015-Q1</BeforePeriod></TimeRange>"#,
        );
        assert_eq!(inclusive.start.as_deref(), Some("2010"));
        assert_eq!(inclusive.end.as_deref(), Some("2015-Q1"));

        let opaque = bounds(r#"<TimeRange><AfterPeriod isInclusive="false">soon</AfterPeriod></TimeRange>"#);
        assert_eq!(opaque.start.as_deref(), Some("soon"));
        assert!(opaque.end.is_none());
    }

    #[test]
    fn test_default_agency_applies_to_refs() {
        let xml = r#"<Structure><Structures><Dataflows>
            <Dataflow id="DF" agencyID="SPC" version="1.0">
              <Structure><Ref id="DSD" version="2.0"/></Structure>
            </Dataflow></Dataflows></Structures></Structure>"#;
        let own = parse_dataflows(xml, &ParseConfig::default()).unwrap();
        assert_eq!(own[0].structure.agency_id, "SPC");
        let other = parse_dataflows(xml, &ParseConfig::default().with_default_agency("SDMX")).unwrap();
        assert_eq!(other[0].structure.agency_id, "SDMX");
    }
}
