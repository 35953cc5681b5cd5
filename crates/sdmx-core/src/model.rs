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

//! Typed SDMX structural model.
//!
//! Produced once by the parser; everything downstream works on these types
//! and never touches XML again.

use crate::period::{compare_ends, compare_starts};
use crate::reference::{ResolvedRef, StructureRef, StructureType};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// A dataflow and the DSD it is built on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataflow {
    /// The dataflow's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// The data structure definition; its id commonly differs from the
    /// dataflow id.
    pub structure: StructureRef,
}

/// How a dimension participates in the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionKind {
    /// Ordinary key dimension.
    Dimension,
    /// The time dimension; not part of the key.
    TimeDimension,
    /// A measure dimension.
    MeasureDimension,
}

/// Reference to a concept inside a concept scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ConceptRef {
    /// The owning concept scheme.
    pub scheme: StructureRef,
    /// Concept id within the scheme.
    pub id: String,
}

/// A positional dimension of a DSD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    /// Dimension id.
    pub id: String,
    /// Zero-based position, unique and contiguous within the DSD.
    pub position: usize,
    /// Role of the dimension.
    pub kind: DimensionKind,
    /// Concept identity.
    pub concept: ConceptRef,
    /// Enumerating codelist; `None` for uncoded dimensions such as
    /// `TIME_PERIOD`.
    pub codelist: Option<StructureRef>,
}

impl Dimension {
    /// True for the time dimension.
    pub fn is_time(&self) -> bool {
        self.kind == DimensionKind::TimeDimension
    }
}

/// Where an attribute value attaches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttachmentLevel {
    /// One value for the whole data set.
    DataSet,
    /// Attached to a group.
    Group(String),
    /// Attached to series identified by these dimensions.
    Series(Vec<String>),
    /// Attached to each observation.
    Observation,
}

/// A DSD attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute id.
    pub id: String,
    /// Concept identity.
    pub concept: ConceptRef,
    /// Enumerating codelist, if coded.
    pub codelist: Option<StructureRef>,
    /// Attachment level.
    pub attachment: AttachmentLevel,
    /// `Mandatory` or `Conditional`, when declared.
    pub assignment_status: Option<String>,
}

/// The primary measure of a DSD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimaryMeasure {
    /// Measure id, usually `OBS_VALUE`.
    pub id: String,
    /// Concept identity, when declared.
    pub concept: Option<ConceptRef>,
}

/// A data structure definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataStructure {
    /// The DSD's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Dimensions sorted by position.
    pub dimensions: Vec<Dimension>,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Primary measure.
    pub primary_measure: Option<PrimaryMeasure>,
}

impl DataStructure {
    /// Look up a dimension by id.
    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id == id)
    }

    /// Dimensions that form the series key, in position order.
    pub fn key_dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter().filter(|d| !d.is_time())
    }

    /// The time dimension, if any.
    pub fn time_dimension(&self) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.is_time())
    }

    /// Every codelist and concept scheme this DSD references, deduplicated,
    /// in component order (concept scheme before codelist per component).
    pub fn references(&self) -> Vec<StructureRef> {
        let mut seen = BTreeSet::new();
        let mut refs = Vec::new();
        let mut push = |r: &StructureRef| {
            if seen.insert(r.clone()) {
                refs.push(r.clone());
            }
        };
        for d in &self.dimensions {
            push(&d.concept.scheme);
            if let Some(cl) = &d.codelist {
                push(cl);
            }
        }
        for a in &self.attributes {
            push(&a.concept.scheme);
            if let Some(cl) = &a.codelist {
                push(cl);
            }
        }
        if let Some(concept) = self.primary_measure.as_ref().and_then(|m| m.concept.as_ref()) {
            push(&concept.scheme);
        }
        refs
    }
}

/// One code in a codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Code {
    /// Code id, unique within its codelist version.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    /// Parent code in hierarchical lists.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub parent: Option<String>,
}

impl Code {
    /// Create a code with just an id and a name.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            parent: None,
        }
    }
}

/// An enumeration of codes in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Codelist {
    /// The codelist's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Codes in source order.
    pub codes: Vec<Code>,
}

impl Codelist {
    /// Look up a code by id.
    pub fn code(&self, id: &str) -> Option<&Code> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// True if the codelist defines `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.code(id).is_some()
    }
}

/// A concept scheme: concept id → name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptScheme {
    /// The scheme's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Concepts by id.
    pub concepts: BTreeMap<String, String>,
    /// Concept descriptions by id, for the concepts that have one.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub descriptions: BTreeMap<String, String>,
}

/// One concept of a scheme with its labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concept {
    /// Concept id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ConceptScheme {
    /// Concepts in id order.
    pub fn items(&self) -> Vec<Concept> {
        self.concepts
            .iter()
            .map(|(id, name)| Concept {
                id: id.clone(),
                name: name.clone(),
                description: self.descriptions.get(id).cloned(),
            })
            .collect()
    }
}

/// A topic in a category scheme. Categories nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Id, unique among siblings.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sub-categories in source order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Category>,
}

/// A category together with where it sits in its scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryEntry<'a> {
    /// The category.
    pub category: &'a Category,
    /// Zero for top-level categories.
    pub depth: usize,
}

/// A hierarchy of categories used to file dataflows by topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryScheme {
    /// The scheme's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Top-level categories in source order.
    pub categories: Vec<Category>,
}

impl CategoryScheme {
    /// Look up a category by dotted path (`ECO.GDP`). A single id that is
    /// not a top-level category is searched for anywhere in the tree.
    pub fn category(&self, path: &str) -> Option<&Category> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut found = self.categories.iter().find(|c| c.id == first);
        for segment in segments {
            found = found?.children.iter().find(|c| c.id == segment);
        }
        if found.is_none() && !path.contains('.') {
            return self.entries().into_iter().map(|e| e.category).find(|c| c.id == path);
        }
        found
    }

    /// Every category depth first, parents before children.
    pub fn entries(&self) -> Vec<CategoryEntry<'_>> {
        fn walk<'a>(categories: &'a [Category], depth: usize, out: &mut Vec<CategoryEntry<'a>>) {
            for category in categories {
                out.push(CategoryEntry { category, depth });
                walk(&category.children, depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.categories, 0, &mut out);
        out
    }
}

/// Reference to a category inside a category scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CategoryRef {
    /// The owning category scheme.
    pub scheme: StructureRef,
    /// Category id; nested categories use a dotted path.
    pub id: String,
}

impl CategoryRef {
    /// The last segment of the path.
    pub fn leaf(&self) -> &str {
        self.id.rsplit('.').next().unwrap_or(&self.id)
    }
}

/// Files a structure, usually a dataflow, under a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Categorisation {
    /// The categorisation's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// The categorised structure.
    pub source: StructureRef,
    /// The category it is filed under.
    pub target: CategoryRef,
}

impl Categorisation {
    /// True if the target is a category of `scheme`. A `latest` on either
    /// side matches any version.
    pub fn in_scheme(&self, scheme: &StructureRef) -> bool {
        self.target.scheme.matches(scheme) || scheme.matches(&self.target.scheme)
    }

    /// True if the target names the category at dotted `path`. A target
    /// given as a bare id matches that id at any depth.
    pub fn targets(&self, path: &str) -> bool {
        if self.target.id.contains('.') {
            self.target.id == path
        } else {
            path.rsplit('.').next() == Some(self.target.id.as_str())
        }
    }
}

/// Whether a constraint describes existing data or permitted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    /// Data that actually exists.
    Actual,
    /// Data that is permitted.
    Allowed,
}

/// A time window. Either end may be open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Inclusive start, `None` for unbounded.
    pub start: Option<String>,
    /// Inclusive end, `None` for unbounded.
    pub end: Option<String>,
}

impl TimeRange {
    /// Smallest range covering both, treating `None` ends as unbounded.
    ///
    /// Ends are compared by calendar date, not text, so a union of `2010`
    /// and `2010-06` ends at `2010`. The winning period keeps its original
    /// spelling.
    pub fn union(&self, other: &TimeRange) -> TimeRange {
        fn pick(a: &Option<String>, b: &Option<String>, keep_b: impl Fn(&str, &str) -> bool) -> Option<String> {
            match (a, b) {
                (Some(x), Some(y)) => Some(if keep_b(x, y) { y.clone() } else { x.clone() }),
                _ => None,
            }
        }
        TimeRange {
            start: pick(&self.start, &other.start, |x, y| compare_starts(y, x) == Ordering::Less),
            end: pick(&self.end, &other.end, |x, y| compare_ends(y, x) == Ordering::Greater),
        }
    }
}

/// A cube region: valid values per dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CubeRegion {
    /// `false` when the region lists excluded values.
    pub include: bool,
    /// Dimension id → values.
    pub values: BTreeMap<String, BTreeSet<String>>,
}

/// A content constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentConstraint {
    /// The constraint's own reference.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Actual or Allowed.
    pub constraint_type: ConstraintType,
    /// Structures the constraint is attached to (usually a dataflow).
    pub attachments: Vec<StructureRef>,
    /// Cube regions in document order.
    pub cube_regions: Vec<CubeRegion>,
    /// Time coverage across all regions.
    pub time_range: Option<TimeRange>,
}

impl ContentConstraint {
    /// True if this constraint is attached to `dataflow`. A `latest` on
    /// either side matches any version.
    pub fn applies_to(&self, dataflow: &StructureRef) -> bool {
        self.attachments
            .iter()
            .any(|a| a.matches(dataflow) || dataflow.matches(a))
    }
}

/// How one structure relates to another it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// Dataflow → its DSD.
    BasedOn,
    /// DSD → a codelist used by a component.
    UsesCodelist,
    /// DSD → a concept scheme supplying component concepts.
    UsesConcepts,
    /// Constraint → the structure it constrains.
    Constrains,
    /// Categorisation → the structure it files.
    Categorises,
    /// Categorisation → the category scheme holding its category.
    FiledUnder,
}

impl Relation {
    /// Human label for diagrams and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Relation::BasedOn => "based on",
            Relation::UsesCodelist => "uses codelist",
            Relation::UsesConcepts => "uses concepts",
            Relation::Constrains => "constrains",
            Relation::Categorises => "categorises",
            Relation::FiledUnder => "filed under",
        }
    }

    /// The relation implied by the type of the referenced structure.
    pub fn for_target(target: &StructureRef) -> Relation {
        match target.structure_type {
            StructureType::Codelist => Relation::UsesCodelist,
            StructureType::ConceptScheme => Relation::UsesConcepts,
            StructureType::DataStructure => Relation::BasedOn,
            StructureType::Dataflow | StructureType::ContentConstraint => Relation::Constrains,
            StructureType::CategoryScheme => Relation::FiledUnder,
            StructureType::Categorisation => Relation::Categorises,
        }
    }
}

/// Any parsed maintainable structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Structure {
    /// A dataflow.
    Dataflow(Dataflow),
    /// A DSD.
    DataStructure(DataStructure),
    /// A codelist.
    Codelist(Codelist),
    /// A concept scheme.
    ConceptScheme(ConceptScheme),
    /// A content constraint.
    ContentConstraint(ContentConstraint),
    /// A category scheme.
    CategoryScheme(CategoryScheme),
    /// A categorisation.
    Categorisation(Categorisation),
}

impl Structure {
    /// The structure's own reference.
    pub fn reference(&self) -> &ResolvedRef {
        match self {
            Structure::Dataflow(s) => &s.reference,
            Structure::DataStructure(s) => &s.reference,
            Structure::Codelist(s) => &s.reference,
            Structure::ConceptScheme(s) => &s.reference,
            Structure::ContentConstraint(s) => &s.reference,
            Structure::CategoryScheme(s) => &s.reference,
            Structure::Categorisation(s) => &s.reference,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        match self {
            Structure::Dataflow(s) => &s.name,
            Structure::DataStructure(s) => &s.name,
            Structure::Codelist(s) => &s.name,
            Structure::ConceptScheme(s) => &s.name,
            Structure::ContentConstraint(s) => &s.name,
            Structure::CategoryScheme(s) => &s.name,
            Structure::Categorisation(s) => &s.name,
        }
    }

    /// Direct outgoing references with their relation, in a stable order.
    pub fn children(&self) -> Vec<(StructureRef, Relation)> {
        match self {
            Structure::Dataflow(df) => vec![(df.structure.clone(), Relation::BasedOn)],
            Structure::DataStructure(dsd) => dsd
                .references()
                .into_iter()
                .map(|r| {
                    let rel = Relation::for_target(&r);
                    (r, rel)
                })
                .collect(),
            Structure::ContentConstraint(cc) => cc
                .attachments
                .iter()
                .map(|r| (r.clone(), Relation::Constrains))
                .collect(),
            Structure::Categorisation(c) => vec![
                (c.source.clone(), Relation::Categorises),
                (c.target.scheme.clone(), Relation::FiledUnder),
            ],
            Structure::Codelist(_) | Structure::ConceptScheme(_) | Structure::CategoryScheme(_) => {
                Vec::new()
            }
        }
    }

    /// The relation `self` has to `target` if it references it directly.
    pub fn relation_to(&self, target: &StructureRef) -> Option<Relation> {
        self.children()
            .into_iter()
            .find(|(r, _)| r.matches(target))
            .map(|(_, rel)| rel)
    }
}

/// All structures found in one SDMX-ML message, grouped by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureSet {
    /// Dataflows.
    pub dataflows: Vec<Dataflow>,
    /// Data structure definitions.
    pub data_structures: Vec<DataStructure>,
    /// Codelists.
    pub codelists: Vec<Codelist>,
    /// Concept schemes.
    pub concept_schemes: Vec<ConceptScheme>,
    /// Content constraints.
    pub constraints: Vec<ContentConstraint>,
    /// Category schemes.
    pub category_schemes: Vec<CategoryScheme>,
    /// Categorisations.
    pub categorisations: Vec<Categorisation>,
}

impl StructureSet {
    /// Total number of structures.
    pub fn len(&self) -> usize {
        self.dataflows.len()
            + self.data_structures.len()
            + self.codelists.len()
            + self.concept_schemes.len()
            + self.constraints.len()
            + self.category_schemes.len()
            + self.categorisations.len()
    }

    /// True when no structures were found.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// References of every structure in the set.
    pub fn references(&self) -> Vec<StructureRef> {
        self.iter().map(|s| s.reference().as_structure_ref().clone()).collect()
    }

    /// Iterate over all structures as [`Structure`] values (cloned).
    pub fn iter(&self) -> impl Iterator<Item = Structure> + '_ {
        self.dataflows
            .iter()
            .cloned()
            .map(Structure::Dataflow)
            .chain(self.data_structures.iter().cloned().map(Structure::DataStructure))
            .chain(self.codelists.iter().cloned().map(Structure::Codelist))
            .chain(self.concept_schemes.iter().cloned().map(Structure::ConceptScheme))
            .chain(self.constraints.iter().cloned().map(Structure::ContentConstraint))
            .chain(self.category_schemes.iter().cloned().map(Structure::CategoryScheme))
            .chain(self.categorisations.iter().cloned().map(Structure::Categorisation))
    }

    /// Consume the set into a flat list of structures.
    pub fn into_structures(self) -> Vec<Structure> {
        let mut out = Vec::with_capacity(self.len());
        out.extend(self.dataflows.into_iter().map(Structure::Dataflow));
        out.extend(self.data_structures.into_iter().map(Structure::DataStructure));
        out.extend(self.codelists.into_iter().map(Structure::Codelist));
        out.extend(self.concept_schemes.into_iter().map(Structure::ConceptScheme));
        out.extend(self.constraints.into_iter().map(Structure::ContentConstraint));
        out.extend(self.category_schemes.into_iter().map(Structure::CategoryScheme));
        out.extend(self.categorisations.into_iter().map(Structure::Categorisation));
        out
    }
}
