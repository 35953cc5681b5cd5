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

//! Progressive discovery over parsed structures.
//!
//! Keyword filtering, pagination and compact summaries. Everything here is a
//! pure function over already-parsed collections; fetching is the engine's
//! job.

use crate::error::{Result, ValidationError};
use crate::model::{
    Categorisation, Category, CategoryScheme, Code, Codelist, Concept, ConceptScheme, DataStructure,
    Dataflow, Dimension, DimensionKind,
};
use crate::reference::{ResolvedRef, StructureRef};
use serde::Serialize;

/// Maximum description length kept in summaries.
pub const DESCRIPTION_LIMIT: usize = 100;

/// Anything with an id, a name and an optional description can be searched.
pub trait Searchable {
    /// Identifier.
    fn id(&self) -> &str;
    /// Display name.
    fn name(&self) -> &str;
    /// Optional description.
    fn description(&self) -> Option<&str>;
}

impl Searchable for Dataflow {
    fn id(&self) -> &str {
        &self.reference.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Searchable for Code {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Searchable for Concept {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn normalise_keywords<S: AsRef<str>>(keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.as_ref().trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Number of keywords that occur in the item's id, name or description.
fn relevance<T: Searchable>(item: &T, keywords: &[String]) -> usize {
    let text = format!(
        "{} {} {}",
        item.id(),
        item.name(),
        item.description().unwrap_or_default()
    )
    .to_lowercase();
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

/// Result of a keyword filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterResult<T> {
    /// Matching items, most relevant first; source order among equals.
    pub matches: Vec<T>,
    /// Number of matches.
    pub total_found: usize,
    /// Number of items before filtering.
    pub total_before_filtering: usize,
    /// Keywords actually applied (blank ones dropped).
    pub keywords: Vec<String>,
}

impl<T> FilterResult<T> {
    /// True when keywords were applied.
    pub fn filtered(&self) -> bool {
        !self.keywords.is_empty()
    }
}

/// Filter items by case-insensitive substring match on id, name and
/// description.
///
/// Keywords combine with OR semantics. Items matching more keywords sort
/// first. An empty keyword list returns everything in source order.
pub fn filter_by_keywords<T, S>(items: &[T], keywords: &[S]) -> FilterResult<T>
where
    T: Searchable + Clone,
    S: AsRef<str>,
{
    let keywords = normalise_keywords(keywords);
    let matches: Vec<T> = if keywords.is_empty() {
        items.to_vec()
    } else {
        let mut scored: Vec<(usize, &T)> = items
            .iter()
            .map(|item| (relevance(item, &keywords), item))
            .filter(|(score, _)| *score > 0)
            .collect();
        // stable: ties keep source order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, item)| item.clone()).collect()
    };

    FilterResult {
        total_found: matches.len(),
        total_before_filtering: items.len(),
        matches,
        keywords,
    }
}

/// Keyword filter over dataflows.
pub fn filter_dataflows<S: AsRef<str>>(
    dataflows: &[Dataflow],
    keywords: &[S],
) -> FilterResult<Dataflow> {
    filter_by_keywords(dataflows, keywords)
}

/// Offset/limit pair. `limit` is always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    offset: usize,
    limit: usize,
}

impl Pagination {
    /// Create a pagination request; a zero limit is rejected.
    pub fn new(offset: usize, limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(ValidationError::InvalidLimit);
        }
        Ok(Self { offset, limit })
    }

    /// Offset of the first item.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Maximum number of items.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 10,
        }
    }
}

/// One page of items plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items in `[offset, offset + limit)`, clipped to bounds.
    pub items: Vec<T>,
    /// Total items available.
    pub total: usize,
    /// Requested offset.
    pub offset: usize,
    /// Requested limit.
    pub limit: usize,
    /// True if `offset + limit < total`.
    pub has_more: bool,
    /// Offset of the next page, when there is one.
    pub next_offset: Option<usize>,
    /// `floor(offset / limit) + 1`.
    pub current_page: usize,
    /// `ceil(total / limit)`.
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Transform the items, keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            has_more: self.has_more,
            next_offset: self.next_offset,
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Slice `items` according to `pagination`. An offset past the end yields
/// an empty page, not an error.
pub fn paginate<T: Clone>(items: &[T], pagination: Pagination) -> Page<T> {
    let Pagination { offset, limit } = pagination;
    let total = items.len();
    let start = offset.min(total);
    let end = offset.saturating_add(limit).min(total);
    let has_more = offset.saturating_add(limit) < total;

    Page {
        items: items[start..end].to_vec(),
        total,
        offset,
        limit,
        has_more,
        next_offset: has_more.then(|| offset + limit),
        current_page: offset / limit + 1,
        total_pages: total / limit + usize::from(total % limit != 0),
    }
}

/// Cut `text` to [`DESCRIPTION_LIMIT`] characters, appending `...` when cut.
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Lightweight dataflow listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataflowSummary {
    /// Dataflow id.
    pub id: String,
    /// Maintaining agency.
    pub agency: String,
    /// Concrete version.
    pub version: String,
    /// Display name.
    pub name: String,
    /// Description, truncated.
    pub description: String,
    /// The DSD the dataflow is built on.
    pub structure: StructureRef,
}

impl From<&Dataflow> for DataflowSummary {
    fn from(df: &Dataflow) -> Self {
        Self {
            id: df.reference.id.clone(),
            agency: df.reference.agency_id.clone(),
            version: df.reference.version().to_string(),
            name: df.name.clone(),
            description: truncate_description(df.description.as_deref().unwrap_or_default()),
            structure: df.structure.clone(),
        }
    }
}

/// Filtered, paginated dataflow listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataflowPage {
    /// The requested page.
    pub page: Page<DataflowSummary>,
    /// Dataflows matching the keywords.
    pub total_found: usize,
    /// Dataflows before filtering.
    pub total_before_filtering: usize,
    /// Keywords applied.
    pub keywords: Vec<String>,
}

/// Filter dataflows by keyword and return one page of summaries.
pub fn discover_dataflows<S: AsRef<str>>(
    dataflows: &[Dataflow],
    keywords: &[S],
    pagination: Pagination,
) -> DataflowPage {
    let filtered = filter_dataflows(dataflows, keywords);
    let page = paginate(&filtered.matches, pagination).map(|df| DataflowSummary::from(&df));
    DataflowPage {
        page,
        total_found: filtered.total_found,
        total_before_filtering: filtered.total_before_filtering,
        keywords: filtered.keywords,
    }
}

/// One page of codes from a codelist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodePage {
    /// The codelist searched.
    pub codelist: ResolvedRef,
    /// The requested page of matching codes.
    pub page: Page<Code>,
    /// Codes matching the query.
    pub total_found: usize,
    /// Codes in the codelist.
    pub total_in_codelist: usize,
}

/// Search a codelist's codes by substring, with independent pagination.
///
/// `None` or a blank query returns all codes in source order.
pub fn search_codes(codelist: &Codelist, query: Option<&str>, pagination: Pagination) -> CodePage {
    let keywords: Vec<&str> = query.into_iter().collect();
    let filtered = filter_by_keywords(&codelist.codes, &keywords);
    CodePage {
        codelist: codelist.reference.clone(),
        page: paginate(&filtered.matches, pagination),
        total_found: filtered.total_found,
        total_in_codelist: filtered.total_before_filtering,
    }
}

/// One page of concepts from a concept scheme.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptPage {
    /// The scheme searched.
    pub scheme: ResolvedRef,
    /// Scheme display name.
    pub name: String,
    /// The requested page of matching concepts.
    pub page: Page<Concept>,
    /// Concepts matching the query.
    pub total_found: usize,
    /// Concepts in the scheme.
    pub total_in_scheme: usize,
}

/// Search a concept scheme by substring on concept id, name and
/// description.
///
/// `None` or a blank query returns every concept in id order.
pub fn search_concepts(scheme: &ConceptScheme, query: Option<&str>, pagination: Pagination) -> ConceptPage {
    let keywords: Vec<&str> = query.into_iter().collect();
    let filtered = filter_by_keywords(&scheme.items(), &keywords);
    ConceptPage {
        scheme: scheme.reference.clone(),
        name: scheme.name.clone(),
        page: paginate(&filtered.matches, pagination),
        total_found: filtered.total_found,
        total_in_scheme: filtered.total_before_filtering,
    }
}

/// A category in a browsed scheme, with the structures filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryNode {
    /// Category id.
    pub id: String,
    /// Dotted path from the top of the scheme, e.g. `ECO.TRADE`.
    pub path: String,
    /// Zero for top-level categories.
    pub level: usize,
    /// Display name.
    pub name: String,
    /// Description, truncated.
    pub description: String,
    /// Structures categorised here, sorted.
    pub dataflows: Vec<StructureRef>,
    /// Sub-categories in source order.
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// True when the category has sub-categories.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// A category scheme as a browsable tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTree {
    /// The scheme browsed.
    pub scheme: ResolvedRef,
    /// Scheme display name.
    pub name: String,
    /// Top-level categories.
    pub categories: Vec<CategoryNode>,
    /// Number of categories at every level.
    pub total_categories: usize,
    /// Number of categorisations that landed on a category of this scheme.
    pub total_categorised: usize,
}

impl CategoryTree {
    /// Find a node by dotted path.
    pub fn node(&self, path: &str) -> Option<&CategoryNode> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut found = self.categories.iter().find(|c| c.id == first);
        for segment in segments {
            found = found?.children.iter().find(|c| c.id == segment);
        }
        found
    }
}

/// Arrange `scheme` as a tree and attach the structures `categorisations`
/// file under each category.
///
/// Categorisations pointing at another scheme or at a category the scheme
/// does not define are ignored.
pub fn browse_categories(scheme: &CategoryScheme, categorisations: &[Categorisation]) -> CategoryTree {
    let relevant: Vec<&Categorisation> = categorisations
        .iter()
        .filter(|c| c.in_scheme(scheme.reference.as_structure_ref()))
        .collect();

    let mut placed = 0;
    let categories = scheme
        .categories
        .iter()
        .map(|c| category_node(c, "", 0, &relevant, &mut placed))
        .collect();

    CategoryTree {
        scheme: scheme.reference.clone(),
        name: scheme.name.clone(),
        categories,
        total_categories: scheme.entries().len(),
        total_categorised: placed,
    }
}

fn category_node(
    category: &Category,
    parent_path: &str,
    level: usize,
    categorisations: &[&Categorisation],
    placed: &mut usize,
) -> CategoryNode {
    let path = if parent_path.is_empty() {
        category.id.clone()
    } else {
        format!("{parent_path}.{}", category.id)
    };
    let mut dataflows: Vec<StructureRef> = categorisations
        .iter()
        .filter(|c| c.targets(&path))
        .map(|c| c.source.clone())
        .collect();
    dataflows.sort();
    dataflows.dedup();
    *placed += dataflows.len();

    CategoryNode {
        id: category.id.clone(),
        level,
        name: category.name.clone(),
        description: truncate_description(category.description.as_deref().unwrap_or_default()),
        dataflows,
        children: category
            .children
            .iter()
            .map(|c| category_node(c, &path, level + 1, categorisations, placed))
            .collect(),
        path,
    }
}

/// A dimension as shown in a structure summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionSummary {
    /// Dimension id.
    pub id: String,
    /// Zero-based position.
    pub position: usize,
    /// Dimension kind.
    pub kind: DimensionKind,
    /// Concept id.
    pub concept: String,
    /// Codelist, if coded.
    pub codelist: Option<StructureRef>,
}

impl From<&Dimension> for DimensionSummary {
    fn from(d: &Dimension) -> Self {
        Self {
            id: d.id.clone(),
            position: d.position,
            kind: d.kind,
            concept: d.concept.id.clone(),
            codelist: d.codelist.clone(),
        }
    }
}

/// An attribute as shown in a structure summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSummary {
    /// Attribute id.
    pub id: String,
    /// `Mandatory` or `Conditional`, if declared.
    pub assignment_status: Option<String>,
}

/// One step of the progressive query guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryStep {
    /// One-based step number.
    pub step: usize,
    /// Dimension to fill in.
    pub dimension: String,
    /// Dimension kind.
    pub kind: DimensionKind,
    /// What the caller should supply.
    pub instruction: String,
}

/// Ordered dimensions, key template and a query guide for a DSD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureSummary {
    /// The dataflow summarised, when known.
    pub dataflow: Option<ResolvedRef>,
    /// The DSD.
    pub structure: ResolvedRef,
    /// All dimensions in position order.
    pub dimensions: Vec<DimensionSummary>,
    /// Key dimension ids in key order (time dimension excluded).
    pub key_family: Vec<String>,
    /// E.g. `{FREQ}.{GEO}.{INDICATOR}`.
    pub key_template: String,
    /// The key selecting everything, e.g. `..`.
    pub example_key: String,
    /// Attributes.
    pub attributes: Vec<AttributeSummary>,
    /// Primary measure id.
    pub primary_measure: Option<String>,
    /// One step per dimension.
    pub query_guide: Vec<QueryStep>,
}

impl StructureSummary {
    /// Summarise `dsd`, optionally on behalf of `dataflow`.
    pub fn new(dataflow: Option<&Dataflow>, dsd: &DataStructure) -> Self {
        let key_family: Vec<String> = dsd.key_dimensions().map(|d| d.id.clone()).collect();
        let key_template = key_family
            .iter()
            .map(|id| format!("{{{id}}}"))
            .collect::<Vec<_>>()
            .join(".");
        let example_key = vec![""; key_family.len()].join(".");

        let query_guide = dsd
            .dimensions
            .iter()
            .enumerate()
            .map(|(i, d)| QueryStep {
                step: i + 1,
                dimension: d.id.clone(),
                kind: d.kind,
                instruction: instruction_for(d),
            })
            .collect();

        Self {
            dataflow: dataflow.map(|df| df.reference.clone()),
            structure: dsd.reference.clone(),
            dimensions: dsd.dimensions.iter().map(DimensionSummary::from).collect(),
            key_family,
            key_template,
            example_key,
            attributes: dsd
                .attributes
                .iter()
                .map(|a| AttributeSummary {
                    id: a.id.clone(),
                    assignment_status: a.assignment_status.clone(),
                })
                .collect(),
            primary_measure: dsd.primary_measure.as_ref().map(|m| m.id.clone()),
            query_guide,
        }
    }
}

fn instruction_for(dimension: &Dimension) -> String {
    match (&dimension.kind, &dimension.codelist) {
        (DimensionKind::TimeDimension, _) => {
            "Specify a time period (e.g. 2020, 2020-Q1, 2020-01) through startPeriod/endPeriod"
                .to_string()
        }
        (_, Some(cl)) => format!("Select a code from codelist {} or leave empty for all", cl.id),
        (_, None) => "Specify a value or leave empty for all".to_string(),
    }
}
