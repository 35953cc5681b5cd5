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

//! Data availability from content constraints.
//!
//! Values are reported per dimension. A code listed for one dimension and a
//! code listed for another are each known to occur, but nothing here says
//! the two occur together in a series.

use crate::error::Result;
use crate::model::{ConstraintType, ContentConstraint, CubeRegion, DataStructure, TimeRange};
use crate::period::{classify_overlap, compare_ends, compare_starts, Overlap};
use crate::reference::{ResolvedRef, StructureRef};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Text attached to every report describing the per-dimension limitation.
pub const PER_DIMENSION_LIMITATION: &str = "Availability is reported per dimension. \
A combination of values from different dimensions may still have no data; \
query the combination to confirm.";

/// Valid values for one key dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DimensionAvailability {
    /// Dimension id.
    pub dimension: String,
    /// Zero-based key position.
    pub position: usize,
    /// Values with data; `None` when no constraint restricts the dimension.
    pub values: Option<BTreeSet<String>>,
}

/// Availability of a dataflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityReport {
    /// Key dimensions in key order.
    pub dimensions: Vec<DimensionAvailability>,
    /// Union of all time coverage.
    pub time_range: Option<TimeRange>,
    /// Constraints that contributed.
    pub constraints: Vec<ResolvedRef>,
    /// Constrained dimension ids the DSD does not define.
    pub unknown_dimensions: Vec<String>,
    /// Exclusion regions that could not be applied per dimension: those
    /// spanning several dimensions, and those on a dimension no include
    /// region lists.
    pub skipped_exclusions: usize,
    /// One description per skipped exclusion, e.g. `FREQ not in {M}`.
    pub unapplied_exclusions: Vec<String>,
    /// True when values are independent per dimension (always the case).
    pub per_dimension_only: bool,
    /// Human-readable statement of the limitation, naming any unapplied
    /// exclusions.
    pub limitation: String,
}

impl AvailabilityReport {
    /// Availability for one dimension.
    pub fn dimension(&self, id: &str) -> Option<&DimensionAvailability> {
        self.dimensions.iter().find(|d| d.dimension == id)
    }

    /// `Some(true)` if `code` has data for `dimension`, `Some(false)` if
    /// not, `None` if the dimension is unknown or unconstrained.
    pub fn is_available(&self, dimension: &str, code: &str) -> Option<bool> {
        self.dimension(dimension)?.values.as_ref().map(|v| v.contains(code))
    }

    /// How a query period relates to the available time range. With no
    /// known time range any period may have data.
    pub fn overlap(&self, start: Option<&str>, end: Option<&str>) -> Result<Overlap> {
        match &self.time_range {
            Some(range) => classify_overlap(start, end, range),
            None => Ok(Overlap::Full),
        }
    }

    /// True if no constraint contributed.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}

#[derive(Default)]
struct Collected {
    values: BTreeMap<String, BTreeSet<String>>,
    time_range: Option<TimeRange>,
    constraints: Vec<ResolvedRef>,
    unknown: BTreeSet<String>,
    unapplied: Vec<String>,
}

fn describe_exclusion(region: &CubeRegion) -> String {
    region
        .values
        .iter()
        .map(|(dim, values)| {
            let values: Vec<&str> = values.iter().map(String::as_str).collect();
            format!("{dim} not in {{{}}}", values.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

fn limitation_text(unapplied: &[String]) -> String {
    if unapplied.is_empty() {
        PER_DIMENSION_LIMITATION.to_string()
    } else {
        format!(
            "{PER_DIMENSION_LIMITATION} Exclusions not applied: {}.",
            unapplied.join("; ")
        )
    }
}

fn merge_time(acc: &mut Option<TimeRange>, range: TimeRange) {
    *acc = Some(match acc.take() {
        Some(existing) => existing.union(&range),
        None => range,
    });
}

/// Time coverage expressed as plain values on the time dimension, from the
/// period starting first to the period ending last.
fn time_from_values(values: &BTreeSet<String>) -> Option<TimeRange> {
    let first = values.iter().min_by(|a, b| compare_starts(a, b))?;
    let last = values.iter().max_by(|a, b| compare_ends(a, b))?;
    Some(TimeRange {
        start: Some(first.clone()),
        end: Some(last.clone()),
    })
}

fn collect(
    dsd: &DataStructure,
    constraints: &[ContentConstraint],
    constraint_type: ConstraintType,
    dataflow: Option<&StructureRef>,
) -> Collected {
    let time_id = dsd.time_dimension().map(|d| d.id.as_str());
    let mut out = Collected::default();

    let applicable = constraints.iter().filter(|c| {
        c.constraint_type == constraint_type
            && match dataflow {
                Some(df) => c.attachments.is_empty() || c.applies_to(df),
                None => true,
            }
    });

    for constraint in applicable {
        out.constraints.push(constraint.reference.clone());
        if let Some(range) = &constraint.time_range {
            merge_time(&mut out.time_range, range.clone());
        }

        let (includes, excludes): (Vec<&CubeRegion>, Vec<&CubeRegion>) =
            constraint.cube_regions.iter().partition(|r| r.include);

        for region in includes {
            for (dim, values) in &region.values {
                if Some(dim.as_str()) == time_id {
                    if let Some(range) = time_from_values(values) {
                        merge_time(&mut out.time_range, range);
                    }
                } else if dsd.dimension(dim).is_some() {
                    out.values
                        .entry(dim.clone())
                        .and_modify(|existing| existing.retain(|v| values.contains(v)))
                        .or_insert_with(|| values.clone());
                } else {
                    out.unknown.insert(dim.clone());
                }
            }
        }

        for region in excludes {
            let single = match region.values.iter().next() {
                Some((dim, values)) if region.values.len() == 1 => out.values.get_mut(dim).map(|e| (e, values)),
                _ => None,
            };
            match single {
                Some((existing, values)) => existing.retain(|v| !values.contains(v)),
                None => out.unapplied.push(describe_exclusion(region)),
            }
        }
    }
    out
}

/// Resolve availability for a DSD from `Actual` constraints.
///
/// Include regions are intersected per dimension; single-dimension exclude
/// regions are subtracted. When `dataflow` is given only constraints
/// attached to it (or to nothing) are used. Time coverage is the union of
/// all `<TimeRange>` elements and time dimension values.
pub fn resolve_availability(
    dsd: &DataStructure,
    constraints: &[ContentConstraint],
    dataflow: Option<&StructureRef>,
) -> AvailabilityReport {
    let mut collected = collect(dsd, constraints, ConstraintType::Actual, dataflow);
    let dimensions = dsd
        .key_dimensions()
        .enumerate()
        .map(|(position, d)| DimensionAvailability {
            dimension: d.id.clone(),
            position,
            values: collected.values.remove(&d.id),
        })
        .collect();

    AvailabilityReport {
        dimensions,
        time_range: collected.time_range,
        constraints: collected.constraints,
        unknown_dimensions: collected.unknown.into_iter().collect(),
        skipped_exclusions: collected.unapplied.len(),
        per_dimension_only: true,
        limitation: limitation_text(&collected.unapplied),
        unapplied_exclusions: collected.unapplied,
    }
}

/// How much of the allowed code space actually has data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionCoverage {
    /// Dimension id.
    pub dimension: String,
    /// Number of allowed values.
    pub allowed: usize,
    /// Number of allowed values with data.
    pub actual: usize,
    /// Allowed values without data.
    pub unused: Vec<String>,
    /// `actual / allowed` as a percentage.
    pub coverage_percent: f64,
}

/// Compare `Actual` against `Allowed` constraints per dimension. Only
/// dimensions restricted by both kinds are reported.
pub fn constraint_coverage(
    dsd: &DataStructure,
    constraints: &[ContentConstraint],
    dataflow: Option<&StructureRef>,
) -> Vec<DimensionCoverage> {
    let allowed = collect(dsd, constraints, ConstraintType::Allowed, dataflow).values;
    let actual = collect(dsd, constraints, ConstraintType::Actual, dataflow).values;

    dsd.key_dimensions()
        .filter_map(|d| {
            let allowed = allowed.get(&d.id)?;
            let actual = actual.get(&d.id)?;
            let used = allowed.intersection(actual).count();
            let unused: Vec<String> = allowed.difference(actual).cloned().collect();
            let coverage_percent = if allowed.is_empty() {
                0.0
            } else {
                used as f64 * 100.0 / allowed.len() as f64
            };
            Some(DimensionCoverage {
                dimension: d.id.clone(),
                allowed: allowed.len(),
                actual: used,
                unused,
                coverage_percent,
            })
        })
        .collect()
}
