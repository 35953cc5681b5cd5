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

//! Structural comparison.
//!
//! Codelists are compared by code id, DSDs by the codelists and concept
//! schemes they reference. `compare(a, b)` and `compare(b, a)` always agree:
//! added and removed swap, modified entries swap their `from`/`to`, and
//! unchanged stays the same.

use crate::model::{Codelist, DataStructure};
use crate::reference::{ResolvedRef, StructureRef, StructureType};
use crate::resolver::compare_versions;
use serde::Serialize;
use std::collections::BTreeMap;

/// What was compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiffKind {
    /// Two codelists.
    CodelistDiff,
    /// Two data structure definitions.
    DsdDiff,
}

/// Whether the two sides are versions of one artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonType {
    /// Same agency and id, different versions.
    VersionComparison,
    /// Different artefacts.
    CrossStructure,
}

/// An item present on one or both sides.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DiffItem {
    /// Code id, or `AGENCY:ID` for a referenced structure.
    pub id: String,
    /// Code name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type of a referenced structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_type: Option<StructureType>,
    /// Version of a referenced structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// One change to an item present on both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Change {
    /// Display name changed.
    Renamed {
        /// Name on the left.
        from: String,
        /// Name on the right.
        to: String,
    },
    /// Referenced version changed.
    VersionChanged {
        /// Version on the left.
        from: String,
        /// Version on the right.
        to: String,
    },
}

impl Change {
    fn reversed(self) -> Change {
        match self {
            Change::Renamed { from, to } => Change::Renamed { from: to, to: from },
            Change::VersionChanged { from, to } => Change::VersionChanged { from: to, to: from },
        }
    }
}

/// An item present on both sides with differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModifiedItem {
    /// Item id as in [`DiffItem::id`].
    pub id: String,
    /// Type of a referenced structure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure_type: Option<StructureType>,
    /// What changed.
    pub changes: Vec<Change>,
}

/// Counts of a diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    /// Items only on the right.
    pub added: usize,
    /// Items only on the left.
    pub removed: usize,
    /// Items on both sides with changes.
    pub modified: usize,
    /// Identical items.
    pub unchanged: usize,
    /// `added + removed + modified`.
    pub total_changes: usize,
}

/// Result of comparing two structures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureDiff {
    /// What was compared.
    pub kind: DiffKind,
    /// Version or cross-structure comparison.
    pub comparison_type: ComparisonType,
    /// Left side.
    pub left: ResolvedRef,
    /// Right side.
    pub right: ResolvedRef,
    /// Only on the right, sorted by id.
    pub added: Vec<DiffItem>,
    /// Only on the left, sorted by id.
    pub removed: Vec<DiffItem>,
    /// On both sides with differences, sorted by id.
    pub modified: Vec<ModifiedItem>,
    /// Identical on both sides, sorted by id.
    pub unchanged: Vec<DiffItem>,
}

impl StructureDiff {
    /// Counts.
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            modified: self.modified.len(),
            unchanged: self.unchanged.len(),
            total_changes: self.added.len() + self.removed.len() + self.modified.len(),
        }
    }

    /// True if nothing was added, removed or modified.
    pub fn is_identical(&self) -> bool {
        self.summary().total_changes == 0
    }

    /// The diff as if the sides had been given the other way round.
    pub fn reversed(self) -> StructureDiff {
        StructureDiff {
            kind: self.kind,
            comparison_type: self.comparison_type,
            left: self.right,
            right: self.left,
            added: self.removed,
            removed: self.added,
            modified: self
                .modified
                .into_iter()
                .map(|m| ModifiedItem {
                    changes: m.changes.into_iter().map(Change::reversed).collect(),
                    ..m
                })
                .collect(),
            unchanged: self.unchanged,
        }
    }
}

fn comparison_type(left: &ResolvedRef, right: &ResolvedRef) -> ComparisonType {
    if left.agency_id == right.agency_id && left.id == right.id {
        ComparisonType::VersionComparison
    } else {
        ComparisonType::CrossStructure
    }
}

/// Compare two codelists by code id.
///
/// A code on both sides with a different name is modified, never
/// added plus removed.
pub fn compare_codelists(left: &Codelist, right: &Codelist) -> StructureDiff {
    let l: BTreeMap<&str, &str> = left.codes.iter().map(|c| (c.id.as_str(), c.name.as_str())).collect();
    let r: BTreeMap<&str, &str> = right.codes.iter().map(|c| (c.id.as_str(), c.name.as_str())).collect();
    let item = |id: &str, name: &str| DiffItem {
        id: id.to_string(),
        name: Some(name.to_string()),
        structure_type: None,
        version: None,
    };

    let mut diff = StructureDiff {
        kind: DiffKind::CodelistDiff,
        comparison_type: comparison_type(&left.reference, &right.reference),
        left: left.reference.clone(),
        right: right.reference.clone(),
        added: Vec::new(),
        removed: Vec::new(),
        modified: Vec::new(),
        unchanged: Vec::new(),
    };

    for (id, name) in &l {
        match r.get(id) {
            None => diff.removed.push(item(*id, *name)),
            Some(other) if other == name => diff.unchanged.push(item(*id, *name)),
            Some(other) => diff.modified.push(ModifiedItem {
                id: id.to_string(),
                structure_type: None,
                changes: vec![Change::Renamed {
                    from: name.to_string(),
                    to: other.to_string(),
                }],
            }),
        }
    }
    for (id, name) in &r {
        if !l.contains_key(id) {
            diff.added.push(item(*id, *name));
        }
    }
    diff
}

type RefKey = (StructureType, String, String);

/// Referenced codelists and concept schemes keyed by type, agency and id.
/// If one artefact is referenced at several versions the newest wins.
fn referenced(dsd: &DataStructure) -> BTreeMap<RefKey, String> {
    let mut out: BTreeMap<RefKey, String> = BTreeMap::new();
    for r in dsd.references() {
        let StructureRef {
            structure_type,
            agency_id,
            id,
            version,
        } = r;
        let version = version.as_str().to_string();
        out.entry((structure_type, agency_id, id))
            .and_modify(|existing| {
                if compare_versions(&version, existing).is_gt() {
                    *existing = version.clone();
                }
            })
            .or_insert(version);
    }
    out
}

/// Compare two DSDs by the codelists and concept schemes they reference.
///
/// References match on type, agency and id; a version change on a matched
/// reference is reported as modified.
pub fn compare_data_structures(left: &DataStructure, right: &DataStructure) -> StructureDiff {
    let l = referenced(left);
    let r = referenced(right);
    let item = |(t, agency, id): &RefKey, version: &str| DiffItem {
        id: format!("{agency}:{id}"),
        name: None,
        structure_type: Some(*t),
        version: Some(version.to_string()),
    };

    let mut diff = StructureDiff {
        kind: DiffKind::DsdDiff,
        comparison_type: comparison_type(&left.reference, &right.reference),
        left: left.reference.clone(),
        right: right.reference.clone(),
        added: Vec::new(),
        removed: Vec::new(),
        modified: Vec::new(),
        unchanged: Vec::new(),
    };

    for (key, version) in &l {
        match r.get(key) {
            None => diff.removed.push(item(key, version.as_str())),
            Some(other) if other == version => diff.unchanged.push(item(key, version.as_str())),
            Some(other) => diff.modified.push(ModifiedItem {
                id: format!("{}:{}", key.1, key.2),
                structure_type: Some(key.0),
                changes: vec![Change::VersionChanged {
                    from: version.clone(),
                    to: other.clone(),
                }],
            }),
        }
    }
    for (key, version) in &r {
        if !l.contains_key(key) {
            diff.added.push(item(key, version.as_str()));
        }
    }

    // BTreeMap order is by type first; present results by id
    diff.added.sort();
    diff.removed.sort();
    diff.unchanged.sort();
    diff.modified
        .sort_by(|a, b| (&a.id, a.structure_type).cmp(&(&b.id, b.structure_type)));
    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Code, ConceptRef, Dimension, DimensionKind};

    fn geo(version: &str, codes: &[(&str, &str)]) -> Codelist {
        Codelist {
            reference: ResolvedRef::new(StructureType::Codelist, "SPC", "CL_GEO", version).unwrap(),
            name: "Geo".to_string(),
            codes: codes.iter().map(|(id, name)| Code::new(*id, *name)).collect(),
        }
    }

    fn ids(items: &[DiffItem]) -> Vec<&str> {
        items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_codelist_version_diff() {
        let v1 = geo("1.0", &[("TO", "Tonga"), ("FJ", "Fiji")]);
        let v2 = geo("2.0", &[("TO", "Kingdom of Tonga"), ("FJ", "Fiji"), ("PW", "Palau")]);
        let diff = compare_codelists(&v1, &v2);
        assert_eq!(ids(&diff.added), vec!["PW"]);
        assert!(diff.removed.is_empty());
        assert_eq!(diff.modified.len(), 1);
        assert_eq!(diff.modified[0].id, "TO");
        assert_eq!(ids(&diff.unchanged), vec!["FJ"]);
        assert_eq!(diff.comparison_type, ComparisonType::VersionComparison);
        assert_eq!(diff.summary().total_changes, 2);
    }

    #[test]
    fn test_reversed_matches_swapped_arguments() {
        let v1 = geo("1.0", &[("TO", "Tonga"), ("FJ", "Fiji")]);
        let v2 = geo("2.0", &[("TO", "Kingdom of Tonga"), ("PW", "Palau")]);
        assert_eq!(compare_codelists(&v1, &v2).reversed(), compare_codelists(&v2, &v1));
    }

    #[test]
    fn test_self_comparison_is_identical() {
        let v1 = geo("1.0", &[("TO", "Tonga"), ("FJ", "Fiji")]);
        let diff = compare_codelists(&v1, &v1);
        assert!(diff.is_identical());
        assert_eq!(diff.unchanged.len(), 2);
    }

    fn dsd(id: &str, refs: &[(&str, &str)]) -> DataStructure {
        let scheme = StructureRef::new(StructureType::ConceptScheme, "SPC", "CS_COMMON", "1.0");
        DataStructure {
            reference: ResolvedRef::new(StructureType::DataStructure, "SPC", id, "1.0").unwrap(),
            name: id.to_string(),
            dimensions: refs
                .iter()
                .enumerate()
                .map(|(i, (cl, version))| Dimension {
                    id: format!("D{i}"),
                    position: i,
                    kind: DimensionKind::Dimension,
                    concept: ConceptRef {
                        scheme: scheme.clone(),
                        id: format!("D{i}"),
                    },
                    codelist: Some(StructureRef::new(StructureType::Codelist, "SPC", *cl, *version)),
                })
                .collect(),
            attributes: vec![],
            primary_measure: None,
        }
    }

    #[test]
    fn test_dsd_diff_reports_version_change() {
        let a = dsd("DSD_A", &[("CL_GEO", "1.0"), ("CL_FREQ", "1.0"), ("CL_OLD", "1.0")]);
        let b = dsd("DSD_B", &[("CL_GEO", "2.0"), ("CL_FREQ", "1.0"), ("CL_NEW", "1.0")]);
        let diff = compare_data_structures(&a, &b);
        assert_eq!(diff.kind, DiffKind::DsdDiff);
        assert_eq!(diff.comparison_type, ComparisonType::CrossStructure);
        assert_eq!(ids(&diff.added), vec!["SPC:CL_NEW"]);
        assert_eq!(ids(&diff.removed), vec!["SPC:CL_OLD"]);
        assert_eq!(
            diff.modified[0].changes,
            vec![Change::VersionChanged {
                from: "1.0".to_string(),
                to: "2.0".to_string()
            }]
        );
        assert_eq!(ids(&diff.unchanged), vec!["SPC:CL_FREQ", "SPC:CS_COMMON"]);
        assert_eq!(compare_data_structures(&b, &a), diff.reversed());
    }

    #[test]
    fn test_duplicate_references_keep_newest() {
        let a = dsd("DSD_A", &[("CL_GEO", "1.0"), ("CL_GEO", "1.10")]);
        let refs = referenced(&a);
        let key = (StructureType::Codelist, "SPC".to_string(), "CL_GEO".to_string());
        assert_eq!(refs[&key], "1.10");
    }
}
