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

//! Property-based tests for the pure analyses
//!
//! # Properties Tested
//!
//! 1. **Pagination**: slice length is `min(limit, max(0, total - offset))` and
//!    `has_more == offset + limit < total`
//! 2. **Key Round-trip**: parsing a built key recovers the dimension map
//! 3. **Key Injectivity**: distinct dimension maps give distinct keys
//! 4. **Comparator Anti-symmetry**: swapping sides swaps added/removed and
//!    keeps modified/unchanged
//! 5. **Version Ordering**: comparison is antisymmetric and zero padding is
//!    irrelevant

use proptest::prelude::*;
use sdmx_core::compare::compare_codelists;
use sdmx_core::discovery::{paginate, Pagination};
use sdmx_core::key::{build_key, parse_key, DimensionValues};
use sdmx_core::model::{Code, Codelist, ConceptRef, DataStructure, Dimension, DimensionKind};
use sdmx_core::reference::{ResolvedRef, StructureRef, StructureType};
use sdmx_core::resolver::compare_versions;
use std::cmp::Ordering;
use std::collections::BTreeMap;

const DIMENSIONS: [&str; 4] = ["FREQ", "GEO", "INDICATOR", "SEX"];

fn dsd() -> DataStructure {
    let scheme = StructureRef::new(StructureType::ConceptScheme, "SPC", "CS", "1.0");
    let mut dimensions: Vec<Dimension> = DIMENSIONS
        .iter()
        .enumerate()
        .map(|(position, id)| Dimension {
            id: id.to_string(),
            position,
            kind: DimensionKind::Dimension,
            concept: ConceptRef {
                scheme: scheme.clone(),
                id: id.to_string(),
            },
            codelist: None,
        })
        .collect();
    dimensions.push(Dimension {
        id: "TIME_PERIOD".to_string(),
        position: DIMENSIONS.len(),
        kind: DimensionKind::TimeDimension,
        concept: ConceptRef {
            scheme,
            id: "TIME_PERIOD".to_string(),
        },
        codelist: None,
    });
    DataStructure {
        reference: ResolvedRef::new(StructureType::DataStructure, "SPC", "DSD_P", "1.0").unwrap(),
        name: "Property DSD".to_string(),
        dimensions,
        attributes: vec![],
        primary_measure: None,
    }
}

fn dimension_values() -> impl Strategy<Value = DimensionValues> {
    let code = "[A-Z][A-Z0-9_]{0,5}".prop_filter("all selects everything", |c| !c.eq_ignore_ascii_case("all"));
    prop::collection::btree_map(
        prop::sample::select(DIMENSIONS.to_vec()).prop_map(str::to_string),
        prop::collection::vec(code, 1..4),
        0..=DIMENSIONS.len(),
    )
}

fn codelist(version: &str, codes: BTreeMap<String, String>) -> Codelist {
    Codelist {
        reference: ResolvedRef::new(StructureType::Codelist, "SPC", "CL_P", version).unwrap(),
        name: "Codes".to_string(),
        codes: codes.into_iter().map(|(id, name)| Code::new(id, name)).collect(),
    }
}

fn codes() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[A-E]{1,2}", "[ab]{1,2}", 0..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: page length and has_more follow the pagination formulas
    #[test]
    fn prop_pagination_bounds(total in 0usize..300, offset in 0usize..400, limit in 1usize..60) {
        let items: Vec<usize> = (0..total).collect();
        let page = paginate(&items, Pagination::new(offset, limit).unwrap());
        prop_assert_eq!(page.items.len(), limit.min(total.saturating_sub(offset)));
        prop_assert_eq!(page.has_more, offset + limit < total);
        prop_assert_eq!(page.current_page, offset / limit + 1);
        prop_assert_eq!(page.total_pages, (total + limit - 1) / limit);
        if let Some(first) = page.items.first() {
            prop_assert_eq!(*first, offset);
        }
    }

    /// Property: parse_key(build_key(map)) == map
    #[test]
    fn prop_key_round_trip(values in dimension_values()) {
        let dsd = dsd();
        let key = build_key(&dsd, &values).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let parsed = parse_key(&dsd, &key.to_string()).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(parsed, values);
    }

    /// Property: different maps never share a key
    #[test]
    fn prop_key_injective(a in dimension_values(), b in dimension_values()) {
        prop_assume!(a != b);
        let dsd = dsd();
        let ka = build_key(&dsd, &a).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let kb = build_key(&dsd, &b).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_ne!(ka.to_string(), kb.to_string());
    }

    /// Property: diff(A, B) is diff(B, A) reversed
    #[test]
    fn prop_codelist_diff_antisymmetric(a in codes(), b in codes()) {
        let left = codelist("1.0", a);
        let right = codelist("2.0", b);
        let forward = compare_codelists(&left, &right);
        let backward = compare_codelists(&right, &left);
        prop_assert_eq!(&forward.added, &backward.removed);
        prop_assert_eq!(&forward.removed, &backward.added);
        prop_assert_eq!(&forward.unchanged, &backward.unchanged);
        prop_assert_eq!(forward.reversed(), backward);
    }

    /// Property: diff(A, A) has no changes and keeps every item unchanged
    #[test]
    fn prop_codelist_self_diff(a in codes()) {
        let cl = codelist("1.0", a);
        let diff = compare_codelists(&cl, &cl);
        prop_assert!(diff.added.is_empty());
        prop_assert!(diff.removed.is_empty());
        prop_assert!(diff.modified.is_empty());
        prop_assert_eq!(diff.unchanged.len(), cl.codes.len());
    }

    /// Property: version comparison is antisymmetric and ignores zero padding
    #[test]
    fn prop_version_ordering(a in prop::collection::vec(0u64..20, 1..4), b in prop::collection::vec(0u64..20, 1..4)) {
        let join = |v: &[u64]| v.iter().map(u64::to_string).collect::<Vec<_>>().join(".");
        let (va, vb) = (join(&a), join(&b));
        prop_assert_eq!(compare_versions(&va, &vb), compare_versions(&vb, &va).reverse());
        prop_assert_eq!(compare_versions(&va, &format!("{va}.0")), Ordering::Equal);
    }
}
