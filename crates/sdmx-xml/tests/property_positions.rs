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

//! Property-based tests for dimension ordering
//!
//! # Properties Tested
//!
//! 1. **Contiguity**: parsed positions are exactly `0..n` whatever the
//!    document order and base
//! 2. **Stability**: the dimension given position `p` in the source ends up
//!    at index `p - base`
//! 3. **Rejection**: any gap or duplicate fails with `NonContiguousPositions`

use proptest::prelude::*;
use sdmx_test::fixtures::builders::{DimensionSpec, MessageBuilder};
use sdmx_xml::{parse_data_structures, ParseConfig, ParseError};

/// Dimension ids with shuffled source positions.
fn shuffled(max: usize) -> impl Strategy<Value = Vec<usize>> {
    (1..=max).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

fn message(positions: &[usize]) -> String {
    let dims: Vec<DimensionSpec> = positions
        .iter()
        .enumerate()
        .map(|(i, p)| DimensionSpec::coded(&format!("D{i}"), *p, "CL_ANY"))
        .collect();
    MessageBuilder::new().data_structure("DSD_P", &dims).build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: positions come out as 0..n, sorted
    #[test]
    fn prop_positions_contiguous(order in shuffled(8), one_based in any::<bool>()) {
        let base = usize::from(one_based);
        let positions: Vec<usize> = order.iter().map(|p| p + base).collect();
        let dsd = parse_data_structures(&message(&positions), &ParseConfig::default())
            .map_err(|e| TestCaseError::fail(e.to_string()))?
            .remove(0);

        let parsed: Vec<usize> = dsd.dimensions.iter().map(|d| d.position).collect();
        prop_assert_eq!(parsed, (0..positions.len()).collect::<Vec<_>>());

        for (i, p) in order.iter().enumerate() {
            prop_assert_eq!(&dsd.dimensions[*p].id, &format!("D{i}"));
        }
    }

    /// Property: a gap or duplicate is always rejected
    #[test]
    fn prop_broken_positions_rejected(order in shuffled(6), victim in any::<prop::sample::Index>(), bump in 1usize..4) {
        let mut positions: Vec<usize> = order.iter().map(|p| p + 1).collect();
        let i = victim.index(positions.len());
        // Pushing one position past n always leaves a hole
        positions[i] += positions.len() + bump;

        let err = parse_data_structures(&message(&positions), &ParseConfig::default()).unwrap_err();
        let is_non_contiguous = matches!(err, ParseError::NonContiguousPositions { .. });
        prop_assert!(is_non_contiguous, "unexpected error {:?}", err);
    }
}

#[test]
fn test_duplicate_position_rejected() {
    let err = parse_data_structures(&message(&[1, 1, 2]), &ParseConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::NonContiguousPositions { positions, .. } if positions == vec![1, 1, 2]
    ));
}
