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

//! Structure reference resolution.
//!
//! Turns a reference that may say `latest` into a concrete one, given the
//! versions known for that artefact. The newest version wins, comparing
//! dotted components numerically (`1.10` is newer than `1.9`, and `1.0`
//! equals `1.0.0`). With no known candidates the reference is deferred
//! unchanged to the fetch port, which applies the provider's own notion of
//! "latest".

use crate::error::VersionResolutionError;
use crate::reference::{ResolvedRef, StructureRef, Version};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Component<'a> {
    Number(u64),
    Text(&'a str),
}

fn components(version: &str) -> Vec<Component<'_>> {
    version
        .split('.')
        .map(|part| match part.parse::<u64>() {
            Ok(n) => Component::Number(n),
            Err(_) => Component::Text(part),
        })
        .collect()
}

/// Compare two concrete version strings.
///
/// Components are compared as integers; the shorter version is padded with
/// zeros. A non-numeric component sorts after any numeric one and compares
/// as text against other non-numeric components.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (components(a), components(b));
    let len = ca.len().max(cb.len());
    for i in 0..len {
        let x = ca.get(i).unwrap_or(&Component::Number(0));
        let y = cb.get(i).unwrap_or(&Component::Number(0));
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The version is concrete.
    Resolved(ResolvedRef),
    /// Nothing was known; the reference goes to the fetch port as-is.
    Deferred(StructureRef),
}

impl Resolution {
    /// The reference, resolved or not.
    pub fn reference(&self) -> &StructureRef {
        match self {
            Resolution::Resolved(r) => r.as_structure_ref(),
            Resolution::Deferred(r) => r,
        }
    }

    /// The resolved reference, if resolution succeeded.
    pub fn resolved(self) -> Option<ResolvedRef> {
        match self {
            Resolution::Resolved(r) => Some(r),
            Resolution::Deferred(_) => None,
        }
    }
}

/// Resolve `reference` against a set of known versions.
///
/// Concrete references pass through untouched. `Latest` references pick the
/// newest concrete candidate; if no candidates are known the reference is
/// deferred.
pub fn resolve(
    reference: &StructureRef,
    candidates: &[Version],
) -> Result<Resolution, VersionResolutionError> {
    if let Some(resolved) = reference.clone().into_resolved() {
        return Ok(Resolution::Resolved(resolved));
    }

    let mut concrete: Vec<&str> = candidates.iter().filter_map(Version::concrete).collect();
    concrete.sort_unstable();
    concrete.dedup();

    let newest = match concrete
        .iter()
        .copied()
        .max_by(|a, b| compare_versions(a, b))
    {
        Some(v) => v,
        None => return Ok(Resolution::Deferred(reference.clone())),
    };

    let tied: Vec<String> = concrete
        .iter()
        .filter(|v| compare_versions(v, newest) == Ordering::Equal)
        .map(|v| v.to_string())
        .collect();
    if tied.len() > 1 {
        return Err(VersionResolutionError::Ambiguous {
            reference: reference.clone(),
            candidates: tied,
        });
    }

    Ok(Resolution::Resolved(ResolvedRef::with_concrete(
        reference.clone(),
        newest,
    )))
}

/// Resolve against references seen elsewhere (sibling structures, a
/// partial listing). Only references to the same artefact count as
/// candidates; with none the reference is deferred.
pub fn resolve_among(
    reference: &StructureRef,
    known: &[StructureRef],
) -> Result<Resolution, VersionResolutionError> {
    let candidates: Vec<Version> = known
        .iter()
        .filter(|k| k.same_artefact(reference))
        .map(|k| k.version.clone())
        .collect();
    resolve(reference, &candidates)
}

/// Resolve against an authoritative listing from the provider.
///
/// Unlike [`resolve_among`], an empty match here is the provider saying the
/// structure does not exist, so it fails with
/// [`VersionResolutionError::NoMatch`]. Concrete references must appear in
/// the listing too.
pub fn resolve_in_listing(
    reference: &StructureRef,
    listing: &[StructureRef],
) -> Result<ResolvedRef, VersionResolutionError> {
    let no_match = || VersionResolutionError::NoMatch {
        reference: reference.clone(),
    };
    let candidates: Vec<Version> = listing
        .iter()
        .filter(|k| reference.matches(k))
        .map(|k| k.version.clone())
        .collect();
    if candidates.is_empty() {
        return Err(no_match());
    }
    resolve(reference, &candidates)?.resolved().ok_or_else(no_match)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::StructureType;

    fn cl(version: &str) -> StructureRef {
        StructureRef::new(StructureType::Codelist, "SPC", "CL_GEO", version)
    }

    #[test]
    fn test_compare_numeric_components() {
        assert_eq!(compare_versions("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare_versions("2.0", "10.0"), Ordering::Less);
        assert_eq!(compare_versions("1.0", "1.0.0"), Ordering::Equal);
        assert_eq!(compare_versions("1.0.1", "1.0"), Ordering::Greater);
    }

    #[test]
    fn test_compare_text_after_numbers() {
        assert_eq!(compare_versions("1.0.rc", "1.0.5"), Ordering::Greater);
        assert_eq!(compare_versions("1.a", "1.b"), Ordering::Less);
    }

    #[test]
    fn test_concrete_passes_through() {
        let r = cl("1.0");
        let res = resolve(&r, &[Version::parse("2.0")]).unwrap();
        assert_eq!(res.reference(), &r);
    }

    #[test]
    fn test_latest_picks_newest() {
        let r = cl("latest");
        let res = resolve(
            &r,
            &[Version::parse("1.9"), Version::parse("1.10"), Version::Latest],
        )
        .unwrap();
        assert_eq!(res.resolved().unwrap().version(), "1.10");
    }

    #[test]
    fn test_latest_without_candidates_is_deferred() {
        let r = cl("latest");
        assert_eq!(resolve(&r, &[]).unwrap(), Resolution::Deferred(r.clone()));
    }

    #[test]
    fn test_equal_but_distinct_versions_are_ambiguous() {
        let r = cl("latest");
        let err = resolve(&r, &[Version::parse("1.0"), Version::parse("1.0.0")]).unwrap_err();
        assert!(matches!(err, VersionResolutionError::Ambiguous { .. }));
    }

    #[test]
    fn test_duplicate_candidates_are_not_ambiguous() {
        let r = cl("latest");
        let res = resolve(&r, &[Version::parse("1.0"), Version::parse("1.0")]).unwrap();
        assert_eq!(res.resolved().unwrap().version(), "1.0");
    }

    #[test]
    fn test_resolve_among_ignores_other_artefacts() {
        let r = cl("latest");
        let other = StructureRef::new(StructureType::Codelist, "SPC", "CL_FREQ", "9.0");
        let res = resolve_among(&r, &[cl("1.0"), other]).unwrap();
        assert_eq!(res.resolved().unwrap().version(), "1.0");
    }

    #[test]
    fn test_listing_without_match_fails() {
        let r = cl("latest");
        let other = StructureRef::new(StructureType::Codelist, "SPC", "CL_FREQ", "1.0");
        let err = resolve_in_listing(&r, &[other]).unwrap_err();
        assert_eq!(err, VersionResolutionError::NoMatch { reference: r });
    }

    #[test]
    fn test_listing_missing_concrete_version_fails() {
        let err = resolve_in_listing(&cl("3.0"), &[cl("1.0"), cl("2.0")]).unwrap_err();
        assert!(matches!(err, VersionResolutionError::NoMatch { .. }));
        let ok = resolve_in_listing(&cl("2.0"), &[cl("1.0"), cl("2.0")]).unwrap();
        assert_eq!(ok.version(), "2.0");
    }
}
