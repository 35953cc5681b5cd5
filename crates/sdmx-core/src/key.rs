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

//! SDMX series keys.
//!
//! A key has one segment per key dimension in position order; an empty
//! segment selects every value and several values in one segment are joined
//! by `+`. The time dimension is never a key segment: values supplied for it
//! become period bounds instead.

use crate::error::{Result, ValidationError};
use crate::model::{Codelist, DataStructure, Dimension};
use crate::period::{check_bounds, parse_period};
use crate::reference::StructureRef;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

static COMPONENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_@$-]+$").expect("component pattern is valid"));

/// Dimension id → selected values.
pub type DimensionValues = BTreeMap<String, Vec<String>>;

/// The key that selects everything, as written in URLs.
pub const ALL_KEY: &str = "all";

/// True for inputs meaning "any value": empty, `*` or `all`.
///
/// [`KeyBuilder`] keeps `all` as a code when the dimension's codelist
/// defines it, since some providers publish `ALL` for totals.
pub fn is_wildcard(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "*" || v.eq_ignore_ascii_case(ALL_KEY)
}

/// True if `value` is a legal key component.
pub fn is_valid_component(value: &str) -> bool {
    COMPONENT_RE.is_match(value)
}

/// An ordered SDMX key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DataKey {
    segments: Vec<Vec<String>>,
}

impl DataKey {
    /// Key from raw segments in key order.
    pub fn from_segments(segments: Vec<Vec<String>>) -> Self {
        Self { segments }
    }

    /// Segments in key order; an empty segment means any value.
    pub fn segments(&self) -> &[Vec<String>] {
        &self.segments
    }

    /// True when every segment is empty.
    pub fn is_all(&self) -> bool {
        self.segments.iter().all(Vec::is_empty)
    }

    /// The key as it appears in a data URL; a key with no values is `all`.
    pub fn to_url_segment(&self) -> String {
        if self.is_all() {
            ALL_KEY.to_string()
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.segments.iter().map(|s| s.join("+")).collect();
        f.write_str(&text.join("."))
    }
}

/// A code not found in the dimension's codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeWarning {
    /// Dimension the code was supplied for.
    pub dimension: String,
    /// The unknown code.
    pub code: String,
    /// Codelist that was consulted.
    pub codelist: StructureRef,
}

impl fmt::Display for CodeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code '{}' not found in {} for dimension '{}'",
            self.code, self.codelist, self.dimension
        )
    }
}

/// Output of a key build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltKey {
    /// The key.
    pub key: DataKey,
    /// Lower period bound taken from a time dimension value.
    pub start_period: Option<String>,
    /// Upper period bound taken from a time dimension value.
    pub end_period: Option<String>,
    /// Codes that could not be confirmed against their codelist.
    pub warnings: Vec<CodeWarning>,
}

/// Whether a code is known to its dimension's codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CodeStatus {
    /// Present, with its display name.
    Known(String),
    /// Absent from a loaded codelist.
    Unknown,
    /// The dimension is uncoded or its codelist was not loaded.
    Unverified,
}

/// Result of checking one code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeCheck {
    /// Dimension id.
    pub dimension: String,
    /// The code checked.
    pub code: String,
    /// Outcome.
    pub status: CodeStatus,
}

impl CodeCheck {
    /// False only for codes proven absent.
    pub fn is_valid(&self) -> bool {
        self.status != CodeStatus::Unknown
    }
}

/// One dimension of an explained key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyPart {
    /// Zero-based position among key dimensions.
    pub position: usize,
    /// Dimension id.
    pub dimension: String,
    /// Selected codes with names where known; empty for "all values".
    pub values: Vec<(String, Option<String>)>,
}

impl KeyPart {
    /// True if this segment selects every value.
    pub fn is_wildcard(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builds and validates keys against one DSD.
#[derive(Debug, Clone)]
pub struct KeyBuilder<'a> {
    dsd: &'a DataStructure,
    codelists: Vec<&'a Codelist>,
    strict: bool,
}

impl<'a> KeyBuilder<'a> {
    /// Builder for `dsd` with no codelists loaded.
    pub fn new(dsd: &'a DataStructure) -> Self {
        Self {
            dsd,
            codelists: Vec::new(),
            strict: false,
        }
    }

    /// Codelists used to check supplied codes.
    pub fn with_codelists(mut self, codelists: impl IntoIterator<Item = &'a Codelist>) -> Self {
        self.codelists.extend(codelists);
        self
    }

    /// Treat unknown codes as errors instead of warnings.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn unknown_dimension(&self, id: &str) -> ValidationError {
        ValidationError::UnknownDimension {
            dimension: id.to_string(),
            valid: self.dsd.dimensions.iter().map(|d| d.id.clone()).collect(),
        }
    }

    /// Wildcard input, unless it is a code of the dimension's codelist.
    fn selects_everything(&self, dimension: &Dimension, value: &str) -> bool {
        is_wildcard(value) && !self.codelist_for(dimension).map_or(false, |cl| cl.contains(value))
    }

    fn codelist_for(&self, dimension: &Dimension) -> Option<&'a Codelist> {
        let wanted = dimension.codelist.as_ref()?;
        self.codelists
            .iter()
            .copied()
            .find(|cl| wanted.matches(cl.reference.as_structure_ref()))
    }

    /// Check one code against the codelist of `dimension`.
    pub fn check_code(&self, dimension: &str, code: &str) -> Result<CodeCheck> {
        let dim = self
            .dsd
            .dimension(dimension)
            .ok_or_else(|| self.unknown_dimension(dimension))?;
        let status = match self.codelist_for(dim) {
            Some(cl) => match cl.code(code) {
                Some(c) => CodeStatus::Known(c.name.clone()),
                None => CodeStatus::Unknown,
            },
            None => CodeStatus::Unverified,
        };
        Ok(CodeCheck {
            dimension: dim.id.clone(),
            code: code.to_string(),
            status,
        })
    }

    /// Check several codes for one dimension, in input order.
    pub fn check_codes<S: AsRef<str>>(&self, dimension: &str, codes: &[S]) -> Result<Vec<CodeCheck>> {
        codes.iter().map(|c| self.check_code(dimension, c.as_ref())).collect()
    }

    /// Build a key from a dimension → values map.
    ///
    /// Absent dimensions and wildcard values give empty segments. Values for
    /// the time dimension become `start_period`/`end_period`: `2020` sets both
    /// bounds, `2018..2023` sets a range.
    pub fn build(&self, values: &DimensionValues) -> Result<BuiltKey> {
        if let Some(unknown) = values.keys().find(|id| self.dsd.dimension(id).is_none()) {
            return Err(self.unknown_dimension(unknown));
        }

        let mut warnings = Vec::new();
        let mut segments = Vec::new();
        let mut start_period = None;
        let mut end_period = None;

        for dim in &self.dsd.dimensions {
            let selected: Vec<&str> = values
                .get(&dim.id)
                .map(|vs| {
                    vs.iter()
                        .map(|v| v.trim())
                        .filter(|v| !self.selects_everything(dim, v))
                        .collect()
                })
                .unwrap_or_default();

            if dim.is_time() {
                if let Some((start, end)) = period_bounds(&selected)? {
                    start_period = Some(start);
                    end_period = Some(end);
                }
                continue;
            }

            let mut segment = Vec::with_capacity(selected.len());
            for value in selected {
                if !is_valid_component(value) {
                    return Err(ValidationError::InvalidKeyComponent {
                        dimension: dim.id.clone(),
                        value: value.to_string(),
                    });
                }
                if let Some(cl) = self.codelist_for(dim) {
                    if !cl.contains(value) {
                        if self.strict {
                            return Err(ValidationError::UnknownCode {
                                dimension: dim.id.clone(),
                                code: value.to_string(),
                                codelist: cl.reference.as_structure_ref().clone(),
                            });
                        }
                        warnings.push(CodeWarning {
                            dimension: dim.id.clone(),
                            code: value.to_string(),
                            codelist: cl.reference.as_structure_ref().clone(),
                        });
                    }
                }
                segment.push(value.to_string());
            }
            segments.push(segment);
        }

        Ok(BuiltKey {
            key: DataKey::from_segments(segments),
            start_period,
            end_period,
            warnings,
        })
    }

    /// Validate a positional key string and build it like [`build`](Self::build).
    pub fn build_positional(&self, key: &str) -> Result<BuiltKey> {
        let values = parse_key(self.dsd, key)?;
        self.build(&values)
    }

    /// Break a key into per-dimension selections with code names.
    pub fn explain(&self, key: &str) -> Result<Vec<KeyPart>> {
        let values = parse_key(self.dsd, key)?;
        Ok(self
            .dsd
            .key_dimensions()
            .enumerate()
            .map(|(position, dim)| {
                let codelist = self.codelist_for(dim);
                let selected = values.get(&dim.id).cloned().unwrap_or_default();
                KeyPart {
                    position,
                    dimension: dim.id.clone(),
                    values: selected
                        .into_iter()
                        .map(|code| {
                            let name = codelist.and_then(|cl| cl.code(&code)).map(|c| c.name.clone());
                            (code, name)
                        })
                        .collect(),
                }
            })
            .collect())
    }
}

/// Turn time dimension values into `(start, end)` bounds.
fn period_bounds(values: &[&str]) -> Result<Option<(String, String)>> {
    let mut bounds: Option<(String, String)> = None;
    for value in values {
        let (start, end) = match value.split_once("..") {
            Some((s, e)) => (s.trim(), e.trim()),
            None => (*value, *value),
        };
        check_bounds(start, end)?;
        let (start_range, end_range) = (parse_period(start)?, parse_period(end)?);
        bounds = Some(match bounds {
            None => (start.to_string(), end.to_string()),
            Some((s, e)) => {
                let s = if start_range.start < parse_period(&s)?.start { start.to_string() } else { s };
                let e = if end_range.end > parse_period(&e)?.end { end.to_string() } else { e };
                (s, e)
            }
        });
    }
    Ok(bounds)
}

/// Build a key for `dsd` without codelist checks.
pub fn build_key(dsd: &DataStructure, values: &DimensionValues) -> Result<DataKey> {
    KeyBuilder::new(dsd).build(values).map(|b| b.key)
}

/// Parse a positional key against `dsd` into dimension → values.
///
/// `all` (any case) selects everything. Otherwise the key must have exactly
/// one segment per key dimension. Empty segments are left out of the map.
pub fn parse_key(dsd: &DataStructure, key: &str) -> Result<DimensionValues> {
    let key = key.trim();
    let mut values = DimensionValues::new();
    if key.eq_ignore_ascii_case(ALL_KEY) {
        return Ok(values);
    }

    let dims: Vec<&Dimension> = dsd.key_dimensions().collect();
    let segments: Vec<&str> = key.split('.').collect();
    if segments.len() != dims.len() {
        return Err(ValidationError::KeyLength {
            key: key.to_string(),
            expected: dims.len(),
            found: segments.len(),
        });
    }

    for (dim, segment) in dims.into_iter().zip(segments) {
        if segment.is_empty() {
            continue;
        }
        let mut selected = Vec::new();
        for component in segment.split('+') {
            if !is_valid_component(component) {
                return Err(ValidationError::InvalidKeyComponent {
                    dimension: dim.id.clone(),
                    value: component.to_string(),
                });
            }
            selected.push(component.to_string());
        }
        values.insert(dim.id.clone(), selected);
    }
    Ok(values)
}

/// Explain a key without codelist names.
pub fn explain_key(dsd: &DataStructure, key: &str) -> Result<Vec<KeyPart>> {
    KeyBuilder::new(dsd).explain(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Code, ConceptRef, DimensionKind};
    use crate::reference::{ResolvedRef, StructureType};

    fn dsd() -> DataStructure {
        let scheme = StructureRef::new(StructureType::ConceptScheme, "SPC", "CS", "1.0");
        let dim = |id: &str, position, kind, cl: Option<&str>| Dimension {
            id: id.to_string(),
            position,
            kind,
            concept: ConceptRef {
                scheme: scheme.clone(),
                id: id.to_string(),
            },
            codelist: cl.map(|c| StructureRef::new(StructureType::Codelist, "SPC", c, "1.0")),
        };
        DataStructure {
            reference: ResolvedRef::new(StructureType::DataStructure, "SPC", "DSD_Y", "1.0")
                .unwrap(),
            name: "Y".to_string(),
            dimensions: vec![
                dim("FREQ", 0, DimensionKind::Dimension, Some("CL_FREQ")),
                dim("GEO", 1, DimensionKind::Dimension, Some("CL_GEO")),
                dim("INDICATOR", 2, DimensionKind::Dimension, None),
                dim("TIME_PERIOD", 3, DimensionKind::TimeDimension, None),
            ],
            attributes: vec![],
            primary_measure: None,
        }
    }

    fn geo() -> Codelist {
        Codelist {
            reference: ResolvedRef::new(StructureType::Codelist, "SPC", "CL_GEO", "1.0").unwrap(),
            name: "Geo".to_string(),
            codes: vec![Code::new("TO", "Tonga"), Code::new("FJ", "Fiji")],
        }
    }

    fn values(pairs: &[(&str, &[&str])]) -> DimensionValues {
        pairs
            .iter()
            .map(|(k, vs)| (k.to_string(), vs.iter().map(|v| v.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_build_fills_missing_dimensions() {
        let dsd = dsd();
        let key = build_key(&dsd, &values(&[("GEO", &["TO"]), ("FREQ", &["A"])])).unwrap();
        assert_eq!(key.to_string(), "A.TO.");
    }

    #[test]
    fn test_multiple_values_join_with_plus() {
        let dsd = dsd();
        let key = build_key(&dsd, &values(&[("GEO", &["TO", "FJ"])])).unwrap();
        assert_eq!(key.to_string(), ".TO+FJ.");
    }

    #[test]
    fn test_wildcards_give_empty_segments() {
        let dsd = dsd();
        let key = build_key(&dsd, &values(&[("GEO", &["*"]), ("FREQ", &["all"])])).unwrap();
        assert!(key.is_all());
        assert_eq!(key.to_url_segment(), "all");
    }

    #[test]
    fn test_all_code_is_kept_when_published() {
        let dsd = dsd();
        let geo = Codelist {
            codes: vec![Code::new("ALL", "All countries"), Code::new("TO", "Tonga")],
            ..geo()
        };
        let builder = KeyBuilder::new(&dsd).with_codelists([&geo]);
        let built = builder.build(&values(&[("GEO", &["ALL"]), ("FREQ", &["ALL"])])).unwrap();
        assert_eq!(built.key.to_string(), ".ALL.");
        assert!(built.warnings.is_empty());

        let lower = builder.build(&values(&[("GEO", &["all"])])).unwrap();
        assert!(lower.key.is_all());
    }

    #[test]
    fn test_unknown_dimension_is_rejected() {
        let dsd = dsd();
        let err = build_key(&dsd, &values(&[("REGION", &["X"])])).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownDimension { ref dimension, .. } if dimension == "REGION"));
    }

    #[test]
    fn test_invalid_component_is_rejected() {
        let dsd = dsd();
        let err = build_key(&dsd, &values(&[("GEO", &["T O"])])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidKeyComponent { .. }));
    }

    #[test]
    fn test_unknown_code_warns_or_fails() {
        let dsd = dsd();
        let cl = geo();
        let input = values(&[("GEO", &["PW"])]);
        let lenient = KeyBuilder::new(&dsd).with_codelists([&cl]).build(&input).unwrap();
        assert_eq!(lenient.warnings.len(), 1);
        assert_eq!(lenient.key.to_string(), ".PW.");

        let strict = KeyBuilder::new(&dsd).with_codelists([&cl]).strict(true).build(&input);
        assert!(matches!(strict, Err(ValidationError::UnknownCode { .. })));
    }

    #[test]
    fn test_time_values_become_periods() {
        let dsd = dsd();
        let built = KeyBuilder::new(&dsd)
            .build(&values(&[("TIME_PERIOD", &["2018..2023"]), ("FREQ", &["A"])]))
            .unwrap();
        assert_eq!(built.key.to_string(), "A..");
        assert_eq!(built.start_period.as_deref(), Some("2018"));
        assert_eq!(built.end_period.as_deref(), Some("2023"));

        let single = KeyBuilder::new(&dsd).build(&values(&[("TIME_PERIOD", &["2020"])])).unwrap();
        assert_eq!(single.start_period, single.end_period);

        let bad = KeyBuilder::new(&dsd).build(&values(&[("TIME_PERIOD", &["soon"])]));
        assert!(matches!(bad, Err(ValidationError::InvalidPeriod(_))));

        let inverted = KeyBuilder::new(&dsd).build(&values(&[("TIME_PERIOD", &["2023..2018"])]));
        assert_eq!(
            inverted.unwrap_err(),
            ValidationError::InvertedPeriod {
                start: "2023".to_string(),
                end: "2018".to_string()
            }
        );
    }

    #[test]
    fn test_parse_key_round_trip() {
        let dsd = dsd();
        let input = values(&[("FREQ", &["A", "M"]), ("INDICATOR", &["ICT_1"])]);
        let key = build_key(&dsd, &input).unwrap();
        assert_eq!(parse_key(&dsd, &key.to_string()).unwrap(), input);
    }

    #[test]
    fn test_parse_key_length_mismatch() {
        let dsd = dsd();
        let err = parse_key(&dsd, "A.TO").unwrap_err();
        assert_eq!(
            err,
            ValidationError::KeyLength {
                key: "A.TO".to_string(),
                expected: 3,
                found: 2
            }
        );
        assert!(parse_key(&dsd, "ALL").unwrap().is_empty());
    }

    #[test]
    fn test_explain_key_names_codes() {
        let dsd = dsd();
        let cl = geo();
        let parts = KeyBuilder::new(&dsd).with_codelists([&cl]).explain("A.TO+XX.").unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[1].values[0], ("TO".to_string(), Some("Tonga".to_string())));
        assert_eq!(parts[1].values[1], ("XX".to_string(), None));
        assert!(parts[2].is_wildcard());
    }

    #[test]
    fn test_check_codes_batch() {
        let dsd = dsd();
        let cl = geo();
        let builder = KeyBuilder::new(&dsd).with_codelists([&cl]);
        let checks = builder.check_codes("GEO", &["TO", "ZZ"]).unwrap();
        assert_eq!(checks[0].status, CodeStatus::Known("Tonga".to_string()));
        assert!(!checks[1].is_valid());
        let uncoded = builder.check_code("INDICATOR", "ANY").unwrap();
        assert_eq!(uncoded.status, CodeStatus::Unverified);
        assert!(builder.check_code("NOPE", "X").is_err());
    }
}
