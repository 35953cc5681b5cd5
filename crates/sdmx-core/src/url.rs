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

//! Data query URLs.
//!
//! Builds `{base}/data/{agency},{flow},{version}/{key}/{provider}` with
//! `startPeriod`, `endPeriod` and `format` parameters, always in that order,
//! so identical input always gives a byte-identical URL.

use crate::context::{Confirmation, RequestContext};
use crate::error::{Result, ValidationError};
use crate::key::{CodeWarning, DataKey, DimensionValues, KeyBuilder};
use crate::model::{Codelist, DataStructure};
use crate::period::{check_bounds, validate_period};
use crate::reference::StructureRef;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

static PROVIDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9_.-]*(\+[A-Za-z][A-Za-z0-9_.-]*)*$")
        .expect("provider pattern is valid")
});

/// Provider segment selecting every data provider.
pub const ALL_PROVIDERS: &str = "all";

/// Output format for data queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum DataFormat {
    /// SDMX-CSV.
    #[default]
    Csv,
    /// SDMX-JSON.
    Json,
    /// Structure-specific SDMX-ML, the provider default.
    Xml,
}

impl DataFormat {
    /// Value of the `format` query parameter, if one is sent.
    pub fn query_param(&self) -> Option<&'static str> {
        match self {
            DataFormat::Csv => Some("csv"),
            DataFormat::Json => Some("jsondata"),
            DataFormat::Xml => None,
        }
    }

    /// `Accept` header for this format.
    pub fn accept_header(&self) -> &'static str {
        match self {
            DataFormat::Csv => "application/vnd.sdmx.data+csv;version=1.0.0",
            DataFormat::Json => "application/vnd.sdmx.data+json;version=1.0.0",
            DataFormat::Xml => "application/vnd.sdmx.structurespecificdata+xml;version=2.1",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataFormat::Csv => "csv",
            DataFormat::Json => "json",
            DataFormat::Xml => "xml",
        })
    }
}

impl FromStr for DataFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "sdmx-csv" => Ok(DataFormat::Csv),
            "json" | "sdmx-json" => Ok(DataFormat::Json),
            "xml" | "sdmx-xml" => Ok(DataFormat::Xml),
            _ => Err(ValidationError::UnknownFormat(s.to_string())),
        }
    }
}

/// Everything that determines a data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataQuery {
    /// Dataflow being queried.
    pub dataflow: StructureRef,
    /// Series key.
    pub key: DataKey,
    /// Data provider; `None` means all.
    pub provider: Option<String>,
    /// Lower period bound.
    pub start_period: Option<String>,
    /// Upper period bound.
    pub end_period: Option<String>,
    /// Output format.
    pub format: DataFormat,
}

/// A ready-to-use data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataUrl {
    /// The full URL.
    pub url: String,
    /// Value for the `Accept` header.
    pub accept: &'static str,
    /// The key as written in the URL.
    pub key: String,
    /// Effective lower bound.
    pub start_period: Option<String>,
    /// Effective upper bound.
    pub end_period: Option<String>,
    /// Unconfirmed codes used in the key.
    pub warnings: Vec<CodeWarning>,
}

/// Build the URL for `query` against `base_url`.
pub fn build_data_url(base_url: &str, query: &DataQuery) -> Result<DataUrl> {
    let provider = query.provider.as_deref().map(str::trim).unwrap_or(ALL_PROVIDERS);
    if provider != ALL_PROVIDERS && !PROVIDER_RE.is_match(provider) {
        return Err(ValidationError::InvalidProvider(provider.to_string()));
    }
    let start = query.start_period.as_deref().map(validate_period).transpose()?;
    let end = query.end_period.as_deref().map(validate_period).transpose()?;
    if let (Some(s), Some(e)) = (&start, &end) {
        check_bounds(s, e)?;
    }

    let key = query.key.to_url_segment();
    let df = &query.dataflow;
    let mut url = format!(
        "{}/data/{},{},{}/{}/{}",
        base_url.trim_end_matches('/'),
        df.agency_id,
        df.id,
        df.version,
        key,
        provider
    );

    let mut params = Vec::new();
    if let Some(s) = &start {
        params.push(format!("startPeriod={s}"));
    }
    if let Some(e) = &end {
        params.push(format!("endPeriod={e}"));
    }
    if let Some(fmt) = query.format.query_param() {
        params.push(format!("format={fmt}"));
    }
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }

    Ok(DataUrl {
        url,
        accept: query.format.accept_header(),
        key,
        start_period: start,
        end_period: end,
        warnings: Vec::new(),
    })
}

/// Inputs for [`plan_data_url`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRequest {
    /// Dimension selections; time dimension values become period bounds.
    pub values: DimensionValues,
    /// Output format.
    pub format: DataFormat,
    /// Explicit lower bound; wins over a time dimension value.
    pub start_period: Option<String>,
    /// Explicit upper bound; wins over a time dimension value.
    pub end_period: Option<String>,
    /// Data provider.
    pub provider: Option<String>,
}

/// Build a key from dimension values and turn it into a data URL.
///
/// Unknown codes fail in strict mode. Otherwise they ask for confirmation
/// when the caller can confirm, and are applied with warnings when it
/// cannot.
pub fn plan_data_url(
    ctx: &RequestContext,
    dataflow: &StructureRef,
    dsd: &DataStructure,
    codelists: &[Codelist],
    request: &DataRequest,
    strict: bool,
) -> Result<Confirmation<DataUrl>> {
    let built = KeyBuilder::new(dsd)
        .with_codelists(codelists)
        .strict(strict)
        .build(&request.values)?;

    let query = DataQuery {
        dataflow: dataflow.clone(),
        key: built.key,
        provider: request.provider.clone(),
        start_period: request.start_period.clone().or(built.start_period),
        end_period: request.end_period.clone().or(built.end_period),
        format: request.format,
    };
    let mut data_url = build_data_url(&ctx.endpoint.base_url, &query)?;
    data_url.warnings = built.warnings;

    if data_url.warnings.is_empty() || !ctx.can_confirm {
        return Ok(Confirmation::Applied(data_url));
    }

    let codes: Vec<String> = data_url
        .warnings
        .iter()
        .map(|w| format!("{}={}", w.dimension, w.code))
        .collect();
    Ok(Confirmation::NeedsConfirmation {
        message: format!(
            "{} code(s) not found in their codelists: {}. Build the URL anyway?",
            codes.len(),
            codes.join(", ")
        ),
        options: vec!["proceed".to_string(), "cancel".to_string()],
        pending: data_url,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::StructureType;

    fn query(format: DataFormat) -> DataQuery {
        DataQuery {
            dataflow: StructureRef::new(StructureType::Dataflow, "SPC", "DF_X", "1.0"),
            key: DataKey::from_segments(vec![vec!["A".into()], vec!["TO".into(), "FJ".into()], vec![]]),
            provider: None,
            start_period: Some("2018".to_string()),
            end_period: Some("2023".to_string()),
            format,
        }
    }

    #[test]
    fn test_url_parameter_order() {
        let url = build_data_url("https://example.org/rest/", &query(DataFormat::Csv)).unwrap();
        assert_eq!(
            url.url,
            "https://example.org/rest/data/SPC,DF_X,1.0/A.TO+FJ./all?startPeriod=2018&endPeriod=2023&format=csv"
        );
        assert_eq!(url.accept, "application/vnd.sdmx.data+csv;version=1.0.0");
    }

    #[test]
    fn test_xml_sends_no_format() {
        let mut q = query(DataFormat::Xml);
        q.start_period = None;
        q.end_period = None;
        let url = build_data_url("https://example.org/rest", &q).unwrap();
        assert!(url.url.ends_with("/A.TO+FJ./all"));
    }

    #[test]
    fn test_all_empty_key_is_written_all() {
        let mut q = query(DataFormat::Json);
        q.key = DataKey::from_segments(vec![vec![], vec![]]);
        q.dataflow = StructureRef::latest(StructureType::Dataflow, "SPC", "DF_X");
        let url = build_data_url("https://x", &q).unwrap();
        assert!(url.url.starts_with("https://x/data/SPC,DF_X,latest/all/all?"));
        assert!(url.url.ends_with("format=jsondata"));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut q = query(DataFormat::Csv);
        q.provider = Some("1BAD".to_string());
        assert!(matches!(build_data_url("https://x", &q), Err(ValidationError::InvalidProvider(_))));
        let mut q = query(DataFormat::Csv);
        q.start_period = Some("2020-13".to_string());
        assert!(matches!(build_data_url("https://x", &q), Err(ValidationError::InvalidPeriod(_))));
        let mut q = query(DataFormat::Csv);
        q.start_period = Some("2024-Q1".to_string());
        assert!(matches!(build_data_url("https://x", &q), Err(ValidationError::InvertedPeriod { .. })));
        assert!("parquet".parse::<DataFormat>().is_err());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<DataFormat>().unwrap(), DataFormat::Json);
        assert_eq!("sdmx-csv".parse::<DataFormat>().unwrap(), DataFormat::Csv);
    }
}
