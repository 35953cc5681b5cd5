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

//! Endpoint and engine configuration.
//!
//! Configuration is always a value handed to the engine per call. Nothing
//! here is process-global; [`EndpointConfig::from_env`] reads the
//! environment once and returns a plain value.

use crate::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};

/// Environment variable selecting a preset endpoint.
pub const ENV_ENDPOINT: &str = "SDMX_ENDPOINT";
/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "SDMX_BASE_URL";
/// Environment variable overriding the agency id.
pub const ENV_AGENCY_ID: &str = "SDMX_AGENCY_ID";

/// Preset used when nothing is configured.
pub const DEFAULT_ENDPOINT: &str = "SPC";

/// Default number of concurrent fetches per traversal level.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Default number of responses a caching fetcher keeps.
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

/// An SDMX REST provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Short key, e.g. `ECB`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// REST base URL without a trailing slash.
    pub base_url: String,
    /// Agency owning most of the provider's structures.
    pub agency_id: String,
    /// One-line description.
    pub description: String,
    /// Agency to use when listing dataflows, if it differs from `agency_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataflow_agency: Option<String>,
    /// `references` detail levels the provider accepts.
    #[serde(default)]
    pub references_support: Vec<String>,
}

const FULL_REFERENCES: &[&str] = &["none", "children", "parents", "all"];

fn preset(
    key: &str,
    name: &str,
    base_url: &str,
    agency_id: &str,
    description: &str,
    references: &[&str],
) -> EndpointConfig {
    EndpointConfig {
        key: key.to_string(),
        name: name.to_string(),
        base_url: base_url.to_string(),
        agency_id: agency_id.to_string(),
        description: description.to_string(),
        dataflow_agency: None,
        references_support: references.iter().map(|r| r.to_string()).collect(),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn spc() -> EndpointConfig {
    preset(
        "SPC",
        "Pacific Data Hub",
        "https://stats-sdmx-disseminate.pacificdata.org/rest",
        "SPC",
        "Pacific regional statistics",
        FULL_REFERENCES,
    )
}

impl EndpointConfig {
    /// All built-in presets.
    pub fn presets() -> Vec<EndpointConfig> {
        let mut oecd = preset(
            "OECD",
            "OECD",
            "https://sdmx.oecd.org/public/rest",
            "OECD",
            "OECD countries economic and social statistics",
            FULL_REFERENCES,
        );
        // dataflows live under sub-agencies such as OECD.CTP.TPS
        oecd.dataflow_agency = Some("all".to_string());

        vec![
            spc(),
            preset(
                "ECB",
                "European Central Bank",
                "https://data-api.ecb.europa.eu/service",
                "ECB",
                "European financial and economic statistics",
                FULL_REFERENCES,
            ),
            preset(
                "UNICEF",
                "UNICEF",
                "https://sdmx.data.unicef.org/ws/public/sdmxapi/rest",
                "UNICEF",
                "Children and youth statistics",
                FULL_REFERENCES,
            ),
            preset(
                "IMF",
                "International Monetary Fund",
                "https://api.imf.org/external/sdmx/2.1",
                "IMF.STA",
                "Global financial statistics",
                FULL_REFERENCES,
            ),
            oecd,
            preset(
                "ESTAT",
                "Eurostat",
                "https://ec.europa.eu/eurostat/api/dissemination/sdmx/2.1",
                "ESTAT",
                "European Union official statistics",
                &["none", "children", "descendants"],
            ),
            preset(
                "ILO",
                "International Labour Organization",
                "https://sdmx.ilo.org/rest",
                "ILO",
                "Labour and employment statistics",
                FULL_REFERENCES,
            ),
            preset(
                "ABS",
                "Australian Bureau of Statistics",
                "https://data.api.abs.gov.au/rest",
                "ABS",
                "Australian official statistics",
                FULL_REFERENCES,
            ),
            preset(
                "BIS",
                "Bank for International Settlements",
                "https://stats.bis.org/api/v1",
                "BIS",
                "International financial statistics",
                FULL_REFERENCES,
            ),
        ]
    }

    /// Look up a preset by key (case-insensitive).
    pub fn preset(key: &str) -> Result<EndpointConfig> {
        let presets = Self::presets();
        let available = presets.iter().map(|p| p.key.clone()).collect();
        presets
            .into_iter()
            .find(|p| p.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| ValidationError::UnknownEndpoint {
                key: key.to_string(),
                available,
            })
    }

    /// A custom endpoint not covered by a preset.
    pub fn custom(base_url: impl Into<String>, agency_id: impl Into<String>) -> EndpointConfig {
        EndpointConfig {
            key: "CUSTOM".to_string(),
            name: "Custom SDMX endpoint".to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            agency_id: agency_id.into(),
            description: "Custom SDMX endpoint".to_string(),
            dataflow_agency: None,
            references_support: Vec::new(),
        }
    }

    /// Resolve configuration from the three optional settings.
    ///
    /// A base URL wins over the preset key; its agency falls back to
    /// `CUSTOM`. Without either, the default preset is used.
    pub fn from_vars(
        endpoint: Option<&str>,
        base_url: Option<&str>,
        agency_id: Option<&str>,
    ) -> Result<EndpointConfig> {
        if let Some(url) = non_empty(base_url) {
            return Ok(Self::custom(url, non_empty(agency_id).unwrap_or("CUSTOM")));
        }
        let mut config = Self::preset(non_empty(endpoint).unwrap_or(DEFAULT_ENDPOINT))?;
        if let Some(agency) = non_empty(agency_id) {
            config.agency_id = agency.to_string();
        }
        Ok(config)
    }

    /// Read `SDMX_ENDPOINT`, `SDMX_BASE_URL` and `SDMX_AGENCY_ID`.
    pub fn from_env() -> Result<EndpointConfig> {
        let var = |name: &str| std::env::var(name).ok();
        let (endpoint, base_url, agency) = (var(ENV_ENDPOINT), var(ENV_BASE_URL), var(ENV_AGENCY_ID));
        Self::from_vars(endpoint.as_deref(), base_url.as_deref(), agency.as_deref())
    }

    /// Agency to list dataflows under.
    pub fn listing_agency(&self) -> &str {
        self.dataflow_agency.as_deref().unwrap_or(&self.agency_id)
    }

    /// The `references` value to send for `desired`, or the closest the
    /// provider supports. `None` when nothing useful is supported.
    ///
    /// Endpoints that declare no support list accept anything.
    pub fn best_references<'a>(&'a self, desired: &'a str) -> Option<&'a str> {
        if self.references_support.is_empty() || self.references_support.iter().any(|r| r == desired) {
            return Some(desired);
        }
        if desired == "all" && self.references_support.iter().any(|r| r == "descendants") {
            return Some("descendants");
        }
        None
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        spc()
    }
}

/// Engine behaviour settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Concurrent fetches per graph level (default: 4).
    pub max_concurrency: usize,

    /// Maximum graph depth below the root (default: None = unbounded).
    pub max_depth: Option<usize>,

    /// Language picked from multilingual names (default: "en").
    pub preferred_language: String,

    /// Treat codes missing from a codelist as errors (default: false).
    pub strict_codes: bool,

    /// Show versions in graph node labels (default: true).
    pub show_versions: bool,

    /// Responses a caching fetcher keeps before evicting the oldest
    /// (default: 1000).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_depth: None,
            preferred_language: "en".to_string(),
            strict_codes: false,
            show_versions: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Start building a configuration.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

/// Builder for [`EngineConfig`].
///
/// ```
/// # use sdmx_core::EngineConfig;
/// let config = EngineConfig::builder()
///     .max_concurrency(8)
///     .max_depth(2)
///     .strict_codes(true)
///     .build();
/// assert_eq!(config.max_concurrency, 8);
/// ```
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    max_concurrency: Option<usize>,
    max_depth: Option<Option<usize>>,
    preferred_language: Option<String>,
    strict_codes: Option<bool>,
    show_versions: Option<bool>,
    cache_capacity: Option<usize>,
}

impl EngineConfigBuilder {
    /// Create a new builder with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fetch concurrency limit; zero is raised to one.
    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit.max(1));
        self
    }

    /// Limit graph depth.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(Some(depth));
        self
    }

    /// Remove the depth limit.
    pub fn unbounded_depth(mut self) -> Self {
        self.max_depth = Some(None);
        self
    }

    /// Set the preferred language for names.
    pub fn preferred_language(mut self, lang: impl Into<String>) -> Self {
        self.preferred_language = Some(lang.into());
        self
    }

    /// Set strict code checking.
    pub fn strict_codes(mut self, strict: bool) -> Self {
        self.strict_codes = Some(strict);
        self
    }

    /// Set whether graph labels show versions.
    pub fn show_versions(mut self, show: bool) -> Self {
        self.show_versions = Some(show);
        self
    }

    /// Set the response cache capacity; zero is raised to one.
    pub fn cache_capacity(mut self, entries: usize) -> Self {
        self.cache_capacity = Some(entries.max(1));
        self
    }

    /// Build the configuration, falling back to defaults.
    pub fn build(self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            max_concurrency: self.max_concurrency.unwrap_or(defaults.max_concurrency),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            preferred_language: self.preferred_language.unwrap_or(defaults.preferred_language),
            strict_codes: self.strict_codes.unwrap_or(defaults.strict_codes),
            show_versions: self.show_versions.unwrap_or(defaults.show_versions),
            cache_capacity: self.cache_capacity.unwrap_or(defaults.cache_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_cover_known_providers() {
        let keys: Vec<_> = EndpointConfig::presets().into_iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["SPC", "ECB", "UNICEF", "IMF", "OECD", "ESTAT", "ILO", "ABS", "BIS"]);
    }

    #[test]
    fn test_preset_lookup_is_case_insensitive() {
        assert_eq!(EndpointConfig::preset("ecb").unwrap().agency_id, "ECB");
        let err = EndpointConfig::preset("NOPE").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownEndpoint { .. }));
    }

    #[test]
    fn test_from_vars_precedence() {
        let default = EndpointConfig::from_vars(None, None, None).unwrap();
        assert_eq!(default.key, "SPC");

        let custom = EndpointConfig::from_vars(Some("ECB"), Some("https://example.org/rest/"), None).unwrap();
        assert_eq!(custom.base_url, "https://example.org/rest");
        assert_eq!(custom.agency_id, "CUSTOM");

        let overridden = EndpointConfig::from_vars(Some("IMF"), None, Some("IMF.RES")).unwrap();
        assert_eq!(overridden.agency_id, "IMF.RES");
        assert_eq!(overridden.key, "IMF");
    }

    #[test]
    fn test_listing_agency() {
        assert_eq!(EndpointConfig::preset("OECD").unwrap().listing_agency(), "all");
        assert_eq!(EndpointConfig::preset("BIS").unwrap().listing_agency(), "BIS");
    }

    #[test]
    fn test_best_references_fallback() {
        let estat = EndpointConfig::preset("ESTAT").unwrap();
        assert_eq!(estat.best_references("all"), Some("descendants"));
        assert_eq!(estat.best_references("parents"), None);
        assert_eq!(estat.best_references("children"), Some("children"));
        let custom = EndpointConfig::custom("https://x", "X");
        assert_eq!(custom.best_references("parents"), Some("parents"));
    }

    #[test]
    fn test_engine_config_builder() {
        let config = EngineConfig::builder().max_concurrency(0).max_depth(3).build();
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.max_depth, Some(3));
        assert_eq!(config.preferred_language, "en");
        assert!(!config.strict_codes);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(EngineConfig::builder().cache_capacity(0).build().cache_capacity, 1);
    }

    #[test]
    fn test_cache_capacity_defaults_when_absent() {
        let json = r#"{"max_concurrency":2,"max_depth":null,"preferred_language":"fr","strict_codes":false,"show_versions":true}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(config.max_concurrency, 2);
    }
}
