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

//! Parser configuration and document kinds

use sdmx_core::{EngineConfig, StructureType};

/// Configuration for SDMX-ML parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseConfig {
    /// Language picked from multilingual `Name`/`Description` elements.
    /// When absent the first entry wins. Default: `en`.
    pub preferred_language: String,

    /// Agency assumed when a `<Ref>` omits `agencyID`. When `None` the
    /// enclosing maintainable's agency is used.
    pub default_agency: Option<String>,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            preferred_language: "en".to_string(),
            default_agency: None,
        }
    }
}

impl ParseConfig {
    /// Parse with the engine's language preference.
    pub fn from_engine(config: &EngineConfig) -> Self {
        Self {
            preferred_language: config.preferred_language.clone(),
            ..Self::default()
        }
    }

    /// Set the preferred language.
    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.preferred_language = lang.into();
        self
    }

    /// Set the agency assumed for references without one.
    pub fn with_default_agency(mut self, agency: impl Into<String>) -> Self {
        self.default_agency = Some(agency.into());
        self
    }
}

/// Which structures a document is expected to hold.
///
/// Sections outside the kind are skipped, so a DSD fetched with
/// `references=children` yields only the DSD under
/// `DocumentKind::Only(StructureType::DataStructure)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocumentKind {
    /// One structure type.
    Only(StructureType),
    /// Every section present.
    #[default]
    All,
}

impl DocumentKind {
    /// Whether structures of `structure_type` are parsed.
    pub fn includes(&self, structure_type: StructureType) -> bool {
        match self {
            DocumentKind::Only(t) => *t == structure_type,
            DocumentKind::All => true,
        }
    }
}

impl From<StructureType> for DocumentKind {
    fn from(structure_type: StructureType) -> Self {
        DocumentKind::Only(structure_type)
    }
}
