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

//! Structure references: `(type, agencyID, id, version)` tuples.
//!
//! SDMX structures point at each other by reference. A reference may omit
//! its version, which means "latest"; such references are represented with
//! [`Version::Latest`] and must be resolved before they can be used as a
//! cache or graph key. [`ResolvedRef`] is the type-level proof that this
//! has happened.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

const URN_PREFIX: &str = "urn:sdmx:org.sdmx.infomodel.";

/// The kinds of maintainable structure the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureType {
    /// A dataflow: a publication of data built on a DSD.
    Dataflow,
    /// A data structure definition (DSD).
    DataStructure,
    /// An enumeration of codes.
    Codelist,
    /// A scheme of concepts.
    ConceptScheme,
    /// A content constraint (availability or allowed values).
    ContentConstraint,
    /// A hierarchy of topics used to file dataflows.
    CategoryScheme,
    /// Links one structure (usually a dataflow) to a category.
    Categorisation,
}

impl StructureType {
    /// All structure types, in declaration order.
    pub const ALL: [StructureType; 7] = [
        StructureType::Dataflow,
        StructureType::DataStructure,
        StructureType::Codelist,
        StructureType::ConceptScheme,
        StructureType::ContentConstraint,
        StructureType::CategoryScheme,
        StructureType::Categorisation,
    ];

    /// Resource name used in SDMX REST paths (`/codelist/...`).
    pub fn resource(&self) -> &'static str {
        match self {
            StructureType::Dataflow => "dataflow",
            StructureType::DataStructure => "datastructure",
            StructureType::Codelist => "codelist",
            StructureType::ConceptScheme => "conceptscheme",
            StructureType::ContentConstraint => "contentconstraint",
            StructureType::CategoryScheme => "categoryscheme",
            StructureType::Categorisation => "categorisation",
        }
    }

    /// Information model class name (`class` attribute on `<Ref>`).
    pub fn class_name(&self) -> &'static str {
        match self {
            StructureType::Dataflow => "Dataflow",
            StructureType::DataStructure => "DataStructure",
            StructureType::Codelist => "Codelist",
            StructureType::ConceptScheme => "ConceptScheme",
            StructureType::ContentConstraint => "ContentConstraint",
            StructureType::CategoryScheme => "CategoryScheme",
            StructureType::Categorisation => "Categorisation",
        }
    }

    /// Information model package (`package` attribute on `<Ref>`).
    pub fn package(&self) -> &'static str {
        match self {
            StructureType::Dataflow | StructureType::DataStructure => "datastructure",
            StructureType::Codelist => "codelist",
            StructureType::ConceptScheme => "conceptscheme",
            StructureType::ContentConstraint => "registry",
            StructureType::CategoryScheme | StructureType::Categorisation => "categoryscheme",
        }
    }

    /// Map an information model class to the maintainable that owns it.
    ///
    /// Item classes map to their scheme: `Code` to [`StructureType::Codelist`],
    /// `Concept` to [`StructureType::ConceptScheme`], `Category` to
    /// [`StructureType::CategoryScheme`].
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "Dataflow" => Some(StructureType::Dataflow),
            "DataStructure" => Some(StructureType::DataStructure),
            "Codelist" | "Code" => Some(StructureType::Codelist),
            "ConceptScheme" | "Concept" => Some(StructureType::ConceptScheme),
            "ContentConstraint" => Some(StructureType::ContentConstraint),
            "CategoryScheme" | "Category" => Some(StructureType::CategoryScheme),
            "Categorisation" => Some(StructureType::Categorisation),
            _ => None,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

impl FromStr for StructureType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dataflow" => Ok(StructureType::Dataflow),
            "datastructure" | "dsd" => Ok(StructureType::DataStructure),
            "codelist" => Ok(StructureType::Codelist),
            "conceptscheme" => Ok(StructureType::ConceptScheme),
            "contentconstraint" | "constraint" => Ok(StructureType::ContentConstraint),
            "categoryscheme" => Ok(StructureType::CategoryScheme),
            "categorisation" | "categorization" => Ok(StructureType::Categorisation),
            _ => Err(ValidationError::UnknownStructureType(s.to_string())),
        }
    }
}

/// A structure version: concrete (`"2.0"`) or the `latest` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Version {
    /// Whatever the provider considers the newest version.
    Latest,
    /// A concrete version string.
    Concrete(String),
}

impl Version {
    /// Parse a version string. `latest` (any case), `~`, `*` and the empty
    /// string all mean [`Version::Latest`].
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed == "~"
            || trimmed == "*"
            || trimmed.eq_ignore_ascii_case("latest")
        {
            Version::Latest
        } else {
            Version::Concrete(trimmed.to_string())
        }
    }

    /// Returns true for [`Version::Latest`].
    pub fn is_latest(&self) -> bool {
        matches!(self, Version::Latest)
    }

    /// The concrete version string, if any.
    pub fn concrete(&self) -> Option<&str> {
        match self {
            Version::Latest => None,
            Version::Concrete(v) => Some(v),
        }
    }

    /// The version as it appears in REST paths.
    pub fn as_str(&self) -> &str {
        match self {
            Version::Latest => "latest",
            Version::Concrete(v) => v,
        }
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Version::parse(s)
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Version::parse(&s)
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.as_str().to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a maintainable structure.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StructureRef {
    /// What kind of structure is referenced.
    pub structure_type: StructureType,
    /// Maintenance agency.
    pub agency_id: String,
    /// Structure id.
    pub id: String,
    /// Concrete version or `latest`.
    pub version: Version,
}

impl StructureRef {
    /// Create a reference.
    pub fn new(
        structure_type: StructureType,
        agency_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<Version>,
    ) -> Self {
        Self {
            structure_type,
            agency_id: agency_id.into(),
            id: id.into(),
            version: version.into(),
        }
    }

    /// Create a reference to the latest version of a structure.
    pub fn latest(
        structure_type: StructureType,
        agency_id: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self::new(structure_type, agency_id, id, Version::Latest)
    }

    /// True once the version is concrete.
    pub fn is_resolved(&self) -> bool {
        !self.version.is_latest()
    }

    /// Same type, agency and id; version ignored.
    pub fn same_artefact(&self, other: &StructureRef) -> bool {
        self.structure_type == other.structure_type
            && self.agency_id == other.agency_id
            && self.id == other.id
    }

    /// Does `candidate` satisfy this reference? A `latest` reference matches
    /// any version of the same artefact.
    pub fn matches(&self, candidate: &StructureRef) -> bool {
        self.same_artefact(candidate)
            && match &self.version {
                Version::Latest => true,
                v => *v == candidate.version,
            }
    }

    /// Replace the version.
    pub fn with_version(mut self, version: impl Into<Version>) -> Self {
        self.version = version.into();
        self
    }

    /// Convert into a [`ResolvedRef`] if the version is concrete.
    pub fn into_resolved(self) -> Option<ResolvedRef> {
        ResolvedRef::try_from(self).ok()
    }

    /// Render as an SDMX URN. A `latest` reference omits the version part.
    pub fn to_urn(&self) -> String {
        let mut urn = format!(
            "{}{}.{}={}:{}",
            URN_PREFIX,
            self.structure_type.package(),
            self.structure_type.class_name(),
            self.agency_id,
            self.id
        );
        if let Version::Concrete(v) = &self.version {
            urn.push('(');
            urn.push_str(v);
            urn.push(')');
        }
        urn
    }

    /// Parse an SDMX URN into the maintainable reference it points at.
    ///
    /// Item URNs (`...Concept=SPC:CS_COMMON(1.0).FREQ`) are accepted; use
    /// [`StructureRef::from_item_urn`] to also get the item id.
    pub fn from_urn(urn: &str) -> Result<Self, ValidationError> {
        Self::from_item_urn(urn).map(|(reference, _)| reference)
    }

    /// Parse an SDMX URN, returning the maintainable reference and the item
    /// id when the URN addresses an item inside it.
    pub fn from_item_urn(urn: &str) -> Result<(Self, Option<String>), ValidationError> {
        let invalid = || ValidationError::InvalidUrn(urn.to_string());
        let rest = urn.trim().strip_prefix(URN_PREFIX).ok_or_else(invalid)?;
        let (qualified_class, target) = rest.split_once('=').ok_or_else(invalid)?;
        let class = qualified_class.rsplit('.').next().ok_or_else(invalid)?;
        let structure_type = StructureType::from_class(class).ok_or_else(invalid)?;
        let (agency_id, remainder) = target.split_once(':').ok_or_else(invalid)?;

        let (id, version, item) = match remainder.find('(') {
            Some(open) => {
                let close = remainder[open..].find(')').ok_or_else(invalid)? + open;
                let item = remainder[close + 1..]
                    .strip_prefix('.')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                (&remainder[..open], Version::parse(&remainder[open + 1..close]), item)
            }
            None => (remainder, Version::Latest, None),
        };

        if agency_id.is_empty() || id.is_empty() {
            return Err(invalid());
        }
        Ok((Self::new(structure_type, agency_id, id, version), item))
    }
}

impl fmt::Display for StructureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}={}:{}({})",
            self.structure_type, self.agency_id, self.id, self.version
        )
    }
}

/// A [`StructureRef`] whose version is known to be concrete.
///
/// Only resolved references may key caches and graph nodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ResolvedRef(StructureRef);

impl ResolvedRef {
    /// Build a resolved reference directly from its parts.
    pub fn new(
        structure_type: StructureType,
        agency_id: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Option<Self> {
        StructureRef::new(structure_type, agency_id, id, Version::from(version.into()))
            .into_resolved()
    }

    /// Pin `reference` to a concrete version.
    pub(crate) fn with_concrete(reference: StructureRef, version: &str) -> Self {
        ResolvedRef(StructureRef {
            version: Version::Concrete(version.to_string()),
            ..reference
        })
    }

    /// The concrete version string.
    pub fn version(&self) -> &str {
        self.0.version.as_str()
    }

    /// Borrow the underlying reference.
    pub fn as_structure_ref(&self) -> &StructureRef {
        &self.0
    }

    /// Unwrap into the underlying reference.
    pub fn into_inner(self) -> StructureRef {
        self.0
    }
}

impl TryFrom<StructureRef> for ResolvedRef {
    type Error = StructureRef;

    fn try_from(reference: StructureRef) -> Result<Self, Self::Error> {
        if reference.is_resolved() {
            Ok(ResolvedRef(reference))
        } else {
            Err(reference)
        }
    }
}

impl Deref for ResolvedRef {
    type Target = StructureRef;

    fn deref(&self) -> &StructureRef {
        &self.0
    }
}

impl From<ResolvedRef> for StructureRef {
    fn from(r: ResolvedRef) -> Self {
        r.0
    }
}

impl fmt::Display for ResolvedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
