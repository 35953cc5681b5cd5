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

//! Error types for the engine

use sdmx_core::reference::{StructureRef, StructureType};
use sdmx_core::{ValidationError, VersionResolutionError};
use sdmx_xml::ParseError;
use thiserror::Error;

/// Failures reported by a fetch port. The engine never creates these itself
/// and never retries them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The provider has no such structure.
    #[error("not found")]
    NotFound,
    /// The provider did not answer in time.
    #[error("timed out")]
    Timeout,
    /// Any other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The fetch port failed for `reference`.
    #[error("fetching {reference}: {source}")]
    Fetch {
        /// What was requested.
        reference: StructureRef,
        /// Port failure.
        #[source]
        source: FetchError,
    },

    /// The document returned for `reference` is invalid.
    #[error("parsing {reference}: {source}")]
    Parse {
        /// What was requested.
        reference: StructureRef,
        /// Parser failure.
        #[source]
        source: ParseError,
    },

    /// A `latest` reference could not be pinned.
    #[error(transparent)]
    Version(#[from] VersionResolutionError),

    /// Caller input does not fit the structure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A reference of one type was passed where another is needed.
    #[error("{reference} is not a {expected}")]
    UnexpectedType {
        /// The offending reference.
        reference: StructureRef,
        /// Type the operation needs.
        expected: StructureType,
    },

    /// Parent traversal was requested without a reverse index.
    #[error("parent traversal requires a reverse index")]
    NoReverseIndex,

    /// A fetch task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl EngineError {
    /// The structure the error is about, when there is one.
    pub fn reference(&self) -> Option<&StructureRef> {
        match self {
            EngineError::Fetch { reference, .. }
            | EngineError::Parse { reference, .. }
            | EngineError::UnexpectedType { reference, .. } => Some(reference),
            EngineError::Version(VersionResolutionError::Ambiguous { reference, .. })
            | EngineError::Version(VersionResolutionError::NoMatch { reference }) => Some(reference),
            _ => None,
        }
    }

    /// True when the provider reported the structure missing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::Fetch {
                source: FetchError::NotFound,
                ..
            } | EngineError::Version(VersionResolutionError::NoMatch { .. })
        )
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_reference() {
        let reference = StructureRef::new(StructureType::Codelist, "SPC", "CL_GEO", "1.0");
        let err = EngineError::Fetch {
            reference: reference.clone(),
            source: FetchError::Timeout,
        };
        assert_eq!(err.to_string(), "fetching Codelist=SPC:CL_GEO(1.0): timed out");
        assert_eq!(err.reference(), Some(&reference));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_no_match_is_not_found() {
        let reference = StructureRef::latest(StructureType::Codelist, "SPC", "CL_NONE");
        let err = EngineError::from(VersionResolutionError::NoMatch { reference });
        assert!(err.is_not_found());
    }
}
