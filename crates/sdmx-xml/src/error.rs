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

//! Error types for SDMX-ML parsing

use thiserror::Error;

/// Errors raised while turning SDMX-ML into the structural model.
///
/// Source metadata is never repaired: inconsistent positions or duplicate
/// identifiers fail the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input is not well-formed XML (or not UTF-8).
    #[error("malformed XML: {message}")]
    MalformedXml {
        /// Description from the XML reader.
        message: String,
    },

    /// A required child element is absent.
    #[error("{context}: missing <{element}> element")]
    MissingElement {
        /// The structure or component being parsed.
        context: String,
        /// Local name of the missing element.
        element: &'static str,
    },

    /// A required attribute is absent.
    #[error("{context}: <{element}> has no '{attribute}' attribute")]
    MissingAttribute {
        /// The structure or component being parsed.
        context: String,
        /// Local name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: &'static str,
    },

    /// A dimension `position` is not a non-negative integer.
    #[error("{structure}: dimension {dimension} has invalid position '{value}'")]
    InvalidPosition {
        /// The data structure.
        structure: String,
        /// The offending dimension.
        dimension: String,
        /// The raw attribute value.
        value: String,
    },

    /// Dimension positions have a gap or a duplicate.
    #[error("{structure}: dimension positions {positions:?} are not contiguous")]
    NonContiguousPositions {
        /// The data structure.
        structure: String,
        /// Positions as found in the source, sorted.
        positions: Vec<usize>,
    },

    /// A codelist lists the same code twice.
    #[error("{codelist}: duplicate code '{code}'")]
    DuplicateCode {
        /// The codelist.
        codelist: String,
        /// The repeated code id.
        code: String,
    },

    /// A concept scheme lists the same concept twice.
    #[error("{scheme}: duplicate concept '{concept}'")]
    DuplicateConcept {
        /// The concept scheme.
        scheme: String,
        /// The repeated concept id.
        concept: String,
    },

    /// Sibling categories share an id.
    #[error("{scheme}: duplicate category '{category}'")]
    DuplicateCategory {
        /// The category scheme, or the parent category within it.
        scheme: String,
        /// The repeated category id.
        category: String,
    },

    /// An attribute holds a value outside its allowed set.
    #[error("{context}: invalid {attribute} '{value}'")]
    InvalidAttribute {
        /// The structure or component being parsed.
        context: String,
        /// Attribute name.
        attribute: &'static str,
        /// The raw value.
        value: String,
    },
}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        ParseError::MalformedXml {
            message: err.to_string(),
        }
    }
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::MalformedXml {
            message: err.to_string(),
        }
    }
}

/// Result type for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offender() {
        let err = ParseError::DuplicateCode {
            codelist: "Codelist=SPC:CL_GEO(1.0)".to_string(),
            code: "TO".to_string(),
        };
        assert_eq!(err.to_string(), "Codelist=SPC:CL_GEO(1.0): duplicate code 'TO'");

        let err = ParseError::NonContiguousPositions {
            structure: "DSD_Y".to_string(),
            positions: vec![0, 2],
        };
        assert!(err.to_string().contains("[0, 2]"));
    }

    #[test]
    fn test_from_roxmltree_error() {
        let err: ParseError = roxmltree::Document::parse("<a>").unwrap_err().into();
        assert!(matches!(err, ParseError::MalformedXml { .. }));
    }
}
