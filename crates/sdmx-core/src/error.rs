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

//! Error types for structural metadata operations.

use crate::reference::StructureRef;
use thiserror::Error;

/// A `latest` or unknown version could not be turned into a concrete one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionResolutionError {
    /// Two distinct version strings compare equal (e.g. `1.0` and `1.0.0`).
    #[error("ambiguous version for {reference}: {candidates:?} compare equal")]
    Ambiguous {
        /// The reference being resolved.
        reference: StructureRef,
        /// The tied version strings.
        candidates: Vec<String>,
    },

    /// The provider reported no structure matching the reference.
    #[error("no structure matches {reference}")]
    NoMatch {
        /// The reference that matched nothing.
        reference: StructureRef,
    },
}

/// Caller input is inconsistent with a data structure definition.
///
/// Distinct from parse errors: these describe what the caller asked for,
/// not malformed metadata.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A dimension id that the DSD does not define.
    #[error("unknown dimension '{dimension}' (valid dimensions: {})", valid.join(", "))]
    UnknownDimension {
        /// The offending dimension id.
        dimension: String,
        /// Dimension ids the DSD does define, in key order.
        valid: Vec<String>,
    },

    /// A code missing from the dimension's codelist, raised in strict mode.
    #[error("code '{code}' is not in codelist {codelist} of dimension '{dimension}'")]
    UnknownCode {
        /// Dimension the code was supplied for.
        dimension: String,
        /// The unknown code.
        code: String,
        /// Codelist that was consulted.
        codelist: StructureRef,
    },

    /// A key component with characters outside `[A-Za-z0-9_@$-]`.
    #[error("invalid key component '{value}' for dimension '{dimension}'")]
    InvalidKeyComponent {
        /// Dimension the value was supplied for.
        dimension: String,
        /// The offending value.
        value: String,
    },

    /// A positional key with the wrong number of segments.
    #[error("key '{key}' has {found} segment(s) but the structure has {expected} key dimension(s)")]
    KeyLength {
        /// The key as supplied.
        key: String,
        /// Number of key dimensions on the DSD.
        expected: usize,
        /// Number of segments found.
        found: usize,
    },

    /// A period string that is not a recognised SDMX/ISO period.
    #[error("invalid period '{0}'")]
    InvalidPeriod(String),

    /// A period range whose start lies after its end.
    #[error("period range '{start}..{end}' starts after it ends")]
    InvertedPeriod {
        /// Lower bound as supplied.
        start: String,
        /// Upper bound as supplied.
        end: String,
    },

    /// A data provider id that does not follow SDMX syntax.
    #[error("invalid provider '{0}'")]
    InvalidProvider(String),

    /// A page size of zero.
    #[error("limit must be greater than zero")]
    InvalidLimit,

    /// A structure type name that is not recognised.
    #[error("unknown structure type '{0}'")]
    UnknownStructureType(String),

    /// A data format name outside the supported set.
    #[error("unknown data format '{0}' (expected csv, json or xml)")]
    UnknownFormat(String),

    /// A malformed SDMX URN.
    #[error("invalid SDMX URN '{0}'")]
    InvalidUrn(String),

    /// An endpoint key with no built-in preset.
    #[error("unknown endpoint '{key}' (available: {})", available.join(", "))]
    UnknownEndpoint {
        /// The requested key.
        key: String,
        /// Known preset keys.
        available: Vec<String>,
    },
}

/// Result type alias for validation operations.
pub type Result<T> = std::result::Result<T, ValidationError>;
