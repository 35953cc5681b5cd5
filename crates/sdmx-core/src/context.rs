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

//! Per-request context and confirmation results.

use crate::config::EndpointConfig;
use serde::Serialize;

/// Everything a single engine call needs to know about its caller.
///
/// Passed explicitly to each call, so concurrent callers on different
/// endpoints never observe each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    /// Endpoint this request targets.
    pub endpoint: EndpointConfig,
    /// True if the caller can ask its user to confirm a choice.
    pub can_confirm: bool,
}

impl RequestContext {
    /// Context for `endpoint` without confirmation support.
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            endpoint,
            can_confirm: false,
        }
    }

    /// Enable or disable confirmation support.
    pub fn with_confirmation(mut self, can_confirm: bool) -> Self {
        self.can_confirm = can_confirm;
        self
    }
}

/// Outcome of an operation that may need the user's approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Confirmation<T> {
    /// Completed without needing approval.
    Applied(T),
    /// The caller should ask before proceeding.
    NeedsConfirmation {
        /// What needs approving.
        message: String,
        /// Choices to offer.
        options: Vec<String>,
        /// The result that applies if the user accepts.
        pending: T,
    },
    /// The user declined.
    Declined,
}

impl<T> Confirmation<T> {
    /// Resolve a pending confirmation with the user's answer. Already
    /// decided outcomes are returned unchanged.
    pub fn answer(self, accepted: bool) -> Confirmation<T> {
        match self {
            Confirmation::NeedsConfirmation { pending, .. } if accepted => {
                Confirmation::Applied(pending)
            }
            Confirmation::NeedsConfirmation { .. } => Confirmation::Declined,
            other => other,
        }
    }

    /// The applied value, if any.
    pub fn applied(self) -> Option<T> {
        match self {
            Confirmation::Applied(value) => Some(value),
            _ => None,
        }
    }

    /// True if approval is still required.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Confirmation::NeedsConfirmation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_pending() {
        let pending = Confirmation::NeedsConfirmation {
            message: "proceed?".to_string(),
            options: vec!["yes".to_string(), "no".to_string()],
            pending: 7,
        };
        assert!(pending.needs_confirmation());
        assert_eq!(pending.clone().answer(true), Confirmation::Applied(7));
        assert_eq!(pending.answer(false), Confirmation::Declined);
    }

    #[test]
    fn test_answer_leaves_decided_outcomes() {
        assert_eq!(Confirmation::Applied(1).answer(false), Confirmation::Applied(1));
        assert_eq!(Confirmation::<u8>::Declined.answer(true), Confirmation::Declined);
    }

    #[test]
    fn test_default_context_targets_spc() {
        let ctx = RequestContext::default();
        assert_eq!(ctx.endpoint.key, "SPC");
        assert!(!ctx.can_confirm);
    }
}
