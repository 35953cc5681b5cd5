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

//! Async SDMX structural metadata engine
//!
//! Fetches structures through a caller-supplied port, pins `latest`
//! references, and runs the operations of `sdmx-core` over the parsed
//! model. The engine does no network I/O of its own.
//!
//! # Features
//!
//! - [`StructureFetcher`] and [`ReverseIndex`] ports
//! - [`StructureClient`]: fetch, resolve and parse, with bounded concurrent
//!   batches
//! - [`GraphBuilder`]: level-synchronous relationship graphs with partial
//!   failure
//! - [`CachingFetcher`]: single-flight response cache for concrete versions
//! - [`SdmxEngine`]: discovery, code checks, data URLs, availability,
//!   comparison and graphs in one place
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use sdmx_core::{EndpointConfig, EngineConfig, RequestContext, StructureRef};
//! use sdmx_engine::{FetchError, SdmxEngine, StructureFetcher};
//! use std::sync::Arc;
//!
//! struct Empty;
//!
//! #[async_trait]
//! impl StructureFetcher for Empty {
//!     async fn fetch(&self, _: &EndpointConfig, _: &StructureRef) -> Result<Vec<u8>, FetchError> {
//!         Ok(b"<Structure/>".to_vec())
//!     }
//! }
//!
//! let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! rt.block_on(async {
//!     let engine = SdmxEngine::new(Arc::new(Empty), EngineConfig::default());
//!     let ctx = RequestContext::new(EndpointConfig::default());
//!     let page = engine.discover_dataflows::<&str>(&ctx, &[], Default::default()).await.unwrap();
//!     assert_eq!(page.total_before_filtering, 0);
//! });
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod cache;
pub mod client;
mod engine;
mod error;
pub mod fetch;
pub mod graph;

pub use cache::{CacheStats, CachingFetcher};
pub use client::StructureClient;
pub use engine::SdmxEngine;
pub use error::{EngineError, FetchError, Result};
pub use fetch::{structure_url, ReverseIndex, StructureFetcher, StructureIndex};
pub use graph::{Direction, GraphBuilder, GraphEdge, GraphNode, GraphOptions, StructureGraph, UnresolvedNode};
