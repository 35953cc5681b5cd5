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

//! Caching fetcher in front of the in-memory catalog

mod common;

use common::*;
use sdmx_core::{EndpointConfig, EngineConfig, StructureRef, StructureType};
use sdmx_engine::{CachingFetcher, Direction, FetchError, SdmxEngine, StructureFetcher};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

#[tokio::test(start_paused = true)]
async fn test_concurrent_requests_share_one_fetch() {
    let cache = Arc::new(CachingFetcher::new(
        MockFetcher::catalog().with_delay(Duration::from_millis(50)),
    ));
    let mut set = JoinSet::new();
    for _ in 0..10 {
        let cache = cache.clone();
        set.spawn(async move {
            cache
                .fetch(&EndpointConfig::default(), &codelist("CL_GEO", "1.0"))
                .await
        });
    }

    let mut bodies = Vec::new();
    while let Some(joined) = set.join_next().await {
        bodies.push(joined.unwrap().unwrap());
    }
    assert_eq!(bodies.len(), 10);
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));

    assert_eq!(cache.inner().calls(&codelist("CL_GEO", "1.0")), 1);
    let stats = cache.stats();
    assert_eq!((stats.misses, stats.hits), (1, 9));
    assert!((stats.hit_rate() - 0.9).abs() < 1e-9);
}

#[tokio::test]
async fn test_repeated_graph_served_from_cache() {
    let cache = Arc::new(CachingFetcher::new(MockFetcher::catalog()));
    let engine = SdmxEngine::new(cache.clone(), EngineConfig::default());

    let first = engine.graph(&ctx(), &dataflow_x(), Direction::Children).await.unwrap();
    let fetched = cache.inner().total_calls();
    let second = engine.graph(&ctx(), &dataflow_x(), Direction::Children).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(cache.inner().total_calls(), fetched);
    assert_eq!(cache.stats().size, 7);
}

#[tokio::test]
async fn test_latest_requests_are_not_cached() {
    let cache = Arc::new(CachingFetcher::new(MockFetcher::catalog()));
    let engine = SdmxEngine::new(cache.clone(), EngineConfig::default());
    let latest = StructureRef::latest(StructureType::Codelist, "SPC", "CL_GEO");

    for _ in 0..2 {
        engine.client().codelist(&ctx(), &latest).await.unwrap();
    }
    assert_eq!(cache.inner().calls(&latest), 2);
    assert_eq!(cache.stats().bypassed, 2);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let geo = codelist("CL_GEO", "1.0");
    let cache = Arc::new(CachingFetcher::new(
        MockFetcher::catalog().failing(geo.clone(), FetchError::Transport("reset".to_string())),
    ));
    let engine = SdmxEngine::new(cache.clone(), EngineConfig::default());

    let graph = engine.graph(&ctx(), &dataflow_x(), Direction::Children).await.unwrap();
    assert_eq!(graph.unresolved.len(), 1);

    cache.inner().recover(&geo);
    let graph = engine.graph(&ctx(), &dataflow_x(), Direction::Children).await.unwrap();
    assert!(graph.is_complete());
    assert_eq!(cache.inner().calls(&geo), 2);
}

#[tokio::test]
async fn test_bounded_cache_under_engine() {
    let config = EngineConfig::builder().cache_capacity(3).build();
    let cache = Arc::new(CachingFetcher::from_config(MockFetcher::catalog(), &config));
    let engine = SdmxEngine::new(cache.clone(), config);

    // DF_X, DSD_Y, CS_COMMON and four codelists: more than fits
    engine.graph(&ctx(), &dataflow_x(), Direction::Children).await.unwrap();
    let stats = cache.stats();
    assert_eq!(stats.size, 3);
    assert_eq!(stats.max_size, 3);
    assert!(stats.evictions >= 4);

    // DF_X was evicted, so it is fetched again
    let before = cache.inner().calls(&dataflow_x());
    engine.structure_summary(&ctx(), &dataflow_x()).await.unwrap();
    assert_eq!(cache.inner().calls(&dataflow_x()), before + 1);
}
