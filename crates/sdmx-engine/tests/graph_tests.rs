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

//! Structure graph traversal over the in-memory catalog
//!
//! Covers both directions, depth limits, partial failure, deterministic
//! ordering and the concurrency bound.

mod common;

use common::*;
use sdmx_core::model::Relation;
use sdmx_core::{EngineConfig, StructureRef, StructureType};
use sdmx_engine::{
    Direction, EngineError, FetchError, GraphBuilder, GraphOptions, StructureClient, StructureGraph,
    StructureIndex,
};
use sdmx_xml::{parse_structures, DocumentKind, ParseConfig};
use sdmx_test::fixtures::builders::MessageBuilder;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn builder(mock: MockFetcher, config: &EngineConfig) -> (GraphBuilder, Arc<MockFetcher>) {
    let mock = Arc::new(mock);
    let client = StructureClient::new(mock.clone(), config);
    (GraphBuilder::new(client), mock)
}

fn options(direction: Direction) -> GraphOptions {
    GraphOptions::from_config(direction, &EngineConfig::default())
}

fn ids(graph: &StructureGraph) -> Vec<&str> {
    graph.nodes.iter().map(|n| n.reference.id.as_str()).collect()
}

fn catalog_index() -> StructureIndex {
    let mut index = StructureIndex::new();
    for xml in [
        sdmx_test::dataflow_x(),
        sdmx_test::data_structure_y(),
        sdmx_test::constraints_x(),
    ] {
        let set = parse_structures(xml, DocumentKind::All, &ParseConfig::default()).unwrap();
        for structure in set.iter() {
            index.add(&structure);
        }
    }
    index
}

// =============================================================================
// Children
// =============================================================================

#[tokio::test]
async fn test_children_from_dataflow() {
    let (graphs, mock) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let graph = graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap();

    assert_eq!(
        ids(&graph),
        vec!["DF_X", "DSD_Y", "CS_COMMON", "CL_FREQ", "CL_GEO", "CL_INDICATOR", "CL_UNIT"]
    );
    let depths: Vec<usize> = graph.nodes.iter().map(|n| n.depth).collect();
    assert_eq!(depths, vec![0, 1, 2, 2, 2, 2, 2]);
    assert!(graph.nodes[0].is_root);
    assert!(graph.nodes.iter().skip(1).all(|n| !n.is_root));
    assert_eq!(graph.nodes[0].name, "Population by country");
    assert!(graph.is_complete());

    assert_eq!(graph.edges.len(), 6);
    assert_eq!(graph.edges[0].from, resolved(dataflow_x()));
    assert_eq!(graph.edges[0].to, resolved(dsd_y()));
    assert_eq!(graph.edges[0].relation, Relation::BasedOn);
    assert_eq!(graph.edges[1].relation, Relation::UsesConcepts);
    assert!(graph.edges.iter().skip(2).all(|e| e.relation == Relation::UsesCodelist));

    // The concept scheme is referenced by every component but fetched once
    assert_eq!(mock.calls(&concept_scheme()), 1);
    assert_eq!(mock.total_calls(), 7);
}

#[tokio::test]
async fn test_edges_point_only_at_nodes() {
    let (graphs, _) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let graph = graphs
        .build(&ctx(), &dsd_y(), &options(Direction::Children))
        .await
        .unwrap();

    for edge in &graph.edges {
        assert!(graph.contains(&edge.from), "dangling source {}", edge.from);
        assert!(graph.contains(&edge.to), "dangling target {}", edge.to);
    }
}

#[tokio::test]
async fn test_max_depth_stops_expansion() {
    let (graphs, mock) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let opts = GraphOptions {
        max_depth: Some(1),
        ..options(Direction::Children)
    };
    let graph = graphs.build(&ctx(), &dataflow_x(), &opts).await.unwrap();

    assert_eq!(ids(&graph), vec!["DF_X", "DSD_Y"]);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(mock.calls(&codelist("CL_GEO", "1.0")), 0);

    let opts = GraphOptions {
        max_depth: Some(0),
        ..options(Direction::Children)
    };
    let graph = graphs.build(&ctx(), &dataflow_x(), &opts).await.unwrap();
    assert_eq!(ids(&graph), vec!["DF_X"]);
    assert!(graph.edges.is_empty());
}

#[tokio::test]
async fn test_latest_root_is_resolved() {
    let (graphs, _) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let latest = StructureRef::latest(StructureType::Codelist, "SPC", "CL_GEO");
    let graph = graphs
        .build(&ctx(), &latest, &options(Direction::Children))
        .await
        .unwrap();

    assert_eq!(graph.root.version(), "2.0");
    assert_eq!(graph.nodes.len(), 1);
}

#[tokio::test]
async fn test_diamond_fetches_shared_node_once() {
    // A constraint attached to both the dataflow and its DSD
    let constraint = StructureRef::new(StructureType::ContentConstraint, "SPC", "CR_BOTH", "1.0");
    let xml = r#"<Structure><Structures><Constraints>
        <ContentConstraint id="CR_BOTH" agencyID="SPC" version="1.0" type="Allowed">
          <ConstraintAttachment>
            <Dataflow><Ref id="DF_X" agencyID="SPC" version="1.0" class="Dataflow"/></Dataflow>
            <DataStructure><Ref id="DSD_Y" agencyID="SPC" version="1.0" class="DataStructure"/></DataStructure>
          </ConstraintAttachment>
        </ContentConstraint>
    </Constraints></Structures></Structure>"#;
    let mock = MockFetcher::catalog().with_document(constraint.clone(), xml);
    let (graphs, mock) = builder(mock, &EngineConfig::default());

    let opts = GraphOptions {
        max_depth: Some(2),
        ..options(Direction::Children)
    };
    let graph = graphs.build(&ctx(), &constraint, &opts).await.unwrap();

    assert_eq!(&ids(&graph)[..3], &["CR_BOTH", "DF_X", "DSD_Y"]);
    assert_eq!(mock.calls(&dsd_y()), 1);

    // DF_X -> DSD_Y is recorded even though DSD_Y was already a node
    let df = resolved(dataflow_x());
    let based_on: Vec<_> = graph.edges_from(&df).collect();
    assert_eq!(based_on.len(), 1);
    assert_eq!(based_on[0].to, resolved(dsd_y()));
    assert_eq!(graph.node(&resolved(dsd_y())).unwrap().depth, 1);
}

#[tokio::test]
async fn test_categorisation_links_dataflow_and_scheme() {
    let categorisation = StructureRef::new(StructureType::Categorisation, "SPC", "CAT_DF_X", "1.0");
    let mock = MockFetcher::catalog().with_document(categorisation.clone(), sdmx_test::categorisation_listing());
    let (graphs, _) = builder(mock, &EngineConfig::default());

    let opts = GraphOptions {
        max_depth: Some(1),
        ..options(Direction::Children)
    };
    let graph = graphs.build(&ctx(), &categorisation, &opts).await.unwrap();
    assert!(graph.is_complete());
    assert_eq!(graph.nodes.len(), 3);

    let root = resolved(categorisation);
    let relations: HashSet<_> = graph
        .edges_from(&root)
        .map(|e| (e.to.id.as_str(), e.relation))
        .collect();
    assert_eq!(
        relations,
        HashSet::from([("DF_X", Relation::Categorises), ("CAS_TOPICS", Relation::FiledUnder)])
    );
}

// =============================================================================
// Parents
// =============================================================================

#[tokio::test]
async fn test_parents_require_reverse_index() {
    let (graphs, mock) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let err = graphs
        .build(&ctx(), &dsd_y(), &options(Direction::Parents))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NoReverseIndex);
    assert_eq!(mock.total_calls(), 0);
}

#[tokio::test]
async fn test_parents_from_codelist() {
    let (graphs, _) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let graphs = graphs.with_reverse_index(Arc::new(catalog_index()));
    let graph = graphs
        .build(&ctx(), &codelist("CL_GEO", "1.0"), &options(Direction::Parents))
        .await
        .unwrap();

    assert_eq!(
        ids(&graph),
        vec!["CL_GEO", "DSD_Y", "DF_X", "CR_X_ACTUAL", "CR_X_ALLOWED"]
    );

    // Edges keep the referrer -> referee direction
    let first = &graph.edges[0];
    assert_eq!(first.from, resolved(dsd_y()));
    assert_eq!(first.to, resolved(codelist("CL_GEO", "1.0")));
    assert_eq!(first.relation, Relation::UsesCodelist);
    assert_eq!(graph.edges[1].relation, Relation::BasedOn);
    assert!(graph.edges[2..].iter().all(|e| e.relation == Relation::Constrains));
}

#[tokio::test]
async fn test_both_directions_deduplicate_edges() {
    let (graphs, _) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let graphs = graphs.with_reverse_index(Arc::new(catalog_index()));
    let graph = graphs
        .build(&ctx(), &dsd_y(), &options(Direction::Both))
        .await
        .unwrap();

    assert_eq!(graph.nodes.len(), 9);
    assert_eq!(ids(&graph)[6], "DF_X");
    assert_eq!(graph.edges.len(), 8);

    let unique: HashSet<_> = graph.edges.iter().collect();
    assert_eq!(unique.len(), graph.edges.len());
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_failed_child_is_unresolved() {
    let mock = MockFetcher::catalog().failing(codelist("CL_GEO", "1.0"), FetchError::Timeout);
    let (graphs, _) = builder(mock, &EngineConfig::default());
    let graph = graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap();

    assert_eq!(graph.nodes.len(), 6);
    assert!(!ids(&graph).contains(&"CL_GEO"));
    assert_eq!(graph.unresolved.len(), 1);
    assert_eq!(graph.unresolved[0].reference, codelist("CL_GEO", "1.0"));
    assert_eq!(graph.unresolved[0].depth, 2);
    assert!(graph.unresolved[0].reason.contains("timed out"));
    assert!(graph.edges.iter().all(|e| e.to.id != "CL_GEO"));
}

#[tokio::test]
async fn test_missing_child_is_unresolved() {
    let df = StructureRef::new(StructureType::Dataflow, "SPC", "DF_TRADE", "1.0");
    let xml = MessageBuilder::new()
        .dataflow("DF_TRADE", "Trade", "DSD_TRADE", "1.0")
        .build();
    let (graphs, _) = builder(MockFetcher::catalog().with_document(df.clone(), xml), &EngineConfig::default());

    let graph = graphs
        .build(&ctx(), &df, &options(Direction::Children))
        .await
        .unwrap();
    assert_eq!(ids(&graph), vec!["DF_TRADE"]);
    assert_eq!(
        graph.unresolved[0].reference,
        StructureRef::new(StructureType::DataStructure, "SPC", "DSD_TRADE", "1.0")
    );
    assert!(graph.unresolved[0].reason.contains("not found"));
}

#[tokio::test]
async fn test_failed_root_aborts() {
    let mock = MockFetcher::catalog().failing(dataflow_x(), FetchError::NotFound);
    let (graphs, _) = builder(mock, &EngineConfig::default());
    let err = graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.reference(), Some(&dataflow_x()));
}

#[tokio::test]
async fn test_unparseable_child_is_unresolved() {
    let mock = MockFetcher::catalog().with_document(codelist("CL_UNIT", "1.0"), "<Structure><broken>");
    let (graphs, _) = builder(mock, &EngineConfig::default());
    let graph = graphs
        .build(&ctx(), &dsd_y(), &options(Direction::Children))
        .await
        .unwrap();
    assert_eq!(graph.unresolved.len(), 1);
    assert!(graph.unresolved[0].reason.starts_with("parsing"));
}

// =============================================================================
// Determinism and concurrency
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_output_independent_of_concurrency() {
    let serial = EngineConfig::builder().max_concurrency(1).build();
    let wide = EngineConfig::builder().max_concurrency(16).build();

    let (a, _) = builder(MockFetcher::catalog().with_delay(Duration::from_millis(5)), &serial);
    let (b, _) = builder(MockFetcher::catalog().with_delay(Duration::from_millis(5)), &wide);
    let root = dataflow_x();
    let opts = options(Direction::Children);

    let first = a.build(&ctx(), &root, &opts).await.unwrap();
    let second = b.build(&ctx(), &root, &opts).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_is_bounded() {
    let config = EngineConfig::builder().max_concurrency(2).build();
    let (graphs, mock) = builder(MockFetcher::catalog().with_delay(Duration::from_millis(10)), &config);
    graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap();
    assert_eq!(mock.max_in_flight(), 2);

    let config = EngineConfig::builder().max_concurrency(8).build();
    let (graphs, mock) = builder(MockFetcher::catalog().with_delay(Duration::from_millis(10)), &config);
    graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap();
    // Five codelists and schemes share the widest level
    assert_eq!(mock.max_in_flight(), 5);
}

#[tokio::test]
async fn test_graph_serializes() {
    let (graphs, _) = builder(MockFetcher::catalog(), &EngineConfig::default());
    let graph = graphs
        .build(&ctx(), &dataflow_x(), &options(Direction::Children))
        .await
        .unwrap();
    let json = serde_json::to_value(&graph).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 7);
    assert_eq!(json["direction"], "Children");
}
