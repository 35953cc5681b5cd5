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

//! Structure relationship graphs
//!
//! Breadth-first traversal from a root structure. Each level is fetched
//! concurrently (bounded by `max_concurrency`) and then merged in discovery
//! order, so the output is identical however the fetches interleave.
//!
//! Edges always point from the referencing structure to the referenced one
//! and are only added once both ends are fetched and resolved. A structure
//! that fails to fetch is recorded in [`StructureGraph::unresolved`] and the
//! rest of the traversal carries on. Only a failing root aborts.

use crate::client::StructureClient;
use crate::error::{EngineError, Result};
use crate::fetch::ReverseIndex;
use sdmx_core::context::RequestContext;
use sdmx_core::model::{Relation, Structure};
use sdmx_core::reference::{ResolvedRef, StructureRef};
use sdmx_core::EngineConfig;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which references to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    /// Structures the current one references.
    Children,
    /// Structures that reference the current one (needs a reverse index).
    Parents,
    /// Both of the above.
    Both,
}

impl Direction {
    fn children(self) -> bool {
        matches!(self, Direction::Children | Direction::Both)
    }

    fn parents(self) -> bool {
        matches!(self, Direction::Parents | Direction::Both)
    }
}

/// Traversal settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// References to follow.
    pub direction: Direction,
    /// Levels below the root to expand; `None` is unbounded.
    pub max_depth: Option<usize>,
    /// Include versions in node labels.
    pub show_versions: bool,
}

impl GraphOptions {
    /// Options for `direction` with the engine's depth and label defaults.
    pub fn from_config(direction: Direction, config: &EngineConfig) -> Self {
        Self {
            direction,
            max_depth: config.max_depth,
            show_versions: config.show_versions,
        }
    }
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self::from_config(Direction::Children, &EngineConfig::default())
    }
}

/// A fetched and resolved structure in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    /// The structure.
    pub reference: ResolvedRef,
    /// Display name.
    pub name: String,
    /// Distance from the root in edges.
    pub depth: usize,
    /// True for the traversal root.
    pub is_root: bool,
}

/// A reference between two nodes, referrer to referee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GraphEdge {
    /// The referencing structure.
    pub from: ResolvedRef,
    /// The referenced structure.
    pub to: ResolvedRef,
    /// How `from` uses `to`.
    pub relation: Relation,
}

/// A reference that could not be fetched or parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedNode {
    /// The reference as found.
    pub reference: StructureRef,
    /// Depth it would have had.
    pub depth: usize,
    /// Why it is missing.
    pub reason: String,
}

/// Result of a traversal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureGraph {
    /// The root node's reference.
    pub root: ResolvedRef,
    /// Direction traversed.
    pub direction: Direction,
    /// Whether labels carry versions.
    pub show_versions: bool,
    /// Nodes in breadth-first discovery order, root first.
    pub nodes: Vec<GraphNode>,
    /// Edges in discovery order.
    pub edges: Vec<GraphEdge>,
    /// References that failed, in discovery order.
    pub unresolved: Vec<UnresolvedNode>,
}

impl StructureGraph {
    /// The node for `reference`, if present.
    pub fn node(&self, reference: &ResolvedRef) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.reference == reference)
    }

    /// True if `reference` is a node.
    pub fn contains(&self, reference: &ResolvedRef) -> bool {
        self.node(reference).is_some()
    }

    /// Display label for `node`: `Codelist SPC:CL_GEO(1.0)` or, without
    /// versions, `Codelist SPC:CL_GEO`.
    pub fn label(&self, node: &GraphNode) -> String {
        let r = &node.reference;
        if self.show_versions {
            format!("{} {}:{}({})", r.structure_type, r.agency_id, r.id, r.version())
        } else {
            format!("{} {}:{}", r.structure_type, r.agency_id, r.id)
        }
    }

    /// Edges leaving `reference`.
    pub fn edges_from<'a>(&'a self, reference: &'a ResolvedRef) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| &e.from == reference)
    }

    /// Edges arriving at `reference`.
    pub fn edges_to<'a>(&'a self, reference: &'a ResolvedRef) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| &e.to == reference)
    }

    /// True when every discovered reference was resolved.
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Plain-text listing, one node per line followed by its outgoing edges.
impl fmt::Display for StructureGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            writeln!(f, "{}{}", "  ".repeat(node.depth), self.label(node))?;
            for edge in self.edges_from(&node.reference) {
                let target = self.node(&edge.to).map(|n| self.label(n)).unwrap_or_default();
                writeln!(f, "{}  -> {} {}", "  ".repeat(node.depth), edge.relation.label(), target)?;
            }
        }
        for missing in &self.unresolved {
            writeln!(f, "unresolved {}: {}", missing.reference, missing.reason)?;
        }
        Ok(())
    }
}

/// Which side of the edge the frontier node is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    /// The frontier node references the fetched one.
    Referrer,
    /// The fetched one references the frontier node.
    Referee,
}

/// One reference to fetch in the next level and every edge waiting on it.
struct Pending {
    reference: StructureRef,
    links: Vec<(ResolvedRef, Side, Option<Relation>)>,
}

/// Builds [`StructureGraph`]s over a [`StructureClient`].
#[derive(Clone)]
pub struct GraphBuilder {
    client: StructureClient,
    reverse: Option<Arc<dyn ReverseIndex>>,
}

impl GraphBuilder {
    /// A builder that can only follow children.
    pub fn new(client: StructureClient) -> Self {
        Self { client, reverse: None }
    }

    /// Allow parent traversal through `index`.
    pub fn with_reverse_index(mut self, index: Arc<dyn ReverseIndex>) -> Self {
        self.reverse = Some(index);
        self
    }

    /// Traverse from `root`.
    pub async fn build(
        &self,
        ctx: &RequestContext,
        root: &StructureRef,
        options: &GraphOptions,
    ) -> Result<StructureGraph> {
        if options.direction.parents() && self.reverse.is_none() {
            return Err(EngineError::NoReverseIndex);
        }

        let root_structure = self.client.fetch_structure(ctx, root).await?;
        let root_ref = root_structure.reference().clone();
        info!(root = %root_ref, direction = ?options.direction, "building structure graph");

        let mut graph = StructureGraph {
            root: root_ref.clone(),
            direction: options.direction,
            show_versions: options.show_versions,
            nodes: vec![GraphNode {
                reference: root_ref.clone(),
                name: root_structure.name().to_string(),
                depth: 0,
                is_root: true,
            }],
            edges: Vec::new(),
            unresolved: Vec::new(),
        };
        let mut known: HashMap<ResolvedRef, Structure> = HashMap::from([(root_ref, root_structure.clone())]);
        let mut seen_edges: HashSet<GraphEdge> = HashSet::new();
        let mut frontier = vec![root_structure];
        let mut depth = 0;

        while !frontier.is_empty() && options.max_depth.map_or(true, |max| depth < max) {
            let pending = self.expand(ctx, &frontier, options.direction).await;
            depth += 1;

            // Concrete references to structures already in the graph only
            // contribute edges.
            let (revisits, fetches): (Vec<Pending>, Vec<Pending>) = pending.into_iter().partition(|p| {
                p.reference
                    .clone()
                    .into_resolved()
                    .map_or(false, |r| known.contains_key(&r))
            });
            debug!(depth, frontier = frontier.len(), fetches = fetches.len(), revisits = revisits.len(), "expanding level");

            for item in revisits {
                if let Some(structure) = item.reference.clone().into_resolved().and_then(|r| known.get(&r)) {
                    link_edges(structure, item.links, &mut seen_edges, &mut graph.edges);
                }
            }

            let references = fetches.iter().map(|p| p.reference.clone()).collect();
            let results = self.client.fetch_all(ctx, references).await;

            let mut next = Vec::new();
            for (item, result) in fetches.into_iter().zip(results) {
                let structure = match result {
                    Ok(structure) => structure,
                    Err(e) => {
                        warn!(reference = %item.reference, error = %e, "unresolved reference");
                        graph.unresolved.push(UnresolvedNode {
                            reference: item.reference,
                            depth,
                            reason: e.to_string(),
                        });
                        continue;
                    }
                };
                link_edges(&structure, item.links, &mut seen_edges, &mut graph.edges);

                let resolved = structure.reference().clone();
                if !known.contains_key(&resolved) {
                    graph.nodes.push(GraphNode {
                        reference: resolved.clone(),
                        name: structure.name().to_string(),
                        depth,
                        is_root: false,
                    });
                    known.insert(resolved, structure.clone());
                    next.push(structure);
                }
            }
            frontier = next;
        }

        info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            unresolved = graph.unresolved.len(),
            "structure graph built"
        );
        Ok(graph)
    }

    /// Collect the references one level out from `frontier`, merged per
    /// reference and in discovery order.
    async fn expand(
        &self,
        ctx: &RequestContext,
        frontier: &[Structure],
        direction: Direction,
    ) -> Vec<Pending> {
        let mut pending: Vec<Pending> = Vec::new();
        let mut slot: HashMap<StructureRef, usize> = HashMap::new();
        let mut link = |reference: StructureRef, other: &ResolvedRef, side: Side, relation: Option<Relation>| {
            let index = *slot.entry(reference.clone()).or_insert_with(|| {
                pending.push(Pending {
                    reference,
                    links: Vec::new(),
                });
                pending.len() - 1
            });
            pending[index].links.push((other.clone(), side, relation));
        };

        for structure in frontier {
            let current = structure.reference();

            if direction.children() {
                for (target, relation) in structure.children() {
                    link(target, current, Side::Referrer, Some(relation));
                }
            }

            if direction.parents() {
                if let Some(index) = &self.reverse {
                    match index.references_to(&ctx.endpoint, current).await {
                        Ok(referrers) => {
                            for referrer in referrers {
                                link(referrer, current, Side::Referee, None);
                            }
                        }
                        Err(e) => warn!(reference = %current, error = %e, "reverse index lookup failed"),
                    }
                }
            }
        }

        pending
    }
}

/// Record the edges between `structure` and the frontier nodes waiting on it.
fn link_edges(
    structure: &Structure,
    links: Vec<(ResolvedRef, Side, Option<Relation>)>,
    seen: &mut HashSet<GraphEdge>,
    edges: &mut Vec<GraphEdge>,
) {
    let resolved = structure.reference();
    for (other, side, relation) in links {
        let edge = match side {
            Side::Referrer => GraphEdge {
                relation: relation.unwrap_or_else(|| Relation::for_target(resolved)),
                from: other,
                to: resolved.clone(),
            },
            Side::Referee => GraphEdge {
                relation: structure
                    .relation_to(&other)
                    .unwrap_or_else(|| Relation::for_target(&other)),
                from: resolved.clone(),
                to: other,
            },
        };
        if seen.insert(edge.clone()) {
            edges.push(edge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdmx_core::reference::StructureType;

    fn resolved(t: StructureType, id: &str, version: &str) -> ResolvedRef {
        ResolvedRef::new(t, "SPC", id, version).unwrap()
    }

    fn sample(show_versions: bool) -> StructureGraph {
        let df = resolved(StructureType::Dataflow, "DF_X", "1.0");
        let dsd = resolved(StructureType::DataStructure, "DSD_Y", "1.0");
        StructureGraph {
            root: df.clone(),
            direction: Direction::Children,
            show_versions,
            nodes: vec![
                GraphNode {
                    reference: df.clone(),
                    name: "Population".to_string(),
                    depth: 0,
                    is_root: true,
                },
                GraphNode {
                    reference: dsd.clone(),
                    name: "DSD".to_string(),
                    depth: 1,
                    is_root: false,
                },
            ],
            edges: vec![GraphEdge {
                from: df,
                to: dsd,
                relation: Relation::BasedOn,
            }],
            unresolved: vec![UnresolvedNode {
                reference: StructureRef::new(StructureType::Codelist, "SPC", "CL_GONE", "1.0"),
                depth: 2,
                reason: "not found".to_string(),
            }],
        }
    }

    #[test]
    fn test_labels_follow_show_versions() {
        let graph = sample(true);
        assert_eq!(graph.label(&graph.nodes[1]), "DataStructure SPC:DSD_Y(1.0)");
        let graph = sample(false);
        assert_eq!(graph.label(&graph.nodes[1]), "DataStructure SPC:DSD_Y");
    }

    #[test]
    fn test_edge_queries() {
        let graph = sample(true);
        let root = graph.root.clone();
        assert_eq!(graph.edges_from(&root).count(), 1);
        assert_eq!(graph.edges_to(&root).count(), 0);
        assert!(graph.contains(&resolved(StructureType::DataStructure, "DSD_Y", "1.0")));
        assert!(!graph.contains(&resolved(StructureType::DataStructure, "DSD_Y", "2.0")));
        assert!(!graph.is_complete());
    }

    #[test]
    fn test_display_lists_nodes_edges_and_gaps() {
        let text = sample(false).to_string();
        assert!(text.starts_with("Dataflow SPC:DF_X\n"));
        assert!(text.contains("  -> based on DataStructure SPC:DSD_Y"));
        assert!(text.contains("unresolved"));
    }

    #[test]
    fn test_direction_flags() {
        assert!(Direction::Both.children() && Direction::Both.parents());
        assert!(!Direction::Children.parents());
        assert!(!Direction::Parents.children());
    }

    #[test]
    fn test_options_from_config() {
        let config = EngineConfig::builder().max_depth(2).show_versions(false).build();
        let options = GraphOptions::from_config(Direction::Parents, &config);
        assert_eq!(options.max_depth, Some(2));
        assert!(!options.show_versions);
    }
}
