// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Error, GraphEdge, GraphNode, NodeId};
use std::collections::btree_map::{BTreeMap, Entry};

/// Outgoing half of a [GraphEdge], stored next to its source node.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Edge {
    to: NodeId,
    weight: f64,
}

/// Represents a road network as a set of [GraphNodes](GraphNode)
/// and directed, weighted [GraphEdges](GraphEdge) between them.
///
/// There is at most one edge for every ordered `(from, to)` pair.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RoadGraph(BTreeMap<NodeId, (GraphNode, Vec<Edge>)>);

impl RoadGraph {
    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.0.len()
    }

    /// Returns the number of directed edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.0.values().map(|(_, edges)| edges.len()).sum()
    }

    /// Returns an iterator over all [GraphNodes](GraphNode), ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.0.values().map(|(node, _)| node)
    }

    /// Retrieves a [GraphNode] with the provided id.
    pub fn get_node(&self, id: NodeId) -> Option<GraphNode> {
        self.0.get(&id).map(|&(node, _)| node)
    }

    /// Creates or updates a [GraphNode] with `node.id`.
    ///
    /// All outgoing and incoming edges are preserved. Edge weights are not
    /// recomputed when a node moves.
    pub fn add_node(&mut self, node: GraphNode) {
        match self.0.entry(node.id) {
            Entry::Vacant(e) => {
                e.insert((node, Vec::default()));
            }
            Entry::Occupied(mut e) => {
                debug_assert_eq!(e.get().0.id, node.id);
                e.get_mut().0 = node;
            }
        }
    }

    /// Gets all outgoing [GraphEdges](GraphEdge) from a node with a given id,
    /// in insertion order.
    pub fn edges_from(&self, from: NodeId) -> impl Iterator<Item = GraphEdge> + '_ {
        self.0
            .get(&from)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |e| GraphEdge {
                from,
                to: e.to,
                weight: e.weight,
            })
    }

    /// Returns an iterator over every [GraphEdge] in the graph.
    ///
    /// Edges are ordered by their source node id, then by insertion order.
    pub fn all_edges(&self) -> impl Iterator<Item = GraphEdge> + '_ {
        self.0.iter().flat_map(|(&from, (_, edges))| {
            edges.iter().map(move |e| GraphEdge {
                from,
                to: e.to,
                weight: e.weight,
            })
        })
    }

    /// Gets the [GraphEdge] from one node to another.
    pub fn get_edge(&self, from: NodeId, to: NodeId) -> Option<GraphEdge> {
        self.edges_from(from).find(|e| e.to == to)
    }

    /// Creates or updates the [GraphEdge] from one node to another,
    /// returning the stored edge.
    ///
    /// Both endpoints must already exist in the graph.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, weight: f64) -> Result<GraphEdge, Error> {
        if !self.0.contains_key(&to) {
            return Err(Error::UnknownNode(to));
        }

        let (_, edges) = self.0.get_mut(&from).ok_or(Error::UnknownNode(from))?;
        let edge = Edge { to, weight };
        if let Some(candidate) = edges.iter_mut().find(|e| e.to == to) {
            *candidate = edge;
        } else {
            edges.push(edge);
        }

        Ok(GraphEdge { from, to, weight })
    }
}
