// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::geometry::{project_onto_line, SegmentPosition};
use crate::projection::EARTH_EQUATORIAL_RADIUS;
use crate::{Crossroad, GraphEdge, Point, Road, RoadCatalog};

/// Recommended upper bound on the search radius of
/// [SpatialQueryEngine::nearest_crossroad], in projected units.
///
/// Equal to Earth's equatorial radius in meters, which admits every
/// crossroad of a city-sized network projected with
/// [WebMercator](crate::projection::WebMercator).
pub const DEFAULT_SEARCH_RADIUS: f64 = EARTH_EQUATORIAL_RADIUS;

/// Details of the [GraphEdge] returned by [SpatialQueryEngine::nearest_edge_match].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeMatch {
    pub edge: GraphEdge,

    /// Projection of the query point onto the edge.
    pub projection: Point,

    /// Position of `projection` along the edge, from `0` (at `edge.from`)
    /// to `1` (at `edge.to`).
    pub t: f64,

    /// Distance between the query point and `projection`.
    pub distance: f64,
}

/// Answers nearest-neighbor queries over a [RoadCatalog].
///
/// Every query walks over all crossroads or all edges, and is
/// not suitable for large networks queried many times.
#[derive(Debug, Clone, Copy)]
pub struct SpatialQueryEngine<'a> {
    catalog: &'a RoadCatalog,
}

impl<'a> SpatialQueryEngine<'a> {
    pub fn new(catalog: &'a RoadCatalog) -> Self {
        Self { catalog }
    }

    /// Finds the [Crossroad] closest to `p`, provided it's closer than `max_distance`.
    ///
    /// If multiple crossroads are equally close, the one with the lowest id is returned.
    pub fn nearest_crossroad(&self, p: Point, max_distance: f64) -> Option<Crossroad> {
        let mut best_dist = max_distance;
        let mut best = None;

        for cr in self.catalog.crossroads() {
            let dist = cr.coordinate.dist(p);
            if dist < best_dist {
                best_dist = dist;
                best = Some(*cr);
            }
        }

        best
    }

    /// Finds the [GraphEdge] closest to `p`.
    ///
    /// Only edges onto which `p` can be perpendicularly projected are taken
    /// into account - see [SpatialQueryEngine::nearest_edge_match].
    pub fn nearest_edge(&self, p: Point) -> Option<GraphEdge> {
        self.nearest_edge_match(p).map(|m| m.edge)
    }

    /// Finds the [GraphEdge] closest to `p`, together with the projection of `p`.
    ///
    /// Every edge is treated as a straight segment between its endpoints' crossroads,
    /// regardless of the geometry of its [Road]. Edges for which the projection
    /// of `p` falls outside the segment are skipped entirely, so this function returns
    /// `None` if `p` lies "beyond" every edge. Ties are resolved in favor of the edge
    /// coming first in [RoadGraph::all_edges](crate::RoadGraph::all_edges).
    pub fn nearest_edge_match(&self, p: Point) -> Option<EdgeMatch> {
        let mut best_dist = f64::INFINITY;
        let mut best = None;

        for edge in self.catalog.graph().all_edges() {
            let (Some(p1), Some(p2)) = (
                self.catalog.coordinate_of(edge.from),
                self.catalog.coordinate_of(edge.to),
            ) else {
                continue;
            };

            let projection = project_onto_line(p, p1, p2);
            if projection.position() != SegmentPosition::Between {
                continue;
            }

            let distance = p.dist(projection.point);
            if distance < best_dist {
                best_dist = distance;
                best = Some(EdgeMatch {
                    edge,
                    projection: projection.point,
                    t: projection.t,
                    distance,
                });
            }
        }

        best
    }

    /// Finds the [Road] closest to `p`: the road realizing the
    /// [nearest edge](SpatialQueryEngine::nearest_edge).
    pub fn nearest_road(&self, p: Point) -> Option<&'a Road> {
        let edge = self.nearest_edge(p)?;
        self.catalog.lookup_road(&edge)
    }
}
