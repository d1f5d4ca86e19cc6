// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Road networks built from line features, with nearest-neighbor queries.
//!
//! Road centerlines (usually GeoJSON `LineString`s) are projected onto the plane
//! and converted into a weighted directed graph. Every feature becomes a pair of
//! [Roads](Road): one in the digitized direction and one reversed. Feature endpoints
//! become [Crossroads](Crossroad), deduplicated by their projected coordinate.
//!
//! The resulting [RoadCatalog] answers nearest-crossroad, nearest-edge and nearest-road
//! queries through a [SpatialQueryEngine]. All queries are linear scans; there is
//! no spatial index.
//!
//! # Example
//!
//! ```no_run
//! use crossroads::projection::WebMercator;
//! use crossroads::{geojson, catalog, CoordinateProjector, LatLon, RoadCatalog};
//!
//! let features = geojson::read_from_file("path/to/roads.geojson", geojson::FileFormat::Unknown)
//!     .expect("failed to load roads.geojson");
//! let roads = RoadCatalog::ingest(&features, &WebMercator, &catalog::Options::default())
//!     .expect("failed to ingest roads.geojson");
//!
//! let here = WebMercator.project(LatLon { lat: 43.7384, lon: 7.4246 });
//! let query = roads.query();
//! if let Some(road) = query.nearest_road(here) {
//!     println!("Nearest road: {:?} -> {:?}", road.start, road.end);
//! }
//! ```

pub mod catalog;
mod error;
pub mod geojson;
pub mod geometry;
mod graph;
pub mod projection;
mod query;
mod registry;

pub use catalog::{Road, RoadCatalog};
pub use error::{Error, MalformedReason};
pub use crate::geojson::{BoundingBox, Feature, FeatureCollection, FeatureSource};
pub use geometry::{distance, Point, SegmentPosition};
pub use graph::RoadGraph;
pub use projection::CoordinateProjector;
pub use query::{EdgeMatch, SpatialQueryEngine, DEFAULT_SEARCH_RADIUS};
pub use registry::{CoordinateMatching, CrossroadRegistry};

/// Identifier of a [GraphNode]. Ids are dense and zero-based, and double as
/// indices into the id-ordered crossroad table.
pub type NodeId = u32;

/// A raw geographic coordinate, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Represents an element of the [RoadGraph].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub coordinate: Point,
}

/// Represents a directed connection between two [GraphNodes](GraphNode).
///
/// `weight` is the straight-line distance between the endpoints,
/// not the length of the realized road geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
}

/// A deduplicated road network junction, backed by exactly one [GraphNode].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossroad {
    pub coordinate: Point,
    pub node_id: NodeId,
}

impl Crossroad {
    /// Returns the [GraphNode] backing this crossroad.
    #[inline]
    pub fn node(&self) -> GraphNode {
        GraphNode {
            id: self.node_id,
            coordinate: self.coordinate,
        }
    }
}
