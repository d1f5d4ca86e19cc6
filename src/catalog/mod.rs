// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{
    BoundingBox, CoordinateMatching, CoordinateProjector, Crossroad, CrossroadRegistry, Error,
    FeatureSource, GraphEdge, LatLon, NodeId, Point, RoadGraph, SpatialQueryEngine,
};

use builder::CatalogBuilder;

mod builder;

/// What to do with features which can't be converted into roads:
/// features with fewer than 2 coordinates, or with coordinates
/// which don't project onto finite points.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MalformedFeaturePolicy {
    /// Log a warning and continue with the next feature.
    #[default]
    Skip,

    /// Abort the whole ingestion with [Error::MalformedFeature].
    Fail,
}

/// Additional controls for converting features into a [RoadCatalog].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Options {
    /// Human-readable label of the network, e.g. the city name.
    pub name: Option<String>,

    /// When two feature endpoints are considered the same [Crossroad].
    pub matching: CoordinateMatching,

    /// How malformed features are handled.
    pub on_malformed: MalformedFeaturePolicy,
}

/// A directed, geometrically realized path between two [Crossroads](Crossroad);
/// the geometric counterpart of a single [GraphEdge].
#[derive(Debug, Clone, PartialEq)]
pub struct Road {
    /// Projected geometry, ordered from `start` to `end`.
    pub path: Vec<Point>,
    pub start: Crossroad,
    pub end: Crossroad,
    pub edge: GraphEdge,
}

impl Road {
    /// Returns the length of the road geometry, as opposed to
    /// the crow-flies distance stored in [Road::edge].
    pub fn length(&self) -> f64 {
        self.path.windows(2).map(|w| w[0].dist(w[1])).sum()
    }
}

/// An immutable road network: [Crossroads](Crossroad), the [RoadGraph] between
/// them, and the [Roads](Road) realizing every graph edge.
///
/// Built once with [RoadCatalog::ingest]; afterwards it only allows read access,
/// and can be freely shared between threads.
#[derive(Debug, Clone)]
pub struct RoadCatalog {
    registry: CrossroadRegistry,
    graph: RoadGraph,
    roads: Vec<Road>,
    name: Option<String>,
    bbox: Option<BoundingBox>,
    bounds: Option<(Point, Point)>,
    skipped: usize,
}

impl RoadCatalog {
    /// Converts all features from `source` into a road network.
    ///
    /// Every feature produces two [Roads](Road) (one per direction) and two
    /// [GraphEdges](GraphEdge) with equal weights. Features are processed in order,
    /// so crossroad ids follow the order in which endpoints first appear.
    ///
    /// Malformed features are handled as per [Options::on_malformed]. With
    /// [MalformedFeaturePolicy::Fail], the first malformed feature aborts
    /// the ingestion and nothing is returned.
    pub fn ingest<S, P>(source: &S, projector: &P, options: &Options) -> Result<Self, Error>
    where
        S: FeatureSource + ?Sized,
        P: CoordinateProjector + ?Sized,
    {
        let mut builder = CatalogBuilder::new(projector, options);
        builder.add_features(source.features())?;
        Ok(builder.finish(source.bounds()))
    }

    /// Returns a [SpatialQueryEngine] over this catalog.
    #[inline]
    pub fn query(&self) -> SpatialQueryEngine<'_> {
        SpatialQueryEngine::new(self)
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn registry(&self) -> &CrossroadRegistry {
        &self.registry
    }

    /// Returns all [Roads](Road), in creation order: the forward road
    /// of every feature is immediately followed by its backward road.
    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Returns an iterator over all [Crossroads](Crossroad), ordered by node id.
    pub fn crossroads(&self) -> impl Iterator<Item = &Crossroad> {
        self.registry.iter()
    }

    /// Returns the label set through [Options::name].
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the number of malformed features skipped during ingestion.
    pub fn skipped_features(&self) -> usize {
        self.skipped
    }

    /// Finds the first [Road] realizing the provided edge.
    ///
    /// This function requires a walk over all roads.
    pub fn lookup_road(&self, edge: &GraphEdge) -> Option<&Road> {
        self.roads
            .iter()
            .find(|r| r.start.node_id == edge.from && r.end.node_id == edge.to)
    }

    /// Returns the coordinate of the crossroad backing the node with the provided id.
    #[inline]
    pub fn coordinate_of(&self, id: NodeId) -> Option<Point> {
        self.registry.get(id).map(|cr| cr.coordinate)
    }

    /// Returns the geographic midpoint of the source's bounding box.
    pub fn center(&self) -> Option<LatLon> {
        self.bbox.map(|b| b.center())
    }

    /// Returns the geographic bounding box of the source.
    pub fn bbox(&self) -> Option<BoundingBox> {
        self.bbox
    }

    /// Returns the projected top-left and bottom-right corners of the source's bounding box.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::WebMercator;
    use crate::{Feature, FeatureCollection, MalformedReason};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-6),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    /// Projects (lat, lon) straight onto (y, x).
    fn flat(c: LatLon) -> Point {
        Point::new(c.lon, c.lat)
    }

    fn line(points: &[(f64, f64)]) -> Feature {
        Feature::new(points.iter().map(|&(x, y)| LatLon::new(y, x)).collect())
    }

    fn ingest(features: Vec<Feature>) -> RoadCatalog {
        RoadCatalog::ingest(
            &FeatureCollection::new(features),
            &flat,
            &Options::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_feature() {
        let c = ingest(vec![line(&[(0.0, 0.0), (10.0, 0.0)])]);

        let crossroads: Vec<Point> = c.crossroads().map(|cr| cr.coordinate).collect();
        assert_eq!(crossroads, vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);

        assert_eq!(c.graph().edge_count(), 2);
        assert_eq!(c.graph().get_edge(0, 1).unwrap().weight, 10.0);
        assert_eq!(c.graph().get_edge(1, 0).unwrap().weight, 10.0);

        assert_eq!(c.roads().len(), 2);
        assert_eq!(
            c.roads()[0].path,
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]
        );
        assert_eq!(
            c.roads()[1].path,
            vec![Point::new(10.0, 0.0), Point::new(0.0, 0.0)]
        );
    }

    #[test]
    fn test_shared_endpoint() {
        let c = ingest(vec![
            line(&[(0.0, 0.0), (5.0, 5.0)]),
            line(&[(5.0, 5.0), (10.0, 0.0)]),
        ]);

        assert_eq!(c.registry().len(), 3);
        assert_eq!(c.graph().node_count(), 3);

        let shared = c.registry().index_of(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(c.roads()[0].end.node_id, shared);
        assert_eq!(c.roads()[2].start.node_id, shared);
        assert_eq!(c.roads()[1].start.node_id, shared);
        assert_eq!(c.roads()[3].end.node_id, shared);
    }

    #[test]
    fn test_two_edges_per_feature() {
        let features = vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (1.0, 1.0), (2.0, 1.0)]),
            line(&[(2.0, 1.0), (0.0, 0.0)]),
            line(&[(1.0, 0.0), (3.0, 3.0)]),
        ];
        let f = features.len();
        let c = ingest(features);

        assert_eq!(c.graph().edge_count(), 2 * f);
        assert_eq!(c.roads().len(), 2 * f);
    }

    #[test]
    fn test_roads_are_paired() {
        let c = ingest(vec![
            line(&[(0.0, 0.0), (1.0, 2.0), (4.0, 2.0)]),
            line(&[(4.0, 2.0), (4.0, 8.0)]),
        ]);

        for pair in c.roads().chunks(2) {
            let (forward, backward) = (&pair[0], &pair[1]);
            let mut reversed = forward.path.clone();
            reversed.reverse();

            assert_eq!(backward.path, reversed);
            assert_eq!(backward.start, forward.end);
            assert_eq!(backward.end, forward.start);
            assert_eq!(backward.edge.weight, forward.edge.weight);
            assert_eq!(backward.edge.from, forward.edge.to);
            assert_eq!(backward.edge.to, forward.edge.from);
        }
    }

    #[test]
    fn test_weight_is_endpoint_distance() {
        let c = ingest(vec![line(&[(0.0, 0.0), (0.0, 4.0), (3.0, 4.0)])]);
        let road = &c.roads()[0];
        assert_almost_eq!(road.edge.weight, 5.0);
        assert_almost_eq!(road.length(), 7.0);
    }

    #[test]
    fn test_lookup_road() {
        let c = ingest(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (2.0, 0.0)]),
        ]);

        let edge = c.graph().get_edge(2, 1).unwrap();
        let road = c.lookup_road(&edge).unwrap();
        assert_eq!(road.start.node_id, 2);
        assert_eq!(road.end.node_id, 1);
        assert_eq!(road.path, vec![Point::new(2.0, 0.0), Point::new(1.0, 0.0)]);

        let missing = GraphEdge {
            from: 0,
            to: 2,
            weight: 2.0,
        };
        assert!(c.lookup_road(&missing).is_none());
    }

    #[test]
    fn test_coordinate_of() {
        let c = ingest(vec![line(&[(3.0, 1.0), (7.0, 2.0)])]);
        assert_eq!(c.coordinate_of(0), Some(Point::new(3.0, 1.0)));
        assert_eq!(c.coordinate_of(1), Some(Point::new(7.0, 2.0)));
        assert_eq!(c.coordinate_of(2), None);
    }

    #[test]
    fn test_self_loop() {
        let c = ingest(vec![line(&[(0.0, 0.0), (1.0, 1.0), (0.0, 0.0)])]);

        assert_eq!(c.registry().len(), 1);
        assert_eq!(c.roads().len(), 2);
        assert_eq!(c.graph().edge_count(), 1);
        assert_eq!(c.graph().get_edge(0, 0).unwrap().weight, 0.0);
    }

    #[test]
    fn test_malformed_skip() {
        let c = ingest(vec![
            line(&[(0.0, 0.0)]),
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (f64::NAN, 0.0)]),
        ]);

        assert_eq!(c.skipped_features(), 2);
        assert_eq!(c.registry().len(), 2);
        assert_eq!(c.roads().len(), 2);
    }

    #[test]
    fn test_malformed_fail() {
        let options = Options {
            on_malformed: MalformedFeaturePolicy::Fail,
            ..Options::default()
        };
        let fc = FeatureCollection::new(vec![
            line(&[(0.0, 0.0), (1.0, 0.0)]),
            line(&[(1.0, 0.0), (2.0, 0.0), (f64::INFINITY, 0.0)]),
        ]);

        assert_eq!(
            RoadCatalog::ingest(&fc, &flat, &options).unwrap_err(),
            Error::MalformedFeature {
                index: 1,
                reason: MalformedReason::NonFiniteCoordinate(2),
            },
        );

        let fc = FeatureCollection::new(vec![Feature::default()]);
        assert_eq!(
            RoadCatalog::ingest(&fc, &flat, &options).unwrap_err(),
            Error::MalformedFeature {
                index: 0,
                reason: MalformedReason::TooFewCoordinates(0),
            },
        );
    }

    #[test]
    fn test_grid_matching_merges_endpoints() {
        let options = Options {
            matching: CoordinateMatching::Grid(1e-6),
            ..Options::default()
        };
        let fc = FeatureCollection::new(vec![
            line(&[(0.0, 0.0), (0.1 + 0.2, 0.0)]),
            line(&[(0.3, 0.0), (1.0, 0.0)]),
        ]);

        let exact = RoadCatalog::ingest(&fc, &flat, &Options::default()).unwrap();
        assert_eq!(exact.registry().len(), 4);

        let snapped = RoadCatalog::ingest(&fc, &flat, &options).unwrap();
        assert_eq!(snapped.registry().len(), 3);
    }

    #[test]
    fn test_center_and_bounds() {
        let c = ingest(vec![line(&[(0.0, 0.0), (10.0, 4.0)])]);
        assert_eq!(c.center(), Some(LatLon::new(2.0, 5.0)));
        assert_eq!(
            c.bounds(),
            Some((Point::new(0.0, 4.0), Point::new(10.0, 0.0)))
        );

        let empty = ingest(Vec::default());
        assert_eq!(empty.center(), None);
        assert_eq!(empty.bounds(), None);
        assert!(empty.query().nearest_road(Point::ORIGIN).is_none());
    }

    #[test]
    fn test_name() {
        let options = Options {
            name: Some("Warsaw".to_string()),
            ..Options::default()
        };
        let fc = FeatureCollection::new(vec![line(&[(0.0, 0.0), (1.0, 0.0)])]);
        let c = RoadCatalog::ingest(&fc, &flat, &options).unwrap();
        assert_eq!(c.name(), Some("Warsaw"));

        assert_eq!(ingest(Vec::default()).name(), None);
    }

    #[test]
    fn test_ingest_fixture() {
        const DATA: &[u8] = include_bytes!("../geojson/test_fixtures/simple.geojson");
        let fc = crate::geojson::read_from_buffer(DATA, crate::geojson::FileFormat::Json).unwrap();
        let c = RoadCatalog::ingest(&fc, &WebMercator, &Options::default()).unwrap();

        // A, B, C and D - B is shared by all three features
        assert_eq!(c.registry().len(), 4);
        assert_eq!(c.graph().edge_count(), 6);
        assert_eq!(c.roads().len(), 6);
        assert_eq!(c.roads()[2].path.len(), 3);

        let b = WebMercator.project(LatLon::new(43.73, 7.43));
        let b_id = c.registry().index_of(b).unwrap();
        assert_eq!(b_id, 1);
        assert_eq!(c.graph().edges_from(b_id).count(), 3);

        let center = c.center().unwrap();
        assert_almost_eq!(center.lat, 43.725);
        assert_almost_eq!(center.lon, 7.43);
    }
}
