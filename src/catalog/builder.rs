// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::registry::CrossroadRegistry;
use crate::{
    BoundingBox, CoordinateProjector, Crossroad, Error, Feature, MalformedReason, Point,
    RoadGraph,
};

use super::{MalformedFeaturePolicy, Options, Road, RoadCatalog};

/// Helper object used for storing state related to converting [Features](Feature)
/// into a [RoadCatalog].
pub(super) struct CatalogBuilder<'a, P: CoordinateProjector + ?Sized> {
    projector: &'a P,
    options: &'a Options,
    registry: CrossroadRegistry,
    graph: RoadGraph,
    roads: Vec<Road>,
    skipped: usize,
}

impl<'a, P: CoordinateProjector + ?Sized> CatalogBuilder<'a, P> {
    /// Create a new, empty catalog builder.
    pub(super) fn new(projector: &'a P, options: &'a Options) -> Self {
        Self {
            projector,
            options,
            registry: CrossroadRegistry::new(options.matching),
            graph: RoadGraph::default(),
            roads: Vec::default(),
            skipped: 0,
        }
    }

    /// Add all features, in order.
    pub(super) fn add_features(&mut self, features: &[Feature]) -> Result<(), Error> {
        self.roads.reserve(features.len() * 2);
        for (index, f) in features.iter().enumerate() {
            self.add_feature(index, f)?;
        }
        Ok(())
    }

    fn add_feature(&mut self, index: usize, f: &Feature) -> Result<(), Error> {
        let path = match self.project_path(f) {
            Ok(path) => path,
            Err(reason) => return self.reject_feature(index, f, reason),
        };

        self.add_road_pair(path)
    }

    fn reject_feature(
        &mut self,
        index: usize,
        f: &Feature,
        reason: MalformedReason,
    ) -> Result<(), Error> {
        match self.options.on_malformed {
            MalformedFeaturePolicy::Skip => {
                log::warn!(
                    "skipping feature {} (id: {}): {}",
                    index,
                    f.id.as_deref().unwrap_or("none"),
                    reason,
                );
                self.skipped += 1;
                Ok(())
            }

            MalformedFeaturePolicy::Fail => Err(Error::MalformedFeature { index, reason }),
        }
    }

    /// Projects all coordinates of a feature, preserving their order.
    fn project_path(&self, f: &Feature) -> Result<Vec<Point>, MalformedReason> {
        if f.coordinates.len() < 2 {
            return Err(MalformedReason::TooFewCoordinates(f.coordinates.len()));
        }

        f.coordinates
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let p = self.projector.project(c);
                if p.is_finite() {
                    Ok(p)
                } else {
                    Err(MalformedReason::NonFiniteCoordinate(i))
                }
            })
            .collect()
    }

    /// Creates the forward and backward [Roads](Road) (and their edges)
    /// for a single projected path.
    fn add_road_pair(&mut self, path: Vec<Point>) -> Result<(), Error> {
        debug_assert!(path.len() >= 2);

        let start = self.get_or_create_crossroad(path[0])?;
        let end = self.get_or_create_crossroad(path[path.len() - 1])?;

        // NOTE: Weight is the crow-flies distance between the crossroads,
        //       not the length of the path.
        let weight = start.coordinate.dist(end.coordinate);
        if start.node_id == end.node_id {
            log::debug!("self-loop at crossroad {}", start.node_id);
        }

        let forward = self.graph.add_edge(start.node_id, end.node_id, weight)?;
        let backward = self.graph.add_edge(end.node_id, start.node_id, weight)?;

        let mut reversed = path.clone();
        reversed.reverse();

        self.roads.push(Road {
            path,
            start,
            end,
            edge: forward,
        });
        self.roads.push(Road {
            path: reversed,
            start: end,
            end: start,
            edge: backward,
        });
        Ok(())
    }

    fn get_or_create_crossroad(&mut self, p: Point) -> Result<Crossroad, Error> {
        let known = self.registry.len();
        let crossroad = self.registry.get_or_create(p)?;
        if self.registry.len() > known {
            self.graph.add_node(crossroad.node());
        }
        Ok(crossroad)
    }

    /// Freezes the builder into a [RoadCatalog].
    pub(super) fn finish(self, bbox: Option<BoundingBox>) -> RoadCatalog {
        let bounds = bbox.map(|b| {
            (
                self.projector.project(b.top_left()),
                self.projector.project(b.bottom_right()),
            )
        });

        log::info!(
            "road catalog {} built: {} crossroads, {} edges, {} roads ({} features skipped)",
            self.options.name.as_deref().unwrap_or("(unnamed)"),
            self.registry.len(),
            self.graph.edge_count(),
            self.roads.len(),
            self.skipped,
        );

        RoadCatalog {
            name: self.options.name.clone(),
            registry: self.registry,
            graph: self.graph,
            roads: self.roads,
            bbox,
            bounds,
            skipped: self.skipped,
        }
    }
}
