// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::{Crossroad, Error, NodeId, Point};

/// Decides when two projected coordinates refer to the same [Crossroad].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum CoordinateMatching {
    /// Coordinates must be exactly equal (`-0.0` and `0.0` are equal, NaN is never equal).
    #[default]
    Exact,

    /// Coordinates are snapped to a square grid with the given cell size,
    /// and compared by cell. Two points closer than the cell size may still
    /// end up in neighboring cells.
    Grid(f64),

    /// Coordinates match the first crossroad within the given Euclidean distance.
    /// Requires a linear scan over all crossroads for every lookup.
    Tolerance(f64),
}

impl CoordinateMatching {
    fn is_valid(&self) -> bool {
        match *self {
            Self::Exact => true,
            Self::Grid(cell) => cell.is_finite() && cell > 0.0,
            Self::Tolerance(eps) => eps.is_finite() && eps >= 0.0,
        }
    }
}

/// Deduplicates junction coordinates into [Crossroads](Crossroad).
///
/// Node ids are handed out append-only: the n-th registered crossroad
/// gets id `n - 1`, so ids are dense, zero-based and usable as indices.
#[derive(Debug, Default, Clone)]
pub struct CrossroadRegistry {
    crossroads: Vec<Crossroad>,
    keys: HashMap<(u64, u64), NodeId>,
    matching: CoordinateMatching,
}

impl CrossroadRegistry {
    /// Creates an empty registry with the given [CoordinateMatching].
    ///
    /// Invalid matchings (non-positive or non-finite grid sizes,
    /// negative or non-finite tolerances) fall back to [CoordinateMatching::Exact].
    pub fn new(matching: CoordinateMatching) -> Self {
        let matching = if matching.is_valid() {
            matching
        } else {
            log::warn!("invalid coordinate matching {matching:?} - using exact matching instead");
            CoordinateMatching::Exact
        };

        Self {
            crossroads: Vec::default(),
            keys: HashMap::default(),
            matching,
        }
    }

    pub fn matching(&self) -> CoordinateMatching {
        self.matching
    }

    /// Returns the number of registered crossroads.
    pub fn len(&self) -> usize {
        self.crossroads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossroads.is_empty()
    }

    /// Returns an iterator over all crossroads, ordered by node id.
    pub fn iter(&self) -> impl Iterator<Item = &Crossroad> {
        self.crossroads.iter()
    }

    /// Retrieves the [Crossroad] backed by the node with the provided id.
    pub fn get(&self, id: NodeId) -> Option<Crossroad> {
        self.crossroads.get(id as usize).copied()
    }

    /// Finds the id of the crossroad matching the provided coordinate.
    pub fn index_of(&self, coordinate: Point) -> Option<NodeId> {
        match self.matching {
            CoordinateMatching::Tolerance(eps) => self
                .crossroads
                .iter()
                .find(|cr| cr.coordinate.dist(coordinate) <= eps)
                .map(|cr| cr.node_id),

            _ => self
                .key(coordinate)
                .and_then(|key| self.keys.get(&key).copied()),
        }
    }

    /// Returns the crossroad matching the provided coordinate, registering
    /// a new one (with id equal to [CrossroadRegistry::len]) if there is none.
    pub fn get_or_create(&mut self, coordinate: Point) -> Result<Crossroad, Error> {
        if let Some(id) = self.index_of(coordinate) {
            return Ok(self.crossroads[id as usize]);
        }

        let node_id = NodeId::try_from(self.crossroads.len()).map_err(|_| Error::TooManyCrossroads)?;
        let crossroad = Crossroad {
            coordinate,
            node_id,
        };

        if let Some(key) = self.key(coordinate) {
            self.keys.insert(key, node_id);
        }
        self.crossroads.push(crossroad);
        Ok(crossroad)
    }

    /// Computes the hash key of a coordinate. Returns `None` for coordinates which
    /// can't be hashed (NaNs) and for tolerance matching, which has no keys.
    fn key(&self, p: Point) -> Option<(u64, u64)> {
        if p.x.is_nan() || p.y.is_nan() {
            return None;
        }

        match self.matching {
            CoordinateMatching::Exact => Some((canonical_bits(p.x), canonical_bits(p.y))),
            CoordinateMatching::Grid(cell) => Some((
                canonical_bits((p.x / cell).round()),
                canonical_bits((p.y / cell).round()),
            )),
            CoordinateMatching::Tolerance(_) => None,
        }
    }
}

/// Returns the bit pattern of `v`, with `-0.0` mapped onto `0.0`.
#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}
