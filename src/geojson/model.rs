// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::LatLon;

/// A single road centerline: an ordered sequence of geographic coordinates.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Feature {
    /// Identifier of the source feature, if it had any.
    /// Parts of a `MultiLineString` share the id of their feature.
    pub id: Option<String>,
    pub coordinates: Vec<LatLon>,
}

impl Feature {
    pub fn new(coordinates: Vec<LatLon>) -> Self {
        Self {
            id: None,
            coordinates,
        }
    }

    #[inline]
    pub fn first(&self) -> Option<LatLon> {
        self.coordinates.first().copied()
    }

    #[inline]
    pub fn last(&self) -> Option<LatLon> {
        self.coordinates.last().copied()
    }
}

/// Geographic extent of a set of features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// South-west corner (minimum latitude and longitude).
    pub min: LatLon,

    /// North-east corner (maximum latitude and longitude).
    pub max: LatLon,
}

impl BoundingBox {
    pub fn from_point(c: LatLon) -> Self {
        Self { min: c, max: c }
    }

    /// Grows the box to include the provided coordinate.
    pub fn extend(&mut self, c: LatLon) {
        self.min.lat = self.min.lat.min(c.lat);
        self.min.lon = self.min.lon.min(c.lon);
        self.max.lat = self.max.lat.max(c.lat);
        self.max.lon = self.max.lon.max(c.lon);
    }

    /// Returns the midpoint of the box.
    pub fn center(&self) -> LatLon {
        LatLon {
            lat: (self.min.lat + self.max.lat) / 2.0,
            lon: (self.min.lon + self.max.lon) / 2.0,
        }
    }

    /// Returns the north-west corner of the box.
    pub fn top_left(&self) -> LatLon {
        LatLon {
            lat: self.max.lat,
            lon: self.min.lon,
        }
    }

    /// Returns the south-east corner of the box.
    pub fn bottom_right(&self) -> LatLon {
        LatLon {
            lat: self.min.lat,
            lon: self.max.lon,
        }
    }
}

/// Supplies an ordered sequence of [Features](Feature) for ingestion.
pub trait FeatureSource {
    fn features(&self) -> &[Feature];

    /// Returns the extent of the features, or `None` if it's unknown.
    fn bounds(&self) -> Option<BoundingBox>;
}

/// In-memory collection of [Features](Feature), usually read from a GeoJSON file.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,

    /// Explicit bounding box of the collection. If missing, [FeatureCollection::bounds]
    /// computes the extent of all coordinates.
    pub bbox: Option<BoundingBox>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            features,
            bbox: None,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FeatureSource for FeatureCollection {
    fn features(&self) -> &[Feature] {
        &self.features
    }

    fn bounds(&self) -> Option<BoundingBox> {
        if self.bbox.is_some() {
            return self.bbox;
        }

        let mut coordinates = self.features.iter().flat_map(|f| f.coordinates.iter());
        let mut bbox = BoundingBox::from_point(*coordinates.next()?);
        coordinates.for_each(|&c| bbox.extend(c));
        Some(bbox)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_bounds() {
        let fc = FeatureCollection::new(vec![
            Feature::new(vec![LatLon::new(1.0, 2.0), LatLon::new(3.0, 0.0)]),
            Feature::new(vec![LatLon::new(-1.0, 5.0)]),
        ]);

        let bounds = fc.bounds().unwrap();
        assert_eq!(bounds.min, LatLon::new(-1.0, 0.0));
        assert_eq!(bounds.max, LatLon::new(3.0, 5.0));
        assert_eq!(bounds.center(), LatLon::new(1.0, 2.5));
        assert_eq!(bounds.top_left(), LatLon::new(3.0, 0.0));
        assert_eq!(bounds.bottom_right(), LatLon::new(-1.0, 5.0));
    }

    #[test]
    fn test_explicit_bounds() {
        let bbox = BoundingBox {
            min: LatLon::new(0.0, 0.0),
            max: LatLon::new(10.0, 10.0),
        };
        let fc = FeatureCollection {
            features: vec![Feature::new(vec![LatLon::new(1.0, 1.0)])],
            bbox: Some(bbox),
        };
        assert_eq!(fc.bounds(), Some(bbox));
    }

    #[test]
    fn test_empty_bounds() {
        assert_eq!(FeatureCollection::default().bounds(), None);
        assert_eq!(
            FeatureCollection::new(vec![Feature::default()]).bounds(),
            None
        );
    }

    #[test]
    fn test_first_last() {
        let f = Feature::new(vec![
            LatLon::new(1.0, 1.0),
            LatLon::new(2.0, 2.0),
            LatLon::new(3.0, 3.0),
        ]);
        assert_eq!(f.first(), Some(LatLon::new(1.0, 1.0)));
        assert_eq!(f.last(), Some(LatLon::new(3.0, 3.0)));
        assert_eq!(Feature::default().first(), None);
    }
}
