// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::io;

use geo_types::LineString;
use geojson::{feature::Id, GeoJson};

use super::model::{BoundingBox, Feature, FeatureCollection};
use super::Error;
use crate::LatLon;

pub(super) fn from_reader<R: io::Read>(reader: R) -> Result<FeatureCollection, Error> {
    convert(GeoJson::from_reader(reader)?)
}

pub(super) fn from_slice(data: &[u8]) -> Result<FeatureCollection, Error> {
    convert(serde_json::from_slice(data)?)
}

fn convert(document: GeoJson) -> Result<FeatureCollection, Error> {
    let collection = match document {
        GeoJson::FeatureCollection(fc) => fc,
        GeoJson::Feature(_) => return Err(Error::NotFeatureCollection("Feature".to_string())),
        GeoJson::Geometry(_) => return Err(Error::NotFeatureCollection("Geometry".to_string())),
    };

    let mut features = Vec::with_capacity(collection.features.len());
    for (index, f) in collection.features.into_iter().enumerate() {
        let id = f.id.map(|id| match id {
            Id::String(s) => s,
            Id::Number(n) => n.to_string(),
        });

        let Some(geometry) = f.geometry else {
            log::warn!("feature {index}: no geometry - skipping");
            continue;
        };

        match geo_types::Geometry::<f64>::try_from(geometry) {
            Ok(geo_types::Geometry::LineString(line)) => {
                features.push(Feature {
                    id,
                    coordinates: convert_line(line),
                });
            }

            Ok(geo_types::Geometry::MultiLineString(lines)) => {
                for line in lines {
                    features.push(Feature {
                        id: id.clone(),
                        coordinates: convert_line(line),
                    });
                }
            }

            Ok(_) => {
                log::warn!("feature {index}: unsupported geometry type - skipping");
            }

            Err(e) => {
                log::warn!("feature {index}: {e} - skipping");
            }
        }
    }

    Ok(FeatureCollection {
        features,
        bbox: collection.bbox.as_deref().and_then(convert_bbox),
    })
}

/// Converts GeoJSON positions (`x` being the longitude) into [LatLons](LatLon),
/// dropping any altitude.
fn convert_line(line: LineString<f64>) -> Vec<LatLon> {
    line.into_iter()
        .map(|c| LatLon { lat: c.y, lon: c.x })
        .collect()
}

/// Converts a [GeoJSON bounding box](https://datatracker.ietf.org/doc/html/rfc7946#section-5),
/// either 2D (`[w, s, e, n]`) or 3D (`[w, s, min_alt, e, n, max_alt]`).
fn convert_bbox(b: &[f64]) -> Option<BoundingBox> {
    let (min_lon, min_lat, max_lon, max_lat) = match *b {
        [w, s, e, n] => (w, s, e, n),
        [w, s, _, e, n, _] => (w, s, e, n),
        _ => {
            log::warn!("ignoring bbox with {} members", b.len());
            return None;
        }
    };

    Some(BoundingBox {
        min: LatLon {
            lat: min_lat,
            lon: min_lon,
        },
        max: LatLon {
            lat: max_lat,
            lon: max_lon,
        },
    })
}
