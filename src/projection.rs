// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{LatLon, Point};

/// Equatorial radius of Earth (WGS 84 semi-major axis), in meters.
/// Source: https://en.wikipedia.org/wiki/World_Geodetic_System#Defining_Parameters
pub const EARTH_EQUATORIAL_RADIUS: f64 = 6_378_137.0;

/// Mean radius of Earth, in meters.
/// Source: https://en.wikipedia.org/wiki/Earth_radius#Arithmetic_mean_radius
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Maps geographic coordinates onto the plane.
///
/// Implementations must be pure and deterministic: projecting the same
/// [LatLon] twice must give bit-identical [Points](Point), as crossroads
/// are identified by their projected coordinates.
pub trait CoordinateProjector {
    fn project(&self, c: LatLon) -> Point;
}

impl<F: Fn(LatLon) -> Point> CoordinateProjector for F {
    #[inline]
    fn project(&self, c: LatLon) -> Point {
        self(c)
    }
}

/// Spherical [Web Mercator](https://en.wikipedia.org/wiki/Web_Mercator_projection)
/// projection (EPSG:3857), with results in meters. `y` grows northwards.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WebMercator;

impl WebMercator {
    /// Inverse of [WebMercator::project](CoordinateProjector::project).
    pub fn unproject(&self, p: Point) -> LatLon {
        let lon = (p.x / EARTH_EQUATORIAL_RADIUS).to_degrees();
        let lat = (2.0 * (p.y / EARTH_EQUATORIAL_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2)
            .to_degrees();
        LatLon { lat, lon }
    }
}

impl CoordinateProjector for WebMercator {
    fn project(&self, c: LatLon) -> Point {
        let x = EARTH_EQUATORIAL_RADIUS * c.lon.to_radians();
        let y = EARTH_EQUATORIAL_RADIUS
            * (std::f64::consts::FRAC_PI_4 + c.lat.to_radians() * 0.5)
                .tan()
                .ln();
        Point::new(x, y)
    }
}

/// [Equirectangular](https://en.wikipedia.org/wiki/Equirectangular_projection)
/// projection centered at `origin`, with results in meters.
///
/// Accurate enough for city-sized extents around the origin; distortion
/// grows with the distance from `origin.lat`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    pub origin: LatLon,
}

impl Equirectangular {
    pub fn new(origin: LatLon) -> Self {
        Self { origin }
    }

    /// Inverse of [Equirectangular::project](CoordinateProjector::project).
    pub fn unproject(&self, p: Point) -> LatLon {
        let cos_lat0 = self.origin.lat.to_radians().cos();
        LatLon {
            lat: self.origin.lat + (p.y / EARTH_MEAN_RADIUS).to_degrees(),
            lon: self.origin.lon + (p.x / (EARTH_MEAN_RADIUS * cos_lat0)).to_degrees(),
        }
    }
}

impl CoordinateProjector for Equirectangular {
    fn project(&self, c: LatLon) -> Point {
        let cos_lat0 = self.origin.lat.to_radians().cos();
        Point::new(
            EARTH_MEAN_RADIUS * (c.lon - self.origin.lon).to_radians() * cos_lat0,
            EARTH_MEAN_RADIUS * (c.lat - self.origin.lat).to_radians(),
        )
    }
}
