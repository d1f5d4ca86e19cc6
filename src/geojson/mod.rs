// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Reading road centerlines from [GeoJSON](https://datatracker.ietf.org/doc/html/rfc7946) files.
//!
//! Only `FeatureCollection` documents are supported. `LineString` geometries
//! become one [Feature] each, while every part of a `MultiLineString` becomes
//! a separate [Feature]. Other geometries are skipped with a warning.

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

mod json;
mod model;

pub use model::{BoundingBox, Feature, FeatureCollection, FeatureSource};

/// Format of the input GeoJSON file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    #[default]
    Unknown,

    /// Force uncompressed GeoJSON
    Json,

    /// Force GeoJSON with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    JsonGz,

    /// Force GeoJSON with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    JsonBz2,
}

impl FileFormat {
    /// Guesses the format of a file based on its first few bytes.
    pub fn detect(header: &[u8]) -> Self {
        if header.starts_with(&[0x1f, 0x8b]) {
            Self::JsonGz
        } else if header.starts_with(b"BZh") {
            Self::JsonBz2
        } else {
            Self::Json
        }
    }
}

/// Error which can occur when reading a GeoJSON file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("geojson: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("expected a FeatureCollection, got {0:?}")]
    NotFeatureCollection(String),
}

/// Parse a [FeatureCollection] from a reader.
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn read_from_io<R: io::Read>(reader: R, format: FileFormat) -> Result<FeatureCollection, Error> {
    let mut b = io::BufReader::new(reader);
    let format = match format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?),
        f => f,
    };
    log::debug!("reading GeoJSON as {format:?}");

    match format {
        FileFormat::Unknown | FileFormat::Json => json::from_reader(b),

        FileFormat::JsonGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            json::from_reader(io::BufReader::new(d))
        }

        FileFormat::JsonBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            json::from_reader(io::BufReader::new(d))
        }
    }
}

/// Parse a [FeatureCollection] from a file at the provided path.
pub fn read_from_file<P: AsRef<Path>>(path: P, format: FileFormat) -> Result<FeatureCollection, Error> {
    let f = File::open(path)?;
    read_from_io(f, format)
}

/// Parse a [FeatureCollection] from a static buffer.
pub fn read_from_buffer(data: &[u8], format: FileFormat) -> Result<FeatureCollection, Error> {
    let format = match format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if format == FileFormat::Json {
        // Fast path is available for in-memory JSON data
        json::from_slice(data)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        read_from_io(io::Cursor::new(data), format)
    }
}
