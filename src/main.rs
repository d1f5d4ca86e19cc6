use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use crossroads::catalog::{MalformedFeaturePolicy, Options};
use crossroads::geojson::{self, FileFormat};
use crossroads::projection::WebMercator;
use crossroads::{CoordinateMatching, CoordinateProjector, LatLon, Point, RoadCatalog};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct LoadError(PathBuf, #[source] Box<dyn Error>);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Unknown,
    Json,
    JsonGz,
    JsonBz2,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Unknown => FileFormat::Unknown,
            Format::Json => FileFormat::Json,
            Format::JsonGz => FileFormat::JsonGz,
            Format::JsonBz2 => FileFormat::JsonBz2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// The path to the GeoJSON file with road centerlines
    geojson_file: PathBuf,

    /// Latitude of the query point
    lat: f64,

    /// Longitude of the query point
    lon: f64,

    /// Format of the GeoJSON file
    #[arg(long, value_enum, default_value_t = Format::Unknown)]
    format: Format,

    /// Merge road endpoints closer than this many meters into a single crossroad
    #[arg(long)]
    tolerance: Option<f64>,

    /// Ignore crossroads further than this many meters from the query point
    #[arg(long, default_value_t = crossroads::DEFAULT_SEARCH_RADIUS)]
    max_distance: f64,

    /// Label of the road network, used in log messages (defaults to the file stem)
    #[arg(long)]
    name: Option<String>,

    /// Abort on features which can't be converted into roads, instead of skipping them
    #[arg(long)]
    fail_on_malformed: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::init();
    let cli = Cli::parse();

    let options = Options {
        name: cli.name.clone().or_else(|| {
            cli.geojson_file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
        }),
        matching: cli
            .tolerance
            .map_or(CoordinateMatching::Exact, CoordinateMatching::Tolerance),
        on_malformed: if cli.fail_on_malformed {
            MalformedFeaturePolicy::Fail
        } else {
            MalformedFeaturePolicy::Skip
        },
    };

    let catalog = load_catalog(&cli.geojson_file, cli.format.into(), &options)?;
    let query = catalog.query();
    let here = WebMercator.project(LatLon::new(cli.lat, cli.lon));

    let crossroad = query.nearest_crossroad(here, cli.max_distance);
    let road = query.nearest_road(here);
    if crossroad.is_none() && road.is_none() {
        log::warn!("no crossroad or road near {}, {}", cli.lat, cli.lon);
    }

    let mut features = Vec::default();
    if let Some(cr) = crossroad {
        features.push(format!(
            "    {{\n      \"type\": \"Feature\",\n      \"properties\": {{\"kind\": \"crossroad\", \"node_id\": {}}},\n      \"geometry\": {{\"type\": \"Point\", \"coordinates\": {}}}\n    }}",
            cr.node_id,
            position(cr.coordinate),
        ));
    }
    if let Some(road) = road {
        let coordinates = road
            .path
            .iter()
            .map(|&p| position(p))
            .collect::<Vec<_>>()
            .join(", ");
        features.push(format!(
            "    {{\n      \"type\": \"Feature\",\n      \"properties\": {{\"kind\": \"road\", \"from\": {}, \"to\": {}, \"weight\": {}, \"length\": {}}},\n      \"geometry\": {{\"type\": \"LineString\", \"coordinates\": [{}]}}\n    }}",
            road.edge.from,
            road.edge.to,
            road.edge.weight,
            road.length(),
            coordinates,
        ));
    }

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("{}", features.join(",\n"));
    println!("  ]");
    println!("}}");

    Ok(())
}

/// Formats a projected point as an unprojected GeoJSON position.
fn position(p: Point) -> String {
    let c = WebMercator.unproject(p);
    format!("[{}, {}]", c.lon, c.lat)
}

fn load_catalog<P: AsRef<Path>>(
    path: P,
    format: FileFormat,
    options: &Options,
) -> Result<RoadCatalog, LoadError> {
    let path = path.as_ref();
    let features = geojson::read_from_file(path, format)
        .map_err(|e| LoadError(PathBuf::from(path), Box::new(e)))?;
    log::info!("loaded {} features from {}", features.len(), path.display());

    RoadCatalog::ingest(&features, &WebMercator, options)
        .map_err(|e| LoadError(PathBuf::from(path), Box::new(e)))
}
