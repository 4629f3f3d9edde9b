mod record;
mod topology;

pub use record::{parse_number, read_records, Diet, DinoType, FossilRecord, RecordError};
pub use topology::{Topology, TopologyError};

use crate::map::LineString;
use anyhow::{Context, Result};
use geojson::{Feature, GeoJson, Geometry, Position, Value};
use serde::Deserialize;
use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

/// Public world-atlas build of Natural Earth country boundaries at 1:110m
pub const DEFAULT_WORLD_URL: &str = "https://cdn.jsdelivr.net/npm/world-atlas@2/countries-110m.json";

/// Where the world geometry comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldSource {
    Url(String),
    File(PathBuf),
}

impl WorldSource {
    /// `http://` and `https://` locations are fetched, anything else is a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            WorldSource::Url(location.to_string())
        } else {
            WorldSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for WorldSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldSource::Url(url) => f.write_str(url),
            WorldSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Load the fossil table from a CSV file
pub fn load_records(path: &Path) -> Result<Vec<FossilRecord>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let records = read_records(file).with_context(|| format!("reading {}", path.display()))?;
    info!(path = %path.display(), count = records.len(), "loaded fossil records");
    Ok(records)
}

/// Fetch or read the world geometry and decode it to features
pub fn load_world(source: &WorldSource) -> Result<Vec<Feature>> {
    let bytes = match source {
        WorldSource::Url(url) => fetch(url)?,
        WorldSource::File(path) => {
            fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
    };
    let features = decode_world(bytes).with_context(|| format!("decoding world geometry from {source}"))?;
    info!(source = %source, features = features.len(), "loaded world geometry");
    Ok(features)
}

fn fetch(url: &str) -> Result<Vec<u8>> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("fetching {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?;
    let body = response.bytes().with_context(|| format!("reading body of {url}"))?;
    Ok(body.to_vec())
}

#[derive(Deserialize)]
struct DocumentKind {
    #[serde(rename = "type")]
    kind: String,
}

/// Decode either TopoJSON or GeoJSON, told apart by the top-level `type`
pub fn decode_world(mut bytes: Vec<u8>) -> Result<Vec<Feature>> {
    // simd-json parses in place, so sniff on a scratch copy
    let mut scratch = bytes.clone();
    let sniffed: DocumentKind = simd_json::serde::from_slice(&mut scratch)?;

    if sniffed.kind == "Topology" {
        let topology = Topology::from_slice(&mut bytes)?;
        return Ok(topology.default_features()?);
    }

    let text = String::from_utf8(bytes)?;
    let features = match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(f) => vec![f],
        GeoJson::Geometry(g) => vec![Feature {
            bbox: None,
            geometry: Some(g),
            id: None,
            properties: None,
            foreign_members: None,
        }],
    };
    Ok(features)
}

/// Flatten feature geometry into boundary lines (every polygon ring and line)
pub fn feature_lines(features: &[Feature]) -> Vec<LineString> {
    let mut lines = Vec::new();
    for feature in features {
        if let Some(ref geometry) = feature.geometry {
            process_geometry_lines(geometry, &mut |line| lines.push(line));
        }
    }
    lines
}

fn to_line(coords: &[Position]) -> LineString {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| (c[0], c[1]))
        .collect()
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        Value::Polygon(rings) => {
            for ring in rings {
                add_line(to_line(ring));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                for ring in rings {
                    add_line(to_line(ring));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        Value::Point(_) | Value::MultiPoint(_) => {}
    }
}
