use std::collections::BTreeMap;

use geojson::feature::Id;
use geojson::{Feature, Geometry, JsonObject, Position, Value};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("invalid TopoJSON")]
    Json(#[from] simd_json::Error),

    #[error("expected a Topology document, found `{0}`")]
    NotTopology(String),

    #[error("topology has no object named `{0}`")]
    MissingObject(String),

    #[error("topology has no objects")]
    NoObjects,

    #[error("arc index {0} out of range")]
    ArcOutOfRange(i64),
}

#[derive(Debug, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl Transform {
    #[inline]
    fn apply(&self, x: f64, y: f64) -> Position {
        vec![
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    Point {
        coordinates: Vec<f64>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    MultiPoint {
        coordinates: Vec<Vec<f64>>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    LineString {
        arcs: Vec<i64>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    MultiLineString {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    Polygon {
        arcs: Vec<Vec<i64>>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    MultiPolygon {
        arcs: Vec<Vec<Vec<i64>>>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
    GeometryCollection {
        geometries: Vec<TopoObject>,
        #[serde(default)]
        properties: Option<JsonObject>,
        #[serde(default)]
        id: Option<serde_json::Value>,
    },
}

/// A member whose `"type"` is null: a feature without geometry
#[derive(Debug, Deserialize)]
struct NullGeometry {
    #[serde(rename = "type")]
    _kind: (),
    #[serde(default)]
    properties: Option<JsonObject>,
    #[serde(default)]
    id: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TopoObject {
    Geometry(TopoGeometry),
    Null(NullGeometry),
}

impl TopoObject {
    fn geometry(&self) -> Option<&TopoGeometry> {
        match self {
            TopoObject::Geometry(g) => Some(g),
            TopoObject::Null(_) => None,
        }
    }

    fn meta(&self) -> (Option<&JsonObject>, Option<&serde_json::Value>) {
        match self {
            TopoObject::Null(NullGeometry { properties, id, .. }) => {
                (properties.as_ref(), id.as_ref())
            }
            TopoObject::Geometry(TopoGeometry::Point { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::MultiPoint { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::LineString { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::MultiLineString { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::Polygon { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::MultiPolygon { properties, id, .. })
            | TopoObject::Geometry(TopoGeometry::GeometryCollection { properties, id, .. }) => {
                (properties.as_ref(), id.as_ref())
            }
        }
    }
}

/// A parsed TopoJSON document
#[derive(Debug, Deserialize)]
pub struct Topology {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, TopoObject>,
}

impl Topology {
    /// Parse a topology in place (simd-json rewrites the buffer while parsing)
    pub fn from_slice(bytes: &mut [u8]) -> Result<Self, TopologyError> {
        let topology: Topology = simd_json::serde::from_slice(bytes)?;
        if topology.kind != "Topology" {
            return Err(TopologyError::NotTopology(topology.kind));
        }
        Ok(topology)
    }

    /// `countries` when present, otherwise the first object by name
    pub fn default_object(&self) -> Option<&str> {
        if self.objects.contains_key("countries") {
            return Some("countries");
        }
        self.objects.keys().next().map(String::as_str)
    }

    #[cfg(test)]
    fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    /// Convert the named object to features. A geometry collection yields
    /// one feature per member; any other object yields a single feature.
    /// Null-typed members become features without geometry.
    pub fn features(&self, name: &str) -> Result<Vec<Feature>, TopologyError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| TopologyError::MissingObject(name.to_string()))?;

        let decoder = ArcDecoder::new(self);
        match object {
            TopoObject::Geometry(TopoGeometry::GeometryCollection { geometries, .. }) => geometries
                .iter()
                .map(|g| decoder.feature(g))
                .collect(),
            single => Ok(vec![decoder.feature(single)?]),
        }
    }

    /// Features of [`Topology::default_object`]
    pub fn default_features(&self) -> Result<Vec<Feature>, TopologyError> {
        let name = self.default_object().ok_or(TopologyError::NoObjects)?;
        self.features(name)
    }
}

/// Arcs decoded to absolute positions, plus the point transform
struct ArcDecoder<'a> {
    arcs: Vec<Vec<Position>>,
    transform: Option<&'a Transform>,
}

impl<'a> ArcDecoder<'a> {
    fn new(topology: &'a Topology) -> Self {
        let transform = topology.transform.as_ref();
        let arcs = topology
            .arcs
            .iter()
            .map(|arc| match transform {
                Some(t) => {
                    // Quantized arcs are delta-encoded from the previous position
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            t.apply(x, y)
                        })
                        .collect()
                }
                None => arc.iter().filter(|p| p.len() >= 2).cloned().collect(),
            })
            .collect();
        Self { arcs, transform }
    }

    fn point(&self, p: &[f64]) -> Position {
        match (self.transform, p) {
            (Some(t), [x, y, ..]) => t.apply(*x, *y),
            _ => p.to_vec(),
        }
    }

    /// Concatenate arcs into one line, dropping each joint's duplicate point
    fn line(&self, refs: &[i64]) -> Result<Vec<Position>, TopologyError> {
        let mut points: Vec<Position> = Vec::new();
        for &i in refs {
            points.pop();
            let idx = if i < 0 { !i } else { i };
            let arc = usize::try_from(idx)
                .ok()
                .and_then(|idx| self.arcs.get(idx))
                .ok_or(TopologyError::ArcOutOfRange(i))?;
            let start = points.len();
            points.extend(arc.iter().cloned());
            if i < 0 {
                points[start..].reverse();
            }
        }
        if points.len() == 1 {
            points.push(points[0].clone());
        }
        Ok(points)
    }

    fn ring(&self, refs: &[i64]) -> Result<Vec<Position>, TopologyError> {
        let mut ring = self.line(refs)?;
        if let Some(first) = ring.first().cloned() {
            while ring.len() < 4 {
                ring.push(first.clone());
            }
        }
        Ok(ring)
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Result<Vec<Vec<Position>>, TopologyError> {
        rings.iter().map(|r| self.ring(r)).collect()
    }

    fn geometry(&self, geometry: &TopoGeometry) -> Result<Geometry, TopologyError> {
        let value = match geometry {
            TopoGeometry::Point { coordinates, .. } => Value::Point(self.point(coordinates)),
            TopoGeometry::MultiPoint { coordinates, .. } => {
                Value::MultiPoint(coordinates.iter().map(|p| self.point(p)).collect())
            }
            TopoGeometry::LineString { arcs, .. } => Value::LineString(self.line(arcs)?),
            TopoGeometry::MultiLineString { arcs, .. } => Value::MultiLineString(
                arcs.iter().map(|l| self.line(l)).collect::<Result<_, _>>()?,
            ),
            TopoGeometry::Polygon { arcs, .. } => Value::Polygon(self.polygon(arcs)?),
            TopoGeometry::MultiPolygon { arcs, .. } => Value::MultiPolygon(
                arcs.iter().map(|p| self.polygon(p)).collect::<Result<_, _>>()?,
            ),
            TopoGeometry::GeometryCollection { geometries, .. } => Value::GeometryCollection(
                geometries
                    .iter()
                    .filter_map(TopoObject::geometry)
                    .map(|g| self.geometry(g))
                    .collect::<Result<_, _>>()?,
            ),
        };
        Ok(Geometry::new(value))
    }

    fn feature(&self, object: &TopoObject) -> Result<Feature, TopologyError> {
        let (properties, id) = object.meta();
        Ok(Feature {
            bbox: None,
            geometry: object.geometry().map(|g| self.geometry(g)).transpose()?,
            id: id.and_then(feature_id),
            properties: properties.cloned(),
            foreign_members: None,
        })
    }
}

fn feature_id(value: &serde_json::Value) -> Option<Id> {
    match value {
        serde_json::Value::String(s) => Some(Id::String(s.clone())),
        serde_json::Value::Number(n) => Some(Id::Number(n.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two squares sharing the edge at x = 1, quantized with a 0.5 scale
    const QUANTIZED: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.5, 0.5], "translate": [10, 20]},
        "objects": {
            "countries": {
                "type": "GeometryCollection",
                "geometries": [
                    {"type": "Polygon", "arcs": [[0, 1]], "id": "004", "properties": {"name": "West"}},
                    {"type": "Polygon", "arcs": [[2, -1]], "id": 8}
                ]
            },
            "land": {"type": "MultiPolygon", "arcs": [[[1, 2]]]}
        },
        "arcs": [
            [[2, 0], [0, 2]],
            [[2, 2], [-2, 0], [0, -2], [2, 0]],
            [[2, 0], [2, 0], [0, 2], [-2, 0]]
        ]
    }"#;

    fn parse(text: &str) -> Topology {
        let mut bytes = text.as_bytes().to_vec();
        Topology::from_slice(&mut bytes).unwrap()
    }

    fn exterior(feature: &Feature) -> Vec<Position> {
        match &feature.geometry.as_ref().unwrap().value {
            Value::Polygon(rings) => rings[0].clone(),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_default_object_prefers_countries() {
        let topo = parse(QUANTIZED);
        assert_eq!(topo.default_object(), Some("countries"));
        assert_eq!(topo.object_names().collect::<Vec<_>>(), vec!["countries", "land"]);
    }

    #[test]
    fn test_delta_decoding_and_transform() {
        let topo = parse(QUANTIZED);
        let features = topo.default_features().unwrap();
        assert_eq!(features.len(), 2);

        // Arc 0 decodes to (11,20) -> (11,21); arc 1 closes the west square
        assert_eq!(
            exterior(&features[0]),
            vec![
                vec![11.0, 20.0],
                vec![11.0, 21.0],
                vec![10.0, 21.0],
                vec![10.0, 20.0],
                vec![11.0, 20.0],
            ]
        );
    }

    #[test]
    fn test_reversed_arc() {
        let topo = parse(QUANTIZED);
        let features = topo.default_features().unwrap();
        let ring = exterior(&features[1]);
        // Ends by walking the shared edge backwards, closing the ring
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[ring.len() - 2], vec![11.0, 21.0]);
    }

    #[test]
    fn test_ids_and_properties_carried_over() {
        let topo = parse(QUANTIZED);
        let features = topo.default_features().unwrap();
        assert_eq!(features[0].id, Some(Id::String("004".to_string())));
        assert_eq!(
            features[0].property("name").and_then(|v| v.as_str()),
            Some("West")
        );
        assert!(matches!(features[1].id, Some(Id::Number(_))));
        assert!(features[1].properties.is_none());
    }

    #[test]
    fn test_single_geometry_object() {
        let topo = parse(QUANTIZED);
        let land = topo.features("land").unwrap();
        assert_eq!(land.len(), 1);
        assert!(matches!(
            land[0].geometry.as_ref().unwrap().value,
            Value::MultiPolygon(_)
        ));
    }

    #[test]
    fn test_unquantized_arcs_are_absolute() {
        let topo = parse(
            r#"{"type":"Topology","objects":{"a":{"type":"LineString","arcs":[0]}},
                "arcs":[[[1.5,2.5],[3.5,4.5]]]}"#,
        );
        let features = topo.default_features().unwrap();
        match &features[0].geometry.as_ref().unwrap().value {
            Value::LineString(line) => {
                assert_eq!(line, &vec![vec![1.5, 2.5], vec![3.5, 4.5]]);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_null_type_member_has_no_geometry() {
        let topo = parse(
            r#"{"type":"Topology","objects":{"countries":{"type":"GeometryCollection",
                "geometries":[
                    {"type":"Polygon","arcs":[[0]]},
                    {"type":null,"id":"2","properties":{"name":"Nowhere"}},
                    {"type":"GeometryCollection","geometries":[{"type":null},{"type":"LineString","arcs":[0]}]}
                ]}},
                "arcs":[[[0,0],[1,0],[1,1],[0,0]]]}"#,
        );
        let features = topo.default_features().unwrap();
        assert_eq!(features.len(), 3);
        assert!(features[0].geometry.is_some());

        assert!(features[1].geometry.is_none());
        assert_eq!(features[1].id, Some(Id::String("2".to_string())));
        assert_eq!(
            features[1].property("name").and_then(|v| v.as_str()),
            Some("Nowhere")
        );

        // Null members of a nested collection are dropped
        match &features[2].geometry.as_ref().unwrap().value {
            Value::GeometryCollection(members) => assert_eq!(members.len(), 1),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn test_null_type_object() {
        let topo = parse(r#"{"type":"Topology","objects":{"empty":{"type":null}},"arcs":[]}"#);
        let features = topo.default_features().unwrap();
        assert_eq!(features.len(), 1);
        assert!(features[0].geometry.is_none());
    }

    #[test]
    fn test_errors() {
        let mut not_topo = br#"{"type":"FeatureCollection","features":[]}"#.to_vec();
        assert!(matches!(
            Topology::from_slice(&mut not_topo),
            Err(TopologyError::NotTopology(kind)) if kind == "FeatureCollection"
        ));

        let topo = parse(r#"{"type":"Topology","objects":{"a":{"type":"LineString","arcs":[5]}},"arcs":[]}"#);
        assert!(matches!(topo.features("a"), Err(TopologyError::ArcOutOfRange(5))));
        assert!(matches!(topo.features("b"), Err(TopologyError::MissingObject(_))));

        let mut garbage = b"{not json".to_vec();
        let err = Topology::from_slice(&mut garbage).unwrap_err();
        assert_eq!(err.to_string(), "invalid TopoJSON");
        assert!(std::error::Error::source(&err).is_some());

        let empty = parse(r#"{"type":"Topology","objects":{},"arcs":[]}"#);
        assert!(matches!(empty.default_features(), Err(TopologyError::NoObjects)));
    }
}
