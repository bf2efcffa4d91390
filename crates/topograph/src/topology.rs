use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::TopoError;

/// A coordinate pair, optionally followed by extra dimensions.
pub type Position = Vec<f64>;

/// Index into `Topology::arcs`; negative values `!i` reference arc `i` reversed.
pub type ArcRef = i64;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Quantization transform applied to arc and point coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Transform {
    /// Map a quantized position back to coordinates.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale[0] + self.translate[0], y * self.scale[1] + self.translate[1])
    }
}

/// The geometric part of a topology object.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Null,
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<ArcRef>),
    MultiLineString(Vec<Vec<ArcRef>>),
    Polygon(Vec<Vec<ArcRef>>),
    MultiPolygon(Vec<Vec<Vec<ArcRef>>>),
    GeometryCollection(Vec<TopoGeometry>),
}

impl Shape {
    pub fn type_name(&self) -> Option<&'static str> {
        match self {
            Shape::Null => None,
            Shape::Point(_) => Some("Point"),
            Shape::MultiPoint(_) => Some("MultiPoint"),
            Shape::LineString(_) => Some("LineString"),
            Shape::MultiLineString(_) => Some("MultiLineString"),
            Shape::Polygon(_) => Some("Polygon"),
            Shape::MultiPolygon(_) => Some("MultiPolygon"),
            Shape::GeometryCollection(_) => Some("GeometryCollection"),
        }
    }
}

/// A member of `Topology::objects`, or a geometry nested in a collection.
#[derive(Clone, Debug, PartialEq)]
pub struct TopoGeometry {
    pub shape: Shape,
    pub id: Option<Value>,
    pub properties: Option<Map<String, Value>>,
    pub bbox: Option<Vec<f64>>,
    /// Members outside the TopoJSON vocabulary, such as `hc-transform`.
    pub foreign_members: Map<String, Value>,
}

impl TopoGeometry {
    /// Geometry with no id, properties, or foreign members.
    pub fn new(shape: Shape) -> Self {
        Self { shape, id: None, properties: None, bbox: None, foreign_members: Map::new() }
    }
}

/// A TopoJSON topology.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Topology {
    pub bbox: Option<Vec<f64>>,
    pub transform: Option<Transform>,
    pub objects: IndexMap<String, TopoGeometry>,
    pub arcs: Vec<Vec<Position>>,
    pub foreign_members: Map<String, Value>,
}

impl Topology {
    /// Empty topology.
    pub fn new() -> Self { Self::default() }

    /// True if arcs are delta-encoded integers under a transform.
    #[inline] pub fn is_quantized(&self) -> bool { self.transform.is_some() }

    /// Names of the objects in declaration order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.objects.keys().map(String::as_str)
    }

    /// Look up an object by name.
    pub fn object(&self, name: &str) -> Result<&TopoGeometry, TopoError> {
        self.objects.get(name).ok_or_else(|| TopoError::MissingObject(name.to_string()))
    }

    /// Parse a topology from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self, TopoError> {
        let obj = value.as_object()
            .ok_or_else(|| TopoError::InvalidData("expected a JSON object".into()))?;
        if obj.get("type").and_then(Value::as_str) != Some("Topology") {
            return Err(TopoError::NotATopology);
        }

        let mut topology = Topology::new();
        for (key, member) in obj {
            match key.as_str() {
                "type" => {}
                "bbox" => topology.bbox = Some(numbers(member, "bbox")?),
                "transform" => topology.transform = Some(parse_transform(member)?),
                "objects" => {
                    let objects = member.as_object()
                        .ok_or_else(|| TopoError::InvalidData("'objects' must be an object".into()))?;
                    for (name, geometry) in objects {
                        topology.objects.insert(name.clone(), parse_geometry(geometry)?);
                    }
                }
                "arcs" => {
                    let arcs = member.as_array()
                        .ok_or_else(|| TopoError::InvalidData("'arcs' must be an array".into()))?;
                    topology.arcs = arcs.iter().map(positions).collect::<Result<_, _>>()?;
                }
                _ => { topology.foreign_members.insert(key.clone(), member.clone()); }
            }
        }

        Ok(topology)
    }

    /// Serialize the topology to a JSON value.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), Value::from("Topology"));
        if let Some(bbox) = &self.bbox {
            obj.insert("bbox".into(), bbox.iter().copied().map(number).collect());
        }
        if let Some(t) = &self.transform {
            let mut transform = Map::new();
            transform.insert("scale".into(), t.scale.iter().copied().map(number).collect());
            transform.insert("translate".into(), t.translate.iter().copied().map(number).collect());
            obj.insert("transform".into(), Value::Object(transform));
        }
        let objects = self.objects.iter()
            .map(|(name, geometry)| (name.clone(), geometry_to_value(geometry)))
            .collect::<Map<_, _>>();
        obj.insert("objects".into(), Value::Object(objects));
        obj.insert("arcs".into(), self.arcs.iter()
            .map(|arc| arc.iter().map(position_to_value).collect::<Value>())
            .collect());
        for (key, member) in &self.foreign_members {
            obj.insert(key.clone(), member.clone());
        }
        Value::Object(obj)
    }
}

impl FromStr for Topology {
    type Err = TopoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        Topology::from_value(&value)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

// ---------------------------------------------------------------------------
// JSON helpers
// ---------------------------------------------------------------------------

/// Integral values are written without a fraction so quantized arcs stay compact.
pub(crate) fn number(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < 9.0e15 {
        Value::from(x as i64)
    } else {
        Value::from(x)
    }
}

fn position_to_value(p: &Position) -> Value {
    p.iter().copied().map(number).collect()
}

fn numbers(value: &Value, what: &str) -> Result<Vec<f64>, TopoError> {
    value.as_array()
        .ok_or_else(|| TopoError::InvalidData(format!("'{what}' must be an array of numbers")))?
        .iter()
        .map(|n| n.as_f64().ok_or_else(|| TopoError::InvalidData(format!("'{what}' contains a non-number: {n}"))))
        .collect()
}

fn position(value: &Value) -> Result<Position, TopoError> {
    let p = numbers(value, "position")?;
    if p.len() < 2 {
        return Err(TopoError::InvalidData(format!("position needs at least two coordinates: {value}")));
    }
    Ok(p)
}

fn positions(value: &Value) -> Result<Vec<Position>, TopoError> {
    value.as_array()
        .ok_or_else(|| TopoError::InvalidData(format!("expected an array of positions: {value}")))?
        .iter()
        .map(position)
        .collect()
}

fn pair(value: Option<&Value>, what: &str) -> Result<[f64; 2], TopoError> {
    let v = numbers(value.unwrap_or(&Value::Null), what)?;
    match v.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => Err(TopoError::InvalidData(format!("'{what}' must have exactly two members"))),
    }
}

fn parse_transform(value: &Value) -> Result<Transform, TopoError> {
    Ok(Transform {
        scale: pair(value.get("scale"), "transform.scale")?,
        translate: pair(value.get("translate"), "transform.translate")?,
    })
}

fn arc_refs(value: &Value) -> Result<Vec<ArcRef>, TopoError> {
    value.as_array()
        .ok_or_else(|| TopoError::InvalidData(format!("expected an array of arc indexes: {value}")))?
        .iter()
        .map(|i| i.as_i64().ok_or_else(|| TopoError::InvalidData(format!("arc index must be an integer: {i}"))))
        .collect()
}

fn nested<T>(value: &Value, inner: fn(&Value) -> Result<T, TopoError>) -> Result<Vec<T>, TopoError> {
    value.as_array()
        .ok_or_else(|| TopoError::InvalidData(format!("expected an array: {value}")))?
        .iter()
        .map(inner)
        .collect()
}

fn parse_geometry(value: &Value) -> Result<TopoGeometry, TopoError> {
    let obj = value.as_object()
        .ok_or_else(|| TopoError::InvalidData(format!("geometry must be an object: {value}")))?;

    let missing = |key: &str| TopoError::InvalidData(format!("geometry is missing '{key}'"));
    let arcs = || obj.get("arcs").ok_or_else(|| missing("arcs"));
    let coordinates = || obj.get("coordinates").ok_or_else(|| missing("coordinates"));

    let shape = match obj.get("type") {
        None | Some(Value::Null) => Shape::Null,
        Some(Value::String(kind)) => match kind.as_str() {
            "Point" => Shape::Point(position(coordinates()?)?),
            "MultiPoint" => Shape::MultiPoint(positions(coordinates()?)?),
            "LineString" => Shape::LineString(arc_refs(arcs()?)?),
            "MultiLineString" => Shape::MultiLineString(nested(arcs()?, arc_refs)?),
            "Polygon" => Shape::Polygon(nested(arcs()?, arc_refs)?),
            "MultiPolygon" => Shape::MultiPolygon(nested(arcs()?, |rings| nested(rings, arc_refs))?),
            "GeometryCollection" => {
                let geometries = obj.get("geometries").ok_or_else(|| missing("geometries"))?;
                Shape::GeometryCollection(nested(geometries, parse_geometry)?)
            }
            other => return Err(TopoError::InvalidData(format!("unknown geometry type '{other}'"))),
        },
        Some(other) => return Err(TopoError::InvalidData(format!("geometry type must be a string: {other}"))),
    };

    let mut geometry = TopoGeometry::new(shape);
    for (key, member) in obj {
        match key.as_str() {
            "type" | "arcs" | "coordinates" | "geometries" => {}
            "id" => geometry.id = Some(member.clone()),
            "properties" => geometry.properties = member.as_object().cloned(),
            "bbox" => geometry.bbox = Some(numbers(member, "bbox")?),
            _ => { geometry.foreign_members.insert(key.clone(), member.clone()); }
        }
    }
    Ok(geometry)
}

fn geometry_to_value(geometry: &TopoGeometry) -> Value {
    let mut obj = Map::new();
    obj.insert("type".into(), geometry.shape.type_name().map_or(Value::Null, Value::from));

    let refs = |r: &Vec<ArcRef>| r.iter().copied().map(Value::from).collect::<Value>();
    match &geometry.shape {
        Shape::Null => {}
        Shape::Point(p) => { obj.insert("coordinates".into(), position_to_value(p)); }
        Shape::MultiPoint(ps) => {
            obj.insert("coordinates".into(), ps.iter().map(position_to_value).collect());
        }
        Shape::LineString(arcs) => { obj.insert("arcs".into(), refs(arcs)); }
        Shape::MultiLineString(lines) | Shape::Polygon(lines) => {
            obj.insert("arcs".into(), lines.iter().map(refs).collect());
        }
        Shape::MultiPolygon(polygons) => {
            obj.insert("arcs".into(), polygons.iter()
                .map(|rings| rings.iter().map(refs).collect::<Value>())
                .collect());
        }
        Shape::GeometryCollection(geometries) => {
            obj.insert("geometries".into(), geometries.iter().map(geometry_to_value).collect());
        }
    }

    if let Some(id) = &geometry.id {
        obj.insert("id".into(), id.clone());
    }
    if let Some(properties) = &geometry.properties {
        obj.insert("properties".into(), Value::Object(properties.clone()));
    }
    if let Some(bbox) = &geometry.bbox {
        obj.insert("bbox".into(), bbox.iter().copied().map(number).collect());
    }
    for (key, member) in &geometry.foreign_members {
        obj.insert(key.clone(), member.clone());
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_topology() {
        let err = Topology::from_value(&json!({"type": "FeatureCollection", "features": []})).unwrap_err();
        assert!(matches!(err, TopoError::NotATopology));
    }

    #[test]
    fn keeps_foreign_members() {
        let value = json!({
            "type": "Topology",
            "title": "World",
            "objects": {
                "default": {
                    "type": "GeometryCollection",
                    "hc-transform": {"default": {"scale": 1.0}},
                    "geometries": [{"type": null, "properties": {"hc-key": "aq"}}]
                }
            },
            "arcs": []
        });
        let topology = Topology::from_value(&value).unwrap();
        assert_eq!(topology.foreign_members["title"], json!("World"));

        let default = topology.object("default").unwrap();
        assert!(default.foreign_members.contains_key("hc-transform"));
        let Shape::GeometryCollection(geometries) = &default.shape else { panic!("expected a collection") };
        assert_eq!(geometries[0].shape, Shape::Null);

        assert_eq!(topology.to_value(), value);
    }

    #[test]
    fn integral_numbers_are_written_without_fraction() {
        assert_eq!(number(12.0).to_string(), "12");
        assert_eq!(number(-0.5).to_string(), "-0.5");
    }

    #[test]
    fn bad_arc_index_type_is_invalid_data() {
        let value = json!({
            "type": "Topology",
            "objects": {"a": {"type": "LineString", "arcs": [0.5]}},
            "arcs": [[[0, 0], [1, 1]]]
        });
        assert!(matches!(Topology::from_value(&value), Err(TopoError::InvalidData(_))));
    }
}
