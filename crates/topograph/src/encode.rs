//! GeoJSON → Topology.
//!
//! Every line and ring becomes one arc. Identical arcs (in either direction)
//! are stored once; no junction splitting or quantization is performed.

use ahash::AHashMap;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, feature::Id};
use serde_json::Value;

use crate::topology::{ArcRef, Position, Shape, TopoGeometry, Topology};

impl Topology {
    /// Build a topology holding `geojson` as a single object named `object_name`.
    ///
    /// Feature collections and single features become a `GeometryCollection`
    /// object with one member per feature.
    pub fn from_geojson(geojson: &GeoJson, object_name: &str) -> Topology {
        let mut builder = ArcBuilder::default();
        let object = match geojson {
            GeoJson::FeatureCollection(fc) => builder.collection(&fc.features),
            GeoJson::Feature(feature) => builder.collection(std::slice::from_ref(feature)),
            GeoJson::Geometry(geometry) => TopoGeometry::new(builder.shape(geometry)),
        };
        builder.finish(object_name, object)
    }

    /// Shorthand for [`Topology::from_geojson`] on a feature collection.
    pub fn from_feature_collection(fc: &FeatureCollection, object_name: &str) -> Topology {
        let mut builder = ArcBuilder::default();
        let object = builder.collection(&fc.features);
        builder.finish(object_name, object)
    }

    /// Bounding box `[min_x, min_y, max_x, max_y]` over all arcs and points.
    pub fn compute_bbox(&self) -> Option<Vec<f64>> {
        let mut bounds: Option<[f64; 4]> = None;
        let mut extend = |p: &Position| {
            let b = bounds.get_or_insert([p[0], p[1], p[0], p[1]]);
            b[0] = b[0].min(p[0]);
            b[1] = b[1].min(p[1]);
            b[2] = b[2].max(p[0]);
            b[3] = b[3].max(p[1]);
        };

        for arc in self.absolute_arcs() {
            arc.iter().for_each(&mut extend);
        }
        fn visit_points(shape: &Shape, f: &mut dyn FnMut(&Position)) {
            match shape {
                Shape::Point(p) => f(p),
                Shape::MultiPoint(ps) => ps.iter().for_each(|p| f(p)),
                Shape::GeometryCollection(members) => members.iter().for_each(|m| visit_points(&m.shape, &mut *f)),
                _ => {}
            }
        }
        let transform = self.transform;
        let mut extend_point = |p: &Position| match transform {
            Some(t) => {
                let (x, y) = t.apply(p[0], p[1]);
                extend(&vec![x, y]);
            }
            None => extend(p),
        };
        for object in self.objects.values() {
            visit_points(&object.shape, &mut extend_point);
        }

        bounds.map(|b| b.to_vec())
    }
}

/// Accumulates arcs, deduplicating identical coordinate sequences.
#[derive(Default)]
struct ArcBuilder {
    arcs: Vec<Vec<Position>>,
    index: AHashMap<Vec<u64>, usize>,
}

impl ArcBuilder {
    /// Exact-bit hash key for a sequence of positions.
    fn key<'a>(line: impl Iterator<Item = &'a Position>) -> Vec<u64> {
        line.flat_map(|p| p.iter().map(|c| c.to_bits())).collect()
    }

    fn insert(&mut self, line: &[Position]) -> ArcRef {
        let forward = Self::key(line.iter());
        if let Some(&i) = self.index.get(&forward) {
            return i as ArcRef;
        }
        if let Some(&i) = self.index.get(&Self::key(line.iter().rev())) {
            return !(i as ArcRef);
        }
        let i = self.arcs.len();
        self.index.insert(forward, i);
        self.arcs.push(line.to_vec());
        i as ArcRef
    }

    fn ring(&mut self, ring: &[Position]) -> Vec<ArcRef> {
        vec![self.insert(ring)]
    }

    fn rings(&mut self, rings: &[Vec<Position>]) -> Vec<Vec<ArcRef>> {
        rings.iter().map(|ring| self.ring(ring)).collect()
    }

    fn shape(&mut self, geometry: &Geometry) -> Shape {
        match &geometry.value {
            geojson::Value::Point(p) => Shape::Point(p.clone()),
            geojson::Value::MultiPoint(ps) => Shape::MultiPoint(ps.clone()),
            geojson::Value::LineString(line) => Shape::LineString(vec![self.insert(line)]),
            geojson::Value::MultiLineString(lines) => {
                Shape::MultiLineString(lines.iter().map(|line| vec![self.insert(line)]).collect())
            }
            geojson::Value::Polygon(rings) => Shape::Polygon(self.rings(rings)),
            geojson::Value::MultiPolygon(polygons) => {
                Shape::MultiPolygon(polygons.iter().map(|rings| self.rings(rings)).collect())
            }
            geojson::Value::GeometryCollection(members) => Shape::GeometryCollection(
                members.iter().map(|member| TopoGeometry::new(self.shape(member))).collect(),
            ),
        }
    }

    fn feature(&mut self, feature: &Feature) -> TopoGeometry {
        let shape = feature.geometry.as_ref().map_or(Shape::Null, |g| self.shape(g));
        let mut geometry = TopoGeometry::new(shape);
        geometry.id = feature.id.as_ref().map(|id| match id {
            Id::String(s) => Value::String(s.clone()),
            Id::Number(n) => Value::Number(n.clone()),
        });
        geometry.properties = feature.properties.clone();
        geometry.bbox = feature.bbox.clone();
        if let Some(members) = &feature.foreign_members {
            geometry.foreign_members = members.clone();
        }
        geometry
    }

    fn collection(&mut self, features: &[Feature]) -> TopoGeometry {
        TopoGeometry::new(Shape::GeometryCollection(features.iter().map(|f| self.feature(f)).collect()))
    }

    fn finish(self, object_name: &str, object: TopoGeometry) -> Topology {
        let mut topology = Topology::new();
        topology.arcs = self.arcs;
        topology.objects.insert(object_name.to_string(), object);
        topology.bbox = topology.compute_bbox();
        topology
    }
}
