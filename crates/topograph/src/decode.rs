//! Topology → GeoJSON.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, feature::Id};
use serde_json::Value;

use crate::error::TopoError;
use crate::topology::{ArcRef, Position, Shape, TopoGeometry, Topology, Transform};

impl Topology {
    /// Arcs with delta encoding and the quantization transform removed.
    pub fn absolute_arcs(&self) -> Vec<Vec<Position>> {
        let Some(t) = self.transform else { return self.arcs.clone() };
        self.arcs.iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .map(|p| {
                        x += p[0];
                        y += p[1];
                        let (ax, ay) = t.apply(x, y);
                        let mut out = vec![ax, ay];
                        out.extend_from_slice(&p[2..]);
                        out
                    })
                    .collect()
            })
            .collect()
    }

    /// Decode the named object (or the first object) into a feature collection.
    ///
    /// A `GeometryCollection` object yields one feature per member geometry;
    /// any other object yields a single feature.
    pub fn to_feature_collection(&self, object: Option<&str>) -> Result<FeatureCollection, TopoError> {
        let geometry = match object {
            Some(name) => self.object(name)?,
            None => match self.objects.values().next() {
                Some(geometry) => geometry,
                None => return Ok(FeatureCollection { bbox: None, features: Vec::new(), foreign_members: None }),
            },
        };

        let decoder = Decoder { arcs: self.absolute_arcs(), transform: self.transform };
        let features = match &geometry.shape {
            Shape::GeometryCollection(members) => members.iter()
                .map(|member| decoder.feature(member))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![decoder.feature(geometry)?],
        };

        Ok(FeatureCollection { bbox: self.bbox.clone(), features, foreign_members: None })
    }

    /// Decode into a GeoJSON document (always a feature collection).
    pub fn to_geojson(&self, object: Option<&str>) -> Result<GeoJson, TopoError> {
        Ok(GeoJson::FeatureCollection(self.to_feature_collection(object)?))
    }
}

/// Resolves arc references against a decoded arc table.
struct Decoder {
    arcs: Vec<Vec<Position>>,
    transform: Option<Transform>,
}

impl Decoder {
    fn arc(&self, index: ArcRef) -> Result<Vec<Position>, TopoError> {
        let (i, reversed) = if index >= 0 { (index, false) } else { (!index, true) };
        let mut arc = usize::try_from(i).ok()
            .and_then(|i| self.arcs.get(i))
            .ok_or(TopoError::ArcOutOfRange(index))?
            .clone();
        if reversed { arc.reverse() }
        Ok(arc)
    }

    /// Concatenate arcs, dropping the shared first point of each following arc.
    fn line(&self, refs: &[ArcRef]) -> Result<Vec<Position>, TopoError> {
        let mut points: Vec<Position> = Vec::new();
        for (k, &index) in refs.iter().enumerate() {
            let arc = self.arc(index)?;
            let skip = if k > 0 && !arc.is_empty() { 1 } else { 0 };
            points.extend(arc.into_iter().skip(skip));
        }
        Ok(points)
    }

    fn ring(&self, refs: &[ArcRef]) -> Result<Vec<Position>, TopoError> {
        let mut ring = self.line(refs)?;
        if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
            if first != last {
                let first = first.clone();
                ring.push(first);
            }
        }
        Ok(ring)
    }

    fn point(&self, p: &Position) -> Position {
        match self.transform {
            Some(t) => {
                let (x, y) = t.apply(p[0], p[1]);
                let mut out = vec![x, y];
                out.extend_from_slice(&p[2..]);
                out
            }
            None => p.clone(),
        }
    }

    fn polygon(&self, rings: &[Vec<ArcRef>]) -> Result<Vec<Vec<Position>>, TopoError> {
        rings.iter().map(|ring| self.ring(ring)).collect()
    }

    fn geometry(&self, shape: &Shape) -> Result<Option<geojson::Value>, TopoError> {
        let value = match shape {
            Shape::Null => return Ok(None),
            Shape::Point(p) => geojson::Value::Point(self.point(p)),
            Shape::MultiPoint(ps) => geojson::Value::MultiPoint(ps.iter().map(|p| self.point(p)).collect()),
            Shape::LineString(refs) => geojson::Value::LineString(self.line(refs)?),
            Shape::MultiLineString(lines) => geojson::Value::MultiLineString(
                lines.iter().map(|refs| self.line(refs)).collect::<Result<_, _>>()?,
            ),
            Shape::Polygon(rings) => geojson::Value::Polygon(self.polygon(rings)?),
            Shape::MultiPolygon(polygons) => geojson::Value::MultiPolygon(
                polygons.iter().map(|rings| self.polygon(rings)).collect::<Result<_, _>>()?,
            ),
            Shape::GeometryCollection(members) => {
                let mut geometries = Vec::with_capacity(members.len());
                for member in members {
                    if let Some(value) = self.geometry(&member.shape)? {
                        geometries.push(Geometry::new(value));
                    }
                }
                geojson::Value::GeometryCollection(geometries)
            }
        };
        Ok(Some(value))
    }

    fn feature(&self, geometry: &TopoGeometry) -> Result<Feature, TopoError> {
        let id = match &geometry.id {
            Some(Value::String(s)) => Some(Id::String(s.clone())),
            Some(Value::Number(n)) => Some(Id::Number(n.clone())),
            _ => None,
        };
        Ok(Feature {
            bbox: geometry.bbox.clone(),
            geometry: self.geometry(&geometry.shape)?.map(Geometry::new),
            id,
            properties: geometry.properties.clone(),
            foreign_members: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_square_topology() -> Topology {
        let mut topology = Topology::new();
        topology.arcs = vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]], vec![vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]]];
        topology.objects.insert("square".into(), TopoGeometry::new(Shape::Polygon(vec![vec![0, 1]])));
        topology
    }

    #[test]
    fn stitches_arcs_into_closed_ring() {
        let fc = make_square_topology().to_feature_collection(None).unwrap();
        assert_eq!(fc.features.len(), 1);
        let Some(geometry) = &fc.features[0].geometry else { panic!("missing geometry") };
        let geojson::Value::Polygon(rings) = &geometry.value else { panic!("expected polygon") };
        assert_eq!(rings[0], vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn negative_reference_reverses_arc() {
        let decoder = Decoder { arcs: make_square_topology().arcs, transform: None };
        assert_eq!(decoder.arc(!0).unwrap(), vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn out_of_range_reference_is_an_error() {
        let decoder = Decoder { arcs: Vec::new(), transform: None };
        assert!(matches!(decoder.arc(3), Err(TopoError::ArcOutOfRange(3))));
        assert!(matches!(decoder.arc(-1), Err(TopoError::ArcOutOfRange(-1))));
    }

    #[test]
    fn missing_object_is_an_error() {
        let err = make_square_topology().to_feature_collection(Some("nope")).unwrap_err();
        assert!(matches!(err, TopoError::MissingObject(name) if name == "nope"));
    }
}
