//! ESRI shapefile reading into GeoJSON features.

use std::path::Path;

use anyhow::{Context, Result, bail};
use geojson::{Feature, FeatureCollection, JsonObject};
use serde_json::Value;
use shapefile::{Shape, dbase::FieldValue};

use crate::common::{extract_zip, find_with_extension};

/// Read a `.shp` file (with its `.dbf` sidecar), or a `.zip` holding one shapefile.
pub(crate) fn read_shapefile(path: &Path) -> Result<FeatureCollection> {
    let is_zip = path.extension().is_some_and(|e| e.eq_ignore_ascii_case("zip"));
    if !is_zip {
        return read_shp(path);
    }

    let dir = tempfile::tempdir().context("[io::shp] create extraction dir")?;
    extract_zip(path, dir.path())?;
    let shps = find_with_extension(dir.path(), "shp")?;
    match shps.as_slice() {
        [shp] => read_shp(shp),
        [] => bail!("[io::shp] {} does not contain a .shp file", path.display()),
        _ => bail!("[io::shp] {} contains {} shapefiles; expected one", path.display(), shps.len()),
    }
}

fn read_shp(path: &Path) -> Result<FeatureCollection> {
    log::debug!("[io::shp] read {}", path.display());
    let mut reader = shapefile::Reader::from_path(path)
        .with_context(|| format!("[io::shp] Failed to open shapefile: {}", path.display()))?;

    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result
            .with_context(|| format!("[io::shp] Failed to read record from {}", path.display()))?;

        let mut fields: Vec<(String, FieldValue)> = record.into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        let properties: JsonObject = fields.into_iter()
            .map(|(name, value)| (name, field_to_json(value)))
            .collect();

        features.push(Feature {
            bbox: None,
            geometry: shape_to_geo(&shape).map(|g| geojson::Geometry::new(geojson::Value::from(&g))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        });
    }
    Ok(FeatureCollection { bbox: None, features, foreign_members: None })
}

fn field_to_json(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(s) => s.map_or(Value::Null, |s| Value::String(s.trim().to_string())),
        FieldValue::Memo(s) => Value::String(s),
        FieldValue::Numeric(n) => n.map_or(Value::Null, crate::js::number_to_json),
        FieldValue::Float(n) => n.map_or(Value::Null, |n| crate::js::number_to_json(n as f64)),
        FieldValue::Double(n) | FieldValue::Currency(n) => crate::js::number_to_json(n),
        FieldValue::Integer(n) => Value::from(n),
        FieldValue::Logical(b) => b.map_or(Value::Null, Value::Bool),
        FieldValue::Date(d) => d.map_or(Value::Null, |d| {
            Value::String(format!("{:04}-{:02}-{:02}", d.year(), d.month(), d.day()))
        }),
        other => Value::String(format!("{other:?}")),
    }
}

fn shape_to_geo(shape: &Shape) -> Option<geo::Geometry<f64>> {
    fn xy(x: f64, y: f64) -> geo::Coord<f64> { geo::Coord { x, y } }

    match shape {
        Shape::NullShape => None,
        Shape::Point(p) => Some(geo::Point(xy(p.x, p.y)).into()),
        Shape::PointM(p) => Some(geo::Point(xy(p.x, p.y)).into()),
        Shape::PointZ(p) => Some(geo::Point(xy(p.x, p.y)).into()),
        Shape::Multipoint(mp) => Some(geo::MultiPoint(mp.points().iter().map(|p| geo::Point(xy(p.x, p.y))).collect()).into()),
        Shape::MultipointM(mp) => Some(geo::MultiPoint(mp.points().iter().map(|p| geo::Point(xy(p.x, p.y))).collect()).into()),
        Shape::MultipointZ(mp) => Some(geo::MultiPoint(mp.points().iter().map(|p| geo::Point(xy(p.x, p.y))).collect()).into()),
        Shape::Polyline(l) => Some(lines(l.parts().iter().map(|part| part.iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::PolylineM(l) => Some(lines(l.parts().iter().map(|part| part.iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::PolylineZ(l) => Some(lines(l.parts().iter().map(|part| part.iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::Polygon(p) => Some(polygons(p.rings().iter().map(|r| r.points().iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::PolygonM(p) => Some(polygons(p.rings().iter().map(|r| r.points().iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::PolygonZ(p) => Some(polygons(p.rings().iter().map(|r| r.points().iter().map(|p| xy(p.x, p.y)).collect()))),
        Shape::Multipatch(_) => None,
    }
}

fn lines(parts: impl Iterator<Item = Vec<geo::Coord<f64>>>) -> geo::Geometry<f64> {
    let mut parts: Vec<geo::LineString<f64>> = parts.map(geo::LineString).collect();
    if parts.len() == 1 {
        parts.remove(0).into()
    } else {
        geo::MultiLineString(parts).into()
    }
}

/// Group rings into polygons: each clockwise (outer) ring owns the holes that follow it.
fn polygons(rings: impl Iterator<Item = Vec<geo::Coord<f64>>>) -> geo::Geometry<f64> {
    fn ensure_closed(coords: &mut Vec<geo::Coord<f64>>) {
        if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied())
            && first != last
        {
            coords.push(first);
        }
    }

    /// Signed area; negative for clockwise rings.
    fn signed_area(pts: &[geo::Coord<f64>]) -> f64 {
        pts.windows(2).map(|w| w[0].x * w[1].y - w[1].x * w[0].y).sum::<f64>() / 2.0
    }

    let mut polys = Vec::new();
    let mut exterior: Option<geo::LineString<f64>> = None;
    let mut holes = Vec::new();
    for mut coords in rings {
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let ring = geo::LineString(coords);
        if is_exterior || exterior.is_none() {
            if let Some(ext) = exterior.take() {
                polys.push(geo::Polygon::new(ext, std::mem::take(&mut holes)));
            }
            exterior = Some(ring);
        } else {
            holes.push(ring);
        }
    }
    if let Some(ext) = exterior {
        polys.push(geo::Polygon::new(ext, holes));
    }

    if polys.len() == 1 {
        polys.remove(0).into()
    } else {
        geo::MultiPolygon(polys).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64, clockwise: bool) -> Vec<geo::Coord<f64>> {
        let mut pts = vec![
            geo::Coord { x: x0, y: y0 },
            geo::Coord { x: x0 + size, y: y0 },
            geo::Coord { x: x0 + size, y: y0 + size },
            geo::Coord { x: x0, y: y0 + size },
        ];
        if clockwise { pts.reverse() }
        pts
    }

    #[test]
    fn holes_attach_to_preceding_exterior() {
        let rings = vec![square(0.0, 0.0, 10.0, true), square(2.0, 2.0, 2.0, false), square(20.0, 0.0, 5.0, true)];
        match polygons(rings.into_iter()) {
            geo::Geometry::MultiPolygon(mp) => {
                assert_eq!(mp.0.len(), 2);
                assert_eq!(mp.0[0].interiors().len(), 1);
                assert_eq!(mp.0[1].interiors().len(), 0);
                assert_eq!(mp.0[0].exterior().0.first(), mp.0[0].exterior().0.last());
            }
            other => panic!("expected a multipolygon, got {other:?}"),
        }
    }

    #[test]
    fn single_ring_is_a_polygon() {
        assert!(matches!(polygons(vec![square(0.0, 0.0, 1.0, true)].into_iter()), geo::Geometry::Polygon(_)));
    }

    #[test]
    fn character_fields_are_trimmed() {
        assert_eq!(field_to_json(FieldValue::Character(Some("IE  ".into()))), Value::String("IE".into()));
        assert_eq!(field_to_json(FieldValue::Numeric(Some(4.0))), Value::from(4));
        assert_eq!(field_to_json(FieldValue::Logical(None)), Value::Null);
    }
}
