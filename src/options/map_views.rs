use crate::error::Result;
use crate::js::JsObject;
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, js_enum};
use crate::options::ProjectionOptions;
use crate::validate::{self, BoundingArray};

js_enum! {
    pub enum RelativeTo ("relative_to") {
        MapBoundingBox => "mapBoundingBox",
        PlotBox => "plotBox",
    }
}

js_enum! {
    pub enum InsetUnits ("units") {
        Percent => "percent",
        Pixels => "pixels",
    }
}

/// Defaults applied to every inset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InsetOptions {
    pub border_color: Option<String>,
    border_width: Option<f64>,
    pub padding: Option<BoundingArray>,
    pub relative_to: Option<RelativeTo>,
    pub units: Option<InsetUnits>,
}

impl InsetOptions {
    #[inline] pub fn border_width(&self) -> Option<f64> { self.border_width }

    pub fn set_border_width(&mut self, width: Option<f64>) -> Result<()> {
        self.border_width = validate::non_negative("border_width", width)?;
        Ok(())
    }

    fn read(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            border_color: f.parse("borderColor")?,
            border_width: validate::non_negative("border_width", f.parse("borderWidth")?)?,
            padding: f.parse("padding")?,
            relative_to: f.parse("relativeTo")?,
            units: f.parse("units")?,
        })
    }
}

impl HighchartsMeta for InsetOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(&Fields::new(obj)) }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("borderColor", &self.border_color)
            .set("borderWidth", &self.border_width)
            .set("padding", &self.padding)
            .set("relativeTo", &self.relative_to)
            .set("units", &self.units)
            .build()
    }
}

/// A separately projected region of the map, such as Alaska in a US map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Inset {
    pub options: InsetOptions,
    /// GeoJSON geometry outlining the inset.
    pub border_path: Option<JsObject>,
    /// GeoJSON geometry bounding the inset's drawing area.
    pub field: Option<JsObject>,
    /// GeoJSON geometry selecting which map features belong to the inset.
    pub geo_bounds: Option<JsObject>,
    pub id: Option<String>,
    pub projection: Option<ProjectionOptions>,
}

impl HighchartsMeta for Inset {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            options: InsetOptions::read(&f)?,
            border_path: f.parse("borderPath")?,
            field: f.parse("field")?,
            geo_bounds: f.parse("geoBounds")?,
            id: f.text("id")?,
            projection: f.model("projection")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .merge(self.options.to_untrimmed())
            .set("borderPath", &self.border_path)
            .set("field", &self.field)
            .set("geoBounds", &self.geo_bounds)
            .set("id", &self.id)
            .model("projection", &self.projection)
            .build()
    }
}

/// The map viewport: projection, center, zoom and insets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapViewOptions {
    center: Option<Vec<f64>>,
    pub inset_options: Option<InsetOptions>,
    pub insets: Option<Vec<Inset>>,
    max_zoom: Option<f64>,
    pub padding: Option<BoundingArray>,
    pub projection: Option<ProjectionOptions>,
    zoom: Option<f64>,
    pub fit_to_geometry: Option<JsObject>,
}

impl MapViewOptions {
    #[inline] pub fn center(&self) -> Option<&[f64]> { self.center.as_deref() }
    #[inline] pub fn max_zoom(&self) -> Option<f64> { self.max_zoom }
    #[inline] pub fn zoom(&self) -> Option<f64> { self.zoom }

    /// `[longitude, latitude]` in the projection's coordinate space.
    pub fn set_center(&mut self, center: Option<Vec<f64>>) -> Result<()> {
        self.center = validate::arity("center", center, 2, 2)?;
        Ok(())
    }

    pub fn set_max_zoom(&mut self, max_zoom: Option<f64>) -> Result<()> {
        self.max_zoom = validate::non_negative("max_zoom", max_zoom)?;
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: Option<f64>) -> Result<()> {
        self.zoom = validate::non_negative("zoom", zoom)?;
        Ok(())
    }

    /// Whether the projection is a custom class that must be registered first.
    pub fn uses_custom_projection(&self) -> bool {
        self.projection.as_ref().is_some_and(|p| p.custom().is_some())
    }
}

impl HighchartsMeta for MapViewOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let mut view = Self {
            inset_options: f.model("insetOptions")?,
            insets: f.models("insets")?,
            padding: f.parse("padding")?,
            projection: f.model("projection")?,
            fit_to_geometry: f.parse("fitToGeometry")?,
            ..Self::default()
        };
        view.set_center(f.parse("center")?)?;
        view.set_max_zoom(f.parse("maxZoom")?)?;
        view.set_zoom(f.parse("zoom")?)?;
        Ok(view)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("center", &self.center)
            .model("insetOptions", &self.inset_options)
            .models("insets", &self.insets)
            .set("maxZoom", &self.max_zoom)
            .set("padding", &self.padding)
            .model("projection", &self.projection)
            .set("zoom", &self.zoom)
            .set("fitToGeometry", &self.fit_to_geometry)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const FIXTURE: &str = r#"{
  center: [10, 58],
  insetOptions: {
    borderColor: '#cccccc',
    borderWidth: 1,
    padding: '10%',
    relativeTo: 'mapBoundingBox',
    units: 'percent'
  },
  insets: [
    {
      borderWidth: 2,
      id: 'us-all-alaska',
      projection: {
        name: 'LambertConformalConic',
        parallels: [55, 65]
      }
    }
  ],
  maxZoom: 30,
  padding: [10, 20, '5%', 0],
  projection: {
    name: 'Orthographic',
    rotation: [-10, -50]
  },
  zoom: 2.5
}"#;

    #[test]
    fn fixture_round_trips() {
        let view = MapViewOptions::from_js_literal(FIXTURE).unwrap();
        assert_eq!(view.center(), Some(&[10.0, 58.0][..]));
        assert_eq!(view.insets.as_ref().map(Vec::len), Some(1));
        assert_eq!(view.to_js_literal(), FIXTURE);
        assert_eq!(MapViewOptions::from_dict(&view.to_dict()).unwrap(), view);
    }

    #[test]
    fn center_needs_two_members() {
        let err = MapViewOptions::from_js_literal("{center: [10]}").unwrap_err();
        assert_eq!(err.to_string(), "center expects exactly 2 members. Received: 1");
    }

    #[test]
    fn zoom_must_be_non_negative() {
        let mut view = MapViewOptions::default();
        assert!(matches!(view.set_zoom(Some(-1.0)), Err(Error::Value(_))));
        assert_eq!(view.zoom(), None);
        view.set_max_zoom(Some(0.0)).unwrap();
        assert_eq!(view.max_zoom(), Some(0.0));
    }

    #[test]
    fn relative_to_is_checked() {
        let err = InsetOptions::from_js_literal("{relativeTo: 'page'}").unwrap_err();
        assert!(err.to_string().starts_with("relative_to expects one of"));
    }

    #[test]
    fn snake_case_dict_keys() {
        let view = MapViewOptions::from_json(r#"{"max_zoom": 4, "inset_options": {"border_width": 3}}"#).unwrap();
        assert_eq!(view.max_zoom(), Some(4.0));
        assert_eq!(view.inset_options.unwrap().border_width(), Some(3.0));
    }
}
