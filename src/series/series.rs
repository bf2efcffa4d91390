use crate::error::{Error, Result};
use crate::js::{JsObject, JsValue};
use crate::map_data::{AsyncMapData, MapSource};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, ToJs};
use crate::series::{
    BubbleFields, CartesianFields, DataPoint, FlowmapFields, GridFields, MapFields, MapLineFields,
    MapPointFields, PieFields, SeriesCommon, SeriesType, TiledWebMapFields,
};

/// One series: the properties shared by every type plus the capability
/// groups its type supports.
///
/// A capability is `Some` exactly when the type supports it; serialization
/// merges `type`, the common members, then each capability.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    series_type: SeriesType,
    pub common: SeriesCommon,
    pub cartesian: Option<CartesianFields>,
    pub map: Option<MapFields>,
    pub map_line: Option<MapLineFields>,
    pub map_point: Option<MapPointFields>,
    pub bubble: Option<BubbleFields>,
    pub flowmap: Option<FlowmapFields>,
    pub grid: Option<GridFields>,
    pub tiled_web_map: Option<TiledWebMapFields>,
    pub pie: Option<PieFields>,
}

fn supports(series_type: SeriesType) -> [bool; 9] {
    use SeriesType::*;
    let t = series_type;
    [
        matches!(t, Line | Spline | Area | AreaSpline | Column | Bar | Scatter | Bubble | Heatmap),
        t.is_geographic(),
        t == MapLine,
        t == MapPoint,
        matches!(t, Bubble | MapBubble),
        t == Flowmap,
        matches!(t, Heatmap | GeoHeatmap),
        t == TiledWebMap,
        t == Pie,
    ]
}

fn capability<T: HighchartsMeta>(present: bool, obj: &JsObject) -> Result<Option<T>> {
    if present { T::from_js_object(obj).map(Some) } else { Ok(None) }
}

impl Series {
    /// An empty series of `series_type`.
    pub fn new(series_type: SeriesType) -> Self {
        let [cartesian, map, map_line, map_point, bubble, flowmap, grid, tiled, pie] = supports(series_type);
        Self {
            series_type,
            common: SeriesCommon::default(),
            cartesian: cartesian.then(CartesianFields::default),
            map: map.then(MapFields::default),
            map_line: map_line.then(MapLineFields::default),
            map_point: map_point.then(MapPointFields::default),
            bubble: bubble.then(BubbleFields::default),
            flowmap: flowmap.then(FlowmapFields::default),
            grid: grid.then(GridFields::default),
            tiled_web_map: tiled.then(TiledWebMapFields::default),
            pie: pie.then(PieFields::default),
        }
    }

    /// Read a series whose `type` may be missing; `default_type` applies then.
    pub fn read(obj: &JsObject, default_type: SeriesType) -> Result<Self> {
        let f = Fields::new(obj);
        let series_type = f.parse("type")?.unwrap_or(default_type);
        let [cartesian, map, map_line, map_point, bubble, flowmap, grid, tiled, pie] = supports(series_type);
        Ok(Self {
            series_type,
            common: SeriesCommon::read(&f, series_type.data_shape())?,
            cartesian: capability(cartesian, obj)?,
            map: capability(map, obj)?,
            map_line: capability(map_line, obj)?,
            map_point: capability(map_point, obj)?,
            bubble: capability(bubble, obj)?,
            flowmap: capability(flowmap, obj)?,
            grid: capability(grid, obj)?,
            tiled_web_map: capability(tiled, obj)?,
            pie: capability(pie, obj)?,
        })
    }

    pub(crate) fn read_value(value: &JsValue, default_type: SeriesType) -> Result<Self> {
        match value {
            JsValue::Object(obj) => Self::read(obj, default_type),
            _ => Self::from_js_value(value),
        }
    }

    #[inline] pub fn series_type(&self) -> SeriesType { self.series_type }

    /// Replace the data, reading each entry in this type's layout.
    pub fn set_data(&mut self, data: &JsValue) -> Result<()> {
        self.common.data = Some(DataPoint::from_collection(self.series_type.data_shape(), data)?);
        Ok(())
    }

    pub fn with_data(mut self, data: Vec<DataPoint>) -> Self {
        self.common.data = Some(data);
        self
    }

    pub fn map_data(&self) -> Option<&MapSource> { self.map.as_ref()?.map_data.as_ref() }

    pub fn set_map_data(&mut self, source: impl Into<MapSource>) -> Result<()> {
        match &mut self.map {
            Some(map) => {
                map.map_data = Some(source.into());
                Ok(())
            }
            None => Err(Error::value(format!("map_data is not supported by {} series", self.series_type))),
        }
    }

    /// True if the series' map data is fetched client-side.
    pub fn is_async(&self) -> bool { self.map_data().is_some_and(MapSource::is_async) }

    pub fn async_slots(&self) -> Vec<&AsyncMapData> {
        self.map_data().map(MapSource::async_slots).unwrap_or_default()
    }

    /// Re-read this series as `target`. Properties `target` does not support are dropped.
    pub fn convert_to(&self, target: SeriesType) -> Result<Series> {
        if target == SeriesType::TiledWebMap && self.common.data.as_ref().is_some_and(|d| !d.is_empty()) {
            return Err(Error::SeriesConversion(format!(
                "Unable to convert a {} series to tiledwebmap: tiledwebmap series do not accept data",
                self.series_type
            )));
        }
        let mut members = self.to_untrimmed();
        members.insert("type".into(), target.to_js());
        let converted = Series::read(&members, target)
            .map_err(|err| Error::SeriesConversion(format!("Unable to convert {} to {target}: {err}", self.series_type)))?;

        let kept = converted.to_untrimmed();
        for (key, value) in &members {
            if !value.is_undefined() && kept.get(key).is_none_or(JsValue::is_undefined) {
                log::warn!("[series] dropped {key} converting {} to {target}", self.series_type);
            }
        }
        Ok(converted)
    }
}

impl Default for Series {
    fn default() -> Self { Self::new(SeriesType::Line) }
}

impl HighchartsMeta for Series {
    fn from_js_object(obj: &JsObject) -> Result<Self> { Self::read(obj, SeriesType::Line) }

    fn to_untrimmed(&self) -> JsObject {
        let mut common = self.common.to_untrimmed();
        let data = common.shift_remove("data").unwrap_or(JsValue::Undefined);
        let mut builder = ObjectBuilder::new()
            .set("type", &Some(self.series_type))
            .merge(common);
        macro_rules! merge_capability {
            ($($field:ident),+) => {
                $(if let Some(capability) = &self.$field {
                    builder = builder.merge(capability.to_untrimmed());
                })+
            };
        }
        merge_capability!(cartesian, map, map_line, map_point, bubble, flowmap, grid, tiled_web_map, pie);
        builder.value("data", data).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::parse_literal;

    fn make_map_series() -> Series {
        Series::from_js_literal("{
            type: 'map',
            name: 'Population',
            joinBy: 'hc-key',
            mapData: 'https://code.highcharts.com/mapdata/custom/europe.topo.json',
            data: [['fr', 68], ['de', 84]]
        }").unwrap()
    }

    #[test]
    fn capabilities_follow_type() {
        let series = make_map_series();
        assert_eq!(series.series_type(), SeriesType::Map);
        assert!(series.map.is_some());
        assert!(series.cartesian.is_none());
        assert!(series.is_async());
        assert_eq!(series.common.data.as_ref().unwrap()[0].name.as_deref(), Some("fr"));

        let bubble = Series::new(SeriesType::MapBubble);
        assert!(bubble.map.is_some() && bubble.bubble.is_some());
    }

    #[test]
    fn merged_member_order() {
        let series = Series::from_js_literal("{type: 'mapline', lineWidth: 2, name: 'Rivers', borderColor: '#000'}").unwrap();
        let keys: Vec<_> = series.to_dict().keys().cloned().collect();
        assert_eq!(keys, vec!["type", "name", "borderColor", "lineWidth"]);
    }

    #[test]
    fn type_defaults() {
        let series = Series::read(parse_literal("{data: [1, 2]}").unwrap().as_object().unwrap(), SeriesType::Map).unwrap();
        assert_eq!(series.series_type(), SeriesType::Map);
        assert_eq!(series.common.data.unwrap()[1].value, Some(2.0));
        assert_eq!(Series::from_js_literal("{}").unwrap().series_type(), SeriesType::Line);
    }

    #[test]
    fn dict_round_trip() {
        let series = make_map_series();
        assert_eq!(Series::from_dict(&series.to_dict()).unwrap(), series);
    }

    #[test]
    fn convert_keeps_shared_members() {
        let series = make_map_series();
        let bubble = series.convert_to(SeriesType::MapBubble).unwrap();
        assert_eq!(bubble.series_type(), SeriesType::MapBubble);
        assert_eq!(bubble.common.name.as_deref(), Some("Population"));
        assert!(bubble.is_async());

        let line = series.convert_to(SeriesType::Line).unwrap();
        assert!(line.map_data().is_none());
        assert_eq!(line.common.data.unwrap().len(), 2);
    }

    #[test]
    fn tiledwebmap_conversion_rejects_data() {
        let err = make_map_series().convert_to(SeriesType::TiledWebMap).unwrap_err();
        assert!(matches!(err, Error::SeriesConversion(_)));
        let empty = Series::new(SeriesType::Map);
        assert!(empty.convert_to(SeriesType::TiledWebMap).is_ok());
    }

    #[test]
    fn map_data_needs_map_capability() {
        let mut line = Series::new(SeriesType::Line);
        let url = crate::map_data::AsyncMapData::new("https://x/a.json").unwrap();
        assert!(line.set_map_data(url.clone()).is_err());
        let mut map = Series::new(SeriesType::Map);
        map.set_map_data(url).unwrap();
        assert!(map.is_async());
    }
}
