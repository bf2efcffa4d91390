// Integration tests for dictionary and JavaScript-literal round trips of
// representative option types.

use highmaps::{
    HighchartsMapsOptions, HighchartsMeta, MapData, MapNavigationOptions, MapViewOptions, Options, PlotOptions,
    Series, SharedMapsOptions,
};
use serde_json::json;

fn make_maps_options() -> serde_json::Value {
    json!({
        "chart": {"borderWidth": 1},
        "title": {"text": "Population density"},
        "mapNavigation": {"enabled": true, "buttonOptions": {"verticalAlign": "bottom"}},
        "mapView": {"center": [10, 50], "zoom": 2.5, "projection": {"name": "EqualEarth"}},
        "colorAxis": [{"min": 1, "max": 1000, "type": "logarithmic"}],
        "series": [{
            "type": "map",
            "name": "Density",
            "joinBy": ["iso-a2", "code"],
            "data": [{"code": "FR", "value": 119}, {"code": "DE", "value": 233}]
        }],
        "xAxis": {"visible": false}
    })
}

#[test]
fn maps_options_dict_round_trip() {
    let mut dict = make_maps_options();
    dict["chart"]["map"] = json!("https://code.highcharts.com/mapdata/custom/world.topo.json");
    let options = HighchartsMapsOptions::from_dict(dict.as_object().unwrap()).unwrap();
    assert!(options.is_async());
    let again = HighchartsMapsOptions::from_dict(&options.to_dict()).unwrap();
    assert_eq!(again, options);
    assert_eq!(options.to_dict()["mapView"]["zoom"], 2.5);
    assert_eq!(options.to_dict()["xAxis"], json!({"visible": false}));
}

#[test]
fn maps_options_literal_round_trip() {
    let dict = make_maps_options();
    let options = Options::from_dict(dict.as_object().unwrap()).unwrap();
    assert!(options.is_maps());
    let literal = options.to_js_literal();
    assert_eq!(Options::from_js_literal(&literal).unwrap(), options);
}

#[test]
fn small_types_round_trip() {
    let navigation = MapNavigationOptions::from_json(r#"{"enabled": true, "enableMouseWheelZoom": false}"#).unwrap();
    assert_eq!(MapNavigationOptions::from_js_literal(&navigation.to_js_literal()).unwrap(), navigation);

    let view = MapViewOptions::from_json(r#"{"maxZoom": 30, "padding": [0, "10%", 0, "10%"]}"#).unwrap();
    assert_eq!(MapViewOptions::from_dict(&view.to_dict()).unwrap(), view);

    let plot = PlotOptions::from_json(r#"{"series": {"animation": false}, "map": {"allAreas": false}}"#).unwrap();
    assert_eq!(PlotOptions::from_js_literal(&plot.to_js_literal()).unwrap(), plot);

    let series = Series::from_json(r#"{"type": "mappoint", "data": [{"lat": 48.8, "lon": 2.3, "name": "Paris"}]}"#).unwrap();
    assert_eq!(Series::from_js_literal(&series.to_js_literal()).unwrap(), series);
}

#[test]
fn shared_options_statement() {
    let shared = SharedMapsOptions::from_json(r#"{"lang": {"zoomIn": "Zoom in"}, "mapNavigation": {"enabled": true}}"#).unwrap();
    let literal = shared.to_js_literal();
    assert!(literal.starts_with("Highcharts.setOptions({"));
    assert_eq!(SharedMapsOptions::from_js_literal(&literal).unwrap(), shared);
}

#[test]
fn inline_map_data_dict_form() {
    let geojson = json!({
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"name": "unit"},
            "geometry": {"type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
        }]
    });
    let data = MapData::from_geojson(&geojson.to_string()).unwrap();
    let dict = data.to_dict();
    assert_eq!(dict["topology"]["type"], "Topology");
    assert_eq!(MapData::from_dict(&dict).unwrap(), data);
}
