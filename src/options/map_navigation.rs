use crate::error::Result;
use crate::js::{CallbackFunction, JsObject};
use crate::meta::{Fields, HighchartsMeta, ObjectBuilder, js_enum};
use crate::options::{Align, VerticalAlign};

js_enum! {
    pub enum AlignTo ("align_to") {
        PlotBox => "plotBox",
        SpacingBox => "spacingBox",
    }
}

/// A zoom button, or the defaults shared by both buttons.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationButton {
    pub enabled: Option<bool>,
    pub align: Option<Align>,
    pub align_to: Option<AlignTo>,
    pub height: Option<f64>,
    pub padding: Option<f64>,
    pub style: Option<JsObject>,
    pub text: Option<String>,
    pub theme: Option<JsObject>,
    pub vertical_align: Option<VerticalAlign>,
    pub width: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub onclick: Option<CallbackFunction>,
}

impl HighchartsMeta for NavigationButton {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            enabled: f.parse("enabled")?,
            align: f.parse("align")?,
            align_to: f.parse("alignTo")?,
            height: f.parse("height")?,
            padding: f.parse("padding")?,
            style: f.parse("style")?,
            text: f.text("text")?,
            theme: f.parse("theme")?,
            vertical_align: f.parse("verticalAlign")?,
            width: f.parse("width")?,
            x: f.parse("x")?,
            y: f.parse("y")?,
            onclick: f.parse("onclick")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("enabled", &self.enabled)
            .set("align", &self.align)
            .set("alignTo", &self.align_to)
            .set("height", &self.height)
            .set("padding", &self.padding)
            .set("style", &self.style)
            .set("text", &self.text)
            .set("theme", &self.theme)
            .set("verticalAlign", &self.vertical_align)
            .set("width", &self.width)
            .set("x", &self.x)
            .set("y", &self.y)
            .set("onclick", &self.onclick)
            .build()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationButtons {
    pub zoom_in: Option<NavigationButton>,
    pub zoom_out: Option<NavigationButton>,
}

impl HighchartsMeta for NavigationButtons {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self { zoom_in: f.model("zoomIn")?, zoom_out: f.model("zoomOut")? })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .model("zoomIn", &self.zoom_in)
            .model("zoomOut", &self.zoom_out)
            .build()
    }
}

/// Zoom and pan controls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapNavigationOptions {
    pub button_options: Option<NavigationButton>,
    pub buttons: Option<NavigationButtons>,
    pub enable_buttons: Option<bool>,
    pub enabled: Option<bool>,
    pub enable_double_click_zoom: Option<bool>,
    pub enable_double_click_zoom_to: Option<bool>,
    pub enable_mouse_wheel_zoom: Option<bool>,
    pub enable_touch_zoom: Option<bool>,
    pub mouse_wheel_sensitivity: Option<f64>,
}

impl HighchartsMeta for MapNavigationOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        Ok(Self {
            button_options: f.model("buttonOptions")?,
            buttons: f.model("buttons")?,
            enable_buttons: f.parse("enableButtons")?,
            enabled: f.parse("enabled")?,
            enable_double_click_zoom: f.parse("enableDoubleClickZoom")?,
            enable_double_click_zoom_to: f.parse("enableDoubleClickZoomTo")?,
            enable_mouse_wheel_zoom: f.parse("enableMouseWheelZoom")?,
            enable_touch_zoom: f.parse("enableTouchZoom")?,
            mouse_wheel_sensitivity: f.parse("mouseWheelSensitivity")?,
        })
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .model("buttonOptions", &self.button_options)
            .model("buttons", &self.buttons)
            .set("enableButtons", &self.enable_buttons)
            .set("enabled", &self.enabled)
            .set("enableDoubleClickZoom", &self.enable_double_click_zoom)
            .set("enableDoubleClickZoomTo", &self.enable_double_click_zoom_to)
            .set("enableMouseWheelZoom", &self.enable_mouse_wheel_zoom)
            .set("enableTouchZoom", &self.enable_touch_zoom)
            .set("mouseWheelSensitivity", &self.mouse_wheel_sensitivity)
            .build()
    }
}
