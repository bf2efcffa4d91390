use crate::error::{Error, Result};
use crate::js::render::quote;
use crate::js::{CallbackFunction, JavaScriptClass, JsObject, JsValue};
use crate::meta::{Fields, FromJs, HighchartsMeta, ObjectBuilder};
use crate::validate;

/// A projection implemented as a JavaScript class and registered with
/// `Highcharts.Projection.add` before the chart is created.
///
/// The class must define `constructor`, `forward(lonLat)` and `inverse(point)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomProjection {
    name: Option<String>,
    class: JavaScriptClass,
}

impl CustomProjection {
    pub fn new(name: Option<&str>, class_name: &str, methods: Vec<CallbackFunction>) -> Result<Self> {
        Self::from_class(name, JavaScriptClass::new(class_name, methods)?)
    }

    pub fn from_class(name: Option<&str>, class: JavaScriptClass) -> Result<Self> {
        check_methods(&class.methods)?;
        Ok(Self { name: name.map(str::to_string), class })
    }

    /// Name the projection is registered under; defaults to the class name.
    pub fn name(&self) -> &str { self.name.as_deref().unwrap_or(&self.class.class_name) }

    #[inline] pub fn class_name(&self) -> &str { &self.class.class_name }
    #[inline] pub fn methods(&self) -> &[CallbackFunction] { &self.class.methods }
    #[inline] pub fn class(&self) -> &JavaScriptClass { &self.class }

    pub fn registration(&self) -> String {
        format!("Highcharts.Projection.add({}, {});", quote(self.name()), self.class.class_name)
    }

    /// Class declaration followed by its registration.
    pub fn to_js_literal(&self) -> String { format!("{};\n{}", self.class, self.registration()) }

    pub fn from_js_literal(source: &str, name: Option<&str>) -> Result<Self> {
        Self::from_class(name, JavaScriptClass::from_js_literal(source)?)
    }
}

fn check_methods(methods: &[CallbackFunction]) -> Result<()> {
    if methods.len() < 3 {
        return Err(Error::value(format!(
            "A CustomProjection requires at least three methods, where one is named \"constructor\", \
             one \"forward\", and one \"inverse\". Received only {} methods.",
            methods.len()
        )));
    }
    let find = |name: &str| methods.iter().find(|m| m.function_name.as_deref() == Some(name));
    if find("constructor").is_none() {
        return Err(Error::JavaScript("A JavaScriptClass requires at least one \"constructor\" method. Yours had none.".into()));
    }
    for name in ["forward", "inverse"] {
        match find(name) {
            None => return Err(Error::JavaScript(format!("CustomProjection requires a \"{name}\" method. Yours had none."))),
            Some(m) if m.argument_count() != 1 => {
                return Err(Error::JavaScript(format!(
                    "The \"{name}\" method expects 1 argument. Yours had: {}",
                    m.argument_count()
                )));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

impl FromJs for CustomProjection {
    fn from_js(value: &JsValue) -> Result<Self> {
        match value {
            JsValue::Class(class) => Self::from_class(None, class.clone()),
            JsValue::String(source) => Self::from_js_literal(source, None),
            other => Err(Error::value(format!("expects a JavaScript class, received {}", other.describe()))),
        }
    }
}

/// Map projection settings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectionOptions {
    /// Built-in (`EqualEarth`, `LambertConformalConic`, `Miller`, `Orthographic`,
    /// `WebMercator`) or registered custom projection name.
    pub name: Option<String>,
    parallels: Option<Vec<f64>>,
    rotation: Option<Vec<f64>>,
    custom: Option<CustomProjection>,
}

impl ProjectionOptions {
    pub fn named(name: &str) -> Self { Self { name: Some(name.to_string()), ..Self::default() } }

    #[inline] pub fn parallels(&self) -> Option<&[f64]> { self.parallels.as_deref() }
    #[inline] pub fn rotation(&self) -> Option<&[f64]> { self.rotation.as_deref() }
    #[inline] pub fn custom(&self) -> Option<&CustomProjection> { self.custom.as_ref() }

    /// One or two standard parallels; a single value is used for both.
    pub fn set_parallels(&mut self, parallels: Option<Vec<f64>>) -> Result<()> {
        self.parallels = match parallels {
            Some(p) if p.len() == 1 => Some(vec![p[0], p[0]]),
            other => validate::arity("parallels", other, 2, 2)?,
        };
        Ok(())
    }

    /// `[lambda, phi, gamma]`, at most three members.
    pub fn set_rotation(&mut self, rotation: Option<Vec<f64>>) -> Result<()> {
        self.rotation = validate::arity("rotation", rotation, 1, 3)?;
        Ok(())
    }

    /// Install a custom projection; the projection's name becomes this projection's name.
    pub fn set_custom(&mut self, custom: Option<CustomProjection>) {
        if let Some(custom) = &custom {
            self.name = Some(custom.name().to_string());
        }
        self.custom = custom;
    }
}

impl HighchartsMeta for ProjectionOptions {
    fn from_js_object(obj: &JsObject) -> Result<Self> {
        let f = Fields::new(obj);
        let mut options = Self { name: f.parse("name")?, ..Self::default() };
        options.set_parallels(f.list("parallels")?)?;
        options.set_rotation(f.list("rotation")?)?;
        if let Some(custom) = f.parse::<CustomProjection>("custom")? {
            let custom = match &options.name {
                Some(name) if name != custom.class_name() => CustomProjection { name: Some(name.clone()), ..custom },
                _ => custom,
            };
            options.set_custom(Some(custom));
        }
        Ok(options)
    }

    fn to_untrimmed(&self) -> JsObject {
        ObjectBuilder::new()
            .set("name", &self.name)
            .set("parallels", &self.parallels)
            .set("rotation", &self.rotation)
            .value("custom", self.custom.as_ref().map_or(JsValue::Undefined, |c| JsValue::Class(c.class.clone())))
            .build()
    }
}
