use std::fmt;

use crate::error::{Error, Result};
use crate::js::{JsValue, REPLACE_PREFIX, is_identifier, parse::parse_literal};

/// A JavaScript function expression, kept as source text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackFunction {
    pub function_name: Option<String>,
    pub arguments: Vec<String>,
    pub body: String,
}

impl CallbackFunction {
    /// Create a function from its name, argument names, and body source.
    pub fn new(function_name: Option<&str>, arguments: &[&str], body: &str) -> Self {
        Self {
            function_name: function_name.map(str::to_string),
            arguments: arguments.iter().map(|a| a.to_string()).collect(),
            body: body.trim().to_string(),
        }
    }

    /// Create an unnamed function.
    #[inline]
    pub fn anonymous(arguments: &[&str], body: &str) -> Self { Self::new(None, arguments, body) }

    #[inline] pub fn argument_count(&self) -> usize { self.arguments.len() }

    /// Parse `function name(a, b) { ... }`.
    pub fn from_js_literal(source: &str) -> Result<Self> {
        match parse_literal(source)? {
            JsValue::Function(f) => Ok(f),
            other => Err(Error::value(format!(
                "expected a JavaScript function, received a {}",
                other.type_name()
            ))),
        }
    }

    /// Method form used inside class bodies: `name(a, b) { ... }`.
    pub(crate) fn method_source(&self) -> String {
        format!(
            "{}({}) {}",
            self.function_name.as_deref().unwrap_or_default(),
            self.arguments.join(", "),
            block(&self.body)
        )
    }
}

fn block(body: &str) -> String {
    if body.is_empty() { "{}".to_string() } else { format!("{{\n{body}\n}}") }
}

impl fmt::Display for CallbackFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function_name {
            Some(name) => write!(f, "function {name}({}) {}", self.arguments.join(", "), block(&self.body)),
            None => write!(f, "function ({}) {}", self.arguments.join(", "), block(&self.body)),
        }
    }
}

/// Reference to a JavaScript variable defined outside the chart literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VariableName(String);

impl VariableName {
    /// Validate a (possibly dotted) JavaScript identifier.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.split('.').all(is_identifier) {
            Ok(Self(name))
        } else {
            Err(Error::value(format!("variable_name expects a valid JavaScript identifier. Received: \"{name}\"")))
        }
    }

    /// For names generated from known-valid parts.
    pub(crate) fn trusted(name: String) -> Self { Self(name) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }

    /// Placeholder string standing in for this variable in dictionary form.
    pub fn placeholder(&self) -> String { format!("{REPLACE_PREFIX}{}", self.0) }

    /// Recover a variable from its placeholder string.
    pub fn from_placeholder(s: &str) -> Option<Self> {
        s.strip_prefix(REPLACE_PREFIX).and_then(|name| Self::new(name).ok())
    }
}

impl fmt::Display for VariableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A JavaScript class declaration made of named methods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JavaScriptClass {
    pub class_name: String,
    pub methods: Vec<CallbackFunction>,
}

impl JavaScriptClass {
    pub fn new(class_name: &str, methods: Vec<CallbackFunction>) -> Result<Self> {
        if !is_identifier(class_name) {
            return Err(Error::value(format!("class_name expects a valid JavaScript identifier. Received: \"{class_name}\"")));
        }
        if let Some(unnamed) = methods.iter().position(|m| m.function_name.is_none()) {
            return Err(Error::JavaScript(format!("method {unnamed} of class {class_name} has no name")));
        }
        Ok(Self { class_name: class_name.to_string(), methods })
    }

    /// Look up a method by name.
    pub fn method(&self, name: &str) -> Option<&CallbackFunction> {
        self.methods.iter().find(|m| m.function_name.as_deref() == Some(name))
    }

    /// Parse `class Name { method(a) { ... } ... }`.
    pub fn from_js_literal(source: &str) -> Result<Self> {
        match parse_literal(source)? {
            JsValue::Class(c) => Ok(c),
            other => Err(Error::value(format!(
                "expected a JavaScript class, received a {}",
                other.type_name()
            ))),
        }
    }
}

impl fmt::Display for JavaScriptClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "class {} {{", self.class_name)?;
        for method in &self.methods {
            writeln!(f, "{}", method.method_source())?;
        }
        write!(f, "}}")
    }
}
