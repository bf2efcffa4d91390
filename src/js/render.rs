//! JavaScript literal assembly.

use crate::js::{JsObject, JsValue, is_identifier};

const INDENT: &str = "  ";

/// Render a value as an indented JavaScript literal.
pub fn render(value: &JsValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, true);
    out
}

/// Render a value on a single line.
pub fn render_compact(value: &JsValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0, false);
    out
}

/// Quote a string with single quotes, escaping as needed.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn format_number(n: f64) -> String {
    if !n.is_finite() {
        "null".to_string()
    } else if n.fract() == 0.0 && n.abs() < 9.0e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn format_key(key: &str) -> String {
    if is_identifier(key) { key.to_string() } else { quote(key) }
}

fn is_scalar(value: &JsValue) -> bool {
    !matches!(value, JsValue::Array(_) | JsValue::Object(_) | JsValue::Function(_) | JsValue::Class(_))
}

fn write_value(out: &mut String, value: &JsValue, depth: usize, pretty: bool) {
    match value {
        JsValue::Undefined => out.push_str("undefined"),
        JsValue::Null => out.push_str("null"),
        JsValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        JsValue::Number(n) => out.push_str(&format_number(*n)),
        JsValue::String(s) => out.push_str(&quote(s)),
        JsValue::Array(items) => write_array(out, items, depth, pretty),
        JsValue::Object(obj) => write_object(out, obj, depth, pretty),
        JsValue::Function(f) => out.push_str(&f.to_string()),
        JsValue::Class(c) => out.push_str(&c.to_string()),
        JsValue::Identifier(v) => out.push_str(v.as_str()),
        JsValue::Fetch(m) => out.push_str(&m.variable_name()),
        JsValue::Raw(expr) => out.push_str(expr),
    }
}

fn write_array(out: &mut String, items: &[JsValue], depth: usize, pretty: bool) {
    if items.is_empty() {
        out.push_str("[]");
        return;
    }
    if !pretty || items.iter().all(is_scalar) {
        out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 { out.push_str(", ") }
            write_value(out, if item.is_undefined() { &JsValue::Null } else { item }, depth, pretty);
        }
        out.push(']');
        return;
    }
    out.push_str("[\n");
    for (i, item) in items.iter().enumerate() {
        if i > 0 { out.push_str(",\n") }
        out.push_str(&INDENT.repeat(depth + 1));
        write_value(out, if item.is_undefined() { &JsValue::Null } else { item }, depth + 1, pretty);
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push(']');
}

/// Class members are declarations emitted ahead of the literal, never property values.
fn write_object(out: &mut String, obj: &JsObject, depth: usize, pretty: bool) {
    let members: Vec<_> = obj.iter()
        .filter(|(_, v)| !v.is_undefined() && !matches!(v, JsValue::Class(_)))
        .collect();
    if members.is_empty() {
        out.push_str("{}");
        return;
    }
    if !pretty {
        out.push('{');
        for (i, (key, value)) in members.iter().enumerate() {
            if i > 0 { out.push_str(", ") }
            out.push_str(&format_key(key));
            out.push_str(": ");
            write_value(out, value, depth, pretty);
        }
        out.push('}');
        return;
    }
    out.push_str("{\n");
    for (i, (key, value)) in members.iter().enumerate() {
        if i > 0 { out.push_str(",\n") }
        out.push_str(&INDENT.repeat(depth + 1));
        out.push_str(&format_key(key));
        out.push_str(": ");
        write_value(out, value, depth + 1, pretty);
    }
    out.push('\n');
    out.push_str(&INDENT.repeat(depth));
    out.push('}');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::js::{CallbackFunction, VariableName};

    fn make_object() -> JsObject {
        let mut series = JsObject::new();
        series.insert("type".into(), "map".into());
        series.insert("data".into(), JsValue::Array(vec![1.0.into(), 2.5.into()]));
        series.insert("mapData".into(), JsValue::Identifier(VariableName::new("topology").unwrap()));
        series.insert("skipped".into(), JsValue::Undefined);

        let mut root = JsObject::new();
        root.insert("series".into(), JsValue::Array(vec![JsValue::Object(series)]));
        root.insert("hc-key".into(), "it's".into());
        root
    }

    #[test]
    fn pretty_layout() {
        let text = render(&JsValue::Object(make_object()));
        assert_eq!(
            text,
            "{\n  series: [\n    {\n      type: 'map',\n      data: [1, 2.5],\n      mapData: topology\n    }\n  ],\n  'hc-key': 'it\\'s'\n}"
        );
    }

    #[test]
    fn compact_layout() {
        let text = render_compact(&JsValue::Object(make_object()));
        assert_eq!(text, "{series: [{type: 'map', data: [1, 2.5], mapData: topology}], 'hc-key': 'it\\'s'}");
    }

    #[test]
    fn functions_are_emitted_raw() {
        let f = CallbackFunction::anonymous(&["e"], "return e;");
        assert_eq!(render(&JsValue::Function(f)), "function (e) {\nreturn e;\n}");
    }

    #[test]
    fn class_members_are_omitted() {
        let mut obj = JsObject::new();
        obj.insert("name".into(), "flat".into());
        obj.insert("custom".into(), JsValue::Class(crate::js::JavaScriptClass::default()));
        assert_eq!(render_compact(&JsValue::Object(obj)), "{name: 'flat'}");
    }

    #[test]
    fn quoting_escapes_control_characters() {
        assert_eq!(quote("a\nb\\c"), "'a\\nb\\\\c'");
        assert_eq!(quote("\u{1}"), "'\\u0001'");
    }

    #[test]
    fn non_finite_numbers_render_as_null() {
        assert_eq!(render(&JsValue::Number(f64::INFINITY)), "null");
        assert_eq!(render(&JsValue::Number(-3.0)), "-3");
    }
}
