//! JavaScript value tree, literal rendering, and literal parsing.

mod functions;
pub(crate) mod parse;
pub(crate) mod render;
mod value;

pub use functions::{CallbackFunction, JavaScriptClass, VariableName};
pub use parse::parse_literal;
pub use render::{render, render_compact};
pub use value::{JsObject, JsValue};
pub(crate) use value::{number_to_json, object_to_json};

/// Prefix of the placeholder string that stands in for a JavaScript variable
/// in dictionary form.
pub const REPLACE_PREFIX: &str = "HCP: REPLACE-WITH-";

/// True if `s` is a single JavaScript identifier.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rules() {
        assert!(is_identifier("topology1"));
        assert!(is_identifier("$el"));
        assert!(is_identifier("_private"));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("hc-key"));
        assert!(!is_identifier(""));
    }
}
