//! Recursive-descent parser for JavaScript object literals.
//!
//! Covers the subset chart configurations are written in: JSON plus bare
//! keys, single-quoted strings, comments, trailing commas, function and
//! class expressions, constructor calls, and bare identifiers.

use crate::error::{Error, Result};
use crate::js::{CallbackFunction, JavaScriptClass, JsObject, JsValue, VariableName};

/// Parse a complete literal, tolerating a leading `var x =` and a trailing `;`.
pub fn parse_literal(source: &str) -> Result<JsValue> {
    let mut parser = Parser::new(source);
    parser.skip_declaration()?;
    let value = parser.value()?;
    parser.skip_trivia()?;
    parser.eat(';');
    parser.skip_trivia()?;
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing content"));
    }
    Ok(value)
}

/// Parse one value starting at byte offset `start`; returns the value and the
/// offset just past it.
pub(crate) fn parse_value_at(source: &str, start: usize) -> Result<(JsValue, usize)> {
    let mut parser = Parser::new(source);
    parser.pos = start;
    let value = parser.value()?;
    Ok((value, parser.pos))
}

pub(crate) struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self { Self { src, pos: 0 } }

    #[inline] fn rest(&self) -> &'a str { &self.src[self.pos..] }
    #[inline] fn at_end(&self) -> bool { self.pos >= self.src.len() }
    #[inline] fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::JsParse { position: self.pos, message: message.into() }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        self.skip_trivia()?;
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => { self.bump(); }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.bump() {
                        if c == '\n' { break }
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.pos;
                    self.pos += 2;
                    match self.rest().find("*/") {
                        Some(end) => self.pos += end + 2,
                        None => {
                            self.pos = start;
                            return Err(self.error("unterminated comment"));
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_declaration(&mut self) -> Result<()> {
        self.skip_trivia()?;
        let save = self.pos;
        if let Some(word) = self.identifier() {
            if matches!(word.as_str(), "var" | "let" | "const") {
                self.skip_trivia()?;
                if self.identifier().is_some() {
                    self.skip_trivia()?;
                    if self.eat('=') {
                        return Ok(());
                    }
                }
            }
        }
        self.pos = save;
        Ok(())
    }

    fn identifier(&mut self) -> Option<String> {
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => { self.bump(); }
            _ => return None,
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' { self.bump(); } else { break }
        }
        Some(self.src[start..self.pos].to_string())
    }

    pub(crate) fn value(&mut self) -> Result<JsValue> {
        self.skip_trivia()?;
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') | Some('\'') => Ok(JsValue::String(self.string()?)),
            Some('`') => self.template(),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' || c == '$' => self.word(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    fn object(&mut self) -> Result<JsValue> {
        self.expect('{')?;
        let mut obj = JsObject::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') { break }
            let key = self.key()?;
            self.expect(':')?;
            let value = self.value()?;
            obj.insert(key, value);
            self.skip_trivia()?;
            if self.eat(',') { continue }
            if self.eat('}') { break }
            return Err(self.error("expected ',' or '}' in object"));
        }
        Ok(JsValue::Object(obj))
    }

    fn key(&mut self) -> Result<String> {
        match self.peek() {
            Some('"') | Some('\'') => self.string(),
            Some(c) if c.is_ascii_digit() => {
                let start = self.pos;
                while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '.') { self.bump(); }
                Ok(self.src[start..self.pos].to_string())
            }
            _ => self.identifier().ok_or_else(|| self.error("expected a property name")),
        }
    }

    fn array(&mut self) -> Result<JsValue> {
        self.expect('[')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat(']') { break }
            items.push(self.value()?);
            self.skip_trivia()?;
            if self.eat(',') { continue }
            if self.eat(']') { break }
            return Err(self.error("expected ',' or ']' in array"));
        }
        Ok(JsValue::Array(items))
    }

    fn string(&mut self) -> Result<String> {
        let start = self.pos;
        let quote = self.bump().ok_or_else(|| self.error("expected a string"))?;
        let mut out = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => {
                    self.pos = start;
                    return Err(self.error("unterminated string"));
                }
            };
            if c == quote { break }
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escaped = self.bump().ok_or_else(|| self.error("unterminated escape sequence"))?;
            match escaped {
                'n' => out.push('\n'),
                'r' => out.push('\r'),
                't' => out.push('\t'),
                'b' => out.push('\u{8}'),
                'f' => out.push('\u{c}'),
                'v' => out.push('\u{b}'),
                '0' => out.push('\0'),
                'x' => out.push(self.hex_escape(2)?),
                'u' if self.peek() == Some('{') => {
                    self.bump();
                    let end = self.rest().find('}').ok_or_else(|| self.error("unterminated unicode escape"))?;
                    let code = u32::from_str_radix(&self.rest()[..end], 16)
                        .map_err(|_| self.error("invalid unicode escape"))?;
                    self.pos += end + 1;
                    out.push(char::from_u32(code).ok_or_else(|| self.error("invalid unicode code point"))?);
                }
                'u' => out.push(self.unicode_escape()?),
                '\n' => {}
                '\r' => { self.eat('\n'); }
                other => out.push(other),
            }
        }
        Ok(out)
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char> {
        let hex = self.rest().get(..digits).ok_or_else(|| self.error("truncated escape"))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid hex escape"))?;
        self.pos += digits;
        char::from_u32(code).ok_or_else(|| self.error("invalid escaped character"))
    }

    /// `\uXXXX`, combining surrogate pairs.
    fn unicode_escape(&mut self) -> Result<char> {
        let hex = self.rest().get(..4).ok_or_else(|| self.error("truncated unicode escape"))?;
        let high = u32::from_str_radix(hex, 16).map_err(|_| self.error("invalid unicode escape"))?;
        self.pos += 4;
        if (0xD800..0xDC00).contains(&high) && self.rest().starts_with("\\u") {
            let save = self.pos;
            self.pos += 2;
            if let Some(low) = self.rest().get(..4).and_then(|h| u32::from_str_radix(h, 16).ok()) {
                if (0xDC00..0xE000).contains(&low) {
                    self.pos += 4;
                    let code = 0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(code).ok_or_else(|| self.error("invalid surrogate pair"));
                }
            }
            self.pos = save;
        }
        Ok(char::from_u32(high).unwrap_or('\u{FFFD}'))
    }

    /// Template literals without substitutions become strings; others are kept raw.
    fn template(&mut self) -> Result<JsValue> {
        let start = self.pos;
        self.skip_quoted('`')?;
        let raw = &self.src[start..self.pos];
        let inner = &raw[1..raw.len() - 1];
        if inner.contains("${") {
            Ok(JsValue::Raw(raw.to_string()))
        } else {
            Ok(JsValue::String(inner.replace("\\`", "`")))
        }
    }

    fn number(&mut self) -> Result<JsValue> {
        let start = self.pos;
        let negative = self.eat('-');
        if !negative { self.eat('+'); }

        if self.rest().starts_with("Infinity") {
            self.pos += "Infinity".len();
            return Ok(JsValue::Number(if negative { f64::NEG_INFINITY } else { f64::INFINITY }));
        }

        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") {
            self.pos += 2;
            let digits_start = self.pos;
            while matches!(self.peek(), Some(c) if c.is_ascii_hexdigit()) { self.bump(); }
            let value = i64::from_str_radix(&self.src[digits_start..self.pos], 16)
                .map_err(|_| self.error("invalid hexadecimal number"))?;
            let value = value as f64;
            return Ok(JsValue::Number(if negative { -value } else { value }));
        }

        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && matches!(self.src[..self.pos].chars().last(), Some('e') | Some('E'));
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || c == '_' || exponent_sign {
                self.bump();
            } else {
                break;
            }
        }
        let text = self.src[start..self.pos].replace('_', "");
        text.parse::<f64>()
            .map(JsValue::Number)
            .map_err(|_| Error::JsParse { position: start, message: format!("invalid number '{text}'") })
    }

    fn word(&mut self) -> Result<JsValue> {
        let start = self.pos;
        let word = self.identifier().ok_or_else(|| self.error("expected an identifier"))?;
        match word.as_str() {
            "true" => Ok(JsValue::Bool(true)),
            "false" => Ok(JsValue::Bool(false)),
            "null" => Ok(JsValue::Null),
            "undefined" => Ok(JsValue::Undefined),
            "NaN" => Ok(JsValue::Number(f64::NAN)),
            "Infinity" => Ok(JsValue::Number(f64::INFINITY)),
            "function" => self.function().map(JsValue::Function),
            "class" => self.class().map(JsValue::Class),
            "new" => {
                self.skip_trivia()?;
                self.dotted_path()?;
                self.skip_trivia()?;
                if self.peek() == Some('(') {
                    self.skip_balanced('(', ')')?;
                }
                Ok(JsValue::Raw(self.src[start..self.pos].trim().to_string()))
            }
            _ => {
                self.pos = start;
                let path = self.dotted_path()?;
                let save = self.pos;
                self.skip_trivia()?;
                if self.peek() == Some('(') {
                    self.skip_balanced('(', ')')?;
                    return Ok(JsValue::Raw(self.src[start..self.pos].to_string()));
                }
                self.pos = save;
                Ok(JsValue::Identifier(VariableName::new(path)?))
            }
        }
    }

    fn dotted_path(&mut self) -> Result<String> {
        let mut path = self.identifier().ok_or_else(|| self.error("expected an identifier"))?;
        while self.peek() == Some('.') && matches!(self.peek_second(), Some(c) if c.is_alphabetic() || c == '_' || c == '$') {
            self.bump();
            path.push('.');
            path.push_str(&self.identifier().unwrap_or_default());
        }
        Ok(path)
    }

    fn parameters(&mut self) -> Result<Vec<String>> {
        self.expect('(')?;
        let start = self.pos;
        self.pos -= 1;
        self.skip_balanced('(', ')')?;
        let inner = &self.src[start..self.pos - 1];
        Ok(inner.split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn body(&mut self) -> Result<String> {
        self.skip_trivia()?;
        if self.peek() != Some('{') {
            return Err(self.error("expected '{' to open a function body"));
        }
        let start = self.pos + 1;
        self.skip_balanced('{', '}')?;
        Ok(self.src[start..self.pos - 1].trim().to_string())
    }

    /// After the `function` keyword.
    fn function(&mut self) -> Result<CallbackFunction> {
        self.skip_trivia()?;
        let function_name = self.identifier();
        let arguments = self.parameters()?;
        let body = self.body()?;
        Ok(CallbackFunction { function_name, arguments, body })
    }

    /// After the `class` keyword.
    fn class(&mut self) -> Result<JavaScriptClass> {
        self.skip_trivia()?;
        let class_name = self.identifier().ok_or_else(|| self.error("expected a class name"))?;
        self.skip_trivia()?;
        let save = self.pos;
        if self.identifier().as_deref() == Some("extends") {
            self.skip_trivia()?;
            self.dotted_path()?;
        } else {
            self.pos = save;
        }
        self.expect('{')?;

        let mut methods = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.eat('}') { break }
            self.eat(';');
            self.skip_trivia()?;
            if self.eat('}') { break }
            let name = self.identifier().ok_or_else(|| self.error("expected a method name"))?;
            let arguments = self.parameters()?;
            let body = self.body()?;
            methods.push(CallbackFunction { function_name: Some(name), arguments, body });
        }
        Ok(JavaScriptClass { class_name, methods })
    }

    fn skip_quoted(&mut self, quote: char) -> Result<()> {
        let start = self.pos;
        self.bump();
        while let Some(c) = self.bump() {
            if c == '\\' {
                self.bump();
            } else if c == quote {
                return Ok(());
            }
        }
        self.pos = start;
        Err(self.error("unterminated string"))
    }

    /// Advance past a balanced `open ... close` group, skipping strings and comments.
    fn skip_balanced(&mut self, open: char, close: char) -> Result<()> {
        let start = self.pos;
        let mut depth = 0usize;
        while let Some(c) = self.peek() {
            match c {
                '"' | '\'' | '`' => { self.skip_quoted(c)?; continue; }
                '/' if matches!(self.peek_second(), Some('/') | Some('*')) => { self.skip_trivia()?; continue; }
                c if c == open => depth += 1,
                c if c == close => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.bump();
        }
        self.pos = start;
        Err(self.error(format!("unbalanced '{open}'")))
    }
}
