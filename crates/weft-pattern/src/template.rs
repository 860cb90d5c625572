//! Scanner for partial invocation markers.
//!
//! Templates stay engine-agnostic here. The only syntax this module
//! understands is the `{{> partial }}` marker, with optional call-site
//! parameters (`{{> partial(label: "Go") }}`) and an optional style
//! modifier (`{{> partial:primary }}`). Everything else is literal text
//! for the configured renderer. A malformed marker is not an error; it
//! stays in the literal run so broken templates still build.

use serde_json::Value;

use crate::data::DataMap;

/// A single `{{> ... }}` marker found in a template.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Partial identifier as written at the call site.
    pub partial: String,

    /// Call-site parameters, empty when the marker carries none.
    pub params: DataMap,

    /// Style modifier after `:`, e.g. `primary|large`.
    pub style_modifier: Option<String>,

    /// Byte offset of the opening `{{>`.
    pub start: usize,

    /// Byte offset just past the closing `}}`.
    pub end: usize,
}

/// One piece of a scanned template, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment<'a> {
    /// Text between markers, handed to the renderer untouched.
    Literal(&'a str),

    /// A partial invocation to expand in place.
    Partial(Invocation),
}

/// Split a template into literal runs and partial invocations.
pub fn scan(template: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut lit_start = 0;
    let mut from = 0;

    while let Some(found) = template[from..].find("{{>") {
        let open = from + found;
        match parse_marker(template, open) {
            Some(invocation) => {
                if open > lit_start {
                    segments.push(Segment::Literal(&template[lit_start..open]));
                }
                from = invocation.end;
                lit_start = invocation.end;
                segments.push(Segment::Partial(invocation));
            }
            // Not a well-formed marker; leave it in the literal run and
            // keep looking past the opener.
            None => from = open + 3,
        }
    }

    if lit_start < template.len() {
        segments.push(Segment::Literal(&template[lit_start..]));
    }

    segments
}

fn parse_marker(template: &str, open: usize) -> Option<Invocation> {
    let mut i = skip_ws(template, open + 3);

    let ident_end = scan_while(template, i, is_ident_char);
    if ident_end == i {
        return None;
    }
    let partial = template[i..ident_end].to_string();
    i = ident_end;

    let mut style_modifier = None;
    if template[i..].starts_with(':') {
        let mod_start = i + 1;
        let mod_end = scan_while(template, mod_start, is_modifier_char);
        if mod_end == mod_start {
            return None;
        }
        style_modifier = Some(template[mod_start..mod_end].to_string());
        i = mod_end;
    }

    i = skip_ws(template, i);

    let mut params = DataMap::new();
    if template[i..].starts_with('(') {
        let close = find_params_end(template, i + 1)?;
        params = parse_params(&template[i + 1..close]).ok()?;
        i = skip_ws(template, close + 1);
    }

    if !template[i..].starts_with("}}") {
        return None;
    }

    Some(Invocation {
        partial,
        params,
        style_modifier,
        start: open,
        end: i + 2,
    })
}

fn skip_ws(s: &str, mut i: usize) -> usize {
    while let Some(ch) = s[i..].chars().next() {
        if !ch.is_whitespace() {
            break;
        }
        i += ch.len_utf8();
    }
    i
}

fn scan_while(s: &str, mut i: usize, pred: fn(char) -> bool) -> usize {
    while let Some(ch) = s[i..].chars().next() {
        if !pred(ch) {
            break;
        }
        i += ch.len_utf8();
    }
    i
}

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | '~')
}

fn is_modifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '|')
}

/// Locate the `)` closing a parameter list, honoring quoted strings so
/// values may contain parentheses and braces.
fn find_params_end(s: &str, from: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in s[from..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => match ch {
                '\\' => escaped = true,
                c if c == q => quote = None,
                _ => {}
            },
            None => match ch {
                '"' | '\'' => quote = Some(ch),
                ')' => return Some(from + idx),
                _ => {}
            },
        }
    }
    None
}

/// Failure while parsing a call-site parameter list.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("Unterminated string in parameter list at byte {at}")]
    UnterminatedString { at: usize },

    #[error("Expected `{expected}` at byte {at} of parameter list")]
    Expected { expected: char, at: usize },

    #[error("Empty parameter key at byte {at}")]
    EmptyKey { at: usize },
}

/// Parse the inside of a `(...)` parameter list into a data map.
///
/// Keys are bare identifiers or quoted strings; values are quoted
/// strings or bare tokens classified as booleans, numbers, or strings.
pub fn parse_params(src: &str) -> Result<DataMap, ParamError> {
    let mut params = DataMap::new();
    let mut cur = Cursor::new(src);

    loop {
        cur.skip_ws();
        if cur.at_end() {
            break;
        }

        let key_at = cur.pos;
        let key = match cur.peek() {
            Some('"') | Some('\'') => cur.quoted()?,
            _ => cur.take_while(is_key_char),
        };
        if key.is_empty() {
            return Err(ParamError::EmptyKey { at: key_at });
        }

        cur.skip_ws();
        if !cur.eat(':') {
            return Err(ParamError::Expected {
                expected: ':',
                at: cur.pos,
            });
        }
        cur.skip_ws();

        let value = match cur.peek() {
            Some('"') | Some('\'') => Value::String(cur.quoted()?),
            _ => classify(cur.take_until(',').trim()),
        };
        params.insert(key, value);

        cur.skip_ws();
        if cur.at_end() {
            break;
        }
        if !cur.eat(',') {
            return Err(ParamError::Expected {
                expected: ',',
                at: cur.pos,
            });
        }
    }

    Ok(params)
}

fn is_key_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_')
}

fn classify(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }
    if let Ok(n) = raw.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = raw.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(raw.to_string())
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat(&mut self, want: char) -> bool {
        if self.peek() == Some(want) {
            self.pos += want.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.bump();
        }
    }

    fn take_while(&mut self, pred: fn(char) -> bool) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if pred(ch)) {
            self.bump();
        }
        self.src[start..self.pos].to_string()
    }

    fn take_until(&mut self, stop: char) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch != stop) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    /// Consume a quoted string, backslash escaping the next character.
    fn quoted(&mut self) -> Result<String, ParamError> {
        let at = self.pos;
        let quote = match self.bump() {
            Some(q) => q,
            None => return Err(ParamError::UnterminatedString { at }),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(ch) => out.push(ch),
                    None => return Err(ParamError::UnterminatedString { at }),
                },
                Some(ch) if ch == quote => return Ok(out),
                Some(ch) => out.push(ch),
                None => return Err(ParamError::UnterminatedString { at }),
            }
        }
    }
}
