//! Model reply normalization
//!
//! The model is asked to answer with a single fenced JSON block, but nothing
//! enforces that. [`normalize`] pulls the JSON out when it can and otherwise
//! hands back an envelope carrying the untouched reply.

use std::io;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{json, Value};

/// Opening marker of a fenced JSON block
pub const JSON_FENCE_OPEN: &str = "```json";

/// Generic fence closer
pub const FENCE_CLOSE: &str = "```";

/// Message placed in the `error` key of the failure envelope
pub const PARSE_ERROR_MESSAGE: &str = "Failed to parse JSON";

/// Deepest array/object nesting accepted from a model reply
pub const MAX_NESTING_DEPTH: usize = 1000;

/// Outcome of normalizing a model reply
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedResult {
    /// The reply contained valid JSON
    Parsed(Value),
    /// The reply could not be parsed; `raw` is the full original text
    Unparsed { raw: String },
}

impl NormalizedResult {
    /// Whether parsing succeeded
    pub fn is_parsed(&self) -> bool {
        matches!(self, NormalizedResult::Parsed(_))
    }

    /// Wire form: the parsed value, or `{"error": ..., "raw": ...}`
    pub fn to_value(&self) -> Value {
        match self {
            NormalizedResult::Parsed(value) => value.clone(),
            NormalizedResult::Unparsed { raw } => json!({
                "error": PARSE_ERROR_MESSAGE,
                "raw": raw,
            }),
        }
    }

    /// Pretty JSON with 2-space indentation, non-ASCII escaped as `\uXXXX`
    pub fn to_pretty_json(&self) -> String {
        to_pretty_ascii(&self.to_value())
    }
}

/// Pretty-print with 2-space indentation, escaping every non-ASCII character
/// as `\uXXXX` (UTF-16 surrogate pairs above the BMP).
pub fn to_pretty_ascii(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, AsciiPrettyFormatter::new());
    if let Err(e) = value.serialize(&mut serializer) {
        tracing::error!("Failed to serialize JSON: {}", e);
        return String::new();
    }
    // Output is pure ASCII
    String::from_utf8(out).unwrap_or_default()
}

/// `PrettyFormatter` layout with ASCII-only string output
struct AsciiPrettyFormatter<'a> {
    pretty: PrettyFormatter<'a>,
}

impl AsciiPrettyFormatter<'_> {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

impl Serialize for NormalizedResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NormalizedResult::Parsed(value) => value.serialize(serializer),
            NormalizedResult::Unparsed { .. } => self.to_value().serialize(serializer),
        }
    }
}

/// Pick the substring that should hold the JSON payload.
///
/// Runs from just after the first `` ```json `` to the *last* `` ``` `` in the
/// whole text. With several fenced blocks this over-captures; that is the
/// established behavior and callers rely on the output staying the same.
pub fn extract_candidate(text: &str) -> &str {
    let Some(start) = text.find(JSON_FENCE_OPEN) else {
        return text;
    };
    let body_start = start + JSON_FENCE_OPEN.len();

    match text.rfind(FENCE_CLOSE) {
        Some(end) if end >= body_start => text[body_start..end].trim(),
        // The only closer is the opener itself
        _ => "",
    }
}

/// Deepest array/object nesting in `text`, ignoring brackets inside strings
fn nesting_depth(text: &str) -> usize {
    let (mut depth, mut max) = (0usize, 0usize);
    let (mut in_string, mut escaped) = (false, false);
    for b in text.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Strict parse of the whole candidate with exact numbers.
///
/// serde_json's fixed recursion limit is lifted; depth is bounded by
/// [`MAX_NESTING_DEPTH`] and the stack grows on demand.
fn parse_candidate(candidate: &str) -> serde_json::Result<Value> {
    if nesting_depth(candidate) > MAX_NESTING_DEPTH {
        return Err(serde::de::Error::custom(format!(
            "nesting deeper than {} levels",
            MAX_NESTING_DEPTH
        )));
    }

    let mut deserializer = serde_json::Deserializer::from_str(candidate);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(value)
}

/// Normalize a raw model reply. Never panics.
pub fn normalize(raw_text: &str) -> NormalizedResult {
    let candidate = extract_candidate(raw_text);

    match parse_candidate(candidate) {
        Ok(value) => NormalizedResult::Parsed(value),
        Err(e) => {
            tracing::debug!("Model reply is not valid JSON: {}", e);
            NormalizedResult::Unparsed {
                raw: raw_text.to_string(),
            }
        }
    }
}
