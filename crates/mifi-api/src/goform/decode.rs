// Parse-or-default decoding for goform responses
//
// The firmware reports numbers as strings, sometimes as JSON numbers, and
// sometimes not at all. Each accessor here decodes one field and falls back
// to the type's zero value, so one bad field never sinks a snapshot.

use std::str::FromStr;

use chrono::NaiveDateTime;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Error;

/// Read-only view over one JSON object from the device.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// The field as text. Strings pass through, numbers and booleans are
    /// rendered, anything else (or absence) is `None`.
    pub fn opt_text(&self, key: &str) -> Option<String> {
        match self.map.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => {
                debug!(field = key, value = %other, "unexpected JSON type, ignoring");
                None
            }
        }
    }

    /// The field as text, empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.opt_text(key).unwrap_or_default()
    }

    /// Parse the field into `T`, or `T::default()` on absence or garbage.
    pub fn parse<T>(&self, key: &str) -> T
    where
        T: FromStr + Default,
    {
        self.opt_parse(key).unwrap_or_default()
    }

    /// Parse the field into `T`, `None` on absence or garbage.
    pub fn opt_parse<T: FromStr>(&self, key: &str) -> Option<T> {
        let raw = self.opt_text(key)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let parsed = trimmed.parse::<T>().ok();
        if parsed.is_none() {
            debug!(field = key, value = trimmed, "unparseable field, using zero value");
        }
        parsed
    }

    /// Boolean flag. The firmware uses `"1"`/`"0"`; `true` and JSON
    /// booleans are accepted too.
    pub fn flag(&self, key: &str) -> bool {
        self.opt_text(key)
            .is_some_and(|v| matches!(v.trim(), "1") || v.trim().eq_ignore_ascii_case("true"))
    }

    /// Objects of an array field. Absent, non-array, and non-object entries
    /// all yield nothing.
    pub fn objects(&self, key: &str) -> Vec<Fields<'a>> {
        match self.map.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(Fields::new)
                .collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                debug!(field = key, value = %other, "expected an array, ignoring");
                Vec::new()
            }
        }
    }
}

/// Judge a write command by its `result` field.
///
/// `"0"` and any casing of `"success"` mean success on every endpoint; the
/// firmware mixes them freely. Anything else is a failure carrying the
/// device's literal text.
pub fn check_result(map: &Map<String, Value>, operation: &'static str) -> Result<(), Error> {
    let result = Fields::new(map)
        .opt_text("result")
        .ok_or(Error::ProtocolFormat { field: "result" })?;

    if is_success(&result) {
        Ok(())
    } else {
        Err(Error::CommandFailed {
            operation,
            response: result,
        })
    }
}

/// Whether a `result` value is one of the known success tokens.
pub fn is_success(result: &str) -> bool {
    result == "0" || result.eq_ignore_ascii_case("success")
}

/// Decode a hex-encoded SMS body.
///
/// Whitespace is stripped first. Bodies that decode to UTF-16BE code units
/// (UCS-2 firmware paths) are read as such; everything else as UTF-8. Input
/// that is not hex comes back unchanged.
pub fn decode_sms_content(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = match hex::decode(&compact) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, "SMS content is not hex, keeping raw text");
            return raw.to_owned();
        }
    };

    if let Some(text) = decode_ucs2(&bytes) {
        return text;
    }

    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// UTF-8 text never contains NUL bytes, so a NUL in an even-length body
/// marks UCS-2.
fn decode_ucs2(bytes: &[u8]) -> Option<String> {
    if bytes.is_empty() || bytes.len() % 2 != 0 || !bytes.contains(&0) {
        return None;
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

/// Parse the device's SMS date, `YY,MM,DD,HH,MM,SS[,±TZ]`.
///
/// The two-digit year gets a `20` prefix and the zone part is ignored: the
/// result is device-local time. Fewer than six parts, a year that is not
/// exactly two digits, or out-of-range values yield `None`.
pub fn parse_sms_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [yy, month, day, hour, minute, second, ..] = parts.as_slice() else {
        debug!(value = raw, "SMS date has fewer than six parts");
        return None;
    };
    if yy.len() != 2 || !yy.bytes().all(|b| b.is_ascii_digit()) {
        debug!(value = raw, "SMS date year is not two digits");
        return None;
    }

    let formatted = format!("20{yy}-{month}-{day} {hour}:{minute}:{second}");
    let parsed = NaiveDateTime::parse_from_str(&formatted, "%Y-%m-%d %H:%M:%S").ok();
    if parsed.is_none() {
        debug!(value = raw, "unparseable SMS date");
    }
    parsed
}
