//! Raw-record helpers shared by the domain constructors.
//!
//! Construction is two-phase: a pure normalization step rewrites synonymous
//! source fields onto their canonical names, then the typed constructor reads
//! the canonical fields strictly.

use serde_json::{Map, Value};

use super::error::ValidationError;

pub type RawRecord = Map<String, Value>;

/// Truthiness of a loosely-typed field: absent, null, false, 0 and empty
/// strings/lists/maps are all "not set".
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Copies `alias` onto `canonical` when the canonical field is not set.
pub fn promote(record: &mut RawRecord, alias: &str, canonical: &str) {
    if is_truthy(record.get(canonical)) {
        return;
    }
    if let Some(value) = record.get(alias).filter(|v| is_truthy(Some(*v))).cloned() {
        record.insert(canonical.to_string(), value);
    }
}

/// Copies `preferred` onto `canonical` whenever `preferred` is set,
/// overriding whatever `canonical` held.
pub fn prefer(record: &mut RawRecord, preferred: &str, canonical: &str) {
    if let Some(value) = record
        .get(preferred)
        .filter(|v| is_truthy(Some(*v)))
        .cloned()
    {
        record.insert(canonical.to_string(), value);
    }
}

pub fn as_record(value: &Value, entity: &'static str) -> Result<RawRecord, ValidationError> {
    match value {
        Value::Object(map) => Ok(map.clone()),
        _ => Err(ValidationError::NotAMapping { entity }),
    }
}

pub fn required_str(
    record: &RawRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<String, ValidationError> {
    optional_str(record, entity, field)?.ok_or(ValidationError::MissingField { entity, field })
}

/// Like [`required_str`], but an empty string counts as missing.
pub fn required_non_empty(
    record: &RawRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = required_str(record, entity, field)?;
    if value.is_empty() {
        return Err(ValidationError::MissingField { entity, field });
    }
    Ok(value)
}

pub fn optional_str(
    record: &RawRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<Option<String>, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ValidationError::WrongType {
            entity,
            field,
            expected: "a string",
        }),
    }
}

/// Array field that may be absent; `null` counts as absent.
pub fn optional_list<'a>(
    record: &'a RawRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<Option<&'a Vec<Value>>, ValidationError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ValidationError::WrongType {
            entity,
            field,
            expected: "a list",
        }),
    }
}

/// Parses `"m:ss"` or `"h:mm:ss"` into seconds. `None` when the text is not
/// a clock or the total does not fit in a `u32`.
pub fn parse_clock(text: &str) -> Option<u32> {
    let parts = text
        .trim()
        .split(':')
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    let (h, m, s) = match parts.as_slice() {
        [m, s] => (0, *m, *s),
        [h, m, s] => (*h, *m, *s),
        _ => return None,
    };
    h.checked_mul(3600)?
        .checked_add(m.checked_mul(60)?)?
        .checked_add(s)
}

/// Duration in seconds from either an integer `duration_seconds`, an integer
/// `duration`, or a clock-formatted `duration` string.
pub fn duration_seconds(record: &RawRecord) -> Option<u32> {
    let as_secs = |v: &Value| v.as_u64().and_then(|n| u32::try_from(n).ok());

    if let Some(secs) = record.get("duration_seconds").and_then(as_secs) {
        return Some(secs);
    }
    match record.get("duration") {
        Some(Value::String(s)) => parse_clock(s),
        Some(v) => as_secs(v),
        None => None,
    }
}
