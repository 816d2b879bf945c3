//! Release notes localization

use json::{Map, Value};
use serde::Serialize;

/// What the client receives in `release_notes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReleaseNotes {
  Text(String),
  /// Every translation, returned when the client asked for no locale.
  All(Map<String, Value>),
}

fn non_empty(value: &Value) -> Option<&str> {
  value.as_str().filter(|text| !text.trim().is_empty())
}

/// Picks release notes for `requested`, falling back to `default`, then
/// `fallback` (when it differs from `default`), then the first non-empty
/// translation in stored order. Empty and whitespace-only texts never match.
pub fn resolve(
  notes: Option<&Value>,
  requested: Option<&str>,
  default: &str,
  fallback: &str,
) -> Option<ReleaseNotes> {
  let notes = notes.and_then(Value::as_object).filter(|map| !map.is_empty())?;

  let Some(requested) = requested else {
    return Some(ReleaseNotes::All(notes.clone()));
  };

  let pick = |locale: &str| notes.get(locale).and_then(non_empty);

  pick(requested)
    .or_else(|| pick(default))
    .or_else(|| (fallback != default).then(|| pick(fallback)).flatten())
    .or_else(|| notes.values().find_map(non_empty))
    .map(|text| ReleaseNotes::Text(text.to_string()))
}
