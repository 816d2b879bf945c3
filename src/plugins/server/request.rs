//! Inbound request validation

use json::{Map, Value};
use serde::Serialize;

use crate::{
  config::{Config, MAX_LOCALE_LENGTH},
  platform::Platform,
};

/// Field -> messages, in the order fields were checked.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Map<String, Value>);

impl FieldErrors {
  fn add(&mut self, field: &str, message: String) {
    let entry =
      self.0.entry(field).or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(messages) = entry {
      messages.push(Value::String(message));
    }
  }

  pub fn contains(&self, field: &str) -> bool {
    self.0.contains_key(field)
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckReq {
  pub platform: Platform,
  pub current_version: String,
  pub build_number: Option<String>,
  pub locale: Option<String>,
}

fn attribute(field: &str) -> String {
  field.replace('_', " ")
}

/// Trimmed string value; blank strings and `null` count as absent.
fn string_field(
  body: &Map<String, Value>,
  field: &str,
  errors: &mut FieldErrors,
) -> Option<String> {
  match body.get(field) {
    None | Some(Value::Null) => None,
    Some(Value::String(s)) => {
      let s = s.trim();
      (!s.is_empty()).then(|| s.to_string())
    }
    Some(_) => {
      errors.add(
        field,
        format!("The {} field must be a string.", attribute(field)),
      );
      None
    }
  }
}

fn required(
  value: Option<String>,
  field: &str,
  errors: &mut FieldErrors,
) -> Option<String> {
  if value.is_none() && !errors.contains(field) {
    errors.add(field, format!("The {} field is required.", attribute(field)));
  }
  value
}

fn max_len(
  value: Option<String>,
  max: usize,
  field: &str,
  errors: &mut FieldErrors,
) -> Option<String> {
  match value {
    Some(v) if v.chars().count() > max => {
      errors.add(
        field,
        format!(
          "The {} field must not be greater than {max} characters.",
          attribute(field)
        ),
      );
      None
    }
    other => other,
  }
}

impl CheckReq {
  /// Validates a raw request body. Anything that is not a JSON object is
  /// treated as an empty one.
  pub fn parse(body: &[u8], config: &Config) -> Result<Self, FieldErrors> {
    let body = match json::from_slice::<Value>(body) {
      Ok(Value::Object(map)) => map,
      _ => Map::new(),
    };
    let rules = &config.validation;
    let mut errors = FieldErrors::default();

    let current_version =
      string_field(&body, "current_version", &mut errors);
    let current_version =
      required(current_version, "current_version", &mut errors);
    let current_version = max_len(
      current_version,
      rules.max_version_length,
      "current_version",
      &mut errors,
    );

    let platform = string_field(&body, "platform", &mut errors);
    let platform = required(platform, "platform", &mut errors)
      .and_then(|token| match config.platforms.get(&token) {
        Some(platform) => Some(platform),
        None => {
          errors.add("platform", "The selected platform is invalid.".into());
          None
        }
      });

    let build_number = string_field(&body, "build_number", &mut errors);
    let build_number = max_len(
      build_number,
      rules.max_build_number_length,
      "build_number",
      &mut errors,
    );

    let locale = string_field(&body, "locale", &mut errors);
    let locale = max_len(locale, MAX_LOCALE_LENGTH, "locale", &mut errors);

    match (current_version, platform) {
      (Some(current_version), Some(platform)) if errors.is_empty() => {
        Ok(Self { platform, current_version, build_number, locale })
      }
      _ => Err(errors),
    }
  }
}
