//! Platform registry built from configuration
//!
//! Platforms are not a fixed enum: deployments can add their own tokens
//! (`huawei`, `web`, ...). The registry is built once at startup and is the
//! only way to obtain a [`Platform`], so a `Platform` value is always known.

use std::fmt;

use anyhow::{bail, ensure};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Platform(String);

impl Platform {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDef {
  pub token: String,
  pub label: String,
}

impl PlatformDef {
  pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
    Self { token: token.into(), label: label.into() }
  }
}

#[derive(Debug, Clone)]
pub struct Platforms {
  defs: Vec<PlatformDef>,
  wildcard: PlatformDef,
}

impl Default for Platforms {
  fn default() -> Self {
    Self {
      defs: vec![
        PlatformDef::new("ios", "iOS"),
        PlatformDef::new("android", "Android"),
      ],
      wildcard: PlatformDef::new("all", "All Platforms"),
    }
  }
}

fn valid_token(token: &str) -> bool {
  !token.is_empty()
    && token.bytes().all(|b| {
      b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-'
    })
}

impl Platforms {
  pub fn new(
    defs: Vec<PlatformDef>,
    wildcard: PlatformDef,
  ) -> anyhow::Result<Self> {
    ensure!(!defs.is_empty(), "at least one platform must be configured");

    let mut seen = std::collections::HashSet::new();
    for def in defs.iter().chain(std::iter::once(&wildcard)) {
      if !valid_token(&def.token) {
        bail!("invalid platform token `{}`", def.token);
      }
      if !seen.insert(def.token.as_str()) {
        bail!("duplicate platform token `{}`", def.token);
      }
    }

    Ok(Self { defs, wildcard })
  }

  /// Parses `ios:iOS,android:Android`. A missing label reuses the token.
  pub fn parse_list(list: &str) -> anyhow::Result<Vec<PlatformDef>> {
    list
      .split(',')
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(|item| {
        let (token, label) = match item.split_once(':') {
          Some((token, label)) => (token.trim(), label.trim()),
          None => (item, item),
        };
        ensure!(!token.is_empty(), "empty platform token in `{item}`");
        Ok(PlatformDef::new(token, label))
      })
      .collect()
  }

  pub fn get(&self, token: &str) -> Option<Platform> {
    self
      .defs()
      .find(|def| def.token == token)
      .map(|def| Platform(def.token.clone()))
  }

  pub fn wildcard(&self) -> Platform {
    Platform(self.wildcard.token.clone())
  }

  pub fn label<'a>(&'a self, platform: &'a Platform) -> &'a str {
    self
      .defs()
      .find(|def| def.token == platform.0)
      .map(|def| def.label.as_str())
      .unwrap_or(platform.as_str())
  }

  /// Every accepted token, configured platforms first and the wildcard last.
  pub fn defs(&self) -> impl Iterator<Item = &PlatformDef> {
    self.defs.iter().chain(std::iter::once(&self.wildcard))
  }

  pub fn values(&self) -> Vec<&str> {
    self.defs().map(|def| def.token.as_str()).collect()
  }
}
