//! Semantic version validation and ordering

use std::cmp::Ordering;

use semver::Version;

/// Strict semver 2.0.0 check. `1.0`, `v1.0.0` and `1.0.0-` are rejected.
pub fn validate(version: &str) -> bool {
  Version::parse(version).is_ok()
}

/// Precedence per semver 2.0.0: numeric core, then prerelease (a prerelease
/// sorts below its release). Build metadata is ignored.
pub fn precedence(a: &Version, b: &Version) -> Ordering {
  (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

/// Compares two strict semver strings, `None` if either does not parse.
pub fn compare(a: &str, b: &str) -> Option<Ordering> {
  let a = Version::parse(a).ok()?;
  let b = Version::parse(b).ok()?;
  Some(precedence(&a, &b))
}

/// Accepts what clients commonly send when strict validation is off:
/// a leading `v` and partial versions.
///
/// - "1" -> 1.0.0
/// - "v1.2" -> 1.2.0
/// - "1.2.3-rc.1" -> 1.2.3-rc.1
pub fn parse_lenient(version: &str) -> Option<Version> {
  let version = version.trim();
  let version = version
    .strip_prefix('v')
    .or_else(|| version.strip_prefix('V'))
    .unwrap_or(version);

  if let Ok(parsed) = Version::parse(version) {
    return Some(parsed);
  }

  let core_end = version.find(['-', '+']).unwrap_or(version.len());
  let (core, rest) = version.split_at(core_end);
  let normalized = match core.split('.').count() {
    1 => format!("{core}.0.0{rest}"),
    2 => format!("{core}.0{rest}"),
    _ => return None,
  };
  Version::parse(&normalized).ok()
}

/// Like [`compare`], but tolerant of non-canonical input.
pub fn compare_lenient(a: &str, b: &str) -> Option<Ordering> {
  let a = parse_lenient(a)?;
  let b = parse_lenient(b)?;
  Some(precedence(&a, &b))
}
