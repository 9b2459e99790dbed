//! Path matching logic.
//!
//! # Responsibilities
//! - Parse path templates (`/images/{name}/json`) once at startup
//! - Match request paths segment by segment
//! - Recognize the `/v<major>.<minor>` API version prefix
//!
//! # Design Decisions
//! - Matching is case-sensitive and exact: no trailing-slash or
//!   empty-segment leniency
//! - A `{param}` segment matches any non-empty segment (never a `/`), except
//!   dot segments and encoded slashes, which could steer the forwarded path
//!   outside the template
//! - No regex to guarantee O(n) matching

use std::fmt;

/// One segment of a compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: &'static str,
    segments: Vec<Segment>,
}

impl PathTemplate {
    /// Compile a template. Templates are compiled-in constants; a malformed one
    /// is a programming error caught by the registry tests.
    pub fn new(source: &'static str) -> Self {
        let segments = source
            .strip_prefix('/')
            .unwrap_or(source)
            .split('/')
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(seg.to_string()),
            })
            .collect();
        Self { source, segments }
    }

    /// The template as written in the registry.
    pub fn as_str(&self) -> &'static str {
        self.source
    }

    /// Match a request path, returning captured parameters on success.
    pub fn matches<'p>(&self, path: &'p str) -> Option<Vec<(String, &'p str)>> {
        let rest = path.strip_prefix('/')?;
        let mut captures = Vec::new();
        let mut parts = rest.split('/');

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(lit) => {
                    if part != lit {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() || escapes_segment(part) {
                        return None;
                    }
                    captures.push((name.clone(), part));
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(captures)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

/// True for `.`, `..` (also percent-encoded) and anything holding an
/// encoded `/` or `\`.
fn escapes_segment(part: &str) -> bool {
    let lower = part.to_ascii_lowercase();
    if lower.contains("%2f") || lower.contains("%5c") {
        return true;
    }
    matches!(lower.replace("%2e", ".").as_str(), "." | "..")
}

/// An API version prefix such as `v1.24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.major, self.minor)
    }
}

/// Split a `/v<digits>.<digits>/rest` path into its version and the
/// remaining path (which keeps its leading `/`).
///
/// Returns `None` when the first segment is not a version; the version is
/// never checked against any real API version list.
pub fn split_version_prefix(path: &str) -> Option<(ApiVersion, &str)> {
    let rest = path.strip_prefix("/v")?;
    let end = rest.find('/')?;
    let (version, remainder) = rest.split_at(end);
    let (major, minor) = version.split_once('.')?;
    Some((
        ApiVersion {
            major: parse_digits(major)?,
            minor: parse_digits(minor)?,
        },
        remainder,
    ))
}

fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Absurdly long digit runs still form a syntactically valid prefix.
    Some(s.parse().unwrap_or(u32::MAX))
}
