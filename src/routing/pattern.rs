//! Route pattern compilation and matching.
//!
//! A pattern such as `/user/<id>/profile` is split on `/` into segments once,
//! when the route table is built. A segment is either literal text, matched
//! exactly, or a `<name>` placeholder matching one non-empty segment. No
//! regex is involved and matching is a single pass over the path.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("route pattern {0:?} must start with '/'")]
    MissingLeadingSlash(String),
    #[error("route pattern {pattern:?} has an empty placeholder")]
    EmptyPlaceholder { pattern: String },
    #[error("route pattern {pattern:?} uses placeholder <{name}> more than once")]
    DuplicatePlaceholder { pattern: String, name: String },
    #[error("route pattern {pattern:?} has a malformed segment {segment:?}")]
    MalformedSegment { pattern: String, segment: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let rest = pattern
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

        let mut segments = Vec::new();
        for raw in rest.split('/') {
            segments.push(compile_segment(pattern, raw)?);
        }

        let mut seen = Vec::new();
        for segment in &segments {
            if let Segment::Capture(name) = segment {
                if seen.contains(&name) {
                    return Err(PatternError::DuplicatePlaceholder {
                        pattern: pattern.to_string(),
                        name: name.clone(),
                    });
                }
                seen.push(name);
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Names of the placeholders, in pattern order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Capture(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Matches the whole of `path` and returns the captured parameters.
    ///
    /// ```
    /// # use plainweb::routing::pattern::RoutePattern;
    /// let pattern = RoutePattern::compile("/user/<id>/profile").unwrap();
    /// let params = pattern.matches("/user/42/profile").unwrap();
    /// assert_eq!(params["id"], "42");
    /// assert!(pattern.matches("/user/42").is_none());
    /// ```
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let rest = path.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let mut params = HashMap::new();

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(text) if text == part => {}
                Segment::Literal(_) => return None,
                Segment::Capture(_) if part.is_empty() => return None,
                Segment::Capture(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        // Prefix matches do not count
        if parts.next().is_some() {
            return None;
        }

        Some(params)
    }
}

fn compile_segment(pattern: &str, raw: &str) -> Result<Segment, PatternError> {
    let malformed = || PatternError::MalformedSegment {
        pattern: pattern.to_string(),
        segment: raw.to_string(),
    };

    match raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        Some("") => Err(PatternError::EmptyPlaceholder {
            pattern: pattern.to_string(),
        }),
        Some(name) if name.contains(['<', '>']) => Err(malformed()),
        Some(name) => Ok(Segment::Capture(name.to_string())),
        None if raw.contains(['<', '>']) => Err(malformed()),
        None => Ok(Segment::Literal(raw.to_string())),
    }
}
