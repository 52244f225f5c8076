//! Path templates and parameter extraction.
//!
//! A pattern is compiled once at registration time and tested against the
//! path component of every incoming request. Three kinds of dynamic segment
//! are supported:
//!
//! - `:name`  — matches exactly one non-empty segment
//! - `:name?` — like `:name`, but the segment may be absent entirely
//! - `:name+` — matches one or more trailing segments; must come last
//!
//! `/blog/:slug` against `/blog/hello-world` yields `slug = "hello-world"`;
//! `/static/:filename+` against `/static/a/b/c` yields
//! `filename = ["a", "b", "c"]`.

use std::collections::HashMap;
use std::fmt;

/// One captured parameter value.
///
/// Named (`:name`) segments capture a single segment; a catch-all (`:name+`)
/// captures the ordered remainder of the path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    Segments(Vec<String>),
}

impl ParamValue {
    /// The single captured segment, if this is a `:name` capture.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Segments(_) => None,
        }
    }

    /// The captured value with catch-all segments joined by `/`.
    pub fn joined(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Segments(parts) => parts.join("/"),
        }
    }
}

/// Parameters extracted from one matched request path.
///
/// Produced fresh per request and handed to the handler by value; nothing
/// here outlives the request that produced it.
pub type PathParams = HashMap<String, ParamValue>;

/// Error returned when a path template fails to compile.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("catch-all segment `:{0}+` must be the final segment")]
    CatchAllNotLast(String),

    #[error("pattern segment `:` is missing a parameter name")]
    EmptyParamName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    OptionalParam(String),
    CatchAll(String),
}

/// A compiled path template.
#[derive(Clone, Debug)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compiles a path template.
    ///
    /// Fails if a catch-all segment is not in final position or a `:` is not
    /// followed by a name.
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        let parts: Vec<&str> = split_path(raw).collect();

        for (i, part) in parts.iter().enumerate() {
            let last = i == parts.len() - 1;
            let segment = if let Some(spec) = part.strip_prefix(':') {
                if let Some(name) = spec.strip_suffix('+') {
                    if name.is_empty() {
                        return Err(PatternError::EmptyParamName);
                    }
                    if !last {
                        return Err(PatternError::CatchAllNotLast(name.to_owned()));
                    }
                    Segment::CatchAll(name.to_owned())
                } else if let Some(name) = spec.strip_suffix('?') {
                    if name.is_empty() {
                        return Err(PatternError::EmptyParamName);
                    }
                    Segment::OptionalParam(name.to_owned())
                } else {
                    if spec.is_empty() {
                        return Err(PatternError::EmptyParamName);
                    }
                    Segment::Param(spec.to_owned())
                }
            } else {
                Segment::Literal((*part).to_owned())
            };
            segments.push(segment);
        }

        Ok(Self { raw: raw.to_owned(), segments })
    }

    /// The template string this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Structural test against a request path. Query strings must already be
    /// stripped by the caller.
    pub fn matches(&self, path: &str) -> bool {
        self.capture(path).is_some()
    }

    /// Extracts the named parameters from a matching path.
    ///
    /// Consistent with [`matches`](Self::matches): when `matches` returns
    /// true this returns `Some` for the same input.
    pub fn extract(&self, path: &str) -> Option<PathParams> {
        self.capture(path)
    }

    fn capture(&self, path: &str) -> Option<PathParams> {
        let parts: Vec<&str> = split_path(path).collect();
        let mut params = PathParams::new();
        let mut pos = 0;

        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(lit) => {
                    if parts.get(pos) != Some(&lit.as_str()) {
                        return None;
                    }
                    pos += 1;
                }
                Segment::Param(name) => {
                    let part = parts.get(pos)?;
                    params.insert(name.clone(), ParamValue::Single((*part).to_owned()));
                    pos += 1;
                }
                Segment::OptionalParam(name) => {
                    // Absent optional segments are simply omitted from the
                    // result; remaining template segments still have to line
                    // up with what is left of the path.
                    let remaining_required = self.segments[i + 1..]
                        .iter()
                        .filter(|s| !matches!(s, Segment::OptionalParam(_)))
                        .count();
                    if let Some(part) = parts.get(pos) {
                        if parts.len() - pos > remaining_required {
                            params.insert(name.clone(), ParamValue::Single((*part).to_owned()));
                            pos += 1;
                        }
                    }
                }
                Segment::CatchAll(name) => {
                    // Greedy: one or more trailing segments.
                    if pos >= parts.len() {
                        return None;
                    }
                    let rest: Vec<String> =
                        parts[pos..].iter().map(|s| (*s).to_owned()).collect();
                    params.insert(name.clone(), ParamValue::Segments(rest));
                    pos = parts.len();
                }
            }
        }

        if pos == parts.len() { Some(params) } else { None }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Non-empty `/`-separated segments of a path. `/a//b/` and `/a/b` agree.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pattern: &str, path: &str) -> PathParams {
        Pattern::compile(pattern).unwrap().extract(path).unwrap()
    }

    #[test]
    fn literal_pattern_matches_exactly() {
        let p = Pattern::compile("/about").unwrap();
        assert!(p.matches("/about"));
        assert!(p.matches("/about/")); // trailing slash is not significant
        assert!(!p.matches("/about/team"));
        assert!(!p.matches("/contact"));
    }

    #[test]
    fn root_pattern_matches_root_only() {
        let p = Pattern::compile("/").unwrap();
        assert!(p.matches("/"));
        assert!(!p.matches("/anything"));
    }

    #[test]
    fn named_segment_captures_value() {
        let got = params("/blog/:slug", "/blog/hello-world");
        assert_eq!(got["slug"], ParamValue::Single("hello-world".to_owned()));
    }

    #[test]
    fn named_segment_requires_presence() {
        let p = Pattern::compile("/blog/:slug").unwrap();
        assert!(!p.matches("/blog"));
        assert!(!p.matches("/blog/a/b"));
    }

    #[test]
    fn optional_segment_may_be_absent() {
        let p = Pattern::compile("/blog/:slug?").unwrap();
        assert!(p.matches("/blog"));
        assert!(p.matches("/blog/hello"));

        let got = p.extract("/blog/hello").unwrap();
        assert_eq!(got["slug"], ParamValue::Single("hello".to_owned()));

        // Absent optional parameter is omitted, not empty.
        let got = p.extract("/blog").unwrap();
        assert!(!got.contains_key("slug"));
    }

    #[test]
    fn catch_all_captures_ordered_segments() {
        let got = params("/static/:filename+", "/static/a/b/c");
        assert_eq!(
            got["filename"],
            ParamValue::Segments(vec!["a".into(), "b".into(), "c".into()])
        );
        assert_eq!(got["filename"].joined(), "a/b/c");
    }

    #[test]
    fn catch_all_requires_at_least_one_segment() {
        let p = Pattern::compile("/static/:filename+").unwrap();
        assert!(!p.matches("/static"));
        assert!(p.matches("/static/readme.md"));
    }

    #[test]
    fn catch_all_must_be_final_segment() {
        assert_eq!(
            Pattern::compile("/:rest+/trailing").unwrap_err(),
            PatternError::CatchAllNotLast("rest".to_owned())
        );
    }

    #[test]
    fn empty_param_name_rejected() {
        assert_eq!(Pattern::compile("/:").unwrap_err(), PatternError::EmptyParamName);
        assert_eq!(Pattern::compile("/:+").unwrap_err(), PatternError::EmptyParamName);
        assert_eq!(Pattern::compile("/:?").unwrap_err(), PatternError::EmptyParamName);
    }

    #[test]
    fn matches_and_extract_are_consistent() {
        let cases = [
            ("/blog/:slug", "/blog/x"),
            ("/blog/:slug?", "/blog"),
            ("/a/:b/c/:d", "/a/1/c/2"),
            ("/files/:path+", "/files/x/y"),
        ];
        for (pattern, path) in cases {
            let p = Pattern::compile(pattern).unwrap();
            assert!(p.matches(path), "{pattern} should match {path}");
            assert!(p.extract(path).is_some(), "{pattern} should extract from {path}");
        }
    }

    #[test]
    fn query_string_is_callers_problem() {
        // The matcher is purely structural; the dispatcher strips queries.
        let p = Pattern::compile("/search").unwrap();
        assert!(!p.matches("/search?q=rust"));
    }

    #[test]
    fn mixed_literals_and_params() {
        let got = params("/users/:id/posts/:post", "/users/42/posts/7");
        assert_eq!(got["id"], ParamValue::Single("42".to_owned()));
        assert_eq!(got["post"], ParamValue::Single("7".to_owned()));
    }
}
