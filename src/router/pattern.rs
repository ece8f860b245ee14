//! Route pattern compiler
//!
//! Turns pattern text such as `/users/:id:int/files/*rest` into an ordered list
//! of [`Segment`]s. Compilation is a pure function of the pattern text.
//!
//! ## Syntax
//!
//! | Segment        | Meaning                                              |
//! |----------------|------------------------------------------------------|
//! | `users`        | static text, matched byte-for-byte                   |
//! | `:id`          | parameter, any non-empty segment                     |
//! | `:id:int`      | parameter, optional `-` then ASCII digits            |
//! | `:ratio:float` | parameter, signed decimal number                     |
//! | `*rest`        | wildcard, one or more trailing segments (last only)  |
//! | `:rest:path`   | same as `*rest`                                      |
//!
//! Paths and patterns are split by the same rule ([`split_segments`]): one
//! leading `/` is dropped, an empty remainder means "no segments", everything
//! else is cut on `/` with empty segments preserved. Patterns additionally
//! reject empty segments anywhere but at the end, so `/users/` is a valid
//! pattern distinct from `/users` while `/users//me` is not.

use std::collections::HashSet;
use std::fmt;

use super::error::ParseError;

/// Restriction a parameter segment places on the text it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constraint {
    /// Optional `-` followed by one or more ASCII digits
    Int,
    /// Optional `-`, digits, optional `.` and digits; at least one digit
    Float,
    /// Any non-empty segment
    String,
}

impl Constraint {
    /// Every constraint, strictest first. This is the order the matcher
    /// tries parameter children in.
    pub const PRIORITY: [Constraint; 3] = [Constraint::Int, Constraint::Float, Constraint::String];

    /// Does `segment` satisfy this constraint?
    #[inline]
    #[must_use]
    pub fn accepts(self, segment: &str) -> bool {
        match self {
            Constraint::Int => is_int(segment),
            Constraint::Float => is_float(segment),
            Constraint::String => !segment.is_empty(),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Constraint::Int => 0,
            Constraint::Float => 1,
            Constraint::String => 2,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constraint::Int => "int",
            Constraint::Float => "float",
            Constraint::String => "string",
        })
    }
}

fn is_int(segment: &str) -> bool {
    let digits = segment.strip_prefix('-').unwrap_or(segment);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(segment: &str) -> bool {
    let unsigned = segment.strip_prefix('-').unwrap_or(segment);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (unsigned, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    (!whole.is_empty() || !fraction.is_empty()) && all_digits(whole) && all_digits(fraction)
}

/// One unit of a compiled route pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// Named single-segment capture
    Param { name: String, constraint: Constraint },
    /// Named capture of every remaining segment
    Wildcard { name: String },
}

impl Segment {
    /// Capture name, `None` for static segments
    #[must_use]
    pub fn param_name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param { name, .. } | Segment::Wildcard { name } => Some(name),
        }
    }
}

/// Output of [`compile`]: the segments of one pattern, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSegments {
    segments: Vec<Segment>,
}

impl CompiledSegments {
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Capture names in left-to-right order
    pub fn param_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments.iter().filter_map(Segment::param_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub(crate) fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

/// Text the segments of `path` are cut from: `path` minus one leading `/`
pub(crate) fn segment_body(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}

/// Split a path or pattern into segments
///
/// One leading `/` is ignored and an empty remainder produces no segments, so
/// `/`, `""` and `/a/b` yield `[]`, `[]` and `["a", "b"]`. Empty segments in
/// the middle or at the end are preserved (`/a//b/` yields `["a", "", "b", ""]`).
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    let body = segment_body(path);
    (!body.is_empty()).then(|| body.split('/')).into_iter().flatten()
}

/// Compile a route pattern
///
/// # Errors
///
/// - [`ParseError::Malformed`] for an empty pattern, an empty segment before
///   the last one, or a parameter/wildcard without a name
/// - [`ParseError::UnknownConstraint`] for `:name:type` with an unknown type
/// - [`ParseError::DuplicateParam`] when a capture name repeats
/// - [`ParseError::WildcardNotTerminal`] when a wildcard is not last
pub fn compile(pattern: &str) -> Result<CompiledSegments, ParseError> {
    if pattern.is_empty() {
        return Err(malformed(pattern, "pattern is empty"));
    }

    let parts: Vec<&str> = split_segments(pattern).collect();
    let mut segments = Vec::with_capacity(parts.len());
    let mut seen: HashSet<String> = HashSet::new();

    for (index, part) in parts.iter().copied().enumerate() {
        let is_last = index + 1 == parts.len();

        if let Some(Segment::Wildcard { name }) = segments.last() {
            return Err(ParseError::WildcardNotTerminal {
                pattern: pattern.to_owned(),
                name: name.clone(),
            });
        }

        if part.is_empty() && !is_last {
            return Err(malformed(pattern, "empty path segment"));
        }

        let segment = parse_segment(pattern, part)?;
        if let Some(name) = segment.param_name() {
            if !seen.insert(name.to_owned()) {
                return Err(ParseError::DuplicateParam {
                    pattern: pattern.to_owned(),
                    name: name.to_owned(),
                });
            }
        }
        segments.push(segment);
    }

    Ok(CompiledSegments { segments })
}

fn parse_segment(pattern: &str, part: &str) -> Result<Segment, ParseError> {
    if let Some(name) = part.strip_prefix('*') {
        if name.is_empty() {
            return Err(malformed(pattern, "wildcard without a name"));
        }
        return Ok(Segment::Wildcard {
            name: name.to_owned(),
        });
    }

    let Some(declared) = part.strip_prefix(':') else {
        return Ok(Segment::Static(part.to_owned()));
    };

    let (name, kind) = match declared.split_once(':') {
        Some((name, kind)) => (name, Some(kind)),
        None => (declared, None),
    };
    if name.is_empty() {
        return Err(malformed(pattern, "parameter without a name"));
    }

    let name = name.to_owned();
    match kind {
        None => Ok(Segment::Param {
            name,
            constraint: Constraint::String,
        }),
        Some("int") => Ok(Segment::Param {
            name,
            constraint: Constraint::Int,
        }),
        Some("float") => Ok(Segment::Param {
            name,
            constraint: Constraint::Float,
        }),
        Some("path") => Ok(Segment::Wildcard { name }),
        Some(other) => Err(ParseError::UnknownConstraint {
            pattern: pattern.to_owned(),
            constraint: other.to_owned(),
        }),
    }
}

fn malformed(pattern: &str, reason: &'static str) -> ParseError {
    ParseError::Malformed {
        pattern: pattern.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, constraint: Constraint) -> Segment {
        Segment::Param {
            name: name.to_string(),
            constraint,
        }
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("/").count(), 0);
        assert_eq!(split_segments("").count(), 0);
        assert_eq!(split_segments("/a/b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(split_segments("a/b").collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            split_segments("/a//b/").collect::<Vec<_>>(),
            vec!["a", "", "b", ""]
        );
    }

    #[test]
    fn test_compile_static_and_params() {
        let compiled = compile("/users/:id:int/posts/:slug").unwrap();
        assert_eq!(
            compiled.segments(),
            &[
                Segment::Static("users".to_string()),
                param("id", Constraint::Int),
                Segment::Static("posts".to_string()),
                param("slug", Constraint::String),
            ]
        );
        assert_eq!(compiled.param_names().collect::<Vec<_>>(), vec!["id", "slug"]);
    }

    #[test]
    fn test_compile_root_and_trailing_slash() {
        assert!(compile("/").unwrap().is_empty());
        let trailing = compile("/users/").unwrap();
        assert_eq!(
            trailing.segments(),
            &[
                Segment::Static("users".to_string()),
                Segment::Static(String::new())
            ]
        );
    }

    #[test]
    fn test_compile_without_leading_slash() {
        assert_eq!(compile("users/me").unwrap(), compile("/users/me").unwrap());
    }

    #[test]
    fn test_compile_wildcard_forms() {
        let star = compile("/files/*rest").unwrap();
        let path = compile("/files/:rest:path").unwrap();
        assert_eq!(star, path);
        assert_eq!(
            star.segments().last(),
            Some(&Segment::Wildcard {
                name: "rest".to_string()
            })
        );
    }

    #[test]
    fn test_compile_rejects_malformed() {
        assert!(matches!(compile(""), Err(ParseError::Malformed { .. })));
        assert!(matches!(compile("//"), Err(ParseError::Malformed { .. })));
        assert!(matches!(compile("/a//b"), Err(ParseError::Malformed { .. })));
        assert!(matches!(compile("/a/:"), Err(ParseError::Malformed { .. })));
        assert!(matches!(compile("/a/::int"), Err(ParseError::Malformed { .. })));
        assert!(matches!(compile("/a/*"), Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_compile_rejects_unknown_constraint() {
        let err = compile("/users/:id:uuid").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownConstraint {
                pattern: "/users/:id:uuid".to_string(),
                constraint: "uuid".to_string(),
            }
        );
    }

    #[test]
    fn test_compile_rejects_duplicate_param() {
        assert!(matches!(
            compile("/a/:id/b/:id:int"),
            Err(ParseError::DuplicateParam { ref name, .. }) if name == "id"
        ));
        assert!(matches!(
            compile("/a/:rest/*rest"),
            Err(ParseError::DuplicateParam { .. })
        ));
    }

    #[test]
    fn test_compile_rejects_non_terminal_wildcard() {
        assert!(matches!(
            compile("/files/*rest/meta"),
            Err(ParseError::WildcardNotTerminal { ref name, .. }) if name == "rest"
        ));
        assert!(matches!(
            compile("/files/:rest:path/:id"),
            Err(ParseError::WildcardNotTerminal { .. })
        ));
    }

    #[test]
    fn test_int_constraint() {
        for ok in ["0", "42", "-7", "007"] {
            assert!(Constraint::Int.accepts(ok), "{ok} should be an int");
        }
        for bad in ["", "-", "+1", "1.0", "abc", "4x", " 1"] {
            assert!(!Constraint::Int.accepts(bad), "{bad} should not be an int");
        }
    }

    #[test]
    fn test_float_constraint() {
        for ok in ["1", "-1", "1.5", "-0.25", ".5", "2."] {
            assert!(Constraint::Float.accepts(ok), "{ok} should be a float");
        }
        for bad in ["", ".", "-", "-.", "1e3", "1.2.3", "nan", "inf"] {
            assert!(!Constraint::Float.accepts(bad), "{bad} should not be a float");
        }
    }

    #[test]
    fn test_string_constraint() {
        assert!(Constraint::String.accepts("anything"));
        assert!(!Constraint::String.accepts(""));
    }
}
