//! Resource ID parsing and formatting
//!
//! Azure Resource Manager identifies every resource by a slash-delimited
//! path such as
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Search/searchServices/{name}`.
//! Each typed ID in this crate declares the shape of that path as a list of
//! [`Segment`]s and gets parsing and formatting from the [`ResourceId`] trait.
//!
//! Static segments (`subscriptions`, `providers`, `Microsoft.AVS`, ...) must
//! match exactly, including case. Values are kept verbatim so that
//! `T::parse(&id.id())` always yields `id` again.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// One component of a resource ID path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// A fixed key that must appear exactly as written.
    Static(&'static str),
    /// A user-supplied value, named for error messages and lookup.
    Value(&'static str),
}

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdErrorKind {
    #[error("the ID is empty")]
    Empty,

    #[error("the ID must start with '/'")]
    MissingLeadingSlash,

    #[error("expected the segment {expected:?} but got {found:?}")]
    UnexpectedSegment {
        expected: &'static str,
        found: String,
    },

    #[error("the ID is missing the segment {0:?}")]
    MissingSegment(&'static str),

    #[error("the value for the segment {0:?} is empty")]
    EmptyValue(&'static str),

    #[error("unexpected trailing segments {0:?}")]
    TrailingSegments(String),
}

/// Error returned when an input string is not a valid ID of the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parsing {description} ID {input:?}: {kind}")]
pub struct IdError {
    pub description: &'static str,
    pub input: String,
    pub kind: IdErrorKind,
}

/// Values extracted by [`parse_segments`], keyed by segment name.
#[derive(Debug, Clone)]
pub struct ParsedId {
    description: &'static str,
    input: String,
    values: HashMap<&'static str, String>,
}

impl ParsedId {
    /// Take the value for a named segment.
    pub fn take(&mut self, name: &'static str) -> Result<String, IdError> {
        self.values.remove(name).ok_or_else(|| IdError {
            description: self.description,
            input: self.input.clone(),
            kind: IdErrorKind::MissingSegment(name),
        })
    }
}

/// Match `input` against `segments`.
pub fn parse_segments(
    description: &'static str,
    segments: &[Segment],
    input: &str,
) -> Result<ParsedId, IdError> {
    let fail = |kind| IdError {
        description,
        input: input.to_string(),
        kind,
    };

    if input.is_empty() {
        return Err(fail(IdErrorKind::Empty));
    }
    let Some(path) = input.strip_prefix('/') else {
        return Err(fail(IdErrorKind::MissingLeadingSlash));
    };

    let mut parts = path.split('/');
    let mut values = HashMap::new();

    for segment in segments {
        match *segment {
            Segment::Static(expected) => match parts.next() {
                Some(found) if found == expected => {},
                Some(found) => {
                    return Err(fail(IdErrorKind::UnexpectedSegment {
                        expected,
                        found: found.to_string(),
                    }))
                },
                None => return Err(fail(IdErrorKind::MissingSegment(expected))),
            },
            Segment::Value(name) => match parts.next() {
                Some("") => return Err(fail(IdErrorKind::EmptyValue(name))),
                Some(value) => {
                    values.insert(name, value.to_string());
                },
                None => return Err(fail(IdErrorKind::MissingSegment(name))),
            },
        }
    }

    let rest: Vec<&str> = parts.collect();
    if !rest.is_empty() {
        return Err(fail(IdErrorKind::TrailingSegments(rest.join("/"))));
    }

    Ok(ParsedId {
        description,
        input: input.to_string(),
        values,
    })
}

/// Render `segments` with `values` substituted in order.
pub fn format_segments(segments: &[Segment], values: &[&str]) -> String {
    let mut values = values.iter();
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        match segment {
            Segment::Static(key) => out.push_str(key),
            Segment::Value(_) => out.push_str(values.next().copied().unwrap_or_default()),
        }
    }
    out
}

/// A strongly typed Azure resource ID.
pub trait ResourceId: Sized + fmt::Display {
    /// Human name used in errors, e.g. "Search Service".
    const DESCRIPTION: &'static str;

    /// Shape of the canonical path.
    const SEGMENTS: &'static [Segment];

    /// Build the typed ID from the parsed values.
    fn from_parsed(parsed: ParsedId) -> Result<Self, IdError>;

    /// Values for every [`Segment::Value`], in path order.
    fn segment_values(&self) -> Vec<&str>;

    /// Parse the canonical string form.
    fn parse(input: &str) -> Result<Self, IdError> {
        Self::from_parsed(parse_segments(Self::DESCRIPTION, Self::SEGMENTS, input)?)
    }

    /// Canonical string form understood by ARM.
    fn id(&self) -> String {
        format_segments(Self::SEGMENTS, &self.segment_values())
    }
}

/// Schema validator adapter: accepts strings that parse as `T`.
pub fn validate_resource_id<T: ResourceId>(value: &str) -> Result<(), String> {
    T::parse(value).map(|_| ()).map_err(|e| e.to_string())
}

/// Write the `Description (Key: "value" / ...)` form used in log and error messages.
pub fn describe(
    f: &mut fmt::Formatter<'_>,
    description: &str,
    components: &[(&str, &str)],
) -> fmt::Result {
    write!(f, "{} (", description)?;
    for (i, (key, value)) in components.iter().enumerate() {
        if i > 0 {
            f.write_str(" / ")?;
        }
        write!(f, "{}: {:?}", key, value)?;
    }
    f.write_str(")")
}
