//! Codec error taxonomy
//!
//! Every failure is local, synchronous, and permanent: the codec has no
//! transient failure mode, so callers must correct their inputs rather than
//! retry. Encode and decode errors carry a structured [`Path`] identifying
//! the failing element inside nested structures.

use std::fmt;

use quartz_primitives::U256;
use thiserror::Error;

/// One step into a nested value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Positional index into a parameter list or array
    Index(usize),
    /// Named tuple component
    Field(String),
}

/// Ordered index/field chain identifying an element in a nested structure
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The root path (the parameter list itself)
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Build a path from collected segments
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }

    /// The segments from outermost to innermost
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// True when the path points at the parameter list itself
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Index(i) => write!(f, "[{}]", i)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// Failure to parse a type signature or parameter description
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The base type name is not part of the ABI grammar
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// The signature does not match the `base[arraySuffix]*` grammar
    #[error("malformed type signature: {0}")]
    Malformed(String),

    /// A numeric suffix outside the allowed range
    #[error("invalid size {size} for {base}")]
    InvalidSize {
        /// Base type name the suffix was attached to
        base: String,
        /// The disallowed size
        size: usize,
    },

    /// `components` supplied for a base type that is not `tuple`
    #[error("components found but type is not tuple: {0}")]
    ComponentsOnNonTuple(String),

    /// A parameter description with an unusable JSON shape
    #[error("invalid parameter description: {0}")]
    InvalidParameter(String),
}

/// What went wrong while encoding a single element
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// Number of values does not match the number of declared types
    #[error("parameter count mismatch: {expected} types, {actual} values")]
    ParameterCount {
        /// Declared type count
        expected: usize,
        /// Supplied value count
        actual: usize,
    },

    /// The value's shape does not fit the declared type
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Canonical declared type
        expected: String,
        /// Description of the supplied value
        actual: String,
    },

    /// Numeric value exceeds the declared bit width, or an ambiguous
    /// numeric form (float, unsupported notation) was supplied
    #[error("value {value} out of range for {ty}")]
    ValueOutOfRange {
        /// Canonical declared type
        ty: String,
        /// The offending value, rendered
        value: String,
    },

    /// Address value is not exactly 20 bytes
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Fixed-bytes value longer than its declared width
    #[error("value of {actual} bytes exceeds bytes{max}")]
    OversizedBytes {
        /// Declared byte width
        max: usize,
        /// Supplied byte length
        actual: usize,
    },

    /// Fixed-size array or tuple with the wrong element count
    #[error("length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch {
        /// Declared element count
        expected: usize,
        /// Supplied element count
        actual: usize,
    },

    /// A byte value was not valid hexadecimal
    #[error("invalid hex value: {0}")]
    InvalidHex(String),

    /// A name-keyed tuple value is missing a declared component
    #[error("missing tuple field: {0}")]
    MissingField(String),
}

/// Encoding failure, annotated with the path of the failing element
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("encode error at {path}: {kind}")]
pub struct EncodeError {
    /// What failed
    pub kind: EncodeErrorKind,
    /// Where it failed
    pub path: Path,
}

impl EncodeError {
    /// Construct from a kind and collected path segments
    pub fn new(kind: EncodeErrorKind, segments: &[PathSegment]) -> Self {
        EncodeError {
            kind,
            path: Path::from_segments(segments.to_vec()),
        }
    }

    /// Construct at the root path
    pub fn at_root(kind: EncodeErrorKind) -> Self {
        EncodeError {
            kind,
            path: Path::root(),
        }
    }
}

/// What went wrong while decoding a single element
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The buffer ends before the element's words do
    #[error("buffer too short: need {needed} bytes, have {have}")]
    BufferTooShort {
        /// Bytes required to read the element
        needed: usize,
        /// Bytes actually available
        have: usize,
    },

    /// A head slot's offset points outside the enclosing frame
    #[error("offset {offset} out of bounds for frame of {frame} bytes")]
    OffsetOutOfBounds {
        /// The offset word's value
        offset: U256,
        /// Size of the enclosing frame
        frame: usize,
    },

    /// A length word that cannot be satisfied by the remaining bytes
    #[error("length {length} out of bounds for {available} available bytes")]
    LengthOutOfBounds {
        /// The length word's value
        length: U256,
        /// Bytes available for the payload
        available: usize,
    },

    /// String payload is not valid UTF-8
    #[error("invalid utf-8 in string payload: {0}")]
    InvalidUtf8(String),

    /// Hex input could not be parsed
    #[error("invalid hex input: {0}")]
    InvalidHex(String),

    /// Number of indexed parameters does not match the available topics
    #[error("topic count mismatch: {expected} indexed parameters, {actual} topics")]
    TopicCount {
        /// Indexed parameter count
        expected: usize,
        /// Topics available after the signature topic
        actual: usize,
    },
}

/// Decoding failure, annotated with the path of the failing element
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("decode error at {path}: {kind}")]
pub struct DecodeError {
    /// What failed
    pub kind: DecodeErrorKind,
    /// Where it failed
    pub path: Path,
}

impl DecodeError {
    /// Construct from a kind and collected path segments
    pub fn new(kind: DecodeErrorKind, segments: &[PathSegment]) -> Self {
        DecodeError {
            kind,
            path: Path::from_segments(segments.to_vec()),
        }
    }

    /// Construct at the root path
    pub fn at_root(kind: DecodeErrorKind) -> Self {
        DecodeError {
            kind,
            path: Path::root(),
        }
    }
}

/// Umbrella error for the whole codec
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Malformed type signature or parameter description
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Encoding failure
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding failure
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Selector/signature request on something that is not a named
    /// function or event fragment
    #[error("invalid fragment: {0}")]
    InvalidFragment(String),
}
