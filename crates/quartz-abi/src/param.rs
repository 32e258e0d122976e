//! Type descriptors
//!
//! [`ParamType`] is the recursive, structural description of an ABI type;
//! [`Param`] pairs it with a parameter name and event index flag. Descriptor
//! trees are immutable once built and may be cached and shared read-only
//! across threads.

use std::fmt;

/// Structural description of a single ABI type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    /// 20-byte address
    Address,
    /// Unsigned integer with bit width (8, 16, ..., 256)
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    /// Boolean
    Bool,
    /// Dynamic byte sequence
    Bytes,
    /// Fixed-size bytes (width 1-32)
    FixedBytes(usize),
    /// UTF-8 string
    String,
    /// Dynamic-length array
    Array(Box<ParamType>),
    /// Fixed-length array
    FixedArray(Box<ParamType>, usize),
    /// Tuple with named, ordered components
    Tuple(Vec<Param>),
}

/// A named parameter: descriptor plus name and event index flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// Parameter or component name; empty when unnamed
    pub name: String,
    /// Type descriptor
    pub kind: ParamType,
    /// True for event parameters carried in log topics
    pub indexed: bool,
}

impl Param {
    /// Create a named parameter
    pub fn new(name: impl Into<String>, kind: ParamType) -> Self {
        Param {
            name: name.into(),
            kind,
            indexed: false,
        }
    }

    /// Create an unnamed parameter
    pub fn unnamed(kind: ParamType) -> Self {
        Param {
            name: String::new(),
            kind,
            indexed: false,
        }
    }
}

impl ParamType {
    /// A type is dynamic iff it is `string`, `bytes`, a dynamic-length
    /// array, or transitively contains a dynamic component.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(inner, _) => inner.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(|c| c.kind.is_dynamic()),
            _ => false,
        }
    }

    /// Static byte footprint of a non-dynamic type. Only meaningful when
    /// `is_dynamic()` is false.
    pub fn static_size(&self) -> usize {
        match self {
            ParamType::FixedArray(inner, size) if !inner.is_dynamic() => {
                inner.static_size() * size
            }
            ParamType::Tuple(components) if !self.is_dynamic() => {
                components.iter().map(|c| c.kind.static_size()).sum()
            }
            _ => 32,
        }
    }

    /// Bytes this type occupies in the head: one offset word when dynamic,
    /// the full static footprint otherwise.
    pub fn head_size(&self) -> usize {
        if self.is_dynamic() {
            32
        } else {
            self.static_size()
        }
    }
}

impl fmt::Display for ParamType {
    /// Canonical type rendering: fully expanded tuples, no names, no
    /// whitespace. This is the form hashed for selectors and topics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::String => write!(f, "string"),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
            ParamType::FixedArray(inner, size) => write!(f, "{}[{}]", inner, size),
            ParamType::Tuple(components) => {
                write!(f, "(")?;
                for (i, component) in components.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", component.kind)?;
                }
                write!(f, ")")
            }
        }
    }
}
