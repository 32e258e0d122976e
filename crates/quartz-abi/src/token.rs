//! Value trees
//!
//! [`Token`] mirrors the shape of [`ParamType`](crate::param::ParamType).
//! Loosely-typed inputs (plain JSON numbers, decimal strings, hex strings,
//! name-keyed tuple objects) are normalized into tokens at the encoder
//! boundary by [`Token::from_json`]; ambiguous forms such as floats are
//! rejected, never coerced.

use std::fmt;

use quartz_primitives::{Address, U256};
use serde_json::Value;

use crate::error::{EncodeError, EncodeErrorKind, PathSegment};
use crate::param::ParamType;

/// Signed 256-bit integer in sign-magnitude form.
///
/// Two's-complement conversion happens only at the wire boundary, so the
/// in-memory value is always `(magnitude, sign)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct I256 {
    /// Absolute value
    pub abs: U256,
    /// True when the value is negative
    pub negative: bool,
}

impl I256 {
    /// Create from magnitude and sign; negative zero normalizes to zero
    pub fn new(abs: U256, negative: bool) -> Self {
        I256 {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from a native signed integer
    pub fn from_i128(value: i128) -> Self {
        if value < 0 {
            I256 {
                abs: U256::from(value.unsigned_abs()),
                negative: true,
            }
        } else {
            I256 {
                abs: U256::from(value as u128),
                negative: false,
            }
        }
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// A typed ABI value, mirroring the descriptor tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// 20-byte address
    Address(Address),
    /// Unsigned integer
    Uint(U256),
    /// Signed integer
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Dynamic byte sequence
    Bytes(Vec<u8>),
    /// Fixed-size bytes
    FixedBytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Dynamic-length array
    Array(Vec<Token>),
    /// Fixed-length array
    FixedArray(Vec<Token>),
    /// Ordered tuple
    Tuple(Vec<Token>),
}

impl Token {
    /// Short description of the token's shape, used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::Uint(_) => "uint",
            Token::Int(_) => "int",
            Token::Bool(_) => "bool",
            Token::Bytes(_) => "bytes",
            Token::FixedBytes(_) => "fixed bytes",
            Token::String(_) => "string",
            Token::Array(_) => "array",
            Token::FixedArray(_) => "fixed array",
            Token::Tuple(_) => "tuple",
        }
    }

    /// Normalize a loosely-typed JSON value against a descriptor.
    ///
    /// `path` carries the segments walked so far; errors snapshot it.
    pub fn from_json(
        kind: &ParamType,
        value: &Value,
        path: &mut Vec<PathSegment>,
    ) -> Result<Token, EncodeError> {
        match kind {
            ParamType::Address => coerce_address(value, path),
            ParamType::Uint(_) => coerce_uint(kind, value, path),
            ParamType::Int(_) => coerce_int(kind, value, path),
            ParamType::Bool => coerce_bool(value, path),
            ParamType::Bytes => coerce_bytes(value, path),
            ParamType::FixedBytes(len) => coerce_fixed_bytes(*len, value, path),
            ParamType::String => match value {
                Value::String(s) => Ok(Token::String(s.clone())),
                other => Err(mismatch(kind, other, path)),
            },
            ParamType::Array(inner) => match value {
                Value::Array(items) => {
                    let tokens = coerce_sequence(inner, items, path)?;
                    Ok(Token::Array(tokens))
                }
                other => Err(mismatch(kind, other, path)),
            },
            ParamType::FixedArray(inner, size) => match value {
                Value::Array(items) => {
                    if items.len() != *size {
                        return Err(EncodeError::new(
                            EncodeErrorKind::LengthMismatch {
                                expected: *size,
                                actual: items.len(),
                            },
                            path,
                        ));
                    }
                    let tokens = coerce_sequence(inner, items, path)?;
                    Ok(Token::FixedArray(tokens))
                }
                other => Err(mismatch(kind, other, path)),
            },
            ParamType::Tuple(components) => match value {
                Value::Array(items) => {
                    if items.len() != components.len() {
                        return Err(EncodeError::new(
                            EncodeErrorKind::LengthMismatch {
                                expected: components.len(),
                                actual: items.len(),
                            },
                            path,
                        ));
                    }
                    let mut tokens = Vec::with_capacity(components.len());
                    for (i, (component, item)) in components.iter().zip(items).enumerate() {
                        path.push(PathSegment::Index(i));
                        let token = Token::from_json(&component.kind, item, path)?;
                        path.pop();
                        tokens.push(token);
                    }
                    Ok(Token::Tuple(tokens))
                }
                Value::Object(map) => {
                    let mut tokens = Vec::with_capacity(components.len());
                    for component in components {
                        let item = map.get(&component.name).ok_or_else(|| {
                            EncodeError::new(
                                EncodeErrorKind::MissingField(component.name.clone()),
                                path,
                            )
                        })?;
                        path.push(PathSegment::Field(component.name.clone()));
                        let token = Token::from_json(&component.kind, item, path)?;
                        path.pop();
                        tokens.push(token);
                    }
                    Ok(Token::Tuple(tokens))
                }
                other => Err(mismatch(kind, other, path)),
            },
        }
    }
}

fn coerce_sequence(
    inner: &ParamType,
    items: &[Value],
    path: &mut Vec<PathSegment>,
) -> Result<Vec<Token>, EncodeError> {
    let mut tokens = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        path.push(PathSegment::Index(i));
        let token = Token::from_json(inner, item, path)?;
        path.pop();
        tokens.push(token);
    }
    Ok(tokens)
}

fn mismatch(kind: &ParamType, value: &Value, path: &[PathSegment]) -> EncodeError {
    EncodeError::new(
        EncodeErrorKind::TypeMismatch {
            expected: kind.to_string(),
            actual: json_shape(value).to_string(),
        },
        path,
    )
}

fn json_shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn out_of_range(kind: &ParamType, value: &Value, path: &[PathSegment]) -> EncodeError {
    EncodeError::new(
        EncodeErrorKind::ValueOutOfRange {
            ty: kind.to_string(),
            value: value.to_string(),
        },
        path,
    )
}

fn coerce_address(value: &Value, path: &[PathSegment]) -> Result<Token, EncodeError> {
    match value {
        Value::String(s) => Address::from_hex(s)
            .map(Token::Address)
            .map_err(|_| EncodeError::new(EncodeErrorKind::InvalidAddress(s.clone()), path)),
        other => Err(EncodeError::new(
            EncodeErrorKind::InvalidAddress(other.to_string()),
            path,
        )),
    }
}

fn coerce_uint(
    kind: &ParamType,
    value: &Value,
    path: &[PathSegment],
) -> Result<Token, EncodeError> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(v) => Ok(Token::Uint(U256::from(v))),
            // floats and negative numbers are ambiguous, never coerced
            None => Err(out_of_range(kind, value, path)),
        },
        Value::String(s) => parse_u256(s)
            .map(Token::Uint)
            .ok_or_else(|| out_of_range(kind, value, path)),
        other => Err(mismatch(kind, other, path)),
    }
}

fn coerce_int(
    kind: &ParamType,
    value: &Value,
    path: &[PathSegment],
) -> Result<Token, EncodeError> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => Ok(Token::Int(I256::from_i128(v as i128))),
            None => Err(out_of_range(kind, value, path)),
        },
        Value::String(s) => {
            let (digits, negative) = match s.strip_prefix('-') {
                Some(rest) => (rest, true),
                None => (s.as_str(), false),
            };
            if negative && (digits.starts_with("0x") || digits.starts_with("0X")) {
                // negative hex notation is ambiguous
                return Err(out_of_range(kind, value, path));
            }
            parse_u256(digits)
                .map(|abs| Token::Int(I256::new(abs, negative)))
                .ok_or_else(|| out_of_range(kind, value, path))
        }
        other => Err(mismatch(kind, other, path)),
    }
}

fn coerce_bool(value: &Value, path: &[PathSegment]) -> Result<Token, EncodeError> {
    match value {
        Value::Bool(b) => Ok(Token::Bool(*b)),
        Value::String(s) if s == "true" => Ok(Token::Bool(true)),
        Value::String(s) if s == "false" => Ok(Token::Bool(false)),
        Value::Number(n) if n.as_u64() == Some(0) => Ok(Token::Bool(false)),
        Value::Number(n) if n.as_u64() == Some(1) => Ok(Token::Bool(true)),
        other => Err(mismatch(&ParamType::Bool, other, path)),
    }
}

/// Strip an optional `0x`/`0X` prefix; hex input is case-insensitive.
fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn coerce_bytes(value: &Value, path: &[PathSegment]) -> Result<Token, EncodeError> {
    match value {
        Value::String(s) => {
            let stripped = strip_hex_prefix(s);
            hex::decode(stripped)
                .map(Token::Bytes)
                .map_err(|_| EncodeError::new(EncodeErrorKind::InvalidHex(s.clone()), path))
        }
        other => Err(mismatch(&ParamType::Bytes, other, path)),
    }
}

fn coerce_fixed_bytes(
    len: usize,
    value: &Value,
    path: &[PathSegment],
) -> Result<Token, EncodeError> {
    match value {
        Value::String(s) => {
            let stripped = strip_hex_prefix(s);
            // fixed bytes are left-aligned, so an odd nibble count pads on
            // the right
            let padded;
            let even = if stripped.len() % 2 == 1 {
                padded = format!("{}0", stripped);
                padded.as_str()
            } else {
                stripped
            };
            let bytes = hex::decode(even)
                .map_err(|_| EncodeError::new(EncodeErrorKind::InvalidHex(s.clone()), path))?;
            if bytes.len() > len {
                return Err(EncodeError::new(
                    EncodeErrorKind::OversizedBytes {
                        max: len,
                        actual: bytes.len(),
                    },
                    path,
                ));
            }
            Ok(Token::FixedBytes(bytes))
        }
        other => Err(mismatch(&ParamType::FixedBytes(len), other, path)),
    }
}

/// Parse an unsigned 256-bit integer from a decimal or `0x`-hex string.
fn parse_u256(s: &str) -> Option<U256> {
    let s = s.trim();
    if s.starts_with("0x") || s.starts_with("0X") {
        let hex_digits = strip_hex_prefix(s);
        if hex_digits.is_empty() || hex_digits.len() > 64 {
            return None;
        }
        let padded = if hex_digits.len() % 2 == 1 {
            format!("0{}", hex_digits)
        } else {
            hex_digits.to_string()
        };
        let bytes = hex::decode(&padded).ok()?;
        Some(U256::from_big_endian(&bytes))
    } else {
        U256::from_dec_str(s).ok()
    }
}
