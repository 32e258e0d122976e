//! ABI encoding
//!
//! Head/tail encoder: static values are written inline in the head, dynamic
//! values get an offset word in the head and their payload appended to the
//! tail. Offsets are relative to the start of the enclosing tuple or array
//! frame. Encoding is pure and never mutates its inputs; it either fully
//! succeeds or fails atomically with a path-annotated error.

use quartz_primitives::U256;

use crate::error::{EncodeError, EncodeErrorKind, PathSegment};
use crate::param::{Param, ParamType};
use crate::token::{I256, Token};

/// Encode a parameter list into canonical ABI bytes.
pub fn encode(params: &[Param], tokens: &[Token]) -> Result<Vec<u8>, EncodeError> {
    if params.len() != tokens.len() {
        return Err(EncodeError::at_root(EncodeErrorKind::ParameterCount {
            expected: params.len(),
            actual: tokens.len(),
        }));
    }
    let mut path = Vec::new();
    encode_params(params, tokens, &mut path)
}

/// Encode a function call: 4-byte selector followed by the encoded arguments.
pub fn encode_function_call_data(
    selector: [u8; 4],
    params: &[Param],
    tokens: &[Token],
) -> Result<Vec<u8>, EncodeError> {
    let mut data = selector.to_vec();
    data.extend(encode(params, tokens)?);
    Ok(data)
}

fn encode_params(
    params: &[Param],
    tokens: &[Token],
    path: &mut Vec<PathSegment>,
) -> Result<Vec<u8>, EncodeError> {
    let head_size: usize = params.iter().map(|p| p.kind.head_size()).sum();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (i, (param, token)) in params.iter().zip(tokens).enumerate() {
        if param.name.is_empty() {
            path.push(PathSegment::Index(i));
        } else {
            path.push(PathSegment::Field(param.name.clone()));
        }
        if param.kind.is_dynamic() {
            head.extend_from_slice(&u256_word(&U256::from(head_size + tail.len())));
            tail.extend(encode_token(&param.kind, token, path)?);
        } else {
            head.extend(encode_token(&param.kind, token, path)?);
        }
        path.pop();
    }

    head.extend(tail);
    Ok(head)
}

/// Encode a homogeneous run of array elements with its own head/tail frame.
fn encode_sequence(
    inner: &ParamType,
    tokens: &[Token],
    path: &mut Vec<PathSegment>,
) -> Result<Vec<u8>, EncodeError> {
    let head_size = inner.head_size() * tokens.len();

    let mut head = Vec::with_capacity(head_size);
    let mut tail = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        path.push(PathSegment::Index(i));
        if inner.is_dynamic() {
            head.extend_from_slice(&u256_word(&U256::from(head_size + tail.len())));
            tail.extend(encode_token(inner, token, path)?);
        } else {
            head.extend(encode_token(inner, token, path)?);
        }
        path.pop();
    }

    head.extend(tail);
    Ok(head)
}

fn encode_token(
    kind: &ParamType,
    token: &Token,
    path: &mut Vec<PathSegment>,
) -> Result<Vec<u8>, EncodeError> {
    match (kind, token) {
        (ParamType::Address, Token::Address(addr)) => {
            let mut word = [0u8; 32];
            word[12..32].copy_from_slice(addr.as_bytes());
            Ok(word.to_vec())
        }
        (ParamType::Uint(bits), Token::Uint(value)) => {
            if *value > uint_max(*bits) {
                return Err(EncodeError::new(
                    EncodeErrorKind::ValueOutOfRange {
                        ty: kind.to_string(),
                        value: value.to_string(),
                    },
                    path,
                ));
            }
            Ok(u256_word(value).to_vec())
        }
        (ParamType::Int(bits), Token::Int(value)) => {
            let (pos_max, neg_abs_max) = int_bounds(*bits);
            let in_range = if value.negative {
                value.abs <= neg_abs_max
            } else {
                value.abs <= pos_max
            };
            if !in_range {
                return Err(EncodeError::new(
                    EncodeErrorKind::ValueOutOfRange {
                        ty: kind.to_string(),
                        value: value.to_string(),
                    },
                    path,
                ));
            }
            Ok(int_word(value).to_vec())
        }
        (ParamType::Bool, Token::Bool(b)) => {
            let mut word = [0u8; 32];
            word[31] = u8::from(*b);
            Ok(word.to_vec())
        }
        (ParamType::FixedBytes(len), Token::FixedBytes(data)) => {
            if data.len() > *len {
                return Err(EncodeError::new(
                    EncodeErrorKind::OversizedBytes {
                        max: *len,
                        actual: data.len(),
                    },
                    path,
                ));
            }
            // left-aligned, right-padded to a full word
            let mut word = [0u8; 32];
            word[..data.len()].copy_from_slice(data);
            Ok(word.to_vec())
        }
        (ParamType::Bytes, Token::Bytes(data)) => Ok(encode_bytes(data)),
        (ParamType::String, Token::String(s)) => Ok(encode_bytes(s.as_bytes())),
        (ParamType::Array(inner), Token::Array(tokens)) => {
            let mut result = u256_word(&U256::from(tokens.len())).to_vec();
            result.extend(encode_sequence(inner, tokens, path)?);
            Ok(result)
        }
        (ParamType::FixedArray(inner, size), Token::FixedArray(tokens)) => {
            if tokens.len() != *size {
                return Err(EncodeError::new(
                    EncodeErrorKind::LengthMismatch {
                        expected: *size,
                        actual: tokens.len(),
                    },
                    path,
                ));
            }
            encode_sequence(inner, tokens, path)
        }
        (ParamType::Tuple(components), Token::Tuple(tokens)) => {
            if tokens.len() != components.len() {
                return Err(EncodeError::new(
                    EncodeErrorKind::LengthMismatch {
                        expected: components.len(),
                        actual: tokens.len(),
                    },
                    path,
                ));
            }
            encode_params(components, tokens, path)
        }
        (kind, token) => Err(EncodeError::new(
            EncodeErrorKind::TypeMismatch {
                expected: kind.to_string(),
                actual: token.describe().to_string(),
            },
            path,
        )),
    }
}

/// Length word followed by the raw bytes, right-padded to a word multiple.
fn encode_bytes(data: &[u8]) -> Vec<u8> {
    let mut result = u256_word(&U256::from(data.len())).to_vec();
    let padded_len = data.len().div_ceil(32) * 32;
    let mut padded = vec![0u8; padded_len];
    padded[..data.len()].copy_from_slice(data);
    result.extend(padded);
    result
}

/// Render a U256 as a right-aligned big-endian word.
fn u256_word(value: &U256) -> [u8; 32] {
    let mut word = [0u8; 32];
    value.to_big_endian(&mut word);
    word
}

/// Render a signed value as a two's-complement word.
fn int_word(value: &I256) -> [u8; 32] {
    if value.negative && !value.abs.is_zero() {
        let complement = (!value.abs).overflowing_add(U256::one()).0;
        u256_word(&complement)
    } else {
        u256_word(&value.abs)
    }
}

/// Largest value representable by `uintN`.
fn uint_max(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        U256::MAX >> (256 - bits)
    }
}

/// `(largest positive, largest negative magnitude)` for `intN`.
fn int_bounds(bits: usize) -> (U256, U256) {
    let pos_max = U256::MAX >> (257 - bits);
    let neg_abs_max = U256::one() << (bits - 1);
    (pos_max, neg_abs_max)
}
