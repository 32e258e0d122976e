//! ABI decoding
//!
//! Mirror of the encoder: head words are read sequentially, static values
//! decode inline, dynamic values follow their offset word into the tail.
//! Offsets and length words are resolved relative to the enclosing tuple or
//! array frame, and every one is bounds-checked before any allocation.
//! Unreferenced trailing bytes are tolerated.

use quartz_primitives::{Address, U256};

use crate::error::{DecodeError, DecodeErrorKind, PathSegment};
use crate::param::{Param, ParamType};
use crate::token::{I256, Token};

/// Decode a parameter list from ABI bytes.
pub fn decode(params: &[Param], data: &[u8]) -> Result<Vec<Token>, DecodeError> {
    let mut path = Vec::new();
    let mut tokens = Vec::with_capacity(params.len());
    let mut head = 0usize;

    for (i, param) in params.iter().enumerate() {
        push_segment(&mut path, param, i);
        let token = decode_value(&param.kind, data, head, &mut path)?;
        path.pop();
        head += param.kind.head_size();
        tokens.push(token);
    }

    Ok(tokens)
}

fn push_segment(path: &mut Vec<PathSegment>, param: &Param, index: usize) {
    if param.name.is_empty() {
        path.push(PathSegment::Index(index));
    } else {
        path.push(PathSegment::Field(param.name.clone()));
    }
}

/// Decode one value whose head slot sits at `at` within `frame`.
fn decode_value(
    kind: &ParamType,
    frame: &[u8],
    at: usize,
    path: &mut Vec<PathSegment>,
) -> Result<Token, DecodeError> {
    if kind.is_dynamic() {
        let offset = read_offset(frame, at, path)?;
        return decode_tail(kind, &frame[offset..], path);
    }

    match kind {
        ParamType::Address => {
            let word = read_word(frame, at, path)?;
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..32]);
            Ok(Token::Address(Address::from_bytes(bytes)))
        }
        ParamType::Uint(_) => {
            let word = read_word(frame, at, path)?;
            Ok(Token::Uint(U256::from_big_endian(word)))
        }
        ParamType::Int(bits) => {
            let word = read_word(frame, at, path)?;
            Ok(Token::Int(decode_int(U256::from_big_endian(word), *bits)))
        }
        ParamType::Bool => {
            let word = read_word(frame, at, path)?;
            Ok(Token::Bool(word[31] != 0))
        }
        ParamType::FixedBytes(len) => {
            let word = read_word(frame, at, path)?;
            Ok(Token::FixedBytes(word[..*len].to_vec()))
        }
        ParamType::FixedArray(inner, size) => {
            let mut tokens = Vec::with_capacity(*size);
            let stride = inner.static_size();
            for i in 0..*size {
                path.push(PathSegment::Index(i));
                tokens.push(decode_value(inner, frame, at + i * stride, path)?);
                path.pop();
            }
            Ok(Token::FixedArray(tokens))
        }
        ParamType::Tuple(components) => {
            let mut tokens = Vec::with_capacity(components.len());
            let mut offset = at;
            for (i, component) in components.iter().enumerate() {
                push_segment(path, component, i);
                tokens.push(decode_value(&component.kind, frame, offset, path)?);
                path.pop();
                offset += component.kind.static_size();
            }
            Ok(Token::Tuple(tokens))
        }
        // dynamic kinds are handled above
        ParamType::Bytes | ParamType::String | ParamType::Array(_) => {
            decode_tail(kind, &frame[at..], path)
        }
    }
}

/// Decode a dynamic payload. `frame` starts at the payload itself.
fn decode_tail(
    kind: &ParamType,
    frame: &[u8],
    path: &mut Vec<PathSegment>,
) -> Result<Token, DecodeError> {
    match kind {
        ParamType::Bytes => {
            let bytes = read_length_prefixed(frame, path)?;
            Ok(Token::Bytes(bytes))
        }
        ParamType::String => {
            let bytes = read_length_prefixed(frame, path)?;
            let s = String::from_utf8(bytes).map_err(|e| {
                DecodeError::new(DecodeErrorKind::InvalidUtf8(e.to_string()), path)
            })?;
            Ok(Token::String(s))
        }
        ParamType::Array(inner) => {
            let len = read_array_length(frame, inner.head_size(), path)?;
            let elements = &frame[32..];
            let mut tokens = Vec::with_capacity(len);
            for i in 0..len {
                path.push(PathSegment::Index(i));
                tokens.push(decode_value(inner, elements, i * inner.head_size(), path)?);
                path.pop();
            }
            Ok(Token::Array(tokens))
        }
        ParamType::FixedArray(inner, size) => {
            // dynamic elements: the fixed array is its own head/tail frame
            let mut tokens = Vec::with_capacity(*size);
            for i in 0..*size {
                path.push(PathSegment::Index(i));
                tokens.push(decode_value(inner, frame, i * inner.head_size(), path)?);
                path.pop();
            }
            Ok(Token::FixedArray(tokens))
        }
        ParamType::Tuple(components) => {
            let mut tokens = Vec::with_capacity(components.len());
            let mut head = 0usize;
            for (i, component) in components.iter().enumerate() {
                push_segment(path, component, i);
                tokens.push(decode_value(&component.kind, frame, head, path)?);
                path.pop();
                head += component.kind.head_size();
            }
            Ok(Token::Tuple(tokens))
        }
        // static kinds never reach the tail
        other => decode_value(other, frame, 0, path),
    }
}

/// Two's-complement inversion using the declared bit width's sign bit.
fn decode_int(word: U256, bits: usize) -> I256 {
    let masked = if bits < 256 {
        word & (U256::MAX >> (256 - bits))
    } else {
        word
    };
    if masked.bit(bits - 1) {
        let mask = if bits < 256 {
            U256::MAX >> (256 - bits)
        } else {
            U256::MAX
        };
        let abs = ((!masked) & mask).overflowing_add(U256::one()).0;
        I256::new(abs, true)
    } else {
        I256::new(masked, false)
    }
}

fn read_word<'a>(
    frame: &'a [u8],
    at: usize,
    path: &[PathSegment],
) -> Result<&'a [u8], DecodeError> {
    let end = at.checked_add(32).ok_or_else(|| {
        DecodeError::new(
            DecodeErrorKind::BufferTooShort {
                needed: usize::MAX,
                have: frame.len(),
            },
            path,
        )
    })?;
    if frame.len() < end {
        return Err(DecodeError::new(
            DecodeErrorKind::BufferTooShort {
                needed: end,
                have: frame.len(),
            },
            path,
        ));
    }
    Ok(&frame[at..end])
}

/// Read a head slot holding an offset into the enclosing frame.
fn read_offset(
    frame: &[u8],
    at: usize,
    path: &[PathSegment],
) -> Result<usize, DecodeError> {
    let word = U256::from_big_endian(read_word(frame, at, path)?);
    if word > U256::from(frame.len()) {
        return Err(DecodeError::new(
            DecodeErrorKind::OffsetOutOfBounds {
                offset: word,
                frame: frame.len(),
            },
            path,
        ));
    }
    Ok(word.as_u64() as usize)
}

/// Read a length word followed by that many raw bytes.
fn read_length_prefixed(
    frame: &[u8],
    path: &[PathSegment],
) -> Result<Vec<u8>, DecodeError> {
    let word = U256::from_big_endian(read_word(frame, 0, path)?);
    let available = frame.len() - 32;
    if word > U256::from(available) {
        return Err(DecodeError::new(
            DecodeErrorKind::LengthOutOfBounds {
                length: word,
                available,
            },
            path,
        ));
    }
    let len = word.as_u64() as usize;
    Ok(frame[32..32 + len].to_vec())
}

/// Read an array length word, bounding it by the space the element head
/// slots would need so a hostile length cannot trigger a huge allocation.
fn read_array_length(
    frame: &[u8],
    element_head: usize,
    path: &[PathSegment],
) -> Result<usize, DecodeError> {
    let word = U256::from_big_endian(read_word(frame, 0, path)?);
    let available = frame.len() - 32;
    if word > U256::from(available / element_head) {
        return Err(DecodeError::new(
            DecodeErrorKind::LengthOutOfBounds {
                length: word,
                available,
            },
            path,
        ));
    }
    Ok(word.as_u64() as usize)
}
