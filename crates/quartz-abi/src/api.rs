//! Hex-string entry points
//!
//! The functions here mirror the JSON-facing surface of a contract toolkit:
//! loosely-typed JSON values in, `0x`-prefixed lowercase hex out. Input hex
//! is accepted case-insensitively with or without the `0x` prefix. Callers
//! who already hold typed [`Token`]s can use [`encode`](crate::encode::encode)
//! and [`decode`](crate::decode::decode) directly.

use std::ops::Index;

use quartz_crypto::Keccak256;
use serde_json::Value;
use tracing::trace;

use crate::decode::decode;
use crate::encode::{encode, encode_function_call_data};
use crate::error::{
    AbiError, DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind, PathSegment,
};
use crate::fragment::{Fragment, FragmentKind};
use crate::param::{Param, ParamType};
use crate::parser::parse_param;
use crate::selector::{event_topic, function_selector, signature_hash};
use crate::token::Token;

/// Decoded parameter list with both positional and name-based access.
///
/// Entries keep declaration order; unnamed parameters have an empty name
/// and are reachable by position only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedParams {
    entries: Vec<(String, Token)>,
}

impl DecodedParams {
    fn new(entries: Vec<(String, Token)>) -> Self {
        DecodedParams { entries }
    }

    /// Number of decoded parameters
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no parameters were decoded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value at a declaration position
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.entries.get(index).map(|(_, token)| token)
    }

    /// Value of the first parameter with this name
    pub fn by_name(&self, name: &str) -> Option<&Token> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, token)| token)
    }

    /// Iterate `(name, value)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Consume into the ordered token list
    pub fn into_tokens(self) -> Vec<Token> {
        self.entries.into_iter().map(|(_, token)| token).collect()
    }
}

impl Index<usize> for DecodedParams {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.entries[index].1
    }
}

/// Encode a list of values against a list of type descriptions.
///
/// `types` takes the same forms the parser accepts: signature strings,
/// `{"type", "name", "components"}` objects, or struct-shorthand objects.
pub fn encode_parameters(types: &[Value], values: &[Value]) -> Result<String, AbiError> {
    trace!(types = types.len(), values = values.len(), "encode_parameters");
    let params = parse_params(types)?;
    let tokens = values_to_tokens(&params, values)?;
    let encoded = encode(&params, &tokens)?;
    Ok(encode_hex(&encoded))
}

/// Decode ABI data against a list of type descriptions.
pub fn decode_parameters(types: &[Value], data: &str) -> Result<DecodedParams, AbiError> {
    trace!(types = types.len(), "decode_parameters");
    let params = parse_params(types)?;
    let bytes = decode_hex(data)?;
    let tokens = decode(&params, &bytes)?;
    Ok(zip_entries(&params, tokens))
}

/// Four-byte function selector as `0x`-prefixed hex.
///
/// Accepts either a fragment object or a raw signature string; strings are
/// hashed verbatim, so the caller must supply canonical form.
pub fn encode_function_signature(
    hasher: &impl Keccak256,
    function: &Value,
) -> Result<String, AbiError> {
    let selector = match function {
        Value::String(signature) => {
            let digest = signature_hash(hasher, signature);
            let mut bytes = [0u8; 4];
            bytes.copy_from_slice(&digest.as_bytes()[..4]);
            bytes
        }
        Value::Object(_) => function_selector(hasher, &Fragment::from_json(function)?)?,
        other => {
            return Err(AbiError::InvalidFragment(format!(
                "expected a signature string or fragment object, got {}",
                other
            )));
        }
    };
    Ok(encode_hex(&selector))
}

/// Full 32-byte event signature topic as `0x`-prefixed hex.
///
/// Accepts either a fragment object or a raw signature string.
pub fn encode_event_signature(
    hasher: &impl Keccak256,
    event: &Value,
) -> Result<String, AbiError> {
    let topic = match event {
        Value::String(signature) => signature_hash(hasher, signature),
        Value::Object(_) => event_topic(hasher, &Fragment::from_json(event)?)?,
        other => {
            return Err(AbiError::InvalidFragment(format!(
                "expected a signature string or fragment object, got {}",
                other
            )));
        }
    };
    Ok(topic.to_hex())
}

/// Build complete call data: four-byte selector followed by the encoded
/// arguments.
pub fn encode_function_call(
    hasher: &impl Keccak256,
    function: &Value,
    values: &[Value],
) -> Result<String, AbiError> {
    trace!(values = values.len(), "encode_function_call");
    let fragment = Fragment::from_json(function)?;
    if fragment.kind != FragmentKind::Function {
        return Err(AbiError::InvalidFragment(
            "call data requires a function fragment".to_string(),
        ));
    }
    let selector = function_selector(hasher, &fragment)?;
    let params = fragment.input_params()?;
    let tokens = values_to_tokens(&params, values)?;
    let data = encode_function_call_data(selector, &params, &tokens)?;
    Ok(encode_hex(&data))
}

/// Decode an event log's data and topics against its ABI description.
///
/// `event` is either a full event fragment or a bare array of parameter
/// descriptions. With a fragment, `topics[0]` is the signature topic and is
/// skipped unless the event is anonymous; with a bare array the topics are
/// taken as the indexed values directly.
///
/// Indexed dynamic parameters (and indexed static types wider than one
/// word) are only present in logs as their 32-byte topic hash, so they
/// decode as raw [`Token::FixedBytes`] of the topic.
pub fn decode_log(
    event: &Value,
    data: &str,
    topics: &[&str],
) -> Result<DecodedParams, AbiError> {
    trace!(topics = topics.len(), "decode_log");
    let (params, skip_signature_topic) = match event {
        Value::Array(items) => {
            let params = items
                .iter()
                .map(parse_param)
                .collect::<Result<Vec<_>, _>>()?;
            (params, false)
        }
        Value::Object(_) => {
            let fragment = Fragment::from_json(event)?;
            if fragment.kind != FragmentKind::Event {
                return Err(AbiError::InvalidFragment(
                    "log decoding requires an event fragment".to_string(),
                ));
            }
            (fragment.input_params()?, !fragment.anonymous)
        }
        other => {
            return Err(AbiError::InvalidFragment(format!(
                "expected an event fragment or parameter array, got {}",
                other
            )));
        }
    };

    let value_topics = if skip_signature_topic {
        topics.get(1..).unwrap_or(&[])
    } else {
        topics
    };

    let indexed_count = params.iter().filter(|p| p.indexed).count();
    if indexed_count != value_topics.len() {
        return Err(DecodeError::at_root(DecodeErrorKind::TopicCount {
            expected: indexed_count,
            actual: value_topics.len(),
        })
        .into());
    }

    // non-indexed parameters share the data payload, encoded as a tuple
    let plain: Vec<Param> = params.iter().filter(|p| !p.indexed).cloned().collect();
    let data_bytes = decode_hex(data)?;
    let mut plain_tokens = decode(&plain, &data_bytes)?.into_iter();

    let mut next_topic = value_topics.iter();
    let mut entries = Vec::with_capacity(params.len());
    for param in &params {
        let token = if param.indexed {
            let topic = next_topic.next().unwrap_or(&"");
            decode_topic(param, topic)?
        } else {
            // decode() yielded exactly plain.len() tokens
            plain_tokens.next().unwrap_or(Token::Bytes(Vec::new()))
        };
        entries.push((param.name.clone(), token));
    }

    Ok(DecodedParams::new(entries))
}

fn decode_topic(param: &Param, topic: &str) -> Result<Token, AbiError> {
    let bytes = decode_hex(topic)?;
    if bytes.len() != 32 {
        return Err(DecodeError::at_root(DecodeErrorKind::InvalidHex(format!(
            "topic must be exactly 32 bytes, got {}",
            bytes.len()
        )))
        .into());
    }
    // a topic holds the keccak hash, not the value, for every composite
    // indexed parameter (arrays and tuples, even single-word static ones)
    // and for dynamic types
    if param.kind.is_dynamic() || topic_holds_hash(&param.kind) {
        return Ok(Token::FixedBytes(bytes));
    }
    let single = [Param::new(param.name.clone(), param.kind.clone())];
    let mut tokens = decode(&single, &bytes)?;
    Ok(tokens.remove(0))
}

fn topic_holds_hash(kind: &ParamType) -> bool {
    matches!(
        kind,
        ParamType::Array(_) | ParamType::FixedArray(..) | ParamType::Tuple(_)
    )
}

fn parse_params(types: &[Value]) -> Result<Vec<Param>, AbiError> {
    types
        .iter()
        .map(|v| parse_param(v).map_err(AbiError::from))
        .collect()
}

fn values_to_tokens(params: &[Param], values: &[Value]) -> Result<Vec<Token>, AbiError> {
    if params.len() != values.len() {
        return Err(EncodeError::at_root(EncodeErrorKind::ParameterCount {
            expected: params.len(),
            actual: values.len(),
        })
        .into());
    }
    let mut path = Vec::new();
    let mut tokens = Vec::with_capacity(params.len());
    for (i, (param, value)) in params.iter().zip(values).enumerate() {
        if param.name.is_empty() {
            path.push(PathSegment::Index(i));
        } else {
            path.push(PathSegment::Field(param.name.clone()));
        }
        let token = Token::from_json(&param.kind, value, &mut path)?;
        path.pop();
        tokens.push(token);
    }
    Ok(tokens)
}

fn zip_entries(params: &[Param], tokens: Vec<Token>) -> DecodedParams {
    let entries = params
        .iter()
        .zip(tokens)
        .map(|(param, token)| (param.name.clone(), token))
        .collect();
    DecodedParams::new(entries)
}

/// Render bytes as `0x`-prefixed lowercase hex.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse `0x`-optional, case-insensitive hex into bytes. Odd-length input
/// is rejected.
pub fn decode_hex(data: &str) -> Result<Vec<u8>, DecodeError> {
    let stripped = data
        .strip_prefix("0x")
        .or_else(|| data.strip_prefix("0X"))
        .unwrap_or(data);
    hex::decode(stripped)
        .map_err(|e| DecodeError::at_root(DecodeErrorKind::InvalidHex(e.to_string())))
}
