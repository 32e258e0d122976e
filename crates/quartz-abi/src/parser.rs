//! Type descriptor parser
//!
//! Normalizes every accepted type description — short-form signature
//! strings, inline tuple grammar, full JSON ABI parameter objects, and
//! web3-style struct shorthand objects — into one canonical [`Param`] tree.
//! The encoder, decoder, and selector computer never see raw textual or
//! JSON input.

use serde_json::Value;

use crate::error::ParseError;
use crate::param::{Param, ParamType};

/// Parse a textual type signature (`base[arraySuffix]*`, inline tuples).
pub fn parse_type(signature: &str) -> Result<ParamType, ParseError> {
    let s = signature.trim();
    if s.is_empty() {
        return Err(ParseError::Malformed("empty type signature".to_string()));
    }

    // Array suffixes match right-to-left: the last group is the outermost
    // dimension, wrapping whatever the prefix parses to.
    if let Some(stripped) = s.strip_suffix(']') {
        let open = stripped
            .rfind('[')
            .ok_or_else(|| ParseError::Malformed(s.to_string()))?;
        let inner = parse_type(&stripped[..open])?;
        let dim = &stripped[open + 1..];
        if dim.is_empty() {
            return Ok(ParamType::Array(Box::new(inner)));
        }
        let size: usize = dim
            .parse()
            .map_err(|_| ParseError::Malformed(format!("bad array dimension `{}`", dim)))?;
        if size == 0 {
            return Err(ParseError::InvalidSize {
                base: s.to_string(),
                size: 0,
            });
        }
        return Ok(ParamType::FixedArray(Box::new(inner), size));
    }

    // Inline tuple grammar: (type,type,...), recursing into nested tuples
    if let Some(rest) = s.strip_prefix('(') {
        let inner = rest
            .strip_suffix(')')
            .ok_or_else(|| ParseError::Malformed(s.to_string()))?;
        let components = split_top_level(inner, s)?
            .into_iter()
            .map(|part| parse_type(part).map(Param::unnamed))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(ParamType::Tuple(components));
    }

    parse_base(s)
}

/// Parse a base type name with optional numeric suffix.
fn parse_base(s: &str) -> Result<ParamType, ParseError> {
    match s {
        "address" => return Ok(ParamType::Address),
        "bool" => return Ok(ParamType::Bool),
        "string" => return Ok(ParamType::String),
        "bytes" => return Ok(ParamType::Bytes),
        "uint" => return Ok(ParamType::Uint(256)),
        "int" => return Ok(ParamType::Int(256)),
        "tuple" => {
            return Err(ParseError::Malformed(
                "tuple type requires components".to_string(),
            ))
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("uint") {
        let bits = parse_suffix(s, rest)?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(ParseError::InvalidSize {
                base: "uint".to_string(),
                size: bits,
            });
        }
        return Ok(ParamType::Uint(bits));
    }

    if let Some(rest) = s.strip_prefix("int") {
        let bits = parse_suffix(s, rest)?;
        if bits == 0 || bits > 256 || bits % 8 != 0 {
            return Err(ParseError::InvalidSize {
                base: "int".to_string(),
                size: bits,
            });
        }
        return Ok(ParamType::Int(bits));
    }

    if let Some(rest) = s.strip_prefix("bytes") {
        let len = parse_suffix(s, rest)?;
        if len == 0 || len > 32 {
            return Err(ParseError::InvalidSize {
                base: "bytes".to_string(),
                size: len,
            });
        }
        return Ok(ParamType::FixedBytes(len));
    }

    Err(ParseError::UnknownType(s.to_string()))
}

fn parse_suffix(full: &str, suffix: &str) -> Result<usize, ParseError> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::UnknownType(full.to_string()));
    }
    suffix
        .parse()
        .map_err(|_| ParseError::UnknownType(full.to_string()))
}

/// Split `a,b,(c,d),e[2]` on commas at nesting depth zero.
fn split_top_level<'a>(s: &'a str, context: &str) -> Result<Vec<&'a str>, ParseError> {
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParseError::Malformed(context.to_string()))?;
            }
            ',' if depth == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseError::Malformed(context.to_string()));
    }
    parts.push(&s[start..]);
    Ok(parts)
}

/// Normalize any accepted JSON parameter description into a [`Param`].
///
/// Accepted shapes:
/// - `"uint256"` — short-form type string (inline tuples allowed);
/// - `{"name": ..., "type": ..., "components": [...], "indexed": ...}` —
///   JSON ABI parameter object;
/// - `{"StructName": {"field": "type", ...}}` — web3 struct shorthand,
///   array suffixes allowed on the struct key.
pub fn parse_param(value: &Value) -> Result<Param, ParseError> {
    match value {
        Value::String(s) => Ok(Param::unnamed(parse_type(s)?)),
        Value::Object(map) => {
            if map.contains_key("type") {
                parse_abi_parameter(map)
            } else {
                parse_struct_shorthand(map)
            }
        }
        other => Err(ParseError::InvalidParameter(other.to_string())),
    }
}

fn parse_abi_parameter(map: &serde_json::Map<String, Value>) -> Result<Param, ParseError> {
    let type_str = map
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::InvalidParameter("`type` must be a string".to_string()))?;
    let name = map
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    let indexed = map
        .get("indexed")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let kind = match map.get("components") {
        Some(Value::Array(components)) => {
            let (base, suffixes) = split_array_suffixes(type_str);
            if base != "tuple" {
                return Err(ParseError::ComponentsOnNonTuple(base.to_string()));
            }
            let parsed = components
                .iter()
                .map(parse_param)
                .collect::<Result<Vec<_>, _>>()?;
            apply_array_suffixes(ParamType::Tuple(parsed), suffixes)?
        }
        Some(other) => {
            return Err(ParseError::InvalidParameter(format!(
                "`components` must be an array, got {}",
                other
            )))
        }
        None => parse_type(type_str)?,
    };

    Ok(Param {
        name,
        kind,
        indexed,
    })
}

/// Web3 struct shorthand: a single-key object mapping the struct name to an
/// ordered field-name → type-description object.
fn parse_struct_shorthand(map: &serde_json::Map<String, Value>) -> Result<Param, ParseError> {
    if map.len() != 1 {
        return Err(ParseError::InvalidParameter(
            "struct shorthand must have exactly one key".to_string(),
        ));
    }
    let (key, fields) = map.iter().next().expect("len checked above");
    let fields = fields.as_object().ok_or_else(|| {
        ParseError::InvalidParameter(format!("struct `{}` must map fields to types", key))
    })?;

    let mut components = Vec::with_capacity(fields.len());
    for (field_name, description) in fields {
        match description {
            Value::String(type_str) => {
                components.push(Param::new(field_name.clone(), parse_type(type_str)?));
            }
            Value::Object(_) => {
                // nested struct shorthand: the field name doubles as the
                // struct name
                let mut nested = serde_json::Map::new();
                nested.insert(field_name.clone(), description.clone());
                components.push(parse_struct_shorthand(&nested)?);
            }
            other => {
                return Err(ParseError::InvalidParameter(format!(
                    "field `{}` has unusable type description {}",
                    field_name, other
                )))
            }
        }
    }

    let (base_name, suffixes) = split_array_suffixes(key);
    let kind = apply_array_suffixes(ParamType::Tuple(components), suffixes)?;
    Ok(Param::new(base_name, kind))
}

/// Split `tuple[2][]` into (`tuple`, `[2][]`).
fn split_array_suffixes(s: &str) -> (&str, &str) {
    match s.find('[') {
        Some(i) => (&s[..i], &s[i..]),
        None => (s, ""),
    }
}

/// Wrap `kind` in array dimensions read left-to-right, so `[2][]` produces
/// a dynamic array of 2-element fixed arrays.
fn apply_array_suffixes(kind: ParamType, suffixes: &str) -> Result<ParamType, ParseError> {
    let mut result = kind;
    let mut rest = suffixes;
    while !rest.is_empty() {
        let close = rest
            .find(']')
            .ok_or_else(|| ParseError::Malformed(suffixes.to_string()))?;
        if !rest.starts_with('[') {
            return Err(ParseError::Malformed(suffixes.to_string()));
        }
        let dim = &rest[1..close];
        result = if dim.is_empty() {
            ParamType::Array(Box::new(result))
        } else {
            let size: usize = dim
                .parse()
                .map_err(|_| ParseError::Malformed(format!("bad array dimension `{}`", dim)))?;
            if size == 0 {
                return Err(ParseError::InvalidSize {
                    base: suffixes.to_string(),
                    size: 0,
                });
            }
            ParamType::FixedArray(Box::new(result), size)
        };
        rest = &rest[close + 1..];
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== String grammar ====================

    #[test]
    fn test_parse_elementary() {
        assert_eq!(parse_type("address").unwrap(), ParamType::Address);
        assert_eq!(parse_type("bool").unwrap(), ParamType::Bool);
        assert_eq!(parse_type("string").unwrap(), ParamType::String);
        assert_eq!(parse_type("bytes").unwrap(), ParamType::Bytes);
        assert_eq!(parse_type("uint").unwrap(), ParamType::Uint(256));
        assert_eq!(parse_type("int").unwrap(), ParamType::Int(256));
        assert_eq!(parse_type("uint8").unwrap(), ParamType::Uint(8));
        assert_eq!(parse_type("int128").unwrap(), ParamType::Int(128));
        assert_eq!(parse_type("bytes32").unwrap(), ParamType::FixedBytes(32));
        assert_eq!(parse_type("bytes1").unwrap(), ParamType::FixedBytes(1));
    }

    #[test]
    fn test_parse_invalid_sizes() {
        assert!(matches!(
            parse_type("uint7"),
            Err(ParseError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_type("uint264"),
            Err(ParseError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_type("int0"),
            Err(ParseError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_type("bytes33"),
            Err(ParseError::InvalidSize { .. })
        ));
        assert!(matches!(
            parse_type("bytes0"),
            Err(ParseError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_parse_unknown_types() {
        assert!(matches!(
            parse_type("notTuple"),
            Err(ParseError::UnknownType(_))
        ));
        assert!(matches!(
            parse_type("uint25x"),
            Err(ParseError::UnknownType(_))
        ));
        assert!(parse_type("").is_err());
    }

    #[test]
    fn test_parse_array_suffixes() {
        assert_eq!(
            parse_type("uint256[]").unwrap(),
            ParamType::Array(Box::new(ParamType::Uint(256)))
        );
        assert_eq!(
            parse_type("bool[3]").unwrap(),
            ParamType::FixedArray(Box::new(ParamType::Bool), 3)
        );
        // last suffix is outermost: dynamic array of uint256[2]
        assert_eq!(
            parse_type("uint256[2][]").unwrap(),
            ParamType::Array(Box::new(ParamType::FixedArray(
                Box::new(ParamType::Uint(256)),
                2
            )))
        );
    }

    #[test]
    fn test_parse_bad_array_suffixes() {
        assert!(parse_type("uint256[").is_err());
        assert!(parse_type("uint256]").is_err());
        assert!(parse_type("uint256[x]").is_err());
        assert!(matches!(
            parse_type("uint256[0]"),
            Err(ParseError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_parse_inline_tuples() {
        let parsed = parse_type("(uint256,bool)").unwrap();
        assert_eq!(
            parsed,
            ParamType::Tuple(vec![
                Param::unnamed(ParamType::Uint(256)),
                Param::unnamed(ParamType::Bool),
            ])
        );

        // nested tuple array matching the web3 canonical-signature fixture
        let parsed = parse_type("(uint256,uint256[],(uint256,uint256)[])").unwrap();
        assert_eq!(
            parsed.to_string(),
            "(uint256,uint256[],(uint256,uint256)[])"
        );
    }

    #[test]
    fn test_parse_tuple_array() {
        let parsed = parse_type("(uint256,bool)[2]").unwrap();
        assert!(matches!(parsed, ParamType::FixedArray(_, 2)));
    }

    #[test]
    fn test_parse_malformed_tuples() {
        assert!(parse_type("(uint256,bool").is_err());
        assert!(parse_type("uint256,bool)").is_err());
        assert!(parse_type("(a),(b)").is_err());
        assert!(parse_type("tuple").is_err());
    }

    // ==================== JSON parameter objects ====================

    #[test]
    fn test_parse_param_string() {
        let param = parse_param(&json!("uint256")).unwrap();
        assert_eq!(param.kind, ParamType::Uint(256));
        assert!(param.name.is_empty());
    }

    #[test]
    fn test_parse_param_abi_object() {
        let param = parse_param(&json!({
            "name": "myNumber",
            "type": "uint256",
            "indexed": true,
        }))
        .unwrap();
        assert_eq!(param.name, "myNumber");
        assert_eq!(param.kind, ParamType::Uint(256));
        assert!(param.indexed);
    }

    #[test]
    fn test_parse_param_with_components() {
        let param = parse_param(&json!({
            "name": "s",
            "type": "tuple",
            "components": [
                {"name": "a", "type": "uint256"},
                {"name": "b", "type": "uint256[]"},
                {"name": "c", "type": "tuple[]", "components": [
                    {"name": "x", "type": "uint256"},
                    {"name": "y", "type": "uint256"},
                ]},
            ],
        }))
        .unwrap();
        assert_eq!(
            param.kind.to_string(),
            "(uint256,uint256[],(uint256,uint256)[])"
        );
    }

    #[test]
    fn test_parse_param_components_on_non_tuple() {
        let result = parse_param(&json!({
            "name": "s",
            "type": "notTuple",
            "components": [{"name": "a", "type": "uint256"}],
        }));
        assert_eq!(
            result.unwrap_err(),
            ParseError::ComponentsOnNonTuple("notTuple".to_string())
        );
    }

    #[test]
    fn test_parse_param_tuple_array_components() {
        let param = parse_param(&json!({
            "name": "list",
            "type": "tuple[2][]",
            "components": [
                {"name": "x", "type": "uint256"},
                {"name": "y", "type": "uint256"},
            ],
        }))
        .unwrap();
        assert_eq!(param.kind.to_string(), "(uint256,uint256)[2][]");
    }

    // ==================== Struct shorthand ====================

    #[test]
    fn test_parse_struct_shorthand() {
        let param = parse_param(&json!({
            "ParentStruct": {
                "propertyOne": "uint256",
                "propertyTwo": "uint256",
                "ChildStruct": {
                    "propertyOne": "uint256",
                    "propertyTwo": "uint256",
                },
            },
        }))
        .unwrap();
        assert_eq!(param.name, "ParentStruct");
        assert_eq!(
            param.kind.to_string(),
            "(uint256,uint256,(uint256,uint256))"
        );
        // field declaration order must be preserved
        if let ParamType::Tuple(components) = &param.kind {
            assert_eq!(components[0].name, "propertyOne");
            assert_eq!(components[1].name, "propertyTwo");
            assert_eq!(components[2].name, "ChildStruct");
        } else {
            panic!("expected tuple");
        }
    }

    #[test]
    fn test_parse_struct_shorthand_array() {
        let param = parse_param(&json!({
            "Pair[]": {"a": "uint256", "b": "uint256"},
        }))
        .unwrap();
        assert_eq!(param.name, "Pair");
        assert_eq!(param.kind.to_string(), "(uint256,uint256)[]");
    }

    #[test]
    fn test_parse_param_rejects_scalars() {
        assert!(parse_param(&json!(345)).is_err());
        assert!(parse_param(&json!(null)).is_err());
        assert!(parse_param(&json!(true)).is_err());
    }
}
