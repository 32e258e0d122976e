//! Contract ABI codec: type-signature parsing, parameter encoding and
//! decoding, and selector/topic computation.
//!
//! The crate is layered. [`parser`] turns signature strings and JSON
//! parameter descriptions into [`ParamType`] descriptor trees; [`encode`]
//! and [`decode`] move [`Token`] value trees across the 32-byte-word wire
//! format; [`selector`] hashes canonical signatures; and [`api`] wraps it
//! all behind hex-string entry points for callers holding loosely-typed
//! JSON values.
//!
//! ```
//! use quartz_abi::{decode_parameters, encode_parameters, Token};
//! use serde_json::json;
//!
//! let types = [json!("uint256"), json!("string")];
//! let encoded = encode_parameters(&types, &[json!("2345675643"), json!("Hello!%")]).unwrap();
//! assert!(encoded.starts_with("0x00000000000000000000000000000000000000000000000000000000"));
//!
//! let decoded = decode_parameters(&types, &encoded).unwrap();
//! assert_eq!(decoded[1], Token::String("Hello!%".to_string()));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod api;
pub mod decode;
pub mod encode;
pub mod error;
pub mod fragment;
pub mod param;
pub mod parser;
pub mod selector;
pub mod token;

pub use api::{
    decode_hex, decode_log, decode_parameters, encode_function_call,
    encode_function_signature, encode_event_signature, encode_hex, encode_parameters,
    DecodedParams,
};
pub use decode::decode;
pub use encode::{encode, encode_function_call_data};
pub use error::{
    AbiError, DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind, ParseError, Path,
    PathSegment,
};
pub use fragment::{Fragment, FragmentKind};
pub use param::{Param, ParamType};
pub use parser::{parse_param, parse_type};
pub use selector::{event_topic, function_selector, signature_hash};
pub use token::{Token, I256};

pub use quartz_primitives::{Address, H256, U256};
