//! Property tests: any well-formed token tree survives an encode/decode
//! round trip unchanged.

use proptest::prelude::*;
use quartz_abi::{decode, encode, Address, Param, ParamType, Token, I256, U256};

fn arb_param_type() -> impl Strategy<Value = ParamType> {
    let leaf = prop_oneof![
        Just(ParamType::Address),
        Just(ParamType::Bool),
        Just(ParamType::Bytes),
        Just(ParamType::String),
        (1usize..=32).prop_map(ParamType::FixedBytes),
        (1usize..=32).prop_map(|n| ParamType::Uint(n * 8)),
        (1usize..=32).prop_map(|n| ParamType::Int(n * 8)),
    ];
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(|t| ParamType::Array(Box::new(t))),
            (inner.clone(), 1usize..=3)
                .prop_map(|(t, n)| ParamType::FixedArray(Box::new(t), n)),
            prop::collection::vec(inner, 1..=3).prop_map(|kinds| {
                ParamType::Tuple(kinds.into_iter().map(Param::unnamed).collect())
            }),
        ]
    })
}

/// A token strategy shaped by (and in range for) the given descriptor.
fn arb_token(kind: &ParamType) -> BoxedStrategy<Token> {
    match kind {
        ParamType::Address => any::<[u8; 20]>()
            .prop_map(|bytes| Token::Address(Address::from_bytes(bytes)))
            .boxed(),
        ParamType::Uint(bits) => {
            let bits = *bits;
            any::<[u8; 32]>()
                .prop_map(move |bytes| {
                    let mut value = U256::from_big_endian(&bytes);
                    if bits < 256 {
                        value = value & (U256::MAX >> (256 - bits));
                    }
                    Token::Uint(value)
                })
                .boxed()
        }
        ParamType::Int(bits) => {
            let bits = *bits;
            (any::<[u8; 32]>(), any::<bool>())
                .prop_map(move |(bytes, negative)| {
                    // keep the magnitude within bits-1 bits, in range for
                    // either sign
                    let abs = U256::from_big_endian(&bytes)
                        & (U256::MAX >> (256 - (bits - 1)));
                    Token::Int(I256::new(abs, negative))
                })
                .boxed()
        }
        ParamType::Bool => any::<bool>().prop_map(Token::Bool).boxed(),
        ParamType::Bytes => prop::collection::vec(any::<u8>(), 0..=64)
            .prop_map(Token::Bytes)
            .boxed(),
        ParamType::FixedBytes(len) => prop::collection::vec(any::<u8>(), *len)
            .prop_map(Token::FixedBytes)
            .boxed(),
        ParamType::String => "[ -~]{0,32}".prop_map(Token::String).boxed(),
        ParamType::Array(inner) => prop::collection::vec(arb_token(inner), 0..=3)
            .prop_map(Token::Array)
            .boxed(),
        ParamType::FixedArray(inner, size) => {
            prop::collection::vec(arb_token(inner), *size)
                .prop_map(Token::FixedArray)
                .boxed()
        }
        ParamType::Tuple(components) => components
            .iter()
            .map(|component| arb_token(&component.kind))
            .collect::<Vec<_>>()
            .prop_map(Token::Tuple)
            .boxed(),
    }
}

fn arb_typed_value() -> impl Strategy<Value = (ParamType, Token)> {
    arb_param_type().prop_flat_map(|kind| {
        let token = arb_token(&kind);
        token.prop_map(move |t| (kind.clone(), t))
    })
}

proptest! {
    #[test]
    fn roundtrip_preserves_value((kind, token) in arb_typed_value()) {
        let params = [Param::unnamed(kind)];
        let snapshot = token.clone();
        let encoded = encode(&params, std::slice::from_ref(&token)).unwrap();
        prop_assert_eq!(encoded.len() % 32, 0);
        // encoding leaves its input untouched
        prop_assert_eq!(&token, &snapshot);
        let decoded = decode(&params, &encoded).unwrap();
        prop_assert_eq!(decoded, vec![token]);
    }

    #[test]
    fn encoding_is_deterministic((kind, token) in arb_typed_value()) {
        let params = [Param::unnamed(kind)];
        let first = encode(&params, std::slice::from_ref(&token)).unwrap();
        let second = encode(&params, std::slice::from_ref(&token)).unwrap();
        prop_assert_eq!(first, second);
    }
}
