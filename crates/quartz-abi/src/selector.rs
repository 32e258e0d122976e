//! Selectors and event topics
//!
//! Both are keccak-256 over the canonical signature string: functions keep
//! the first four bytes, events keep the full 32-byte digest. The hash
//! implementation is injected through [`Keccak256`] so alternative backends
//! can be swapped in.

use quartz_crypto::Keccak256;
use quartz_primitives::H256;

use crate::error::AbiError;
use crate::fragment::{Fragment, FragmentKind};

/// Hash a raw signature string. The string is hashed verbatim; callers are
/// responsible for canonical form.
pub fn signature_hash(hasher: &impl Keccak256, signature: &str) -> H256 {
    hasher.keccak256(signature.as_bytes())
}

/// Four-byte call selector for a function fragment.
pub fn function_selector(
    hasher: &impl Keccak256,
    fragment: &Fragment,
) -> Result<[u8; 4], AbiError> {
    if fragment.kind != FragmentKind::Function {
        return Err(AbiError::InvalidFragment(
            "selector requires a function fragment".to_string(),
        ));
    }
    let digest = signature_hash(hasher, &fragment.canonical_signature()?);
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest.as_bytes()[..4]);
    Ok(selector)
}

/// Full 32-byte signature topic for an event fragment.
pub fn event_topic(hasher: &impl Keccak256, fragment: &Fragment) -> Result<H256, AbiError> {
    if fragment.kind != FragmentKind::Event {
        return Err(AbiError::InvalidFragment(
            "topic requires an event fragment".to_string(),
        ));
    }
    Ok(signature_hash(hasher, &fragment.canonical_signature()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_crypto::Sha3Keccak;
    use serde_json::json;

    // ==================== Known vectors ====================

    #[test]
    fn test_transfer_selector() {
        let fragment = Fragment::from_json(&json!({
            "type": "function",
            "name": "transfer",
            "inputs": [
                {"name": "to", "type": "address"},
                {"name": "amount", "type": "uint256"}
            ]
        }))
        .unwrap();
        assert_eq!(
            function_selector(&Sha3Keccak, &fragment).unwrap(),
            [0xa9, 0x05, 0x9c, 0xbb]
        );
    }

    #[test]
    fn test_my_method_selector() {
        let fragment = Fragment::from_json(&json!({
            "type": "function",
            "name": "myMethod",
            "inputs": [
                {"name": "myNumber", "type": "uint256"},
                {"name": "myString", "type": "string"}
            ]
        }))
        .unwrap();
        assert_eq!(
            function_selector(&Sha3Keccak, &fragment).unwrap(),
            [0x24, 0xee, 0x00, 0x97]
        );
    }

    #[test]
    fn test_event_topic_vector() {
        let fragment = Fragment::from_json(&json!({
            "type": "event",
            "name": "myEvent",
            "inputs": [
                {"name": "myNumber", "type": "uint256"},
                {"name": "myBytes", "type": "bytes32"}
            ]
        }))
        .unwrap();
        assert_eq!(
            event_topic(&Sha3Keccak, &fragment).unwrap().to_hex(),
            "0xf2eeb729e636a8cb783be044acf6b7b1e2c5863735b60d6daae84c366ee87d97"
        );
    }

    // ==================== Kind checks ====================

    #[test]
    fn test_selector_rejects_event() {
        let fragment = Fragment::from_json(&json!({
            "type": "event",
            "name": "Ping",
            "inputs": []
        }))
        .unwrap();
        assert!(function_selector(&Sha3Keccak, &fragment).is_err());
    }

    #[test]
    fn test_topic_rejects_function() {
        let fragment = Fragment::from_json(&json!({
            "type": "function",
            "name": "ping",
            "inputs": []
        }))
        .unwrap();
        assert!(event_topic(&Sha3Keccak, &fragment).is_err());
    }
}
