//! Keccak-256 hashing

use quartz_primitives::H256;
use sha3::{Digest, Keccak256 as Sha3Keccak256};

/// Compute the Keccak-256 hash of the input data
pub fn keccak256(data: &[u8]) -> H256 {
    let mut hasher = Sha3Keccak256::new();
    hasher.update(data);
    let result = hasher.finalize();
    H256::from_bytes(result.into())
}

/// Injected hash primitive used for selector and topic computation.
///
/// Implementations must be stateless with respect to individual calls so
/// that concurrent reentrant use is safe.
pub trait Keccak256: Send + Sync {
    /// Hash arbitrary bytes to a 32-byte digest
    fn keccak256(&self, data: &[u8]) -> H256;
}

/// Default [`Keccak256`] implementation backed by the `sha3` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3Keccak;

impl Keccak256 for Sha3Keccak {
    fn keccak256(&self, data: &[u8]) -> H256 {
        keccak256(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Ethereum official test vectors ====================

    #[test]
    fn test_keccak256_empty() {
        let hash = keccak256(&[]);
        assert_eq!(
            hash.to_hex(),
            "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_keccak256_hello() {
        let hash = keccak256(b"hello");
        assert_eq!(
            hash.to_hex(),
            "0x1c8aff950685c2ed4bc3174f3472287b56d9517b9c948127319a09a7a36deac8"
        );
    }

    #[test]
    fn test_keccak256_quick_brown_fox() {
        let hash = keccak256(b"The quick brown fox jumps over the lazy dog");
        assert_eq!(
            hash.to_hex(),
            "0x4d741b6f1eb29cb2a9b9911c82f56fa8d73b04959d3d9d222895df6c0b28aa15"
        );
    }

    // ==================== Selector vectors ====================

    #[test]
    fn test_keccak256_transfer_selector() {
        // keccak256("transfer(address,uint256)") starts with 0xa9059cbb
        let hash = keccak256(b"transfer(address,uint256)");
        assert_eq!(&hash.as_bytes()[..4], &[0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_keccak256_balanceof_selector() {
        let hash = keccak256(b"balanceOf(address)");
        assert_eq!(&hash.as_bytes()[..4], &[0x70, 0xa0, 0x82, 0x31]);
    }

    // ==================== Determinism and reentrancy ====================

    #[test]
    fn test_keccak256_deterministic() {
        let data = b"test data for determinism";
        assert_eq!(keccak256(data), keccak256(data));
    }

    #[test]
    fn test_trait_impl_matches_free_function() {
        let hasher = Sha3Keccak;
        assert_eq!(hasher.keccak256(b"abc"), keccak256(b"abc"));
    }

    #[test]
    fn test_keccak256_block_boundaries() {
        // 136 bytes is the keccak rate; 137 spans two blocks
        for len in [135usize, 136, 137] {
            let data = vec![0xab; len];
            assert_eq!(keccak256(&data).as_bytes().len(), 32);
        }
    }
}
