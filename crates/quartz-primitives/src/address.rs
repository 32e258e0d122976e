//! Ethereum-compatible address type (20 bytes)

use std::fmt;

use crate::PrimitiveError;

/// Ethereum-compatible 20-byte address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// Size of an address in bytes
    pub const LEN: usize = 20;

    /// Zero address (0x0000...0000)
    pub const ZERO: Address = Address([0u8; 20]);

    /// Create an address from a byte array
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Create an address from a slice, failing unless it is exactly 20 bytes
    pub fn from_slice(slice: &[u8]) -> Result<Self, PrimitiveError> {
        if slice.len() != Self::LEN {
            return Err(PrimitiveError::InvalidLength {
                expected: Self::LEN,
                actual: slice.len(),
            });
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Address(bytes))
    }

    /// Parse an address from a hex string (case-insensitive, optional 0x prefix)
    pub fn from_hex(s: &str) -> Result<Self, PrimitiveError> {
        let s = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }

    /// Get as byte array reference
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Render as a lowercase hex string with 0x prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Basic functionality ====================

    #[test]
    fn test_address_from_hex() {
        let addr = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        assert!(!addr.is_zero());

        let addr2 = Address::from_hex("742d35Cc6634C0532925a3b844Bc9e7595f0aB3d").unwrap();
        assert_eq!(addr, addr2);
    }

    #[test]
    fn test_zero_address() {
        let zero = Address::ZERO;
        assert!(zero.is_zero());
        assert_eq!(zero.to_hex(), "0x0000000000000000000000000000000000000000");
    }

    #[test]
    fn test_address_display_lowercase() {
        let addr = Address::from_hex("0x742D35CC6634C0532925A3B844BC9E7595F0AB3D").unwrap();
        assert_eq!(
            format!("{}", addr),
            "0x742d35cc6634c0532925a3b844bc9e7595f0ab3d"
        );
    }

    #[test]
    fn test_address_uppercase_prefix() {
        let lower = Address::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        let upper = Address::from_hex("0X742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_address_mixed_case_equality() {
        let lower = Address::from_hex("0x742d35cc6634c0532925a3b844bc9e7595f0ab3d").unwrap();
        let upper = Address::from_hex("0x742D35CC6634C0532925A3B844BC9E7595F0AB3D").unwrap();
        assert_eq!(lower, upper);
    }

    // ==================== Length boundaries ====================

    #[test]
    fn test_address_too_short() {
        let result = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB");
        match result {
            Err(PrimitiveError::InvalidLength { expected: 20, actual: 19 }) => {}
            other => panic!("expected InvalidLength(19), got {:?}", other),
        }
    }

    #[test]
    fn test_address_too_long() {
        let result = Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3d00");
        match result {
            Err(PrimitiveError::InvalidLength { expected: 20, actual: 21 }) => {}
            other => panic!("expected InvalidLength(21), got {:?}", other),
        }
    }

    #[test]
    fn test_address_invalid_hex() {
        assert!(Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aGGG").is_err());
        assert!(Address::from_hex("0x742d35Cc6634C0532925a3b844Bc9e7595f0aB3").is_err());
    }

    #[test]
    fn test_address_empty() {
        assert!(Address::from_hex("").is_err());
        assert!(Address::from_hex("0x").is_err());
    }
}
