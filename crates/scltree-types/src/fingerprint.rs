use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

const WIDTH: usize = 32;

/// Content fingerprint of a node or of a rolled-up subtree.
///
/// A `Fingerprint` holds the output of whichever digest the index was built
/// with (up to [`Fingerprint::MAX_WIDTH`] bytes). Two equal fingerprints are
/// candidates for structural equality, not proof of it: narrow digests
/// collide, and the differ treats every bucket as possibly ambiguous.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint {
    width: u8,
    bytes: [u8; WIDTH],
}

impl Fingerprint {
    /// Widest digest a fingerprint can carry (256 bits).
    pub const MAX_WIDTH: usize = WIDTH;

    /// Wrap a digest output. Fails if the digest is empty or wider than
    /// [`Self::MAX_WIDTH`].
    pub fn from_digest(digest: &[u8]) -> Result<Self, TypeError> {
        if digest.is_empty() || digest.len() > Self::MAX_WIDTH {
            return Err(TypeError::InvalidWidth {
                max: Self::MAX_WIDTH,
                actual: digest.len(),
            });
        }
        let mut bytes = [0u8; Self::MAX_WIDTH];
        bytes[..digest.len()].copy_from_slice(digest);
        Ok(Self {
            width: digest.len() as u8,
            bytes,
        })
    }

    /// Create a full-width fingerprint from a 256-bit digest.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self {
            width: Self::MAX_WIDTH as u8,
            bytes: hash,
        }
    }

    /// Create a 64-bit fingerprint (non-cryptographic digests).
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; Self::MAX_WIDTH];
        bytes[..8].copy_from_slice(&value.to_be_bytes());
        Self { width: 8, bytes }
    }

    /// The digest bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.width as usize]
    }

    /// Digest width in bytes.
    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.bytes[..4.min(self.width as usize)])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        Self::from_digest(&bytes)
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for Fingerprint {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_hash(bytes)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn full_width_roundtrips_through_hex() {
        let fp = Fingerprint::from_hash([7; 32]);
        let parsed = Fingerprint::from_hex(&fp.to_hex()).unwrap();
        assert_eq!(fp, parsed);
        assert_eq!(fp.to_hex().len(), 64);
    }

    #[test]
    fn narrow_fingerprint_prints_only_its_width() {
        let fp = Fingerprint::from_u64(0xdead_beef_0000_0001);
        assert_eq!(fp.width(), 8);
        assert_eq!(fp.to_hex(), "deadbeef00000001");
        assert_eq!(fp.short_hex(), "deadbeef");
    }

    #[test]
    fn width_is_part_of_identity() {
        let narrow = Fingerprint::from_digest(&[1, 2, 3, 4]).unwrap();
        let mut padded = [0u8; 32];
        padded[..4].copy_from_slice(&[1, 2, 3, 4]);
        assert_ne!(narrow, Fingerprint::from_hash(padded));
    }

    #[test]
    fn rejects_empty_and_oversized_digests() {
        assert_eq!(
            Fingerprint::from_digest(&[]),
            Err(TypeError::InvalidWidth { max: 32, actual: 0 })
        );
        assert!(Fingerprint::from_digest(&[0u8; 33]).is_err());
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(matches!(
            Fingerprint::from_hex("not-hex"),
            Err(TypeError::InvalidHex(_))
        ));
    }

    #[test]
    fn serializes_as_hex_string() {
        let fp = Fingerprint::from_u64(42);
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, "\"000000000000002a\"");
        let parsed: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, fp);
    }

    #[test]
    fn debug_uses_short_hex() {
        let fp = Fingerprint::from_hash([0xab; 32]);
        assert_eq!(format!("{fp:?}"), "Fingerprint(abababab)");
    }

    proptest! {
        #[test]
        fn any_digest_roundtrips(digest in proptest::collection::vec(any::<u8>(), 1..=32)) {
            let fp = Fingerprint::from_digest(&digest).unwrap();
            prop_assert_eq!(fp.as_bytes(), digest.as_slice());
            prop_assert_eq!(Fingerprint::from_hex(&fp.to_hex()).unwrap(), fp);
        }
    }
}
