use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Digest backing node and subtree fingerprints.
///
/// The choice is configuration, not code: every fingerprint in one index is
/// produced by the same digest, and indexes built with different digests
/// never share keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestKind {
    /// BLAKE3, 256-bit.
    #[default]
    Blake3,
    /// SHA-256, 256-bit.
    Sha256,
    /// rapidhash, 64-bit, non-cryptographic.
    Rapid64,
}

impl DigestKind {
    /// All supported digests.
    pub const ALL: [DigestKind; 3] = [DigestKind::Blake3, DigestKind::Sha256, DigestKind::Rapid64];

    /// Output width in bytes.
    pub fn width(self) -> usize {
        match self {
            DigestKind::Blake3 | DigestKind::Sha256 => 32,
            DigestKind::Rapid64 => 8,
        }
    }

    /// Whether equal fingerprints can be trusted as equal content without a
    /// structural check. Only digests of 128 bits or more qualify.
    pub fn is_collision_resistant(self) -> bool {
        self.width() >= 16
    }

    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            DigestKind::Blake3 => "blake3",
            DigestKind::Sha256 => "sha256",
            DigestKind::Rapid64 => "rapid64",
        }
    }
}

impl fmt::Display for DigestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DigestKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown digest: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_blake3() {
        assert_eq!(DigestKind::default(), DigestKind::Blake3);
    }

    #[test]
    fn only_wide_digests_are_collision_resistant() {
        assert!(DigestKind::Blake3.is_collision_resistant());
        assert!(DigestKind::Sha256.is_collision_resistant());
        assert!(!DigestKind::Rapid64.is_collision_resistant());
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("SHA256".parse::<DigestKind>(), Ok(DigestKind::Sha256));
        assert_eq!("rapid64".parse::<DigestKind>(), Ok(DigestKind::Rapid64));
        assert!("md5".parse::<DigestKind>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&DigestKind::Sha256).unwrap();
        assert_eq!(json, "\"sha256\"");
        let parsed: DigestKind = serde_json::from_str("\"rapid64\"").unwrap();
        assert_eq!(parsed, DigestKind::Rapid64);
    }
}
