use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error returned when parsing an [`Address`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressParseError {
    #[error("address must be 42 characters, got {0}")]
    BadLength(usize),
    #[error("address must start with 0x")]
    MissingPrefix,
    #[error("address contains a non-hex character")]
    NonHex,
}

/// An account or contract deployment address.
///
/// Stored normalized to lowercase `0x` + 40 hex characters so that equality
/// and hashing ignore the checksum casing wallets tend to return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Returns the full lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form, e.g. `0x1234...abcd`.
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }

    /// Generates a random address (test and demo fixture helper).
    #[must_use]
    pub fn random() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 20];
        rand::rng().fill(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("0x{hex}"))
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 42 {
            return Err(AddressParseError::BadLength(s.len()));
        }
        if !s.starts_with("0x") {
            return Err(AddressParseError::MissingPrefix);
        }
        if !s[2..].chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressParseError::NonHex);
        }
        Ok(Self(s.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let upper = "0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA1111";
        let addr: Address = upper.parse().unwrap();
        assert_eq!(addr.as_str(), upper.to_ascii_lowercase());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            "0x1234".parse::<Address>(),
            Err(AddressParseError::BadLength(6))
        );
        assert_eq!(
            "ab1234567890123456789012345678901234567890".parse::<Address>(),
            Err(AddressParseError::MissingPrefix)
        );
        assert_eq!(
            "0xzz34567890123456789012345678901234567890".parse::<Address>(),
            Err(AddressParseError::NonHex)
        );
    }

    #[test]
    fn test_short_form() {
        let addr: Address = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1111"
            .parse()
            .unwrap();
        assert_eq!(addr.short(), "0xaaaa...1111");
    }

    #[test]
    fn test_random_is_valid() {
        let addr = Address::random();
        assert!(addr.as_str().parse::<Address>().is_ok());
        assert_ne!(Address::random(), Address::random());
    }
}
