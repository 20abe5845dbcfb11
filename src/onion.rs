//! Vanity onion addresses.
//!
//! An address is the SHA-1 digest of the DER encoded PKCS#1 public key,
//! written in lower case RFC 4648 base32 and cut to [`ADDRESS_LEN`]
//! characters.

use alloc::string::{String, ToString};

use base32ct::{Base32, Encoding};
use num_bigint::BigUint;
use sha1::{Digest, Sha1};

use crate::encoding::encode_public_key;
use crate::errors::{Error, Result};

/// Number of base32 characters kept from the digest.
pub const ADDRESS_LEN: usize = 16;

/// Characters an address can contain.
pub const ADDRESS_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz234567";

/// Returns the address for the public key `(n, e)`.
pub fn onion_address(n: &BigUint, e: &BigUint) -> Result<String> {
    let der = encode_public_key(n, e)?;
    let digest = Sha1::digest(der.as_bytes());

    let mut address = Base32::encode_string(&digest);
    address.make_ascii_lowercase();
    address.truncate(ADDRESS_LEN);
    Ok(address)
}

/// A validated address prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    /// Lower-cases `prefix` and checks that an address could start with it.
    pub fn new(prefix: &str) -> Result<Pattern> {
        let prefix = prefix.to_ascii_lowercase();

        if prefix.is_empty() {
            return Err(Error::InvalidPattern("pattern cannot be empty".to_string()));
        }
        if prefix.len() > ADDRESS_LEN {
            return Err(Error::InvalidPattern(format!(
                "pattern cannot be longer than {} characters",
                ADDRESS_LEN
            )));
        }
        if let Some(c) = prefix.chars().find(|c| !ADDRESS_ALPHABET.contains(*c)) {
            return Err(Error::InvalidPattern(format!(
                "'{}' is not a base32 character (a-z, 2-7)",
                c
            )));
        }

        Ok(Pattern(prefix))
    }

    /// Returns true if `address` starts with this pattern.
    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        address.as_bytes().starts_with(self.0.as_bytes())
    }

    /// Expected number of trials before a random address matches, `32^len`.
    pub fn estimated_difficulty(&self) -> f64 {
        32f64.powi(self.0.len() as i32)
    }

    /// The normalized prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of characters in the prefix.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the prefix is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for Pattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::str::FromStr for Pattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Pattern> {
        Pattern::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onion_address_vectors() {
        // sha1(3007 02020ca1 020111)
        assert_eq!(
            onion_address(&BigUint::from(3233u32), &BigUint::from(17u32)).unwrap(),
            "5kt5jj4425xluynv"
        );
        // sha1(3008 020300c35b 020103)
        assert_eq!(
            onion_address(&BigUint::from(50011u32), &BigUint::from(3u32)).unwrap(),
            "u5hc5crguoovwyyi"
        );
    }

    #[test]
    fn test_onion_address_shape() {
        let address = onion_address(&BigUint::from(0xffff_fffbu32), &BigUint::from(0x10001u32))
            .unwrap();
        assert_eq!(address.len(), ADDRESS_LEN);
        assert!(address.chars().all(|c| ADDRESS_ALPHABET.contains(c)));
    }

    #[test]
    fn test_pattern_validation() {
        let pattern = Pattern::new("AbC7").unwrap();
        assert_eq!(pattern.as_str(), "abc7");
        assert_eq!(pattern.len(), 4);
        assert!(!pattern.is_empty());
        assert!(matches!(Pattern::new(""), Err(Error::InvalidPattern(_))));
        assert!(matches!(Pattern::new("abc1"), Err(Error::InvalidPattern(_))));
        assert!(matches!(Pattern::new("ab-c"), Err(Error::InvalidPattern(_))));
        assert!(matches!(
            Pattern::new("abcdefghijklmnopq"),
            Err(Error::InvalidPattern(_))
        ));
        assert!(Pattern::new("abcdefghijklmnop").is_ok());
        assert!("xyz".parse::<Pattern>().is_ok());
    }

    #[test]
    fn test_pattern_matches_prefix_only() {
        let pattern = Pattern::new("5kt").unwrap();
        assert!(pattern.matches("5kt5jj4425xluynv"));
        assert!(!pattern.matches("x5kt5jj4425xluyn"));
        assert!(!pattern.matches("5k"));
    }

    #[test]
    fn test_estimated_difficulty() {
        assert_eq!(Pattern::new("a").unwrap().estimated_difficulty(), 32.0);
        assert_eq!(Pattern::new("abcd").unwrap().estimated_difficulty(), 1_048_576.0);
    }
}
