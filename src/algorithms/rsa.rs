//! Generic RSA implementation

use num_bigint::BigUint;
use num_traits::Zero;

use crate::errors::{Error, Result};
use crate::traits::{PrivateKeyParts, PublicKeyParts};

/// ⚠️ Raw RSA encryption of m with the public key. No padding is performed.
#[inline]
pub fn rsa_encrypt<K: PublicKeyParts>(key: &K, m: &BigUint) -> Result<BigUint> {
    if m >= key.n() {
        return Err(Error::MessageTooLong);
    }
    Ok(m.modpow(key.e(), key.n()))
}

/// ⚠️ Performs raw RSA decryption with no padding or error checking.
#[inline]
pub fn rsa_decrypt<K: PrivateKeyParts>(priv_key: &K, c: &BigUint) -> Result<BigUint> {
    if c >= priv_key.n() {
        return Err(Error::Decryption);
    }

    if priv_key.n().is_zero() || priv_key.d().is_zero() {
        return Err(Error::Decryption);
    }

    Ok(c.modpow(priv_key.d(), priv_key.n()))
}

/// Returns a big-endian byte string of exactly `len` bytes, left padded with zeros.
pub(crate) fn uint_to_be_pad(input: BigUint, len: usize) -> Result<alloc::vec::Vec<u8>> {
    let bytes = input.to_bytes_be();
    if bytes.len() > len {
        return Err(Error::Decryption);
    }

    let mut out = vec![0u8; len];
    out[len - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}
