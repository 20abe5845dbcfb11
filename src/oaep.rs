//! Encryption and Decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).
//!
//! # Usage
//!
//! ```
//! use rsa_vanity::{KeyPair, Oaep};
//! use sha2::Sha256;
//!
//! let mut rng = rand_core::OsRng;
//! let private_key = KeyPair::new(&mut rng, 1024).expect("failed to generate a key");
//! let public_key = private_key.to_public_key();
//!
//! let data = b"hello world";
//! let enc_data = public_key
//!     .encrypt(&mut rng, Oaep::new::<Sha256>(), &data[..])
//!     .expect("failed to encrypt");
//! assert_ne!(&data[..], &enc_data[..]);
//!
//! let dec_data = private_key
//!     .decrypt(Oaep::new::<Sha256>(), &enc_data)
//!     .expect("failed to decrypt");
//! assert_eq!(&data[..], &dec_data[..]);
//! ```

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use digest::{Digest, DynDigest};
use num_bigint::BigUint;
use rand_core::CryptoRngCore;

use crate::algorithms::oaep::{oaep_decrypt, oaep_encrypt};
use crate::algorithms::rsa::{rsa_decrypt, rsa_encrypt, uint_to_be_pad};
use crate::errors::{Error, Result};
use crate::key::KeyPair;
use crate::traits::{PaddingScheme, PublicKeyParts};

pub use crate::algorithms::mgf::{mgf1, xor};

/// Encryption and Decryption using [OAEP padding](https://datatracker.ietf.org/doc/html/rfc8017#section-7.1).
///
/// - `digest` hashes the label and drives the MGF1 mask. The maximum possible
///   plaintext length is `m = k - 2 * h_len - 2`, where `k` is the size of
///   the RSA modulus in bytes.
/// - `label` is optional data that can be associated with the message.
pub struct Oaep {
    /// Digest type to use.
    pub digest: Box<dyn DynDigest + Send + Sync>,

    /// Label bound to the ciphertext, empty by default.
    pub label: Vec<u8>,
}

impl Oaep {
    /// Create a new OAEP `PaddingScheme` with an empty label, using `T` as
    /// the hash function.
    pub fn new<T: 'static + Digest + DynDigest + Send + Sync>() -> Self {
        Self {
            digest: Box::new(<T as Digest>::new()),
            label: Vec::new(),
        }
    }

    /// Create a new OAEP `PaddingScheme` with an associated `label`, using
    /// `T` as the hash function.
    pub fn new_with_label<T: 'static + Digest + DynDigest + Send + Sync, S: AsRef<[u8]>>(
        label: S,
    ) -> Self {
        Self {
            digest: Box::new(<T as Digest>::new()),
            label: label.as_ref().to_vec(),
        }
    }
}

impl PaddingScheme for Oaep {
    fn decrypt(mut self, priv_key: &KeyPair, ciphertext: &[u8]) -> Result<Vec<u8>> {
        decrypt(priv_key, ciphertext, &mut *self.digest, &self.label)
    }

    fn encrypt<Rng: CryptoRngCore + ?Sized>(
        mut self,
        rng: &mut Rng,
        pub_key: &KeyPair,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        encrypt(rng, pub_key, msg, &mut *self.digest, &self.label)
    }
}

impl fmt::Debug for Oaep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAEP")
            .field("digest", &"...")
            .field("label", &self.label)
            .finish()
    }
}

/// Encrypts the given message with RSA and the padding scheme from
/// [PKCS#1 OAEP].
///
/// The message must be no longer than the length of the public modulus minus
/// `2 + (2 * hash.size())`. The ciphertext is exactly `pub_key.size()` bytes,
/// which is `ceil(bits(n) / 8)`: a modulus whose bit length is not a multiple
/// of 8 rounds up to the next whole byte.
///
/// [PKCS#1 OAEP]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1
#[inline]
pub fn encrypt<R: CryptoRngCore + ?Sized, K: PublicKeyParts>(
    rng: &mut R,
    pub_key: &K,
    msg: &[u8],
    digest: &mut dyn DynDigest,
    label: &[u8],
) -> Result<Vec<u8>> {
    let k = pub_key.size();

    let em = oaep_encrypt(rng, msg, digest, label, k)?;
    let m = BigUint::from_bytes_be(&em);
    let c = rsa_encrypt(pub_key, &m)?;

    uint_to_be_pad(c, k).map_err(|_| Error::MessageTooLong)
}

/// Decrypts a plaintext using RSA and the padding scheme from [PKCS#1 OAEP].
///
/// Fails with [`Error::Decryption`] when the ciphertext length differs from
/// the modulus length `ceil(bits(n) / 8)`, when the key cannot decrypt, and
/// on every padding check. The error does not say which check failed.
///
/// [PKCS#1 OAEP]: https://datatracker.ietf.org/doc/html/rfc8017#section-7.1
#[inline]
pub fn decrypt(
    priv_key: &KeyPair,
    ciphertext: &[u8],
    digest: &mut dyn DynDigest,
    label: &[u8],
) -> Result<Vec<u8>> {
    let k = priv_key.size();
    let h_size = digest.output_size();

    if ciphertext.len() != k || k < h_size * 2 + 2 {
        return Err(Error::Decryption);
    }

    let c = BigUint::from_bytes_be(ciphertext);
    let m = rsa_decrypt(priv_key, &c)?;
    let mut em = zeroize::Zeroizing::new(uint_to_be_pad(m, k)?);

    oaep_decrypt(&mut em, digest, label, k)
}
