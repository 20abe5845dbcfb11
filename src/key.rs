use alloc::vec::Vec;
use core::fmt;

use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::algorithms::generate::generate_key;
use crate::errors::{Error, Result};
use crate::traits::{PaddingScheme, PrivateKeyParts, PublicKeyParts};

/// Default public exponent used by [`KeyPair::new`].
pub const DEFAULT_EXPONENT: u64 = 3;

/// An RSA key pair.
///
/// A public-only key carries zero for the private exponent and both primes.
/// Values are never mutated after construction; derived keys are new values.
#[derive(Clone)]
pub struct KeyPair {
    /// Modulus
    n: BigUint,
    /// Public exponent
    e: BigUint,
    /// Private exponent
    d: BigUint,
    /// First prime factor of N
    p: BigUint,
    /// Second prime factor of N
    q: BigUint,
}

impl KeyPair {
    /// Generate a new key pair of the given bit size with public exponent 3.
    ///
    /// Fails with [`Error::ModulusTooSmall`](crate::Error::ModulusTooSmall)
    /// below 16 bits.
    pub fn new<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<KeyPair> {
        Self::new_with_exp(rng, bit_size, &BigUint::from(DEFAULT_EXPONENT))
    }

    /// Generate a new key pair of the given bit size and public exponent.
    pub fn new_with_exp<R: CryptoRngCore + ?Sized>(
        rng: &mut R,
        bit_size: usize,
        exp: &BigUint,
    ) -> Result<KeyPair> {
        generate_key(rng, bit_size, exp)
    }

    /// Creates a public-only key from its modulus and public exponent.
    pub fn new_public(n: BigUint, e: BigUint) -> Result<KeyPair> {
        let key = KeyPair {
            n,
            e,
            d: BigUint::zero(),
            p: BigUint::zero(),
            q: BigUint::zero(),
        };
        key.validate()?;
        Ok(key)
    }

    /// Constructs a full key pair from its components and validates it.
    pub fn from_components(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> Result<KeyPair> {
        let key = KeyPair { n, e, d, p, q };
        key.validate()?;
        Ok(key)
    }

    /// Builds a key from parts produced by key generation, skipping validation.
    pub(crate) fn from_parts_unchecked(
        n: BigUint,
        e: BigUint,
        d: BigUint,
        p: BigUint,
        q: BigUint,
    ) -> KeyPair {
        KeyPair { n, e, d, p, q }
    }

    /// Returns the public-only half of this key.
    pub fn to_public_key(&self) -> KeyPair {
        KeyPair {
            n: self.n.clone(),
            e: self.e.clone(),
            d: BigUint::zero(),
            p: BigUint::zero(),
            q: BigUint::zero(),
        }
    }

    /// Returns true when this key can decrypt.
    pub fn is_private(&self) -> bool {
        self.has_private_parts()
    }

    /// Returns `modulus - p - q + 1`, or `None` for public-only keys.
    pub fn totient(&self) -> Option<BigUint> {
        if !self.is_private() {
            return None;
        }
        Some(&self.n + BigUint::one() - &self.p - &self.q)
    }

    /// Returns `d mod (p - 1)`.
    pub fn dp(&self) -> Option<BigUint> {
        self.is_private()
            .then(|| &self.d % (&self.p - BigUint::one()))
    }

    /// Returns `d mod (q - 1)`.
    pub fn dq(&self) -> Option<BigUint> {
        self.is_private()
            .then(|| &self.d % (&self.q - BigUint::one()))
    }

    /// Returns `q^-1 mod p`.
    pub fn qinv(&self) -> Option<BigUint> {
        if !self.is_private() {
            return None;
        }
        self.q
            .clone()
            .mod_inverse(&self.p)
            .and_then(|qinv| qinv.into_biguint())
    }

    /// Performs basic sanity checks on the key.
    /// Returns `Ok(())` if everything is good, otherwise an appropriate error.
    pub fn validate(&self) -> Result<()> {
        if self.n.is_zero() || self.n.is_even() {
            return Err(Error::InvalidModulus);
        }
        if self.e < BigUint::from(2u8) || self.e >= self.n {
            return Err(Error::InvalidExponent);
        }

        let private_parts = [&self.d, &self.p, &self.q];
        if private_parts.iter().all(|v| v.is_zero()) {
            return Ok(());
        }
        if private_parts.iter().any(|v| v.is_zero()) {
            return Err(Error::InvalidPrime);
        }

        let one = BigUint::one();
        if self.p <= one || self.q <= one || &self.p * &self.q != self.n {
            return Err(Error::InvalidPrime);
        }

        // d*e must be congruent to 1 mod totient.
        let totient = &self.n + &one - &self.p - &self.q;
        if (&self.d * &self.e) % &totient != one {
            return Err(Error::InvalidExponent);
        }

        Ok(())
    }

    /// Encrypt the given message.
    pub fn encrypt<R: CryptoRngCore + ?Sized, P: PaddingScheme>(
        &self,
        rng: &mut R,
        padding: P,
        msg: &[u8],
    ) -> Result<Vec<u8>> {
        padding.encrypt(rng, self, msg)
    }

    /// Decrypt the given message.
    pub fn decrypt<P: PaddingScheme>(&self, padding: P, ciphertext: &[u8]) -> Result<Vec<u8>> {
        padding.decrypt(self, ciphertext)
    }
}

impl PublicKeyParts for KeyPair {
    fn n(&self) -> &BigUint {
        &self.n
    }

    fn e(&self) -> &BigUint {
        &self.e
    }
}

impl PrivateKeyParts for KeyPair {
    fn d(&self) -> &BigUint {
        &self.d
    }

    fn primes(&self) -> [&BigUint; 2] {
        [&self.p, &self.q]
    }
}

impl PartialEq for KeyPair {
    #[inline]
    fn eq(&self, other: &KeyPair) -> bool {
        self.n == other.n
            && self.e == other.e
            && self.d == other.d
            && self.p == other.p
            && self.q == other.q
    }
}

impl Eq for KeyPair {}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("n", &self.n)
            .field("e", &self.e)
            .field("private", &self.is_private())
            .finish_non_exhaustive()
    }
}

impl Zeroize for KeyPair {
    fn zeroize(&mut self) {
        self.d.zeroize();
        self.p.zeroize();
        self.q.zeroize();
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.zeroize();
    }
}
