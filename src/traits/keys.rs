//! Traits related to the key components

use num_bigint::BigUint;
use num_traits::Zero;

/// Components of an RSA public key.
pub trait PublicKeyParts {
    /// Returns the modulus of the key.
    fn n(&self) -> &BigUint;

    /// Returns the public exponent of the key.
    fn e(&self) -> &BigUint;

    /// Returns the modulus size in bytes, rounded up when the bit length is
    /// not a multiple of 8. Ciphertexts for or by this public key will have
    /// the same size.
    fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

/// Components of an RSA private key.
pub trait PrivateKeyParts: PublicKeyParts {
    /// Returns the private exponent of the key, zero for public-only keys.
    fn d(&self) -> &BigUint;

    /// Returns the prime factors, `[p, q]`.
    fn primes(&self) -> [&BigUint; 2];

    /// Returns true when the private exponent and primes are present.
    fn has_private_parts(&self) -> bool {
        let [p, q] = self.primes();
        !self.d().is_zero() && !p.is_zero() && !q.is_zero()
    }
}
