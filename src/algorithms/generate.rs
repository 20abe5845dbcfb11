//! Generate prime components for the RSA key pair

use alloc::vec::Vec;
use num_bigint::{BigUint, IntoBigUint, ModInverse};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use crate::errors::{Error, Result};
use crate::key::KeyPair;
use crate::prime::find_prime;

/// Smallest modulus [`generate_key`] accepts. Below it there may be no
/// prime pair that is far enough apart with a totient coprime to `e`.
pub(crate) const MIN_MODULUS_BITS: usize = 16;

/// Two primes accepted by [`check_pair`], with their modulus and totient.
pub struct PrimePair {
    /// Earlier prime of the pair
    pub p: BigUint,
    /// Later prime of the pair
    pub q: BigUint,
    /// Modulus `p * q`
    pub n: BigUint,
    /// `n - p - q + 1`
    pub totient: BigUint,
}

impl Drop for PrimePair {
    fn drop(&mut self) {
        self.p.zeroize();
        self.q.zeroize();
        self.totient.zeroize();
    }
}

/// Returns the modulus `p*q` and totient `n - p - q + 1` for the given primes,
/// or `None` when they are too close together.
///
/// With `k = bits(p*q)`, the pair is accepted only if `|p - q| > 2^(k/2 - 100)`,
/// which keeps the modulus out of reach of Fermat factorization. The bound is
/// compared in squared form, `|p - q|^2 > 2^(k - 200)`, so odd `k` needs no
/// fractional powers.
pub fn check_pair(p: &BigUint, q: &BigUint) -> Option<(BigUint, BigUint)> {
    let n = p * q;
    let k = n.bits();
    let diff = if p > q { p - q } else { q - p };

    let far_enough = if k >= 200 {
        &diff * &diff > BigUint::one() << (k - 200)
    } else {
        // the bound is below one, any distinct pair clears it
        !diff.is_zero()
    };
    if !far_enough {
        return None;
    }

    let totient = &n + BigUint::one() - p - q;
    Some((n, totient))
}

/// Primes drawn so far by one generator, each paired with every later prime.
///
/// Pairs are handed out once; a rejected pair is never revisited.
pub(crate) struct PrimePool {
    bits: usize,
    primes: Vec<BigUint>,
}

impl PrimePool {
    pub(crate) fn new(bits: usize) -> Result<PrimePool> {
        if bits < 2 {
            return Err(Error::PrimeTooSmall);
        }
        Ok(PrimePool {
            bits,
            primes: Vec::new(),
        })
    }

    /// Draws a fresh prime and returns every accepted pair it forms with the
    /// primes drawn before it.
    pub(crate) fn next_pairs<R: CryptoRngCore + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Vec<PrimePair>> {
        let q = find_prime(rng, self.bits)?;
        let pairs = self
            .primes
            .iter()
            .filter_map(|p| {
                check_pair(p, &q).map(|(n, totient)| PrimePair {
                    p: p.clone(),
                    q: q.clone(),
                    n,
                    totient,
                })
            })
            .collect();
        self.primes.push(q);
        Ok(pairs)
    }

    pub(crate) fn len(&self) -> usize {
        self.primes.len()
    }
}

impl Drop for PrimePool {
    fn drop(&mut self) {
        for prime in self.primes.iter_mut() {
            prime.zeroize();
        }
        self.primes.clear();
    }
}

/// Returns the inverse of `exp` modulo `totient`, if they are coprime.
pub(crate) fn compute_private_exponent(exp: &BigUint, totient: &BigUint) -> Option<BigUint> {
    if !exp.gcd(totient).is_one() {
        return None;
    }
    exp.clone()
        .mod_inverse(totient)
        .and_then(|d| d.into_biguint())
}

/// Generates an RSA key pair of the given bit size and public exponent.
///
/// Primes of `bit_size / 2` bits are drawn one at a time and each is tried
/// against all earlier ones; the first accepted pair whose totient is coprime
/// with `exp` becomes the key. The modulus has `bit_size` or `bit_size - 1`
/// bits, since only the top bit of each prime is forced.
///
/// Returns [`Error::ModulusTooSmall`] for sizes below 16 bits.
pub(crate) fn generate_key<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    bit_size: usize,
    exp: &BigUint,
) -> Result<KeyPair> {
    if exp < &BigUint::from(2u8) || exp.is_even() {
        return Err(Error::InvalidExponent);
    }
    if bit_size < MIN_MODULUS_BITS {
        return Err(Error::ModulusTooSmall);
    }

    let mut pool = PrimePool::new(bit_size / 2)?;

    loop {
        for pair in pool.next_pairs(rng)? {
            if let Some(d) = compute_private_exponent(exp, &pair.totient) {
                return Ok(KeyPair::from_parts_unchecked(
                    pair.n.clone(),
                    exp.clone(),
                    d,
                    pair.p.clone(),
                    pair.q.clone(),
                ));
            }
        }
    }
}
