//! Generation of random primes and probabilistic prime checking.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::CryptoRngCore;

use crate::errors::{Error, Result};

/// Number of Miller-Rabin rounds applied to every candidate. Each round lets a
/// composite through with probability at most ¼, so 40 rounds bound the error
/// by 2⁻⁸⁰.
pub const MILLER_RABIN_ROUNDS: usize = 40;

const PRIMES_A: u64 = 3 * 5 * 7 * 11 * 13 * 17 * 19 * 23 * 37;
const PRIMES_B: u64 = 29 * 31 * 41 * 43 * 47 * 53;

/// Records the primes < 64.
const PRIME_BIT_MASK: u64 = 1 << 2
    | 1 << 3
    | 1 << 5
    | 1 << 7
    | 1 << 11
    | 1 << 13
    | 1 << 17
    | 1 << 19
    | 1 << 23
    | 1 << 29
    | 1 << 31
    | 1 << 37
    | 1 << 41
    | 1 << 43
    | 1 << 47
    | 1 << 53
    | 1 << 59
    | 1 << 61;

/// Returns a random odd number of exactly `bit_size` bits.
///
/// The top and bottom bits are always set, so the result has the requested
/// length and is odd.
pub fn random_odd<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<BigUint> {
    if bit_size < 2 {
        return Err(Error::PrimeTooSmall);
    }

    let mut b = bit_size % 8;
    if b == 0 {
        b = 8;
    }

    let mut bytes = vec![0u8; (bit_size + 7) / 8];
    rng.fill_bytes(&mut bytes);

    // Clear bits in the first byte to make sure the candidate has a size <= bits.
    bytes[0] &= ((1u32 << b) - 1) as u8;
    bytes[0] |= 1 << (b - 1);

    let last = bytes.len() - 1;
    bytes[last] |= 1;

    Ok(BigUint::from_bytes_be(&bytes))
}

/// Returns a prime of exactly `bit_size` bits.
///
/// Candidates are drawn with [`random_odd`] and stepped by two until one passes
/// [`probably_prime`]. A step that would overflow the bit size draws a fresh
/// candidate instead. The loop has no iteration bound.
pub fn find_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, bit_size: usize) -> Result<BigUint> {
    loop {
        let mut candidate = random_odd(rng, bit_size)?;
        while candidate.bits() == bit_size {
            if probably_prime(rng, &candidate, MILLER_RABIN_ROUNDS) {
                return Ok(candidate);
            }
            candidate += 2u32;
        }
    }
}

/// Reports whether `x` is probably prime.
///
/// Values below 64 are looked up directly. Larger values are first checked for
/// small factors and then run through `reps` rounds of Miller-Rabin with bases
/// drawn from `rng`.
pub fn probably_prime<R: CryptoRngCore + ?Sized>(rng: &mut R, x: &BigUint, reps: usize) -> bool {
    if let Some(small) = x.to_u64() {
        if small < 64 {
            return (PRIME_BIT_MASK & (1 << small)) != 0;
        }
    }

    if x.is_even() {
        return false;
    }

    let r_a = &(x % PRIMES_A);
    let r_b = &(x % PRIMES_B);

    if (r_a % 3u32).is_zero()
        || (r_a % 5u32).is_zero()
        || (r_a % 7u32).is_zero()
        || (r_a % 11u32).is_zero()
        || (r_a % 13u32).is_zero()
        || (r_a % 17u32).is_zero()
        || (r_a % 19u32).is_zero()
        || (r_a % 23u32).is_zero()
        || (r_a % 37u32).is_zero()
        || (r_b % 29u32).is_zero()
        || (r_b % 31u32).is_zero()
        || (r_b % 41u32).is_zero()
        || (r_b % 43u32).is_zero()
        || (r_b % 47u32).is_zero()
        || (r_b % 53u32).is_zero()
    {
        return false;
    }

    probably_prime_miller_rabin(rng, x, reps)
}

/// Reports whether n passes reps rounds of the Miller-Rabin primality test,
/// using bases drawn uniformly from `[2, n - 2]`.
/// See Handbook of Applied Cryptography, p. 139, Algorithm 4.24.
///
/// `n` must be odd and at least 5.
fn probably_prime_miller_rabin<R: CryptoRngCore + ?Sized>(
    rng: &mut R,
    n: &BigUint,
    reps: usize,
) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let nm1 = n - &one;

    // determine q, k such that nm1 = q << k
    let k = nm1.trailing_zeros().unwrap_or(0);
    let q = &nm1 >> k;

    'next: for _ in 0..reps {
        let base = rng.gen_biguint_range(&two, &nm1);

        let mut y = base.modpow(&q, n);
        if y.is_one() || y == nm1 {
            continue;
        }

        for _ in 1..k {
            y = y.modpow(&two, n);
            if y == nm1 {
                continue 'next;
            }
            if y.is_one() {
                return false;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    const PRIMES: &[&str] = &[
        "2",
        "3",
        "5",
        "7",
        "11",
        "13756265695458089029",
        "13496181268022124907",
        "10953742525620032441",
        "17908251027575790097",
        // https://golang.org/issue/638
        "18699199384836356663",
        "98920366548084643601728869055592650835572950932266967461790948584315647051443",
        "94560208308847015747498523884063394671606671904944666360068158221458669711639",
        // http://primes.utm.edu/lists/small/small3.html
        "449417999055441493994709297093108513015373787049558499205492347871729927573118262811508386655998299074566974373711472560655026288668094291699357843464363003144674940345912431129144354948751003607115263071543163",
        "230975859993204150666423538988557839555560243929065415434980904258310530753006723857139742334640122533598517597674807096648905501653461687601339782814316124971547968912893214002992086353183070342498989426570593",
        // Curve25519: 2^255-19
        "57896044618658097711785492504343953926634992332820282019728792003956564819949",
        // E-521: 2^521-1
        "6864797660130609714981900799081393217269435300143305409394463459185543183397656052122559640661454554977296311391480858037121987999716643812574028291115057151",
    ];

    const COMPOSITES: &[&str] = &[
        "0",
        "1",
        "21284175091214687912771199898307297748211672914763848041968395774954376176754",
        "6084766654921918907427900243509372380954290099172559290432744450051395395951",
        "84594350493221918389213352992032324280367711247940675652888030554255915464401",
        "82793403787388584738507275144194252681",
        // Arnault, "Rabin-Miller Primality Test: Composite Numbers Which Pass It",
        // Mathematics of Computation, 64(209) (January 1995), pp. 335-361.
        "1195068768795265792518361315725116351898245581", // strong pseudoprime to prime bases 2 through 29
        // Strong pseudoprimes to base 2.
        "2047",
        "3277",
        "4033",
        "4681",
        "8321",
        "15841",
        "29341",
        "42799",
        "49141",
        "52633",
        "65281",
        "74665",
        "80581",
        "85489",
        "88357",
        "90751",
        // Extra-strong Lucas pseudoprimes. https://oeis.org/A217719
        "989",
        "3239",
        "5777",
        "10877",
        "27971",
        "29681",
        "3673744903",
        "3281593591",
        "2385076987",
        "80579735209",
    ];

    #[test]
    fn test_primes() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for prime in PRIMES {
            let p = BigUint::parse_bytes(prime.as_bytes(), 10).unwrap();
            assert!(
                probably_prime(&mut rng, &p, MILLER_RABIN_ROUNDS),
                "{} is a prime",
                prime,
            );
        }
    }

    #[test]
    fn test_composites() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for comp in COMPOSITES {
            let p = BigUint::parse_bytes(comp.as_bytes(), 10).unwrap();
            assert!(
                !probably_prime(&mut rng, &p, MILLER_RABIN_ROUNDS),
                "{} is a composite",
                comp,
            );
        }
    }

    #[test]
    fn test_small_values_match_trial_division() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for i in 0u64..2000 {
            let expected = i >= 2 && (2..i).take_while(|d| d * d <= i).all(|d| i % d != 0);
            assert_eq!(
                probably_prime(&mut rng, &BigUint::from(i), MILLER_RABIN_ROUNDS),
                expected,
                "primality of {}",
                i
            );
        }
    }

    #[test]
    fn test_random_odd() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for bits in [2, 3, 7, 8, 9, 31, 64, 65, 512] {
            for _ in 0..20 {
                let x = random_odd(&mut rng, bits).unwrap();
                assert_eq!(x.bits(), bits);
                assert!(x.is_odd());
            }
        }
        assert!(matches!(random_odd(&mut rng, 1), Err(Error::PrimeTooSmall)));
        assert!(matches!(random_odd(&mut rng, 0), Err(Error::PrimeTooSmall)));
    }

    #[test]
    fn test_prime_small() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        for n in 2..10 {
            let p = find_prime(&mut rng, n).unwrap();

            assert_eq!(p.bits(), n);
            assert!(num_bigint::prime::probably_prime(&p, 20));
        }
    }

    #[test]
    fn test_find_prime_512() {
        let mut rng = ChaCha8Rng::from_seed([42; 32]);
        let p = find_prime(&mut rng, 512).unwrap();
        assert_eq!(p.bits(), 512);
        assert!(num_bigint::prime::probably_prime(&p, 20));
    }
}
