//! Mask generation function used by OAEP padding

use alloc::vec::Vec;
use digest::DynDigest;

/// Expands `seed` into exactly `len` bytes with MGF1.
///
/// The output is `H(seed || C)` for a 4 byte big-endian counter `C = 0, 1, ...`,
/// concatenated and truncated to `len`.
///
/// Panics if len is larger than 2**32. This is in accordance with RFC 8017 - PKCS #1 B.2.1
pub fn mgf1(seed: &[u8], len: usize, digest: &mut dyn DynDigest) -> Vec<u8> {
    let mut out = vec![0u8; len];
    mgf1_xor(&mut out, digest, seed);
    out
}

/// Byte-wise XOR of two sequences, truncated to the shorter one.
pub fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    a.iter().zip(b).map(|(x, y)| x ^ y).collect()
}

/// XORs the MGF1 expansion of `seed` into `out`.
///
/// Panics if out is larger than 2**32. This is in accordance with RFC 8017 - PKCS #1 B.2.1
pub(crate) fn mgf1_xor(out: &mut [u8], digest: &mut dyn DynDigest, seed: &[u8]) {
    let mut counter = [0u8; 4];
    let mut i = 0;

    const MAX_LEN: u64 = core::u32::MAX as u64 + 1;
    assert!(out.len() as u64 <= MAX_LEN);

    while i < out.len() {
        digest.update(seed);
        digest.update(&counter);

        let digest_output = digest.finalize_reset();
        for byte in digest_output.iter() {
            if i >= out.len() {
                break;
            }
            out[i] ^= byte;
            i += 1;
        }
        inc_counter(&mut counter);
    }
}

fn inc_counter(counter: &mut [u8; 4]) {
    for i in (0..4).rev() {
        counter[i] = counter[i].wrapping_add(1);
        if counter[i] != 0 {
            // No overflow
            return;
        }
    }
}
