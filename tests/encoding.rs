//! PKCS#1 encoding tests.

use hex_literal::hex;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use rsa_vanity::{
    onion::onion_address,
    pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey, EncodeRsaPublicKey},
    BigUint, Error, KeyPair, PublicKeyParts,
};

const RSA_2048_PUB_PEM: &str = "-----BEGIN RSA PUBLIC KEY-----
MIIBCgKCAQEAtsQsUV8QpqrygsY+2+JCQ6Fw8/omM71IM2N/R8pPbzbgOl0p78MZ
GsgPOQ2HSznjD0FPzsH8oO2B5Uftws04LHb2HJAYlz25+lN5cqfHAfa3fgmC38Ff
wBkn7l582UtPWZ/wcBOnyCgb3yLcvJrXyrt8QxHJgvWO23ITrUVYszImbXQ67YGS
0YhMrbixRzmo2tpm3JcIBtnHrEUMsT0NfFdfsZhTT8YbxBvA8FdODgEwx7u/vf3J
9qbi4+Kv8cvqyJuleIRSjVXPsIMnoejIn04APPKIjpMyQdnWlby7rNyQtE4+CV+j
cFjqJbE/Xilcvqxt6DirjFCvYeKYl1uHLwIDAQAB
-----END RSA PUBLIC KEY-----
";

#[test]
fn decode_rsa2048_pub_pem() {
    let key = KeyPair::from_public_key_pem(RSA_2048_PUB_PEM).unwrap();

    assert_eq!(key.n().bits(), 2048);
    assert_eq!(key.e(), &BigUint::from(65537u32));
    assert!(key.n().to_bytes_be().starts_with(&hex!("b6c42c515f10a6aa")));
    assert!(!key.is_private());
}

#[test]
fn encode_rsa2048_pub_pem() {
    let key = <KeyPair as DecodeRsaPublicKey>::from_pkcs1_pem(RSA_2048_PUB_PEM).unwrap();
    let pem = EncodeRsaPublicKey::to_pkcs1_pem(&key, rsa_vanity::pkcs1::LineEnding::LF).unwrap();
    assert_eq!(pem, RSA_2048_PUB_PEM);
    assert_eq!(key.to_public_key_pem().unwrap(), RSA_2048_PUB_PEM);
}

#[test]
fn public_der_is_what_the_address_hashes() {
    let key = KeyPair::from_public_key_pem(RSA_2048_PUB_PEM).unwrap();
    let der = key.public_key_der().unwrap();
    assert_eq!(der, EncodeRsaPublicKey::to_pkcs1_der(&key).unwrap().as_bytes());
    assert_eq!(&der[..4], &hex!("3082010a"));

    // base32(sha1(der))[..16]
    assert_eq!(onion_address(key.n(), key.e()).unwrap(), "ooczpdsql7augdzn");
}

#[test]
fn private_key_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = KeyPair::new(&mut rng, 1024).unwrap();

    let der = EncodeRsaPrivateKey::to_pkcs1_der(&key).unwrap();
    let decoded = <KeyPair as DecodeRsaPrivateKey>::from_pkcs1_der(der.as_bytes()).unwrap();
    assert_eq!(decoded, key);

    let pem = key.to_private_key_pem().unwrap();
    assert!(pem.ends_with("-----END RSA PRIVATE KEY-----\n"));
    let decoded = KeyPair::from_private_key_pem(&pem).unwrap();
    assert_eq!(decoded, key);
    assert_eq!(decoded.dp(), key.dp());
    assert_eq!(decoded.qinv(), key.qinv());
}

#[test]
fn public_key_roundtrip() {
    let mut rng = ChaCha8Rng::from_seed([7; 32]);
    let key = KeyPair::new(&mut rng, 512).unwrap().to_public_key();

    let der = EncodeRsaPublicKey::to_pkcs1_der(&key).unwrap();
    let decoded = <KeyPair as DecodeRsaPublicKey>::from_pkcs1_der(der.as_bytes()).unwrap();
    assert_eq!(decoded, key);
}

#[test]
fn private_pem_is_not_a_public_key() {
    let mut rng = ChaCha8Rng::from_seed([42; 32]);
    let key = KeyPair::new(&mut rng, 512).unwrap();
    let pem = key.to_private_key_pem().unwrap();

    assert!(matches!(
        KeyPair::from_public_key_pem(&pem),
        Err(Error::InvalidKeyEncoding(_))
    ));
    assert!(matches!(
        KeyPair::from_private_key_pem(RSA_2048_PUB_PEM),
        Err(Error::InvalidKeyEncoding(_))
    ));
}
