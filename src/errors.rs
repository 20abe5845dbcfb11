//! Error types.

/// Alias for [`core::result::Result`] with the `rsa_vanity` crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Message is longer than the modulus allows for the chosen padding.
    #[error("message too long")]
    MessageTooLong,

    /// Decryption failed. Every padding check reports this same variant.
    #[error("decryption error")]
    Decryption,

    /// Malformed DER or PEM key material.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(pkcs1::Error),

    /// Invalid prime value.
    #[error("invalid prime value")]
    InvalidPrime,

    /// Requested prime size is too small.
    #[error("prime size must be at least 2 bits")]
    PrimeTooSmall,

    /// Requested modulus size is too small to hold a key.
    #[error("modulus too small")]
    ModulusTooSmall,

    /// Invalid modulus.
    #[error("invalid modulus")]
    InvalidModulus,

    /// Invalid exponent.
    #[error("invalid exponent")]
    InvalidExponent,

    /// Vanity pattern is not a usable address prefix.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// Search parameters are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A search worker thread could not be started.
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl From<pkcs1::Error> for Error {
    fn from(err: pkcs1::Error) -> Error {
        Error::InvalidKeyEncoding(err)
    }
}

impl From<pkcs1::der::Error> for Error {
    fn from(err: pkcs1::der::Error) -> Error {
        Error::InvalidKeyEncoding(err.into())
    }
}
