//! Useful algorithms related to RSA.

pub(crate) mod generate;
pub(crate) mod mgf;
pub(crate) mod oaep;
pub(crate) mod rsa;
