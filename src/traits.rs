//! RSA-related trait definitions.

pub(crate) mod keys;
mod padding;

pub use keys::{PrivateKeyParts, PublicKeyParts};
pub use padding::PaddingScheme;
