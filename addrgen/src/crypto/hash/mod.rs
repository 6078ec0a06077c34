//! Hash primitives used by address and key encoding
//!
//! RIPEMD-160 sits behind [`Ripemd160Backend`] so the bundled portable
//! implementation and the RustCrypto one can be swapped at build time
//! (feature `native-ripemd`) while producing identical digests.

mod ripemd160;

use sha2::{Digest, Sha256};

pub use ripemd160::PortableRipemd160;

/// A RIPEMD-160 implementation
pub trait Ripemd160Backend {
    fn digest(data: &[u8]) -> [u8; 20];
}

/// RIPEMD-160 from the `ripemd` crate
#[cfg(feature = "native-ripemd")]
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRipemd160;

#[cfg(feature = "native-ripemd")]
impl Ripemd160Backend for NativeRipemd160 {
    fn digest(data: &[u8]) -> [u8; 20] {
        ripemd::Ripemd160::digest(data).into()
    }
}

/// Backend selected for this build
#[cfg(feature = "native-ripemd")]
pub type DefaultRipemd160 = NativeRipemd160;

/// Backend selected for this build
#[cfg(not(feature = "native-ripemd"))]
pub type DefaultRipemd160 = PortableRipemd160;

/// SHA-256 of the input
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256(SHA-256(data)), used for Base58Check checksums
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160 with the build's default backend
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    DefaultRipemd160::digest(data)
}

/// RIPEMD-160(SHA-256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160_with::<DefaultRipemd160>(data)
}

/// [`hash160`] with an explicit RIPEMD-160 backend
pub fn hash160_with<R: Ripemd160Backend>(data: &[u8]) -> [u8; 20] {
    R::digest(&sha256(data))
}
