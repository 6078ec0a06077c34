//! Key derivation and encoding
//!
//! `curve` wraps secp256k1 point operations, `derivation` implements the
//! BIP-32 key tree and `bitcoin` turns the resulting keys into addresses
//! and WIF strings.

pub mod bitcoin;
pub mod curve;
mod derivation;

pub use self::bitcoin::{
    decode_wif, encode_address, encode_address_for, encode_wif, encode_wif_for, DecodedWif,
    Network, ScriptType,
};
pub use curve::derive_public_key;
pub use derivation::*;
