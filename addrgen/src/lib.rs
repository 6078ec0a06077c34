//! addrgen - Bitcoin key and address derivation from BIP-39 mnemonics
//!
//! This library validates mnemonic phrases, expands them into seeds,
//! walks the BIP-32 key tree and encodes the resulting keys as P2PKH,
//! P2SH-wrapped P2WPKH and native P2WPKH addresses and WIF strings.
//!
//! ```no_run
//! use addrgen::{derive, encode_address, mnemonic_to_seed, validate_mnemonic, ScriptType};
//!
//! let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
//! assert!(validate_mnemonic(phrase));
//!
//! let seed = mnemonic_to_seed(phrase, "");
//! let key = derive(seed.as_bytes(), "m/84'/0'/0'/0/0")?;
//! let address = encode_address(&key.public_key, ScriptType::P2wpkh)?;
//! # Ok::<(), addrgen::Error>(())
//! ```

pub mod error;
pub mod crypto;
pub mod account;

// Re-export commonly used types for convenience
pub use account::{AddressGenerator, AddressRecord, GeneratorConfig, MnemonicOutcome, PathTemplate};
pub use crypto::keys::{
    decode_wif, derive, encode_address, encode_address_for, encode_wif, encode_wif_for, DecodedWif,
    DerivationPath, DerivedKey, Network, ScriptType,
};
pub use crypto::mnemonic::{mnemonic_to_seed, validate_mnemonic, MnemonicStrength, Seed};
pub use error::{Error, MnemonicError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
