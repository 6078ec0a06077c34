//! Address records

use serde::{Deserialize, Serialize};

use crate::crypto::keys::{encode_address_for, encode_wif_for, DerivedKey, Network, ScriptType};
use crate::error::Result;

/// One derived address together with the key material behind it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressRecord {
    /// Position of the mnemonic within its batch
    pub seed_index: usize,
    /// Full derivation path of the key, including the address index
    pub path: String,
    /// Address index within its path template
    pub address_index: u32,
    /// The address string in the network's native format
    pub address: String,
    /// Compressed public key, hex
    pub public_key: String,
    /// Private scalar, hex
    pub private_key: String,
    /// Compressed WIF encoding of the private key
    pub wif: String,
    pub script_type: ScriptType,
}

impl AddressRecord {
    /// Encode a derived key as an address of the given script type
    pub fn from_key(
        seed_index: usize,
        path: String,
        address_index: u32,
        key: &DerivedKey,
        script_type: ScriptType,
        network: Network,
    ) -> Result<Self> {
        let address = encode_address_for(&key.public_key, script_type, network)?;
        let wif = encode_wif_for(&key.private_key, true, network)?;

        Ok(Self {
            seed_index,
            path,
            address_index,
            address,
            public_key: hex::encode(key.public_key),
            private_key: hex::encode(key.private_key),
            wif,
            script_type,
        })
    }

    /// Get the address string
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Get the derivation path
    pub fn path(&self) -> &str {
        &self.path
    }
}
