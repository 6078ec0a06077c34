//! Bitcoin address and private key encoding

use std::fmt;
use std::str::FromStr;

use bitcoin_bech32::{u5, WitnessProgram};
use serde::{Deserialize, Serialize};
pub use bitcoin::Network;

use crate::crypto::hash::{hash160, sha256d};
use crate::crypto::keys::curve::{parse_compressed_public_key, secret_key_from_bytes};
use crate::error::{Error, Result};

const CHECKSUM_LEN: usize = 4;
const COMPRESSED_FLAG: u8 = 0x01;

/// How funds sent to an address are locked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptType {
    /// Legacy pay-to-public-key-hash (`1...`)
    #[serde(rename = "P2PKH")]
    P2pkh,
    /// Native segwit pay-to-witness-public-key-hash (`bc1q...`)
    #[serde(rename = "P2WPKH")]
    P2wpkh,
    /// P2WPKH wrapped in pay-to-script-hash (`3...`)
    #[serde(rename = "P2WPKH nested in P2SH", alias = "P2WPKH-P2SH", alias = "P2SH-P2WPKH")]
    P2wpkhInP2sh,
}

impl ScriptType {
    pub const ALL: [ScriptType; 3] = [Self::P2pkh, Self::P2wpkh, Self::P2wpkhInP2sh];

    /// The script-semantics tag written into address records
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P2pkh => "P2PKH",
            Self::P2wpkh => "P2WPKH",
            Self::P2wpkhInP2sh => "P2WPKH nested in P2SH",
        }
    }
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim();
        match tag.to_ascii_uppercase().as_str() {
            "P2PKH" => Ok(Self::P2pkh),
            "P2WPKH" => Ok(Self::P2wpkh),
            "P2WPKH NESTED IN P2SH" | "P2WPKH-P2SH" | "P2SH-P2WPKH" => Ok(Self::P2wpkhInP2sh),
            _ => Err(Error::UnsupportedScriptType(tag.to_string())),
        }
    }
}

/// Version bytes and segwit parameters for one network
#[derive(Debug, Clone, Copy)]
struct NetworkParams {
    pubkey_hash: u8,
    script_hash: u8,
    secret_key: u8,
    segwit: bitcoin_bech32::constants::Network,
}

const MAINNET: NetworkParams = NetworkParams {
    pubkey_hash: 0x00,
    script_hash: 0x05,
    secret_key: 0x80,
    segwit: bitcoin_bech32::constants::Network::Bitcoin,
};

const TESTNET: NetworkParams = NetworkParams {
    pubkey_hash: 0x6f,
    script_hash: 0xc4,
    secret_key: 0xef,
    segwit: bitcoin_bech32::constants::Network::Testnet,
};

fn params(network: Network) -> NetworkParams {
    match network {
        Network::Bitcoin => MAINNET,
        Network::Regtest => NetworkParams {
            segwit: bitcoin_bech32::constants::Network::Regtest,
            ..TESTNET
        },
        _ => TESTNET,
    }
}

/// Base58 of `version || payload || sha256d(version || payload)[..4]`
pub fn base58check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    data.push(version);
    data.extend_from_slice(payload);

    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(data).into_string()
}

/// Decode Base58Check text, returning `version || payload` with the checksum verified
pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>> {
    let data = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| Error::Encoding(format!("invalid base58: {}", e)))?;

    if data.len() <= CHECKSUM_LEN {
        return Err(Error::InvalidInputLength {
            what: "base58check data",
            expected: CHECKSUM_LEN + 1,
            got: data.len(),
        });
    }

    let (body, checksum) = data.split_at(data.len() - CHECKSUM_LEN);
    if sha256d(body)[..CHECKSUM_LEN] != *checksum {
        return Err(Error::ChecksumMismatch);
    }
    Ok(body.to_vec())
}

/// Bech32 encoding of a version 0 witness program
pub fn segwit_v0_address(program: &[u8], network: Network) -> Result<String> {
    let version = u5::try_from_u8(0).map_err(|e| Error::Encoding(e.to_string()))?;
    let witness_program = WitnessProgram::new(version, program.to_vec(), params(network).segwit)
        .map_err(|e| Error::Encoding(format!("invalid witness program: {}", e)))?;
    Ok(witness_program.to_address())
}

/// `OP_0 <20-byte key hash>`, the redeem script of a wrapped P2WPKH output
pub fn p2wpkh_witness_script(pubkey_hash: &[u8; 20]) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[0] = 0x00;
    script[1] = 0x14;
    script[2..].copy_from_slice(pubkey_hash);
    script
}

/// Encode a mainnet address for a compressed public key
pub fn encode_address(public_key: &[u8], script_type: ScriptType) -> Result<String> {
    encode_address_for(public_key, script_type, Network::Bitcoin)
}

/// Encode an address for a compressed public key on the given network
pub fn encode_address_for(public_key: &[u8], script_type: ScriptType, network: Network) -> Result<String> {
    parse_compressed_public_key(public_key)?;

    let params = params(network);
    let pubkey_hash = hash160(public_key);

    match script_type {
        ScriptType::P2pkh => Ok(base58check_encode(params.pubkey_hash, &pubkey_hash)),
        ScriptType::P2wpkh => segwit_v0_address(&pubkey_hash, network),
        ScriptType::P2wpkhInP2sh => {
            let script_hash = hash160(&p2wpkh_witness_script(&pubkey_hash));
            Ok(base58check_encode(params.script_hash, &script_hash))
        }
    }
}

/// Encode a mainnet WIF private key
pub fn encode_wif(private_key: &[u8], compressed: bool) -> Result<String> {
    encode_wif_for(private_key, compressed, Network::Bitcoin)
}

/// Encode a WIF private key on the given network
pub fn encode_wif_for(private_key: &[u8], compressed: bool, network: Network) -> Result<String> {
    let secret_key = secret_key_from_bytes(private_key)?;

    let mut payload = secret_key.secret_bytes().to_vec();
    if compressed {
        payload.push(COMPRESSED_FLAG);
    }
    Ok(base58check_encode(params(network).secret_key, &payload))
}

/// A private key recovered from WIF text
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedWif {
    pub private_key: [u8; 32],
    pub compressed: bool,
    pub network: Network,
}

impl fmt::Debug for DecodedWif {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedWif")
            .field("compressed", &self.compressed)
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

/// Decode WIF text back into a private key
pub fn decode_wif(wif: &str) -> Result<DecodedWif> {
    let body = base58check_decode(wif.trim())?;

    let network = match body[0] {
        v if v == MAINNET.secret_key => Network::Bitcoin,
        v if v == TESTNET.secret_key => Network::Testnet,
        v => return Err(Error::InvalidWif(format!("unknown version byte {:#04x}", v))),
    };

    let compressed = match body.len() {
        33 => false,
        34 if body[33] == COMPRESSED_FLAG => true,
        34 => {
            return Err(Error::InvalidWif(format!(
                "unexpected compression flag {:#04x}",
                body[33]
            )))
        }
        n => return Err(Error::InvalidWif(format!("unexpected payload length {}", n - 1))),
    };

    let secret_key = secret_key_from_bytes(&body[1..33])?;
    Ok(DecodedWif {
        private_key: secret_key.secret_bytes(),
        compressed,
        network,
    })
}
