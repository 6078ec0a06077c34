//! Error types for the addrgen library

use thiserror::Error;

/// Why a mnemonic phrase was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    /// Word count is not 12, 15, 18, 21 or 24
    #[error("unsupported word count {0} (expected 12, 15, 18, 21 or 24)")]
    BadWordCount(usize),

    /// Word missing from the wordlist
    #[error("word `{0}` is not in the wordlist")]
    UnknownWord(String),

    /// Checksum bits do not match the entropy
    #[error("checksum mismatch")]
    ChecksumMismatch,
}

/// Custom error type for addrgen operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Mnemonic rejected
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(#[from] MnemonicError),

    /// Derivation path could not be parsed
    #[error("Malformed derivation path `{path}`: {reason}")]
    MalformedPath { path: String, reason: String },

    /// The derived scalar fell outside `[1, n)`; BIP-32 says skip the index,
    /// we surface it instead.
    #[error("Invalid child key at depth {depth}, index {index:#010x}")]
    InvalidChildKey { depth: u8, index: u32 },

    /// Unknown script type tag
    #[error("Unsupported script type: {0}")]
    UnsupportedScriptType(String),

    /// Input has the wrong number of bytes
    #[error("Invalid {what} length: expected {expected}, got {got}")]
    InvalidInputLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    /// Private key scalar is zero or not below the curve order
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Bytes are not a compressed curve point
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// WIF text has an unknown version or layout
    #[error("Invalid WIF: {0}")]
    InvalidWif(String),

    /// Base58Check checksum mismatch
    #[error("Base58Check checksum mismatch")]
    ChecksumMismatch,

    /// Wordlist error
    #[error("Invalid wordlist: {0}")]
    InvalidWordlist(String),

    /// Generator configuration error
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Encoding error
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl Error {
    pub(crate) fn malformed_path(path: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for addrgen operations
pub type Result<T> = std::result::Result<T, Error>;
