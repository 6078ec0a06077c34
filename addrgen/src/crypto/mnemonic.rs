//! Mnemonic phrase validation, seed expansion and generation

use std::fmt;

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

use crate::crypto::hash::sha256;
use crate::crypto::wordlist::Wordlist;
use crate::error::{Error, MnemonicError, Result};

/// Word counts allowed by BIP-39
pub const VALID_WORD_COUNTS: [usize; 5] = [12, 15, 18, 21, 24];

/// PBKDF2 rounds used for seed expansion
pub const SEED_ITERATIONS: u32 = 2048;

/// Length of an expanded seed in bytes
pub const SEED_LEN: usize = 64;

/// Supported mnemonic strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnemonicStrength {
    /// 12 words (128 bits)
    Words12,
    /// 15 words (160 bits)
    Words15,
    /// 18 words (192 bits)
    Words18,
    /// 21 words (224 bits)
    Words21,
    /// 24 words (256 bits)
    Words24,
}

impl MnemonicStrength {
    /// Get entropy length in bytes
    pub fn entropy_bytes(&self) -> usize {
        match self {
            Self::Words12 => 16,
            Self::Words15 => 20,
            Self::Words18 => 24,
            Self::Words21 => 28,
            Self::Words24 => 32,
        }
    }

    pub fn word_count(&self) -> usize {
        self.entropy_bytes() * 3 / 4
    }
}

/// A 64-byte BIP-39 seed
#[derive(Clone, PartialEq, Eq)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

/// Mnemonic operations bound to one wordlist
#[derive(Debug, Clone, Copy)]
pub struct MnemonicCodec<'a> {
    wordlist: &'a Wordlist,
}

impl Default for MnemonicCodec<'static> {
    fn default() -> Self {
        Self::new(Wordlist::english())
    }
}

impl<'a> MnemonicCodec<'a> {
    pub fn new(wordlist: &'a Wordlist) -> Self {
        Self { wordlist }
    }

    pub fn wordlist(&self) -> &'a Wordlist {
        self.wordlist
    }

    /// Check a phrase against the wordlist and its checksum
    pub fn validate(&self, phrase: &str) -> bool {
        self.check(phrase).is_ok()
    }

    /// Like [`validate`](Self::validate) but reports why a phrase was rejected
    pub fn check(&self, phrase: &str) -> std::result::Result<(), MnemonicError> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if !VALID_WORD_COUNTS.contains(&words.len()) {
            return Err(MnemonicError::BadWordCount(words.len()));
        }

        let indices = words
            .iter()
            .map(|w| {
                self.wordlist
                    .index_of(w)
                    .ok_or_else(|| MnemonicError::UnknownWord(w.to_string()))
            })
            .collect::<std::result::Result<Vec<u16>, _>>()?;

        let bits = pack_indices(&indices);
        let checksum_bits = indices.len() / 3;
        let entropy_len = checksum_bits * 4;

        let entropy = &bits[..entropy_len];
        let checksum = bits[entropy_len] >> (8 - checksum_bits);
        let expected = sha256(entropy)[0] >> (8 - checksum_bits);

        if checksum != expected {
            return Err(MnemonicError::ChecksumMismatch);
        }
        Ok(())
    }

    /// Encode raw entropy as a mnemonic phrase
    pub fn from_entropy(&self, entropy: &[u8]) -> Result<String> {
        if !matches!(entropy.len(), 16 | 20 | 24 | 28 | 32) {
            return Err(Error::InvalidInputLength {
                what: "entropy (16, 20, 24, 28 or 32 bytes)",
                expected: nearest_entropy_len(entropy.len()),
                got: entropy.len(),
            });
        }

        let checksum_bits = entropy.len() / 4;
        let mut data = entropy.to_vec();
        data.push(sha256(entropy)[0]);

        let word_count = (entropy.len() * 8 + checksum_bits) / 11;
        let mut words = Vec::with_capacity(word_count);
        for i in 0..word_count {
            let mut index = 0u16;
            for b in 0..11 {
                let pos = i * 11 + b;
                let bit = (data[pos / 8] >> (7 - pos % 8)) & 1;
                index = (index << 1) | bit as u16;
            }
            let word = self
                .wordlist
                .word(index)
                .ok_or_else(|| Error::InvalidWordlist(format!("no word at index {}", index)))?;
            words.push(word);
        }

        Ok(words.join(" "))
    }

    /// Generate a new random mnemonic phrase with the specified strength
    pub fn generate(&self, strength: MnemonicStrength) -> Result<String> {
        let mut entropy = vec![0u8; strength.entropy_bytes()];
        OsRng.fill_bytes(&mut entropy);
        self.from_entropy(&entropy)
    }
}

/// Closest supported entropy length, rounding up within range
fn nearest_entropy_len(len: usize) -> usize {
    ((len + 3) / 4 * 4).clamp(16, 32)
}

/// Concatenate 11-bit word indices into a big-endian bit string
fn pack_indices(indices: &[u16]) -> Vec<u8> {
    let mut bits = vec![0u8; (indices.len() * 11 + 7) / 8];
    for (i, &index) in indices.iter().enumerate() {
        for b in 0..11 {
            if index & (1 << (10 - b)) != 0 {
                let pos = i * 11 + b;
                bits[pos / 8] |= 1 << (7 - pos % 8);
            }
        }
    }
    bits
}

/// Expand a phrase and passphrase into a seed.
///
/// The phrase is not validated here; its bytes are used exactly as given.
pub fn to_seed(phrase: &str, passphrase: &str) -> Seed {
    let salt = format!("mnemonic{}", passphrase);
    let mut seed = [0u8; SEED_LEN];
    pbkdf2_hmac::<Sha512>(phrase.as_bytes(), salt.as_bytes(), SEED_ITERATIONS, &mut seed);
    Seed(seed)
}

/// Validate a phrase against the English wordlist
pub fn validate_mnemonic(phrase: &str) -> bool {
    MnemonicCodec::default().validate(phrase)
}

/// Generate a seed from a mnemonic phrase and passphrase
pub fn mnemonic_to_seed(phrase: &str, passphrase: &str) -> Seed {
    to_seed(phrase, passphrase)
}

/// Encode entropy as an English mnemonic phrase
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String> {
    MnemonicCodec::default().from_entropy(entropy)
}

/// Generate a new random English mnemonic phrase with the specified strength
pub fn generate_mnemonic(strength: MnemonicStrength) -> Result<String> {
    MnemonicCodec::default().generate(strength)
}
