//! BIP-32 hierarchical key derivation
//!
//! Every node in the tree carries a private scalar, so non-hardened children
//! are always derived from the parent's private key (via its public key).
//! Which levels are hardened is decided entirely by the caller's path.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use secp256k1::{Scalar, SecretKey};
use sha2::Sha512;
use tracing::{debug, trace};

use crate::crypto::hash::hash160;
use crate::crypto::keys::curve::{public_key_of, COMPRESSED_PUBLIC_KEY_LEN};
use crate::error::{Error, Result};

/// Offset added to an index to mark it hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_KEY_SALT: &[u8] = b"Bitcoin seed";

type HmacSha512 = Hmac<Sha512>;

/// One segment of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildNumber {
    /// Derived from the parent public key
    Normal(u32),
    /// Derived from the parent private key
    Hardened(u32),
}

impl ChildNumber {
    pub fn normal(index: u32) -> Result<Self> {
        Self::check_index(index).map(Self::Normal)
    }

    pub fn hardened(index: u32) -> Result<Self> {
        Self::check_index(index).map(Self::Hardened)
    }

    fn check_index(index: u32) -> Result<u32> {
        if index >= HARDENED_OFFSET {
            return Err(Error::malformed_path(
                &index.to_string(),
                "index must be below 2^31",
            ));
        }
        Ok(index)
    }

    /// Build from a raw BIP-32 index (hardened when >= 2^31)
    pub fn from_raw(raw: u32) -> Self {
        if raw >= HARDENED_OFFSET {
            Self::Hardened(raw - HARDENED_OFFSET)
        } else {
            Self::Normal(raw)
        }
    }

    /// The index as serialized into the HMAC input
    pub fn raw(&self) -> u32 {
        match *self {
            Self::Normal(i) => i,
            Self::Hardened(i) => i | HARDENED_OFFSET,
        }
    }

    pub fn index(&self) -> u32 {
        match *self {
            Self::Normal(i) | Self::Hardened(i) => i,
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(i) => write!(f, "{}", i),
            Self::Hardened(i) => write!(f, "{}'", i),
        }
    }
}

/// A parsed derivation path rooted at the master node (`m`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The master node itself
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// A new path with one more segment
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut segments = self.0.clone();
        segments.push(child);
        Self(segments)
    }

    pub fn as_slice(&self) -> &[ChildNumber] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(segments: Vec<ChildNumber>) -> Self {
        Self(segments)
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = std::slice::Iter<'a, ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Parse `m`, or `m/` followed by `/`-separated indices with an optional
    /// `'`, `h` or `H` hardened marker.
    fn from_str(path: &str) -> Result<Self> {
        let trimmed = path.trim();
        let rest = match trimmed.strip_prefix('m') {
            Some("") => return Ok(Self::master()),
            Some(rest) => rest
                .strip_prefix('/')
                .ok_or_else(|| Error::malformed_path(path, "expected `/` after `m`"))?,
            None => return Err(Error::malformed_path(path, "path must start with `m`")),
        };

        let mut segments = Vec::new();
        for component in rest.split('/') {
            if component.is_empty() {
                return Err(Error::malformed_path(path, "empty path segment"));
            }

            let marker = |c: char| matches!(c, '\'' | 'h' | 'H');
            let (digits, hardened) = match component.strip_suffix(marker) {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::malformed_path(
                    path,
                    format!("invalid path segment `{}`", component),
                ));
            }
            let index = digits
                .parse::<u32>()
                .ok()
                .filter(|i| *i < HARDENED_OFFSET)
                .ok_or_else(|| {
                    Error::malformed_path(path, format!("index `{}` must be below 2^31", digits))
                })?;

            segments.push(if hardened {
                ChildNumber::Hardened(index)
            } else {
                ChildNumber::Normal(index)
            });
        }

        if segments.len() > u8::MAX as usize {
            return Err(Error::malformed_path(path, "more than 255 levels"));
        }

        Ok(Self(segments))
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

/// Key material at one node of the tree
#[derive(Clone, PartialEq, Eq)]
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key: [u8; COMPRESSED_PUBLIC_KEY_LEN],
    pub chain_code: [u8; 32],
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("public_key", &hex::encode(self.public_key))
            .field("chain_code", &hex::encode(self.chain_code))
            .finish_non_exhaustive()
    }
}

/// A private node in the key tree
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedPrivateKey {
    secret_key: SecretKey,
    chain_code: [u8; 32],
    depth: u8,
    child_number: Option<ChildNumber>,
    parent_fingerprint: [u8; 4],
}

impl ExtendedPrivateKey {
    /// Derive the master node from a seed
    pub fn master(seed: &[u8]) -> Result<Self> {
        let (il, chain_code) = hmac_sha512(MASTER_KEY_SALT, &[seed])?;

        let secret_key = master_secret(&il)?;

        Ok(Self {
            secret_key,
            chain_code,
            depth: 0,
            child_number: None,
            parent_fingerprint: [0u8; 4],
        })
    }

    /// Derive one child of this node
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self> {
        let depth = self.depth.checked_add(1).ok_or_else(|| Error::MalformedPath {
            path: child.to_string(),
            reason: "more than 255 levels".to_string(),
        })?;
        let index = child.raw();
        let parent_public_key = public_key_of(&self.secret_key);

        let (il, chain_code) = if child.is_hardened() {
            hmac_sha512(
                &self.chain_code,
                &[&[0u8], &self.secret_key.secret_bytes(), &index.to_be_bytes()],
            )?
        } else {
            hmac_sha512(&self.chain_code, &[&parent_public_key, &index.to_be_bytes()])?
        };

        let secret_key = tweak_child(&self.secret_key, il, depth, index)?;

        trace!(depth, index = child.index(), hardened = child.is_hardened(), "derived child key");

        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&hash160(&parent_public_key)[..4]);

        Ok(Self {
            secret_key,
            chain_code,
            depth,
            child_number: Some(child),
            parent_fingerprint,
        })
    }

    /// Walk every segment of `path` starting at this node
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.iter()
            .try_fold(self.clone(), |node, child| node.derive_child(*child))
    }

    pub fn private_key(&self) -> [u8; 32] {
        self.secret_key.secret_bytes()
    }

    pub fn public_key(&self) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
        public_key_of(&self.secret_key)
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// `None` for the master node
    pub fn child_number(&self) -> Option<ChildNumber> {
        self.child_number
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    /// First four bytes of hash160 of this node's public key
    pub fn fingerprint(&self) -> [u8; 4] {
        let mut fingerprint = [0u8; 4];
        fingerprint.copy_from_slice(&hash160(&self.public_key())[..4]);
        fingerprint
    }

    pub fn to_derived_key(&self) -> DerivedKey {
        DerivedKey {
            private_key: self.private_key(),
            public_key: self.public_key(),
            chain_code: self.chain_code,
        }
    }
}

impl fmt::Debug for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedPrivateKey")
            .field("depth", &self.depth)
            .field("child_number", &self.child_number)
            .field("fingerprint", &hex::encode(self.fingerprint()))
            .finish_non_exhaustive()
    }
}

/// Master scalar from IL; zero or >= n is rejected
fn master_secret(il: &[u8; 32]) -> Result<SecretKey> {
    SecretKey::from_slice(il).map_err(|_| Error::InvalidChildKey { depth: 0, index: 0 })
}

/// `(IL + parent) mod n`, rejecting IL >= n and a zero sum
fn tweak_child(parent: &SecretKey, il: [u8; 32], depth: u8, index: u32) -> Result<SecretKey> {
    let tweak = Scalar::from_be_bytes(il).map_err(|_| Error::InvalidChildKey { depth, index })?;
    parent
        .add_tweak(&tweak)
        .map_err(|_| Error::InvalidChildKey { depth, index })
}

/// HMAC-SHA512 split into (IL, IR)
fn hmac_sha512(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| Error::Encoding(format!("HMAC error: {}", e)))?;
    for part in parts {
        mac.update(part);
    }
    let result = mac.finalize().into_bytes();

    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&result[0..32]);
    right.copy_from_slice(&result[32..64]);

    Ok((left, right))
}

/// Derive the key at `path` from a seed
pub fn derive_path(seed: &[u8], path: &DerivationPath) -> Result<DerivedKey> {
    debug!(depth = path.len(), "deriving key from seed");
    let node = ExtendedPrivateKey::master(seed)?.derive_path(path)?;
    Ok(node.to_derived_key())
}

/// Parse `path` and derive the key there from a seed
pub fn derive(seed: &[u8], path: &str) -> Result<DerivedKey> {
    let path = path.parse::<DerivationPath>()?;
    derive_path(seed, &path)
}
