//! Address generation over a table of path templates
//!
//! A generator validates each mnemonic, expands it into a seed once and
//! derives every configured path from that seed, emitting one
//! [`AddressRecord`] per (path, index, script type).

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::account::AddressRecord;
use crate::crypto::keys::{ChildNumber, DerivationPath, ExtendedPrivateKey, Network, ScriptType};
use crate::crypto::mnemonic::{to_seed, MnemonicCodec};
use crate::crypto::wordlist::Wordlist;
use crate::error::{Error, MnemonicError, Result};

/// Addresses derived per template unless configured otherwise
pub const DEFAULT_ADDRESSES_PER_PATH: u32 = 10;

/// A family of addresses at `base/i` (or `base/i'`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathTemplate {
    /// Account path the address index is appended to, e.g. `m/84'/0'/0'/0`
    pub base: String,
    /// Encodings emitted for every derived key
    pub script_types: Vec<ScriptType>,
    /// Whether the appended address index is hardened
    #[serde(default)]
    pub hardened_index: bool,
}

impl PathTemplate {
    pub fn new(base: impl Into<String>, script_types: Vec<ScriptType>, hardened_index: bool) -> Self {
        Self {
            base: base.into(),
            script_types,
            hardened_index,
        }
    }

    /// Parse the base path
    pub fn base_path(&self) -> Result<DerivationPath> {
        self.base.parse()
    }

    /// Child number for address index `index`
    pub fn index_child(&self, index: u32) -> Result<ChildNumber> {
        if self.hardened_index {
            ChildNumber::hardened(index)
        } else {
            ChildNumber::normal(index)
        }
    }

    fn default_table() -> Vec<Self> {
        vec![
            Self::new("m/0'/0'", vec![ScriptType::P2pkh], true),
            Self::new("m/44'/0'/0'/0", vec![ScriptType::P2pkh], true),
            Self::new("m/49'/0'/0'/0", vec![ScriptType::P2wpkhInP2sh], true),
            Self::new("m/84'/0'/0'/0", vec![ScriptType::P2wpkh], true),
            Self::new("m/0", vec![ScriptType::P2wpkhInP2sh], true),
            Self::new("m/0", vec![ScriptType::P2wpkh], true),
        ]
    }
}

/// Generator configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// BIP-39 passphrase mixed into every seed
    pub passphrase: String,
    /// First address index of every template
    pub start_index: u32,
    /// Number of consecutive indices derived per template
    pub addresses_per_path: u32,
    pub network: Network,
    pub paths: Vec<PathTemplate>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            passphrase: String::new(),
            start_index: 0,
            addresses_per_path: DEFAULT_ADDRESSES_PER_PATH,
            network: Network::Bitcoin,
            paths: PathTemplate::default_table(),
        }
    }
}

impl fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("passphrase", &if self.passphrase.is_empty() { "" } else { "<redacted>" })
            .field("start_index", &self.start_index)
            .field("addresses_per_path", &self.addresses_per_path)
            .field("network", &self.network)
            .field("paths", &self.paths)
            .finish()
    }
}

impl GeneratorConfig {
    /// Check the whole configuration before any derivation starts
    pub fn validate(&self) -> Result<()> {
        if self.addresses_per_path == 0 {
            return Err(Error::InvalidConfig(
                "addresses_per_path must be at least 1".to_string(),
            ));
        }
        if self.paths.is_empty() {
            return Err(Error::InvalidConfig("no path templates configured".to_string()));
        }

        let last_index = self
            .start_index
            .checked_add(self.addresses_per_path - 1)
            .ok_or_else(|| Error::InvalidConfig("address index range overflows".to_string()))?;

        for template in &self.paths {
            template.base_path()?;
            template.index_child(last_index)?;
            if template.script_types.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "template `{}` has no script types",
                    template.base
                )));
            }
        }
        Ok(())
    }

    /// Total records produced for one valid mnemonic
    pub fn records_per_mnemonic(&self) -> usize {
        self.paths
            .iter()
            .map(|t| t.script_types.len() * self.addresses_per_path as usize)
            .sum()
    }
}

/// Result of processing one mnemonic of a batch
#[derive(Debug, Clone)]
pub struct MnemonicOutcome {
    /// 1-based position of the mnemonic in its batch
    pub seed_index: usize,
    pub result: Result<Vec<AddressRecord>>,
}

impl MnemonicOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Derives address records from mnemonics according to a [`GeneratorConfig`]
#[derive(Debug, Clone)]
pub struct AddressGenerator<'a> {
    config: GeneratorConfig,
    templates: Vec<(DerivationPath, PathTemplate)>,
    codec: MnemonicCodec<'a>,
}

impl AddressGenerator<'static> {
    /// Create a generator using the English wordlist
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        Self::with_wordlist(config, Wordlist::english())
    }
}

impl<'a> AddressGenerator<'a> {
    /// Create a generator validating phrases against `wordlist`
    pub fn with_wordlist(config: GeneratorConfig, wordlist: &'a Wordlist) -> Result<Self> {
        config.validate()?;

        let templates = config
            .paths
            .iter()
            .map(|t| Ok((t.base_path()?, t.clone())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config,
            templates,
            codec: MnemonicCodec::new(wordlist),
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Derive every configured address for one mnemonic
    #[instrument(skip_all, fields(seed_index = seed_index))]
    pub fn generate(&self, seed_index: usize, phrase: &str) -> Result<Vec<AddressRecord>> {
        self.codec.check(phrase)?;

        let normalized = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        let seed = to_seed(&normalized, &self.config.passphrase);
        let master = ExtendedPrivateKey::master(seed.as_bytes())?;

        let mut records = Vec::with_capacity(self.config.records_per_mnemonic());
        for (base, template) in &self.templates {
            let account = master.derive_path(base)?;

            for offset in 0..self.config.addresses_per_path {
                let address_index = self.config.start_index + offset;
                let child = template.index_child(address_index)?;
                let key = account.derive_child(child)?.to_derived_key();
                let path = base.child(child).to_string();

                for &script_type in &template.script_types {
                    records.push(AddressRecord::from_key(
                        seed_index,
                        path.clone(),
                        address_index,
                        &key,
                        script_type,
                        self.config.network,
                    )?);
                }
            }
        }

        debug!(records = records.len(), "generated addresses");
        Ok(records)
    }

    /// Process mnemonics in order, continuing past rejected ones
    #[instrument(skip_all)]
    pub fn generate_batch<I, S>(&self, phrases: I) -> Vec<MnemonicOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let outcomes: Vec<MnemonicOutcome> = phrases
            .into_iter()
            .enumerate()
            .map(|(i, phrase)| {
                let seed_index = i + 1;
                let result = self.generate(seed_index, phrase.as_ref());
                if let Err(e) = &result {
                    warn!(seed_index, reason = %redacted_reason(e), "mnemonic rejected");
                }
                MnemonicOutcome { seed_index, result }
            })
            .collect();

        let accepted = outcomes.iter().filter(|o| o.is_ok()).count();
        let records: usize = outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .map(Vec::len)
            .sum();
        info!(
            total = outcomes.len(),
            accepted,
            rejected = outcomes.len() - accepted,
            records,
            "batch complete"
        );

        outcomes
    }
}

/// Error text safe to log; unknown words are part of the phrase
fn redacted_reason(error: &Error) -> String {
    match error {
        Error::InvalidMnemonic(MnemonicError::UnknownWord(_)) => "unknown word".to_string(),
        other => other.to_string(),
    }
}
