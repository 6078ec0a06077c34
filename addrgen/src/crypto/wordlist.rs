//! BIP-39 wordlist table

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{Error, Result};

/// Number of words in a BIP-39 wordlist (one per 11-bit value)
pub const WORDLIST_LEN: usize = 2048;

static ENGLISH: Lazy<Wordlist> = Lazy::new(|| {
    let words = bip39::Language::English.word_list();
    Wordlist {
        index: words
            .iter()
            .enumerate()
            .map(|(i, w)| (w.to_string(), i as u16))
            .collect(),
        words: words.iter().map(|w| w.to_string()).collect(),
    }
});

/// An ordered, immutable list of 2048 unique words.
///
/// Built once and shared by reference; lookups in both directions are O(1).
#[derive(Clone)]
pub struct Wordlist {
    words: Vec<String>,
    index: HashMap<String, u16>,
}

impl fmt::Debug for Wordlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wordlist")
            .field("first", &self.words.first())
            .field("len", &self.words.len())
            .finish()
    }
}

impl Wordlist {
    /// The standard English list, initialised on first use
    pub fn english() -> &'static Wordlist {
        &ENGLISH
    }

    /// Build a wordlist from any ordered word source
    pub fn from_words<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .collect();

        if words.len() != WORDLIST_LEN {
            return Err(Error::InvalidWordlist(format!(
                "expected {} words, got {}",
                WORDLIST_LEN,
                words.len()
            )));
        }

        let mut index = HashMap::with_capacity(WORDLIST_LEN);
        for (i, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(Error::InvalidWordlist(format!("empty word at position {}", i)));
            }
            if index.insert(word.clone(), i as u16).is_some() {
                return Err(Error::InvalidWordlist(format!("duplicate word `{}`", word)));
            }
        }

        Ok(Self { words, index })
    }

    /// Get the 11-bit index of a word
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    /// Get the word at an index
    pub fn word(&self, index: u16) -> Option<&str> {
        self.words.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
