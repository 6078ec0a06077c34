//! Cryptographic primitives and operations
//!
//! This module provides mnemonic handling, hashing, key derivation and
//! the address encodings built on top of them.

pub mod hash;
pub mod keys;
pub mod mnemonic;
pub mod wordlist;

pub use keys::*;
pub use mnemonic::*;
pub use wordlist::Wordlist;
