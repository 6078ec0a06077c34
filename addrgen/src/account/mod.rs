//! Address generation for mnemonic phrases
//!
//! This module turns validated mnemonics into [`AddressRecord`]s across a
//! configurable table of derivation paths and script types.

mod address;
mod generator;

pub use address::*;
pub use generator::*;
