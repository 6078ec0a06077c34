//! secp256k1 point operations

use once_cell::sync::Lazy;
use secp256k1::{PublicKey, Secp256k1, SecretKey, SignOnly};

use crate::error::{Error, Result};

/// Length of a compressed SEC1 public key
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

static SECP: Lazy<Secp256k1<SignOnly>> = Lazy::new(Secp256k1::signing_only);

/// Shared signing context; building one per call is expensive.
pub(crate) fn context() -> &'static Secp256k1<SignOnly> {
    &SECP
}

/// Parse a 32-byte big-endian scalar, rejecting 0 and values >= n
pub fn secret_key_from_bytes(private_key: &[u8]) -> Result<SecretKey> {
    if private_key.len() != 32 {
        return Err(Error::InvalidInputLength {
            what: "private key",
            expected: 32,
            got: private_key.len(),
        });
    }
    SecretKey::from_slice(private_key).map_err(|e| Error::InvalidPrivateKey(e.to_string()))
}

/// Compute `scalar * G` and return it in compressed form (0x02/0x03 || x)
pub fn derive_public_key(private_key: &[u8; 32]) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN]> {
    let secret_key = secret_key_from_bytes(private_key)?;
    Ok(public_key_of(&secret_key))
}

pub(crate) fn public_key_of(secret_key: &SecretKey) -> [u8; COMPRESSED_PUBLIC_KEY_LEN] {
    PublicKey::from_secret_key(context(), secret_key).serialize()
}

/// Check that bytes are a compressed point on the curve
pub fn parse_compressed_public_key(public_key: &[u8]) -> Result<PublicKey> {
    if public_key.len() != COMPRESSED_PUBLIC_KEY_LEN {
        return Err(Error::InvalidInputLength {
            what: "public key",
            expected: COMPRESSED_PUBLIC_KEY_LEN,
            got: public_key.len(),
        });
    }
    if !matches!(public_key[0], 0x02 | 0x03) {
        return Err(Error::InvalidPublicKey(format!(
            "unexpected prefix {:#04x}",
            public_key[0]
        )));
    }
    PublicKey::from_slice(public_key).map_err(|e| Error::InvalidPublicKey(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_point() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert_eq!(
            hex::encode(derive_public_key(&one).unwrap()),
            "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798"
        );
    }

    #[test]
    fn test_y_parity_prefix() {
        // 6G has an odd y coordinate
        let mut six = [0u8; 32];
        six[31] = 6;
        assert_eq!(
            hex::encode(derive_public_key(&six).unwrap()),
            "03fff97bd5755eeea420453a14355235d382f6472f8568a18b2f057a1460297556"
        );
        let mut two = [0u8; 32];
        two[31] = 2;
        assert_eq!(
            hex::encode(derive_public_key(&two).unwrap()),
            "02c6047f9441ed7d6d3045406e95c07cd85c778e4b8cef3ca7abac09b95c709ee5"
        );
    }

    #[test]
    fn test_out_of_range_scalars() {
        assert!(matches!(derive_public_key(&[0u8; 32]), Err(Error::InvalidPrivateKey(_))));

        let order = hex::decode("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141").unwrap();
        let mut n = [0u8; 32];
        n.copy_from_slice(&order);
        assert!(matches!(derive_public_key(&n), Err(Error::InvalidPrivateKey(_))));
        assert!(matches!(derive_public_key(&[0xff; 32]), Err(Error::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_parse_compressed_public_key() {
        let g = hex::decode("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798").unwrap();
        assert!(parse_compressed_public_key(&g).is_ok());
        assert!(matches!(
            parse_compressed_public_key(&g[..32]),
            Err(Error::InvalidInputLength { got: 32, .. })
        ));
        let mut bad = g.clone();
        bad[0] = 0x04;
        assert!(matches!(parse_compressed_public_key(&bad), Err(Error::InvalidPublicKey(_))));
    }
}
