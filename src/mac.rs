//! Secret-prefix MAC: `MIC = H(key ++ message)`.

use rand::RngCore;

use crate::engine::Hasher;
use crate::{Error, Mic, Result, Word, KEY_LEN};

/// 16 bytes of key material.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Key([u8; KEY_LEN]);

impl Key {
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Fresh key from the thread-local RNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim_start_matches("0x"))?;
        Self::try_from(bytes.as_slice())
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Key {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { got: bytes.len() })?;
        Ok(Self(bytes))
    }
}

// Keys never show up in logs.
impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(..)")
    }
}

fn keyed(message: &[u8], key: &[u8]) -> Result<Hasher> {
    let key = Key::try_from(key)?;
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes()).update(message);
    Ok(hasher)
}

/// Message integrity code of `message` under a 16-byte `key`.
///
/// Fails with [`Error::InvalidKeyLength`] before hashing anything if the key
/// has the wrong size.
pub fn mac(message: &[u8], key: &[u8]) -> Result<Mic> {
    Ok(keyed(message, key)?.finalize())
}

/// Accumulator of `key ++ message` before the finalization round.
pub fn mac_prefinal(message: &[u8], key: &[u8]) -> Result<Word> {
    Ok(keyed(message, key)?.finalize_raw())
}

/// Check `mic` against the keyed hash of `message`.
pub fn verify(message: &[u8], key: &[u8], mic: &Mic) -> Result<bool> {
    Ok(&mac(message, key)? == mic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hash;

    const KEY: [u8; KEY_LEN] = [
        0x28, 0x94, 0x88, 0xae, 0x6d, 0x71, 0xc8, 0x2d, 0xa1, 0x50, 0x2c, 0x01, 0x30, 0xec, 0x04,
        0xe0,
    ];

    #[test]
    fn mac_is_hash_of_prefixed_message() {
        let mut joined = KEY.to_vec();
        joined.extend_from_slice(b"AAAAaa");
        assert_eq!(mac(b"AAAAaa", &KEY).unwrap(), hash(&joined));
        assert_eq!(mac(b"AAAAaa", &KEY).unwrap(), [0xe4, 0xe5, 0xd5, 0xa3]);
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        for len in [0usize, 15, 17, 32] {
            let key = vec![0u8; len];
            match mac(b"msg", &key) {
                Err(Error::InvalidKeyLength { got }) => assert_eq!(got, len),
                other => panic!("expected InvalidKeyLength, got {other:?}"),
            }
        }
    }

    #[test]
    fn verify_accepts_only_the_right_mic() {
        let mic = mac(b"hello", &KEY).unwrap();
        assert!(verify(b"hello", &KEY, &mic).unwrap());
        assert!(!verify(b"hellO", &KEY, &mic).unwrap());
    }

    #[test]
    fn key_parsing() {
        let key = Key::from_hex("289488ae6d71c82da1502c0130ec04e0").unwrap();
        assert_eq!(key.as_bytes(), &KEY);
        assert!(Key::from_hex("0x289488ae6d71c82da1502c0130ec04e0").is_ok());
        assert!(matches!(
            Key::from_hex("2894"),
            Err(Error::InvalidKeyLength { got: 2 })
        ));
        assert_eq!(format!("{:?}", Key::random()), "Key(..)");
    }

    #[test]
    fn non_hex_key_is_not_a_length_error() {
        let err = Key::from_hex(&"z".repeat(32)).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyHex(_)), "got {err:?}");
        assert!(err.to_string().starts_with("key is not valid hex"));
        assert!(matches!(
            Key::from_hex("289"),
            Err(Error::InvalidKeyHex(hex::FromHexError::OddLength))
        ));
    }
}
