//! Materials exchanged between a caller and its keyrings
//!
//! A keyring call reads and writes three things: the unencrypted data key slot,
//! the list of encrypted data keys and the keyring trace. Everything here is
//! call scoped; none of it is shared between concurrent requests.

pub mod edk;
pub mod trace;

pub use edk::{EdkList, EncryptedDataKey};
pub use trace::{KeyringTrace, KeyringTraceRecord, TraceFlags};

use rand::{rngs::OsRng, RngCore};
use std::collections::BTreeMap;
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// Caller supplied authenticated metadata, passed unchanged to every keyring
pub type EncryptionContext = BTreeMap<String, String>;

/// An unencrypted data key
///
/// The bytes are wiped when the key is dropped. Keyrings hand data keys around
/// through an `Option<DataKey>` slot: `None` means no keyring has produced or
/// recovered the key yet.
#[derive(Clone)]
pub struct DataKey {
    bytes: Vec<u8>,
}

impl DataKey {
    /// Wraps existing key bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Generates a random key of the given length from the OS RNG
    pub fn generate(len: usize) -> Self {
        let mut bytes = vec![0_u8; len];
        OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Returns the raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the key length in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the key holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Compares two keys in constant time
    pub fn ct_eq(&self, other: &DataKey) -> bool {
        self.bytes.len() == other.bytes.len() && bool::from(self.bytes.ct_eq(&other.bytes))
    }
}

impl From<Vec<u8>> for DataKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"<hidden>")
            .finish()
    }
}

impl Drop for DataKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}
