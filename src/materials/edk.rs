use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::slice;

/// One wrapped copy of a data key plus the metadata its provider needs to unwrap it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedDataKey {
    #[serde(rename = "ProviderId")]
    pub provider_id: String,
    #[serde(rename = "ProviderInfo")]
    pub provider_info: Vec<u8>,
    #[serde(rename = "Ciphertext")]
    pub ciphertext: Vec<u8>,
}

impl EncryptedDataKey {
    /// Creates a new EncryptedDataKey
    pub fn new(
        provider_id: impl Into<String>,
        provider_info: impl Into<Vec<u8>>,
        ciphertext: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            provider_info: provider_info.into(),
            ciphertext: ciphertext.into(),
        }
    }
}

/// Ordered list of encrypted data keys
///
/// Growth is fallible: every operation that may allocate reserves first and
/// reports `Error::OutOfMemory` instead of aborting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdkList {
    edks: Vec<EncryptedDataKey>,
}

impl EdkList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` entries
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut edks = Vec::new();
        edks.try_reserve(capacity)?;
        Ok(Self { edks })
    }

    /// Reserves room for `additional` more entries
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.edks.try_reserve(additional)?;
        Ok(())
    }

    /// Appends an entry
    pub fn push(&mut self, edk: EncryptedDataKey) -> Result<()> {
        self.edks.try_reserve(1)?;
        self.edks.push(edk);
        Ok(())
    }

    /// Moves every entry of `other` to the end of this list, preserving order
    ///
    /// On failure neither list is modified.
    pub fn transfer_from(&mut self, other: &mut EdkList) -> Result<()> {
        self.edks.try_reserve(other.edks.len())?;
        self.edks.append(&mut other.edks);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.edks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&EncryptedDataKey> {
        self.edks.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, EncryptedDataKey> {
        self.edks.iter()
    }

    pub fn as_slice(&self) -> &[EncryptedDataKey] {
        &self.edks
    }

    /// Removes every entry
    pub fn clear(&mut self) {
        self.edks.clear();
    }
}

impl From<Vec<EncryptedDataKey>> for EdkList {
    fn from(edks: Vec<EncryptedDataKey>) -> Self {
        Self { edks }
    }
}

impl FromIterator<EncryptedDataKey> for EdkList {
    fn from_iter<I: IntoIterator<Item = EncryptedDataKey>>(iter: I) -> Self {
        Self {
            edks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a EdkList {
    type Item = &'a EncryptedDataKey;
    type IntoIter = slice::Iter<'a, EncryptedDataKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.edks.iter()
    }
}
