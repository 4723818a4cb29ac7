//! Keyring trace: the audit log of what each keyring did during one request

use crate::error::Result;
use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::slice;

bitflags! {
    /// Actions a keyring performed with a wrapping key.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TraceFlags: u32 {
        const GENERATED_DATA_KEY = 1 << 0;
        const ENCRYPTED_DATA_KEY = 1 << 1;
        const DECRYPTED_DATA_KEY = 1 << 2;
        const SIGNED_ENC_CTX = 1 << 3;
        const VERIFIED_ENC_CTX = 1 << 4;
    }
}

impl Serialize for TraceFlags {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for TraceFlags {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = u32::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// A single trace entry, identifying the wrapping key and what was done with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyringTraceRecord {
    #[serde(rename = "Namespace")]
    pub wrapping_key_namespace: String,
    #[serde(rename = "Name")]
    pub wrapping_key_name: String,
    #[serde(rename = "Flags")]
    pub flags: TraceFlags,
}

impl KeyringTraceRecord {
    /// Creates a new trace record
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        flags: TraceFlags,
    ) -> Self {
        Self {
            wrapping_key_namespace: namespace.into(),
            wrapping_key_name: name.into(),
            flags,
        }
    }
}

/// Ordered keyring trace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct KeyringTrace {
    records: Vec<KeyringTraceRecord>,
}

impl KeyringTrace {
    /// Creates an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trace with room for `capacity` records
    pub fn try_with_capacity(capacity: usize) -> Result<Self> {
        let mut records = Vec::new();
        records.try_reserve(capacity)?;
        Ok(Self { records })
    }

    /// Reserves room for `additional` more records
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        self.records.try_reserve(additional)?;
        Ok(())
    }

    /// Appends a record built from its parts
    pub fn add_record(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        flags: TraceFlags,
    ) -> Result<()> {
        self.push(KeyringTraceRecord::new(namespace, name, flags))
    }

    /// Appends a record
    pub fn push(&mut self, record: KeyringTraceRecord) -> Result<()> {
        self.records.try_reserve(1)?;
        self.records.push(record);
        Ok(())
    }

    /// Moves every record of `other` to the end of this trace, preserving order
    ///
    /// On failure neither trace is modified.
    pub fn transfer_from(&mut self, other: &mut KeyringTrace) -> Result<()> {
        self.records.try_reserve(other.records.len())?;
        self.records.append(&mut other.records);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&KeyringTraceRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, KeyringTraceRecord> {
        self.records.iter()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Serializes the trace as a JSON array, for audit logs
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'a> IntoIterator for &'a KeyringTrace {
    type Item = &'a KeyringTraceRecord;
    type IntoIter = slice::Iter<'a, KeyringTraceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
