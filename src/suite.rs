//! Algorithm suites a data key can be produced for
//!
//! The keyring layer only cares about the data key length a suite requires;
//! the ids match the suite identifiers carried in message headers.

use crate::error::{Error, Result};
use std::fmt;

/// Algorithm suite used to encrypt a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum AlgorithmSuite {
    /// AES-128-GCM, no key derivation
    Aes128GcmIv12Tag16NoKdf = 0x0014,
    /// AES-192-GCM, no key derivation
    Aes192GcmIv12Tag16NoKdf = 0x0046,
    /// AES-256-GCM, no key derivation
    Aes256GcmIv12Tag16NoKdf = 0x0078,
    /// AES-128-GCM with HKDF-SHA256
    Aes128GcmIv12Tag16HkdfSha256 = 0x0114,
    /// AES-192-GCM with HKDF-SHA256
    Aes192GcmIv12Tag16HkdfSha256 = 0x0146,
    /// AES-256-GCM with HKDF-SHA256
    Aes256GcmIv12Tag16HkdfSha256 = 0x0178,
    /// AES-128-GCM with HKDF-SHA256 and ECDSA P-256 signatures
    Aes128GcmIv12Tag16HkdfSha256EcdsaP256 = 0x0214,
    /// AES-192-GCM with HKDF-SHA384 and ECDSA P-384 signatures
    Aes192GcmIv12Tag16HkdfSha384EcdsaP384 = 0x0346,
    /// AES-256-GCM with HKDF-SHA384 and ECDSA P-384 signatures
    Aes256GcmIv12Tag16HkdfSha384EcdsaP384 = 0x0378,
}

impl AlgorithmSuite {
    /// Every supported suite, ordered by id
    pub const ALL: [AlgorithmSuite; 9] = [
        AlgorithmSuite::Aes128GcmIv12Tag16NoKdf,
        AlgorithmSuite::Aes192GcmIv12Tag16NoKdf,
        AlgorithmSuite::Aes256GcmIv12Tag16NoKdf,
        AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256,
        AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha256,
        AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha256,
        AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256EcdsaP256,
        AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha384EcdsaP384,
        AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384,
    ];

    /// Returns the wire identifier of the suite
    pub fn id(self) -> u16 {
        self as u16
    }

    /// Looks up a suite by its wire identifier
    pub fn from_id(id: u16) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|suite| suite.id() == id)
            .ok_or(Error::UnsupportedAlgorithm(id))
    }

    /// Length in bytes of the data key this suite consumes
    pub fn data_key_len(self) -> usize {
        match self {
            AlgorithmSuite::Aes128GcmIv12Tag16NoKdf
            | AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256
            | AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256EcdsaP256 => 16,
            AlgorithmSuite::Aes192GcmIv12Tag16NoKdf
            | AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha256
            | AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha384EcdsaP384 => 24,
            AlgorithmSuite::Aes256GcmIv12Tag16NoKdf
            | AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha256
            | AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384 => 32,
        }
    }

    /// Whether messages under this suite carry a signature
    pub fn is_signing(self) -> bool {
        matches!(
            self,
            AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256EcdsaP256
                | AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha384EcdsaP384
                | AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384
        )
    }

    /// Human readable suite name
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmSuite::Aes128GcmIv12Tag16NoKdf => "AES_128_GCM_IV12_TAG16_NO_KDF",
            AlgorithmSuite::Aes192GcmIv12Tag16NoKdf => "AES_192_GCM_IV12_TAG16_NO_KDF",
            AlgorithmSuite::Aes256GcmIv12Tag16NoKdf => "AES_256_GCM_IV12_TAG16_NO_KDF",
            AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256 => "AES_128_GCM_IV12_TAG16_HKDF_SHA256",
            AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha256 => "AES_192_GCM_IV12_TAG16_HKDF_SHA256",
            AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha256 => "AES_256_GCM_IV12_TAG16_HKDF_SHA256",
            AlgorithmSuite::Aes128GcmIv12Tag16HkdfSha256EcdsaP256 => {
                "AES_128_GCM_IV12_TAG16_HKDF_SHA256_ECDSA_P256"
            }
            AlgorithmSuite::Aes192GcmIv12Tag16HkdfSha384EcdsaP384 => {
                "AES_192_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384"
            }
            AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384 => {
                "AES_256_GCM_IV12_TAG16_HKDF_SHA384_ECDSA_P384"
            }
        }
    }
}

impl TryFrom<u16> for AlgorithmSuite {
    type Error = Error;

    fn try_from(id: u16) -> Result<Self> {
        Self::from_id(id)
    }
}

impl fmt::Display for AlgorithmSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
