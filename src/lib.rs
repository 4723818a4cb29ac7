//! # Envelope Keyring
//!
//! Keyrings resolve the data key used to encrypt a single message.
//!
//! On encryption a keyring produces (or receives) the unencrypted data key and
//! appends one or more encrypted data keys (EDKs) that can later be unwrapped to
//! recover it. On decryption a keyring looks through the EDKs stored with a
//! message and, if it holds a matching wrapping key, fills in the unencrypted
//! data key. Every action is recorded in a keyring trace.
//!
//! Concrete providers (KMS, raw wrapping keys) implement [`Keyring`] and are
//! shared through a reference counted [`KeyringHandle`]. The [`MultiKeyring`]
//! composes a generator plus any number of children into one keyring: every
//! child wraps the generated key on encryption, and the first keyring able to
//! unwrap an EDK wins on decryption.
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use envelope_keyring::{
//!     AlgorithmSuite, EdkList, EncryptionContext, KeyringHandle, KeyringTrace, MultiKeyring,
//! };
//!
//! # fn example(kms: KeyringHandle, backup: KeyringHandle) -> envelope_keyring::Result<()> {
//! // Configure the composite, then freeze it into a shareable handle
//! let multi = MultiKeyring::builder()
//!     .with_generator(&kms)
//!     .with_child(&backup)
//!     .build()?
//!     .into_handle();
//!
//! let suite = AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384;
//! let enc_ctx = EncryptionContext::new();
//!
//! // Encrypt: the generator creates the data key, the child wraps it again
//! let mut data_key = None;
//! let mut trace = KeyringTrace::new();
//! let mut edks = EdkList::new();
//! multi.on_encrypt(&mut data_key, &mut trace, &mut edks, &enc_ctx, suite)?;
//! assert!(data_key.is_some());
//!
//! // Decrypt: any keyring that recognizes one of the EDKs recovers the key
//! let mut recovered = None;
//! let mut trace = KeyringTrace::new();
//! multi.on_decrypt(&mut recovered, &mut trace, &edks, &enc_ctx, suite)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod keyring;
pub mod materials;
pub mod suite;

// Re-export key types
pub use crate::error::{Error, Result};
pub use crate::keyring::{KeyringHandle, MultiKeyring, MultiKeyringBuilder};
pub use crate::materials::{
    DataKey, EdkList, EncryptedDataKey, EncryptionContext, KeyringTrace, KeyringTraceRecord,
    TraceFlags,
};
pub use crate::suite::AlgorithmSuite;

use std::fmt;

/// Keyring interface for producing and recovering data keys
///
/// Implementations must only touch the data key slot and the output lists they
/// are handed. A keyring is destroyed when the last [`KeyringHandle`] to it is
/// dropped.
pub trait Keyring: Send + Sync + fmt::Debug {
    /// Name of the keyring, used in logs and errors
    fn name(&self) -> &str;

    /// Generates and/or wraps the data key
    ///
    /// If `data_key` is `None` the keyring may generate one; keyrings that can
    /// only wrap an existing key are allowed to leave it unset. Any EDKs and
    /// trace records produced are appended to `edks` and `trace`.
    fn on_encrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &mut EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()>;

    /// Attempts to recover the data key from one of `edks`
    ///
    /// Finding no matching EDK is not an error: the keyring returns `Ok(())`
    /// and leaves `data_key` unset.
    fn on_decrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()>;
}
