use crate::error::{Error, Result};
use crate::materials::{DataKey, EdkList, EncryptionContext, KeyringTrace};
use crate::suite::AlgorithmSuite;
use crate::Keyring;
use std::fmt;
use std::sync::Arc;

/// Shared, reference counted handle to a keyring
///
/// Cloning a handle retains the keyring, dropping it releases it; the keyring
/// itself is dropped with its last handle. Calls go through
/// [`KeyringHandle::on_encrypt`] and [`KeyringHandle::on_decrypt`], which check
/// that the keyring honoured the data key contract.
#[derive(Clone)]
pub struct KeyringHandle {
    inner: Arc<dyn Keyring>,
}

impl KeyringHandle {
    /// Takes ownership of a keyring
    pub fn new<K: Keyring + 'static>(keyring: K) -> Self {
        Self {
            inner: Arc::new(keyring),
        }
    }

    /// Returns a new handle to the same keyring
    pub fn retain(&self) -> Self {
        self.clone()
    }

    /// Number of live handles to this keyring
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Returns true if both handles refer to the same keyring
    pub fn ptr_eq(&self, other: &KeyringHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Runs the keyring's encrypt step
    ///
    /// A data key present before the call must come back unchanged, whether the
    /// keyring succeeds or fails; if it does not, the original key is put back
    /// and `Error::BadState` is returned. A data key generated by the call must
    /// have the length `suite` requires.
    pub fn on_encrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &mut EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        let previous = data_key.clone();
        log::debug!(
            "{} on_encrypt -- suite: {}, data key present: {}",
            self.name(),
            suite,
            previous.is_some()
        );

        let result = self.inner.on_encrypt(data_key, trace, edks, enc_ctx, suite);

        let violation = match (previous.as_ref(), data_key.as_ref()) {
            (Some(before), Some(after)) if !before.ct_eq(after) => Some("replaced"),
            (Some(_), None) => Some("discarded"),
            _ => None,
        };
        if let Some(action) = violation {
            *data_key = previous;
            return Err(Error::BadState(format!(
                "keyring '{}' {} an existing data key",
                self.name(),
                action
            )));
        }

        result?;

        match (previous.as_ref(), data_key.as_ref()) {
            (None, Some(after)) if after.len() != suite.data_key_len() => {
                Err(wrong_length(self.name(), after, suite))
            }
            _ => Ok(()),
        }
    }

    /// Runs the keyring's decrypt step
    ///
    /// The data key must be unset on entry. If the keyring recovers a key of
    /// the wrong length the slot is cleared again and `Error::BadState` is
    /// returned; otherwise the keyring's own result is passed through.
    pub fn on_decrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        if data_key.is_some() {
            return Err(Error::BadState(format!(
                "keyring '{}' called to decrypt with a data key already present",
                self.name()
            )));
        }
        log::debug!(
            "{} on_decrypt -- suite: {}, edks: {}",
            self.name(),
            suite,
            edks.len()
        );

        let result = self.inner.on_decrypt(data_key, trace, edks, enc_ctx, suite);

        if let Some(key) = data_key.as_ref() {
            if key.len() != suite.data_key_len() {
                let err = wrong_length(self.name(), key, suite);
                *data_key = None;
                return Err(err);
            }
        }

        result
    }
}

fn wrong_length(name: &str, key: &DataKey, suite: AlgorithmSuite) -> Error {
    Error::BadState(format!(
        "keyring '{}' produced a {} byte data key, {} requires {}",
        name,
        key.len(),
        suite,
        suite.data_key_len()
    ))
}

impl fmt::Debug for KeyringHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyringHandle")
            .field("keyring", &self.inner)
            .field("refs", &self.ref_count())
            .finish()
    }
}
