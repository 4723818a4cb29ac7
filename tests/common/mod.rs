// Mock keyrings shared by the integration tests

#![allow(dead_code)]

use envelope_keyring::{
    AlgorithmSuite, DataKey, EdkList, EncryptedDataKey, EncryptionContext, Error, Keyring,
    KeyringHandle, KeyringTrace, Result, TraceFlags,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const NAMESPACE: &str = "mock";
pub const SUITE: AlgorithmSuite = AlgorithmSuite::Aes256GcmIv12Tag16HkdfSha384EcdsaP384;

// Toy wrapping so tests can check that the right keyring unwrapped the key
const WRAP_BYTE: u8 = 0x5A;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnEncrypt {
    /// Generate a key if none is present, then wrap it
    Generate,
    /// Wrap an existing key, do nothing without one
    Wrap,
    /// Succeed without touching anything
    Skip,
    /// Return a provider error
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDecrypt {
    /// Unwrap the first EDK carrying this keyring's name
    Unwrap,
    /// Unwrap like `Unwrap`, then return a provider error anyway
    UnwrapThenFail,
    /// Return a provider error
    Fail,
}

#[derive(Debug, Default)]
pub struct MockStats {
    pub encrypt_calls: AtomicUsize,
    pub decrypt_calls: AtomicUsize,
    pub drops: AtomicUsize,
}

impl MockStats {
    pub fn encrypt_calls(&self) -> usize {
        self.encrypt_calls.load(Ordering::SeqCst)
    }

    pub fn decrypt_calls(&self) -> usize {
        self.decrypt_calls.load(Ordering::SeqCst)
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct MockKeyring {
    name: String,
    on_encrypt: OnEncrypt,
    on_decrypt: OnDecrypt,
    stats: Arc<MockStats>,
}

impl MockKeyring {
    pub fn handle(
        name: &str,
        on_encrypt: OnEncrypt,
        on_decrypt: OnDecrypt,
    ) -> (KeyringHandle, Arc<MockStats>) {
        let stats = Arc::new(MockStats::default());
        let keyring = Self {
            name: name.to_string(),
            on_encrypt,
            on_decrypt,
            stats: stats.clone(),
        };
        (KeyringHandle::new(keyring), stats)
    }

    fn wrap(&self, key: &DataKey, edks: &mut EdkList, trace: &mut KeyringTrace, flags: TraceFlags) -> Result<()> {
        let ciphertext: Vec<u8> = key.as_bytes().iter().map(|b| b ^ WRAP_BYTE).collect();
        edks.push(EncryptedDataKey::new(
            self.name.clone(),
            self.name.as_bytes().to_vec(),
            ciphertext,
        ))?;
        trace.add_record(NAMESPACE, self.name.clone(), flags)
    }

    fn unwrap_edk(&self, data_key: &mut Option<DataKey>, trace: &mut KeyringTrace, edks: &EdkList) -> Result<()> {
        if let Some(edk) = edks.iter().find(|edk| edk.provider_id == self.name) {
            let bytes: Vec<u8> = edk.ciphertext.iter().map(|b| b ^ WRAP_BYTE).collect();
            *data_key = Some(DataKey::new(bytes));
            trace.add_record(NAMESPACE, self.name.clone(), TraceFlags::DECRYPTED_DATA_KEY)?;
        }
        Ok(())
    }
}

impl Drop for MockKeyring {
    fn drop(&mut self) {
        self.stats.drops.fetch_add(1, Ordering::SeqCst);
    }
}

impl Keyring for MockKeyring {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_encrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &mut EdkList,
        _enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        self.stats.encrypt_calls.fetch_add(1, Ordering::SeqCst);

        match self.on_encrypt {
            OnEncrypt::Generate => {
                let mut flags = TraceFlags::ENCRYPTED_DATA_KEY;
                if data_key.is_none() {
                    *data_key = Some(DataKey::generate(suite.data_key_len()));
                    flags |= TraceFlags::GENERATED_DATA_KEY;
                }
                match data_key.as_ref() {
                    Some(key) => self.wrap(key, edks, trace, flags),
                    None => Ok(()),
                }
            }
            OnEncrypt::Wrap => match data_key.as_ref() {
                Some(key) => self.wrap(key, edks, trace, TraceFlags::ENCRYPTED_DATA_KEY),
                None => Ok(()),
            },
            OnEncrypt::Skip => Ok(()),
            OnEncrypt::Fail => Err(Error::provider(self.name.clone(), "simulated encrypt failure")),
        }
    }

    fn on_decrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &EdkList,
        _enc_ctx: &EncryptionContext,
        _suite: AlgorithmSuite,
    ) -> Result<()> {
        self.stats.decrypt_calls.fetch_add(1, Ordering::SeqCst);

        match self.on_decrypt {
            OnDecrypt::Unwrap => self.unwrap_edk(data_key, trace, edks),
            OnDecrypt::UnwrapThenFail => {
                self.unwrap_edk(data_key, trace, edks)?;
                Err(Error::provider(self.name.clone(), "simulated failure after unwrap"))
            }
            OnDecrypt::Fail => Err(Error::provider(self.name.clone(), "simulated decrypt failure")),
        }
    }
}

pub fn enc_ctx() -> EncryptionContext {
    let mut ctx = EncryptionContext::new();
    ctx.insert("tenant".to_string(), "acme".to_string());
    ctx.insert("purpose".to_string(), "test".to_string());
    ctx
}

/// An EDK produced by a provider none of the mocks recognize
pub fn foreign_edk() -> EncryptedDataKey {
    EncryptedDataKey::new("foreign", b"elsewhere".to_vec(), vec![1, 2, 3, 4])
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
