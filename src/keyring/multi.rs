use crate::error::{Error, Result};
use crate::keyring::{KeyringHandle, DEFAULT_CHILD_CAPACITY};
use crate::materials::{DataKey, EdkList, EncryptionContext, KeyringTrace};
use crate::suite::AlgorithmSuite;
use crate::Keyring;

use metrics::{counter, histogram};
use std::time::Instant;

const NAME: &str = "multi keyring";

/// Keyring that combines an optional generator with an ordered list of children
///
/// On encryption the generator (if any) must produce the data key, then every
/// child wraps it. EDKs and trace records from a failed encryption never reach
/// the caller. On decryption the generator and then each child is tried in
/// order until one recovers the data key.
///
/// A multi-keyring is configured through `&mut self` and then frozen with
/// [`MultiKeyring::into_handle`]; children cannot be added once it is in use.
#[derive(Debug)]
pub struct MultiKeyring {
    /// Keyring responsible for generating the data key
    generator: Option<KeyringHandle>,

    /// Keyrings that wrap the data key, in insertion order
    children: Vec<KeyringHandle>,
}

/// Builder for MultiKeyring
#[derive(Debug, Default)]
pub struct MultiKeyringBuilder {
    generator: Option<KeyringHandle>,
    children: Vec<KeyringHandle>,
    child_capacity: Option<usize>,
}

impl MultiKeyringBuilder {
    /// Creates a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the generator keyring
    pub fn with_generator(mut self, generator: &KeyringHandle) -> Self {
        self.generator = Some(generator.retain());
        self
    }

    /// Appends a child keyring
    pub fn with_child(mut self, child: &KeyringHandle) -> Self {
        self.children.push(child.retain());
        self
    }

    /// Appends several child keyrings, keeping their order
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = KeyringHandle>,
    {
        self.children.extend(children);
        self
    }

    /// Sets how many child slots to reserve up front
    pub fn with_child_capacity(mut self, capacity: usize) -> Self {
        self.child_capacity = Some(capacity);
        self
    }

    /// Builds the MultiKeyring
    pub fn build(self) -> Result<MultiKeyring> {
        let capacity = self
            .child_capacity
            .unwrap_or(DEFAULT_CHILD_CAPACITY)
            .max(self.children.len());

        let mut multi = MultiKeyring::with_capacity(self.generator.as_ref(), capacity)?;
        for child in &self.children {
            multi.add_child(child)?;
        }

        Ok(multi)
    }
}

impl MultiKeyring {
    /// Creates a multi-keyring with no children
    ///
    /// Without a generator the multi-keyring can only encrypt when the caller
    /// already holds a data key.
    pub fn new(generator: Option<&KeyringHandle>) -> Result<Self> {
        Self::with_capacity(generator, DEFAULT_CHILD_CAPACITY)
    }

    /// Creates a multi-keyring with room for `capacity` children
    pub fn with_capacity(generator: Option<&KeyringHandle>, capacity: usize) -> Result<Self> {
        let mut children = Vec::new();
        children.try_reserve(capacity)?;

        Ok(Self {
            generator: generator.map(KeyringHandle::retain),
            children,
        })
    }

    /// Creates a new MultiKeyring using the builder pattern
    pub fn builder() -> MultiKeyringBuilder {
        MultiKeyringBuilder::new()
    }

    /// Retains `child` and appends it after the existing children
    ///
    /// The same keyring may be added more than once; each slot holds its own
    /// reference.
    pub fn add_child(&mut self, child: &KeyringHandle) -> Result<()> {
        self.children.try_reserve(1)?;
        self.children.push(child.retain());

        log::debug!(
            "{} add child -- name: {}, children: {}",
            NAME,
            child.name(),
            self.children.len()
        );
        Ok(())
    }

    pub fn generator(&self) -> Option<&KeyringHandle> {
        self.generator.as_ref()
    }

    pub fn children(&self) -> &[KeyringHandle] {
        &self.children
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Freezes the configuration into a shareable handle
    pub fn into_handle(self) -> KeyringHandle {
        KeyringHandle::new(self)
    }

    /// Generator first, then children in insertion order
    fn delegates(&self) -> impl Iterator<Item = &KeyringHandle> + '_ {
        self.generator.iter().chain(self.children.iter())
    }

    fn encrypt_all(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &mut EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        // Dropped on every early return, so a failed call exposes nothing
        let mut my_edks = EdkList::try_with_capacity(self.children.len() + 1)?;
        let mut my_trace = KeyringTrace::try_with_capacity(self.children.len() + 1)?;

        if let Some(generator) = &self.generator {
            generator.on_encrypt(data_key, &mut my_trace, &mut my_edks, enc_ctx, suite)?;
        }

        if data_key.is_none() {
            // Either the generator did not generate a data key, or there is no
            // generator and the caller did not supply one.
            return Err(Error::BadState(format!(
                "{} has no data key after the generator step (generator configured: {})",
                NAME,
                self.has_generator()
            )));
        }

        for child in &self.children {
            child.on_encrypt(data_key, &mut my_trace, &mut my_edks, enc_ctx, suite)?;
        }

        // Reserve both outputs before moving anything so the transfer is all or nothing
        edks.reserve(my_edks.len())?;
        trace.reserve(my_trace.len())?;
        edks.transfer_from(&mut my_edks)?;
        trace.transfer_from(&mut my_trace)?;

        Ok(())
    }

    fn decrypt_any(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        if data_key.is_some() {
            return Ok(());
        }

        let mut errors = Vec::new();
        for keyring in self.delegates() {
            let result = keyring.on_decrypt(data_key, trace, edks, enc_ctx, suite);
            if data_key.is_some() {
                log::debug!("{} decrypted data key -- keyring: {}", NAME, keyring.name());
                return Ok(());
            }

            // Keep going; another keyring may still hold a matching key
            if let Err(e) = result {
                log::debug!("{} keyring {} failed to decrypt: {}", NAME, keyring.name(), e);
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Aggregate(errors))
        }
    }
}

impl Keyring for MultiKeyring {
    fn name(&self) -> &str {
        NAME
    }

    fn on_encrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &mut EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        counter!("keyring.multi.encrypt", 1);
        let start = Instant::now();

        let result = self.encrypt_all(data_key, trace, edks, enc_ctx, suite);

        histogram!("keyring.multi.encrypt.time", start.elapsed());
        if result.is_err() {
            counter!("keyring.multi.encrypt.failure", 1);
        }
        result
    }

    fn on_decrypt(
        &self,
        data_key: &mut Option<DataKey>,
        trace: &mut KeyringTrace,
        edks: &EdkList,
        enc_ctx: &EncryptionContext,
        suite: AlgorithmSuite,
    ) -> Result<()> {
        counter!("keyring.multi.decrypt", 1);
        let start = Instant::now();

        let result = self.decrypt_any(data_key, trace, edks, enc_ctx, suite);

        histogram!("keyring.multi.decrypt.time", start.elapsed());
        if result.is_err() {
            counter!("keyring.multi.decrypt.failure", 1);
        }
        result
    }
}

impl Drop for MultiKeyring {
    fn drop(&mut self) {
        log::debug!(
            "{} closing -- generator: {}, children: {}",
            NAME,
            self.has_generator(),
            self.children.len()
        );
    }
}
