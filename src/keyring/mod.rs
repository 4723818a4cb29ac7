//! Keyring handles and composition
//!
//! - [`KeyringHandle`]: shared ownership of a keyring, with the keyring
//!   contract checked around every call
//! - [`MultiKeyring`]: a generator plus ordered children behaving as one keyring

mod handle;
mod multi;

pub use handle::KeyringHandle;
pub use multi::{MultiKeyring, MultiKeyringBuilder};

/// Number of child slots reserved when a multi-keyring is created
pub const DEFAULT_CHILD_CAPACITY: usize = 4;
