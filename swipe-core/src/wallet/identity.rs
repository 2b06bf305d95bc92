use solana_sdk::signer::{
    keypair::{read_keypair_file, Keypair},
    Signer,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::storage::{KeyValueStore, WALLET_PUBLIC_KEY};
use crate::{Error, Result};

/// Source of the wallet public key. The session only ever sees the string.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Result<Option<String>>;
    fn create_identity(&self) -> Result<String>;
    /// Forget the identity on logout.
    fn clear_identity(&self) -> Result<()>;
}

/// Demo identity: a throwaway keypair whose public key is kept in the store.
pub struct StoredIdentity {
    store: Arc<dyn KeyValueStore>,
}

impl StoredIdentity {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

impl IdentityProvider for StoredIdentity {
    fn current_identity(&self) -> Result<Option<String>> {
        self.store.get(WALLET_PUBLIC_KEY)
    }

    fn create_identity(&self) -> Result<String> {
        let pubkey = Keypair::new().pubkey().to_string();
        self.store.set(WALLET_PUBLIC_KEY, &pubkey)?;
        info!("created demo wallet {}", pubkey);
        Ok(pubkey)
    }

    fn clear_identity(&self) -> Result<()> {
        self.store.remove(WALLET_PUBLIC_KEY)
    }
}

/// Identity backed by a Solana keypair file (`--keypair-path`).
pub struct KeypairIdentity {
    path: PathBuf,
}

impl KeypairIdentity {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_pubkey(&self) -> Result<String> {
        let keypair = read_keypair_file(&self.path).map_err(|e| {
            Error::Identity(format!("failed to read {}: {}", self.path.display(), e))
        })?;
        Ok(keypair.pubkey().to_string())
    }
}

impl IdentityProvider for KeypairIdentity {
    fn current_identity(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        self.read_pubkey().map(Some)
    }

    fn create_identity(&self) -> Result<String> {
        self.read_pubkey()
    }

    fn clear_identity(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::storage::MemoryStore;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signer::keypair::write_keypair_file;
    use std::str::FromStr;

    #[test]
    fn test_stored_identity_lifecycle() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let identity = StoredIdentity::new(store.clone());

        assert_eq!(identity.current_identity().unwrap(), None);
        let created = identity.create_identity().unwrap();
        assert!(Pubkey::from_str(&created).is_ok());
        assert_eq!(identity.current_identity().unwrap(), Some(created.clone()));
        assert_eq!(store.get(WALLET_PUBLIC_KEY).unwrap(), Some(created));

        identity.clear_identity().unwrap();
        assert_eq!(identity.current_identity().unwrap(), None);
    }

    #[test]
    fn test_keypair_identity_reads_file() {
        let path = std::env::temp_dir().join(format!("swipe-keypair-{}.json", std::process::id()));
        let keypair = Keypair::new();
        write_keypair_file(&keypair, &path).unwrap();

        let identity = KeypairIdentity::new(path.clone());
        assert_eq!(
            identity.current_identity().unwrap(),
            Some(keypair.pubkey().to_string())
        );
        assert_eq!(identity.create_identity().unwrap(), keypair.pubkey().to_string());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_keypair_identity_missing_file() {
        let identity = KeypairIdentity::new("/nonexistent/swipe/id.json");
        assert_eq!(identity.current_identity().unwrap(), None);
        assert!(matches!(
            identity.create_identity().unwrap_err(),
            Error::Identity(_)
        ));
    }
}
