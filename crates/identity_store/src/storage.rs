//! Identity storage trait and implementations

use crate::error::{IdentityError, Result};
use crate::store::Identity;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::fs;

/// Identity storage trait
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Load the persisted identity
    async fn load(&self) -> Result<Identity>;

    /// Save the identity
    async fn save(&self, identity: &Identity) -> Result<()>;

    /// Check if an identity is persisted
    async fn exists(&self) -> bool;

    /// Delete the persisted identity
    async fn delete(&self) -> Result<()>;
}

/// File-based identity storage (one JSON record under a stable path)
#[derive(Clone)]
pub struct FileIdentityStorage {
    base_path: PathBuf,
}

impl FileIdentityStorage {
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn identity_path(&self) -> PathBuf {
        self.base_path.join("identity.json")
    }
}

#[async_trait]
impl IdentityStorage for FileIdentityStorage {
    async fn load(&self) -> Result<Identity> {
        let path = self.identity_path();

        if !path.exists() {
            return Err(IdentityError::NotFound);
        }

        let contents = fs::read_to_string(&path).await?;
        let identity: Identity = serde_json::from_str(&contents)?;

        Ok(identity)
    }

    async fn save(&self, identity: &Identity) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;

        let path = self.identity_path();
        let contents = serde_json::to_string_pretty(identity)?;

        fs::write(&path, contents).await?;

        Ok(())
    }

    async fn exists(&self) -> bool {
        self.identity_path().exists()
    }

    async fn delete(&self) -> Result<()> {
        let path = self.identity_path();

        if path.exists() {
            fs::remove_file(&path).await?;
        }

        Ok(())
    }
}

/// In-memory identity storage.
///
/// Fallback for environments without durable storage: the identity then
/// lives only for the current page session.
#[derive(Default)]
pub struct MemoryIdentityStorage {
    identity: Mutex<Option<Identity>>,
}

impl MemoryIdentityStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityStorage for MemoryIdentityStorage {
    async fn load(&self) -> Result<Identity> {
        self.identity
            .lock()
            .expect("identity lock poisoned")
            .clone()
            .ok_or(IdentityError::NotFound)
    }

    async fn save(&self, identity: &Identity) -> Result<()> {
        *self.identity.lock().expect("identity lock poisoned") = Some(identity.clone());
        Ok(())
    }

    async fn exists(&self) -> bool {
        self.identity
            .lock()
            .expect("identity lock poisoned")
            .is_some()
    }

    async fn delete(&self) -> Result<()> {
        *self.identity.lock().expect("identity lock poisoned") = None;
        Ok(())
    }
}
