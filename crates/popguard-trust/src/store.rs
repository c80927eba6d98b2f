//! Trust store
//!
//! Wraps an injected storage backend with the fail-safe-closed policy:
//! a storage error is never propagated past this boundary, it simply
//! reads as "not trusted" (or a no-op on write).

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use popguard_storage::Database;

use crate::Result;

/// Value stored under a trusted domain key.
const TRUSTED_VALUE: &str = "true";

/// One persisted trust decision. Absence of a record means untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustRecord {
    pub domain: String,
    pub trusted: bool,
}

/// Host-provided key-value persistence.
///
/// Every call resolves to a `Result` the caller branches on before
/// acting, so synchronous and asynchronous hosts look the same from the
/// trust store's side.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn list_keys(&self) -> Result<Vec<String>>;
}

impl StorageBackend for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get_value(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.set_value(key, value)?)
    }

    fn delete(&self, key: &str) -> Result<()> {
        Ok(self.delete_value(key)?)
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(Database::list_keys(self)?)
    }
}

/// Volatile in-memory backend for tests and ephemeral profiles.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().keys().cloned().collect())
    }
}

pub struct TrustStore {
    backend: Arc<dyn StorageBackend>,
}

impl TrustStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Whether a domain has been explicitly trusted. Absent records and
    /// storage errors both read as untrusted.
    pub fn is_trusted(&self, domain: &str) -> bool {
        match self.backend.get(domain) {
            Ok(Some(value)) => value == TRUSTED_VALUE,
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "Trust lookup failed, treating as untrusted");
                false
            }
        }
    }

    /// Persist trust for a domain. Write failures are swallowed; the
    /// domain simply stays untrusted.
    pub fn set_trusted(&self, domain: &str) {
        match self.backend.set(domain, TRUSTED_VALUE) {
            Ok(()) => tracing::info!(domain = %domain, "Domain added to trusted list"),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "Failed to persist trust");
            }
        }
    }

    /// Remove a domain from the trusted list. Removing an absent domain
    /// is a no-op.
    pub fn remove(&self, domain: &str) {
        match self.backend.delete(domain) {
            Ok(()) => tracing::info!(domain = %domain, "Domain removed from trusted list"),
            Err(e) => {
                tracing::warn!(domain = %domain, error = %e, "Failed to remove trust record");
            }
        }
    }

    /// All trusted domains, empty on storage failure.
    pub fn list_trusted(&self) -> Vec<String> {
        match self.backend.list_keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to list trusted domains");
                Vec::new()
            }
        }
    }

    /// Trusted domains as records, for handing to an editor surface.
    pub fn records(&self) -> Vec<TrustRecord> {
        self.list_trusted()
            .into_iter()
            .map(|domain| TrustRecord {
                domain,
                trusted: true,
            })
            .collect()
    }
}

impl Clone for TrustStore {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}
