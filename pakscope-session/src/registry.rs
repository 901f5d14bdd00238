//! Proxy backend registry
//!
//! Backends are registered by short name. A platform name that matches no
//! backend falls through to the registry's default backend, if one is set.

use crate::backend::{BedrockProxy, JavaProxy};
use pakscope_core::{Error, ProxyBackend, ProxyCapabilities, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Information about a registered backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendInfo {
    /// Full name
    pub name: String,
    /// Short name used for selection
    pub shortname: String,
    /// Capability flags
    pub capabilities: ProxyCapabilities,
    /// Used for unrecognised platform names
    pub is_default: bool,
}

/// Thread-safe registry of proxy backends
pub struct ProxyRegistry {
    backends: RwLock<HashMap<String, Arc<dyn ProxyBackend>>>,
    default: RwLock<Option<String>>,
}

impl ProxyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(HashMap::new()),
            default: RwLock::new(None),
        }
    }

    /// Registry with the Java and Bedrock backends, Bedrock as fallback
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry
            .backends
            .write()
            .insert("java".to_string(), Arc::new(JavaProxy));
        registry
            .backends
            .write()
            .insert("bedrock".to_string(), Arc::new(BedrockProxy));
        *registry.default.write() = Some("bedrock".to_string());
        registry
    }

    /// Register a backend
    ///
    /// Returns an error if a backend with the same short name exists.
    pub fn register(&self, backend: Arc<dyn ProxyBackend>) -> Result<()> {
        let shortname = backend.shortname().to_string();
        let mut backends = self.backends.write();

        if backends.contains_key(&shortname) {
            warn!(shortname = %shortname, "Backend already registered");
            return Err(Error::AlreadyExists(format!(
                "Backend '{}' already registered",
                shortname
            )));
        }

        info!(shortname = %shortname, name = backend.name(), "Registering backend");
        backends.insert(shortname, backend);
        Ok(())
    }

    /// Use `shortname` for platform names that match nothing
    pub fn set_default(&self, shortname: &str) -> Result<()> {
        if !self.contains(shortname) {
            return Err(Error::UnknownBackend(shortname.to_string()));
        }
        *self.default.write() = Some(shortname.to_string());
        Ok(())
    }

    /// Get a backend by its exact short name
    pub fn get(&self, shortname: &str) -> Option<Arc<dyn ProxyBackend>> {
        self.backends.read().get(shortname).cloned()
    }

    /// Pick the backend for a platform name
    pub fn resolve(&self, platform: &str) -> Result<Arc<dyn ProxyBackend>> {
        if let Some(backend) = self.get(platform) {
            return Ok(backend);
        }

        let default = self.default.read().clone();
        match default.and_then(|name| self.get(&name)) {
            Some(backend) => {
                debug!(
                    platform = platform,
                    backend = backend.shortname(),
                    "Unknown platform, using default backend"
                );
                Ok(backend)
            }
            None => Err(Error::UnknownBackend(platform.to_string())),
        }
    }

    /// List all registered backends, sorted by short name
    pub fn list(&self) -> Vec<BackendInfo> {
        let default = self.default.read().clone();
        let mut list: Vec<_> = self
            .backends
            .read()
            .values()
            .map(|backend| BackendInfo {
                name: backend.name().to_string(),
                shortname: backend.shortname().to_string(),
                capabilities: backend.capabilities(),
                is_default: default.as_deref() == Some(backend.shortname()),
            })
            .collect();
        list.sort_by(|a, b| a.shortname.cmp(&b.shortname));
        list
    }

    /// Get the number of registered backends
    pub fn count(&self) -> usize {
        self.backends.read().len()
    }

    /// Check if a backend is registered
    pub fn contains(&self, shortname: &str) -> bool {
        self.backends.read().contains_key(shortname)
    }
}

impl Default for ProxyRegistry {
    fn default() -> Self {
        Self::new()
    }
}
