//! Host discovery through the platform's extension registry.
//!
//! The negotiator never loads extensions itself. It asks an
//! [`ExtensionRegistry`] for the host by identity and drives the returned
//! [`HostExtension`] through activation. [`StaticRegistry`] is an in-memory
//! registry for embedders that already hold their host descriptors.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use cpptools_contract::ExtensionExports;

use crate::errors::{ActivationError, RegistryError};

/// Descriptor of an installed extension.
#[async_trait]
pub trait HostExtension: Send + Sync {
    /// Identity the extension is registered under.
    fn id(&self) -> &str;

    /// Whether the extension has already been activated.
    fn is_active(&self) -> bool;

    /// Exports of an active extension.
    fn exports(&self) -> Option<Arc<dyn ExtensionExports>>;

    /// Activates the extension and returns its exports.
    async fn activate(&self) -> Result<Arc<dyn ExtensionExports>, ActivationError>;
}

impl fmt::Debug for dyn HostExtension {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("HostExtension")
            .field("id", &self.id())
            .field("active", &self.is_active())
            .finish()
    }
}

/// Lookup of installed extensions by identity.
pub trait ExtensionRegistry: Send + Sync {
    /// Returns the extension registered under `extension_id`, if installed.
    fn get_extension(&self, extension_id: &str) -> Option<Arc<dyn HostExtension>>;
}

impl<R: ExtensionRegistry + ?Sized> ExtensionRegistry for Arc<R> {
    fn get_extension(&self, extension_id: &str) -> Option<Arc<dyn HostExtension>> {
        (**self).get_extension(extension_id)
    }
}

impl<R: ExtensionRegistry + ?Sized> ExtensionRegistry for &R {
    fn get_extension(&self, extension_id: &str) -> Option<Arc<dyn HostExtension>> {
        (**self).get_extension(extension_id)
    }
}

/// An already-active extension with fixed exports.
pub struct ActiveExtension {
    id: String,
    exports: Arc<dyn ExtensionExports>,
}

impl ActiveExtension {
    /// Wraps exports obtained elsewhere.
    #[must_use]
    pub fn new(id: impl Into<String>, exports: Arc<dyn ExtensionExports>) -> Self {
        Self {
            id: id.into(),
            exports,
        }
    }
}

#[async_trait]
impl HostExtension for ActiveExtension {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn is_active(&self) -> bool {
        true
    }

    fn exports(&self) -> Option<Arc<dyn ExtensionExports>> {
        Some(Arc::clone(&self.exports))
    }

    async fn activate(&self) -> Result<Arc<dyn ExtensionExports>, ActivationError> {
        Ok(Arc::clone(&self.exports))
    }
}

/// In-memory registry keyed by extension identity.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use cpptools_api::{ActiveExtension, ExtensionRegistry, StaticRegistry};
/// use cpptools_contract::EmptyExports;
///
/// let mut registry = StaticRegistry::new();
/// registry
///     .register(Arc::new(ActiveExtension::new(
///         "ms-vscode.cpptools",
///         Arc::new(EmptyExports),
///     )))
///     .expect("registration succeeds");
/// assert!(registry.get_extension("ms-vscode.cpptools").is_some());
/// ```
#[derive(Default)]
pub struct StaticRegistry {
    extensions: HashMap<String, Arc<dyn HostExtension>>,
}

impl StaticRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension under its own identity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if the identity is taken.
    pub fn register(&mut self, extension: Arc<dyn HostExtension>) -> Result<(), RegistryError> {
        let extension_id = extension.id().to_owned();
        if self.extensions.contains_key(&extension_id) {
            return Err(RegistryError::Duplicate { extension_id });
        }
        self.extensions.insert(extension_id, extension);
        Ok(())
    }

    /// Returns the number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns `true` when no extensions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

impl fmt::Debug for StaticRegistry {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("StaticRegistry")
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ExtensionRegistry for StaticRegistry {
    fn get_extension(&self, extension_id: &str) -> Option<Arc<dyn HostExtension>> {
        self.extensions.get(extension_id).cloned()
    }
}
