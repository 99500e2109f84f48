//! The capability a third-party extension offers to the host.

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::configuration::{SourceFileConfigurationItem, WorkspaceBrowseConfiguration};
use crate::errors::ProviderError;

/// Supplies custom IntelliSense configurations to the host.
///
/// A provider is constructed by its extension during activation, registered
/// with a resolved API handle exactly once and disposed when the extension
/// deactivates. Every request accepts an optional cancellation token that
/// implementations must honour; [`ProviderError::check`] is the usual way to
/// do so between units of work.
///
/// The browse-configuration methods belong to v2 and the per-folder pair to
/// v3. Their default implementations report no support, which is what a host
/// assumes for a provider written against an older version.
#[async_trait]
pub trait CustomConfigurationProvider: Send + Sync {
    /// Friendly name of the provider extension.
    fn name(&self) -> &str;

    /// Identifier of the extension supplying configurations, e.g.
    /// `ms-vscode.cmake-tools`.
    fn extension_id(&self) -> &str;

    /// Whether the provider can configure the given document.
    async fn can_provide_configuration(
        &self,
        uri: &Url,
        token: Option<&CancellationToken>,
    ) -> Result<bool, ProviderError>;

    /// Returns configurations for the documents this provider can serve.
    ///
    /// Documents the provider cannot configure are omitted. An empty list is
    /// a valid answer.
    async fn provide_configurations(
        &self,
        uris: &[Url],
        token: Option<&CancellationToken>,
    ) -> Result<Vec<SourceFileConfigurationItem>, ProviderError>;

    /// Whether the provider can supply a workspace browse configuration.
    async fn can_provide_browse_configuration(
        &self,
        _token: Option<&CancellationToken>,
    ) -> Result<bool, ProviderError> {
        Ok(false)
    }

    /// Returns the workspace browse configuration, if any.
    async fn provide_browse_configuration(
        &self,
        _token: Option<&CancellationToken>,
    ) -> Result<Option<WorkspaceBrowseConfiguration>, ProviderError> {
        Ok(None)
    }

    /// Whether browse configurations differ per workspace folder.
    async fn can_provide_browse_configurations_per_folder(
        &self,
        _token: Option<&CancellationToken>,
    ) -> Result<bool, ProviderError> {
        Ok(false)
    }

    /// Returns the browse configuration for one workspace folder, if any.
    async fn provide_folder_browse_configuration(
        &self,
        _folder_uri: &Url,
        _token: Option<&CancellationToken>,
    ) -> Result<Option<WorkspaceBrowseConfiguration>, ProviderError> {
        Ok(None)
    }

    /// Releases resources held for the host.
    fn dispose(&self) {}
}

impl fmt::Debug for dyn CustomConfigurationProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CustomConfigurationProvider")
            .field("name", &self.name())
            .field("extension_id", &self.extension_id())
            .finish()
    }
}
