//! Provider metadata handed to diff hooks and state upgraders.

use resource_schema_core::{Client, ProviderMeta};

use crate::config::ProviderConfig;

/// Client view carrying the namespace configured on the provider block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceClient {
    namespace: String,
}

impl NamespaceClient {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl Client for NamespaceClient {
    fn namespace(&self) -> &str {
        &self.namespace
    }
}

/// Process-wide provider metadata.
///
/// Read-only after construction, so it can be shared across concurrent plan
/// operations.
///
/// # Examples
///
/// ```
/// use resource_schema_core::ProviderMeta;
/// use resource_schema_provider::{ProviderConfig, ProviderContext};
///
/// let config = ProviderConfig {
///     version: "1.0".into(),
///     namespace: Some("admin".into()),
/// };
/// let ctx = ProviderContext::from_config(&config);
/// assert_eq!(ctx.client().namespace(), "admin");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProviderContext {
    client: NamespaceClient,
}

impl ProviderContext {
    pub fn new(client: NamespaceClient) -> Self {
        Self { client }
    }

    /// Builds the context from provider configuration. An unset namespace
    /// becomes the empty string.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let namespace = config.namespace.clone().unwrap_or_default();
        Self::new(NamespaceClient::new(namespace))
    }
}

impl ProviderMeta for ProviderContext {
    fn client(&self) -> &dyn Client {
        &self.client
    }
}
