//! Frontend configuration.

use serde::{Deserialize, Serialize};

/// Prefix of canonical controller resource names.
pub const DEFAULT_RESOURCE_PREFIX: &str = "//storage.opiproject.org/volumes";

/// Page size used when a list request leaves it unset.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// Upper bound applied to client page sizes.
pub const MAX_PAGE_SIZE: usize = 250;

/// Settings for the controller frontend.
///
/// # Examples
///
/// ```
/// use marvell_bridge::frontend::config::FrontendConfig;
///
/// let config = FrontendConfig::default();
/// assert_eq!(config.default_page_size, 50);
///
/// let small_pages = FrontendConfig::default().with_page_sizes(2, 10);
/// assert_eq!(small_pages.max_page_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    /// Prefix of canonical resource names.
    pub resource_prefix: String,
    /// Page size for list requests with a zero page size.
    pub default_page_size: usize,
    /// Largest page a list request may return.
    pub max_page_size: usize,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            resource_prefix: DEFAULT_RESOURCE_PREFIX.to_owned(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl FrontendConfig {
    /// Sets the resource-name prefix.
    #[must_use]
    pub fn with_resource_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.resource_prefix = prefix.into();
        self
    }

    /// Sets the default and maximum page sizes.
    #[must_use]
    pub const fn with_page_sizes(mut self, default_page_size: usize, max_page_size: usize) -> Self {
        self.default_page_size = default_page_size;
        self.max_page_size = max_page_size;
        self
    }
}
