//! Query execution settings.

use std::time::Duration;

use serde::Deserialize;

/// Default deadline for a single store query (30 seconds).
pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 30_000;

/// Default page size for customer order listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query execution settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Deadline applied to each store query, in milliseconds.
    ///
    /// Default: 30,000. Zero disables the deadline.
    pub timeout_ms: u64,

    /// Page size used when a caller asks for customer orders without one.
    ///
    /// Default: 10.
    pub default_page_size: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_QUERY_TIMEOUT_MS,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryConfig {
    /// Store query deadline, or `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}
