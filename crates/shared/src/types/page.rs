//! Skip/limit windows for history reads.

use serde::{Deserialize, Serialize};

/// Maximum number of rows a single history read may return.
const MAX_LIMIT: u64 = 200;

/// A skip/limit window over an ordered history.
///
/// Ledger histories are unbounded, so every read takes an explicit window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Window {
    /// Number of rows to skip from the start of the ordering.
    #[serde(default)]
    pub skip: u64,
    /// Maximum number of rows to return.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    10
}

impl Default for Window {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl Window {
    /// Creates a window, clamping the limit to the allowed maximum.
    #[must_use]
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: limit.min(MAX_LIMIT),
        }
    }

    /// Offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.skip
    }

    /// Limit for database queries, clamped to the allowed maximum.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit.min(MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let w = Window::default();
        assert_eq!(w.offset(), 0);
        assert_eq!(w.limit(), 10);
    }

    #[test]
    fn test_limit_is_clamped() {
        let w = Window::new(5, 100_000);
        assert_eq!(w.offset(), 5);
        assert_eq!(w.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let w: Window = serde_json::from_str("{}").unwrap();
        assert_eq!(w.skip, 0);
        assert_eq!(w.limit, 10);
    }
}
