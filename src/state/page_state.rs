//! Outcome definitions for paths taken off the crawl frontier
//!
//! Every frontier entry ends in exactly one of these outcomes.
use std::fmt;

/// Result of processing one `{path, depth}` frontier entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathOutcome {
    // ===== Success =====
    /// Page was fetched and its index transaction committed
    Indexed,

    // ===== Skips =====
    /// Entry was deeper than the configured maximum
    DepthExceeded,

    /// Path was already indexed earlier in this run
    AlreadyScraped,

    /// Path is already present in the store from a previous run
    AlreadyIndexed,

    /// Path matches a robots.txt disallow prefix
    Disallowed,

    /// Domain has no resolved protocol
    Unregistered,

    // ===== Failures =====
    /// Transport error, timeout or non-success status
    FetchFailed,

    /// Index transaction failed and was rolled back
    IndexFailed,
}

impl PathOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Indexed)
    }

    /// Skips are not errors: the path was deliberately left alone
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::DepthExceeded
                | Self::AlreadyScraped
                | Self::AlreadyIndexed
                | Self::Disallowed
                | Self::Unregistered
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::FetchFailed | Self::IndexFailed)
    }

    /// Whether links on the page should be followed after this outcome
    pub fn follows_links(&self) -> bool {
        self.is_success()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Indexed => "indexed",
            Self::DepthExceeded => "depth_exceeded",
            Self::AlreadyScraped => "already_scraped",
            Self::AlreadyIndexed => "already_indexed",
            Self::Disallowed => "disallowed",
            Self::Unregistered => "unregistered",
            Self::FetchFailed => "fetch_failed",
            Self::IndexFailed => "index_failed",
        }
    }

    pub fn all() -> [Self; 8] {
        [
            Self::Indexed,
            Self::DepthExceeded,
            Self::AlreadyScraped,
            Self::AlreadyIndexed,
            Self::Disallowed,
            Self::Unregistered,
            Self::FetchFailed,
            Self::IndexFailed,
        ]
    }
}

impl fmt::Display for PathOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
