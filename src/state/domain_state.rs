use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

/// Protocol a registered domain answered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Https,
    Http,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }

    pub fn from_is_https(is_https: bool) -> Self {
        if is_https {
            Self::Https
        } else {
            Self::Http
        }
    }

    pub fn is_https(&self) -> bool {
        matches!(self, Self::Https)
    }

    /// Builds `scheme://domain/path`
    pub fn url_for(&self, domain: &str, path: &str) -> String {
        format!("{}://{}{}", self.scheme(), domain, path)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Memoized projection of a registered domain row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub id: i64,
    pub protocol: Protocol,
}

/// Process-wide domain cache
///
/// A lookup miss means "ask the store", never "unregistered".
#[derive(Debug, Default)]
pub struct DomainCache {
    entries: RwLock<HashMap<String, DomainEntry>>,
}

impl DomainCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, domain: &str) -> Option<DomainEntry> {
        self.entries.read().get(domain).cloned()
    }

    pub fn insert(&self, domain: &str, entry: DomainEntry) {
        self.entries.write().insert(domain.to_string(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Per-domain crawl lifecycle
///
/// `NotStarted → Registering → PolicyLoaded → Crawling → Done`, with early
/// exits to `Done` from `Registering` and `PolicyLoaded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    NotStarted,
    Registering,
    PolicyLoaded,
    Crawling,
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal step
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::NotStarted, Self::Registering)
                | (Self::Registering, Self::PolicyLoaded)
                | (Self::Registering, Self::Done)
                | (Self::PolicyLoaded, Self::Crawling)
                | (Self::PolicyLoaded, Self::Done)
                | (Self::Crawling, Self::Done)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::Registering => "registering",
            Self::PolicyLoaded => "policy_loaded",
            Self::Crawling => "crawling",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why a domain crawl ended before its frontier was exhausted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    RegistrationFailed(String),
    RobotsUnavailable(String),
    RootDisallowed,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistrationFailed(msg) => write!(f, "registration failed: {}", msg),
            Self::RobotsUnavailable(msg) => write!(f, "robots.txt unavailable: {}", msg),
            Self::RootDisallowed => f.write_str("robots.txt disallows /"),
        }
    }
}
