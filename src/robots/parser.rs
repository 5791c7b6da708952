//! Robots.txt parser implementation
//!
//! Only the wildcard (`User-agent: *`) group is read, and only its `Disallow`
//! values are kept. Matching is a plain string prefix test: `*` and `$` in a
//! rule are literal characters.

/// Disallow prefixes that apply to this crawler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsRules {
    disallow: Vec<String>,
}

impl RobotsRules {
    pub fn new(disallow: Vec<String>) -> Self {
        Self { disallow }
    }

    /// A rule set that forbids nothing
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Disallow prefixes in declaration order
    pub fn disallowed_prefixes(&self) -> &[String] {
        &self.disallow
    }

    /// Returns the first rule that `path` starts with, if any
    pub fn matching_rule(&self, path: &str) -> Option<&str> {
        self.disallow
            .iter()
            .find(|rule| path.starts_with(rule.as_str()))
            .map(String::as_str)
    }

    pub fn is_disallowed(&self, path: &str) -> bool {
        self.matching_rule(path).is_some()
    }

    /// True when the domain root itself is off limits
    pub fn disallows_root(&self) -> bool {
        self.is_disallowed("/")
    }

    pub fn is_empty(&self) -> bool {
        self.disallow.is_empty()
    }
}

/// Parses robots.txt content into the wildcard group's disallow prefixes
///
/// # Parsing rules
///
/// - Directive names are case-insensitive; `#` starts a comment
/// - Collection starts after the first `User-agent: *` line and stops at the
///   next `User-agent:` line or end of input
/// - Empty `Disallow:` values are skipped (they mean "allow everything")
/// - Every other directive and every other group is ignored
///
/// # Example
///
/// ```
/// use sumi_indexer::robots::parse_disallow_rules;
///
/// let rules = parse_disallow_rules("User-agent: *\nDisallow: /admin\n");
/// assert!(rules.is_disallowed("/admin/users"));
/// assert!(!rules.is_disallowed("/about"));
/// ```
pub fn parse_disallow_rules(content: &str) -> RobotsRules {
    let mut disallow = Vec::new();
    let mut in_wildcard_group = false;

    for line in content.lines() {
        let line = match line.split_once('#') {
            Some((before, _)) => before,
            None => line,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" => {
                if in_wildcard_group {
                    break;
                }
                in_wildcard_group = value == "*";
            }
            "disallow" if in_wildcard_group && !value.is_empty() => {
                disallow.push(value.to_string());
            }
            _ => {}
        }
    }

    RobotsRules::new(disallow)
}
