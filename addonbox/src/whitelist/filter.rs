//! Precompiled whitelist filter.

use std::sync::OnceLock;

use regex::RegexSet;

use super::rules::{default_rules, wildcard_to_regex, OwnedRule};
use crate::package::normalize_path;

/// Outcome of evaluating a path against the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict<'a> {
    /// Whether the path may enter a distributable archive.
    pub allowed: bool,

    /// The first matching rule's pattern, or `None` when the default
    /// (deny) applied.
    pub rule: Option<&'a str>,
}

/// Ordered allow/deny rule table compiled into a single regex set.
///
/// The first rule (in declaration order) whose pattern matches the
/// normalized path decides the result; no match means deny. The table is
/// immutable after construction and safe to share across threads.
///
/// # Example
///
/// ```
/// use addonbox::whitelist::Whitelist;
///
/// let whitelist = Whitelist::builtin();
/// assert!(whitelist.is_allowed("lua/weapons/gun.lua"));
/// assert!(!whitelist.is_allowed("models/gun.sw.vtx"));
/// assert!(whitelist.is_allowed("models/gun.vtx"));
/// ```
#[derive(Debug, Clone)]
pub struct Whitelist {
    set: RegexSet,
    rules: Vec<OwnedRule>,
}

impl Whitelist {
    /// Compile a rule table.
    pub fn new(rules: Vec<OwnedRule>) -> Result<Self, regex::Error> {
        let set = RegexSet::new(rules.iter().map(|r| wildcard_to_regex(&r.pattern)))?;
        Ok(Self { set, rules })
    }

    /// The process-wide filter built from the default rule table.
    ///
    /// Compiled on first use and shared afterwards.
    pub fn builtin() -> &'static Whitelist {
        static BUILTIN: OnceLock<Whitelist> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            // Patterns are constants; covered by tests.
            Whitelist::new(default_rules()).expect("built-in whitelist patterns compile")
        })
    }

    /// Evaluate a path, reporting which rule decided.
    pub fn evaluate(&self, path: &str) -> Verdict<'_> {
        let normalized = normalize_path(path);

        // SetMatches iterates in ascending rule index, i.e. declaration order.
        match self.set.matches(&normalized).iter().next() {
            Some(index) => {
                let rule = &self.rules[index];
                Verdict {
                    allowed: rule.allow,
                    rule: Some(rule.pattern.as_str()),
                }
            }
            None => Verdict {
                allowed: false,
                rule: None,
            },
        }
    }

    /// Whether the path may enter a distributable archive.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.evaluate(path).allowed
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[OwnedRule] {
        &self.rules
    }
}

/// Whether a content path may appear in a distributable archive, per the
/// built-in rule table.
pub fn is_whitelisted(path: &str) -> bool {
    Whitelist::builtin().is_allowed(path)
}
