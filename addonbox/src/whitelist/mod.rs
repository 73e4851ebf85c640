//! Content whitelist for distributable archives.
//!
//! Decides whether a content path may be embedded in a binary archive. The
//! rule table is an ordered list of (pattern, allow) pairs; order is part of
//! the contract because narrow deny rules override broader allow rules that
//! would otherwise match the same path.
//!
//! The manifest encoder never consults the whitelist: manifests list every
//! file since they carry only metadata and URLs.
//!
//! # Example
//!
//! ```
//! use addonbox::whitelist::is_whitelisted;
//!
//! assert!(is_whitelisted("lua/weapons/gun.lua"));
//! assert!(!is_whitelisted("models/gun.sw.vtx"));
//! assert!(is_whitelisted("gamemodes/foo/rules.txt"));
//! assert!(!is_whitelisted("gamemodes/foo/bar/baz.txt"));
//! ```

mod filter;
mod rules;

pub use filter::{is_whitelisted, Verdict, Whitelist};
pub use rules::{default_rules, wildcard_to_regex, OwnedRule, Rule};
