//! Built-in rule table for distributable archives.
//!
//! Rules are wildcard patterns over normalized (lowercase, forward-slash)
//! paths:
//!
//! - `*` matches within a single path segment
//! - `**` matches across segments
//!
//! Order matters. Evaluation stops at the first matching rule, so narrow
//! deny rules must precede the broader allow rule they carve out of.

/// A single (pattern, allow) rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static str,
    pub allow: bool,
}

const fn allow(pattern: &'static str) -> Rule {
    Rule {
        pattern,
        allow: true,
    }
}

const fn deny(pattern: &'static str) -> Rule {
    Rule {
        pattern,
        allow: false,
    }
}

/// Game content rules. These apply at the root and are mirrored under each
/// gamemode's `content/` subtree.
pub const GAME_CONTENT_RULES: &[Rule] = &[
    // maps and their auxiliary data
    allow("maps/*.bsp"),
    allow("maps/*.lmp"),
    allow("maps/thumb/*.png"),
    // navigation and AI data
    allow("maps/*.nav"),
    allow("maps/*.ain"),
    allow("maps/graphs/*.ain"),
    allow("scenes/**.vcd"),
    allow("particles/**.pcf"),
    allow("resource/fonts/*.ttf"),
    allow("scripts/vehicles/**.txt"),
    allow("resource/localization/*/*.properties"),
    allow("sound/**.wav"),
    allow("sound/**.mp3"),
    allow("sound/**.ogg"),
    allow("materials/**.vmt"),
    allow("materials/**.vtf"),
    allow("materials/**.png"),
    allow("materials/**.jpg"),
    allow("materials/**.jpeg"),
    allow("materials/colorcorrection/*.raw"),
    // platform variants of compiled mesh data the client never loads
    deny("models/**.sw.vtx"),
    deny("models/**.xbox.vtx"),
    deny("models/**.360.vtx"),
    allow("models/**.mdl"),
    allow("models/**.vtx"),
    allow("models/**.phy"),
    allow("models/**.ani"),
    allow("models/**.vvd"),
];

/// Scripting rules at the root.
pub const SCRIPT_RULES: &[Rule] = &[allow("lua/**.lua")];

/// Gamemode-level files outside the mirrored content subtree.
pub const GAMEMODE_RULES: &[Rule] = &[
    allow("gamemodes/*/*.txt"),
    allow("gamemodes/*/*.fgd"),
    allow("gamemodes/*/logo.png"),
    allow("gamemodes/*/icon24.png"),
    allow("gamemodes/*/gamemode/**.lua"),
    allow("gamemodes/*/entities/effects/**.lua"),
    allow("gamemodes/*/entities/weapons/**.lua"),
    allow("gamemodes/*/entities/entities/**.lua"),
    allow("gamemodes/*/backgrounds/*.png"),
    allow("gamemodes/*/backgrounds/*.jpg"),
    allow("gamemodes/*/backgrounds/*.jpeg"),
];

/// Root under which gamemode content mirrors [`GAME_CONTENT_RULES`].
pub const GAMEMODE_CONTENT_ROOT: &str = "gamemodes/*/content/";

/// Generic static data files.
pub const STATIC_DATA_RULES: &[Rule] = &[
    allow("data_static/**.txt"),
    allow("data_static/**.dat"),
    allow("data_static/**.json"),
    allow("data_static/**.xml"),
    allow("data_static/**.csv"),
];

/// An owned rule, used once mirrored patterns have been expanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedRule {
    pub pattern: String,
    pub allow: bool,
}

impl OwnedRule {
    pub fn allow(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            allow: true,
        }
    }

    pub fn deny(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            allow: false,
        }
    }
}

impl From<&Rule> for OwnedRule {
    fn from(rule: &Rule) -> Self {
        Self {
            pattern: rule.pattern.to_string(),
            allow: rule.allow,
        }
    }
}

/// The complete default rule table, in evaluation order.
pub fn default_rules() -> Vec<OwnedRule> {
    let mirrored = GAME_CONTENT_RULES.iter().map(|rule| OwnedRule {
        pattern: format!("{}{}", GAMEMODE_CONTENT_ROOT, rule.pattern),
        allow: rule.allow,
    });

    SCRIPT_RULES
        .iter()
        .chain(GAME_CONTENT_RULES)
        .chain(GAMEMODE_RULES)
        .map(OwnedRule::from)
        .chain(mirrored)
        .chain(STATIC_DATA_RULES.iter().map(OwnedRule::from))
        .collect()
}

/// Translate a wildcard pattern into an anchored regular expression.
///
/// # Example
///
/// ```
/// use addonbox::whitelist::wildcard_to_regex;
///
/// assert_eq!(wildcard_to_regex("maps/*.bsp"), r"^maps/[^/]*\.bsp$");
/// assert_eq!(wildcard_to_regex("lua/**.lua"), r"^lua/.*\.lua$");
/// ```
pub fn wildcard_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2 + 2);
    out.push('^');

    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '*' {
            if chars.peek() == Some(&'*') {
                chars.next();
                out.push_str(".*");
            } else {
                out.push_str("[^/]*");
            }
        } else {
            let mut buf = [0u8; 4];
            out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
        }
    }

    out.push('$');
    out
}
