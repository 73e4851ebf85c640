//! Whitelist check command.

use addonbox::whitelist::Whitelist;

use crate::error::CliError;

/// Print allow/deny for each path. Fails if any path is denied.
pub fn run(paths: &[String]) -> Result<(), CliError> {
    let whitelist = Whitelist::builtin();
    let mut denied = 0;

    for path in paths {
        let verdict = whitelist.evaluate(path);
        let status = if verdict.allowed { "allow" } else { "deny " };
        match verdict.rule {
            Some(rule) => println!("{}  {}  ({})", status, path, rule),
            None => println!("{}  {}  (no matching rule)", status, path),
        }
        if !verdict.allowed {
            denied += 1;
        }
    }

    if denied > 0 {
        return Err(CliError::Denied(denied));
    }
    Ok(())
}
