//! Command allowlist — which programs the subprocess tool may launch.
//!
//! This list is narrower than, and independent of, the tool registry's
//! allow-list: enabling `subprocess.exec` in the registry does nothing
//! until at least one program is listed here.
//!
//! Matching uses the program's base filename, so `/usr/bin/git` and `git`
//! are the same entry. Both `/` and `\` count as separators regardless of
//! host platform.

use std::collections::BTreeSet;

/// Outcome of checking a program against the allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandCheck {
    /// Program is allowed
    Allowed,
    /// Allowlist is empty (deny by default)
    NotConfigured,
    /// Program base name is not listed
    Denied { program: String },
}

/// Immutable set of permitted program base names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandAllowlist {
    commands: BTreeSet<String>,
}

impl CommandAllowlist {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let commands = commands
            .into_iter()
            .map(|c| program_basename(c.as_ref()).to_string())
            .filter(|c| !c.is_empty())
            .collect();
        Self { commands }
    }

    pub fn is_configured(&self) -> bool {
        !self.commands.is_empty()
    }

    /// Check a program (bare name or path) against the allowlist.
    ///
    /// Rules:
    /// - If the allowlist is empty → deny all (secure by default)
    /// - Otherwise, the program's base filename must be listed
    pub fn check(&self, program: &str) -> CommandCheck {
        if !self.is_configured() {
            return CommandCheck::NotConfigured;
        }
        let base = program_basename(program);
        if !base.is_empty() && self.commands.contains(base) {
            CommandCheck::Allowed
        } else {
            CommandCheck::Denied {
                program: base.to_string(),
            }
        }
    }

    pub fn allows(&self, program: &str) -> bool {
        self.check(program) == CommandCheck::Allowed
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }
}

/// The last path segment of `program`, trimmed.
pub fn program_basename(program: &str) -> &str {
    program
        .trim()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowlist_denies_all() {
        let list = CommandAllowlist::new(Vec::<String>::new());
        assert_eq!(list.check("echo"), CommandCheck::NotConfigured);
        assert!(!list.allows("ls"));
    }

    #[test]
    fn listed_program_allowed() {
        let list = CommandAllowlist::new(["echo", "git"]);
        assert_eq!(list.check("echo"), CommandCheck::Allowed);
        assert!(list.allows("git"));
    }

    #[test]
    fn path_is_stripped_to_basename() {
        let list = CommandAllowlist::new(["echo"]);
        assert!(list.allows("/bin/echo"));
        assert!(list.allows("C:\\tools\\echo"));
        assert!(list.allows("./echo"));
    }

    #[test]
    fn unknown_program_denied() {
        let list = CommandAllowlist::new(["echo"]);
        assert_eq!(
            list.check("/usr/bin/rm"),
            CommandCheck::Denied { program: "rm".into() }
        );
    }

    #[test]
    fn trailing_separator_is_not_a_program() {
        let list = CommandAllowlist::new(["echo"]);
        assert!(!list.allows("/bin/"));
        assert!(!list.allows("   "));
    }

    #[test]
    fn configured_entries_are_basenames_too() {
        let list = CommandAllowlist::new(["/usr/bin/git", "  "]);
        assert!(list.allows("git"));
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["git"]);
    }
}
