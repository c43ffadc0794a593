//! The textual command grammar.
//!
//! ```text
//! /run <tool> [args]   call one tool; args may span lines
//! /tools               same as `/run tools.list`
//! /help                print the grammar
//! ```
//!
//! Blank input produces no reply. Anything else gets a usage hint.

use sandclaw_core::TOOLS_LIST;

pub const HELP_TEXT: &str = "commands:\n\
/run <tool> [args]  call a tool (args may continue on following lines)\n\
/tools              list the tools you may call\n\
/help               show this message";

pub const USAGE_HINT: &str = "usage: /run <tool> [args] (send /help for more)";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Call `tool` with `args`
    Run { tool: String, args: String },
    Help,
    /// Nothing to do; reply with nothing
    Empty,
    /// Not in the grammar
    Unrecognized,
}

/// Parse task text into a [`Command`].
///
/// For `/run`, `args` is everything after the first whitespace character
/// following the tool name, verbatim to the end of the text. Trailing
/// newlines and whitespace belong to the payload.
pub fn parse_command(text: &str) -> Command {
    let text = text.trim_start();
    if text.is_empty() {
        return Command::Empty;
    }

    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest),
        None => (text, ""),
    };

    match head {
        "/run" => {
            let rest = rest.trim_start();
            let (tool, args) = match rest.split_once(char::is_whitespace) {
                Some((tool, args)) => (tool, args),
                None => (rest, ""),
            };
            if tool.is_empty() {
                return Command::Unrecognized;
            }
            Command::Run {
                tool: tool.to_string(),
                args: args.to_string(),
            }
        }
        "/tools" => Command::Run {
            tool: TOOLS_LIST.to_string(),
            args: String::new(),
        },
        "/help" => Command::Help,
        _ => Command::Unrecognized,
    }
}
