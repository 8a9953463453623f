//! Board command grammar.
//!
//! ```text
//! add <title> | <description>
//! edit <id> <title> | <description>
//! rm <id>
//! show <id>
//! ls
//! help
//! quit
//! ```
//!
//! Title and description are passed through untrimmed; the service trims.

use thiserror::Error;

/// A parsed board command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { title: String, description: String },
    Edit { id: i64, title: String, description: String },
    Remove { id: i64 },
    Show { id: i64 },
    List,
    Help,
    Quit,
}

/// Error type for command parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("'{0}' needs a note id")]
    MissingId(&'static str),

    #[error("'{0}' is not a note id")]
    InvalidId(String),
}

/// Usage text shown by `help`.
pub const HELP: &str = "\
Commands:
  add <title> | <description>        create a note
  edit <id> <title> | <description>  replace a note's text
  rm <id>                            delete a note
  show <id>                          show one note
  ls                                 redraw the board
  help                               show this help
  quit                               leave
";

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "" => Err(ParseError::Empty),
        "add" | "new" => {
            let (title, description) = split_text(rest);
            Ok(Command::Add { title, description })
        }
        "edit" => {
            let (id, text) = take_id("edit", rest)?;
            let (title, description) = split_text(text);
            Ok(Command::Edit {
                id,
                title,
                description,
            })
        }
        "rm" | "del" | "delete" => Ok(Command::Remove {
            id: take_id("rm", rest)?.0,
        }),
        "show" => Ok(Command::Show {
            id: take_id("show", rest)?.0,
        }),
        "ls" | "list" => Ok(Command::List),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn take_id<'a>(verb: &'static str, rest: &'a str) -> Result<(i64, &'a str), ParseError> {
    let rest = rest.trim_start();
    let (token, remainder) = match rest.split_once(char::is_whitespace) {
        Some((token, remainder)) => (token, remainder),
        None => (rest, ""),
    };
    if token.is_empty() {
        return Err(ParseError::MissingId(verb));
    }
    let token = token.strip_prefix('#').unwrap_or(token);
    let id = token
        .parse()
        .map_err(|_| ParseError::InvalidId(token.to_string()))?;
    Ok((id, remainder))
}

fn split_text(text: &str) -> (String, String) {
    match text.split_once('|') {
        Some((title, description)) => (title.to_string(), description.to_string()),
        None => (text.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_command("add Milk | Buy 2 liters").unwrap(),
            Command::Add {
                title: "Milk ".into(),
                description: " Buy 2 liters".into(),
            }
        );
        assert_eq!(
            parse_command("add Eggs").unwrap(),
            Command::Add {
                title: "Eggs".into(),
                description: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_edit_keeps_pipes_in_description() {
        assert_eq!(
            parse_command("edit #1 Milk | 3 liters | skimmed").unwrap(),
            Command::Edit {
                id: 1,
                title: "Milk ".into(),
                description: " 3 liters | skimmed".into(),
            }
        );
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(parse_command("rm 4").unwrap(), Command::Remove { id: 4 });
        assert_eq!(parse_command("SHOW 2").unwrap(), Command::Show { id: 2 });
        assert_eq!(
            parse_command("rm").unwrap_err(),
            ParseError::MissingId("rm")
        );
        assert_eq!(
            parse_command("edit abc x").unwrap_err(),
            ParseError::InvalidId("abc".into())
        );
    }

    #[test]
    fn test_parse_simple_verbs() {
        assert_eq!(parse_command("  ls ").unwrap(), Command::List);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
        assert_eq!(parse_command("   ").unwrap_err(), ParseError::Empty);
        assert_eq!(
            parse_command("frobnicate").unwrap_err(),
            ParseError::UnknownCommand("frobnicate".into())
        );
    }
}
