use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::Filter;

/// A parsed line from the command editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Filter { key: String, value: Filter },
    Update { id: String, pairs: Vec<(String, String)> },
    Delete { id: String },
    Goto(NaiveDate),
    Refresh,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Expected field=value, got '{0}'")]
    BadPair(String),

    #[error("Expected a YYYY-MM-DD date, got '{0}'")]
    BadDate(String),

    #[error("Unterminated quote")]
    UnterminatedQuote,

    #[error("Date filters follow the view; use goto <YYYY-MM-DD>")]
    DateFilter,
}

const FILTER_USAGE: &str = "filter <field> <text> | filter <field> None";
const UPDATE_USAGE: &str = "update <id> <field>=<value> ...";
const DELETE_USAGE: &str = "delete <id>";
const GOTO_USAGE: &str = "goto <YYYY-MM-DD>";

/// Parse a committed command line.
pub fn parse(input: &str) -> Result<Command, CommandError> {
    let tokens = tokenize(input)?;
    let Some((name, args)) = tokens.split_first() else {
        return Err(CommandError::Empty);
    };

    match name.as_str() {
        "filter" | "f" => parse_filter(args),
        "update" | "u" => {
            let (id, fields) = args
                .split_first()
                .ok_or(CommandError::Usage(UPDATE_USAGE))?;
            if fields.is_empty() {
                return Err(CommandError::Usage(UPDATE_USAGE));
            }
            let pairs = fields
                .iter()
                .map(|field| {
                    field
                        .split_once('=')
                        .filter(|(k, _)| !k.is_empty())
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .ok_or_else(|| CommandError::BadPair(field.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Command::Update {
                id: id.clone(),
                pairs,
            })
        }
        "delete" | "d" => match args {
            [id] => Ok(Command::Delete { id: id.clone() }),
            _ => Err(CommandError::Usage(DELETE_USAGE)),
        },
        "goto" | "g" => match args {
            [date] => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(Command::Goto)
                .map_err(|_| CommandError::BadDate(date.clone())),
            _ => Err(CommandError::Usage(GOTO_USAGE)),
        },
        "refresh" => Ok(Command::Refresh),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_filter(args: &[String]) -> Result<Command, CommandError> {
    let (key, rest) = args
        .split_first()
        .ok_or(CommandError::Usage(FILTER_USAGE))?;
    if key == "date" {
        return Err(CommandError::DateFilter);
    }
    if rest.is_empty() {
        return Err(CommandError::Usage(FILTER_USAGE));
    }

    let text = rest.join(" ");
    let value = if text.contains("None") {
        Filter::Cleared
    } else {
        Filter::Contains(text)
    };
    Ok(Command::Filter {
        key: key.clone(),
        value,
    })
}

/// Split on whitespace, keeping double-quoted runs together. Quotes may sit
/// inside a token, as in `title="Team sync"`.
fn tokenize(input: &str) -> Result<Vec<String>, CommandError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in input.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(CommandError::UnterminatedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
