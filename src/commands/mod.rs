use std::num::NonZeroUsize;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // command word, then everything after the first run of whitespace
    static ref COMMAND_LINE: Regex = Regex::new(r"^\s*([A-Za-z][A-Za-z-]*)(?:\s+(.*?))?\s*$").unwrap();
}

pub const USAGE: &str = "\
Commands:
  add <name>        add one candidate
  load <file>       add candidates from a file, one per line
  remove <name>     remove a candidate
  clear             remove every candidate
  start <n>         start (or resume) drawing toward n winners
  stop [title]      lock in the highlighted candidate
  reset             abandon the current round
  list              show candidates
  winners           show winners of the current round
  results           show finished rounds
  export [json]     print the results history
  clear-results     forget finished rounds
  help              show this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Load(String),
    Remove(String),
    Clear,
    Start(NonZeroUsize),
    Stop(String),
    Reset,
    List,
    Winners,
    Results,
    Export { json: bool },
    ClearResults,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let caps = COMMAND_LINE
        .captures(line)
        .ok_or_else(|| format!("Could not read command: {}", line.trim()))?;
    let word = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
    let arg = caps.get(2).map_or("", |m| m.as_str());

    let command = match word.as_str() {
        "add" => Command::Add(required(arg, "add <name>")?),
        "load" => Command::Load(required(arg, "load <file>")?),
        "remove" | "rm" => Command::Remove(required(arg, "remove <name>")?),
        "clear" => Command::Clear,
        "start" => {
            let count = arg
                .parse::<NonZeroUsize>()
                .map_err(|_| "Usage: start <n>, where n is at least 1".to_string())?;
            Command::Start(count)
        }
        "stop" => Command::Stop(arg.to_string()),
        "reset" => Command::Reset,
        "list" => Command::List,
        "winners" => Command::Winners,
        "results" => Command::Results,
        "export" => match arg {
            "" => Command::Export { json: false },
            "json" => Command::Export { json: true },
            _ => return Err("Usage: export [json]".to_string()),
        },
        "clear-results" => Command::ClearResults,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command: {}. Type `help` for a list.", other)),
    };

    Ok(Some(command))
}

fn required(arg: &str, usage: &str) -> Result<String, String> {
    if arg.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(arg.to_string())
    }
}
