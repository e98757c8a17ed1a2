//! Parsing of lines typed at the prompt.

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// `/leave <room>`
    Leave(String),
    /// `/switch <room>`: make a joined room the target of plain text
    Switch(String),
    /// `/rooms`
    Rooms,
    /// `/quit`
    Quit,
    /// Anything not starting with `/` is a message
    Text(String),
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Text(line.to_string()));
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let argument = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

    let room = |command: &'static str| {
        argument
            .map(str::to_string)
            .ok_or(CommandError::MissingArgument(command))
    };

    match name {
        "join" => room("join").map(Command::Join),
        "leave" => room("leave").map(Command::Leave),
        "switch" => room("switch").map(Command::Switch),
        "rooms" => Ok(Command::Rooms),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}
