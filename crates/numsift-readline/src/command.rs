//! REPL input parsing.

use std::path::PathBuf;

/// Commands offered for completion.
pub const COMMANDS: &[&str] = &["/start", "/stop", "/file", "/press", "/join", "/show", "/help"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Start,
    /// End the session
    Stop,
    /// Upload a local file
    File(PathBuf),
    /// Press the n-th button (1-based) of the active message
    Press(usize),
    /// Join required channel n (1-based), or all of them
    Join(Option<usize>),
    /// Reprint the active message
    Show,
    Help,
    Quit,
    /// Anything else is sent as a chat message
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(pub String);

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

fn parse_index(arg: &str) -> Result<usize, ParseError> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError(format!("'{arg}' is not a button number"))),
    }
}

/// Parses one trimmed, non-empty input line.
pub fn parse(line: &str) -> Result<ReplCommand, ParseError> {
    if line == "quit" || line == "exit" {
        return Ok(ReplCommand::Quit);
    }
    if let Some(n) = line.strip_prefix('#') {
        return parse_index(n.trim()).map(ReplCommand::Press);
    }
    if !line.starts_with('/') {
        return Ok(ReplCommand::Text(line.to_string()));
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    match (command, arg) {
        ("/start", _) => Ok(ReplCommand::Start),
        ("/stop", _) => Ok(ReplCommand::Stop),
        ("/show", _) => Ok(ReplCommand::Show),
        ("/help", _) => Ok(ReplCommand::Help),
        ("/file", "") => Err(ParseError("usage: /file <path>".to_string())),
        ("/file", path) => Ok(ReplCommand::File(PathBuf::from(path))),
        ("/press", n) => parse_index(n).map(ReplCommand::Press),
        ("/join", "") => Ok(ReplCommand::Join(None)),
        ("/join", n) => parse_index(n).map(|n| ReplCommand::Join(Some(n))),
        // Unknown slash commands go through as text, like any chat client
        _ => Ok(ReplCommand::Text(line.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("/start"), Ok(ReplCommand::Start));
        assert_eq!(parse("/stop"), Ok(ReplCommand::Stop));
        assert_eq!(parse("quit"), Ok(ReplCommand::Quit));
        assert_eq!(parse("#3"), Ok(ReplCommand::Press(3)));
        assert_eq!(parse("/press 2"), Ok(ReplCommand::Press(2)));
        assert_eq!(parse("/join"), Ok(ReplCommand::Join(None)));
        assert_eq!(parse("/join 1"), Ok(ReplCommand::Join(Some(1))));
        assert_eq!(
            parse("/file  data/list one.csv"),
            Ok(ReplCommand::File(PathBuf::from("data/list one.csv")))
        );
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            parse("call +14155550123"),
            Ok(ReplCommand::Text("call +14155550123".to_string()))
        );
        assert_eq!(parse("/weather"), Ok(ReplCommand::Text("/weather".to_string())));
    }

    #[test]
    fn test_bad_arguments() {
        assert!(parse("#0").is_err());
        assert!(parse("/press x").is_err());
        assert!(parse("/file").is_err());
    }
}
