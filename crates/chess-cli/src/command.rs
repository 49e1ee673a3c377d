//! Parsing of driver input lines.

use thiserror::Error;

/// A line of driver input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move in coordinate notation, e.g. "e2e4".
    Move(String),
    /// Let the engine move for the side to move.
    Go,
    /// Take back the last move (both moves when the engine plays one side).
    Undo,
    /// Start a new game.
    New,
    /// Print the board.
    Board,
    /// Print the board as FEN.
    Fen,
    /// List the legal moves.
    Moves,
    /// Set the search depth.
    Ply(u32),
    /// Print the available commands.
    Help,
    /// Leave the driver.
    Quit,
}

/// Errors from parsing a command line.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("ply needs a number, got {0:?}")]
    InvalidPly(String),
}

/// Text printed by `help`.
pub const HELP: &str = "\
commands:
  e2e4      play a move (origin then destination)
  go        let the engine move
  undo      take back the last move
  new       start a new game
  board     print the board
  fen       print the position as FEN
  moves     list legal moves
  ply N     set the search depth
  help      show this text
  quit      leave";

impl Command {
    /// Parses one input line. Keywords are case-insensitive.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Err(CommandError::Empty);
        };
        let keyword = first.to_ascii_lowercase();

        let command = match keyword.as_str() {
            "go" => Command::Go,
            "undo" => Command::Undo,
            "new" => Command::New,
            "board" | "d" => Command::Board,
            "fen" => Command::Fen,
            "moves" => Command::Moves,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "ply" => {
                let arg = words.next().unwrap_or_default();
                let ply = arg
                    .parse()
                    .map_err(|_| CommandError::InvalidPly(arg.to_string()))?;
                Command::Ply(ply)
            }
            _ if looks_like_move(&keyword) => Command::Move(keyword),
            _ => return Err(CommandError::Unknown(first.to_string())),
        };
        Ok(command)
    }
}

fn looks_like_move(word: &str) -> bool {
    let bytes = word.as_bytes();
    (bytes.len() == 4 || bytes.len() == 5)
        && bytes[0].is_ascii_alphabetic()
        && bytes[1].is_ascii_digit()
        && bytes[2].is_ascii_alphabetic()
        && bytes[3].is_ascii_digit()
}
